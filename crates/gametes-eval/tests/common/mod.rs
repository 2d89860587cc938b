#![allow(dead_code)]

use std::fs;
use std::path::Path;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Case/control table with genotype-coded columns.
///
/// Rows alternate between class 0 and class 1. `signal` holds the columns that
/// track the class: `M0P0` is `2 * class`, and `M1P0` (if present) follows it
/// except on every sixth case, where it is 1. All other columns draw uniformly
/// from {0, 1, 2}.
pub struct Table {
    pub header: Vec<String>,
    pub rows: Vec<Vec<u8>>,
}

pub fn synthetic_table(n_rows: usize, columns: &[&str], signal: &[&str], seed: u64) -> Table {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut header: Vec<String> = columns.iter().map(|c| c.to_string()).collect();
    header.push("Class".to_string());

    let rows = (0..n_rows)
        .map(|row| {
            let class = (row % 2) as u8;
            let mut values: Vec<u8> = columns
                .iter()
                .map(|&name| {
                    if signal.contains(&name) && name == "M1P0" {
                        if class == 1 && row % 6 == 1 {
                            1
                        } else {
                            2 * class
                        }
                    } else if signal.contains(&name) {
                        2 * class
                    } else {
                        rng.gen_range(0..3)
                    }
                })
                .collect();
            values.push(class);
            values
        })
        .collect();

    Table { header, rows }
}

pub fn write_table(path: &Path, table: &Table) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    let mut text = table.header.join("\t");
    text.push('\n');
    for row in &table.rows {
        let line: Vec<String> = row.iter().map(|v| v.to_string()).collect();
        text.push_str(&line.join("\t"));
        text.push('\n');
    }
    fs::write(path, text).unwrap();
}

pub const SINGLE_LOCUS_COLUMNS: [&str; 6] = ["N0", "N1", "M0P0", "N2", "N3", "N4"];
pub const TWO_LOCUS_COLUMNS: [&str; 7] = ["N0", "M1P0", "N1", "N2", "M0P0", "N3", "N4"];
