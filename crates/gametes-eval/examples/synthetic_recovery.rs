//! Score one synthetic case/control table with every ranking evaluator.
//!
//! Run with `RUST_LOG=debug` to see the top features each ranker picked.
use std::fs;

use anyhow::Result;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use gametes_eval::config::EvalConfig;
use gametes_eval::evaluators::{build_evaluator, EvaluatorKind};
use gametes_eval::io::read_tsv;
use gametes_eval::oracle::DatasetType;

fn main() -> Result<()> {
    env_logger::init();

    let mut rng = StdRng::seed_from_u64(42);
    let mut text = String::from("N0\tN1\tM0P0\tN2\tClass\n");
    for row in 0..200 {
        let class: u8 = rng.gen_range(0..2);
        // M0P0 matches the class 85% of the time.
        let locus = if rng.gen_bool(0.85) { 2 * class } else { 2 * (1 - class) };
        text.push_str(&format!(
            "{}\t{}\t{}\t{}\t{}\n",
            rng.gen_range(0..3),
            rng.gen_range(0..3),
            locus,
            row % 3,
            class
        ));
    }

    let dir = tempfile::tempdir()?;
    let path = dir.path().join("synthetic.txt");
    fs::write(&path, text)?;
    let dataset = read_tsv(&path)?;

    let config = EvalConfig::default();
    for kind in EvaluatorKind::ALL.into_iter().filter(|k| !k.is_classifier()) {
        let evaluation = build_evaluator(kind, &config).evaluate(&dataset, DatasetType::M1)?;
        println!(
            "{:<20} top={:?} recovered={}",
            kind.as_str(),
            evaluation.top_features,
            evaluation.recovered
        );
    }
    Ok(())
}
