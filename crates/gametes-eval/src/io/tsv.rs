//! Reader for GAMETES tab-separated genotype tables.
use std::path::Path;

use anyhow::{Context, Result};
use csv::StringRecord;
use ndarray::{Array1, Array2};

use crate::dataset::Dataset;
use crate::error::EvalError;

/// Configuration for reading case/control TSV files.
///
/// Every column other than the label column is loaded as a feature, in header order.
#[derive(Debug, Clone)]
pub struct TsvReaderConfig {
    /// Column name holding the 0/1 class label.
    pub label_column: String,
}

impl Default for TsvReaderConfig {
    fn default() -> Self {
        Self::with_label_column("Class")
    }
}

impl TsvReaderConfig {
    pub fn with_label_column(label_column: &str) -> Self {
        Self {
            label_column: label_column.to_string(),
        }
    }
}

/// Read a TSV file using the default `Class` label column.
pub fn read_tsv<P: AsRef<Path>>(path: P) -> Result<Dataset> {
    read_dataset(path, &TsvReaderConfig::default())
}

/// Read a TSV file into a [`Dataset`].
pub fn read_dataset<P: AsRef<Path>>(path: P, config: &TsvReaderConfig) -> Result<Dataset> {
    let path = path.as_ref();
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("Failed to open dataset: {}", path.display()))?;

    let headers = reader
        .headers()
        .with_context(|| format!("Failed to read header row of {}", path.display()))?
        .clone();

    let label_idx = find_column(&headers, &config.label_column)
        .ok_or_else(|| EvalError::MissingLabelColumn(config.label_column.clone()))
        .with_context(|| format!("Invalid dataset: {}", path.display()))?;

    let feature_indices: Vec<usize> = (0..headers.len()).filter(|&idx| idx != label_idx).collect();
    if feature_indices.is_empty() {
        return Err(EvalError::NoFeatures).with_context(|| format!("Invalid dataset: {}", path.display()));
    }

    let mut features = Vec::new();
    let mut labels = Vec::new();

    for (row_idx, result) in reader.records().enumerate() {
        let row = row_idx + 1;
        let record = result.with_context(|| format!("Failed to read row {} of {}", row, path.display()))?;

        let raw_label = record.get(label_idx).unwrap_or_default();
        let label = parse_label(raw_label)
            .ok_or_else(|| EvalError::NonBinaryLabel {
                value: raw_label.to_string(),
                row,
            })
            .with_context(|| format!("Invalid dataset: {}", path.display()))?;
        labels.push(label);

        for &idx in &feature_indices {
            let raw = record.get(idx).unwrap_or_default().trim();
            let value = raw
                .parse::<f64>()
                .map_err(|_| EvalError::InvalidValue {
                    value: raw.to_string(),
                    feature: headers.get(idx).unwrap_or("").to_string(),
                    row,
                })
                .with_context(|| format!("Invalid dataset: {}", path.display()))?;
            features.push(value);
        }
    }

    if labels.is_empty() {
        return Err(EvalError::EmptyDataset).with_context(|| format!("Invalid dataset: {}", path.display()));
    }

    let n_samples = labels.len();
    let n_features = feature_indices.len();
    let x = Array2::from_shape_vec((n_samples, n_features), features)
        .context("Failed to build feature matrix")?;
    let y = Array1::from_vec(labels);

    let feature_names = feature_indices
        .iter()
        .map(|&idx| headers.get(idx).unwrap_or("").to_string())
        .collect();

    let dataset = Dataset::new(x, y, feature_names)?;
    log::trace!("Read {} from {}", n_samples, path.display());
    Ok(dataset)
}

fn parse_label(raw: &str) -> Option<u8> {
    let trimmed = raw.trim();
    match trimmed {
        "0" => Some(0),
        "1" => Some(1),
        _ => match trimmed.parse::<f64>() {
            Ok(v) if v == 0.0 => Some(0),
            Ok(v) if v == 1.0 => Some(1),
            _ => None,
        },
    }
}

fn find_column(headers: &StringRecord, name: &str) -> Option<usize> {
    headers
        .iter()
        .position(|header| header.trim().eq_ignore_ascii_case(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_file(dir: &tempfile::TempDir, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn reads_label_anywhere_in_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "a.txt", "N0\tClass\tM0P0\n0\t1\t2\n1\t0\t0\n2\t1.0\t1\n");
        let data = read_tsv(&path).unwrap();
        assert_eq!(data.feature_names, vec!["N0", "M0P0"]);
        assert_eq!(data.labels(), vec![1, 0, 1]);
        assert_eq!(data.x[[0, 1]], 2.0);
    }

    #[test]
    fn custom_label_column_leaves_class_as_a_feature() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "a.txt", "Class\tM0P0\tStatus\n2\t1\t0\n0\t2\t1\n");
        let data = read_dataset(&path, &TsvReaderConfig::with_label_column("status")).unwrap();
        assert_eq!(data.feature_names, vec!["Class", "M0P0"]);
        assert_eq!(data.labels(), vec![0, 1]);
        assert_eq!(data.x[[1, 1]], 2.0);
    }

    #[test]
    fn missing_label_column_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "a.txt", "N0\tM0P0\n0\t1\n");
        let err = read_tsv(&path).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<EvalError>(),
            Some(EvalError::MissingLabelColumn(_))
        ));
    }

    #[test]
    fn non_binary_label_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "a.txt", "M0P0\tClass\n0\t2\n");
        let err = read_tsv(&path).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<EvalError>(),
            Some(EvalError::NonBinaryLabel { row: 1, .. })
        ));
    }

    #[test]
    fn invalid_cell_names_feature_and_row() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "a.txt", "M0P0\tClass\n0\t1\nx\t0\n");
        let err = read_tsv(&path).unwrap_err();
        let message = format!("{:#}", err);
        assert!(message.contains("M0P0"), "{}", message);
        assert!(message.contains("row 2"), "{}", message);
    }
}
