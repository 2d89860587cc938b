//! Directory layout of a GAMETES benchmark tree and dataset discovery.
//!
//! ```text
//! {base}/heritability_{h}/{type}{suffix}/{data_dir}/**/*.{ext}
//! {base}/heritability_{h}/{type}{suffix}/{output_dir}/{metric}.txt
//! ```
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use walkdir::WalkDir;

use crate::config::EvalConfig;
use crate::oracle::DatasetType;

/// Root of one (heritability, dataset type) group.
pub fn group_dir(config: &EvalConfig, heritability: &str, dataset_type: DatasetType) -> PathBuf {
    config
        .base_directory
        .join(format!("heritability_{}", heritability))
        .join(format!("{}{}", dataset_type.tag(), config.layout.dataset_suffix))
}

pub fn data_dir(config: &EvalConfig, heritability: &str, dataset_type: DatasetType) -> PathBuf {
    group_dir(config, heritability, dataset_type).join(&config.layout.data_dir)
}

pub fn output_dir(config: &EvalConfig, heritability: &str, dataset_type: DatasetType) -> PathBuf {
    group_dir(config, heritability, dataset_type).join(&config.layout.output_dir)
}

/// `{output_dir}/{metric}.txt`
pub fn output_path(config: &EvalConfig, heritability: &str, dataset_type: DatasetType, metric: &str) -> PathBuf {
    output_dir(config, heritability, dataset_type).join(format!("{}.txt", metric))
}

/// Files under `dir` (recursively) with extension `extension`, sorted by full
/// path and capped at `max_files`.
///
/// A missing directory yields no files.
pub fn discover_files(dir: &Path, extension: &str, max_files: usize) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        log::warn!("Data directory {} does not exist; no files to evaluate", dir.display());
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(dir) {
        let entry = entry.with_context(|| format!("Failed to walk {}", dir.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let matches = entry
            .path()
            .extension()
            .and_then(|ext| ext.to_str())
            .map_or(false, |ext| ext == extension);
        if matches {
            files.push(entry.into_path());
        }
    }
    files.sort();

    let found = files.len();
    files.truncate(max_files);
    if found < max_files {
        log::info!(
            "Found {} dataset files in {} (cap is {})",
            found,
            dir.display(),
            max_files
        );
    } else {
        log::debug!("Using {} of {} dataset files in {}", files.len(), found, dir.display());
    }
    Ok(files)
}
