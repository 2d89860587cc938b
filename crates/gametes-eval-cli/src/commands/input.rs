use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::ArgMatches;

use gametes_eval::config::load_config;
use gametes_eval::{DatasetType, EvalConfig, EvaluatorKind};

/// Parse every value of a repeated flag.
pub fn parse_all<T>(matches: &ArgMatches, id: &str) -> Result<Option<Vec<T>>>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let Ok(Some(values)) = matches.try_get_many::<String>(id) else {
        return Ok(None);
    };
    let parsed = values
        .map(|value| {
            value
                .parse::<T>()
                .with_context(|| format!("Invalid value for --{}: {}", id.replace('_', "-"), value))
        })
        .collect::<Result<Vec<T>>>()?;
    Ok(Some(parsed))
}

/// Configuration from the optional file, then the command-line overrides.
pub fn config_from_arguments(config_path: Option<&PathBuf>, matches: &ArgMatches) -> Result<EvalConfig> {
    let mut config = match config_path {
        Some(path) => {
            log::info!("Using config: {}", path.display());
            load_config(path)?
        }
        None => {
            log::info!("No config provided; using defaults.");
            EvalConfig::default()
        }
    };

    if let Ok(Some(base_dir)) = matches.try_get_one::<PathBuf>("base_dir") {
        config.base_directory = base_dir.clone();
    }
    if let Ok(Some(values)) = matches.try_get_many::<String>("heritability") {
        config.heritability_values = values.cloned().collect();
    }
    if let Some(types) = parse_all::<DatasetType>(matches, "dataset_type")? {
        config.dataset_types = types;
    }
    if let Some(kinds) = parse_all::<EvaluatorKind>(matches, "evaluator")? {
        config.active_evaluators = kinds;
    }
    if let Ok(Some(&max_files)) = matches.try_get_one::<usize>("max_files") {
        config.max_files_per_group = max_files;
    }

    config.validate().context("Invalid configuration after command-line overrides")?;
    Ok(config)
}
