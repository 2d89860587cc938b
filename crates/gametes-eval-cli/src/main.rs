use std::path::PathBuf;

use anyhow::Result;
use clap::ArgMatches;
use log::LevelFilter;

use gametes_eval::{DatasetType, EvalConfig};
use gametes_eval_cli::cli::build_cli;
use gametes_eval_cli::commands::input::config_from_arguments;
use gametes_eval_cli::commands::run::run_benchmark;
use gametes_eval_cli::commands::score::{format_scores, score_file};

const DEFAULT_LOG: &str = "error,gametes_eval=info,gametes_eval_cli=info";
const VERBOSE_LOG: &str = "error,gametes_eval=debug,gametes_eval_cli=debug";

fn main() -> Result<()> {
    let matches = build_cli().get_matches();

    let default_filter = if matches.get_flag("verbose") {
        VERBOSE_LOG
    } else {
        DEFAULT_LOG
    };
    env_logger::Builder::default()
        .filter_level(LevelFilter::Error)
        .parse_env(env_logger::Env::default().filter_or("GAMETES_EVAL_LOG", default_filter))
        .init();

    match matches.subcommand() {
        Some(("run", sub_m)) => handle_run(sub_m),
        Some(("score", sub_m)) => handle_score(sub_m),
        Some(("config", _)) => {
            println!("{}", serde_json::to_string_pretty(&EvalConfig::default())?);
            Ok(())
        }
        _ => unreachable!("Subcommand is required by CLI configuration"),
    }
}

fn handle_run(matches: &ArgMatches) -> Result<()> {
    let config_path = matches.get_one::<PathBuf>("config");
    let config = match config_from_arguments(config_path, matches) {
        Ok(config) => config,
        Err(e) => {
            log::error!("Could not set up the run: {:#}", e);
            std::process::exit(1)
        }
    };
    let summary_path = matches.get_one::<PathBuf>("summary").map(PathBuf::as_path);
    let report_path = matches.get_one::<PathBuf>("report").map(PathBuf::as_path);

    match run_benchmark(config, summary_path, report_path) {
        Ok(summary) => {
            log::info!("Completed {} group result(s).", summary.groups.len());
            Ok(())
        }
        Err(e) => {
            log::error!("Benchmark failed: {:#}", e);
            std::process::exit(1)
        }
    }
}

fn handle_score(matches: &ArgMatches) -> Result<()> {
    let (Some(file), Some(dataset_type)) = (
        matches.get_one::<PathBuf>("file"),
        matches.get_one::<String>("dataset_type"),
    ) else {
        unreachable!("FILE and --dataset-type are required by CLI configuration")
    };

    let outcome = dataset_type
        .parse::<DatasetType>()
        .map_err(anyhow::Error::from)
        .and_then(|dataset_type| {
            let config = config_from_arguments(matches.get_one::<PathBuf>("config"), matches)?;
            log::info!("Scoring {} as {}", file.display(), dataset_type);
            score_file(file, dataset_type, config)
        });

    match outcome {
        Ok(results) => {
            print!("{}", format_scores(&results));
            Ok(())
        }
        Err(e) => {
            log::error!("Scoring failed: {:#}", e);
            std::process::exit(1)
        }
    }
}
