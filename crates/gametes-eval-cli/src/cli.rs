use std::path::PathBuf;

use clap::{Arg, ArgAction, Command, ValueHint};

fn config_arg() -> Arg {
    Arg::new("config")
        .help("Path to a JSON configuration file. Missing fields take their defaults.")
        .value_parser(clap::value_parser!(PathBuf))
        .value_hint(ValueHint::FilePath)
}

fn evaluator_arg() -> Arg {
    Arg::new("evaluator")
        .short('e')
        .long("evaluator")
        .help(
            "Evaluator to run (mann_whitney, pearson, spearman, logistic_regression, \
             mutual_information, relief_f, multi_surf, decision_tree, random_forest, \
             gradient_boosting). Repeat to run several. Overrides the configuration file.",
        )
        .action(ArgAction::Append)
        .value_parser(clap::builder::NonEmptyStringValueParser::new())
}

pub fn build_cli() -> Command {
    Command::new("gametes-eval")
        .version(clap::crate_version!())
        .about("Causal-locus recovery benchmarks for GAMETES simulated datasets")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Log per-candidate and per-model detail")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(
            Command::new("run")
                .about("Evaluate every heritability and dataset type group and write the result lists")
                .arg(config_arg())
                .arg(
                    Arg::new("base_dir")
                        .short('b')
                        .long("base-dir")
                        .help("Root holding the heritability_<h> directories")
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::DirPath),
                )
                .arg(
                    Arg::new("heritability")
                        .short('H')
                        .long("heritability")
                        .help("Heritability token as used in directory names, e.g. 70. Repeat for several.")
                        .action(ArgAction::Append)
                        .value_parser(clap::builder::NonEmptyStringValueParser::new()),
                )
                .arg(
                    Arg::new("dataset_type")
                        .short('t')
                        .long("dataset-type")
                        .help("Dataset type (m1, m2, m1m2Additive, m1m2Heterogeneous). Repeat for several.")
                        .action(ArgAction::Append)
                        .value_parser(clap::builder::NonEmptyStringValueParser::new()),
                )
                .arg(evaluator_arg())
                .arg(
                    Arg::new("max_files")
                        .short('n')
                        .long("max-files")
                        .help("Maximum number of dataset files evaluated per group")
                        .value_parser(clap::value_parser!(usize)),
                )
                .arg(
                    Arg::new("summary")
                        .long("summary")
                        .help("Write a TSV summary of recovery rates to this path")
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("report")
                        .long("report")
                        .help("Write an HTML report with recovery plots to this path")
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::FilePath),
                ),
        )
        .subcommand(
            Command::new("score")
                .about("Run evaluators on a single dataset file and print the outcome")
                .arg(
                    Arg::new("file")
                        .help("Tab-separated dataset with a Class column")
                        .required(true)
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("dataset_type")
                        .short('t')
                        .long("dataset-type")
                        .help("Dataset type deciding the ground-truth loci")
                        .required(true)
                        .value_parser(clap::builder::NonEmptyStringValueParser::new()),
                )
                .arg(evaluator_arg())
                .arg(
                    Arg::new("config")
                        .short('c')
                        .long("config")
                        .help("Path to a JSON configuration file")
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::FilePath),
                ),
        )
        .subcommand(Command::new("config").about("Print the default configuration as JSON"))
}
