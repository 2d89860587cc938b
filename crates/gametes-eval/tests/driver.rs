mod common;

use std::fs;
use std::path::Path;

use gametes_eval::config::EvalConfig;
use gametes_eval::evaluators::EvaluatorKind;
use gametes_eval::oracle::DatasetType;
use gametes_eval::report::write_summary_tsv;
use gametes_eval::Runner;

use common::{synthetic_table, write_table, SINGLE_LOCUS_COLUMNS};

fn config_for(base: &Path) -> EvalConfig {
    EvalConfig {
        base_directory: base.to_path_buf(),
        heritability_values: vec!["70".to_string()],
        dataset_types: vec![DatasetType::M1],
        active_evaluators: vec![EvaluatorKind::Pearson, EvaluatorKind::MannWhitney],
        ..EvalConfig::default()
    }
}

fn data_file(base: &Path, name: &str) -> std::path::PathBuf {
    base.join("heritability_70")
        .join("m1_EDM-1")
        .join("data")
        .join(name)
}

fn output_text(base: &Path, stem: &str) -> String {
    let path = base
        .join("heritability_70")
        .join("m1_EDM-1")
        .join("output")
        .join(format!("{}.txt", stem));
    fs::read_to_string(path).unwrap()
}

#[test]
fn writes_one_indicator_per_file_in_path_order() {
    let dir = tempfile::tempdir().unwrap();
    let base = dir.path();
    write_table(
        &data_file(base, "a.txt"),
        &synthetic_table(40, &SINGLE_LOCUS_COLUMNS, &["M0P0"], 1),
    );
    write_table(
        &data_file(base, "b.txt"),
        &synthetic_table(40, &SINGLE_LOCUS_COLUMNS, &["N1"], 2),
    );
    write_table(
        &data_file(base, "c.txt"),
        &synthetic_table(40, &SINGLE_LOCUS_COLUMNS, &["M0P0"], 3),
    );
    fs::write(data_file(base, "notes.md"), "not a dataset").unwrap();

    let runner = Runner::new(config_for(base)).unwrap();
    let summary = runner.run().unwrap();

    assert_eq!(output_text(base, "pcOutput"), "[1, 0, 1]");
    assert_eq!(output_text(base, "mwOutput"), "[1, 0, 1]");

    assert_eq!(summary.groups.len(), 2);
    let pearson = summary.for_evaluator(EvaluatorKind::Pearson).next().unwrap();
    assert_eq!(pearson.files, 3);
    assert!((pearson.recovery_rate.unwrap() - 2.0 / 3.0).abs() < 1e-12);
    assert!(pearson.mean_accuracy.is_none());

    let tsv = dir.path().join("summary.tsv");
    write_summary_tsv(&summary, &tsv).unwrap();
    assert_eq!(fs::read_to_string(tsv).unwrap().lines().count(), 3);
}

#[test]
fn caps_files_per_group() {
    let dir = tempfile::tempdir().unwrap();
    let base = dir.path();
    for idx in 0..4 {
        write_table(
            &data_file(base, &format!("run_{}.txt", idx)),
            &synthetic_table(30, &SINGLE_LOCUS_COLUMNS, &["M0P0"], idx),
        );
    }
    let config = EvalConfig {
        max_files_per_group: 2,
        active_evaluators: vec![EvaluatorKind::Spearman],
        ..config_for(base)
    };

    Runner::new(config).unwrap().run().unwrap();
    assert_eq!(output_text(base, "scOutput"), "[1, 1]");
}

#[test]
fn missing_group_writes_empty_lists() {
    let dir = tempfile::tempdir().unwrap();
    let base = dir.path();
    let config = EvalConfig {
        active_evaluators: vec![EvaluatorKind::Pearson, EvaluatorKind::DecisionTree],
        ..config_for(base)
    };

    let summary = Runner::new(config).unwrap().run().unwrap();
    assert_eq!(output_text(base, "pcOutput"), "[]");
    assert_eq!(output_text(base, "dtPositiveOutput"), "[]");
    assert_eq!(output_text(base, "dtAccuracyOutput"), "[]");
    assert!(summary.groups.iter().all(|g| g.recovery_rate.is_none()));
}

#[test]
fn malformed_file_aborts_the_run() {
    let dir = tempfile::tempdir().unwrap();
    let base = dir.path();
    let path = data_file(base, "bad.txt");
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, "M0P0\tN1\tClass\n0\t1\t3\n").unwrap();

    let err = Runner::new(config_for(base)).unwrap().run().unwrap_err();
    assert!(format!("{:#}", err).contains("bad.txt"));
}

#[test]
fn rejects_invalid_configuration() {
    let config = EvalConfig {
        active_evaluators: Vec::new(),
        ..EvalConfig::default()
    };
    assert!(Runner::new(config).is_err());
}
