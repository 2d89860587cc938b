use plotly::common::Mode;
use plotly::layout::{Axis, Layout};
use plotly::{Plot, Scatter};

use crate::driver::RunSummary;
use crate::evaluators::EvaluatorKind;
use crate::oracle::DatasetType;

fn distinct_evaluators(summary: &RunSummary) -> Vec<EvaluatorKind> {
    let mut kinds = Vec::new();
    for group in &summary.groups {
        if !kinds.contains(&group.evaluator) {
            kinds.push(group.evaluator);
        }
    }
    kinds
}

/// Line chart of recovery rate against heritability, one trace per evaluator.
pub fn plot_recovery_by_heritability(summary: &RunSummary, dataset_type: DatasetType) -> Plot {
    let mut plot = Plot::new();
    for kind in distinct_evaluators(summary) {
        let (x, y): (Vec<String>, Vec<f64>) = summary
            .for_evaluator(kind)
            .filter(|g| g.dataset_type == dataset_type)
            .filter_map(|g| g.recovery_rate.map(|rate| (g.heritability.clone(), rate)))
            .unzip();
        if x.is_empty() {
            continue;
        }
        plot.add_trace(Scatter::new(x, y).mode(Mode::LinesMarkers).name(kind.as_str()));
    }

    let layout = Layout::new()
        .title(format!("Recovery rate ({})", dataset_type).as_str())
        .x_axis(Axis::new().title("Heritability"))
        .y_axis(Axis::new().title("Recovery rate").range(vec![0.0, 1.0]));
    plot.set_layout(layout);
    plot
}

/// Mean held-out accuracy of the classifier evaluators against heritability.
pub fn plot_accuracy_by_heritability(summary: &RunSummary, dataset_type: DatasetType) -> Option<Plot> {
    let mut plot = Plot::new();
    let mut traces = 0;
    for kind in distinct_evaluators(summary).into_iter().filter(|k| k.is_classifier()) {
        let (x, y): (Vec<String>, Vec<f64>) = summary
            .for_evaluator(kind)
            .filter(|g| g.dataset_type == dataset_type)
            .filter_map(|g| g.mean_accuracy.map(|acc| (g.heritability.clone(), acc)))
            .unzip();
        if x.is_empty() {
            continue;
        }
        plot.add_trace(Scatter::new(x, y).mode(Mode::LinesMarkers).name(kind.as_str()));
        traces += 1;
    }
    if traces == 0 {
        return None;
    }

    let layout = Layout::new()
        .title(format!("Held-out accuracy ({})", dataset_type).as_str())
        .x_axis(Axis::new().title("Heritability"))
        .y_axis(Axis::new().title("Accuracy"));
    plot.set_layout(layout);
    Some(plot)
}
