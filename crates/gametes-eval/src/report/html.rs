use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use maud::{html, Markup, PreEscaped, DOCTYPE};
use plotly::Plot;

use crate::driver::RunSummary;
use crate::oracle::DatasetType;
use crate::report::plots::{plot_accuracy_by_heritability, plot_recovery_by_heritability};

const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.27.0.min.js";

/// A titled block of markup and plots.
pub struct ReportSection {
    title: String,
    content: Vec<Markup>,
}

impl ReportSection {
    pub fn new(title: &str) -> Self {
        ReportSection {
            title: title.to_string(),
            content: Vec::new(),
        }
    }

    pub fn add_content(&mut self, markup: Markup) {
        self.content.push(markup);
    }

    pub fn add_plot(&mut self, plot: Plot) {
        let div_id = format!("plot-{}-{}", slug(&self.title), self.content.len());
        self.content
            .push(PreEscaped(plot.to_inline_html(Some(div_id.as_str()))));
    }

    fn render(&self) -> Markup {
        html! {
            section {
                h2 { (self.title) }
                @for block in &self.content {
                    (block)
                }
            }
        }
    }
}

/// Single-page HTML report.
pub struct Report {
    title: String,
    subtitle: String,
    sections: Vec<ReportSection>,
}

impl Report {
    pub fn new(title: &str, subtitle: &str) -> Self {
        Report {
            title: title.to_string(),
            subtitle: subtitle.to_string(),
            sections: Vec::new(),
        }
    }

    pub fn add_section(&mut self, section: ReportSection) {
        self.sections.push(section);
    }

    pub fn render(&self) -> Markup {
        let generated = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        html! {
            (DOCTYPE)
            html {
                head {
                    meta charset="utf-8";
                    title { (self.title) }
                    script src=(PLOTLY_CDN) {}
                }
                body {
                    h1 { (self.title) }
                    p { (self.subtitle) }
                    p { "Generated " (generated) }
                    @for section in &self.sections {
                        (section.render())
                    }
                }
            }
        }
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create report directory: {}", parent.display()))?;
            }
        }
        fs::write(path, self.render().into_string())
            .with_context(|| format!("Failed to write report: {}", path.display()))?;
        Ok(())
    }
}

fn slug(text: &str) -> String {
    text.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '-' })
        .collect()
}

fn format_rate(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{:.3}", v))
}

/// Build the recovery report for a finished run.
pub fn build_report(summary: &RunSummary) -> Report {
    let mut report = Report::new(
        "GAMETES recovery benchmark",
        "Fraction of simulated datasets whose causal loci were ranked first",
    );

    let mut table = ReportSection::new("Summary");
    table.add_content(html! {
        table {
            thead {
                tr {
                    th { "Heritability" }
                    th { "Dataset type" }
                    th { "Evaluator" }
                    th { "Files" }
                    th { "Recovery rate" }
                    th { "Mean accuracy" }
                }
            }
            tbody {
                @for group in &summary.groups {
                    tr {
                        td { (group.heritability) }
                        td { (group.dataset_type) }
                        td { (group.evaluator) }
                        td { (group.files) }
                        td { (format_rate(group.recovery_rate)) }
                        td { (format_rate(group.mean_accuracy)) }
                    }
                }
            }
        }
    });
    report.add_section(table);

    for dataset_type in DatasetType::ALL {
        if !summary.groups.iter().any(|g| g.dataset_type == dataset_type) {
            continue;
        }
        let mut section = ReportSection::new(dataset_type.tag());
        section.add_plot(plot_recovery_by_heritability(summary, dataset_type));
        if let Some(plot) = plot_accuracy_by_heritability(summary, dataset_type) {
            section.add_plot(plot);
        }
        report.add_section(section);
    }
    report
}

/// Render and save the recovery report.
pub fn write_html_report<P: AsRef<Path>>(summary: &RunSummary, path: P) -> Result<()> {
    build_report(summary).save_to_file(path)
}
