//! Report rendering.
//!
//! The summary report is a fixed-width text table written to the engine's
//! sink. The full-detail report is rendered to a string first and written to
//! its file in one go, so a failed write never leaves a half-written report
//! behind a successful one.

use crate::coverage::{CoverageSummary, format_percent};
use crate::engine::EngineResults;
use crate::error::ReportError;
use crate::suite::TestRecord;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use tracing::info;

/// Column and heading widths of the summary report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportLayout {
    /// Width of the `=`-padded headings.
    pub width: usize,
    /// Column width of the suite tables.
    pub padding: usize,
    /// Column width of the stats block.
    pub stats_padding: usize,
}

impl Default for ReportLayout {
    fn default() -> Self {
        Self {
            width: 79,
            padding: 34,
            stats_padding: 25,
        }
    }
}

/// Writes headings and padded table rows.
pub struct TablePrinter<'a> {
    out: &'a mut dyn Write,
}

impl<'a> TablePrinter<'a> {
    pub fn new(out: &'a mut dyn Write) -> Self {
        Self { out }
    }

    /// Writes ` heading ` centered between runs of `pad` characters.
    pub fn heading_with(&mut self, width: usize, pad: char, heading: &str) -> io::Result<&mut Self> {
        let len = heading.chars().count();
        let left = width.saturating_sub(len + 2) / 2;
        let right = width.saturating_sub(len + 1) / 2;
        let pad = pad.to_string();
        writeln!(
            self.out,
            "{} {} {}",
            pad.repeat(left),
            heading,
            pad.repeat(right)
        )?;
        Ok(self)
    }

    pub fn heading(&mut self, width: usize, heading: &str) -> io::Result<&mut Self> {
        self.heading_with(width, '=', heading)
    }

    pub fn empty_line(&mut self) -> io::Result<&mut Self> {
        writeln!(self.out)?;
        Ok(self)
    }

    /// Writes the items, padding every item but the last to `pad_to + 1`
    /// characters.
    pub fn row_with(&mut self, pad_to: usize, pad: char, items: &[&str]) -> io::Result<&mut Self> {
        let pad = pad.to_string();
        for (i, item) in items.iter().enumerate() {
            write!(self.out, "{}", item)?;
            if i + 1 != items.len() {
                let len = item.chars().count();
                write!(self.out, "{}", pad.repeat((pad_to + 1).saturating_sub(len)))?;
            }
        }
        writeln!(self.out)?;
        Ok(self)
    }

    pub fn row(&mut self, pad_to: usize, items: &[&str]) -> io::Result<&mut Self> {
        self.row_with(pad_to, ' ', items)
    }
}

#[allow(clippy::cast_precision_loss)]
fn percent_of(count: usize, total: usize) -> Option<f64> {
    (total != 0).then(|| count as f64 * 100.0 / total as f64)
}

/// Writes the summary report.
///
/// With `full_output` set, the last line names the configured target path.
/// The summary is written before the full-detail file, so that line does not
/// confirm the write succeeded.
pub fn write_summary(
    out: &mut dyn Write,
    layout: &ReportLayout,
    results: &EngineResults,
    full_output: Option<&Path>,
) -> io::Result<()> {
    let successes = results.total_successes();
    let failures = results.total_failures();
    let total = successes + failures;
    let columns = ["[Suite]", "[SUCCESS]", "[FAILURE]"];

    let mut printer = TablePrinter::new(out);
    printer
        .heading(layout.width, "PERFORMED TEST ROUTINE, RESULTS BELOW")?
        .heading(layout.width, "OVERVIEW")?
        .row(layout.padding, &columns)?
        .empty_line()?
        .row(
            layout.padding,
            &["total", &successes.to_string(), &failures.to_string()],
        )?
        .heading(layout.width, "DETAIL REPORT")?
        .row(layout.padding, &columns)?
        .empty_line()?;

    for (suite, suite_results) in results.suites() {
        printer.row(
            layout.padding,
            &[
                suite.name(),
                &suite_results.successes().to_string(),
                &suite_results.failures().to_string(),
            ],
        )?;
    }

    let isolated = results.isolated();
    printer
        .row(
            layout.padding,
            &[
                "isolated tests",
                &isolated.successes().to_string(),
                &isolated.failures().to_string(),
            ],
        )?
        .heading(layout.width, "STATS")?
        .empty_line()?
        .row(layout.stats_padding, &["Total tests performed:", &total.to_string()])?
        .row(
            layout.stats_padding,
            &[
                "Total succeeded (%):",
                &format!("{}%", format_percent(percent_of(successes, total))),
            ],
        )?
        .row(
            layout.stats_padding,
            &[
                "Total failed (%):",
                &format!("{}%", format_percent(percent_of(failures, total))),
            ],
        )?
        .row(
            layout.stats_padding,
            &[
                "Total coverage (%):",
                &format!("{}%", format_percent(results.coverage().percent())),
            ],
        )?;

    if failures > 0 {
        write!(out, "\n\nFailed Tests: [")?;
        for name in results.failed_names() {
            write!(out, " {}", name)?;
        }
        write!(out, " ]")?;
    }

    // Announces the target; a failed write is logged by the engine.
    if let Some(path) = full_output {
        writeln!(out, "\nFull test output was written to: {}", path.display())?;
    }
    Ok(())
}

/// Renders the full-detail report.
pub fn render_full_report(results: &EngineResults) -> String {
    let mut out = String::from("==== TEST RESULTS ====");
    for (suite, suite_results) in results.suites() {
        out.push('\n');
        for (test, result) in suite_results.iter() {
            out.push_str(&format!("\n({}) {}:\n{}", suite.name(), test.name(), result));
        }
    }
    out.push('\n');
    for (test, result) in results.isolated().iter() {
        out.push_str(&format!("\n(isolated) {}:\n{}", test.name(), result));
    }

    out.push_str("\n\n\n==== OVERVIEW OF TEST SUITES AND TESTS ====\n");
    for (suite, suite_results) in results.suites() {
        out.push_str(&suite.describe());
        out.push_str("\nTest details:");
        for (test, _) in suite_results.iter() {
            out.push('\n');
            out.push_str(&test.meta().describe());
        }
        out.push_str("\n\n");
    }

    if !results.isolated().is_empty() {
        out.push_str("Isolated Tests:");
        for (test, _) in results.isolated().iter() {
            out.push('\n');
            out.push_str(&test.meta().describe());
        }
    }
    out
}

/// Writes the full-detail report, truncating any previous file.
pub fn write_full_report(path: &Path, results: &EngineResults) -> Result<(), ReportError> {
    let report = render_full_report(results);
    fs::write(path, report).map_err(|source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), "Wrote full test output");
    Ok(())
}

/// Machine-readable summary of one engine run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub total: usize,
    pub successes: usize,
    pub failures: usize,
    pub success_percent: Option<f64>,
    pub failure_percent: Option<f64>,
    pub coverage: CoverageSummary,
    pub failed: Vec<String>,
    pub suites: Vec<SuiteSummary>,
    pub isolated: Vec<TestRecord>,
}

/// Per-suite part of a [`RunSummary`].
#[derive(Debug, Clone, Serialize)]
pub struct SuiteSummary {
    pub name: String,
    pub successes: usize,
    pub failures: usize,
    pub coverage: CoverageSummary,
    pub tests: Vec<TestRecord>,
}

impl RunSummary {
    pub fn from_results(results: &EngineResults) -> Self {
        let successes = results.total_successes();
        let failures = results.total_failures();
        let total = successes + failures;
        Self {
            total,
            successes,
            failures,
            success_percent: percent_of(successes, total),
            failure_percent: percent_of(failures, total),
            coverage: results.coverage().summary(),
            failed: results.failed_names(),
            suites: results
                .suites()
                .iter()
                .map(|(suite, suite_results)| SuiteSummary {
                    name: suite.name().to_string(),
                    successes: suite_results.successes(),
                    failures: suite_results.failures(),
                    coverage: suite.coverage().summary(),
                    tests: suite_results.records(),
                })
                .collect(),
            isolated: results.isolated().records(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(f: impl FnOnce(&mut TablePrinter<'_>) -> io::Result<()>) -> String {
        let mut buf = Vec::new();
        {
            let mut printer = TablePrinter::new(&mut buf);
            f(&mut printer).unwrap();
        }
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_heading_is_centered() {
        let text = render(|p| p.heading(79, "OVERVIEW").map(|_| ()));
        assert_eq!(text, format!("{} OVERVIEW {}\n", "=".repeat(34), "=".repeat(35)));
    }

    #[test]
    fn test_heading_longer_than_width() {
        let text = render(|p| p.heading_with(4, '-', "too long").map(|_| ()));
        assert_eq!(text, " too long \n");
    }

    #[test]
    fn test_row_padding() {
        let text = render(|p| p.row(10, &["total", "3", "0"]).map(|_| ()));
        assert_eq!(text, format!("total{}3{}0\n", " ".repeat(6), " ".repeat(10)));
    }

    #[test]
    fn test_row_item_wider_than_column() {
        let text = render(|p| p.row(2, &["wide", "x"]).map(|_| ()));
        assert_eq!(text, "widex\n");
    }

    #[test]
    fn test_percent_of() {
        assert_eq!(percent_of(0, 0), None);
        assert_eq!(format_percent(percent_of(1, 3)), "33.333333333333336");
        assert_eq!(format_percent(percent_of(3, 3)), "100.0");
        assert_eq!(format_percent(percent_of(0, 3)), "0.0");
    }

    #[test]
    fn test_layout_defaults_fill_missing_keys() {
        let layout: ReportLayout = serde_yaml::from_str("width: 60").unwrap();
        assert_eq!(layout.width, 60);
        assert_eq!(layout.padding, 34);
        assert_eq!(layout.stats_padding, 25);
    }
}
