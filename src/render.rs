//! Terminal and CSV output for analysis reports.

use std::fmt::Write as _;
use std::io;
use std::path::Path;

use crate::types::{AnalysisReport, Classification, Summary};
use crate::Result;

/// Width of the longest bar in the summary chart.
pub const CHART_WIDTH: usize = 40;

/// Comment text is cut to this many characters in the preview table.
pub const PREVIEW_TEXT_WIDTH: usize = 60;

/// CSV column headers.
pub const CSV_HEADER: [&str; 3] = ["Comment", "Sentiment", "Confidence"];

/// Horizontal bar chart of label counts, scaled to the largest count.
pub fn render_chart(summary: &Summary, width: usize) -> String {
    let max = summary.iter().map(|(_, n)| n).max().unwrap_or(0);
    let mut out = String::new();

    for (label, count) in summary.iter() {
        let bar = if max == 0 {
            0
        } else {
            // Non-zero counts always get at least one block.
            (count * width).div_ceil(max).min(width)
        };
        let _ = writeln!(
            out,
            "{:<8} {:<width$} {:>4} ({:>5.1}%)",
            label.as_str(),
            "█".repeat(bar),
            count,
            summary.fraction(label) * 100.0,
            width = width,
        );
    }

    out
}

/// Table of classifications: row number, label, confidence, comment text.
pub fn render_preview(rows: &[Classification]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:>3}  {:<9} {:>10}  {}", "#", "Sentiment", "Confidence", "Comment");
    let _ = writeln!(out, "{}", "-".repeat(30 + PREVIEW_TEXT_WIDTH));

    for (i, row) in rows.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:>3}  {:<9} {:>10.4}  {}",
            i + 1,
            row.label.as_str(),
            row.score,
            truncate_text(&row.text, PREVIEW_TEXT_WIDTH),
        );
    }

    out
}

/// Full terminal rendering: heading, chart and the first `preview_rows` rows.
pub fn render_report(report: &AnalysisReport, preview_rows: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Sentiment for {} ({} comments, {} classifier)",
        report.video.url(),
        report.results.len(),
        report.classifier
    );
    let _ = writeln!(out, "{}", "=".repeat(60));
    out.push_str(&render_chart(&report.summary, CHART_WIDTH));
    out.push('\n');

    let preview = report.preview(preview_rows);
    if !preview.is_empty() {
        let _ = writeln!(out, "First {} comments:", preview.len());
        out.push_str(&render_preview(preview));
    }

    out
}

/// Write every classification as CSV: `Comment,Sentiment,Confidence`.
pub fn write_csv<W: io::Write>(report: &AnalysisReport, writer: W) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(CSV_HEADER)?;

    for row in &report.results {
        let score = format!("{:.4}", row.score);
        csv.write_record([row.text.as_str(), row.label.as_str(), score.as_str()])?;
    }

    csv.flush()?;
    Ok(())
}

/// Write the CSV export to `path`, replacing any existing file.
pub fn save_csv(report: &AnalysisReport, path: impl AsRef<Path>) -> Result<()> {
    let file = std::fs::File::create(path)?;
    write_csv(report, io::BufWriter::new(file))
}

/// Single-line, character-safe truncation for display.
fn truncate_text(text: &str, max_chars: usize) -> String {
    let flat: String = text
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect();

    if flat.chars().count() <= max_chars {
        flat
    } else {
        let cut: String = flat.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{cut}...")
    }
}
