//! Output formatting and persistence for professor summaries.
//!
//! Supports pretty-printing, JSON serialization, and CSV append.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};

use crate::search::ProfessorSummary;
use csv::WriterBuilder;
use std::fs::OpenOptions;
use std::path::Path;

/// Logs a summary using Rust's debug pretty-print format.
pub fn print_pretty(summary: &ProfessorSummary) {
    debug!("{:#?}", summary);
}

/// Logs any serializable value as pretty-printed JSON.
pub fn print_json(value: &impl Serialize) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Flat CSV row for one professor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRow {
    pub generated_at: DateTime<Utc>,
    pub professor_id: String,
    pub name: String,
    pub university: String,
    pub department: String,
    pub rating_count: usize,
    pub average_quality: f64,
    pub average_difficulty: f64,
    pub would_take_again_percent: u8,
    pub five_star: usize,
    pub four_star: usize,
    pub three_star: usize,
    pub two_star: usize,
    pub one_star: usize,
    /// Pipe-separated.
    pub top_tags: String,
}

impl SummaryRow {
    pub fn new(summary: &ProfessorSummary, generated_at: DateTime<Utc>) -> Self {
        let p = &summary.professor;
        let s = &summary.stats;
        let [five_star, four_star, three_star, two_star, one_star] = s.distribution;

        SummaryRow {
            generated_at,
            professor_id: p.id.clone(),
            name: p.name.clone(),
            university: p.university.clone(),
            department: p.department.clone(),
            rating_count: s.rating_count,
            average_quality: s.average_quality,
            average_difficulty: s.average_difficulty,
            would_take_again_percent: s.would_take_again_percent,
            five_star,
            four_star,
            three_star,
            two_star,
            one_star,
            top_tags: s.top_tags.join("|"),
        }
    }
}

/// Appends a [`SummaryRow`] to a CSV file.
///
/// Creates the file with headers if it does not already exist.
pub fn append_record(path: &Path, row: &SummaryRow) -> Result<()> {
    let file_exists = path.exists();
    debug!(path = %path.display(), file_exists, "Appending CSV record");

    let file = OpenOptions::new()
        .append(true)
        .create(true)
        .open(path)
        .with_context(|| format!("failed to open {}", path.display()))?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists) // only for a new file
        .from_writer(file);

    writer.serialize(row)?;
    writer.flush()?;

    Ok(())
}

/// Index of every professor summary, written by `report --json-out`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryIndex<'a> {
    pub generated_at: DateTime<Utc>,
    pub professors: &'a [ProfessorSummary],
}

/// Writes `value` as pretty JSON to `path`.
pub fn write_json(path: &Path, value: &impl Serialize) -> Result<()> {
    let body = serde_json::to_vec_pretty(value)?;
    std::fs::write(path, body).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}
