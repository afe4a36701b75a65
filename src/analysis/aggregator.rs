//! Compliance aggregation and lookups.
//!
//! This module turns the gap analysis document into the tabular model used
//! by the pages and computes the derived statistics (category averages,
//! critical gaps, severity distribution, data-quality cross-checks).

use crate::error::{Result, SchemaError};
use crate::models::{
    AssessmentMetadata, AssessmentRow, AssessmentSummary, CategoryScore, GapAnalysisDocument,
    RequirementAssessment, Severity, Status,
};
use std::collections::{HashMap, HashSet};
use std::fmt;
use tracing::{debug, warn};

/// Colour used for any value outside a lookup table.
pub const DEFAULT_COLOR: &str = "#808080";

/// Scores at or above this are in the compliant band.
pub const COMPLIANT_THRESHOLD: f64 = 70.0;

/// Scores at or above this (and below `COMPLIANT_THRESHOLD`) are partial.
pub const PARTIAL_THRESHOLD: f64 = 40.0;

/// Project the document's requirements into table rows, in source order.
pub fn to_assessment_table(doc: &GapAnalysisDocument) -> Vec<AssessmentRow> {
    doc.compliance_scores.iter().map(AssessmentRow::from).collect()
}

/// Extract the stored summary and metadata.
pub fn summary_stats(doc: &GapAnalysisDocument) -> Result<(AssessmentSummary, AssessmentMetadata)> {
    let summary = doc.summary.clone().ok_or_else(|| missing_key("summary"))?;
    let metadata = doc
        .assessment_metadata
        .clone()
        .ok_or_else(|| missing_key("assessment_metadata"))?;

    Ok((summary, metadata))
}

/// The raw requirement records, for detail views.
pub fn findings_detail(doc: &GapAnalysisDocument) -> Vec<RequirementAssessment> {
    doc.compliance_scores.clone()
}

/// Map severity levels to dashboard colours.
pub fn severity_color(severity: &Severity) -> &'static str {
    match severity {
        Severity::Critical => "#FF4444",
        Severity::High => "#FF8C00",
        Severity::Medium => "#FFD700",
        Severity::Low => "#32CD32",
        Severity::Other(_) => DEFAULT_COLOR,
    }
}

/// Map compliance status to dashboard colours.
pub fn status_color(status: &Status) -> &'static str {
    match status {
        Status::Compliant => "#32CD32",
        Status::Partial => "#FF8C00",
        Status::NonCompliant => "#FF4444",
        Status::Other(_) => DEFAULT_COLOR,
    }
}

pub fn status_emoji(status: &Status) -> &'static str {
    match status {
        Status::Compliant => "✅",
        Status::Partial => "⚠️",
        Status::NonCompliant => "❌",
        Status::Other(_) => "❓",
    }
}

pub fn severity_emoji(severity: &Severity) -> &'static str {
    match severity {
        Severity::Critical => "🔴",
        Severity::High => "🟠",
        Severity::Medium => "🟡",
        Severity::Low => "🟢",
        Severity::Other(_) => "⚪",
    }
}

/// The status a score would have if status followed the score band.
///
/// Only used for reporting; stored statuses are never replaced.
pub fn score_band(score: f64) -> Status {
    if score >= COMPLIANT_THRESHOLD {
        Status::Compliant
    } else if score >= PARTIAL_THRESHOLD {
        Status::Partial
    } else {
        Status::NonCompliant
    }
}

/// Bar colour for a score, by band.
pub fn band_color(score: f64) -> &'static str {
    status_color(&score_band(score))
}

/// Round to one decimal place, half away from zero.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Average score per category, in the order categories first appear.
pub fn category_scores(table: &[AssessmentRow]) -> Vec<CategoryScore> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut totals: Vec<(&str, f64, usize)> = Vec::new();

    for row in table {
        let slot = *index.entry(row.category.as_str()).or_insert_with(|| {
            totals.push((row.category.as_str(), 0.0, 0));
            totals.len() - 1
        });
        totals[slot].1 += row.score;
        totals[slot].2 += 1;
    }

    totals
        .into_iter()
        .map(|(category, sum, count)| CategoryScore {
            category: category.to_string(),
            avg_score: round1(sum / count as f64),
            requirement_count: count,
        })
        .collect()
}

/// Critical-severity rows, lowest score first.
pub fn critical_gaps(table: &[AssessmentRow]) -> Vec<AssessmentRow> {
    let mut gaps: Vec<AssessmentRow> = table
        .iter()
        .filter(|row| row.severity == Severity::Critical)
        .cloned()
        .collect();

    gaps.sort_by(|a, b| a.score.total_cmp(&b.score));
    gaps
}

/// Number of rows per severity, most frequent first.
///
/// Ties keep the order in which the severities first appear.
pub fn severity_counts(table: &[AssessmentRow]) -> Vec<(Severity, usize)> {
    let mut counts: Vec<(Severity, usize)> = Vec::new();

    for row in table {
        match counts.iter_mut().find(|(s, _)| *s == row.severity) {
            Some((_, count)) => *count += 1,
            None => counts.push((row.severity.clone(), 1)),
        }
    }

    counts.sort_by_key(|(_, count)| std::cmp::Reverse(*count));
    counts
}

/// Distinct categories in first-seen order.
pub fn unique_categories(table: &[AssessmentRow]) -> Vec<String> {
    let mut seen = HashSet::new();
    table
        .iter()
        .filter(|row| seen.insert(row.category.as_str()))
        .map(|row| row.category.clone())
        .collect()
}

/// A single inconsistency between stored data and what the rows imply.
#[derive(Debug, Clone, PartialEq)]
pub enum DataQualityWarning {
    /// A summary count does not match the count derived from the rows.
    CountMismatch {
        field: &'static str,
        stored: usize,
        derived: usize,
    },
    /// The same requirement id appears more than once.
    DuplicateReqId(String),
    /// A score outside 0-100.
    ScoreOutOfRange { req_id: String, score: f64 },
    /// The stored status differs from the score band.
    StatusBandMismatch {
        req_id: String,
        score: f64,
        status: Status,
    },
}

impl fmt::Display for DataQualityWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataQualityWarning::CountMismatch {
                field,
                stored,
                derived,
            } => write!(
                f,
                "summary.{} is {} but the requirements imply {}",
                field, stored, derived
            ),
            DataQualityWarning::DuplicateReqId(id) => write!(f, "duplicate req_id {}", id),
            DataQualityWarning::ScoreOutOfRange { req_id, score } => {
                write!(f, "{} has score {} outside 0-100", req_id, score)
            }
            DataQualityWarning::StatusBandMismatch {
                req_id,
                score,
                status,
            } => write!(
                f,
                "{} is marked {} but its score {} falls in the {} band",
                req_id,
                status,
                score,
                score_band(*score)
            ),
        }
    }
}

/// Result of cross-checking a gap analysis document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataQualityReport {
    pub warnings: Vec<DataQualityWarning>,
}

impl DataQualityReport {
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// Recount the summary from the rows and check per-row invariants.
///
/// Mismatches are logged and returned, never raised.
pub fn check_data_quality(doc: &GapAnalysisDocument) -> DataQualityReport {
    let table = to_assessment_table(doc);
    let mut report = DataQualityReport::default();

    if let Some(summary) = &doc.summary {
        let derived = [
            ("compliant", summary.compliant, count_status(&table, Status::Compliant)),
            ("partial", summary.partial, count_status(&table, Status::Partial)),
            (
                "non_compliant",
                summary.non_compliant,
                count_status(&table, Status::NonCompliant),
            ),
            (
                "critical_gaps",
                summary.critical_gaps,
                table
                    .iter()
                    .filter(|r| r.severity == Severity::Critical)
                    .count(),
            ),
        ];

        for (field, stored, derived) in derived {
            if stored != derived {
                report.warnings.push(DataQualityWarning::CountMismatch {
                    field,
                    stored,
                    derived,
                });
            }
        }
    } else {
        debug!("No summary in document, skipping count cross-check");
    }

    let mut seen = HashSet::new();
    for row in &table {
        if !seen.insert(row.req_id.as_str()) {
            report
                .warnings
                .push(DataQualityWarning::DuplicateReqId(row.req_id.clone()));
        }

        if !(0.0..=100.0).contains(&row.score) {
            report.warnings.push(DataQualityWarning::ScoreOutOfRange {
                req_id: row.req_id.clone(),
                score: row.score,
            });
        }

        let known_status = !matches!(row.status, Status::Other(_));
        if known_status && row.status != score_band(row.score) {
            report.warnings.push(DataQualityWarning::StatusBandMismatch {
                req_id: row.req_id.clone(),
                score: row.score,
                status: row.status.clone(),
            });
        }
    }

    for warning in &report.warnings {
        warn!("Data quality: {}", warning);
    }

    report
}

fn missing_key(key: &'static str) -> SchemaError {
    SchemaError::MissingKey {
        document: "gap analysis".to_string(),
        key,
    }
}

fn count_status(table: &[AssessmentRow], status: Status) -> usize {
    table.iter().filter(|r| r.status == status).count()
}
