//! Data models for the compliance analyzer.
//!
//! This module contains the document shapes read from disk (gap analysis,
//! requirements, roadmap) and the derived records built from them.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Impact tier of a compliance gap.
///
/// Only the exact canonical labels map to known variants. Anything else is
/// kept verbatim in `Other` and written back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
    Other(String),
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Critical => write!(f, "Critical"),
            Severity::High => write!(f, "High"),
            Severity::Medium => write!(f, "Medium"),
            Severity::Low => write!(f, "Low"),
            Severity::Other(s) => write!(f, "{}", s),
        }
    }
}

impl From<&str> for Severity {
    fn from(s: &str) -> Self {
        match s {
            "Critical" => Severity::Critical,
            "High" => Severity::High,
            "Medium" => Severity::Medium,
            "Low" => Severity::Low,
            _ => Severity::Other(s.to_string()),
        }
    }
}

impl From<String> for Severity {
    fn from(s: String) -> Self {
        Severity::from(s.as_str())
    }
}

impl From<Severity> for String {
    fn from(s: Severity) -> Self {
        s.to_string()
    }
}

impl Severity {
    /// The four tiers in display order.
    pub const KNOWN: [Severity; 4] = [
        Severity::Critical,
        Severity::High,
        Severity::Medium,
        Severity::Low,
    ];
}

/// Compliance state label. Independent of severity and of the score band.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Status {
    Compliant,
    Partial,
    NonCompliant,
    Other(String),
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Compliant => write!(f, "Compliant"),
            Status::Partial => write!(f, "Partial"),
            Status::NonCompliant => write!(f, "Non-Compliant"),
            Status::Other(s) => write!(f, "{}", s),
        }
    }
}

impl From<&str> for Status {
    fn from(s: &str) -> Self {
        match s {
            "Compliant" => Status::Compliant,
            "Partial" => Status::Partial,
            "Non-Compliant" => Status::NonCompliant,
            _ => Status::Other(s.to_string()),
        }
    }
}

impl From<String> for Status {
    fn from(s: String) -> Self {
        Status::from(s.as_str())
    }
}

impl From<Status> for String {
    fn from(s: Status) -> Self {
        s.to_string()
    }
}

impl Status {
    /// Status filter options in the order the findings page offers them.
    pub const KNOWN: [Status; 3] = [Status::NonCompliant, Status::Partial, Status::Compliant];
}

/// Priority of a remediation phase or task.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Priority {
    Critical,
    High,
    Medium,
    Low,
    Other(String),
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::Critical => write!(f, "Critical"),
            Priority::High => write!(f, "High"),
            Priority::Medium => write!(f, "Medium"),
            Priority::Low => write!(f, "Low"),
            Priority::Other(s) => write!(f, "{}", s),
        }
    }
}

impl From<&str> for Priority {
    fn from(s: &str) -> Self {
        match s {
            "Critical" => Priority::Critical,
            "High" => Priority::High,
            "Medium" => Priority::Medium,
            "Low" => Priority::Low,
            _ => Priority::Other(s.to_string()),
        }
    }
}

impl From<String> for Priority {
    fn from(s: String) -> Self {
        Priority::from(s.as_str())
    }
}

impl From<Priority> for String {
    fn from(p: Priority) -> Self {
        p.to_string()
    }
}

/// Estimated effort of a remediation task.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Effort {
    Low,
    Medium,
    High,
    Other(String),
}

impl fmt::Display for Effort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Effort::Low => write!(f, "Low"),
            Effort::Medium => write!(f, "Medium"),
            Effort::High => write!(f, "High"),
            Effort::Other(s) => write!(f, "{}", s),
        }
    }
}

impl From<&str> for Effort {
    fn from(s: &str) -> Self {
        match s {
            "Low" => Effort::Low,
            "Medium" => Effort::Medium,
            "High" => Effort::High,
            _ => Effort::Other(s.to_string()),
        }
    }
}

impl From<String> for Effort {
    fn from(s: String) -> Self {
        Effort::from(s.as_str())
    }
}

impl From<Effort> for String {
    fn from(e: Effort) -> Self {
        e.to_string()
    }
}

/// One graded regulatory requirement, as stored in the gap analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequirementAssessment {
    /// Unique identifier, e.g. "ART-9".
    pub req_id: String,
    pub title: String,
    /// Article reference in the regulation.
    pub article: String,
    /// Grouping label, e.g. "Data Governance".
    pub category: String,
    /// Compliance score, 0-100.
    pub score: f64,
    /// Stored status. Not re-derived from the score.
    pub status: Status,
    pub severity: Severity,
    pub gap_description: String,
    pub findings: Vec<String>,
    pub evidence_available: Vec<String>,
}

/// Supplied aggregate counts for the whole assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentSummary {
    pub overall_score: f64,
    pub compliant: usize,
    pub partial: usize,
    pub non_compliant: usize,
    pub critical_gaps: usize,
}

/// Who assessed what, and when.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssessmentMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk_classification: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assessment_date: Option<String>,
    #[serde(default, alias = "reviewer", skip_serializing_if = "Option::is_none")]
    pub assessor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_review_date: Option<String>,
    /// Any other keys, kept as-is.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// The gap analysis document.
///
/// `summary` and `assessment_metadata` are only required by the pages that
/// show them, so their absence is reported when they are asked for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GapAnalysisDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assessment_metadata: Option<AssessmentMetadata>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<AssessmentSummary>,
    pub compliance_scores: Vec<RequirementAssessment>,
}

/// Canonical requirement definitions. Passed through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequirementsDocument(pub Value);

impl RequirementsDocument {
    /// Number of top-level entries (array items or object keys).
    pub fn len(&self) -> usize {
        match &self.0 {
            Value::Array(items) => items.len(),
            Value::Object(map) => map.len(),
            _ => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// An individually owned unit of remediation work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemediationTask {
    pub id: String,
    /// The requirement this task remediates.
    pub req_id: String,
    pub title: String,
    pub owner: String,
    pub duration_weeks: u32,
    pub effort: Effort,
    pub priority: Priority,
    pub deliverable: String,
}

/// A time-boxed bundle of remediation tasks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemediationPhase {
    /// 1-based ordinal.
    pub phase_number: u32,
    pub title: String,
    pub priority: Priority,
    #[serde(deserialize_with = "display_text")]
    pub duration: String,
    #[serde(deserialize_with = "display_text")]
    pub estimated_cost: String,
    pub description: String,
    #[serde(deserialize_with = "display_text")]
    pub target_score_improvement: String,
    pub tasks: Vec<RemediationTask>,
}

/// The roadmap document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoadmapDocument {
    pub phases: Vec<RemediationPhase>,
}

/// Projection of a requirement for tabular views.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssessmentRow {
    pub req_id: String,
    pub title: String,
    pub category: String,
    pub article: String,
    pub score: f64,
    pub status: Status,
    pub severity: Severity,
    pub gap_description: String,
    pub findings_count: usize,
    pub evidence_count: usize,
}

impl From<&RequirementAssessment> for AssessmentRow {
    fn from(item: &RequirementAssessment) -> Self {
        Self {
            req_id: item.req_id.clone(),
            title: item.title.clone(),
            category: item.category.clone(),
            article: item.article.clone(),
            score: item.score,
            status: item.status.clone(),
            severity: item.severity.clone(),
            gap_description: item.gap_description.clone(),
            findings_count: item.findings.len(),
            evidence_count: item.evidence_available.len(),
        }
    }
}

/// Mean score of one category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryScore {
    pub category: String,
    /// Rounded to one decimal place.
    pub avg_score: f64,
    pub requirement_count: usize,
}

/// Accepts either a JSON string or a number and keeps it as display text.
fn display_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Text {
        Str(String),
        Num(serde_json::Number),
    }

    Ok(match Text::deserialize(deserializer)? {
        Text::Str(s) => s,
        Text::Num(n) => n.to_string(),
    })
}
