//! Page view models.
//!
//! Each page of the dashboard is described by a plain, serializable value
//! built from the aggregators. Nothing here knows how the value will be
//! drawn; the generator module renders it as Markdown or JSON.

use crate::analysis::{
    band_color, category_scores, critical_gaps, findings_detail, flatten_tasks,
    gantt_rows, phase_badge, phase_label, phase_summary, score_progression,
    score_zones, severity_color, severity_counts, severity_emoji, status_emoji, summary_stats,
    to_assessment_table, unique_categories, GanttRow, Milestone, ScoreZone, TaskRow,
    COMPLIANT_THRESHOLD, MINIMUM_ACCEPTABLE_SCORE, PARTIAL_THRESHOLD,
};
use crate::error::{AnalyzerError, DataSourceError, Result};
use crate::models::{
    AssessmentMetadata, AssessmentRow, CategoryScore, GapAnalysisDocument, RemediationPhase,
    RequirementAssessment, RequirementsDocument, RoadmapDocument, Severity, Status,
};
use crate::repository::AssessmentRepository;
use serde::Serialize;
use tracing::{debug, warn};

/// Shown on the executive summary while critical obligations are unmet.
pub const LEGAL_EXPOSURE_WARNING: &str = "This system is currently operating as a High-Risk AI \
system under EU AI Act Annex III without meeting mandatory compliance requirements. Continued \
operation without remediation may result in fines of up to €30 million or 6% of global annual \
turnover, whichever is higher. Immediate action is recommended.";

/// Wildcard accepted by every select-style filter.
pub const ALL: &str = "All";

/// The dashboard pages, in navigation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Page {
    ExecutiveSummary,
    GapAnalysis,
    RemediationRoadmap,
    DetailedFindings,
}

impl Page {
    pub const ALL: [Page; 4] = [
        Page::ExecutiveSummary,
        Page::GapAnalysis,
        Page::RemediationRoadmap,
        Page::DetailedFindings,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Page::ExecutiveSummary => "📊 Executive Summary",
            Page::GapAnalysis => "🔍 Gap Analysis",
            Page::RemediationRoadmap => "🗺️ Remediation Roadmap",
            Page::DetailedFindings => "📋 Detailed Findings",
        }
    }
}

/// The value picked in a select-style filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection<T> {
    /// No filtering.
    All,
    Only(T),
}

impl<T> Default for Selection<T> {
    fn default() -> Self {
        Selection::All
    }
}

impl<T: From<String>> Selection<T> {
    /// Parse a selector value; "All" (any case) is the wildcard.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.eq_ignore_ascii_case(ALL) {
            Selection::All
        } else {
            Selection::Only(T::from(raw.to_string()))
        }
    }
}

impl<T: From<String> + std::fmt::Display + Clone> Selection<T> {
    /// Parse a selector value, matching the known variants without regard to
    /// case. Other values are kept verbatim and only match identical labels.
    pub fn parse_among(raw: &str, known: &[T]) -> Self {
        match Selection::<T>::parse(raw) {
            Selection::All => Selection::All,
            Selection::Only(value) => {
                let label = value.to_string();
                known
                    .iter()
                    .find(|k| k.to_string().eq_ignore_ascii_case(&label))
                    .cloned()
                    .map_or(Selection::Only(value), Selection::Only)
            }
        }
    }
}

impl<T: PartialEq> Selection<T> {
    pub fn matches(&self, value: &T) -> bool {
        match self {
            Selection::All => true,
            Selection::Only(wanted) => wanted == value,
        }
    }
}

impl<T: std::fmt::Display> std::fmt::Display for Selection<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Selection::All => write!(f, "{}", ALL),
            Selection::Only(value) => write!(f, "{}", value),
        }
    }
}

/// Anything the findings filter can be applied to.
pub trait Filterable {
    fn status(&self) -> &Status;
    fn severity(&self) -> &Severity;
    fn category(&self) -> &str;
}

impl Filterable for RequirementAssessment {
    fn status(&self) -> &Status {
        &self.status
    }
    fn severity(&self) -> &Severity {
        &self.severity
    }
    fn category(&self) -> &str {
        &self.category
    }
}

impl Filterable for AssessmentRow {
    fn status(&self) -> &Status {
        &self.status
    }
    fn severity(&self) -> &Severity {
        &self.severity
    }
    fn category(&self) -> &str {
        &self.category
    }
}

/// Independent status, severity and category selectors, combined with AND.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FindingsFilter {
    pub status: Selection<Status>,
    pub severity: Selection<Severity>,
    pub category: Selection<String>,
}

impl FindingsFilter {
    /// Build a filter from raw selector values.
    pub fn parse(status: &str, severity: &str, category: &str) -> Self {
        Self {
            status: Selection::parse_among(status, &Status::KNOWN),
            severity: Selection::parse_among(severity, &Severity::KNOWN),
            category: Selection::parse(category),
        }
    }

    pub fn matches<T: Filterable>(&self, item: &T) -> bool {
        self.status.matches(item.status())
            && self.severity.matches(item.severity())
            && match &self.category {
                Selection::All => true,
                Selection::Only(wanted) => wanted == item.category(),
            }
    }

    /// Keep the matching items, preserving order.
    pub fn apply<T: Filterable + Clone>(&self, items: &[T]) -> Vec<T> {
        items
            .iter()
            .filter(|item| self.matches(*item))
            .cloned()
            .collect()
    }

    /// Only the category selector.
    pub fn category_only(&self) -> Self {
        Self {
            category: self.category.clone(),
            ..Self::default()
        }
    }

    /// The status and severity selectors, without the category.
    pub fn without_category(&self) -> Self {
        Self {
            category: Selection::All,
            ..self.clone()
        }
    }
}

/// Settings that shape the views but are not part of the documents.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewOptions {
    pub filter: FindingsFilter,
    pub start_year: i32,
    pub include_legal_warning: bool,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            filter: FindingsFilter::default(),
            start_year: crate::analysis::DEFAULT_START_YEAR,
            include_legal_warning: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiTile {
    pub label: &'static str,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delta: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GaugeBand {
    pub from: f64,
    pub to: f64,
    pub color: &'static str,
}

/// Input for the overall score gauge.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GaugeChart {
    pub title: &'static str,
    pub value: f64,
    pub reference: f64,
    pub threshold: f64,
    pub bands: Vec<GaugeBand>,
}

impl GaugeChart {
    pub fn new(value: f64) -> Self {
        Self {
            title: "Overall Compliance Score",
            value,
            reference: 100.0,
            threshold: COMPLIANT_THRESHOLD,
            bands: vec![
                GaugeBand {
                    from: 0.0,
                    to: PARTIAL_THRESHOLD,
                    color: "#FFE5E5",
                },
                GaugeBand {
                    from: PARTIAL_THRESHOLD,
                    to: COMPLIANT_THRESHOLD,
                    color: "#FFF3E0",
                },
                GaugeBand {
                    from: COMPLIANT_THRESHOLD,
                    to: 100.0,
                    color: "#E8F5E9",
                },
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DonutSlice {
    pub label: Severity,
    pub count: usize,
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExecutiveSummaryView {
    pub metadata: AssessmentMetadata,
    pub kpis: Vec<KpiTile>,
    pub gauge: GaugeChart,
    pub severity_donut: Vec<DonutSlice>,
    pub critical_gaps: Vec<AssessmentRow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legal_warning: Option<&'static str>,
}

/// One bar of the score-by-requirement chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreBar {
    pub req_id: String,
    pub title: String,
    pub score: f64,
    pub status: Status,
    pub color: &'static str,
    pub label: String,
}

/// Closed polygon input for the category radar.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RadarChart {
    pub categories: Vec<String>,
    pub current: Vec<f64>,
    pub target: Vec<f64>,
}

impl RadarChart {
    /// Build from category averages, repeating the first point to close the loop.
    pub fn from_scores(scores: &[CategoryScore]) -> Self {
        let mut categories: Vec<String> = scores.iter().map(|s| s.category.clone()).collect();
        let mut current: Vec<f64> = scores.iter().map(|s| s.avg_score).collect();

        if let (Some(first_category), Some(first_score)) =
            (categories.first().cloned(), current.first().copied())
        {
            categories.push(first_category);
            current.push(first_score);
        }

        let target = vec![100.0; categories.len()];
        Self {
            categories,
            current,
            target,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CellStyle {
    pub background: &'static str,
    pub color: &'static str,
}

const ALERT_STYLE: CellStyle = CellStyle {
    background: "#FFE5E5",
    color: "#CC0000",
};
const CAUTION_STYLE: CellStyle = CellStyle {
    background: "#FFF3E0",
    color: "#CC6600",
};
const OK_STYLE: CellStyle = CellStyle {
    background: "#E8F5E9",
    color: "#006600",
};

pub fn status_style(status: &Status) -> Option<CellStyle> {
    match status {
        Status::NonCompliant => Some(ALERT_STYLE),
        Status::Partial => Some(CAUTION_STYLE),
        Status::Compliant => Some(OK_STYLE),
        Status::Other(_) => None,
    }
}

pub fn severity_style(severity: &Severity) -> Option<CellStyle> {
    match severity {
        Severity::Critical => Some(ALERT_STYLE),
        Severity::High => Some(CAUTION_STYLE),
        _ => None,
    }
}

/// A row of the requirements summary table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryTableRow {
    pub id: String,
    pub article: String,
    pub requirement: String,
    pub category: String,
    pub score: f64,
    pub status: Status,
    pub severity: Severity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_style: Option<CellStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity_style: Option<CellStyle>,
}

impl From<&AssessmentRow> for SummaryTableRow {
    fn from(row: &AssessmentRow) -> Self {
        Self {
            id: row.req_id.clone(),
            article: row.article.clone(),
            requirement: row.title.clone(),
            category: row.category.clone(),
            score: row.score,
            status: row.status.clone(),
            severity: row.severity.clone(),
            status_style: status_style(&row.status),
            severity_style: severity_style(&row.severity),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectOptions {
    pub options: Vec<String>,
    pub selected: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GapAnalysisView {
    pub score_bars: Vec<ScoreBar>,
    pub category_scores: Vec<CategoryScore>,
    pub radar: RadarChart,
    pub summary_table: Vec<SummaryTableRow>,
    pub category_filter: SelectOptions,
    pub filtered: Vec<AssessmentRow>,
    /// Canonical requirement definitions, when available.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requirement_definitions: Option<RequirementsDocument>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressionChart {
    pub milestones: Vec<Milestone>,
    pub minimum_acceptable: f64,
    pub zones: Vec<ScoreZone>,
}

impl Default for ProgressionChart {
    fn default() -> Self {
        Self {
            milestones: score_progression().to_vec(),
            minimum_acceptable: MINIMUM_ACCEPTABLE_SCORE,
            zones: score_zones().to_vec(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhaseCard {
    pub badge: &'static str,
    pub heading: String,
    pub phase: RemediationPhase,
}

impl From<RemediationPhase> for PhaseCard {
    fn from(phase: RemediationPhase) -> Self {
        Self {
            badge: phase_badge(&phase.priority),
            heading: format!(
                "{} | {} | {}",
                phase_label(&phase),
                phase.duration,
                phase.estimated_cost
            ),
            phase,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RemediationRoadmapView {
    pub progression: ProgressionChart,
    pub gantt: Vec<GanttRow>,
    pub phases: Vec<PhaseCard>,
    pub tasks: Vec<TaskRow>,
}

/// A requirement on the detailed findings page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FindingItem {
    pub status_emoji: &'static str,
    pub severity_emoji: &'static str,
    #[serde(flatten)]
    pub record: RequirementAssessment,
}

impl From<RequirementAssessment> for FindingItem {
    fn from(record: RequirementAssessment) -> Self {
        Self {
            status_emoji: status_emoji(&record.status),
            severity_emoji: severity_emoji(&record.severity),
            record,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailedFindingsView {
    pub status_filter: SelectOptions,
    pub severity_filter: SelectOptions,
    pub showing: usize,
    pub total: usize,
    pub findings: Vec<FindingItem>,
}

/// A rendered page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "page", rename_all = "snake_case")]
pub enum PageView {
    ExecutiveSummary(ExecutiveSummaryView),
    GapAnalysis(GapAnalysisView),
    RemediationRoadmap(RemediationRoadmapView),
    DetailedFindings(DetailedFindingsView),
}

impl PageView {
    pub fn page(&self) -> Page {
        match self {
            PageView::ExecutiveSummary(_) => Page::ExecutiveSummary,
            PageView::GapAnalysis(_) => Page::GapAnalysis,
            PageView::RemediationRoadmap(_) => Page::RemediationRoadmap,
            PageView::DetailedFindings(_) => Page::DetailedFindings,
        }
    }
}

/// Build the executive summary.
pub fn executive_summary(
    doc: &GapAnalysisDocument,
    include_legal_warning: bool,
) -> Result<ExecutiveSummaryView> {
    let (summary, metadata) = summary_stats(doc)?;
    let table = to_assessment_table(doc);

    let kpis = vec![
        KpiTile {
            label: "Overall Score",
            value: format!("{}%", summary.overall_score),
            delta: Some(format!("{:.1}% to target", summary.overall_score - 100.0)),
        },
        KpiTile {
            label: "Compliant",
            value: summary.compliant.to_string(),
            delta: None,
        },
        KpiTile {
            label: "Partial",
            value: summary.partial.to_string(),
            delta: None,
        },
        KpiTile {
            label: "Non-Compliant",
            value: summary.non_compliant.to_string(),
            delta: None,
        },
        KpiTile {
            label: "Critical Gaps",
            value: summary.critical_gaps.to_string(),
            delta: None,
        },
    ];

    let severity_donut = severity_counts(&table)
        .into_iter()
        .map(|(label, count)| DonutSlice {
            color: severity_color(&label),
            label,
            count,
        })
        .collect();

    Ok(ExecutiveSummaryView {
        metadata,
        kpis,
        gauge: GaugeChart::new(summary.overall_score),
        severity_donut,
        critical_gaps: critical_gaps(&table),
        legal_warning: include_legal_warning.then_some(LEGAL_EXPOSURE_WARNING),
    })
}

/// Build the gap analysis page. Only the category selector applies here.
pub fn gap_analysis(
    doc: &GapAnalysisDocument,
    filter: &FindingsFilter,
    definitions: Option<RequirementsDocument>,
) -> GapAnalysisView {
    let table = to_assessment_table(doc);
    let scores = category_scores(&table);

    let score_bars = table
        .iter()
        .map(|row| ScoreBar {
            req_id: row.req_id.clone(),
            title: row.title.clone(),
            score: row.score,
            status: row.status.clone(),
            color: band_color(row.score),
            label: format!("{}% - {}", row.score, row.status),
        })
        .collect();

    let mut options = vec![ALL.to_string()];
    options.extend(unique_categories(&table));

    GapAnalysisView {
        score_bars,
        radar: RadarChart::from_scores(&scores),
        category_scores: scores,
        summary_table: table.iter().map(SummaryTableRow::from).collect(),
        category_filter: SelectOptions {
            options,
            selected: filter.category.to_string(),
        },
        filtered: filter.category_only().apply(&table),
        requirement_definitions: definitions,
    }
}

/// Build the remediation roadmap page.
pub fn remediation_roadmap(doc: &RoadmapDocument, start_year: i32) -> Result<RemediationRoadmapView> {
    Ok(RemediationRoadmapView {
        progression: ProgressionChart::default(),
        gantt: gantt_rows(doc, start_year)?,
        phases: phase_summary(doc).into_iter().map(PhaseCard::from).collect(),
        tasks: flatten_tasks(doc),
    })
}

/// Build the detailed findings page. Status and severity selectors apply.
pub fn detailed_findings(doc: &GapAnalysisDocument, filter: &FindingsFilter) -> DetailedFindingsView {
    let findings = findings_detail(doc);
    let filtered = filter.without_category().apply(&findings);

    let mut status_options = vec![ALL.to_string()];
    status_options.extend(Status::KNOWN.iter().map(ToString::to_string));
    let mut severity_options = vec![ALL.to_string()];
    severity_options.extend(Severity::KNOWN.iter().map(ToString::to_string));

    DetailedFindingsView {
        status_filter: SelectOptions {
            options: status_options,
            selected: filter.status.to_string(),
        },
        severity_filter: SelectOptions {
            options: severity_options,
            selected: filter.severity.to_string(),
        },
        showing: filtered.len(),
        total: findings.len(),
        findings: filtered.into_iter().map(FindingItem::from).collect(),
    }
}

/// Load the documents a page needs and build its view.
pub fn build_page(
    repo: &AssessmentRepository,
    page: Page,
    options: &ViewOptions,
) -> Result<PageView> {
    debug!("Building page {:?}", page);

    Ok(match page {
        Page::ExecutiveSummary => PageView::ExecutiveSummary(executive_summary(
            &repo.load_gap_analysis()?,
            options.include_legal_warning,
        )?),
        Page::GapAnalysis => {
            let doc = repo.load_gap_analysis()?;
            let definitions = optional_requirements(repo)?;
            PageView::GapAnalysis(gap_analysis(&doc, &options.filter, definitions))
        }
        Page::RemediationRoadmap => PageView::RemediationRoadmap(remediation_roadmap(
            &repo.load_roadmap()?,
            options.start_year,
        )?),
        Page::DetailedFindings => PageView::DetailedFindings(detailed_findings(
            &repo.load_gap_analysis()?,
            &options.filter,
        )),
    })
}

/// The requirements document is reference material: a missing file is
/// tolerated, a broken one is not.
fn optional_requirements(repo: &AssessmentRepository) -> Result<Option<RequirementsDocument>> {
    match repo.load_requirements() {
        Ok(doc) => Ok(Some(doc)),
        Err(AnalyzerError::DataSource(DataSourceError::NotFound(path))) => {
            warn!(
                "Requirements document not found at {}, continuing without it",
                path.display()
            );
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::effort_icon;
    use crate::models::{AssessmentSummary, Effort, Priority, RemediationTask};
    use std::path::Path;
    use tempfile::TempDir;

    fn record(
        req_id: &str,
        category: &str,
        score: f64,
        status: &str,
        severity: &str,
    ) -> RequirementAssessment {
        RequirementAssessment {
            req_id: req_id.to_string(),
            title: format!("Requirement {}", req_id),
            article: format!("Article {}", req_id),
            category: category.to_string(),
            score,
            status: Status::from(status),
            severity: Severity::from(severity),
            gap_description: "Gap".to_string(),
            findings: vec!["Finding".to_string()],
            evidence_available: vec![],
        }
    }

    fn create_test_document() -> GapAnalysisDocument {
        GapAnalysisDocument {
            assessment_metadata: Some(AssessmentMetadata {
                system_name: Some("Resume Screening Tool".to_string()),
                ..AssessmentMetadata::default()
            }),
            summary: Some(AssessmentSummary {
                overall_score: 32.5,
                compliant: 1,
                partial: 1,
                non_compliant: 2,
                critical_gaps: 2,
            }),
            compliance_scores: vec![
                record("R1", "Risk", 20.0, "Non-Compliant", "Critical"),
                record("R2", "Data", 45.0, "Partial", "Critical"),
                record("R3", "Risk", 10.0, "Non-Compliant", "High"),
                record("R4", "Docs", 75.0, "Compliant", "Low"),
            ],
        }
    }

    fn shipped_repository() -> AssessmentRepository {
        AssessmentRepository::new(Path::new(env!("CARGO_MANIFEST_DIR")).join("data"))
    }

    #[test]
    fn test_selection_parse() {
        assert_eq!(Selection::<Status>::parse("All"), Selection::All);
        assert_eq!(Selection::<Status>::parse(" all "), Selection::All);
        assert_eq!(
            Selection::<Status>::parse("Partial"),
            Selection::Only(Status::Partial)
        );
        assert_eq!(Selection::<Status>::parse("Partial").to_string(), "Partial");
    }

    #[test]
    fn test_selection_parse_among_ignores_case_for_known_labels() {
        assert_eq!(
            Selection::parse_among("non-compliant", &Status::KNOWN),
            Selection::Only(Status::NonCompliant)
        );
        assert_eq!(
            Selection::parse_among("HIGH", &Severity::KNOWN),
            Selection::Only(Severity::High)
        );
        assert_eq!(
            Selection::parse_among("Exempt", &Status::KNOWN),
            Selection::Only(Status::Other("Exempt".to_string()))
        );

        let filter = FindingsFilter::parse("partial", "all", "All");
        assert_eq!(filter.status, Selection::Only(Status::Partial));
        assert_eq!(filter.severity, Selection::All);
    }

    #[test]
    fn test_filter_all_is_identity() {
        let findings = findings_detail(&create_test_document());
        let filter = FindingsFilter::parse("All", "All", "All");

        assert_eq!(filter.apply(&findings), findings);
    }

    #[test]
    fn test_filter_is_idempotent() {
        let findings = findings_detail(&create_test_document());
        let filter = FindingsFilter::parse("Non-Compliant", "All", "All");

        let once = filter.apply(&findings);
        let twice = filter.apply(&once);
        assert_eq!(once.len(), 2);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_filter_combines_with_and() {
        let findings = findings_detail(&create_test_document());
        let filter = FindingsFilter::parse("Non-Compliant", "Critical", "All");

        let ids: Vec<String> = filter.apply(&findings).into_iter().map(|f| f.req_id).collect();
        assert_eq!(ids, vec!["R1".to_string()]);
    }

    #[test]
    fn test_unknown_filter_value_matches_nothing() {
        let findings = findings_detail(&create_test_document());
        let filter = FindingsFilter::parse("Exempt", "All", "All");

        assert!(filter.apply(&findings).is_empty());
    }

    #[test]
    fn test_executive_summary() {
        let view = executive_summary(&create_test_document(), true).unwrap();

        assert_eq!(view.kpis.len(), 5);
        assert_eq!(view.kpis[0].value, "32.5%");
        assert_eq!(view.kpis[0].delta.as_deref(), Some("-67.5% to target"));
        assert_eq!(view.kpis[4].value, "2");
        assert_eq!(view.gauge.threshold, 70.0);
        assert_eq!(view.gauge.bands.len(), 3);

        let donut_total: usize = view.severity_donut.iter().map(|s| s.count).sum();
        assert_eq!(donut_total, 4);
        assert_eq!(view.severity_donut[0].label, Severity::Critical);
        assert_eq!(view.severity_donut[0].color, "#FF4444");

        let gap_ids: Vec<&str> = view.critical_gaps.iter().map(|g| g.req_id.as_str()).collect();
        assert_eq!(gap_ids, vec!["R1", "R2"]);
        assert!(view.legal_warning.is_some());
    }

    #[test]
    fn test_executive_summary_without_summary_fails() {
        let mut doc = create_test_document();
        doc.summary = None;
        assert!(executive_summary(&doc, false).is_err());
    }

    #[test]
    fn test_gap_analysis_view() {
        let filter = FindingsFilter::parse("Partial", "All", "Risk");
        let view = gap_analysis(&create_test_document(), &filter, None);

        assert_eq!(view.score_bars[0].label, "20% - Non-Compliant");
        assert_eq!(view.score_bars[0].color, "#FF4444");
        assert_eq!(view.score_bars[3].color, "#32CD32");

        assert_eq!(view.radar.categories, vec!["Risk", "Data", "Docs", "Risk"]);
        assert_eq!(view.radar.current, vec![15.0, 45.0, 75.0, 15.0]);
        assert_eq!(view.radar.target, vec![100.0; 4]);

        assert_eq!(view.category_filter.options, vec!["All", "Risk", "Data", "Docs"]);
        assert_eq!(view.category_filter.selected, "Risk");

        // The status selector does not apply on this page.
        let ids: Vec<&str> = view.filtered.iter().map(|r| r.req_id.as_str()).collect();
        assert_eq!(ids, vec!["R1", "R3"]);

        assert_eq!(view.summary_table[1].status_style, Some(CAUTION_STYLE));
        assert_eq!(view.summary_table[3].severity_style, None);
    }

    #[test]
    fn test_radar_for_empty_table() {
        let radar = RadarChart::from_scores(&[]);
        assert!(radar.categories.is_empty());
        assert!(radar.target.is_empty());
    }

    #[test]
    fn test_detailed_findings_view() {
        let filter = FindingsFilter::parse("All", "Critical", "Docs");
        let view = detailed_findings(&create_test_document(), &filter);

        assert_eq!(view.total, 4);
        assert_eq!(view.showing, 2);
        assert_eq!(view.findings[0].status_emoji, "❌");
        assert_eq!(view.findings[1].severity_emoji, "🔴");
        assert_eq!(
            view.status_filter.options,
            vec!["All", "Non-Compliant", "Partial", "Compliant"]
        );
        assert_eq!(view.severity_filter.selected, "Critical");
    }

    #[test]
    fn test_remediation_roadmap_view() {
        let doc = RoadmapDocument {
            phases: vec![RemediationPhase {
                phase_number: 1,
                title: "Critical Risk Controls".to_string(),
                priority: Priority::Critical,
                duration: "Months 1-3".to_string(),
                estimated_cost: "€85,000".to_string(),
                description: "Stop automated rejections".to_string(),
                target_score_improvement: "32.5% → 50%".to_string(),
                tasks: vec![RemediationTask {
                    id: "T1.1".to_string(),
                    req_id: "ART-14".to_string(),
                    title: "Human review".to_string(),
                    owner: "HR Operations Lead".to_string(),
                    duration_weeks: 6,
                    effort: Effort::High,
                    priority: Priority::Critical,
                    deliverable: "Review workflow".to_string(),
                }],
            }],
        };

        let view = remediation_roadmap(&doc, 2026).unwrap();
        assert_eq!(view.progression.milestones.len(), 5);
        assert_eq!(view.phases[0].badge, "🔴");
        assert_eq!(
            view.phases[0].heading,
            "Phase 1: Critical Risk Controls | Months 1-3 | €85,000"
        );
        assert_eq!(view.gantt.len(), 1);
        assert_eq!(view.tasks[0].effort, effort_icon(&Effort::High));
    }

    #[test]
    fn test_page_view_serializes_with_tag() {
        let view = PageView::DetailedFindings(detailed_findings(
            &create_test_document(),
            &FindingsFilter::default(),
        ));
        let json = serde_json::to_value(&view).unwrap();

        assert_eq!(json["page"], "detailed_findings");
        assert_eq!(json["findings"][0]["req_id"], "R1");
        assert_eq!(json["findings"][0]["status_emoji"], "❌");
    }

    #[test]
    fn test_build_every_page_from_shipped_data() {
        let repo = shipped_repository();
        let options = ViewOptions::default();

        for page in Page::ALL {
            let view = build_page(&repo, page, &options).unwrap();
            assert_eq!(view.page(), page);
        }
    }

    #[test]
    fn test_gap_analysis_tolerates_missing_requirements() {
        let dir = TempDir::new().unwrap();
        std::fs::copy(
            shipped_repository().data_dir().join("gap_analysis.json"),
            dir.path().join("gap_analysis.json"),
        )
        .unwrap();
        let repo = AssessmentRepository::new(dir.path());

        match build_page(&repo, Page::GapAnalysis, &ViewOptions::default()).unwrap() {
            PageView::GapAnalysis(view) => assert!(view.requirement_definitions.is_none()),
            other => panic!("unexpected page {:?}", other.page()),
        }
    }

    #[test]
    fn test_roadmap_page_requires_roadmap() {
        let dir = TempDir::new().unwrap();
        let repo = AssessmentRepository::new(dir.path());

        let err = build_page(&repo, Page::RemediationRoadmap, &ViewOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            AnalyzerError::DataSource(DataSourceError::NotFound(_))
        ));
    }
}
