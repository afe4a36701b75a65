//! Markdown and JSON rendering of page views.
//!
//! This module renders the page view models as a Markdown dashboard or
//! as pretty-printed JSON for other front ends.

use crate::analysis::score_band;
use crate::models::AssessmentMetadata;
use crate::report::views::{
    DetailedFindingsView, ExecutiveSummaryView, FindingItem, GapAnalysisView, PageView,
    RemediationRoadmapView,
};
use anyhow::Result;
use std::io::Write;
use std::path::Path;

/// Generate a Markdown document containing every given page.
pub fn generate_markdown_report(pages: &[PageView]) -> String {
    let mut output = String::new();

    // Title
    output.push_str("# ⚖️ EU AI Act Compliance Analyzer\n\n");

    // Table of contents
    if pages.len() > 1 {
        output.push_str(&generate_table_of_contents(pages));
    }

    for page in pages {
        output.push_str(&generate_page_section(page));
    }

    // Footer
    output.push_str(&generate_footer());

    output
}

/// Generate the section for one page.
pub fn generate_page_section(page: &PageView) -> String {
    match page {
        PageView::ExecutiveSummary(view) => generate_executive_summary(view),
        PageView::GapAnalysis(view) => generate_gap_analysis(view),
        PageView::RemediationRoadmap(view) => generate_roadmap(view),
        PageView::DetailedFindings(view) => generate_detailed_findings(view),
    }
}

fn anchor(title: &str) -> String {
    title
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == ' ' || *c == '-')
        .collect::<String>()
        .trim()
        .replace(' ', "-")
        .to_lowercase()
}

/// Text for a table cell. A bare `|` would end the cell early.
fn cell(value: impl std::fmt::Display) -> String {
    value.to_string().replace('|', "\\|")
}

/// Generate the table of contents.
fn generate_table_of_contents(pages: &[PageView]) -> String {
    let mut toc = String::new();

    toc.push_str("## Table of Contents\n\n");
    for page in pages {
        let title = page.page().title();
        toc.push_str(&format!("- [{}](#{})\n", title, anchor(title)));
    }
    toc.push('\n');

    toc
}

/// Generate the system-under-review block.
fn generate_metadata_section(metadata: &AssessmentMetadata) -> String {
    let mut section = String::new();

    let fields = [
        ("System Under Review", &metadata.system_name),
        ("Vendor", &metadata.vendor),
        ("Classification", &metadata.risk_classification),
        ("Assessment Date", &metadata.assessment_date),
        ("Next Review", &metadata.next_review_date),
        ("Assessor", &metadata.assessor),
    ];

    for (label, value) in fields {
        if let Some(value) = value {
            section.push_str(&format!("- **{}:** {}\n", label, value));
        }
    }

    for (key, value) in &metadata.extra {
        let text = match value {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        section.push_str(&format!("- **{}:** {}\n", key, text));
    }

    if !section.is_empty() {
        section.push('\n');
    }

    section
}

fn generate_executive_summary(view: &ExecutiveSummaryView) -> String {
    let mut section = String::new();

    section.push_str("## 📊 Executive Summary\n\n");
    section.push_str(&generate_metadata_section(&view.metadata));

    // KPI tiles
    let labels: Vec<&str> = view.kpis.iter().map(|k| k.label).collect();
    let values: Vec<&str> = view.kpis.iter().map(|k| k.value.as_str()).collect();
    section.push_str(&format!("| {} |\n", labels.join(" | ")));
    section.push_str(&format!("|{}\n", ":---:|".repeat(labels.len())));
    section.push_str(&format!("| {} |\n\n", values.join(" | ")));

    for kpi in &view.kpis {
        if let Some(ref delta) = kpi.delta {
            section.push_str(&format!("*{}: {}*\n\n", kpi.label, delta));
        }
    }

    // Gauge
    section.push_str(&format!("### {}\n\n", view.gauge.title));
    section.push_str(&format!(
        "**{}%** of {} ({} band, minimum acceptable {}%)\n\n",
        view.gauge.value,
        view.gauge.reference,
        score_band(view.gauge.value),
        view.gauge.threshold
    ));

    // Severity distribution
    if !view.severity_donut.is_empty() {
        section.push_str("### Gap Severity Distribution\n\n");
        section.push_str("| Severity | Count |\n");
        section.push_str("|:---|:---:|\n");
        for slice in &view.severity_donut {
            section.push_str(&format!("| {} | {} |\n", cell(&slice.label), slice.count));
        }
        section.push('\n');
    }

    // Critical gaps
    section.push_str("### 🚨 Critical Gaps Requiring Immediate Action\n\n");
    if view.critical_gaps.is_empty() {
        section.push_str("No critical gaps.\n\n");
    }
    for gap in &view.critical_gaps {
        section.push_str(&format!(
            "#### ❌ {} — {} | Score: {}%\n\n",
            gap.req_id, gap.title, gap.score
        ));
        section.push_str(&format!("- **Article:** {}\n", gap.article));
        section.push_str(&format!("- **Category:** {}\n", gap.category));
        section.push_str(&format!("- **Gap Description:** {}\n\n", gap.gap_description));
    }

    if let Some(warning) = view.legal_warning {
        section.push_str(&format!("> ⚠️ **Legal Exposure Warning**\n>\n> {}\n\n", warning));
    }

    section
}

fn generate_gap_analysis(view: &GapAnalysisView) -> String {
    let mut section = String::new();

    section.push_str("## 🔍 Gap Analysis\n\n");

    // Score by requirement
    section.push_str("### Compliance Score by Requirement\n\n");
    section.push_str("| Requirement | Score | |\n");
    section.push_str("|:---|:---|:---|\n");
    for bar in &view.score_bars {
        let filled = (bar.score.clamp(0.0, 100.0) / 10.0).round() as usize;
        section.push_str(&format!(
            "| {} | {}{} | {} |\n",
            cell(&bar.req_id),
            "█".repeat(filled),
            "░".repeat(10 - filled),
            cell(&bar.label)
        ));
    }
    section.push('\n');

    // Category averages
    section.push_str("### Compliance by Category\n\n");
    section.push_str("| Category | Requirements | Average Score |\n");
    section.push_str("|:---|:---:|:---:|\n");
    for score in &view.category_scores {
        section.push_str(&format!(
            "| {} | {} | {}% |\n",
            cell(&score.category),
            score.requirement_count,
            score.avg_score
        ));
    }
    section.push('\n');

    // Summary table
    section.push_str("### 📋 Requirements Summary Table\n\n");
    section.push_str("| ID | Article | Requirement | Category | Score (%) | Status | Severity |\n");
    section.push_str("|:---|:---|:---|:---|:---:|:---|:---|\n");
    for row in &view.summary_table {
        let status = if row.status_style.is_some() {
            format!("**{}**", cell(&row.status))
        } else {
            cell(&row.status)
        };
        let severity = if row.severity_style.is_some() {
            format!("**{}**", cell(&row.severity))
        } else {
            cell(&row.severity)
        };
        section.push_str(&format!(
            "| {} | {} | {} | {} | {} | {} | {} |\n",
            cell(&row.id),
            cell(&row.article),
            cell(&row.requirement),
            cell(&row.category),
            row.score,
            status,
            severity
        ));
    }
    section.push('\n');

    // Category filter
    section.push_str(&format!(
        "### 🔎 Filter by Category: {}\n\n",
        view.category_filter.selected
    ));
    section.push_str(&format!(
        "*Options: {}*\n\n",
        view.category_filter.options.join(", ")
    ));
    section.push_str("| ID | Requirement | Score | Status | Severity | Gap |\n");
    section.push_str("|:---|:---|:---:|:---|:---|:---|\n");
    for row in &view.filtered {
        section.push_str(&format!(
            "| {} | {} | {} | {} | {} | {} |\n",
            cell(&row.req_id),
            cell(&row.title),
            row.score,
            cell(&row.status),
            cell(&row.severity),
            cell(&row.gap_description)
        ));
    }
    section.push('\n');

    match view.requirement_definitions {
        Some(ref definitions) if !definitions.is_empty() => {
            section.push_str(&format!(
                "*{} canonical requirement definitions loaded.*\n\n",
                definitions.len()
            ));
        }
        Some(_) => section.push_str("*Requirement definitions document is empty.*\n\n"),
        None => {}
    }

    section
}

fn generate_roadmap(view: &RemediationRoadmapView) -> String {
    let mut section = String::new();

    section.push_str("## 🗺️ Remediation Roadmap\n\n");

    // Projected progression
    section.push_str("### Projected Compliance Score Progression\n\n");
    section.push_str("| Milestone | Month | Score |\n");
    section.push_str("|:---|:---|:---:|\n");
    for milestone in &view.progression.milestones {
        let marker = if milestone.score >= view.progression.minimum_acceptable {
            " ✅"
        } else {
            ""
        };
        section.push_str(&format!(
            "| {} | {} | {}%{} |\n",
            milestone.phase, milestone.month, milestone.score, marker
        ));
    }
    section.push_str(&format!(
        "\n*Minimum acceptable: {}%*\n\n",
        view.progression.minimum_acceptable
    ));

    // Timeline
    section.push_str("### Remediation Timeline\n\n");
    section.push_str("| Task | Phase | Start | Finish | Priority | Owner | Req |\n");
    section.push_str("|:---|:---|:---|:---|:---|:---|:---|\n");
    for row in &view.gantt {
        section.push_str(&format!(
            "| {} | {} | {} | {} | {} | {} | {} |\n",
            cell(&row.task),
            cell(&row.phase),
            row.start.format("%Y-%m-%d"),
            row.finish.format("%Y-%m-%d"),
            cell(&row.priority),
            cell(&row.owner),
            cell(&row.req_id)
        ));
    }
    section.push('\n');

    // Phase cards
    section.push_str("### 📦 Phase Breakdown\n\n");
    for card in &view.phases {
        section.push_str(&format!("#### {} {}\n\n", card.badge, card.heading));
        section.push_str(&format!("**Goal:** {}\n\n", card.phase.description));
        section.push_str(&format!(
            "**Target Score:** {}\n\n",
            card.phase.target_score_improvement
        ));
        section.push_str("**Tasks:**\n\n");
        for task in &card.phase.tasks {
            section.push_str(&format!(
                "- **{}** — {} *(Owner: {}, {} weeks)*\n",
                task.id, task.title, task.owner, task.duration_weeks
            ));
            section.push_str(&format!("  - 📄 Deliverable: {}\n", task.deliverable));
        }
        section.push('\n');
    }

    // All tasks
    section.push_str("### 📊 All Tasks Overview\n\n");
    section.push_str("| Phase | Task ID | Req ID | Title | Effort | Duration | Owner | Priority | Deliverable |\n");
    section.push_str("|:---|:---|:---|:---|:---|:---|:---|:---|:---|\n");
    for task in &view.tasks {
        section.push_str(&format!(
            "| {} | {} | {} | {} | {} | {} | {} | {} | {} |\n",
            cell(&task.phase),
            cell(&task.task_id),
            cell(&task.req_id),
            cell(&task.title),
            cell(&task.effort),
            cell(&task.duration),
            cell(&task.owner),
            cell(&task.priority),
            cell(&task.deliverable)
        ));
    }
    section.push('\n');

    section
}

fn generate_detailed_findings(view: &DetailedFindingsView) -> String {
    let mut section = String::new();

    section.push_str("## 📋 Detailed Findings\n\n");
    section.push_str(&format!(
        "*Status: {} | Severity: {}*\n\n",
        view.status_filter.selected, view.severity_filter.selected
    ));
    section.push_str(&format!(
        "**Showing {} of {} requirements**\n\n",
        view.showing, view.total
    ));

    for item in &view.findings {
        section.push_str(&generate_finding_block(item));
    }

    section
}

/// Generate a single finding block.
fn generate_finding_block(item: &FindingItem) -> String {
    let mut block = String::new();
    let record = &item.record;

    block.push_str(&format!(
        "### {} {} — {} | Score: {}% | {} {}\n\n",
        item.status_emoji,
        record.req_id,
        record.title,
        record.score,
        item.severity_emoji,
        record.severity
    ));

    block.push_str(&format!(
        "**Compliance Score:** {}% | **Status:** {} | **Severity:** {}\n\n",
        record.score, record.status, record.severity
    ));
    block.push_str(&format!("- **Article:** {}\n", record.article));
    block.push_str(&format!("- **Category:** {}\n", record.category));
    block.push_str(&format!("- **Gap Description:** {}\n\n", record.gap_description));

    block.push_str("**🔍 Findings:**\n\n");
    for finding in &record.findings {
        block.push_str(&format!("- {}\n", finding));
    }
    block.push('\n');

    block.push_str("**📁 Evidence Available:**\n\n");
    if record.evidence_available.is_empty() {
        block.push_str("- ❌ No evidence available\n");
    }
    for evidence in &record.evidence_available {
        block.push_str(&format!("- ✅ {}\n", evidence));
    }
    block.push('\n');

    block.push_str("---\n\n");

    block
}

/// Generate the report footer.
fn generate_footer() -> String {
    let mut footer = String::new();

    footer.push_str("---\n\n");
    footer.push_str("*Built for EU AI Act compliance review · Generated by compliance-analyzer*\n");

    footer
}

/// Generate a JSON document. A single page is emitted as an object, several as an array.
pub fn generate_json_report(pages: &[PageView]) -> Result<String> {
    match pages {
        [page] => serde_json::to_string_pretty(page).map_err(Into::into),
        _ => serde_json::to_string_pretty(pages).map_err(Into::into),
    }
}

/// Write rendered output to a file.
pub fn write_report(content: &str, path: &Path) -> Result<()> {
    let mut file = std::fs::File::create(path)?;
    file.write_all(content.as_bytes())?;

    Ok(())
}
