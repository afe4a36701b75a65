//! Roadmap aggregation.
//!
//! Flattens the remediation roadmap into task rows and timeline rows and
//! holds the fixed projected score curve shown alongside it.

use crate::analysis::aggregator::DEFAULT_COLOR;
use crate::error::{Result, SchemaError};
use crate::models::{Effort, Priority, RemediationPhase, RoadmapDocument};
use chrono::NaiveDate;
use serde::Serialize;

/// Calendar year the first phase starts in.
pub const DEFAULT_START_YEAR: i32 = 2026;

/// Every phase is scheduled as a fixed three-month window.
const MONTHS_PER_PHASE: i64 = 3;

/// Timeline windows end on the 28th so every month has the day.
const WINDOW_END_DAY: u32 = 28;

/// Map phase/task priority to timeline colours.
pub fn phase_color(priority: &Priority) -> &'static str {
    match priority {
        Priority::Critical => "#FF4444",
        Priority::High => "#FF8C00",
        Priority::Medium => "#4169E1",
        Priority::Low => "#32CD32",
        Priority::Other(_) => DEFAULT_COLOR,
    }
}

/// Badge shown on a phase card.
pub fn phase_badge(priority: &Priority) -> &'static str {
    match priority {
        Priority::Critical => "🔴",
        Priority::High => "🟠",
        Priority::Medium => "🔵",
        _ => "⚪",
    }
}

/// Effort label with an indicator. Unknown efforts are returned unchanged.
pub fn effort_icon(effort: &Effort) -> String {
    match effort {
        Effort::Low => "🟢 Low".to_string(),
        Effort::Medium => "🟡 Medium".to_string(),
        Effort::High => "🔴 High".to_string(),
        Effort::Other(raw) => raw.clone(),
    }
}

/// One bar on the remediation timeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GanttRow {
    pub task: String,
    pub phase: String,
    pub start: NaiveDate,
    pub finish: NaiveDate,
    pub priority: Priority,
    pub owner: String,
    pub effort: Effort,
    pub req_id: String,
    pub color: &'static str,
}

/// One line of the all-tasks table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskRow {
    pub phase: String,
    pub task_id: String,
    pub req_id: String,
    pub title: String,
    pub effort: String,
    pub duration: String,
    pub owner: String,
    pub priority: Priority,
    pub deliverable: String,
}

/// A point on the projected score curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Milestone {
    pub phase: &'static str,
    pub score: f64,
    pub month: &'static str,
}

/// A shaded score range on the progression chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreZone {
    pub label: &'static str,
    pub from: f64,
    pub to: f64,
    pub color: &'static str,
}

/// Score below which a system is not considered acceptable.
pub const MINIMUM_ACCEPTABLE_SCORE: f64 = 70.0;

const SCORE_PROGRESSION: [Milestone; 5] = [
    Milestone {
        phase: "Current State",
        score: 32.5,
        month: "Feb 2026",
    },
    Milestone {
        phase: "After Phase 1",
        score: 50.0,
        month: "Apr 2026",
    },
    Milestone {
        phase: "After Phase 2",
        score: 65.0,
        month: "Jul 2026",
    },
    Milestone {
        phase: "After Phase 3",
        score: 80.0,
        month: "Oct 2026",
    },
    Milestone {
        phase: "After Phase 4",
        score: 95.0,
        month: "Feb 2027",
    },
];

const SCORE_ZONES: [ScoreZone; 3] = [
    ScoreZone {
        label: "Non-Compliant Zone",
        from: 0.0,
        to: 40.0,
        color: "red",
    },
    ScoreZone {
        label: "Partial Zone",
        from: 40.0,
        to: 70.0,
        color: "orange",
    },
    ScoreZone {
        label: "Compliant Zone",
        from: 70.0,
        to: 100.0,
        color: "green",
    },
];

/// The projected score trajectory. Illustrative reference data, not derived
/// from any roadmap document.
pub fn score_progression() -> &'static [Milestone] {
    &SCORE_PROGRESSION
}

pub fn score_zones() -> &'static [ScoreZone] {
    &SCORE_ZONES
}

/// The phases, in document order.
pub fn phase_summary(doc: &RoadmapDocument) -> Vec<RemediationPhase> {
    doc.phases.clone()
}

/// "Phase N: Title"
pub fn phase_label(phase: &RemediationPhase) -> String {
    format!("Phase {}: {}", phase.phase_number, phase.title)
}

/// Start and finish dates of a phase's window.
///
/// Phase N covers months `(N-1)*3+1` through `N*3`, clamped to the year.
pub fn phase_window(phase_number: u32, year: i32) -> Result<(NaiveDate, NaiveDate)> {
    let n = i64::from(phase_number);
    let start_month = ((n - 1) * MONTHS_PER_PHASE + 1).clamp(1, 12) as u32;
    let end_month = (n * MONTHS_PER_PHASE).clamp(1, 12) as u32;

    let date = |month: u32, day: u32| {
        NaiveDate::from_ymd_opt(year, month, day).ok_or(SchemaError::InvalidDate {
            phase_number,
            year,
            month,
            day,
        })
    };

    Ok((date(start_month, 1)?, date(end_month, WINDOW_END_DAY)?))
}

/// Timeline rows for every task, with phase 1 starting in `year`.
/// Task durations do not affect the window.
pub fn gantt_rows(doc: &RoadmapDocument, year: i32) -> Result<Vec<GanttRow>> {
    let mut rows = Vec::new();

    for phase in &doc.phases {
        let (start, finish) = phase_window(phase.phase_number, year)?;
        let label = phase_label(phase);

        for task in &phase.tasks {
            rows.push(GanttRow {
                task: task.title.clone(),
                phase: label.clone(),
                start,
                finish,
                priority: task.priority.clone(),
                owner: task.owner.clone(),
                effort: task.effort.clone(),
                req_id: task.req_id.clone(),
                color: phase_color(&task.priority),
            });
        }
    }

    Ok(rows)
}

/// All tasks as flat table rows, in phase then task order.
pub fn flatten_tasks(doc: &RoadmapDocument) -> Vec<TaskRow> {
    doc.phases
        .iter()
        .flat_map(|phase| {
            phase.tasks.iter().map(move |task| TaskRow {
                phase: format!("Phase {}", phase.phase_number),
                task_id: task.id.clone(),
                req_id: task.req_id.clone(),
                title: task.title.clone(),
                effort: effort_icon(&task.effort),
                duration: format!("{} weeks", task.duration_weeks),
                owner: task.owner.clone(),
                priority: task.priority.clone(),
                deliverable: task.deliverable.clone(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RemediationTask;

    fn create_test_task(id: &str, effort: Effort, weeks: u32) -> RemediationTask {
        RemediationTask {
            id: id.to_string(),
            req_id: "ART-14".to_string(),
            title: format!("Task {}", id),
            owner: "Compliance Lead".to_string(),
            duration_weeks: weeks,
            effort,
            priority: Priority::High,
            deliverable: "Policy".to_string(),
        }
    }

    fn create_test_phase(phase_number: u32, tasks: Vec<RemediationTask>) -> RemediationPhase {
        RemediationPhase {
            phase_number,
            title: format!("Stage {}", phase_number),
            priority: Priority::Critical,
            duration: "3 months".to_string(),
            estimated_cost: "€10,000".to_string(),
            description: "Test phase".to_string(),
            target_score_improvement: "+10%".to_string(),
            tasks,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_phase_window_first_and_last() {
        assert_eq!(
            phase_window(1, 2026).unwrap(),
            (date(2026, 1, 1), date(2026, 3, 28))
        );
        assert_eq!(
            phase_window(4, 2026).unwrap(),
            (date(2026, 10, 1), date(2026, 12, 28))
        );
    }

    #[test]
    fn test_phase_window_clamps_out_of_range_phases() {
        assert_eq!(
            phase_window(0, 2026).unwrap(),
            (date(2026, 1, 1), date(2026, 1, 28))
        );
        assert_eq!(
            phase_window(7, 2026).unwrap(),
            (date(2026, 12, 1), date(2026, 12, 28))
        );
    }

    #[test]
    fn test_gantt_rows_ignore_task_duration() {
        let doc = RoadmapDocument {
            phases: vec![create_test_phase(
                2,
                vec![
                    create_test_task("T2.1", Effort::High, 1),
                    create_test_task("T2.2", Effort::Low, 40),
                ],
            )],
        };

        let rows = gantt_rows(&doc, DEFAULT_START_YEAR).unwrap();
        assert_eq!(rows.len(), 2);
        for row in &rows {
            assert_eq!(row.phase, "Phase 2: Stage 2");
            assert_eq!(row.start, date(2026, 4, 1));
            assert_eq!(row.finish, date(2026, 6, 28));
            assert_eq!(row.color, "#FF8C00");
        }
    }

    #[test]
    fn test_gantt_dates_serialize_as_iso() {
        let doc = RoadmapDocument {
            phases: vec![create_test_phase(1, vec![create_test_task("T1", Effort::Low, 2)])],
        };

        let json = serde_json::to_value(gantt_rows(&doc, DEFAULT_START_YEAR).unwrap()).unwrap();
        assert_eq!(json[0]["start"], "2026-01-01");
        assert_eq!(json[0]["finish"], "2026-03-28");
    }

    #[test]
    fn test_lookups_fall_back() {
        assert_eq!(phase_color(&Priority::Medium), "#4169E1");
        assert_eq!(phase_color(&Priority::from("Someday")), DEFAULT_COLOR);
        assert_eq!(phase_badge(&Priority::Low), "⚪");
        assert_eq!(effort_icon(&Effort::High), "🔴 High");
        assert_eq!(effort_icon(&Effort::from("Unknown")), "Unknown");
        assert_eq!(effort_icon(&Effort::from("high")), "high");
        assert_eq!(phase_color(&Priority::from("critical")), DEFAULT_COLOR);
    }

    #[test]
    fn test_flatten_tasks() {
        let doc = RoadmapDocument {
            phases: vec![
                create_test_phase(1, vec![create_test_task("T1.1", Effort::Medium, 6)]),
                create_test_phase(
                    2,
                    vec![
                        create_test_task("T2.1", Effort::Low, 1),
                        create_test_task("T2.2", Effort::from("XL"), 12),
                    ],
                ),
            ],
        };

        let rows = flatten_tasks(&doc);
        let ids: Vec<&str> = rows.iter().map(|r| r.task_id.as_str()).collect();
        assert_eq!(ids, vec!["T1.1", "T2.1", "T2.2"]);
        assert_eq!(rows[0].phase, "Phase 1");
        assert_eq!(rows[0].effort, "🟡 Medium");
        assert_eq!(rows[0].duration, "6 weeks");
        assert_eq!(rows[2].effort, "XL");
    }

    #[test]
    fn test_score_progression_is_fixed() {
        let curve = score_progression();
        assert_eq!(curve.len(), 5);
        assert_eq!(curve[0].score, 32.5);
        assert_eq!(curve[4].phase, "After Phase 4");
        assert_eq!(curve[4].score, 95.0);
        assert!(curve.windows(2).all(|w| w[0].score < w[1].score));
    }

    #[test]
    fn test_shipped_roadmap() {
        let repo = crate::repository::AssessmentRepository::new(
            std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("data"),
        );
        let doc = repo.load_roadmap().unwrap();

        let phases = phase_summary(&doc);
        let numbers: Vec<u32> = phases.iter().map(|p| p.phase_number).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4]);

        let task_total: usize = phases.iter().map(|p| p.tasks.len()).sum();
        assert_eq!(flatten_tasks(&doc).len(), task_total);
        assert_eq!(gantt_rows(&doc, DEFAULT_START_YEAR).unwrap().len(), task_total);
    }
}
