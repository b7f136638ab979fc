//! Dashboard aggregation over project figures.
//!
//! Pure functions over an in-memory slice of per-project figures: one
//! fetch feeds the period summary, the comparison deltas, and the monthly
//! trend window. Month arithmetic is calendar-based (1-12, like chrono),
//! not a fixed 30-day approximation.

use std::collections::BTreeMap;

use chrono::Datelike;
use serde::{Deserialize, Serialize};

use crate::project::ProjectStatus;
use crate::types::Timestamp;

/// The figures of one project that feed the dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectFigures {
    pub status: ProjectStatus,
    pub order_type: String,
    pub order_date: Timestamp,
    pub submission_date: Timestamp,
    pub amount: f64,
    pub words: i64,
}

// ---------------------------------------------------------------------------
// Periods
// ---------------------------------------------------------------------------

/// A calendar month. `month` is 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    pub year: i32,
    pub month: u32,
}

impl Period {
    /// The period containing `ts`.
    pub fn of(ts: Timestamp) -> Period {
        Period {
            year: ts.year(),
            month: ts.month(),
        }
    }

    /// The immediately preceding calendar month.
    pub fn previous(self) -> Period {
        if self.month == 1 {
            Period {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Period {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    /// Whether `ts` falls inside this calendar month.
    pub fn contains(self, ts: Timestamp) -> bool {
        ts.year() == self.year && ts.month() == self.month
    }
}

// ---------------------------------------------------------------------------
// Period summary
// ---------------------------------------------------------------------------

/// Aggregate figures for the projects ordered within one period.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Summary {
    pub total_projects: u32,
    pub completed: u32,
    pub in_progress: u32,
    pub pending: u32,
    /// Open projects already past their due date as of `now`.
    pub overdue: u32,
    pub total_amount: f64,
    pub total_words: i64,
}

/// Summarize the projects whose `order_date` falls in `period`.
pub fn summarize(projects: &[ProjectFigures], period: Period, now: Timestamp) -> Summary {
    let mut summary = Summary::default();
    for p in projects.iter().filter(|p| period.contains(p.order_date)) {
        summary.total_projects += 1;
        match p.status {
            ProjectStatus::Completed => summary.completed += 1,
            ProjectStatus::InProgress => summary.in_progress += 1,
            ProjectStatus::Pending => summary.pending += 1,
            ProjectStatus::Cancelled => {}
        }
        if !p.status.is_closed() && p.submission_date < now {
            summary.overdue += 1;
        }
        summary.total_amount += p.amount;
        summary.total_words += p.words;
    }
    summary
}

// ---------------------------------------------------------------------------
// Period comparison
// ---------------------------------------------------------------------------

/// A period summary next to a baseline, with percentage deltas.
#[derive(Debug, Clone, Serialize)]
pub struct Comparison {
    pub current: Summary,
    pub baseline: Summary,
    pub project_change_pct: f64,
    pub amount_change_pct: f64,
}

/// Summarize `current` against `baseline`.
///
/// A zero baseline reports 100% growth when the current period has any
/// activity and 0% when both are empty, instead of dividing by zero.
pub fn compare(
    projects: &[ProjectFigures],
    current: Period,
    baseline: Period,
    now: Timestamp,
) -> Comparison {
    let cur = summarize(projects, current, now);
    let base = summarize(projects, baseline, now);
    let project_change_pct = change_pct(f64::from(cur.total_projects), f64::from(base.total_projects));
    let amount_change_pct = change_pct(cur.total_amount, base.total_amount);
    Comparison {
        current: cur,
        baseline: base,
        project_change_pct,
        amount_change_pct,
    }
}

fn change_pct(current: f64, baseline: f64) -> f64 {
    if baseline == 0.0 {
        if current == 0.0 {
            0.0
        } else {
            100.0
        }
    } else {
        (current - baseline) / baseline * 100.0
    }
}

// ---------------------------------------------------------------------------
// Monthly trends
// ---------------------------------------------------------------------------

/// One month's slice of the trend window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyTrend {
    pub year: i32,
    pub month: u32,
    pub total: u32,
    pub completed: u32,
    /// Project counts keyed by `order_type`. Only types present in the
    /// month appear; absent months still emit an entry with zero totals.
    pub by_type: BTreeMap<String, u32>,
}

/// The `months` calendar months ending at `end` (inclusive), oldest first,
/// zero-filled for months without any orders.
pub fn monthly_trends(
    projects: &[ProjectFigures],
    end: Period,
    months: u32,
) -> Vec<MonthlyTrend> {
    let mut periods = Vec::with_capacity(months as usize);
    let mut cursor = end;
    for _ in 0..months {
        periods.push(cursor);
        cursor = cursor.previous();
    }
    periods.reverse();

    periods
        .into_iter()
        .map(|period| {
            let mut trend = MonthlyTrend {
                year: period.year,
                month: period.month,
                total: 0,
                completed: 0,
                by_type: BTreeMap::new(),
            };
            for p in projects.iter().filter(|p| period.contains(p.order_date)) {
                trend.total += 1;
                if p.status == ProjectStatus::Completed {
                    trend.completed += 1;
                }
                *trend.by_type.entry(p.order_type.clone()).or_insert(0) += 1;
            }
            trend
        })
        .collect()
}
