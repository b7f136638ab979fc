//! Notification feed derivation.
//!
//! The deriver is a pure function over project records and previously
//! persisted notifications: it classifies every open project by urgency,
//! drafts notifications for urgent projects that have none yet, and
//! rebuilds the sorted display list with read/viewed state carried over
//! from the store.
//!
//! Callers capture `now` once and pass it through an entire pass; nothing
//! in this module reads the clock, so a pass that straddles midnight still
//! classifies every project against the same instant.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::project::ProjectStatus;
use crate::types::{DbId, Timestamp};

/// Display title for projects without a topic.
pub const UNTITLED_TITLE: &str = "Untitled Project";

/// Pending projects older than this (by order date) are flagged as stale.
pub const PENDING_STALE_DAYS: i64 = 7;

/// In-progress projects idle longer than this are flagged as stale.
pub const IN_PROGRESS_STALE_DAYS: i64 = 14;

// ---------------------------------------------------------------------------
// Urgency classification
// ---------------------------------------------------------------------------

/// Urgency class of a project, in evaluation priority order.
///
/// `Normal` is the absence of urgency: such projects produce no draft and
/// no display entry, and the value never crosses an API boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Urgency {
    Overdue,
    Urgent,
    DueSoon,
    PendingLong,
    InProgressLong,
    Normal,
}

impl Urgency {
    /// Whether this class derives from the due date rather than staleness.
    pub fn is_due(self) -> bool {
        matches!(self, Urgency::Overdue | Urgency::Urgent | Urgency::DueSoon)
    }

    /// The stored text representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Urgency::Overdue => "overdue",
            Urgency::Urgent => "urgent",
            Urgency::DueSoon => "due-soon",
            Urgency::PendingLong => "pending-long",
            Urgency::InProgressLong => "in-progress-long",
            Urgency::Normal => "normal",
        }
    }

    /// Parse the stored text representation. Unknown strings are `None`.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "overdue" => Some(Urgency::Overdue),
            "urgent" => Some(Urgency::Urgent),
            "due-soon" => Some(Urgency::DueSoon),
            "pending-long" => Some(Urgency::PendingLong),
            "in-progress-long" => Some(Urgency::InProgressLong),
            "normal" => Some(Urgency::Normal),
            _ => None,
        }
    }
}

/// Signed whole-day distance from `now` to the due date.
///
/// Rounded half-away-from-zero on the real-valued day delta: 36 hours out
/// is 2 days, 36 hours past due is -2.
pub fn days_until_due(now: Timestamp, submission_date: Timestamp) -> i64 {
    let seconds = (submission_date - now).num_seconds() as f64;
    (seconds / 86_400.0).round() as i64
}

/// Classify a project's urgency at `now`. The first matching class wins.
pub fn classify(project: &ProjectRecord, now: Timestamp) -> Urgency {
    classify_at(project, now, days_until_due(now, project.submission_date))
}

fn classify_at(project: &ProjectRecord, now: Timestamp, days: i64) -> Urgency {
    if project.status.is_closed() {
        return Urgency::Normal;
    }
    if days < 0 {
        return Urgency::Overdue;
    }
    if days <= 1 {
        return Urgency::Urgent;
    }
    if days <= 2 {
        return Urgency::DueSoon;
    }
    if project.status == ProjectStatus::Pending
        && now - project.order_date > chrono::Duration::days(PENDING_STALE_DAYS)
    {
        return Urgency::PendingLong;
    }
    if project.status == ProjectStatus::InProgress
        && now - project.last_updated.unwrap_or(project.order_date)
            > chrono::Duration::days(IN_PROGRESS_STALE_DAYS)
    {
        return Urgency::InProgressLong;
    }
    Urgency::Normal
}

// ---------------------------------------------------------------------------
// Deriver inputs
// ---------------------------------------------------------------------------

/// The slice of a project record the deriver needs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectRecord {
    pub id: DbId,
    pub topic: Option<String>,
    pub order_ref_code: Option<String>,
    pub status: ProjectStatus,
    pub order_date: Timestamp,
    pub submission_date: Timestamp,
    pub last_updated: Option<Timestamp>,
}

/// A previously persisted notification, as loaded from the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredNotification {
    pub id: DbId,
    pub project_id: DbId,
    pub is_read: bool,
    pub is_viewed: bool,
    pub created_at: Timestamp,
}

// ---------------------------------------------------------------------------
// Deriver outputs
// ---------------------------------------------------------------------------

/// A notification to insert for an urgent project that has none yet.
///
/// The project fields are denormalized snapshots; display always
/// reclassifies from the live project, so a snapshot going stale is
/// harmless.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationDraft {
    pub project_id: DbId,
    pub title: String,
    pub ref_code: Option<String>,
    pub submission_date: Timestamp,
    pub status: ProjectStatus,
    pub urgency: Urgency,
    pub days_until_due: i64,
    pub is_read: bool,
    pub is_viewed: bool,
}

/// One row of the displayed notification feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedEntry {
    /// Store id of the backing notification. `None` for entries drafted in
    /// this pass whose insert has not been assigned an id yet.
    pub id: Option<DbId>,
    pub project_id: DbId,
    pub title: String,
    pub ref_code: Option<String>,
    pub submission_date: Timestamp,
    pub status: ProjectStatus,
    pub urgency: Urgency,
    pub days_until_due: i64,
    pub is_due: bool,
    pub is_read: bool,
    pub is_viewed: bool,
    pub created_at: Timestamp,
}

/// Result of one derivation pass.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Derivation {
    /// Notifications to insert: projects urgent now with no persisted row.
    pub to_create: Vec<NotificationDraft>,
    /// The complete display list, sorted, with persisted read state
    /// carried over.
    pub display: Vec<FeedEntry>,
}

impl Derivation {
    /// Attach store ids to freshly drafted entries once their inserts have
    /// been assigned ids, keyed by project id.
    pub fn attach_ids(&mut self, assigned: &HashMap<DbId, DbId>) {
        for entry in &mut self.display {
            if entry.id.is_none() {
                entry.id = assigned.get(&entry.project_id).copied();
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Derivation
// ---------------------------------------------------------------------------

/// Run one derivation pass over the full project and notification sets.
///
/// At most one notification per project is honored; duplicates in
/// `existing` (which the store's unique constraint rules out anyway) keep
/// the first occurrence. Persisted rows whose project has gone quiet are
/// left alone: they drop out of the display but are never retracted from
/// the store.
pub fn derive(
    projects: &[ProjectRecord],
    existing: &[StoredNotification],
    now: Timestamp,
) -> Derivation {
    let mut by_project: HashMap<DbId, &StoredNotification> = HashMap::new();
    for notification in existing {
        by_project.entry(notification.project_id).or_insert(notification);
    }

    let mut to_create = Vec::new();
    let mut display = Vec::new();

    for project in projects {
        let days = days_until_due(now, project.submission_date);
        let urgency = classify_at(project, now, days);
        if urgency == Urgency::Normal {
            continue;
        }

        let stored = by_project.get(&project.id).copied();
        let title = project
            .topic
            .clone()
            .unwrap_or_else(|| UNTITLED_TITLE.to_string());

        if stored.is_none() {
            to_create.push(NotificationDraft {
                project_id: project.id,
                title: title.clone(),
                ref_code: project.order_ref_code.clone(),
                submission_date: project.submission_date,
                status: project.status,
                urgency,
                days_until_due: days,
                is_read: false,
                is_viewed: false,
            });
        }

        display.push(FeedEntry {
            id: stored.map(|n| n.id),
            project_id: project.id,
            title,
            ref_code: project.order_ref_code.clone(),
            submission_date: project.submission_date,
            status: project.status,
            urgency,
            days_until_due: days,
            is_due: urgency.is_due(),
            is_read: stored.is_some_and(|n| n.is_read),
            is_viewed: stored.is_some_and(|n| n.is_viewed),
            created_at: stored.map_or(now, |n| n.created_at),
        });
    }

    sort_display(&mut display);
    Derivation { to_create, display }
}

/// Sort the display list in presentation order:
///
/// 1. entries for completed projects last,
/// 2. due-date classes before staleness classes,
/// 3. ties by submission date, latest first.
///
/// The sort is stable, so input order breaks any remaining ties.
pub fn sort_display(entries: &mut [FeedEntry]) {
    entries.sort_by(|a, b| {
        let a_completed = a.status == ProjectStatus::Completed;
        let b_completed = b.status == ProjectStatus::Completed;
        if a_completed != b_completed {
            return a_completed.cmp(&b_completed);
        }
        if a.is_due != b.is_due {
            return b.is_due.cmp(&a.is_due);
        }
        b.submission_date.cmp(&a.submission_date)
    });
}
