//! Notification entity model.
//!
//! Inserts go through the deriver's `NotificationDraft` rather than a
//! separate create DTO; updates are flag flips handled by dedicated
//! repository methods, so there is no all-`Option` patch DTO here.

use gigtrack_core::feed::StoredNotification;
use gigtrack_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `notifications` table. The project fields are snapshots
/// taken when the row was created; display reclassifies from the live
/// project.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Notification {
    pub id: DbId,
    pub project_id: DbId,
    pub title: String,
    pub ref_code: Option<String>,
    pub submission_date: Timestamp,
    pub status: String,
    pub urgency: String,
    pub days_until_due: i64,
    pub is_read: bool,
    pub is_viewed: bool,
    pub created_at: Timestamp,
    pub last_updated: Option<Timestamp>,
}

impl Notification {
    /// The deriver's view of this row: identity and carried state only.
    pub fn to_stored(&self) -> StoredNotification {
        StoredNotification {
            id: self.id,
            project_id: self.project_id,
            is_read: self.is_read,
            is_viewed: self.is_viewed,
            created_at: self.created_at,
        }
    }
}

/// Sidebar badge counts in one scan: `new` is unseen (neither viewed nor
/// read), `unread` is everything not read.
#[derive(Debug, Clone, Copy, FromRow, Serialize)]
pub struct BadgeCounts {
    pub new_count: i64,
    pub unread_count: i64,
}
