//! Feed reconciliation: derive the notification list from live project
//! state and persist any newly due notifications.
//!
//! Both the HTTP feed endpoints and the background refresh task run the
//! same pass: load projects and stored notifications, hand them to the
//! pure deriver, insert the drafts it produced, and return the display
//! list. Inserts go through `ON CONFLICT DO NOTHING`, so a concurrent
//! pass racing on the same project converges on a single row instead of
//! erroring.

use std::collections::HashMap;

use gigtrack_core::feed::{self, FeedEntry, ProjectRecord, StoredNotification};
use gigtrack_core::types::{DbId, Timestamp};
use gigtrack_db::repositories::{NotificationRepo, ProjectRepo};
use gigtrack_db::DbPool;

/// The result of one reconcile pass.
#[derive(Debug)]
pub struct FeedSnapshot {
    /// The full display list, already in display order.
    pub entries: Vec<FeedEntry>,
    /// How many notification rows this pass inserted.
    pub created: usize,
}

/// Run one reconcile pass against the store.
///
/// `now` is captured once by the caller so every project in the pass is
/// classified against the same instant.
pub async fn reconcile(pool: &DbPool, now: Timestamp) -> Result<FeedSnapshot, sqlx::Error> {
    let projects = ProjectRepo::list(pool).await?;
    let stored = NotificationRepo::list(pool).await?;

    let records: Vec<ProjectRecord> = projects.iter().map(|p| p.to_record()).collect();
    let existing: Vec<StoredNotification> = stored.iter().map(|n| n.to_stored()).collect();

    let mut derivation = feed::derive(&records, &existing, now);

    let mut created = 0;
    for draft in &derivation.to_create {
        if NotificationRepo::create_if_absent(pool, draft)
            .await?
            .is_some()
        {
            created += 1;
        }
    }

    // Fresh entries in the display list carry no row id yet. Reload the
    // table to pick up the ids of this pass's inserts and of any rows a
    // concurrent pass won the race for.
    if !derivation.to_create.is_empty() {
        let assigned: HashMap<DbId, DbId> = NotificationRepo::list(pool)
            .await?
            .iter()
            .map(|n| (n.project_id, n.id))
            .collect();
        derivation.attach_ids(&assigned);
    }

    Ok(FeedSnapshot {
        entries: derivation.display,
        created,
    })
}
