//! Repository for the `notifications` table.

use gigtrack_core::feed::NotificationDraft;
use gigtrack_core::types::DbId;
use sqlx::PgPool;

use crate::models::notification::{BadgeCounts, Notification};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, project_id, title, ref_code, submission_date, status, urgency, \
                       days_until_due, is_read, is_viewed, created_at, last_updated";

/// Provides CRUD operations for notifications.
pub struct NotificationRepo;

impl NotificationRepo {
    /// List every notification, newest first.
    pub async fn list(pool: &PgPool) -> Result<Vec<Notification>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM notifications ORDER BY created_at DESC");
        sqlx::query_as::<_, Notification>(&query)
            .fetch_all(pool)
            .await
    }

    /// Insert a notification for a project unless one already exists.
    ///
    /// Concurrent refresh passes can draft the same project at once; the
    /// `uq_notifications_project_id` constraint plus `ON CONFLICT DO
    /// NOTHING` makes the race converge on a single row. Returns `None`
    /// when the row already existed.
    pub async fn create_if_absent(
        pool: &PgPool,
        draft: &NotificationDraft,
    ) -> Result<Option<Notification>, sqlx::Error> {
        let query = format!(
            "INSERT INTO notifications
                (project_id, title, ref_code, submission_date, status, urgency,
                 days_until_due, is_read, is_viewed)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             ON CONFLICT (project_id) DO NOTHING
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Notification>(&query)
            .bind(draft.project_id)
            .bind(&draft.title)
            .bind(&draft.ref_code)
            .bind(draft.submission_date)
            .bind(draft.status.as_str())
            .bind(draft.urgency.as_str())
            .bind(draft.days_until_due)
            .bind(draft.is_read)
            .bind(draft.is_viewed)
            .fetch_optional(pool)
            .await
    }

    /// Set the read flag on one notification. Marking read also marks
    /// viewed (an unseen-but-read state does not exist); marking unread
    /// leaves the viewed flag alone.
    ///
    /// Returns `true` if the row exists and was updated.
    pub async fn set_read(pool: &PgPool, id: DbId, is_read: bool) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE notifications
             SET is_read = $2, is_viewed = (is_viewed OR $2), last_updated = NOW()
             WHERE id = $1",
        )
        .bind(id)
        .bind(is_read)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete one notification. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM notifications WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Mark every unviewed notification as viewed, the "visited the list"
    /// semantic. Returns the number of rows flipped.
    pub async fn mark_all_viewed(pool: &PgPool) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE notifications
             SET is_viewed = true, last_updated = NOW()
             WHERE is_viewed = false",
        )
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// The most recent unread rows, for the badge preview.
    pub async fn list_unread(pool: &PgPool, limit: i64) -> Result<Vec<Notification>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM notifications
             WHERE NOT is_read
             ORDER BY created_at DESC
             LIMIT $1"
        );
        sqlx::query_as::<_, Notification>(&query)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Badge counts in one scan: unseen rows and unread rows.
    pub async fn badge_counts(pool: &PgPool) -> Result<BadgeCounts, sqlx::Error> {
        sqlx::query_as::<_, BadgeCounts>(
            "SELECT
                COUNT(*) FILTER (WHERE NOT is_viewed AND NOT is_read) AS new_count,
                COUNT(*) FILTER (WHERE NOT is_read) AS unread_count
             FROM notifications",
        )
        .fetch_one(pool)
        .await
    }

    /// Remove every notification. Returns the number removed.
    pub async fn delete_all(pool: &PgPool) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM notifications").execute(pool).await?;
        Ok(result.rows_affected())
    }
}
