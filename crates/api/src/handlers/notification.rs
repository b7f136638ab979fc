//! Handlers for the `/notifications` resource.
//!
//! The feed endpoint reconciles before answering: the notification list
//! is derived from live project state on every request, so a project
//! whose deadline crossed a threshold shows up without waiting for the
//! background refresh. Bulk operations run one store call per id
//! concurrently and report per-id failures instead of aborting the
//! batch.
//!
//! All endpoints require authentication via [`AuthUser`].

use std::collections::HashSet;

use axum::extract::{Query, State};
use axum::Json;
use chrono::Utc;
use gigtrack_core::feed::FeedEntry;
use gigtrack_core::pagination;
use gigtrack_core::types::DbId;
use gigtrack_db::repositories::NotificationRepo;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::feed;
use crate::middleware::auth::AuthUser;
use crate::query::PageParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// How many unread entries the badge preview carries.
const PREVIEW_LIMIT: usize = 5;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /notifications/bulk/read`.
#[derive(Debug, Deserialize)]
pub struct BulkReadRequest {
    pub ids: Vec<DbId>,
    pub is_read: bool,
}

/// Request body for `POST /notifications/bulk/delete`.
#[derive(Debug, Deserialize)]
pub struct BulkDeleteRequest {
    pub ids: Vec<DbId>,
}

/// A single failed id within a bulk operation.
#[derive(Debug, Serialize)]
pub struct BulkFailure {
    pub id: DbId,
    pub error: String,
}

/// Response body for `POST /notifications/bulk/read`.
#[derive(Debug, Serialize)]
pub struct BulkReadResponse {
    pub updated: Vec<DbId>,
    pub failed: Vec<BulkFailure>,
}

/// Response body for `POST /notifications/bulk/delete`.
#[derive(Debug, Serialize)]
pub struct BulkDeleteResponse {
    pub deleted: Vec<DbId>,
    pub failed: Vec<BulkFailure>,
}

/// One page of the notification feed.
#[derive(Debug, Serialize)]
pub struct FeedPage {
    pub items: Vec<FeedEntry>,
    pub page: u32,
    pub page_size: u32,
    pub total: usize,
    pub total_pages: u32,
    /// Notification rows inserted by this reconcile pass.
    pub created: usize,
}

/// Response body for `GET /notifications/badge`.
#[derive(Debug, Serialize)]
pub struct BadgeResponse {
    /// Notifications never seen at all (`!is_viewed && !is_read`).
    pub new_count: i64,
    /// Notifications not yet read (includes the unseen ones).
    pub unread_count: i64,
    /// The first unread display entries, capped at [`PREVIEW_LIMIT`].
    pub preview: Vec<FeedEntry>,
}

// ---------------------------------------------------------------------------
// Feed
// ---------------------------------------------------------------------------

/// GET /api/notifications/feed
///
/// Reconcile, then return the requested page of the display list.
pub async fn feed(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(page_params): Query<PageParams>,
) -> AppResult<Json<DataResponse<FeedPage>>> {
    let (page, page_size) = page_params.resolve()?;

    let snapshot = feed::reconcile(&state.pool, Utc::now()).await?;

    let total = snapshot.entries.len();
    let page = pagination::clamp_page(page, total, page_size);
    let (start, end) = pagination::page_bounds(page, total, page_size);

    Ok(Json(DataResponse {
        data: FeedPage {
            items: snapshot.entries[start..end].to_vec(),
            page,
            page_size,
            total,
            total_pages: pagination::total_pages(total, page_size),
            created: snapshot.created,
        },
    }))
}

/// GET /api/notifications/badge
///
/// Counts for the sidebar badge plus a short unread preview. Reconciles
/// first so the counts reflect deadlines that crossed a threshold since
/// the last visit.
pub async fn badge(
    _auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<BadgeResponse>>> {
    let snapshot = feed::reconcile(&state.pool, Utc::now()).await?;
    let counts = NotificationRepo::badge_counts(&state.pool).await?;

    let preview: Vec<FeedEntry> = snapshot
        .entries
        .iter()
        .filter(|e| !e.is_read)
        .take(PREVIEW_LIMIT)
        .cloned()
        .collect();

    Ok(Json(DataResponse {
        data: BadgeResponse {
            new_count: counts.new_count,
            unread_count: counts.unread_count,
            preview,
        },
    }))
}

// ---------------------------------------------------------------------------
// Bulk operations
// ---------------------------------------------------------------------------

/// POST /api/notifications/bulk/read
///
/// Set the read flag on several notifications at once. Ids that do not
/// exist in the store are dropped up front; if nothing survives the
/// filter the request is a 400. The surviving ids are updated
/// concurrently and per-id failures are reported in the response body,
/// not as an error status.
pub async fn bulk_read(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<BulkReadRequest>,
) -> AppResult<Json<DataResponse<BulkReadResponse>>> {
    let valid = filter_known_ids(&state, &input.ids).await?;

    let pool = &state.pool;
    let is_read = input.is_read;
    let results = futures::future::join_all(
        valid
            .iter()
            .map(|&id| async move { (id, NotificationRepo::set_read(pool, id, is_read).await) }),
    )
    .await;

    let mut updated = Vec::new();
    let mut failed = Vec::new();
    for (id, result) in results {
        match result {
            Ok(true) => updated.push(id),
            Ok(false) => failed.push(BulkFailure {
                id,
                error: "Notification no longer exists".to_string(),
            }),
            Err(e) => failed.push(BulkFailure {
                id,
                error: e.to_string(),
            }),
        }
    }

    tracing::info!(
        requested = input.ids.len(),
        updated = updated.len(),
        failed = failed.len(),
        is_read,
        user_id = auth.user_id,
        "Bulk read state applied",
    );

    Ok(Json(DataResponse {
        data: BulkReadResponse { updated, failed },
    }))
}

/// POST /api/notifications/bulk/delete
///
/// Delete several notifications at once. Same shape as bulk read, except
/// a row that vanished before its delete landed counts as success: the
/// requested state already holds.
pub async fn bulk_delete(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<BulkDeleteRequest>,
) -> AppResult<Json<DataResponse<BulkDeleteResponse>>> {
    let valid = filter_known_ids(&state, &input.ids).await?;

    let pool = &state.pool;
    let results = futures::future::join_all(
        valid
            .iter()
            .map(|&id| async move { (id, NotificationRepo::delete(pool, id).await) }),
    )
    .await;

    let mut deleted = Vec::new();
    let mut failed = Vec::new();
    for (id, result) in results {
        match result {
            Ok(_) => deleted.push(id),
            Err(e) => failed.push(BulkFailure {
                id,
                error: e.to_string(),
            }),
        }
    }

    tracing::info!(
        requested = input.ids.len(),
        deleted = deleted.len(),
        failed = failed.len(),
        user_id = auth.user_id,
        "Bulk delete applied",
    );

    Ok(Json(DataResponse {
        data: BulkDeleteResponse { deleted, failed },
    }))
}

// ---------------------------------------------------------------------------
// Read-state and cleanup
// ---------------------------------------------------------------------------

/// POST /api/notifications/viewed
///
/// Mark every unviewed notification as viewed (the "visited the list"
/// semantic that clears the new-item badge). Returns the count marked.
pub async fn mark_all_viewed(
    _auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<serde_json::Value>>> {
    let count = NotificationRepo::mark_all_viewed(&state.pool).await?;

    Ok(Json(DataResponse {
        data: serde_json::json!({ "marked_viewed": count }),
    }))
}

/// DELETE /api/notifications
///
/// Remove every notification. The next reconcile pass recreates entries
/// for projects that are still urgent.
pub async fn clear_all(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<serde_json::Value>>> {
    let count = NotificationRepo::delete_all(&state.pool).await?;

    tracing::info!(deleted = count, user_id = auth.user_id, "Notifications cleared");

    Ok(Json(DataResponse {
        data: serde_json::json!({ "deleted": count }),
    }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Drop requested ids that are not in the store, keeping request order.
///
/// An empty request and a request where nothing survives are both 400s:
/// the first is malformed, the second means the client's view is stale
/// enough that every target is gone.
async fn filter_known_ids(state: &AppState, ids: &[DbId]) -> Result<Vec<DbId>, AppError> {
    if ids.is_empty() {
        return Err(AppError::BadRequest("ids must not be empty".into()));
    }

    let known: HashSet<DbId> = NotificationRepo::list(&state.pool)
        .await?
        .iter()
        .map(|n| n.id)
        .collect();

    let valid: Vec<DbId> = ids.iter().copied().filter(|id| known.contains(id)).collect();

    if valid.is_empty() {
        return Err(AppError::BadRequest(
            "None of the requested notification ids exist".into(),
        ));
    }

    Ok(valid)
}
