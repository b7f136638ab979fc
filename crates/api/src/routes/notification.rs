//! Route definitions for the `/notifications` resource.
//!
//! All endpoints require authentication.

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::notification;
use crate::state::AppState;

/// Routes mounted at `/notifications`.
///
/// ```text
/// GET    /feed         -> feed (reconcile, then page)
/// GET    /badge        -> badge
/// POST   /viewed       -> mark_all_viewed
/// POST   /bulk/read    -> bulk_read
/// POST   /bulk/delete  -> bulk_delete
/// DELETE /             -> clear_all
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", delete(notification::clear_all))
        .route("/feed", get(notification::feed))
        .route("/badge", get(notification::badge))
        .route("/viewed", post(notification::mark_all_viewed))
        .route("/bulk/read", post(notification::bulk_read))
        .route("/bulk/delete", post(notification::bulk_delete))
}
