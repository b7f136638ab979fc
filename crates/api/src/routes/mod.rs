pub mod auth;
pub mod dashboard;
pub mod health;
pub mod notification;
pub mod project;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                     register (public)
/// /auth/login                        login (public)
/// /auth/refresh                      refresh (public)
/// /auth/logout                       logout (requires auth)
/// /auth/me                           current user (requires auth)
///
/// /projects                          list, create
/// /projects/{id}                     get, patch, delete
///
/// /notifications                     clear all (DELETE)
/// /notifications/feed                reconcile + page (GET)
/// /notifications/badge               sidebar counts + preview (GET)
/// /notifications/viewed              mark all viewed (POST)
/// /notifications/bulk/read           bulk read state (POST)
/// /notifications/bulk/delete         bulk delete (POST)
///
/// /dashboard                         month summary + trends (GET)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Authentication routes (register, login, refresh, logout, me).
        .nest("/auth", auth::router())
        // Project CRUD and listing.
        .nest("/projects", project::router())
        // Notification feed, bulk operations, badge.
        .nest("/notifications", notification::router())
        // Dashboard aggregation.
        .nest("/dashboard", dashboard::router())
}
