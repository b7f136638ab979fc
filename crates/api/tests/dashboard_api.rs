//! HTTP-level integration tests for the dashboard aggregation endpoint.

mod common;

use axum::http::StatusCode;
use chrono::{SecondsFormat, Utc};
use common::{body_json, get_auth, post_json_auth};
use sqlx::PgPool;

/// Seed a project with fixed order/submission dates.
async fn seed_project(
    pool: &PgPool,
    token: &str,
    topic: &str,
    status: &str,
    order_date: &str,
    submission_date: &str,
    amount: f64,
    words: i64,
) {
    let body = serde_json::json!({
        "topic": topic,
        "status": status,
        "order_date": order_date,
        "submission_date": submission_date,
        "amount": amount,
        "words": words,
    });
    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(app, "/api/projects", body, token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
}

/// A March/February 2025 ledger: three March orders, one February order.
async fn seed_spring_2025(pool: &PgPool, token: &str) {
    seed_project(
        pool, token, "March one", "completed",
        "2025-03-02T12:00:00Z", "2025-03-08T12:00:00Z", 120.0, 2000,
    )
    .await;
    seed_project(
        pool, token, "March two", "in-progress",
        "2025-03-05T12:00:00Z", "2025-03-09T12:00:00Z", 400.0, 8000,
    )
    .await;
    seed_project(
        pool, token, "March three", "pending",
        "2025-03-07T12:00:00Z", "2025-04-01T12:00:00Z", 90.0, 1500,
    )
    .await;
    seed_project(
        pool, token, "February one", "completed",
        "2025-02-20T12:00:00Z", "2025-02-27T12:00:00Z", 75.0, 1200,
    )
    .await;
}

async fn fetch_dashboard(pool: &PgPool, token: &str, query: &str) -> serde_json::Value {
    let app = common::build_test_app(pool.clone());
    let response = get_auth(app, &format!("/api/dashboard{query}"), token).await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["data"].clone()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

/// Summary, comparison, trends, and recent list for an explicit month.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_dashboard_for_explicit_month(pool: PgPool) {
    let (_user, token) = common::seed_user_with_token(&pool).await;
    seed_spring_2025(&pool, &token).await;

    let data = fetch_dashboard(&pool, &token, "?month=3&year=2025").await;

    let summary = &data["summary"];
    assert_eq!(summary["total_projects"], 3);
    assert_eq!(summary["completed"], 1);
    assert_eq!(summary["in_progress"], 1);
    assert_eq!(summary["pending"], 1);
    assert_eq!(summary["total_amount"], 610.0);
    assert_eq!(summary["total_words"], 11500);
    // Both open March projects are past due by now.
    assert_eq!(summary["overdue"], 2);

    // Baseline defaults to the month before.
    let comparison = &data["comparison"];
    assert_eq!(comparison["baseline"]["total_projects"], 1);
    assert_eq!(comparison["project_change_pct"], 200.0);

    // Six months ending at the summary period, oldest first, zero-filled.
    let trends = data["trends"].as_array().unwrap();
    assert_eq!(trends.len(), 6);
    assert_eq!(trends[0]["year"], 2024);
    assert_eq!(trends[0]["month"], 10);
    assert_eq!(trends[4]["total"], 1);
    assert_eq!(trends[5]["month"], 3);
    assert_eq!(trends[5]["total"], 3);
    assert_eq!(trends[5]["completed"], 1);

    // Latest submissions lead the recent list.
    let recent = data["recent"].as_array().unwrap();
    assert_eq!(recent.len(), 4);
    assert_eq!(recent[0]["topic"], "March three");
    assert_eq!(recent[1]["topic"], "March two");
}

/// An explicit baseline period overrides the default previous month.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_dashboard_explicit_baseline(pool: PgPool) {
    let (_user, token) = common::seed_user_with_token(&pool).await;
    seed_spring_2025(&pool, &token).await;
    seed_project(
        &pool, &token, "January one", "completed",
        "2025-01-10T12:00:00Z", "2025-01-20T12:00:00Z", 500.0, 6000,
    )
    .await;

    let data = fetch_dashboard(
        &pool,
        &token,
        "?month=3&year=2025&compare_month=1&compare_year=2025",
    )
    .await;

    let comparison = &data["comparison"];
    assert_eq!(comparison["baseline"]["total_projects"], 1);
    assert_eq!(comparison["baseline"]["total_amount"], 500.0);
    // 3 projects against 1.
    assert_eq!(comparison["project_change_pct"], 200.0);
}

/// A baseline month without any orders reports full growth, not a
/// division error.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_dashboard_zero_baseline(pool: PgPool) {
    let (_user, token) = common::seed_user_with_token(&pool).await;
    seed_project(
        &pool, &token, "Lone order", "pending",
        "2025-06-10T12:00:00Z", "2025-06-25T12:00:00Z", 200.0, 3000,
    )
    .await;

    let data = fetch_dashboard(&pool, &token, "?month=6&year=2025").await;
    assert_eq!(data["summary"]["total_projects"], 1);
    assert_eq!(data["comparison"]["baseline"]["total_projects"], 0);
    assert_eq!(data["comparison"]["project_change_pct"], 100.0);
    assert_eq!(data["comparison"]["amount_change_pct"], 100.0);
}

/// Without parameters the summary covers the current month.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_dashboard_defaults_to_current_month(pool: PgPool) {
    let (_user, token) = common::seed_user_with_token(&pool).await;

    let now = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
    seed_project(&pool, &token, "This month", "pending", &now, &now, 150.0, 2500).await;

    let data = fetch_dashboard(&pool, &token, "").await;
    assert_eq!(data["summary"]["total_projects"], 1);
    assert_eq!(data["summary"]["total_amount"], 150.0);
    assert_eq!(data["trends"].as_array().unwrap().len(), 6);
}

/// Out-of-range months are rejected, for both the period and the baseline.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_dashboard_rejects_bad_month(pool: PgPool) {
    let (_user, token) = common::seed_user_with_token(&pool).await;

    let app = common::build_test_app(pool.clone());
    let response = get_auth(app, "/api/dashboard?month=13", &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("between 1 and 12"));

    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/dashboard?compare_month=0", &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
