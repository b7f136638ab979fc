//! HTTP-level integration tests for the project endpoints: CRUD,
//! search, filters, sorting, and pagination.

mod common;

use axum::http::StatusCode;
use chrono::{Duration, SecondsFormat, Utc};
use common::{body_json, delete_auth, get_auth, patch_json_auth, post_json_auth};
use sqlx::PgPool;

/// RFC 3339 string for `now + days`, safe to embed in a query string.
fn days_from_now(days: i64) -> String {
    (Utc::now() + Duration::days(days)).to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// A minimal create body: ordered now, due in `due_days`.
fn project_body(topic: &str, due_days: i64) -> serde_json::Value {
    serde_json::json!({
        "topic": topic,
        "order_date": days_from_now(0),
        "submission_date": days_from_now(due_days),
    })
}

/// Create a project through the API and return its JSON representation.
async fn create_project(pool: &PgPool, token: &str, body: serde_json::Value) -> serde_json::Value {
    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(app, "/api/projects", body, token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"].clone()
}

/// Fetch the listing with the given query string and return the page payload.
async fn list_projects(pool: &PgPool, token: &str, query: &str) -> serde_json::Value {
    let app = common::build_test_app(pool.clone());
    let response = get_auth(app, &format!("/api/projects{query}"), token).await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["data"].clone()
}

// ---------------------------------------------------------------------------
// CRUD
// ---------------------------------------------------------------------------

/// Create fills defaults and the row can be fetched back by id.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_and_fetch_project(pool: PgPool) {
    let (_user, token) = common::seed_user_with_token(&pool).await;

    let body = serde_json::json!({
        "topic": "Climate essay",
        "order_ref_code": "ORD-100",
        "order_date": days_from_now(0),
        "submission_date": days_from_now(10),
        "words": 2500,
        "cpp": 0.05,
        "amount": 125.0,
    });
    let created = create_project(&pool, &token, body).await;

    assert_eq!(created["topic"], "Climate essay");
    assert_eq!(created["status"], "pending");
    assert_eq!(created["order_type"], "normal");
    assert_eq!(created["priority"], "medium");
    assert_eq!(created["words"], 2500);
    assert!(created["last_updated"].is_null());

    let id = created["id"].as_i64().unwrap();
    let app = common::build_test_app(pool);
    let response = get_auth(app, &format!("/api/projects/{id}"), &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let fetched = body_json(response).await;
    assert_eq!(fetched["data"]["id"], id);
    assert_eq!(fetched["data"]["order_ref_code"], "ORD-100");
}

/// Negative numeric fields are rejected with a validation error.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_rejects_negative_values(pool: PgPool) {
    let (_user, token) = common::seed_user_with_token(&pool).await;

    let mut body = project_body("Bad numbers", 5);
    body["words"] = serde_json::json!(-100);
    body["amount"] = serde_json::json!(-1.0);

    let app = common::build_test_app(pool);
    let response = post_json_auth(app, "/api/projects", body, &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

/// Fetching an id that does not exist returns 404.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_get_unknown_project_returns_404(pool: PgPool) {
    let (_user, token) = common::seed_user_with_token(&pool).await;
    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/projects/9999", &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

/// PATCH updates only the supplied fields and bumps `last_updated`.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_patch_updates_subset(pool: PgPool) {
    let (_user, token) = common::seed_user_with_token(&pool).await;
    let created = create_project(&pool, &token, project_body("Patch me", 7)).await;
    let id = created["id"].as_i64().unwrap();

    let patch = serde_json::json!({ "status": "in-progress", "words": 4000 });
    let app = common::build_test_app(pool);
    let response = patch_json_auth(app, &format!("/api/projects/{id}"), patch, &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "in-progress");
    assert_eq!(json["data"]["words"], 4000);
    // Untouched fields keep their values.
    assert_eq!(json["data"]["topic"], "Patch me");
    assert!(
        json["data"]["last_updated"].is_string(),
        "update must set last_updated"
    );
}

/// DELETE removes the row; repeating it returns 404.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_delete_project(pool: PgPool) {
    let (_user, token) = common::seed_user_with_token(&pool).await;
    let created = create_project(&pool, &token, project_body("Delete me", 3)).await;
    let id = created["id"].as_i64().unwrap();

    let app = common::build_test_app(pool.clone());
    let response = delete_auth(app, &format!("/api/projects/{id}"), &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let app = common::build_test_app(pool.clone());
    let response = get_auth(app, &format!("/api/projects/{id}"), &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let app = common::build_test_app(pool);
    let response = delete_auth(app, &format!("/api/projects/{id}"), &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Listing: triage order
// ---------------------------------------------------------------------------

/// Without an explicit sort the listing triages: due work first, then the
/// current month, then older months, completed always last.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_list_default_triage_order(pool: PgPool) {
    let (_user, token) = common::seed_user_with_token(&pool).await;

    // Ordered long ago, due far out: the "older month" bucket.
    let mut old = project_body("Old backlog", 30);
    old["order_date"] = serde_json::json!(days_from_now(-400));
    let old = create_project(&pool, &token, old).await;

    // Ordered this month, not due soon.
    let current = create_project(&pool, &token, project_body("Current month", 30)).await;

    // Due tomorrow: tops the triage regardless of order month.
    let due = create_project(&pool, &token, project_body("Due tomorrow", 1)).await;

    // Completed: always last.
    let mut done = project_body("Finished", 1);
    done["status"] = serde_json::json!("completed");
    let done = create_project(&pool, &token, done).await;

    let page = list_projects(&pool, &token, "").await;
    let ids: Vec<i64> = page["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_i64().unwrap())
        .collect();

    assert_eq!(
        ids,
        vec![
            due["id"].as_i64().unwrap(),
            current["id"].as_i64().unwrap(),
            old["id"].as_i64().unwrap(),
            done["id"].as_i64().unwrap(),
        ]
    );
}

// ---------------------------------------------------------------------------
// Listing: search and filters
// ---------------------------------------------------------------------------

/// `search` matches topic and notes case-insensitively.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_list_search(pool: PgPool) {
    let (_user, token) = common::seed_user_with_token(&pool).await;

    create_project(&pool, &token, project_body("Quantum mechanics essay", 5)).await;
    let mut with_notes = project_body("History paper", 5);
    with_notes["notes"] = serde_json::json!("needs quantum chapter review");
    create_project(&pool, &token, with_notes).await;
    create_project(&pool, &token, project_body("Biology report", 5)).await;

    let page = list_projects(&pool, &token, "?search=QUANTUM").await;
    assert_eq!(page["total"], 2);

    let page = list_projects(&pool, &token, "?search=biology").await;
    assert_eq!(page["total"], 1);
    assert_eq!(page["items"][0]["topic"], "Biology report");
}

/// `status` filters exactly; an unknown status is a 400.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_list_status_filter(pool: PgPool) {
    let (_user, token) = common::seed_user_with_token(&pool).await;

    create_project(&pool, &token, project_body("Open one", 5)).await;
    let mut done = project_body("Done one", 5);
    done["status"] = serde_json::json!("completed");
    create_project(&pool, &token, done).await;

    let page = list_projects(&pool, &token, "?status=completed").await;
    assert_eq!(page["total"], 1);
    assert_eq!(page["items"][0]["topic"], "Done one");

    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/projects?status=bogus", &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

/// `from`/`to` bound the order date inclusively.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_list_date_range_filter(pool: PgPool) {
    let (_user, token) = common::seed_user_with_token(&pool).await;

    let mut recent = project_body("Recent order", 10);
    recent["order_date"] = serde_json::json!(days_from_now(-2));
    create_project(&pool, &token, recent).await;

    let mut ancient = project_body("Ancient order", 10);
    ancient["order_date"] = serde_json::json!(days_from_now(-90));
    create_project(&pool, &token, ancient).await;

    let query = format!("?from={}&to={}", days_from_now(-7), days_from_now(0));
    let page = list_projects(&pool, &token, &query).await;
    assert_eq!(page["total"], 1);
    assert_eq!(page["items"][0]["topic"], "Recent order");
}

/// Explicit column sort overrides the triage order.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_list_sort_by_amount(pool: PgPool) {
    let (_user, token) = common::seed_user_with_token(&pool).await;

    for (topic, amount) in [("Mid", 200.0), ("Low", 100.0), ("High", 300.0)] {
        let mut body = project_body(topic, 5);
        body["amount"] = serde_json::json!(amount);
        create_project(&pool, &token, body).await;
    }

    let page = list_projects(&pool, &token, "?sort_by=amount").await;
    let topics: Vec<&str> = page["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["topic"].as_str().unwrap())
        .collect();
    assert_eq!(topics, vec!["Low", "Mid", "High"]);

    let page = list_projects(&pool, &token, "?sort_by=amount&sort_dir=desc").await;
    assert_eq!(page["items"][0]["topic"], "High");
}

// ---------------------------------------------------------------------------
// Listing: pagination
// ---------------------------------------------------------------------------

/// Page math: sizes clamp, out-of-range pages fold back to the last page.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_list_pagination(pool: PgPool) {
    let (_user, token) = common::seed_user_with_token(&pool).await;

    for i in 0..12 {
        create_project(&pool, &token, project_body(&format!("Project {i}"), 5)).await;
    }

    let page = list_projects(&pool, &token, "?page_size=5").await;
    assert_eq!(page["items"].as_array().unwrap().len(), 5);
    assert_eq!(page["total"], 12);
    assert_eq!(page["total_pages"], 3);
    assert_eq!(page["page"], 1);

    // Out-of-range page clamps to the last page with the remainder.
    let page = list_projects(&pool, &token, "?page_size=5&page=9").await;
    assert_eq!(page["page"], 3);
    assert_eq!(page["items"].as_array().unwrap().len(), 2);

    // A page size outside the allowed options is rejected.
    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/projects?page_size=7", &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
