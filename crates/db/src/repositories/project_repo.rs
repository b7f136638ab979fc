//! Repository for the `projects` table.
//!
//! The listing query keeps its SQL static by binding every optional filter
//! as a possibly-NULL parameter; sort keys come from a closed enum, so no
//! user text is ever spliced into the statement.

use gigtrack_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::project::{CreateProject, Project, ProjectSearch, UpdateProject};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, topic, order_ref_code, order_type, order_date, submission_date, \
                       status, priority, words, cpp, amount, has_code, code_amount, notes, \
                       created_at, last_updated";

/// Shared WHERE clause for `search` and `count_search` ($1-$5).
const SEARCH_FILTER: &str = "($1::text IS NULL \
        OR topic ILIKE $1 OR order_ref_code ILIKE $1 OR order_type ILIKE $1 \
        OR status ILIKE $1 OR priority ILIKE $1 OR notes ILIKE $1) \
     AND ($2::text IS NULL OR status = $2) \
     AND ($3::text IS NULL OR order_type = $3) \
     AND ($4::timestamptz IS NULL OR order_date >= $4) \
     AND ($5::timestamptz IS NULL OR order_date <= $5)";

/// Triage ordering: completed last, then anything due within two days (or
/// overdue) first, then current-month orders, newer months before older,
/// ties by order date descending.
const TRIAGE_ORDER: &str = "(status = 'completed') ASC, \
     (status <> 'completed' AND submission_date <= $6::timestamptz + INTERVAL '2 days') DESC, \
     (date_trunc('month', order_date) = date_trunc('month', $6::timestamptz)) DESC, \
     date_trunc('month', order_date) DESC, \
     order_date DESC";

/// Build an ILIKE pattern from raw input, escaping the LIKE wildcards.
fn like_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

/// Provides CRUD and listing operations for projects.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Insert a new project, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateProject) -> Result<Project, sqlx::Error> {
        let query = format!(
            "INSERT INTO projects
                (topic, order_ref_code, order_type, order_date, submission_date,
                 status, priority, words, cpp, amount, has_code, code_amount, notes)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(&input.topic)
            .bind(&input.order_ref_code)
            .bind(&input.order_type)
            .bind(input.order_date)
            .bind(input.submission_date)
            .bind(input.status.as_str())
            .bind(&input.priority)
            .bind(input.words)
            .bind(input.cpp)
            .bind(input.amount)
            .bind(input.has_code)
            .bind(input.code_amount)
            .bind(&input.notes)
            .fetch_one(pool)
            .await
    }

    /// Find a project by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List every project, newest order first. Feeds the deriver and the
    /// dashboard, both of which want the full set.
    pub async fn list(pool: &PgPool) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects ORDER BY order_date DESC");
        sqlx::query_as::<_, Project>(&query).fetch_all(pool).await
    }

    /// The most recently due projects, latest submission date first.
    pub async fn recent_by_submission(
        pool: &PgPool,
        limit: i64,
    ) -> Result<Vec<Project>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM projects ORDER BY submission_date DESC LIMIT $1");
        sqlx::query_as::<_, Project>(&query)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Filtered, sorted page of projects. `now` anchors the triage
    /// ordering's due-window so a page render and its tests agree on the
    /// clock.
    pub async fn search(
        pool: &PgPool,
        params: &ProjectSearch,
        now: Timestamp,
    ) -> Result<Vec<Project>, sqlx::Error> {
        let pattern = params.term.as_deref().map(like_pattern);
        let status = params.status.map(|s| s.as_str());

        let query = match params.sort {
            Some((key, dir)) => format!(
                "SELECT {COLUMNS} FROM projects WHERE {SEARCH_FILTER} \
                 ORDER BY {column} {dir}, id ASC \
                 LIMIT $6 OFFSET $7",
                column = key.column(),
                dir = dir.keyword(),
            ),
            None => format!(
                "SELECT {COLUMNS} FROM projects WHERE {SEARCH_FILTER} \
                 ORDER BY {TRIAGE_ORDER} \
                 LIMIT $7 OFFSET $8"
            ),
        };

        let mut q = sqlx::query_as::<_, Project>(&query)
            .bind(pattern)
            .bind(status)
            .bind(&params.order_type)
            .bind(params.from)
            .bind(params.to);
        if params.sort.is_none() {
            q = q.bind(now);
        }
        q.bind(params.limit)
            .bind(params.offset)
            .fetch_all(pool)
            .await
    }

    /// Total rows matching the search filter, for page math.
    pub async fn count_search(pool: &PgPool, params: &ProjectSearch) -> Result<i64, sqlx::Error> {
        let pattern = params.term.as_deref().map(like_pattern);
        let status = params.status.map(|s| s.as_str());

        let query = format!("SELECT COUNT(*) FROM projects WHERE {SEARCH_FILTER}");
        sqlx::query_scalar(&query)
            .bind(pattern)
            .bind(status)
            .bind(&params.order_type)
            .bind(params.from)
            .bind(params.to)
            .fetch_one(pool)
            .await
    }

    /// Update a project. Only non-`None` fields in `input` are applied;
    /// any update stamps `last_updated`.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProject,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET
                topic = COALESCE($2, topic),
                order_ref_code = COALESCE($3, order_ref_code),
                order_type = COALESCE($4, order_type),
                order_date = COALESCE($5, order_date),
                submission_date = COALESCE($6, submission_date),
                status = COALESCE($7, status),
                priority = COALESCE($8, priority),
                words = COALESCE($9, words),
                cpp = COALESCE($10, cpp),
                amount = COALESCE($11, amount),
                has_code = COALESCE($12, has_code),
                code_amount = COALESCE($13, code_amount),
                notes = COALESCE($14, notes),
                last_updated = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(&input.topic)
            .bind(&input.order_ref_code)
            .bind(&input.order_type)
            .bind(input.order_date)
            .bind(input.submission_date)
            .bind(input.status.map(|s| s.as_str()))
            .bind(&input.priority)
            .bind(input.words)
            .bind(input.cpp)
            .bind(input.amount)
            .bind(input.has_code)
            .bind(input.code_amount)
            .bind(&input.notes)
            .fetch_optional(pool)
            .await
    }

    /// Permanently delete a project. The notification FK cascades, so the
    /// project's alert goes with it. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
