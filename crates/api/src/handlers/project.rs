//! Handlers for the `/projects` resource.
//!
//! All endpoints require authentication via [`AuthUser`].

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use gigtrack_core::error::CoreError;
use gigtrack_core::pagination;
use gigtrack_core::project::ProjectStatus;
use gigtrack_core::types::{DbId, Timestamp};
use gigtrack_db::models::project::{
    CreateProject, Project, ProjectSearch, ProjectSort, SortDir, UpdateProject,
};
use gigtrack_db::repositories::ProjectRepo;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::PageParams;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Query / response types
// ---------------------------------------------------------------------------

/// Filter and sort parameters for `GET /projects`.
///
/// `from`/`to` are RFC 3339 timestamps bounding `order_date` inclusively.
/// Omitting `sort_by` selects the triage order (completed last, then due
/// or overdue work, then the current month, then newer months first).
/// An explicit `sort_by` without `sort_dir` sorts ascending.
#[derive(Debug, Deserialize)]
pub struct ListProjectsQuery {
    pub search: Option<String>,
    pub status: Option<String>,
    pub order_type: Option<String>,
    pub from: Option<Timestamp>,
    pub to: Option<Timestamp>,
    pub sort_by: Option<ProjectSort>,
    pub sort_dir: Option<SortDir>,
}

/// One page of the project listing.
#[derive(Debug, Serialize)]
pub struct ProjectPage {
    pub items: Vec<Project>,
    pub page: u32,
    pub page_size: u32,
    pub total: i64,
    pub total_pages: u32,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/projects
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateProject>,
) -> AppResult<(StatusCode, Json<DataResponse<Project>>)> {
    let errors = input.validate();
    if !errors.is_empty() {
        return Err(AppError::Core(CoreError::Validation(errors.join("; "))));
    }

    let project = ProjectRepo::create(&state.pool, &input).await?;

    tracing::info!(project_id = project.id, user_id = auth.user_id, "Project created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: project })))
}

/// GET /api/projects
///
/// Search + filtered + sorted + paginated listing.
pub async fn list(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(filter): Query<ListProjectsQuery>,
    Query(page_params): Query<PageParams>,
) -> AppResult<Json<DataResponse<ProjectPage>>> {
    let (page, page_size) = page_params.resolve()?;

    let status = match &filter.status {
        Some(raw) => Some(ProjectStatus::parse(raw).ok_or_else(|| {
            AppError::BadRequest(format!("Unknown status filter: {raw}"))
        })?),
        None => None,
    };

    let sort = filter
        .sort_by
        .map(|key| (key, filter.sort_dir.unwrap_or(SortDir::Asc)));

    let mut params = ProjectSearch {
        term: filter.search.filter(|s| !s.trim().is_empty()),
        status,
        order_type: filter.order_type.filter(|s| !s.trim().is_empty()),
        from: filter.from,
        to: filter.to,
        sort,
        limit: 0,
        offset: 0,
    };

    let total = ProjectRepo::count_search(&state.pool, &params).await?;

    let page = pagination::clamp_page(page, total as usize, page_size);
    params.limit = i64::from(page_size);
    params.offset = i64::from((page - 1) * page_size);

    let items = ProjectRepo::search(&state.pool, &params, Utc::now()).await?;

    Ok(Json(DataResponse {
        data: ProjectPage {
            items,
            page,
            page_size,
            total,
            total_pages: pagination::total_pages(total as usize, page_size),
        },
    }))
}

/// GET /api/projects/{id}
pub async fn get_by_id(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Project>>> {
    let project = ProjectRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))?;
    Ok(Json(DataResponse { data: project }))
}

/// PATCH /api/projects/{id}
///
/// Partial update; omitted fields keep their current value. Bumps
/// `last_updated`.
pub async fn update(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateProject>,
) -> AppResult<Json<DataResponse<Project>>> {
    let project = ProjectRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))?;

    tracing::info!(project_id = id, user_id = auth.user_id, "Project updated");

    Ok(Json(DataResponse { data: project }))
}

/// DELETE /api/projects/{id}
///
/// Hard delete; the project's notification row goes with it via the
/// foreign-key cascade.
pub async fn delete(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deleted = ProjectRepo::delete(&state.pool, id).await?;
    if deleted {
        tracing::info!(project_id = id, user_id = auth.user_id, "Project deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))
    }
}
