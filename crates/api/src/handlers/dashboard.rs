//! Handlers for the `/dashboard` resource.
//!
//! One aggregation endpoint: a month summary with a comparison period,
//! a six-month trend window, and the latest submissions. All figures
//! come from `gigtrack_core::stats` over the full project set; only the
//! recent list is a dedicated query.

use axum::extract::{Query, State};
use axum::Json;
use chrono::{Datelike, Utc};
use gigtrack_core::stats::{self, Comparison, MonthlyTrend, Period, ProjectFigures, Summary};
use gigtrack_db::models::project::Project;
use gigtrack_db::repositories::ProjectRepo;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// How many calendar months the trend window spans.
const TREND_MONTHS: u32 = 6;

/// How many projects the recent list carries.
const RECENT_LIMIT: i64 = 10;

// ---------------------------------------------------------------------------
// Query / response types
// ---------------------------------------------------------------------------

/// Query parameters for `GET /dashboard`.
///
/// `month`/`year` select the summary period (default: the current
/// month). `compare_month`/`compare_year` select the baseline (default:
/// the month before the summary period). Months are 1-12.
#[derive(Debug, Deserialize)]
pub struct DashboardQuery {
    pub month: Option<u32>,
    pub year: Option<i32>,
    pub compare_month: Option<u32>,
    pub compare_year: Option<i32>,
}

/// Response body for `GET /dashboard`.
#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub summary: Summary,
    pub comparison: Comparison,
    pub trends: Vec<MonthlyTrend>,
    pub recent: Vec<Project>,
}

// ---------------------------------------------------------------------------
// Handler
// ---------------------------------------------------------------------------

/// GET /api/dashboard
pub async fn overview(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<DashboardQuery>,
) -> AppResult<Json<DataResponse<DashboardResponse>>> {
    let now = Utc::now();

    for month in [params.month, params.compare_month].into_iter().flatten() {
        if !(1..=12).contains(&month) {
            return Err(AppError::BadRequest(format!(
                "Month must be between 1 and 12, got {month}"
            )));
        }
    }

    let period = Period {
        year: params.year.unwrap_or_else(|| now.year()),
        month: params.month.unwrap_or_else(|| now.month()),
    };

    let default_baseline = period.previous();
    let baseline = Period {
        year: params.compare_year.unwrap_or(default_baseline.year),
        month: params.compare_month.unwrap_or(default_baseline.month),
    };

    let projects = ProjectRepo::list(&state.pool).await?;
    let figures: Vec<ProjectFigures> = projects.iter().map(|p| p.to_figures()).collect();

    let summary = stats::summarize(&figures, period, now);
    let comparison = stats::compare(&figures, period, baseline, now);
    let trends = stats::monthly_trends(&figures, period, TREND_MONTHS);
    let recent = ProjectRepo::recent_by_submission(&state.pool, RECENT_LIMIT).await?;

    Ok(Json(DataResponse {
        data: DashboardResponse {
            summary,
            comparison,
            trends,
            recent,
        },
    }))
}
