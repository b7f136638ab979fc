//! Project entity model, DTOs, and listing parameters.

use gigtrack_core::feed::ProjectRecord;
use gigtrack_core::project::ProjectStatus;
use gigtrack_core::stats::ProjectFigures;
use gigtrack_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A project row from the `projects` table. `status` is constrained to the
/// [`ProjectStatus`] vocabulary by a CHECK constraint.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Project {
    pub id: DbId,
    pub topic: Option<String>,
    pub order_ref_code: Option<String>,
    pub order_type: String,
    pub order_date: Timestamp,
    pub submission_date: Timestamp,
    pub status: String,
    pub priority: String,
    pub words: i32,
    pub cpp: f64,
    pub amount: f64,
    pub has_code: bool,
    pub code_amount: f64,
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub last_updated: Option<Timestamp>,
}

impl Project {
    /// Status as the core enum. Unknown strings (which the CHECK constraint
    /// rules out) fall back to pending.
    pub fn status_enum(&self) -> ProjectStatus {
        ProjectStatus::parse(&self.status).unwrap_or_default()
    }

    /// The deriver's view of this row.
    pub fn to_record(&self) -> ProjectRecord {
        ProjectRecord {
            id: self.id,
            topic: self.topic.clone(),
            order_ref_code: self.order_ref_code.clone(),
            status: self.status_enum(),
            order_date: self.order_date,
            submission_date: self.submission_date,
            last_updated: self.last_updated,
        }
    }

    /// The dashboard's view of this row.
    pub fn to_figures(&self) -> ProjectFigures {
        ProjectFigures {
            status: self.status_enum(),
            order_type: self.order_type.clone(),
            order_date: self.order_date,
            submission_date: self.submission_date,
            amount: self.amount,
            words: i64::from(self.words),
        }
    }
}

fn default_order_type() -> String {
    "normal".to_string()
}

fn default_priority() -> String {
    "medium".to_string()
}

/// DTO for creating a new project.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProject {
    pub topic: Option<String>,
    pub order_ref_code: Option<String>,
    #[serde(default = "default_order_type")]
    pub order_type: String,
    pub order_date: Timestamp,
    pub submission_date: Timestamp,
    #[serde(default)]
    pub status: ProjectStatus,
    #[serde(default = "default_priority")]
    pub priority: String,
    #[serde(default)]
    pub words: i32,
    #[serde(default)]
    pub cpp: f64,
    #[serde(default)]
    pub amount: f64,
    #[serde(default)]
    pub has_code: bool,
    #[serde(default)]
    pub code_amount: f64,
    pub notes: Option<String>,
}

impl CreateProject {
    /// Field-level checks the type system cannot express. Returns an empty
    /// `Vec` when valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.words < 0 {
            errors.push("words must not be negative".to_string());
        }
        if self.cpp < 0.0 {
            errors.push("cpp must not be negative".to_string());
        }
        if self.amount < 0.0 {
            errors.push("amount must not be negative".to_string());
        }
        if self.code_amount < 0.0 {
            errors.push("code_amount must not be negative".to_string());
        }
        errors
    }
}

/// DTO for updating an existing project. All fields are optional; `None`
/// leaves the column untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProject {
    pub topic: Option<String>,
    pub order_ref_code: Option<String>,
    pub order_type: Option<String>,
    pub order_date: Option<Timestamp>,
    pub submission_date: Option<Timestamp>,
    pub status: Option<ProjectStatus>,
    pub priority: Option<String>,
    pub words: Option<i32>,
    pub cpp: Option<f64>,
    pub amount: Option<f64>,
    pub has_code: Option<bool>,
    pub code_amount: Option<f64>,
    pub notes: Option<String>,
}

// ---------------------------------------------------------------------------
// Listing parameters
// ---------------------------------------------------------------------------

/// Sortable columns for the project listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectSort {
    OrderDate,
    SubmissionDate,
    Topic,
    Status,
    Amount,
    Words,
}

impl ProjectSort {
    /// The column this sort key maps to. Keys are a closed enum, so sort
    /// input can never reach SQL as raw text.
    pub fn column(self) -> &'static str {
        match self {
            ProjectSort::OrderDate => "order_date",
            ProjectSort::SubmissionDate => "submission_date",
            ProjectSort::Topic => "topic",
            ProjectSort::Status => "status",
            ProjectSort::Amount => "amount",
            ProjectSort::Words => "words",
        }
    }
}

/// Sort direction for the project listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDir {
    Asc,
    Desc,
}

impl SortDir {
    pub fn keyword(self) -> &'static str {
        match self {
            SortDir::Asc => "ASC",
            SortDir::Desc => "DESC",
        }
    }
}

/// Repository-level search parameters, assembled by the API layer from
/// query-string input. `limit`/`offset` arrive pre-computed from page
/// math.
#[derive(Debug, Clone)]
pub struct ProjectSearch {
    /// Case-insensitive substring across topic, ref code, type, status,
    /// priority, and notes.
    pub term: Option<String>,
    pub status: Option<ProjectStatus>,
    pub order_type: Option<String>,
    /// Inclusive range on `order_date`.
    pub from: Option<Timestamp>,
    pub to: Option<Timestamp>,
    /// Explicit column sort; `None` means triage order.
    pub sort: Option<(ProjectSort, SortDir)>,
    pub limit: i64,
    pub offset: i64,
}
