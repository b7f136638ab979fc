//! Request handlers, one submodule per resource.
//!
//! Handlers delegate to the repositories in `gigtrack_db` (and to the
//! deriver in `gigtrack_core` for the notification feed) and map errors
//! via [`crate::error::AppError`].

pub mod auth;
pub mod dashboard;
pub mod notification;
pub mod project;
