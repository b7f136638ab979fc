//! Row models and DTOs.
//!
//! Each submodule holds:
//! - a `FromRow` + `Serialize` entity struct matching the database row
//! - a `Deserialize` create DTO for inserts
//! - a `Deserialize` update DTO (all `Option` fields) for patches
//!
//! Entity structs also carry the conversions into the pure-core input
//! types (`ProjectRecord`, `StoredNotification`, `ProjectFigures`), which
//! is the only bridge between rows and the deriver.

pub mod notification;
pub mod project;
pub mod session;
pub mod user;
