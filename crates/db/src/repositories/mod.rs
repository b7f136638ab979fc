//! Data access repositories.
//!
//! Zero-sized structs with async methods taking `&PgPool` as the first
//! argument. SQL strings share a `COLUMNS` const per table; partial
//! updates use `COALESCE` so `None` fields leave columns untouched.

pub mod notification_repo;
pub mod project_repo;
pub mod session_repo;
pub mod user_repo;

pub use notification_repo::NotificationRepo;
pub use project_repo::ProjectRepo;
pub use session_repo::SessionRepo;
pub use user_repo::UserRepo;
