/// Database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// Timestamps are UTC everywhere; conversion to local time is a display
/// concern.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
