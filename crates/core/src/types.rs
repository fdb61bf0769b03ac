/// Primary key type used by every table (`BIGSERIAL`).
pub type DbId = i64;

/// Timestamp type used for `TIMESTAMPTZ` columns.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
