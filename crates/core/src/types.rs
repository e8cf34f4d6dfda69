/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// Canvas object ids (courses, users, quizzes) are 64-bit integers.
pub type CanvasId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
