/// Every record id is allocated from the store's BIGSERIAL-like sequence.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
