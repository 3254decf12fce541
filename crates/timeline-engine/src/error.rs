//! Error types for timeline-engine operations.

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors raised while validating candidates, policies, or candidate documents.
///
/// The scheduling loop itself never fails; every variant here is produced
/// before a run starts.
#[derive(Error, Debug)]
pub enum ScheduleError {
    #[error("Invalid window for candidate {id}: start {starts_at} is not before end {ends_at}")]
    InvalidWindow {
        id: u64,
        starts_at: DateTime<Utc>,
        ends_at: DateTime<Utc>,
    },

    #[error("Unknown candidate kind: {0}")]
    UnknownKind(String),

    #[error("Invalid timestamp '{value}': {reason}")]
    InvalidTimestamp { value: String, reason: String },

    #[error("Duplicate candidate id: {0}")]
    DuplicateId(u64),

    #[error("Invalid switch policy: {0}")]
    InvalidPolicy(String),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias used throughout timeline-engine.
pub type Result<T> = std::result::Result<T, ScheduleError>;
