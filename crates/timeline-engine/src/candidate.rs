//! Candidate streams -- the immutable input records of a scheduling run.

use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{de, Deserialize, Deserializer, Serialize};

use crate::error::{Result, ScheduleError};

/// How firmly a candidate's window is known.
///
/// The declaration order matters: `Estimated` sorts before `Scheduled`, which
/// is the tie-break the window filter applies among equal priorities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CandidateKind {
    /// Approximate timing (a "guesstimate"); subject to warm-up damping.
    #[serde(rename = "GUESSTIMATE")]
    Estimated,
    /// Firm start and end.
    #[serde(rename = "SCHEDULED")]
    Scheduled,
}

impl CandidateKind {
    /// The tag used for this kind in candidate documents.
    pub fn as_str(self) -> &'static str {
        match self {
            CandidateKind::Estimated => "GUESSTIMATE",
            CandidateKind::Scheduled => "SCHEDULED",
        }
    }
}

impl fmt::Display for CandidateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CandidateKind {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "GUESSTIMATE" => Ok(CandidateKind::Estimated),
            "SCHEDULED" => Ok(CandidateKind::Scheduled),
            other => Err(ScheduleError::UnknownKind(other.to_string())),
        }
    }
}

/// One viewable item over a time window.
///
/// Deserializing goes through [`Candidate::new`], so an inverted window is
/// rejected there too.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Candidate {
    pub id: u64,
    /// Channel or source name. Opaque to the scheduler.
    pub label: String,
    pub kind: CandidateKind,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    /// Higher is more preferred.
    pub priority: i32,
}

/// Serialized field layout of a [`Candidate`], before window validation.
#[derive(Deserialize)]
struct CandidateFields {
    id: u64,
    label: String,
    kind: CandidateKind,
    starts_at: DateTime<Utc>,
    ends_at: DateTime<Utc>,
    priority: i32,
}

impl<'de> Deserialize<'de> for Candidate {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let f = CandidateFields::deserialize(deserializer)?;
        Candidate::new(f.id, f.label, f.kind, f.starts_at, f.ends_at, f.priority)
            .map_err(de::Error::custom)
    }
}

impl Candidate {
    /// Build a candidate, rejecting windows where `starts_at >= ends_at`.
    ///
    /// # Errors
    /// Returns `ScheduleError::InvalidWindow` for an empty or inverted window.
    pub fn new(
        id: u64,
        label: impl Into<String>,
        kind: CandidateKind,
        starts_at: DateTime<Utc>,
        ends_at: DateTime<Utc>,
        priority: i32,
    ) -> Result<Self> {
        if starts_at >= ends_at {
            return Err(ScheduleError::InvalidWindow {
                id,
                starts_at,
                ends_at,
            });
        }
        Ok(Self {
            id,
            label: label.into(),
            kind,
            starts_at,
            ends_at,
            priority,
        })
    }

    /// Whether `t` lies strictly inside the window.
    ///
    /// Boundary instants are excluded: a candidate is not eligible at the exact
    /// moment it starts or ends.
    pub fn contains(&self, t: DateTime<Utc>) -> bool {
        self.starts_at < t && t < self.ends_at
    }

    /// Selection preference: priority descending, then `Estimated` before `Scheduled`.
    ///
    /// Returns `Ordering::Less` when `self` should be picked ahead of `other`.
    /// Candidates that compare `Equal` are left in input order by a stable sort.
    pub fn preference(&self, other: &Candidate) -> Ordering {
        other
            .priority
            .cmp(&self.priority)
            .then_with(|| self.kind.cmp(&other.kind))
    }
}
