//! Candidate documents -- JSON in, validated [`Candidate`]s out.
//!
//! The document is a JSON array of records:
//!
//! ```json
//! [{
//!   "id": 1,
//!   "channel": "twitch.tv/ninja",
//!   "type": "GUESSTIMATE",
//!   "startsAt": "Thu Jan 17 10:12:00 PST 2019",
//!   "endsAt": "Thu Jan 17 16:21:00 PST 2019",
//!   "priority": 10
//! }]
//! ```
//!
//! `type` is `GUESSTIMATE` or `SCHEDULED`. Instants are either RFC 3339 or the
//! Unix `date` layout with a zone abbreviation from [`zone_offset`].

use std::collections::HashSet;

use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone, Utc};
use serde::Deserialize;
use tracing::debug;

use crate::candidate::{Candidate, CandidateKind};
use crate::error::{Result, ScheduleError};

/// Wire shape of one candidate record.
#[derive(Debug, Deserialize)]
struct CandidateRecord {
    id: u64,
    channel: String,
    #[serde(rename = "type")]
    kind: String,
    #[serde(rename = "startsAt")]
    starts_at: String,
    #[serde(rename = "endsAt")]
    ends_at: String,
    priority: i32,
}

impl CandidateRecord {
    fn into_candidate(self) -> Result<Candidate> {
        let kind: CandidateKind = self.kind.parse()?;
        let starts_at = parse_instant(&self.starts_at)?;
        let ends_at = parse_instant(&self.ends_at)?;
        Candidate::new(self.id, self.channel, kind, starts_at, ends_at, self.priority)
    }
}

/// Parse a candidate document into validated candidates, preserving order.
///
/// # Errors
/// - `ScheduleError::Json` if the document is not a well-formed record array.
/// - `ScheduleError::UnknownKind` for a `type` outside the two known tags.
/// - `ScheduleError::InvalidTimestamp` for an instant in neither layout.
/// - `ScheduleError::InvalidWindow` if a record starts at or after its end.
/// - `ScheduleError::DuplicateId` if two records share an id.
pub fn parse_candidates(json: &str) -> Result<Vec<Candidate>> {
    let records: Vec<CandidateRecord> = serde_json::from_str(json)?;

    let mut seen = HashSet::with_capacity(records.len());
    let mut candidates = Vec::with_capacity(records.len());
    for record in records {
        if !seen.insert(record.id) {
            return Err(ScheduleError::DuplicateId(record.id));
        }
        candidates.push(record.into_candidate()?);
    }

    debug!(count = candidates.len(), "parsed candidate document");
    Ok(candidates)
}

/// Parse an absolute instant.
///
/// Accepts RFC 3339 (`2019-01-17T10:12:00-08:00`) and the Unix `date` layout
/// (`Thu Jan 17 10:12:00 PST 2019`).
///
/// # Errors
/// Returns `ScheduleError::InvalidTimestamp` when neither layout matches or the
/// zone abbreviation is unknown.
pub fn parse_instant(s: &str) -> Result<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    parse_unix_date(s)
}

fn parse_unix_date(s: &str) -> Result<DateTime<Utc>> {
    let invalid = |reason: &str| ScheduleError::InvalidTimestamp {
        value: s.to_string(),
        reason: reason.to_string(),
    };

    let fields: Vec<&str> = s.split_whitespace().collect();
    let [weekday, month, day, clock, zone, year] = fields.as_slice() else {
        return Err(invalid("expected RFC 3339 or 'Mon Jan 2 15:04:05 MST 2006'"));
    };

    let offset = zone_offset(zone).ok_or_else(|| invalid("unknown zone abbreviation"))?;
    let naive = NaiveDateTime::parse_from_str(
        &format!("{weekday} {month} {day} {clock} {year}"),
        "%a %b %d %H:%M:%S %Y",
    )
    .map_err(|e| invalid(&e.to_string()))?;

    offset
        .from_local_datetime(&naive)
        .single()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| invalid("local time does not map to a single instant"))
}

/// Fixed UTC offset for a zone abbreviation.
///
/// Abbreviations are ambiguous worldwide, so only this table is recognized.
pub fn zone_offset(abbreviation: &str) -> Option<FixedOffset> {
    let hours = match abbreviation {
        "UTC" | "GMT" | "Z" => 0,
        "EST" => -5,
        "EDT" => -4,
        "CST" => -6,
        "CDT" => -5,
        "MST" => -7,
        "MDT" => -6,
        "PST" => -8,
        "PDT" => -7,
        "AKST" => -9,
        "AKDT" => -8,
        "HST" => -10,
        "BST" | "CET" => 1,
        "CEST" | "EET" => 2,
        "EEST" => 3,
        _ => return None,
    };
    FixedOffset::east_opt(hours * 3600)
}
