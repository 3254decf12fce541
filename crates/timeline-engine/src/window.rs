//! Window filtering -- which candidates are on the air at a given instant.

use chrono::{DateTime, Utc};

use crate::candidate::Candidate;

/// All candidates whose window strictly contains `t`, best first.
///
/// Eligibility is the open interval `starts_at < t < ends_at`. The result is
/// ordered by [`Candidate::preference`]; the sort is stable, so candidates that
/// tie on both priority and kind keep their input order.
pub fn eligible(t: DateTime<Utc>, candidates: &[Candidate]) -> Vec<&Candidate> {
    let mut on_air: Vec<&Candidate> = candidates.iter().filter(|c| c.contains(t)).collect();
    on_air.sort_by(|a, b| a.preference(b));
    on_air
}

/// The earliest start and latest end across all candidates.
///
/// Returns `None` for an empty slice.
pub fn span(candidates: &[Candidate]) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let (first, rest) = candidates.split_first()?;
    let bounds = rest
        .iter()
        .fold((first.starts_at, first.ends_at), |(start, end), c| {
            (start.min(c.starts_at), end.max(c.ends_at))
        });
    Some(bounds)
}
