//! Gap analysis -- the parts of a span the produced timeline leaves uncovered.
//!
//! Walks the segments in order with a cursor over the span, emitting every
//! stretch the cursor skips over. Segments are clipped to the span first.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::builder::Segment;

/// An uncovered stretch of the timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Gap {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub duration_minutes: i64,
}

impl Gap {
    fn between(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            start,
            end,
            duration_minutes: (end - start).num_minutes(),
        }
    }
}

/// Find the uncovered intervals of `[span_start, span_end]`.
///
/// `segments` must be ordered by start and non-overlapping, which is what
/// [`crate::ScheduleBuilder::build`] returns. Adjacent segments produce no gap.
pub fn find_gaps(
    segments: &[Segment],
    span_start: DateTime<Utc>,
    span_end: DateTime<Utc>,
) -> Vec<Gap> {
    if span_start >= span_end {
        return Vec::new();
    }

    let mut gaps = Vec::new();
    let mut cursor = span_start;

    for seg in segments {
        if seg.ends_at <= span_start || seg.starts_at >= span_end {
            continue;
        }
        let start = seg.starts_at.max(span_start);
        if cursor < start {
            gaps.push(Gap::between(cursor, start));
        }
        cursor = cursor.max(seg.ends_at.min(span_end));
    }

    // Trailing gap after the last segment.
    if cursor < span_end {
        gaps.push(Gap::between(cursor, span_end));
    }

    gaps
}

/// Total minutes covered by `segments`.
pub fn covered_minutes(segments: &[Segment]) -> i64 {
    segments.iter().map(Segment::duration_minutes).sum()
}
