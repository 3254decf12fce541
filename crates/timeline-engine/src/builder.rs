//! Schedule building -- the tick-by-tick simulation that produces the timeline.
//!
//! The builder walks a clock from the earliest candidate start to the latest
//! candidate end in fixed ticks. At each tick it asks the window filter who is
//! on the air and the switch policy whether to change, and it records the
//! result as a list of non-overlapping [`Segment`]s.

use std::collections::HashSet;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tracing::{debug, debug_span, trace};

use crate::candidate::Candidate;
use crate::error::{Result, ScheduleError};
use crate::policy::SwitchPolicy;
use crate::window;

/// Simulation step, in minutes.
pub const TICK_MINUTES: i64 = 1;

/// One contiguous block of the produced timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Segment {
    #[serde(rename = "channel")]
    pub label: String,
    #[serde(rename = "streamId")]
    pub candidate_id: u64,
    #[serde(rename = "startsAt")]
    pub starts_at: DateTime<Utc>,
    #[serde(rename = "endsAt")]
    pub ends_at: DateTime<Utc>,
}

impl Segment {
    pub fn duration_minutes(&self) -> i64 {
        (self.ends_at - self.starts_at).num_minutes()
    }
}

/// The segment currently being played, not yet closed.
struct OpenSegment<'a> {
    candidate: &'a Candidate,
    starts_at: DateTime<Utc>,
}

impl OpenSegment<'_> {
    fn close(self, ends_at: DateTime<Utc>) -> Segment {
        Segment {
            label: self.candidate.label.clone(),
            candidate_id: self.candidate.id,
            starts_at: self.starts_at,
            ends_at,
        }
    }
}

/// Runs the simulation with a given policy and tick.
///
/// A builder holds no run state, so one instance can serve any number of
/// concurrent runs.
#[derive(Debug, Clone, Copy)]
pub struct ScheduleBuilder {
    policy: SwitchPolicy,
    tick: Duration,
}

impl Default for ScheduleBuilder {
    fn default() -> Self {
        Self {
            policy: SwitchPolicy::default(),
            tick: Duration::minutes(TICK_MINUTES),
        }
    }
}

impl ScheduleBuilder {
    /// A builder with `policy` and the default one-minute tick.
    ///
    /// # Errors
    /// Returns `ScheduleError::InvalidPolicy` if `policy` fails
    /// [`SwitchPolicy::validate`].
    pub fn new(policy: SwitchPolicy) -> Result<Self> {
        policy.validate()?;
        Ok(Self {
            policy,
            ..Self::default()
        })
    }

    /// Use a different simulation step.
    ///
    /// # Errors
    /// Returns `ScheduleError::InvalidPolicy` if `tick` is not positive.
    pub fn with_tick(mut self, tick: Duration) -> Result<Self> {
        if tick <= Duration::zero() {
            return Err(ScheduleError::InvalidPolicy(format!(
                "tick must be positive, got {} seconds",
                tick.num_seconds()
            )));
        }
        self.tick = tick;
        Ok(self)
    }

    pub fn policy(&self) -> &SwitchPolicy {
        &self.policy
    }

    pub fn tick(&self) -> Duration {
        self.tick
    }

    /// Produce the viewing timeline for `candidates`.
    ///
    /// Segments are returned in chronological order and never overlap. A new
    /// segment starts one tick before the tick that selected it, since the
    /// candidate was already eligible going into that tick. A segment whose
    /// candidate has ended and has no replacement is closed, leaving a gap
    /// until a later tick selects something.
    pub fn build(&self, candidates: &[Candidate]) -> Vec<Segment> {
        let Some((span_start, span_end)) = window::span(candidates) else {
            return Vec::new();
        };

        let _span = debug_span!(
            "build_schedule",
            candidates = candidates.len(),
            %span_start,
            %span_end
        )
        .entered();

        let mut segments = Vec::new();
        let mut open: Option<OpenSegment<'_>> = None;
        let mut watched: HashSet<u64> = HashSet::new();
        let mut t = span_start;

        while t <= span_end {
            let eligible = window::eligible(t, candidates);
            trace!(%t, eligible = eligible.len(), "tick");

            let current = open.as_ref().map(|o| o.candidate);
            let boundary = t - self.tick;

            if let Some(next) = self.policy.decide(current, &eligible, t, &watched) {
                if let Some(prev) = open.take() {
                    segments.push(prev.close(boundary));
                }
                debug!(
                    %t,
                    from = current.map(|c| c.id),
                    to = next.id,
                    priority = next.priority,
                    "switching stream"
                );
                open = Some(OpenSegment {
                    candidate: next,
                    starts_at: boundary,
                });
                watched.insert(next.id);
            } else if let Some(cur) = current.filter(|c| t > c.ends_at) {
                debug!(%t, id = cur.id, "stream ended with no replacement");
                if let Some(prev) = open.take() {
                    segments.push(prev.close(boundary));
                }
            }

            t = match t.checked_add_signed(self.tick) {
                Some(next_t) => next_t,
                None => break,
            };
        }

        if let Some(last) = open.take() {
            segments.push(last.close(span_end));
        }

        debug!(segments = segments.len(), "schedule built");
        segments
    }
}

/// Build a schedule with the default policy and a one-minute tick.
pub fn build_schedule(candidates: &[Candidate]) -> Vec<Segment> {
    ScheduleBuilder::default().build(candidates)
}
