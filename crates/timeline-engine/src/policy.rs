//! Switch policy -- the per-tick decision of whether to change streams.
//!
//! The policy is a pure function of the current selection, the ordered
//! eligible candidates, the clock, and the set of ids already shown. It applies
//! its rules in a fixed order:
//!
//! 1. A pinned current selection is never interrupted.
//! 2. Nothing eligible means nothing to switch to.
//! 3. Already-watched candidates are dropped unless pinned or currently
//!    playing, with a fallback to the full list if that leaves nothing.
//! 4. Freshly started `Estimated` candidates are dropped until the warm-up
//!    window has passed, with a fallback to the step-3 list.
//! 5. The first survivor is the best choice.
//! 6. The best choice only preempts the current selection when its priority
//!    exceeds the current one by more than the hysteresis margin.

use std::collections::HashSet;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::candidate::{Candidate, CandidateKind};
use crate::error::{Result, ScheduleError};

/// Priority that marks a candidate as pinned.
pub const PINNED_PRIORITY: i32 = 10;

/// How long an `Estimated` candidate must have been running before it can be picked.
pub const DEFAULT_WARM_UP_MINUTES: u32 = 10;

/// Priority gap a challenger must exceed to preempt the current selection.
pub const DEFAULT_HYSTERESIS_MARGIN: i32 = 4;

/// Tunables for [`SwitchPolicy::decide`].
///
/// Every field falls back to its default when absent from a deserialized config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwitchPolicy {
    pub warm_up_minutes: u32,
    pub hysteresis_margin: i32,
    pub pinned_priority: i32,
}

impl Default for SwitchPolicy {
    fn default() -> Self {
        Self {
            warm_up_minutes: DEFAULT_WARM_UP_MINUTES,
            hysteresis_margin: DEFAULT_HYSTERESIS_MARGIN,
            pinned_priority: PINNED_PRIORITY,
        }
    }
}

impl SwitchPolicy {
    pub fn with_warm_up_minutes(mut self, minutes: u32) -> Self {
        self.warm_up_minutes = minutes;
        self
    }

    pub fn with_hysteresis_margin(mut self, margin: i32) -> Self {
        self.hysteresis_margin = margin;
        self
    }

    pub fn with_pinned_priority(mut self, priority: i32) -> Self {
        self.pinned_priority = priority;
        self
    }

    /// Reject settings the decision rules cannot honor.
    ///
    /// # Errors
    /// Returns `ScheduleError::InvalidPolicy` for a negative hysteresis margin,
    /// which would let a lower-priority candidate preempt a higher one.
    pub fn validate(&self) -> Result<()> {
        if self.hysteresis_margin < 0 {
            return Err(ScheduleError::InvalidPolicy(format!(
                "hysteresis margin must be non-negative, got {}",
                self.hysteresis_margin
            )));
        }
        Ok(())
    }

    pub fn warm_up(&self) -> Duration {
        Duration::minutes(i64::from(self.warm_up_minutes))
    }

    pub fn is_pinned(&self, candidate: &Candidate) -> bool {
        candidate.priority == self.pinned_priority
    }

    /// Whether an eligible candidate has been running long enough to be picked.
    ///
    /// Pinned and `Scheduled` candidates are always warm. An `Estimated`
    /// candidate is warm once `t` is strictly past `starts_at + warm_up`.
    pub fn is_warm(&self, candidate: &Candidate, t: DateTime<Utc>) -> bool {
        if self.is_pinned(candidate) || candidate.kind == CandidateKind::Scheduled {
            return true;
        }
        candidate
            .starts_at
            .checked_add_signed(self.warm_up())
            .is_some_and(|ready| t > ready)
    }

    /// Decide whether to switch away from `current`, and to what.
    ///
    /// `eligible` must already be in preference order (see
    /// [`crate::window::eligible`]). Returns `None` to keep the current
    /// selection, or to stay idle when there is none.
    pub fn decide<'a>(
        &self,
        current: Option<&Candidate>,
        eligible: &[&'a Candidate],
        t: DateTime<Utc>,
        watched: &HashSet<u64>,
    ) -> Option<&'a Candidate> {
        if current.is_some_and(|c| self.is_pinned(c)) {
            return None;
        }
        if eligible.is_empty() {
            return None;
        }

        // The current selection is still being watched, not a repeat of itself.
        let current_id = current.map(|c| c.id);
        let unwatched: Vec<&'a Candidate> = eligible
            .iter()
            .copied()
            .filter(|c| {
                self.is_pinned(c) || Some(c.id) == current_id || !watched.contains(&c.id)
            })
            .collect();
        let fresh = if unwatched.is_empty() {
            eligible.to_vec()
        } else {
            unwatched
        };

        let warm: Vec<&'a Candidate> = fresh
            .iter()
            .copied()
            .filter(|c| self.is_warm(c, t))
            .collect();
        let choices = if warm.is_empty() { fresh } else { warm };

        let best = *choices.first()?;

        match current {
            None => Some(best),
            Some(cur) if cur.id == best.id => None,
            Some(cur) => {
                let bar = i64::from(cur.priority) + i64::from(self.hysteresis_margin);
                (i64::from(best.priority) > bar).then_some(best)
            }
        }
    }
}
