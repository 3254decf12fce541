//! # timeline-engine
//!
//! Deterministic stream selection: turn a set of prioritized, time-bounded
//! candidate streams into one non-overlapping viewing timeline.
//!
//! The engine simulates a clock over the full span of its input in one-minute
//! ticks. At every tick it shows the best candidate on the air, with three
//! brakes on switching: a pinned priority that is never interrupted, a warm-up
//! window before an estimated stream can be picked, and a hysteresis margin a
//! challenger must clear to preempt what is already playing.
//!
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use timeline_engine::{build_schedule, Candidate, CandidateKind};
//!
//! let show = Candidate::new(
//!     1,
//!     "twitch.tv/lirik",
//!     CandidateKind::Scheduled,
//!     Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap(),
//!     Utc.with_ymd_and_hms(2026, 3, 1, 10, 0, 0).unwrap(),
//!     5,
//! )
//! .unwrap();
//!
//! let timeline = build_schedule(&[show]);
//! assert_eq!(timeline.len(), 1);
//! assert_eq!(timeline[0].duration_minutes(), 60);
//! ```
//!
//! ## Modules
//!
//! - [`candidate`] — Candidate records and their preference order
//! - [`window`] — Which candidates are eligible at an instant
//! - [`policy`] — Per-tick switch decision and its tunables
//! - [`builder`] — Tick-by-tick simulation producing segments
//! - [`gaps`] — Uncovered stretches of a produced timeline
//! - [`loader`] — JSON candidate documents
//! - [`error`] — Error types

pub mod builder;
pub mod candidate;
pub mod error;
pub mod gaps;
pub mod loader;
pub mod policy;
pub mod window;

pub use builder::{build_schedule, ScheduleBuilder, Segment, TICK_MINUTES};
pub use candidate::{Candidate, CandidateKind};
pub use error::ScheduleError;
pub use gaps::{covered_minutes, find_gaps, Gap};
pub use loader::parse_candidates;
pub use policy::{
    SwitchPolicy, DEFAULT_HYSTERESIS_MARGIN, DEFAULT_WARM_UP_MINUTES, PINNED_PRIORITY,
};
