//! Tests for eligibility windows and preference ordering.

use chrono::{DateTime, TimeZone, Utc};
use timeline_engine::window::{eligible, span};
use timeline_engine::{Candidate, CandidateKind};

/// Helper: an instant on 2026-03-01.
fn at(hour: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, hour, min, 0).unwrap()
}

/// Helper: a candidate built directly, bypassing window validation.
fn candidate(
    id: u64,
    kind: CandidateKind,
    start: (u32, u32),
    end: (u32, u32),
    priority: i32,
) -> Candidate {
    Candidate {
        id,
        label: format!("test/{}", id),
        kind,
        starts_at: at(start.0, start.1),
        ends_at: at(end.0, end.1),
        priority,
    }
}

fn ids(list: &[&Candidate]) -> Vec<u64> {
    list.iter().map(|c| c.id).collect()
}

#[test]
fn only_candidates_in_window_sorted_by_priority() {
    // Candidate 1 has an inverted window and is never on the air.
    let candidates = vec![
        candidate(1, CandidateKind::Scheduled, (11, 0), (10, 0), 5),
        candidate(2, CandidateKind::Scheduled, (9, 0), (10, 0), 2),
        candidate(3, CandidateKind::Scheduled, (9, 0), (10, 0), 8),
    ];

    let on_air = eligible(at(9, 30), &candidates);

    assert_eq!(ids(&on_air), vec![3, 2]);
}

#[test]
fn window_boundaries_are_exclusive() {
    let candidates = vec![candidate(1, CandidateKind::Scheduled, (9, 0), (10, 0), 5)];

    assert!(eligible(at(9, 0), &candidates).is_empty(), "not eligible at start");
    assert!(eligible(at(10, 0), &candidates).is_empty(), "not eligible at end");
    assert_eq!(ids(&eligible(at(9, 1), &candidates)), vec![1]);
    assert_eq!(ids(&eligible(at(9, 59), &candidates)), vec![1]);
}

#[test]
fn estimated_sorts_before_scheduled_at_equal_priority() {
    let candidates = vec![
        candidate(1, CandidateKind::Scheduled, (9, 0), (10, 0), 5),
        candidate(2, CandidateKind::Estimated, (9, 0), (10, 0), 5),
    ];

    assert_eq!(ids(&eligible(at(9, 30), &candidates)), vec![2, 1]);
}

#[test]
fn priority_outranks_kind() {
    let candidates = vec![
        candidate(1, CandidateKind::Estimated, (9, 0), (10, 0), 3),
        candidate(2, CandidateKind::Scheduled, (9, 0), (10, 0), 4),
    ];

    assert_eq!(ids(&eligible(at(9, 30), &candidates)), vec![2, 1]);
}

#[test]
fn full_ties_keep_input_order() {
    let candidates = vec![
        candidate(7, CandidateKind::Scheduled, (9, 0), (10, 0), 5),
        candidate(5, CandidateKind::Scheduled, (9, 0), (10, 0), 5),
        candidate(6, CandidateKind::Scheduled, (9, 0), (10, 0), 5),
    ];

    assert_eq!(ids(&eligible(at(9, 30), &candidates)), vec![7, 5, 6]);
}

#[test]
fn eligible_on_empty_input_is_empty() {
    assert!(eligible(at(9, 30), &[]).is_empty());
}

#[test]
fn span_covers_every_candidate() {
    let candidates = vec![
        candidate(1, CandidateKind::Estimated, (10, 12), (16, 21), 10),
        candidate(7, CandidateKind::Estimated, (18, 52), (22, 41), 0),
    ];

    assert_eq!(span(&candidates), Some((at(10, 12), at(22, 41))));
}

#[test]
fn span_of_nested_windows_is_the_outer_window() {
    let candidates = vec![
        candidate(1, CandidateKind::Scheduled, (10, 0), (11, 0), 1),
        candidate(2, CandidateKind::Scheduled, (8, 0), (18, 0), 1),
        candidate(3, CandidateKind::Scheduled, (12, 0), (13, 0), 1),
    ];

    assert_eq!(span(&candidates), Some((at(8, 0), at(18, 0))));
}

#[test]
fn span_of_empty_input_is_none() {
    assert_eq!(span(&[]), None);
}
