//! Spaced-repetition schedule.
//!
//! A card climbs a ladder of six levels. Every successful review moves it one
//! step up and pushes the next review further away; a failed review drops it
//! back to the bottom, to be retried the next day.

use chrono::{DateTime, Duration, offset::Utc};

pub const MAX_LEVEL: i32 = 5;

/// Review delay in days once a card has reached the level at the same index.
const DELAY_DAYS: [i64; 6] = [1, 1, 3, 7, 14, 28];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub level: i32,
    pub next_repeat: DateTime<Utc>,
}

/// Levels outside `0..MAX_LEVEL` are treated as already mastered:
/// they saturate at `MAX_LEVEL` with the longest delay.
pub fn advance_at(level: i32, now: DateTime<Utc>) -> Transition {
    let level = if level >= 0 && level < MAX_LEVEL { level + 1 } else { MAX_LEVEL };
    Transition {
        level,
        next_repeat: now + Duration::days(DELAY_DAYS[level as usize]),
    }
}

pub fn advance(level: i32) -> Transition {
    advance_at(level, Utc::now())
}

pub fn regress_at(now: DateTime<Utc>) -> Transition {
    Transition {
        level: 0,
        next_repeat: now + Duration::days(DELAY_DAYS[0]),
    }
}

pub fn regress() -> Transition {
    regress_at(Utc::now())
}


#[cfg(test)]
fn hours_from_now(t: &Transition) -> f64 {
    (t.next_repeat - Utc::now()).num_seconds() as f64 / 3600.0
}

#[cfg(test)]
fn assert_due_within(t: &Transition, min_days: f64, max_days: f64) {
    let hours = hours_from_now(t);
    assert!(hours > min_days * 24.0 && hours < max_days * 24.0,
            "next_repeat {} hours from now, expected between {} and {} days",
            hours, min_days, max_days);
}

#[test]
fn test_advance_from_level_0() {
    let t = advance(0);
    assert_eq!(t.level, 1);
    assert!(t.next_repeat > Utc::now());
    assert!(hours_from_now(&t) < 25.0);
}

#[test]
fn test_advance_from_level_1() {
    let t = advance(1);
    assert_eq!(t.level, 2);
    assert_due_within(&t, 2.5, 3.5);
}

#[test]
fn test_advance_from_level_2() {
    let t = advance(2);
    assert_eq!(t.level, 3);
    assert_due_within(&t, 6.5, 7.5);
}

#[test]
fn test_advance_from_level_3() {
    let t = advance(3);
    assert_eq!(t.level, 4);
    assert_due_within(&t, 13.5, 14.5);
}

#[test]
fn test_advance_from_level_4() {
    let t = advance(4);
    assert_eq!(t.level, 5);
    assert_due_within(&t, 27.5, 28.5);
}

#[test]
fn test_advance_saturates_at_max_level() {
    for level in &[5, 6, 100, i32::max_value()] {
        let t = advance(*level);
        assert_eq!(t.level, MAX_LEVEL);
        assert_due_within(&t, 27.5, 28.5);
    }
}

#[test]
fn test_advance_negative_level_is_mastered() {
    for level in &[-1, -5, i32::min_value()] {
        let t = advance(*level);
        assert_eq!(t.level, MAX_LEVEL);
        assert_due_within(&t, 27.5, 28.5);
    }
}

#[test]
fn test_advance_at_is_exact() {
    let now = Utc::now();
    assert_eq!(advance_at(0, now).next_repeat, now + Duration::days(1));
    assert_eq!(advance_at(1, now).next_repeat, now + Duration::days(3));
    assert_eq!(advance_at(2, now).next_repeat, now + Duration::days(7));
    assert_eq!(advance_at(3, now).next_repeat, now + Duration::days(14));
    assert_eq!(advance_at(4, now).next_repeat, now + Duration::days(28));
    assert_eq!(advance_at(5, now).next_repeat, now + Duration::days(28));
}

#[test]
fn test_advance_is_not_idempotent() {
    let now = Utc::now();
    let mut level = 0;
    while level < MAX_LEVEL - 1 {
        let next = advance_at(level, now).level;
        assert!(next > level);
        assert!(advance_at(next, now).level > next);
        assert!(advance_at(next, now).next_repeat > advance_at(level, now).next_repeat);
        level = next;
    }
    assert_eq!(advance_at(level, now).level, MAX_LEVEL);
}

#[test]
fn test_advance_at_max_level_is_fixed_point() {
    let now = Utc::now();
    let mastered = Transition { level: MAX_LEVEL, next_repeat: now + Duration::days(28) };
    assert_eq!(advance_at(MAX_LEVEL - 1, now), mastered);
    assert_eq!(advance_at(MAX_LEVEL, now), mastered);
    assert_eq!(advance_at(advance_at(MAX_LEVEL, now).level, now), mastered);
}

#[test]
fn test_regress() {
    let t = regress();
    assert_eq!(t.level, 0);
    assert!(t.next_repeat > Utc::now());
    assert!(hours_from_now(&t) < 25.0);
}

#[test]
fn test_ladder_up_and_down() {
    let now = Utc::now();
    let expected = [(1, 1), (2, 3), (3, 7), (4, 14), (5, 28), (5, 28)];
    let mut level = 0;
    for &(exp_level, exp_days) in &expected {
        let t = advance_at(level, now);
        assert_eq!(t.level, exp_level);
        assert_eq!(t.next_repeat, now + Duration::days(exp_days));
        level = t.level;
    }
    let t = regress_at(now);
    assert_eq!(t, Transition { level: 0, next_repeat: now + Duration::days(1) });
}
