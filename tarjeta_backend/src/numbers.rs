use rand::Rng;
use rand::seq::SliceRandom;
use std::ops::RangeInclusive;

pub const VOICES: [&str; 6] = ["alloy", "echo", "fable", "onyx", "nova", "shimmer"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberRange {
    XX,
    XXX,
    XXXX,
}

impl NumberRange {
    /// Unknown or missing values fall back to four digits.
    pub fn parse(range: Option<&str>) -> NumberRange {
        match range {
            Some("XX") => NumberRange::XX,
            Some("XXX") => NumberRange::XXX,
            _ => NumberRange::XXXX,
        }
    }

    pub fn bounds(self) -> RangeInclusive<i32> {
        match self {
            NumberRange::XX => 10..=99,
            NumberRange::XXX => 100..=999,
            NumberRange::XXXX => 1000..=9999,
        }
    }
}

pub fn random_number(range: NumberRange) -> i32 {
    rand::thread_rng().gen_range(*range.bounds().start(), *range.bounds().end() + 1)
}

pub fn random_voice() -> &'static str {
    *VOICES.choose(&mut rand::thread_rng()).unwrap_or(&VOICES[0])
}


#[test]
fn test_parse_range() {
    assert_eq!(NumberRange::parse(Some("XX")), NumberRange::XX);
    assert_eq!(NumberRange::parse(Some("XXX")), NumberRange::XXX);
    assert_eq!(NumberRange::parse(Some("XXXX")), NumberRange::XXXX);
    assert_eq!(NumberRange::parse(Some("xx")), NumberRange::XXXX);
    assert_eq!(NumberRange::parse(Some("")), NumberRange::XXXX);
    assert_eq!(NumberRange::parse(None), NumberRange::XXXX);
}

#[test]
fn test_random_number_in_range() {
    for &range in &[NumberRange::XX, NumberRange::XXX, NumberRange::XXXX] {
        for _ in 0..1000 {
            let n = random_number(range);
            assert!(range.bounds().contains(&n), "{} not in {:?}", n, range);
        }
    }
}

#[test]
fn test_random_voice() {
    for _ in 0..100 {
        assert!(VOICES.contains(&random_voice()));
    }
}
