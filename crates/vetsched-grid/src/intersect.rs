//! Overlap-aware ordering of time intervals.

use std::cmp::Ordering;

use chrono::{NaiveDateTime, TimeDelta};

use crate::slot::slot_time;

/// Anything with a start and end time.
pub trait TimeSpan {
    fn start_time(&self) -> NaiveDateTime;
    fn end_time(&self) -> NaiveDateTime;
}

/// A bare interval, used to probe schedules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl Span {
    #[must_use]
    pub const fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self { start, end }
    }

    /// A zero-width span at `time`.
    #[must_use]
    pub const fn at(time: NaiveDateTime) -> Self {
        Self::new(time, time)
    }
}

impl TimeSpan for Span {
    fn start_time(&self) -> NaiveDateTime {
        self.start
    }

    fn end_time(&self) -> NaiveDateTime {
        self.end
    }
}

/// ## Summary
/// Orders intervals by overlap after quantizing them to slot boundaries.
///
/// Each interval becomes `[floor(start), ceil(end))`, widened to a single
/// slot if that would be empty. `a` compares `Less` when it ends at or before
/// `b` starts, `Greater` when it starts at or after `b` ends, and `Equal` when
/// the two overlap. Touching intervals don't overlap.
///
/// This is not a total order. It is only meaningful for binary searching a
/// start-ordered sequence, where `Equal` means "found an overlap".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntersectComparator {
    slot_size: u32,
}

impl IntersectComparator {
    #[must_use]
    pub fn new(slot_size: u32) -> Self {
        Self {
            slot_size: slot_size.max(1),
        }
    }

    #[must_use]
    pub const fn slot_size(&self) -> u32 {
        self.slot_size
    }

    /// Returns the slot-aligned `[start, end)` bounds of an interval.
    #[must_use]
    pub fn quantize<T: TimeSpan + ?Sized>(&self, span: &T) -> (NaiveDateTime, NaiveDateTime) {
        let start = slot_time(span.start_time(), self.slot_size, false);
        let end = slot_time(span.end_time(), self.slot_size, true);
        if end > start {
            (start, end)
        } else {
            (start, start + TimeDelta::minutes(i64::from(self.slot_size)))
        }
    }

    #[must_use]
    pub fn compare<A, B>(&self, a: &A, b: &B) -> Ordering
    where
        A: TimeSpan + ?Sized,
        B: TimeSpan + ?Sized,
    {
        let (start_a, end_a) = self.quantize(a);
        let (start_b, end_b) = self.quantize(b);
        if end_a <= start_b {
            Ordering::Less
        } else if start_a >= end_b {
            Ordering::Greater
        } else {
            Ordering::Equal
        }
    }

    /// Determines if two intervals share at least one quantized minute.
    #[must_use]
    pub fn intersects<A, B>(&self, a: &A, b: &B) -> bool
    where
        A: TimeSpan + ?Sized,
        B: TimeSpan + ?Sized,
    {
        self.compare(a, b) == Ordering::Equal
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn at(hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, 2)
            .and_then(|d| d.and_hms_opt(hour, minute, 0))
            .expect("valid time")
    }

    fn span(start: (u32, u32), end: (u32, u32)) -> Span {
        Span::new(at(start.0, start.1), at(end.0, end.1))
    }

    #[test]
    fn test_disjoint_spans_are_ordered() {
        let cmp = IntersectComparator::new(15);
        let a = span((9, 0), (9, 30));
        let b = span((10, 0), (10, 30));
        assert_eq!(cmp.compare(&a, &b), Ordering::Less);
        assert_eq!(cmp.compare(&b, &a), Ordering::Greater);
    }

    #[test]
    fn test_touching_spans_do_not_overlap() {
        let cmp = IntersectComparator::new(15);
        let a = span((9, 0), (9, 30));
        let b = span((9, 30), (10, 0));
        assert_eq!(cmp.compare(&a, &b), Ordering::Less);
        assert_eq!(cmp.compare(&b, &a), Ordering::Greater);
    }

    #[test]
    fn test_overlapping_spans_compare_equal_both_ways() {
        let cmp = IntersectComparator::new(15);
        let a = span((9, 0), (9, 30));
        let b = span((9, 15), (9, 45));
        assert_eq!(cmp.compare(&a, &b), Ordering::Equal);
        assert_eq!(cmp.compare(&b, &a), Ordering::Equal);

        let outer = span((8, 0), (12, 0));
        let inner = span((10, 0), (10, 15));
        assert!(cmp.intersects(&outer, &inner));
        assert!(cmp.intersects(&inner, &outer));
    }

    #[test]
    fn test_quantization_turns_near_misses_into_overlaps() {
        // 09:20 rounds up to 09:30; 09:25 rounds down to 09:15
        let cmp = IntersectComparator::new(15);
        let a = span((9, 0), (9, 20));
        let b = span((9, 25), (9, 50));
        assert!(cmp.intersects(&a, &b));

        let fine = IntersectComparator::new(5);
        assert_eq!(fine.compare(&a, &b), Ordering::Less);
    }

    #[test]
    fn test_zero_width_span_occupies_its_slot() {
        let cmp = IntersectComparator::new(15);
        let probe = Span::at(at(9, 30));
        assert_eq!(cmp.quantize(&probe), (at(9, 30), at(9, 45)));

        let before = span((9, 0), (9, 30));
        let after = span((9, 30), (10, 0));
        assert_eq!(cmp.compare(&before, &probe), Ordering::Less);
        assert_eq!(cmp.compare(&after, &probe), Ordering::Equal);
    }

    #[test]
    fn test_zero_width_span_mid_slot() {
        let cmp = IntersectComparator::new(15);
        let probe = Span::at(at(9, 37));
        let event = span((9, 30), (10, 0));
        assert!(cmp.intersects(&event, &probe));
        assert_eq!(cmp.compare(&span((9, 0), (9, 30)), &probe), Ordering::Less);
        assert_eq!(cmp.compare(&span((9, 45), (10, 0)), &probe), Ordering::Greater);
    }

    #[test]
    fn test_spans_on_different_days_never_overlap() {
        let cmp = IntersectComparator::new(15);
        let today = span((9, 0), (10, 0));
        let tomorrow = Span::new(
            today.start + TimeDelta::days(1),
            today.end + TimeDelta::days(1),
        );
        assert_eq!(cmp.compare(&today, &tomorrow), Ordering::Less);
        assert_eq!(cmp.compare(&tomorrow, &today), Ordering::Greater);
    }
}
