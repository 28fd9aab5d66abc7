//! Calendar date and date interval utilities.

use std::{fmt, str::FromStr};

use derive_more::{Display, Error};
use time::{
    format_description::BorrowedFormatItem, macros::format_description,
    Duration,
};

/// Format of a [`Date`] string representation.
const FORMAT: &[BorrowedFormatItem<'_>] =
    format_description!("[year]-[month]-[day]");

/// Calendar date without a time-of-day component.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Date(time::Date);

impl Date {
    /// Creates a new [`Date`] representing the current day in UTC.
    #[must_use]
    pub fn today() -> Self {
        Self(time::OffsetDateTime::now_utc().date())
    }

    /// Returns the [`Date`] being the provided number of `days` after this
    /// one.
    ///
    /// [`None`] is returned if the result is out of the supported range.
    #[must_use]
    pub fn checked_add_days(self, days: i64) -> Option<Self> {
        self.0.checked_add(Duration::days(days)).map(Self)
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let formatted = self
            .0
            .format(FORMAT)
            .unwrap_or_else(|e| panic!("cannot format `Date`: {e}"));
        write!(f, "{formatted}")
    }
}

impl FromStr for Date {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        time::Date::parse(s, FORMAT).map(Self).map_err(ParseError)
    }
}

/// Error of parsing a [`Date`] from a string.
#[derive(Clone, Copy, Debug, Display, Error)]
#[display("invalid `Date`: {_0}")]
pub struct ParseError(time::error::Parse);

/// Closed interval of [`Date`]s.
///
/// Both endpoints are part of the interval, so a [`DateRange`] spanning a
/// single day has a [`days()`] count of 1.
///
/// [`days()`]: DateRange::days
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct DateRange {
    /// First [`Date`] of this [`DateRange`].
    start: Date,

    /// Last [`Date`] of this [`DateRange`], inclusive.
    end: Date,
}

impl DateRange {
    /// Creates a new [`DateRange`] if the provided `start` doesn't follow the
    /// provided `end`.
    ///
    /// # Errors
    ///
    /// Returns an [`InvalidRangeError`] if `end < start`.
    pub fn new(start: Date, end: Date) -> Result<Self, InvalidRangeError> {
        if end < start {
            return Err(InvalidRangeError { start, end });
        }
        Ok(Self { start, end })
    }

    /// Returns the first [`Date`] of this [`DateRange`].
    #[must_use]
    pub fn start(&self) -> Date {
        self.start
    }

    /// Returns the last [`Date`] of this [`DateRange`], inclusive.
    #[must_use]
    pub fn end(&self) -> Date {
        self.end
    }

    /// Returns the number of days this [`DateRange`] spans, counting both
    /// endpoints.
    #[expect(
        clippy::missing_panics_doc,
        reason = "`start <= end` is guaranteed on construction"
    )]
    #[must_use]
    pub fn days(&self) -> u32 {
        let days = (self.end.0 - self.start.0).whole_days() + 1;
        u32::try_from(days).expect("`start <= end`")
    }

    /// Indicates whether this [`DateRange`] shares at least one day with the
    /// `other` one.
    ///
    /// A range ending the day another begins does overlap it.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start <= other.end && other.start <= self.end
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self { start, end } = self;
        write!(f, "{start} to {end}")
    }
}

/// Error of creating a [`DateRange`] with its end preceding its start.
#[derive(Clone, Copy, Debug, Display, Error)]
#[display("`DateRange` end `{end}` precedes its start `{start}`")]
pub struct InvalidRangeError {
    /// First [`Date`] of the rejected interval.
    pub start: Date,

    /// Last [`Date`] of the rejected interval.
    pub end: Date,
}

#[cfg(test)]
mod spec {
    use super::{Date, DateRange};

    fn date(s: &str) -> Date {
        s.parse().unwrap()
    }

    fn range(start: &str, end: &str) -> DateRange {
        DateRange::new(date(start), date(end)).unwrap()
    }

    #[test]
    fn rejects_inverted_endpoints() {
        assert!(DateRange::new(date("2024-01-05"), date("2024-01-01"))
            .is_err());
    }

    #[test]
    fn counts_days_inclusively() {
        assert_eq!(range("2024-03-01", "2024-03-01").days(), 1);
        assert_eq!(range("2024-03-01", "2024-03-07").days(), 7);
        assert_eq!(range("2024-03-01", "2024-03-03").days(), 3);
        assert_eq!(range("2024-02-28", "2024-03-01").days(), 3); // leap year
    }

    #[test]
    fn overlap_is_symmetric_and_reflexive() {
        let a = range("2024-01-01", "2024-01-05");
        let b = range("2024-01-03", "2024-01-10");

        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
        assert!(a.overlaps(&a));
    }

    #[test]
    fn shared_boundary_day_overlaps() {
        let a = range("2024-01-01", "2024-01-05");
        let b = range("2024-01-05", "2024-01-10");

        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
    }

    #[test]
    fn adjacent_ranges_do_not_overlap() {
        let a = range("2024-01-01", "2024-01-05");
        let b = range("2024-01-06", "2024-01-10");

        assert!(!a.overlaps(&b));
        assert!(!b.overlaps(&a));
    }

    #[test]
    fn contained_range_overlaps() {
        let outer = range("2024-01-01", "2024-01-31");
        let inner = range("2024-01-10", "2024-01-12");

        assert!(outer.overlaps(&inner));
        assert!(inner.overlaps(&outer));
    }

    #[test]
    fn parses_and_formats_iso_dates() {
        assert_eq!(date("2024-01-05").to_string(), "2024-01-05");
        assert!("2024-13-01".parse::<Date>().is_err());
        assert!("not a date".parse::<Date>().is_err());
    }

    #[test]
    fn checked_add_days() {
        assert_eq!(
            date("2024-01-01").checked_add_days(6),
            Some(date("2024-01-07")),
        );
    }
}
