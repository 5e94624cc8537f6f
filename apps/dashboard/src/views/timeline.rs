use std::collections::BTreeMap;
use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Serialize, Serializer};

use crate::models::dataset::Document;

/// Calendar month key. Field order gives calendar ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthBucket {
    year: i32,
    month: u32,
}

impl MonthBucket {
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }
}

impl fmt::Display for MonthBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl Serialize for MonthBucket {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimelinePoint {
    pub month: MonthBucket,
    pub count: usize,
}

/// Parses an evidence date strictly as `YYYY-MM-DD`: a four-digit year and
/// one- or two-digit month and day, ASCII digits only, no sign or padding.
/// Malformed or empty input yields `None`; it is never an error.
pub fn parse_evidence_date(raw: &str) -> Option<NaiveDate> {
    let mut parts = raw.split('-');
    let (year, month, day) = (parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some() {
        return None;
    }

    let digits = |field: &str, min: usize, max: usize| {
        (min..=max).contains(&field.len()) && field.bytes().all(|b| b.is_ascii_digit())
    };
    if !(digits(year, 4, 4) && digits(month, 1, 2) && digits(day, 1, 2)) {
        return None;
    }

    NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, day.parse().ok()?)
}

/// Counts evidence items per calendar month across every profile,
/// ascending by month. Items without a parseable date are skipped.
pub fn aggregate_timeline(document: &Document) -> Vec<TimelinePoint> {
    let mut buckets: BTreeMap<MonthBucket, usize> = BTreeMap::new();

    let dates = document
        .profiles
        .iter()
        .flat_map(|profile| &profile.evidence)
        .filter_map(|evidence| evidence.date.as_deref())
        .filter_map(parse_evidence_date);

    for date in dates {
        *buckets.entry(MonthBucket::from_date(date)).or_default() += 1;
    }

    buckets
        .into_iter()
        .map(|(month, count)| TimelinePoint { month, count })
        .collect()
}
