//! One weekly-recurring meeting pattern: a set of weekdays sharing a time interval.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::time::{TimeInterval, WeekDay};

/// A lecture or lab block that repeats every week on the same days and times.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyOccurrence {
    days: BTreeSet<WeekDay>,
    interval: TimeInterval,
}

impl WeeklyOccurrence {
    pub fn new(days: impl IntoIterator<Item = WeekDay>, interval: TimeInterval) -> Self {
        Self {
            days: days.into_iter().collect(),
            interval,
        }
    }

    /// Meeting days in Monday..Friday order.
    pub fn days(&self) -> &BTreeSet<WeekDay> {
        &self.days
    }

    pub fn interval(&self) -> TimeInterval {
        self.interval
    }

    pub fn meets_on(&self, day: WeekDay) -> bool {
        self.days.contains(&day)
    }

    pub fn shares_day_with(&self, other: &WeeklyOccurrence) -> bool {
        !self.days.is_disjoint(&other.days)
    }

    /// Two occurrences overlap iff they share a day and their intervals overlap.
    ///
    /// Day sets are compared first so disjoint schedules never look at times.
    pub fn overlaps(&self, other: &WeeklyOccurrence) -> bool {
        self.shares_day_with(other) && self.interval.overlaps(&other.interval)
    }

    /// Minutes of overlap on each shared day, 0 when [`overlaps`](Self::overlaps) is false.
    pub fn overlap_minutes(&self, other: &WeeklyOccurrence) -> u32 {
        if !self.shares_day_with(other) {
            return 0;
        }
        self.interval.overlap_minutes(&other.interval)
    }
}

impl fmt::Display for WeeklyOccurrence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let days: Vec<&str> = self.days.iter().map(|d| d.abbreviation()).collect();
        write!(f, "{} {}", days.join("/"), self.interval)
    }
}

