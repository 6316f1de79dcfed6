//! Contribution streaks over a multi-year daily history.
//!
//! The history arrives as the concatenation of yearly fetch windows, so it can be
//! unsorted, contain the same day twice (windows share their boundary day) and
//! contain days after the evaluation date. [`ContributionHistory`] reconciles all
//! of that before a single left-to-right scan computes the streaks.

use chrono::NaiveDate;
use log::debug;
use std::collections::BTreeMap;

/// Number of contributions recorded on one calendar day
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContributionDay {
    pub date: NaiveDate,
    pub count: u32,
}

impl ContributionDay {
    pub fn new(date: NaiveDate, count: u32) -> Self {
        Self { date, count }
    }
}

/// A run of consecutive active days. Both bounds are `None` when `length == 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Streak {
    pub length: u32,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl Streak {
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Streaks {
    /// Longest run ever observed; ties keep the earliest run
    pub longest: Streak,
    /// Run whose last active day is `as_of` or the day before, otherwise empty
    pub current: Streak,
}

/// Deduplicated, date-ordered contribution history up to and including `as_of`
#[derive(Debug, Clone)]
pub struct ContributionHistory {
    days: BTreeMap<NaiveDate, u32>,
    as_of: NaiveDate,
}

impl ContributionHistory {
    /// Reconcile raw records: days after `as_of` are dropped and duplicate days keep
    /// their highest count, so a zero never erases a positive count.
    pub fn new<I>(days: I, as_of: NaiveDate) -> Self
    where
        I: IntoIterator<Item = ContributionDay>,
    {
        let mut reconciled = BTreeMap::new();
        let mut dropped = 0usize;

        for day in days {
            if day.date > as_of {
                dropped += 1;
                continue;
            }
            let count = reconciled.entry(day.date).or_insert(0);
            *count = (*count).max(day.count);
        }

        debug!(
            "Reconciled {} distinct days up to {} ({} future records dropped)",
            reconciled.len(),
            as_of,
            dropped
        );

        Self {
            days: reconciled,
            as_of,
        }
    }

    pub fn as_of(&self) -> NaiveDate {
        self.as_of
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Sum of reconciled daily counts
    pub fn total(&self) -> u64 {
        self.days.values().map(|&count| u64::from(count)).sum()
    }

    pub fn first_active_day(&self) -> Option<NaiveDate> {
        self.days
            .iter()
            .find(|(_, count)| **count > 0)
            .map(|(&date, _)| date)
    }

    /// Scan the history once and return the longest and the current streak.
    ///
    /// A zero-count day before `as_of` ends the running streak. A zero-count day
    /// dated `as_of` is today's not-yet-posted activity and leaves it intact.
    pub fn streaks(&self) -> Streaks {
        let mut longest = Streak::default();
        let mut run_length = 0u32;
        let mut run_start: Option<NaiveDate> = None;
        let mut last_active: Option<NaiveDate> = None;

        for (&date, &count) in &self.days {
            if count == 0 {
                if date < self.as_of {
                    run_length = 0;
                    run_start = None;
                }
                continue;
            }

            match last_active {
                Some(prev) if run_length > 0 && (date - prev).num_days() == 1 => run_length += 1,
                _ => {
                    run_length = 1;
                    run_start = Some(date);
                }
            }
            last_active = Some(date);

            if run_length > longest.length {
                longest = Streak {
                    length: run_length,
                    start: run_start,
                    end: Some(date),
                };
            }
        }

        let current = match last_active {
            Some(last) if run_length > 0 && (self.as_of - last).num_days() <= 1 => Streak {
                length: run_length,
                start: run_start,
                end: Some(last),
            },
            _ => Streak::default(),
        };

        Streaks { longest, current }
    }
}
