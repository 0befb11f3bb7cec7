//! Weekly frequency grid model.
//!
//! A [`FrequencyGrid`] records, per user, which locations were reported in
//! which ISO-weekday/hour-of-day slot. Buckets are keyed by weekday and
//! hour only, so reports from different weeks land in the same cell; a
//! per-(location, calendar hour) dedup rule keeps duplicate event delivery
//! from inflating the counts. Within one cell, locations stay ordered by
//! how often they were reported there, so the habitual place for "Tuesday
//! at 18:00" is always the first entry.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Timelike, Utc};
use serde::{Deserialize, Serialize};

use super::location::LocationId;

/// ISO weekday (1 = Monday .. 7 = Sunday) and hour of day (0..=23) of a
/// timestamp, the coordinates of its grid cell.
pub(crate) fn slot_of(at: DateTime<Utc>) -> (u8, u8) {
    (at.weekday().number_from_monday() as u8, at.hour() as u8)
}

/// One location's report timestamps within a single weekday/hour cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BucketEntry {
    pub location: LocationId,
    /// Timestamps at which `location` was reported in this cell, across
    /// all weeks.
    pub reported: Vec<DateTime<Utc>>,
}

/// The locations reported during one weekday/hour slot.
///
/// Entries are kept sorted by descending report count, ties broken by
/// ascending location id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HourBucket {
    pub entries: Vec<BucketEntry>,
}

impl HourBucket {
    /// Timestamps recorded for a location in this bucket, if any.
    pub fn get(&self, location: LocationId) -> Option<&[DateTime<Utc>]> {
        self.entries
            .iter()
            .find(|e| e.location == location)
            .map(|e| e.reported.as_slice())
    }

    /// The most frequently reported location in this bucket.
    pub fn most_frequent(&self) -> Option<&BucketEntry> {
        self.entries.first()
    }

    /// Location ids in popularity order.
    pub fn locations(&self) -> impl Iterator<Item = LocationId> + '_ {
        self.entries.iter().map(|e| e.location)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn entry_mut(&mut self, location: LocationId) -> &mut BucketEntry {
        let idx = match self.entries.iter().position(|e| e.location == location) {
            Some(idx) => idx,
            None => {
                self.entries.push(BucketEntry {
                    location,
                    reported: Vec::new(),
                });
                self.entries.len() - 1
            }
        };
        &mut self.entries[idx]
    }

    fn sort_by_popularity(&mut self) {
        self.entries.sort_by(|a, b| {
            b.reported
                .len()
                .cmp(&a.reported.len())
                .then_with(|| a.location.cmp(&b.location))
        });
    }
}

/// The 24 hour buckets of one weekday, created lazily.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DayBuckets {
    /// Hour of day (0..=23) to the locations reported in that hour.
    pub hours: BTreeMap<u8, HourBucket>,
}

/// Per-user 7x24 popularity structure over reported locations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrequencyGrid {
    /// Username this grid belongs to; one grid per user.
    pub owner: String,
    /// ISO weekday (1 = Monday .. 7 = Sunday) to that day's hour buckets.
    pub days: BTreeMap<u8, DayBuckets>,
}

impl FrequencyGrid {
    /// Create an empty grid for `owner`.
    pub fn new(owner: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            days: BTreeMap::new(),
        }
    }

    /// The bucket for the given weekday (1..=7, Monday = 1) and hour
    /// (0..=23), or `None` if nothing was ever reported in that slot.
    pub fn locations_reported_at(&self, weekday: u8, hour: u8) -> Option<&HourBucket> {
        self.days.get(&weekday).and_then(|day| day.hours.get(&hour))
    }

    /// Whether `location` already has a report recorded for the calendar
    /// hour of `at`.
    ///
    /// The bucket is keyed by weekday/hour across all weeks, but the dedup
    /// check compares the full calendar date and hour, so a report from
    /// the same slot one week earlier does not suppress a new one.
    pub fn has_been_reported(&self, location: LocationId, at: DateTime<Utc>) -> bool {
        let (weekday, hour) = slot_of(at);

        let Some(bucket) = self.locations_reported_at(weekday, hour) else {
            return false;
        };
        let Some(reported) = bucket.get(location) else {
            return false;
        };

        reported
            .iter()
            .any(|t| t.date_naive() == at.date_naive() && t.hour() == at.hour())
    }

    /// Record that `location` was reported at `at`.
    ///
    /// Creates the weekday bucket, the hour bucket, and the location entry
    /// as needed, appends the timestamp, and restores the bucket's
    /// popularity ordering. Returns `false` (leaving the grid untouched)
    /// when the same location and calendar hour were already recorded.
    pub fn insert(&mut self, location: LocationId, at: DateTime<Utc>) -> bool {
        if self.has_been_reported(location, at) {
            return false;
        }

        let (weekday, hour) = slot_of(at);
        let bucket = self
            .days
            .entry(weekday)
            .or_default()
            .hours
            .entry(hour)
            .or_default();

        bucket.entry_mut(location).reported.push(at);
        bucket.sort_by_popularity();
        true
    }
}
