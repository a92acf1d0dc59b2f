//! Day buckets of tiles.
//!
//! Buckets are matched by calendar date and labelled `dd.mm.` for display.
//! They keep the order they were first created in, which is fetch order and
//! not necessarily calendar order. Inside a
//! bucket a tile is identified by its index on the fetched page, so merging
//! the same page twice leaves the bucket unchanged.
use chrono::{NaiveDate, NaiveDateTime};

use super::{models::tile_model::Tile, range_parser::DateRange};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot {
    pub index: usize,
    pub timestamp: NaiveDateTime,
    pub tile: Tile,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayBucket {
    pub date: NaiveDate,
    pub key: String,
    pub slots: Vec<Slot>,
}

impl DayBucket {
    fn new(date: NaiveDate) -> DayBucket {
        DayBucket {
            date,
            key: day_key(date),
            slots: Vec::new(),
        }
    }

    /// A tile with an index already present replaces the old one in place.
    pub fn upsert(&mut self, index: usize, tile: Tile) {
        let slot = Slot {
            index,
            timestamp: tile.start,
            tile,
        };
        match self.slots.iter_mut().find(|s| s.index == index) {
            Some(existing) => *existing = slot,
            None => self.slots.push(slot),
        }
    }

    /// Stable, so tiles starting together keep their merge order.
    pub fn sort_by_timestamp(&mut self) {
        self.slots.sort_by_key(|slot| slot.timestamp);
    }

    pub fn latest_timestamp(&self) -> Option<NaiveDateTime> {
        self.slots.iter().map(|slot| slot.timestamp).max()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimetableByDay {
    days: Vec<DayBucket>,
}

pub fn day_key(date: NaiveDate) -> String {
    date.format("%d.%m.").to_string()
}

impl TimetableByDay {
    pub fn new() -> TimetableByDay {
        TimetableByDay::default()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn days(&self) -> &[DayBucket] {
        &self.days
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.days.iter().map(|day| day.key.as_str())
    }

    pub fn get(&self, date: NaiveDate) -> Option<&DayBucket> {
        self.days.iter().find(|day| day.date == date)
    }

    pub fn tile_count(&self) -> usize {
        self.days.iter().map(|day| day.slots.len()).sum()
    }

    fn bucket_mut(&mut self, date: NaiveDate) -> &mut DayBucket {
        let position = match self.days.iter().position(|day| day.date == date) {
            Some(position) => position,
            None => {
                self.days.push(DayBucket::new(date));
                self.days.len() - 1
            }
        };
        &mut self.days[position]
    }

    /// Puts every tile of `range` into its day bucket, then sorts touched buckets.
    pub fn merge_page(&mut self, page: &[(usize, Tile)], range: &DateRange) {
        for (index, tile) in page {
            if !range.contains(tile.start) {
                continue;
            }
            self.bucket_mut(tile.start.date())
                .upsert(*index, tile.clone());
        }
        self.sort_buckets();
    }

    pub fn sort_buckets(&mut self) {
        for day in self.days.iter_mut() {
            day.sort_by_timestamp();
        }
    }

    /// Folds a later fetch in. A day present in both is taken wholesale from `newer`.
    pub fn absorb(&mut self, newer: TimetableByDay) {
        for day in newer.days {
            match self.days.iter_mut().find(|existing| existing.date == day.date) {
                Some(existing) => *existing = day,
                None => self.days.push(day),
            }
        }
    }

    /// Latest start time of any tile held.
    pub fn latest_timestamp(&self) -> Option<NaiveDateTime> {
        self.days
            .iter()
            .filter_map(DayBucket::latest_timestamp)
            .max()
    }
}

/// Buckets one fetched page, keeping only tiles that start inside `range`.
pub fn merge(page: &[(usize, Tile)], range: &DateRange) -> TimetableByDay {
    let mut timetable = TimetableByDay::new();
    timetable.merge_page(page, range);
    timetable
}

#[cfg(test)]
#[path = "tests/accumulator.rs"]
mod tests;
