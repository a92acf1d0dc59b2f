//! Module with tile model compatible with the portal's `getUlozoneTerminyOsoby` AJAX method
use std::fmt;

use chrono::{DateTime, NaiveDateTime, TimeZone};
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Debug, Serialize, PartialEq, Eq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RawRoom {
    pub nazwa_skrocona: String,
}

#[derive(Deserialize, Debug, Serialize, PartialEq, Eq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RawLecturer {
    pub stopien_imie_nazwisko: String,
}

/// One scheduled class exactly as the portal sends it, timestamps in epoch milliseconds.
#[derive(Deserialize, Debug, Serialize, PartialEq, Eq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RawTile {
    pub data_rozpoczecia: i64,
    pub data_zakonczenia: i64,
    pub nazwa_pelna_przedmiotu: String,
    pub sale: Vec<RawRoom>,
    pub wykladowcy: Vec<RawLecturer>,
}

#[derive(Deserialize, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ReturnedValue {
    pub num_rows: usize,
    pub items: Vec<RawTile>,
}

#[derive(Deserialize, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WeekPayload {
    pub returned_value: ReturnedValue,
}

/// A single class occurrence, with times in the portal's local wall-clock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tile {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub subject_name: String,
    pub locations: Vec<String>,
    pub lecturers: Vec<String>,
}

/// Returns `None` for milliseconds outside chrono's representable range.
pub fn local_from_millis<Tz: TimeZone>(millis: i64, tz: &Tz) -> Option<NaiveDateTime> {
    DateTime::from_timestamp_millis(millis).map(|utc| utc.with_timezone(tz).naive_local())
}

impl Tile {
    pub fn from_raw<Tz: TimeZone>(raw: RawTile, tz: &Tz) -> Option<Tile> {
        Some(Tile {
            start: local_from_millis(raw.data_rozpoczecia, tz)?,
            end: local_from_millis(raw.data_zakonczenia, tz)?,
            subject_name: raw.nazwa_pelna_przedmiotu,
            locations: raw.sale.into_iter().map(|s| s.nazwa_skrocona).collect(),
            lecturers: raw
                .wykladowcy
                .into_iter()
                .map(|w| w.stopien_imie_nazwisko)
                .collect(),
        })
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} - {}",
            self.start.format("%H:%M"),
            self.end.format("%H:%M")
        )?;
        writeln!(f, "{}", self.subject_name)?;
        writeln!(f, "{}", self.locations.join(", "))?;
        write!(f, "{}", self.lecturers.join(", "))
    }
}
