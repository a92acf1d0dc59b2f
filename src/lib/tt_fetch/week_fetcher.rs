use chrono::{NaiveDateTime, TimeZone};
use chrono_tz::Tz;
use log::{debug, info};

use super::{
    errors::FetchError,
    models::tile_model::{Tile, WeekPayload},
};

/// A trait, necessary for every entity that can answer week-scoped timetable queries.
/// Gets the Monday of the week as epoch milliseconds and returns the raw JSON answer.
#[allow(async_fn_in_trait)]
pub trait WeekSource {
    async fn fetch_week(&self, week_start_ms: i64) -> Result<String, FetchError>;
}

/// Decodes one page. Tiles come back highest index first, paired with that index.
pub fn decode_page(raw: &str, tz: &Tz) -> Result<Vec<(usize, Tile)>, FetchError> {
    let payload: WeekPayload = serde_json::from_str(raw)?;
    let returned = payload.returned_value;
    if returned.num_rows > returned.items.len() {
        return Err(FetchError::InconsistentPage {
            num_rows: returned.num_rows,
            items: returned.items.len(),
        });
    }

    let mut page = returned
        .items
        .into_iter()
        .take(returned.num_rows)
        .enumerate()
        .map(|(index, raw_tile)| {
            let millis = raw_tile.data_rozpoczecia;
            Tile::from_raw(raw_tile, tz)
                .map(|tile| (index, tile))
                .ok_or(FetchError::Timestamp(millis))
        })
        .collect::<Result<Vec<_>, _>>()?;
    page.reverse();
    Ok(page)
}

pub struct WeekFetcher<'a, S: WeekSource> {
    source: &'a S,
    tz: Tz,
}

impl<'a, S: WeekSource> WeekFetcher<'a, S> {
    pub fn new(source: &'a S, tz: Tz) -> WeekFetcher<'a, S> {
        WeekFetcher { source, tz }
    }

    pub fn week_start_millis(&self, week_start: NaiveDateTime) -> i64 {
        self.tz
            .from_local_datetime(&week_start)
            .earliest()
            .unwrap_or_else(|| self.tz.from_utc_datetime(&week_start))
            .timestamp_millis()
    }

    pub async fn fetch(&self, week_start: NaiveDateTime) -> Result<Vec<(usize, Tile)>, FetchError> {
        let week_start_ms = self.week_start_millis(week_start);
        info!("Getting tiles for week of {}", week_start.format("%d.%m.%Y"));
        debug!("Week start sent as {} ms", week_start_ms);
        let raw = self.source.fetch_week(week_start_ms).await?;
        let page = decode_page(&raw, &self.tz)?;
        debug!("Week of {} carries {} tiles", week_start.date(), page.len());
        Ok(page)
    }
}

#[cfg(test)]
#[path = "tests/week_fetcher.rs"]
mod tests;
