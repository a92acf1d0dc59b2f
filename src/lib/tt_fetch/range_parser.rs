//! Turning loose range expressions such as `04.11 - 09` into a pair of instants.
//!
//! Parsing happens in two passes. [`parse_expression`] only recognises the
//! grammar and yields [`PartialDate`]s whose fields may each be missing;
//! [`RangeExpression::resolve`] then fills the gaps. Missing start fields come
//! from today, missing end fields come from the already resolved start, so
//! `04.11 - 09` ends on the 9th of November.
use chrono::{Datelike, Days, Duration, NaiveDate, NaiveDateTime, NaiveTime};

use super::errors::MalformedRangeError;

/// Inclusive `[start, end]` with `start` at midnight and `end` at 23:59:59.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl DateRange {
    pub fn from_days(first: NaiveDate, last: NaiveDate) -> Result<DateRange, MalformedRangeError> {
        if first > last {
            return Err(MalformedRangeError::Reversed {
                start: first.format("%d.%m.%Y").to_string(),
                end: last.format("%d.%m.%Y").to_string(),
            });
        }
        Ok(DateRange {
            start: first.and_time(NaiveTime::MIN),
            end: end_of_day(last),
        })
    }

    pub fn contains(&self, instant: NaiveDateTime) -> bool {
        self.start <= instant && instant <= self.end
    }
}

/// The last whole second of `day`, 23:59:59.
pub fn end_of_day(day: NaiveDate) -> NaiveDateTime {
    day.and_time(NaiveTime::MIN) + Duration::seconds(86_399)
}

pub fn monday_of(day: NaiveDate) -> NaiveDate {
    day - Days::new(u64::from(day.weekday().num_days_from_monday()))
}

/// `D[.M[.Y]]` with every field optional.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PartialDate {
    pub day: Option<u32>,
    pub month: Option<u32>,
    pub year: Option<i32>,
}

impl PartialDate {
    /// Fills every missing field from `fallback`.
    pub fn resolve_against(&self, fallback: NaiveDate) -> Result<NaiveDate, MalformedRangeError> {
        let day = self.day.unwrap_or(fallback.day());
        let month = self.month.unwrap_or(fallback.month());
        let year = self.year.unwrap_or(fallback.year());
        NaiveDate::from_ymd_opt(year, month, day)
            .ok_or(MalformedRangeError::InvalidDate { day, month, year })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RangeExpression {
    Today,
    /// Current Monday to Sunday. `month` lands here as well.
    CurrentWeek,
    Dates {
        start: PartialDate,
        end: Option<PartialDate>,
    },
}

impl RangeExpression {
    pub fn resolve(&self, today: NaiveDate) -> Result<DateRange, MalformedRangeError> {
        match self {
            RangeExpression::Today => DateRange::from_days(today, today),
            RangeExpression::CurrentWeek => {
                let monday = monday_of(today);
                DateRange::from_days(monday, monday + Days::new(6))
            }
            RangeExpression::Dates { start, end } => {
                let first = start.resolve_against(today)?;
                let last = end.unwrap_or_default().resolve_against(first)?;
                DateRange::from_days(first, last)
            }
        }
    }
}

fn parse_number<T: std::str::FromStr>(
    field: &str,
    widths: std::ops::RangeInclusive<usize>,
    expression: &str,
) -> Result<T, MalformedRangeError> {
    if !widths.contains(&field.len()) || !field.bytes().all(|b| b.is_ascii_digit()) {
        return Err(MalformedRangeError::Syntax(expression.to_owned()));
    }
    field
        .parse()
        .map_err(|_| MalformedRangeError::Syntax(expression.to_owned()))
}

fn parse_partial_date(text: &str, expression: &str) -> Result<PartialDate, MalformedRangeError> {
    let text = text.strip_suffix('.').unwrap_or(text);
    let fields: Vec<&str> = text.split('.').collect();
    if text.is_empty() || fields.len() > 3 {
        return Err(MalformedRangeError::Syntax(expression.to_owned()));
    }

    Ok(PartialDate {
        day: Some(parse_number(fields[0], 1..=2, expression)?),
        month: fields
            .get(1)
            .map(|month| parse_number(month, 1..=2, expression))
            .transpose()?,
        year: fields
            .get(2)
            .map(|year| parse_number(year, 4..=4, expression))
            .transpose()?,
    })
}

/// Recognises `""`, `week`, `month` and `D[.M[.Y]] [- D[.M[.Y]]]`.
pub fn parse_expression(expression: &str) -> Result<RangeExpression, MalformedRangeError> {
    let trimmed = expression.trim();
    match trimmed {
        "" => return Ok(RangeExpression::Today),
        "week" | "month" => return Ok(RangeExpression::CurrentWeek),
        _ => {}
    }

    let (start, end) = match trimmed.split_once('-') {
        Some((start, end)) => (start.trim(), Some(end.trim())),
        None => (trimmed, None),
    };
    Ok(RangeExpression::Dates {
        start: parse_partial_date(start, expression)?,
        end: end
            .map(|end| parse_partial_date(end, expression))
            .transpose()?,
    })
}

pub fn parse_range(expression: &str, today: NaiveDate) -> Result<DateRange, MalformedRangeError> {
    parse_expression(expression)?.resolve(today)
}

#[cfg(test)]
#[path = "tests/range_parser.rs"]
mod tests;
