//! Conversion from raw dataset rows to departure records.
//!
//! This is the only place raw upstream rows turn into
//! [`DepartureRecord`]s. Rows that cannot produce a complete record are
//! dropped silently: a data-quality problem in one row never fails the
//! whole response.

use chrono_tz::Tz;
use tracing::trace;

use crate::domain::{
    DepartureRecord, PlannedKind, TimeError, normalize_line, parse_planned_time,
};

use super::fields::{
    ARRIVAL_TIME, DELAY, FLAGS, FieldCandidates, HEADSIGN, LINE_NUMERIC, LINE_TEXT, PLANNED_TIME,
    PLATFORM,
};
use super::types::{Dataset, RawRow};

/// Why a row was dropped.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RowRejected {
    #[error("row has no line number")]
    MissingLine,

    #[error("row has no headsign")]
    MissingHeadsign,

    #[error("row has no platform")]
    MissingPlatform,

    #[error("row has no planned time")]
    MissingTime,

    #[error(transparent)]
    InvalidTime(#[from] TimeError),
}

/// Normalize every row of `dataset`, dropping invalid ones.
///
/// The result is sorted by planned instant. Rows with equal instants keep
/// their upstream order.
pub fn normalize(dataset: &Dataset, tz: Tz) -> Vec<DepartureRecord> {
    let mut records: Vec<DepartureRecord> = dataset
        .rows
        .iter()
        .enumerate()
        .filter_map(|(index, row)| match normalize_row(row, tz) {
            Ok(record) => Some(record),
            Err(reason) => {
                trace!(index, %reason, "dropping row");
                None
            }
        })
        .collect();

    // `sort_by_key` is stable.
    records.sort_by_key(DepartureRecord::scheduled_at);
    records
}

/// Normalize a single row.
pub fn normalize_row(row: &RawRow, tz: Tz) -> Result<DepartureRecord, RowRejected> {
    let line_text = LINE_TEXT.value(row);
    let line_numeric = LINE_NUMERIC.value(row);
    if line_text.is_none() && line_numeric.is_none() {
        return Err(RowRejected::MissingLine);
    }
    let line = normalize_line(line_text, line_numeric);

    let platform = PLATFORM.value(row).ok_or(RowRejected::MissingPlatform)?;

    let (time_field, planned_text) = PLANNED_TIME.first(row).ok_or(RowRejected::MissingTime)?;
    let planned_kind = if time_field == ARRIVAL_TIME {
        PlannedKind::Arrival
    } else {
        PlannedKind::Departure
    };
    let scheduled_at = parse_planned_time(planned_text, tz)?;

    let headsign = HEADSIGN.value(row).ok_or(RowRejected::MissingHeadsign)?;

    Ok(DepartureRecord::new(
        line,
        headsign.to_string(),
        platform.to_string(),
        planned_text.to_string(),
        planned_kind,
        parse_delay(row, DELAY),
        parse_flags(row),
        scheduled_at,
    ))
}

/// First delay candidate that holds an integer.
fn parse_delay(row: &RawRow, candidates: FieldCandidates) -> Option<i64> {
    candidates
        .names()
        .iter()
        .filter_map(|name| row.get(name))
        .find_map(|value| value.parse::<i64>().ok())
}

/// Split the flag field on commas; blanks and repeats are dropped.
fn parse_flags(row: &RawRow) -> Option<Vec<String>> {
    let raw = FLAGS.value(row)?;
    let mut flags: Vec<String> = Vec::new();
    for token in raw.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        if !flags.iter().any(|f| f == token) {
            flags.push(token.to_string());
        }
    }
    (!flags.is_empty()).then_some(flags)
}
