//! Domain types for the stop-time feed.
//!
//! Everything here is validated at construction time: a
//! [`DepartureRecord`] always has a line, headsign, platform and a real
//! instant, so code downstream of the normalizer can trust it.

mod departure;
mod line;
mod time;

pub use departure::{DepartureRecord, PlannedKind};
pub use line::{UNKNOWN_LINE, normalize_line};
pub use time::{
    TimeError, end_of_local_day, expand_year, format_request_time, local_midnight,
    parse_planned_time, resolve_local,
};
