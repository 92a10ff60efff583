//! Stop-time service: the request-level entry point.
//!
//! Wraps the dual-source fetcher with count clamping and the
//! today-preference window applied to whatever the sources returned.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::domain::{DepartureRecord, end_of_local_day};
use crate::fetch::{DualSourceFetcher, Source, SourceProbe, StopConfig};
use crate::soap::SoapTransport;

/// Smallest number of rows a request can ask for.
pub const MIN_COUNT: usize = 1;

/// Largest number of rows a request can ask for.
pub const MAX_COUNT: usize = 20;

/// Rows returned when the request names no count.
pub const DEFAULT_COUNT: usize = 8;

/// Clamp a requested row count into `[MIN_COUNT, MAX_COUNT]`.
///
/// Takes a signed value so raw query input can be clamped directly.
pub fn clamp_count(requested: i64) -> usize {
    requested.clamp(MIN_COUNT as i64, MAX_COUNT as i64) as usize
}

/// Departures for one platform request.
#[derive(Debug, Clone, PartialEq)]
pub struct StopTimes {
    pub source: Source,
    pub rows: Vec<DepartureRecord>,
}

impl StopTimes {
    /// Whether the rows came from the real-time source.
    pub fn is_online(&self) -> bool {
        self.source == Source::Online
    }
}

/// Both sources queried side by side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebugReport {
    pub online: SourceProbe,
    pub offline: SourceProbe,
}

/// Prefer rows still to come today.
///
/// Of the rows at or after `now`, those before the next local midnight win.
/// When nothing is left today the remaining upcoming rows are used, and
/// when nothing is upcoming at all every row is kept. The input order is
/// preserved and the result is cut to `count`.
pub fn today_window(
    rows: Vec<DepartureRecord>,
    now: DateTime<Tz>,
    count: usize,
) -> Vec<DepartureRecord> {
    let upcoming: Vec<&DepartureRecord> =
        rows.iter().filter(|r| r.scheduled_at() >= now).collect();

    let chosen: Vec<DepartureRecord> = match end_of_local_day(&now) {
        Some(midnight) => {
            let today: Vec<&DepartureRecord> = upcoming
                .iter()
                .copied()
                .filter(|r| r.scheduled_at() < midnight)
                .collect();
            if !today.is_empty() {
                today.into_iter().cloned().collect()
            } else if !upcoming.is_empty() {
                upcoming.into_iter().cloned().collect()
            } else {
                rows
            }
        }
        None if !upcoming.is_empty() => upcoming.into_iter().cloned().collect(),
        None => rows,
    };

    chosen.into_iter().take(count).collect()
}

/// Serves stop-time requests for one configured stop.
pub struct StopTimeService<T> {
    fetcher: DualSourceFetcher<T>,
}

impl<T: SoapTransport> StopTimeService<T> {
    pub fn new(transport: T, config: StopConfig) -> Self {
        Self {
            fetcher: DualSourceFetcher::new(transport, config),
        }
    }

    pub fn config(&self) -> &StopConfig {
        self.fetcher.config()
    }

    /// Current instant in the stop's zone.
    pub fn now(&self) -> DateTime<Tz> {
        Utc::now().with_timezone(&self.config().time_zone)
    }

    /// Up to `count` departures for `platform`, as of now.
    pub async fn get_stop_times(&self, platform: &str, count: usize) -> StopTimes {
        self.get_stop_times_at(platform, count, self.now()).await
    }

    /// Up to `count` departures for `platform`, as of `now`.
    ///
    /// `count` is clamped before it reaches the upstream queries.
    pub async fn get_stop_times_at(
        &self,
        platform: &str,
        count: usize,
        now: DateTime<Tz>,
    ) -> StopTimes {
        let count = count.clamp(MIN_COUNT, MAX_COUNT);
        let fetched = self.fetcher.fetch_at(platform, count, now).await;
        StopTimes {
            source: fetched.source,
            rows: today_window(fetched.rows, now, count),
        }
    }

    /// Query both sources for `platform` and report each outcome.
    pub async fn debug(&self, platform: &str, count: usize) -> DebugReport {
        self.debug_at(platform, count, self.now()).await
    }

    pub async fn debug_at(&self, platform: &str, count: usize, now: DateTime<Tz>) -> DebugReport {
        let count = count.clamp(MIN_COUNT, MAX_COUNT);
        let (online, offline) = self.fetcher.probe_at(platform, count, now).await;
        DebugReport { online, offline }
    }
}
