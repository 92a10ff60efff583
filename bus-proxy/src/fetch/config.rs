//! Stop configuration for the fetcher.

use chrono::Duration;
use chrono_tz::Tz;

/// Default bus stop id.
const DEFAULT_BUS_STOP_ID: u32 = 22304;

/// Default station-table (display board) id.
const DEFAULT_SNR: u32 = 22304001;

/// Default offline lookahead in minutes.
const DEFAULT_LOOKAHEAD_MINS: i64 = 120;

/// Which datetime range the offline query asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OfflineWindow {
    /// From now until now plus the given duration.
    Lookahead(Duration),
    /// From local midnight today until noon tomorrow.
    TodayUntilNoonTomorrow,
}

impl Default for OfflineWindow {
    fn default() -> Self {
        OfflineWindow::Lookahead(Duration::minutes(DEFAULT_LOOKAHEAD_MINS))
    }
}

/// Fixed facts about the stop being served.
///
/// Immutable once the service is built.
#[derive(Debug, Clone, PartialEq)]
pub struct StopConfig {
    /// Bus stop id (`busstopID` parameter)
    pub bus_stop_id: u32,

    /// Station-table id (`snr` parameter of the online query)
    pub snr: u32,

    /// Caller identifier (`userID` parameter of the online query).
    /// Omitted from the request when `None`.
    pub user_id: Option<String>,

    /// Range requested from the offline query
    pub offline_window: OfflineWindow,

    /// Time zone the stop's locale times are written in
    pub time_zone: Tz,
}

impl Default for StopConfig {
    fn default() -> Self {
        Self {
            bus_stop_id: DEFAULT_BUS_STOP_ID,
            snr: DEFAULT_SNR,
            user_id: None,
            offline_window: OfflineWindow::default(),
            time_zone: chrono_tz::Europe::Bratislava,
        }
    }
}

impl StopConfig {
    /// Create a config for the given stop and station table.
    pub fn new(bus_stop_id: u32, snr: u32) -> Self {
        Self {
            bus_stop_id,
            snr,
            ..Self::default()
        }
    }

    /// Send a `userID` with online queries.
    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    /// Set the offline query range.
    pub fn with_offline_window(mut self, window: OfflineWindow) -> Self {
        self.offline_window = window;
        self
    }

    /// Set the stop's time zone.
    pub fn with_time_zone(mut self, tz: Tz) -> Self {
        self.time_zone = tz;
        self
    }
}
