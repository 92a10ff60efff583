//! Request parameters for the two upstream operations.

use chrono::{DateTime, NaiveTime};
use chrono_tz::Tz;

use crate::domain::{format_request_time, local_midnight, resolve_local};
use crate::soap::SoapParams;

use super::config::{OfflineWindow, StopConfig};

/// Real-time query operation.
pub const ONLINE_OPERATION: &str = "GetOnlineStopTime";

/// Scheduled (timetable) query operation.
pub const OFFLINE_OPERATION: &str = "GetAVLStopTime";

/// Parameters of the online query: departures only, ordered by delay.
pub fn online_params(config: &StopConfig, platform: &str, count: usize) -> SoapParams {
    SoapParams::new()
        .with("busstopID", config.bus_stop_id)
        .with("count", count)
        .with("platformNumbers", platform)
        .with("getArrivals", false)
        .with_optional("userID", config.user_id.as_deref())
        .with("orderByDelay", true)
        .with("snr", config.snr)
}

/// Parameters of the offline query over the configured window.
pub fn offline_params(
    config: &StopConfig,
    platform: &str,
    count: usize,
    now: DateTime<Tz>,
) -> SoapParams {
    let (from, to) = offline_range(config.offline_window, now);
    SoapParams::new()
        .with("busstopID", config.bus_stop_id)
        .with("platformNumbers", platform)
        .with("getArrivals", false)
        .with("dateFrom", format_request_time(&from))
        .with("dateTo", format_request_time(&to))
        .with("Count", count)
}

/// The `[from, to]` range requested from the offline query.
pub fn offline_range(window: OfflineWindow, now: DateTime<Tz>) -> (DateTime<Tz>, DateTime<Tz>) {
    match window {
        OfflineWindow::Lookahead(duration) => (now, now + duration),
        OfflineWindow::TodayUntilNoonTomorrow => {
            let tz = now.timezone();
            let today = now.date_naive();
            let from = local_midnight(today, tz).unwrap_or(now);
            let to = today
                .succ_opt()
                .zip(NaiveTime::from_hms_opt(12, 0, 0))
                .and_then(|(tomorrow, noon)| resolve_local(tomorrow.and_time(noon), tz))
                .unwrap_or(now);
            (from, to)
        }
    }
}
