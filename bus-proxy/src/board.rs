//! Terminal departure board built on the stop-time API.
//!
//! For each platform the board shows the next departure with its route,
//! and the route of the one after it.

use std::fmt::Write as _;

use chrono::{DateTime, Duration};
use chrono_tz::Tz;
use reqwest::Url;
use tracing::debug;

use crate::domain::{normalize_line, parse_planned_time};
use crate::route_names::RouteNames;
use crate::web::{DepartureRow, StopTimesResponse};

/// Rows requested per platform; the board picks from these.
pub const BOARD_FETCH_COUNT: usize = 50;

/// Errors fetching one platform's departures.
#[derive(Debug, thiserror::Error)]
pub enum BoardError {
    #[error("invalid API URL {url}: {message}")]
    InvalidUrl { url: String, message: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API {status}")]
    Status { status: u16 },
}

/// One departure as the board shows it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardEntry {
    pub when: DateTime<Tz>,
    pub line: String,
    pub headsign: String,
}

impl BoardEntry {
    /// Read a row from the API, or `None` if its time is unreadable.
    ///
    /// `rawTime` is preferred; the upstream `planned` text is the fallback.
    pub fn from_row(row: &DepartureRow, tz: Tz) -> Option<Self> {
        let when = DateTime::parse_from_rfc3339(&row.raw_time)
            .map(|t| t.with_timezone(&tz))
            .ok()
            .or_else(|| parse_planned_time(&row.planned, tz).ok())?;

        Some(Self {
            when,
            line: normalize_line(Some(&row.line), None),
            headsign: row.headsign.clone(),
        })
    }
}

/// A platform's departures as fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformBoard {
    pub platform: String,
    pub source: String,
    /// In API order.
    pub entries: Vec<BoardEntry>,
}

impl PlatformBoard {
    pub fn from_response(platform: &str, response: &StopTimesResponse, tz: Tz) -> Self {
        let source = if response.online {
            "online".to_string()
        } else if response.source.is_empty() {
            "offline".to_string()
        } else {
            response.source.clone()
        };

        let entries = response
            .rows
            .iter()
            .filter_map(|row| {
                let entry = BoardEntry::from_row(row, tz);
                if entry.is_none() {
                    debug!(platform, raw_time = %row.raw_time, "skipping row with unreadable time");
                }
                entry
            })
            .collect();

        Self {
            platform: platform.to_string(),
            source,
            entries,
        }
    }

    /// Render the platform's block of the board as of `now`.
    pub fn render(&self, routes: &RouteNames, now: DateTime<Tz>) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "=== Platform {} ({}) ===", self.platform, self.source);

        let picked = pick_next_two(&self.entries, now);
        let Some(next) = picked.first() else {
            let _ = writeln!(out, "No upcoming departures.");
            return out;
        };

        let _ = writeln!(out, "Next: {}", describe(next, now));
        let _ = writeln!(
            out,
            "Route (next): {}",
            routes.route(&next.line, &next.headsign)
        );

        if let Some(following) = picked.get(1) {
            let _ = writeln!(
                out,
                "Route (following): {}",
                routes.route(&following.line, &following.headsign)
            );
            let _ = writeln!(out, "(following: {})", describe(following, now));
        }
        out
    }
}

fn describe(entry: &BoardEntry, now: DateTime<Tz>) -> String {
    format!(
        "{} {}  line {} → {}",
        format_clock(entry.when),
        format_relative(entry.when, now),
        entry.line,
        entry.headsign
    )
}

/// The next two departures to show.
///
/// Two upcoming rows if there are two; otherwise the single upcoming row
/// plus the first row after it; otherwise the first two rows as given.
pub fn pick_next_two(entries: &[BoardEntry], now: DateTime<Tz>) -> Vec<&BoardEntry> {
    let mut upcoming: Vec<&BoardEntry> = entries.iter().filter(|e| e.when >= now).collect();
    upcoming.sort_by_key(|e| e.when);

    match upcoming.as_slice() {
        [first, second, ..] => vec![*first, *second],
        [only] => {
            let mut picked = vec![*only];
            picked.extend(entries.iter().find(|e| e.when > only.when));
            picked
        }
        [] => entries.iter().take(2).collect(),
    }
}

/// Local clock time, `HH:MM`.
pub fn format_clock(when: DateTime<Tz>) -> String {
    when.format("%H:%M").to_string()
}

/// How far away `when` is from `now`.
pub fn format_relative(when: DateTime<Tz>, now: DateTime<Tz>) -> String {
    let remaining = when - now;
    if remaining <= Duration::zero() {
        return "(departing)".to_string();
    }

    let minutes = remaining.num_minutes();
    let (hours, minutes) = (minutes / 60, minutes % 60);
    let span = if hours > 0 {
        format!("{hours} h {minutes} m")
    } else {
        format!("{minutes} m")
    };

    if when.date_naive() == now.date_naive() {
        format!("(today, in {span})")
    } else {
        format!("(in {span})")
    }
}

/// URL of one platform's stop-time query.
pub fn platform_url(api_url: &str, platform: &str) -> Result<Url, BoardError> {
    Url::parse_with_params(
        api_url,
        &[
            ("platform", platform.to_string()),
            ("count", BOARD_FETCH_COUNT.to_string()),
        ],
    )
    .map_err(|e| BoardError::InvalidUrl {
        url: api_url.to_string(),
        message: e.to_string(),
    })
}

/// Fetch one platform's departures from the stop-time API.
pub async fn fetch_platform(
    client: &reqwest::Client,
    api_url: &str,
    platform: &str,
    tz: Tz,
) -> Result<PlatformBoard, BoardError> {
    let url = platform_url(api_url, platform)?;
    let response = client.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(BoardError::Status {
            status: status.as_u16(),
        });
    }

    let body: StopTimesResponse = response.json().await?;
    Ok(PlatformBoard::from_response(platform, &body, tz))
}
