//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::domain::DepartureRecord;
use crate::fetch::SourceProbe;
use crate::service::{DebugReport, StopTimes};

/// Query string of the stop-time and debug endpoints.
///
/// Both fields stay raw strings so that malformed values can fall back to
/// defaults instead of failing extraction.
#[derive(Debug, Default, Deserialize)]
pub struct StopTimesQuery {
    /// Platform number, or several joined with `;`
    pub platform: Option<String>,

    /// Requested number of rows
    pub count: Option<String>,
}

/// One departure row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartureRow {
    pub line: String,
    pub headsign: String,
    pub platform: String,

    /// Planned time as the upstream wrote it
    pub planned: String,

    /// `"arrival"` or `"departure"`
    pub planned_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delay_sec: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flags: Option<Vec<String>>,

    /// Planned instant, RFC 3339 with offset
    pub raw_time: String,
}

impl DepartureRow {
    pub fn from_record(record: &DepartureRecord) -> Self {
        Self {
            line: record.line().to_string(),
            headsign: record.headsign().to_string(),
            platform: record.platform().to_string(),
            planned: record.planned_text().to_string(),
            planned_type: record.planned_kind().as_str().to_string(),
            delay_sec: record.delay_seconds(),
            flags: record.flags().map(<[String]>::to_vec),
            raw_time: record.scheduled_at().to_rfc3339(),
        }
    }
}

/// Response of `GET /api/stop-times`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StopTimesResponse {
    /// Whether the rows came from the real-time source
    pub online: bool,

    /// `"online"` or `"offline"`
    pub source: String,

    pub rows: Vec<DepartureRow>,
}

impl StopTimesResponse {
    pub fn from_stop_times(stop_times: &StopTimes) -> Self {
        Self {
            online: stop_times.is_online(),
            source: stop_times.source.as_str().to_string(),
            rows: stop_times.rows.iter().map(DepartureRow::from_record).collect(),
        }
    }
}

/// What one source returned, as reported by the debug endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum SourceDebug {
    Answered {
        #[serde(rename = "hasDS")]
        has_ds: bool,
        rows: usize,
        peek: String,
    },
    Failed {
        error: String,
    },
}

impl From<SourceProbe> for SourceDebug {
    fn from(probe: SourceProbe) -> Self {
        match probe {
            SourceProbe::Answered {
                has_dataset,
                rows,
                peek,
            } => SourceDebug::Answered {
                has_ds: has_dataset,
                rows,
                peek,
            },
            SourceProbe::Failed { error } => SourceDebug::Failed { error },
        }
    }
}

/// Response of `GET /api/debug`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DebugResponse {
    pub platform: String,
    pub count: usize,
    pub online: SourceDebug,
    pub offline: SourceDebug,
}

impl DebugResponse {
    pub fn new(platform: String, count: usize, report: DebugReport) -> Self {
        Self {
            platform,
            count,
            online: report.online.into(),
            offline: report.offline.into(),
        }
    }
}

/// Response of `GET /api/health`.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub ok: bool,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
