//! Online-first fetch with offline fallback.

use std::fmt;

use chrono::DateTime;
use chrono_tz::Tz;
use tracing::{debug, info, warn};

use crate::domain::DepartureRecord;
use crate::soap::{SoapParams, SoapTransport};
use crate::tabledata::{decode, normalize};

use super::config::StopConfig;
use super::params::{OFFLINE_OPERATION, ONLINE_OPERATION, offline_params, online_params};

/// How much of the result text a debug probe reports.
const PROBE_PEEK_CHARS: usize = 200;

/// Which upstream operation satisfied a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Source {
    Online,
    Offline,
}

impl Source {
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Online => "online",
            Source::Offline => "offline",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Departures for one request, with their provenance.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchResult {
    /// Sorted by planned instant.
    pub rows: Vec<DepartureRecord>,
    pub source: Source,
}

/// Outcome of querying one source directly, for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceProbe {
    Answered {
        /// Whether the result text held a dataset at all.
        has_dataset: bool,
        /// Rows left after normalization.
        rows: usize,
        /// Start of the raw result text.
        peek: String,
    },
    Failed {
        error: String,
    },
}

/// Queries the online operation and falls back to the offline one.
///
/// An online answer with no usable rows is not trusted: the online mode can
/// return a well-formed but empty dataset while timetable data exists, so
/// an empty online result triggers the fallback exactly like an error does.
/// Each operation runs at most once per fetch and nothing is retried.
pub struct DualSourceFetcher<T> {
    transport: T,
    config: StopConfig,
}

impl<T: SoapTransport> DualSourceFetcher<T> {
    pub fn new(transport: T, config: StopConfig) -> Self {
        Self { transport, config }
    }

    pub fn config(&self) -> &StopConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Fetch up to `count` departures for `platform` as of `now`.
    pub async fn fetch_at(&self, platform: &str, count: usize, now: DateTime<Tz>) -> FetchResult {
        if let Some(rows) = self.try_online(platform, count).await {
            return FetchResult {
                rows,
                source: Source::Online,
            };
        }

        info!(platform, "online data unavailable, falling back to offline");
        let rows = self.try_offline(platform, count, now).await;
        FetchResult {
            rows,
            source: Source::Offline,
        }
    }

    /// Online rows, or `None` when the online source is unusable.
    async fn try_online(&self, platform: &str, count: usize) -> Option<Vec<DepartureRecord>> {
        let params = online_params(&self.config, platform, count);
        let rows = match self.query(ONLINE_OPERATION, &params).await {
            Ok(rows) => rows,
            Err(e) => {
                warn!(platform, error = %e, "online query failed");
                return None;
            }
        };
        debug!(platform, rows = rows.len(), "online rows");
        (!rows.is_empty()).then_some(rows)
    }

    /// Offline rows; failures yield an empty list.
    async fn try_offline(
        &self,
        platform: &str,
        count: usize,
        now: DateTime<Tz>,
    ) -> Vec<DepartureRecord> {
        let params = offline_params(&self.config, platform, count, now);
        match self.query(OFFLINE_OPERATION, &params).await {
            Ok(rows) => {
                debug!(platform, rows = rows.len(), "offline rows");
                rows
            }
            Err(e) => {
                warn!(platform, error = %e, "offline query failed");
                Vec::new()
            }
        }
    }

    async fn query(
        &self,
        operation: &str,
        params: &SoapParams,
    ) -> Result<Vec<DepartureRecord>, crate::soap::SoapError> {
        let text = self.transport.call(operation, params).await?;
        Ok(match decode(&text) {
            Some(dataset) => normalize(&dataset, self.config.time_zone),
            None => {
                debug!(operation, "result held no dataset");
                Vec::new()
            }
        })
    }

    /// Query both sources unconditionally and report what each returned.
    pub async fn probe_at(
        &self,
        platform: &str,
        count: usize,
        now: DateTime<Tz>,
    ) -> (SourceProbe, SourceProbe) {
        let online = online_params(&self.config, platform, count);
        let offline = offline_params(&self.config, platform, count, now);
        let online = self.probe(ONLINE_OPERATION, &online).await;
        let offline = self.probe(OFFLINE_OPERATION, &offline).await;
        (online, offline)
    }

    async fn probe(&self, operation: &str, params: &SoapParams) -> SourceProbe {
        match self.transport.call(operation, params).await {
            Ok(text) => {
                let dataset = decode(&text);
                SourceProbe::Answered {
                    has_dataset: dataset.is_some(),
                    rows: dataset
                        .map(|ds| normalize(&ds, self.config.time_zone).len())
                        .unwrap_or(0),
                    peek: text.chars().take(PROBE_PEEK_CHARS).collect(),
                }
            }
            Err(e) => SourceProbe::Failed {
                error: e.to_string(),
            },
        }
    }
}
