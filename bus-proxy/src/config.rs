//! Server configuration from the environment.

use std::path::PathBuf;

use chrono::Duration;
use chrono_tz::Tz;

use crate::fetch::{OfflineWindow, StopConfig};
use crate::soap::{SoapConfig, SoapVersion};

/// Port the proxy listens on by default.
pub const DEFAULT_PORT: u16 = 8787;

/// A variable that is set but unusable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {name}={value:?}: {reason}")]
pub struct ConfigError {
    pub name: &'static str,
    pub value: String,
    pub reason: String,
}

/// Everything the server binary needs to start.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub soap: SoapConfig,
    pub stop: StopConfig,
    /// Serve canned responses from this directory instead of calling out
    pub mock_dir: Option<PathBuf>,
    /// Verbose logging
    pub debug: bool,
}

impl ServerConfig {
    /// Read the configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read the configuration through `lookup`, which returns a variable's
    /// value if it is set. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let mut soap = SoapConfig::default();
        if let Some(url) = get("TABLEDATA_BASE_URL") {
            soap = soap.with_base_url(url);
        }
        if let Some(namespace) = get("TABLEDATA_NAMESPACE") {
            soap = soap.with_namespace(namespace);
        }
        if let Some(raw) = get("SOAP_VERSION") {
            let version = SoapVersion::parse(raw.trim())
                .ok_or_else(|| invalid("SOAP_VERSION", &raw, "expected 1.1 or 1.2"))?;
            soap = soap.with_version(version);
        }
        if let Some(raw) = get("TABLEDATA_TIMEOUT_SECS") {
            soap = soap.with_timeout(parse_number("TABLEDATA_TIMEOUT_SECS", &raw)?);
        }

        let defaults = StopConfig::default();
        let bus_stop_id = match get("BUS_STOP_ID") {
            Some(raw) => parse_number("BUS_STOP_ID", &raw)?,
            None => defaults.bus_stop_id,
        };
        let snr = match get("SNR") {
            Some(raw) => parse_number("SNR", &raw)?,
            None => defaults.snr,
        };

        let mut stop = StopConfig::new(bus_stop_id, snr);
        if let Some(user_id) = get("TABLEDATA_USER_ID") {
            stop = stop.with_user_id(user_id);
        }
        stop = stop.with_offline_window(offline_window(&get)?);
        if let Some(raw) = get("STOP_TIME_ZONE") {
            let tz: Tz = raw
                .trim()
                .parse()
                .map_err(|e| invalid("STOP_TIME_ZONE", &raw, e))?;
            stop = stop.with_time_zone(tz);
        }

        let port = match get("PORT") {
            Some(raw) => parse_number("PORT", &raw)?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            port,
            soap,
            stop,
            mock_dir: get("TABLEDATA_MOCK_DIR").map(PathBuf::from),
            debug: get("DEBUG").as_deref() == Some("1"),
        })
    }
}

fn offline_window(get: &impl Fn(&str) -> Option<String>) -> Result<OfflineWindow, ConfigError> {
    match get("OFFLINE_WINDOW").as_deref().map(str::trim) {
        None | Some("lookahead") => match get("OFFLINE_LOOKAHEAD_MINS") {
            Some(raw) => {
                let mins: u32 = parse_number("OFFLINE_LOOKAHEAD_MINS", &raw)?;
                if mins == 0 {
                    return Err(invalid("OFFLINE_LOOKAHEAD_MINS", &raw, "must be positive"));
                }
                Ok(OfflineWindow::Lookahead(Duration::minutes(i64::from(mins))))
            }
            None => Ok(OfflineWindow::default()),
        },
        Some("extended") => Ok(OfflineWindow::TodayUntilNoonTomorrow),
        Some(other) => Err(invalid(
            "OFFLINE_WINDOW",
            other,
            "expected lookahead or extended",
        )),
    }
}

fn parse_number<N>(name: &'static str, raw: &str) -> Result<N, ConfigError>
where
    N: std::str::FromStr,
    N::Err: std::fmt::Display,
{
    raw.trim().parse().map_err(|e| invalid(name, raw, e))
}

fn invalid(name: &'static str, value: &str, reason: impl std::fmt::Display) -> ConfigError {
    ConfigError {
        name,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}
