//! Shared fixtures for unit tests.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, TimeZone};
use chrono_tz::Europe::Bratislava;
use chrono_tz::Tz;

use crate::soap::{SoapError, SoapParams, SoapTransport};

/// A canned answer for one operation.
#[derive(Debug, Clone)]
pub enum Reply {
    /// Result text as extracted from the envelope.
    Text(String),
    /// Non-success HTTP status.
    Status(u16),
    /// Envelope without a result node.
    Shape,
}

/// Transport answering from a script and recording every call.
#[derive(Default)]
pub struct ScriptedTransport {
    replies: HashMap<&'static str, Reply>,
    calls: Mutex<Vec<(String, SoapParams)>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(mut self, operation: &'static str, reply: Reply) -> Self {
        self.replies.insert(operation, reply);
        self
    }

    /// Operations called so far, in order.
    pub fn operations(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(op, _)| op.clone())
            .collect()
    }

    /// Parameters of the first call to `operation`.
    pub fn params_of(&self, operation: &str) -> Option<SoapParams> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .find(|(op, _)| op == operation)
            .map(|(_, params)| params.clone())
    }
}

impl SoapTransport for ScriptedTransport {
    async fn call(&self, operation: &str, params: &SoapParams) -> Result<String, SoapError> {
        self.calls
            .lock()
            .unwrap()
            .push((operation.to_string(), params.clone()));

        match self.replies.get(operation) {
            Some(Reply::Text(text)) => Ok(text.clone()),
            Some(Reply::Status(status)) => Err(SoapError::UpstreamHttp {
                operation: operation.to_string(),
                status: *status,
            }),
            Some(Reply::Shape) | None => Err(SoapError::UpstreamShape {
                operation: operation.to_string(),
            }),
        }
    }
}

/// A `<DS>` payload of rows given as (line, platform, departure time, headsign).
pub fn dataset(rows: &[(&str, &str, &str, &str)]) -> String {
    let mut out = String::from("<DS>");
    for (line, platform, time, headsign) in rows {
        out.push_str(&format!(
            r#"<D lnt="{line}" pt="{platform}" td="{time}" ebn="{headsign}"/>"#
        ));
    }
    out.push_str("</DS>");
    out
}

/// Stop-local instant.
pub fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Tz> {
    Bratislava.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
}
