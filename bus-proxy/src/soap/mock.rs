//! Mock transport for running without access to the dispatch service.
//!
//! Loads canned SOAP response envelopes from a directory and serves them
//! as if they were live responses.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::client::SoapTransport;
use super::envelope::{SoapParams, extract_result};
use super::error::SoapError;

/// Errors while loading mock response files.
#[derive(Debug, thiserror::Error)]
pub enum MockError {
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("no mock response files found in {0:?}")]
    Empty(PathBuf),
}

/// Transport that answers from `{operation}.xml` files.
///
/// Each file holds a full response envelope. Operations without a file
/// answer like a missing endpoint (HTTP 404). Request parameters are
/// ignored: the data is static.
#[derive(Debug, Clone)]
pub struct MockTransport {
    /// Response bodies keyed by operation name.
    responses: Arc<HashMap<String, String>>,
}

impl MockTransport {
    /// Load every `*.xml` file in `data_dir`.
    pub fn new(data_dir: impl AsRef<Path>) -> Result<Self, MockError> {
        let data_dir = data_dir.as_ref();
        let io_error = |path: &Path| {
            let path = path.to_path_buf();
            move |source| MockError::Io { path, source }
        };

        let mut responses = HashMap::new();
        for entry in std::fs::read_dir(data_dir).map_err(io_error(data_dir))? {
            let path = entry.map_err(io_error(data_dir))?.path();
            if !path.is_file() || path.extension().and_then(|s| s.to_str()) != Some("xml") {
                continue;
            }
            let Some(operation) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let body = std::fs::read_to_string(&path).map_err(io_error(path.as_path()))?;
            responses.insert(operation.to_string(), body);
        }

        if responses.is_empty() {
            return Err(MockError::Empty(data_dir.to_path_buf()));
        }

        Ok(Self {
            responses: Arc::new(responses),
        })
    }

    /// Build a mock from in-memory envelopes.
    pub fn from_responses<I, K, V>(responses: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            responses: Arc::new(
                responses
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }

    /// Operations that have a canned response.
    pub fn operations(&self) -> Vec<&str> {
        let mut ops: Vec<&str> = self.responses.keys().map(String::as_str).collect();
        ops.sort_unstable();
        ops
    }
}

impl SoapTransport for MockTransport {
    async fn call(&self, operation: &str, _params: &SoapParams) -> Result<String, SoapError> {
        let body = self
            .responses
            .get(operation)
            .ok_or_else(|| SoapError::UpstreamHttp {
                operation: operation.to_string(),
                status: 404,
            })?;
        extract_result(operation, body)
    }
}
