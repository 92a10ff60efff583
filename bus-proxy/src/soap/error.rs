//! SOAP transport error types.

/// Errors from a single SOAP call.
///
/// The fetcher absorbs all of these per source attempt; none of them is
/// ever shown to a feed client directly.
#[derive(Debug, thiserror::Error)]
pub enum SoapError {
    /// The request never got an HTTP response (connection, DNS, timeout)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status
    #[error("{operation} returned HTTP {status}")]
    UpstreamHttp { operation: String, status: u16 },

    /// The response envelope has no textual `<operation>Result>` node
    #[error("{operation}Result not found in SOAP response")]
    UpstreamShape { operation: String },
}

impl SoapError {
    pub(crate) fn shape(operation: &str) -> Self {
        SoapError::UpstreamShape {
            operation: operation.to_string(),
        }
    }
}
