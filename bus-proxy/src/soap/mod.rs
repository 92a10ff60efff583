//! SOAP transport for the TableData dispatch service.
//!
//! The service is an ASMX endpoint: every operation is a POSTed envelope
//! whose response carries a single `<operation>Result>` string. That string
//! is itself an XML dataset, decoded separately by [`crate::tabledata`].

mod client;
mod envelope;
mod error;
mod mock;

pub use client::{SoapClient, SoapConfig, SoapTransport};
pub use envelope::{SoapParams, SoapVersion, build_envelope, extract_result};
pub use error::SoapError;
pub use mock::{MockError, MockTransport};
