//! SOAP envelope construction and result extraction.

use std::fmt::{self, Write as _};

use quick_xml::escape::escape;
use reqwest::header::{CONTENT_TYPE, HeaderName};

use crate::xml::Element;

use super::error::SoapError;

const SOAP_11_ENVELOPE_NS: &str = "http://schemas.xmlsoap.org/soap/envelope/";
const SOAP_12_ENVELOPE_NS: &str = "http://www.w3.org/2003/05/soap-envelope";

/// SOAP protocol version, which decides the envelope namespace and how the
/// action is announced in the HTTP headers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SoapVersion {
    /// `text/xml` content type plus a separate `SOAPAction` header.
    #[default]
    V11,
    /// `application/soap+xml` content type carrying an `action` parameter.
    V12,
}

impl SoapVersion {
    /// Parse `"1.1"` or `"1.2"` (as used in configuration).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "1.1" | "11" => Some(SoapVersion::V11),
            "1.2" | "12" => Some(SoapVersion::V12),
            _ => None,
        }
    }

    fn envelope_namespace(&self) -> &'static str {
        match self {
            SoapVersion::V11 => SOAP_11_ENVELOPE_NS,
            SoapVersion::V12 => SOAP_12_ENVELOPE_NS,
        }
    }

    /// Headers announcing `action` for this protocol version.
    pub fn headers(&self, action: &str) -> Vec<(HeaderName, String)> {
        match self {
            SoapVersion::V11 => vec![
                (CONTENT_TYPE, "text/xml; charset=utf-8".to_string()),
                (
                    HeaderName::from_static("soapaction"),
                    format!("\"{action}\""),
                ),
            ],
            SoapVersion::V12 => vec![(
                CONTENT_TYPE,
                format!("application/soap+xml; charset=utf-8; action=\"{action}\""),
            )],
        }
    }
}

impl fmt::Display for SoapVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SoapVersion::V11 => f.write_str("1.1"),
            SoapVersion::V12 => f.write_str("1.2"),
        }
    }
}

/// Ordered operation parameters, serialized as `<name>value</name>`.
///
/// Values are escaped on serialization; names are trusted identifiers.
///
/// ```
/// use bus_proxy::soap::SoapParams;
///
/// let params = SoapParams::new()
///     .with("busstopID", 22304)
///     .with("platformNumbers", "1;2");
/// assert_eq!(
///     params.to_fragment(),
///     "<busstopID>22304</busstopID><platformNumbers>1;2</platformNumbers>"
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SoapParams {
    elements: Vec<(&'static str, String)>,
}

impl SoapParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a parameter element.
    pub fn with(mut self, name: &'static str, value: impl fmt::Display) -> Self {
        self.elements.push((name, value.to_string()));
        self
    }

    /// Append a parameter element only when `value` is present.
    pub fn with_optional(self, name: &'static str, value: Option<impl fmt::Display>) -> Self {
        match value {
            Some(value) => self.with(name, value),
            None => self,
        }
    }

    /// Value of the first parameter named `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.elements
            .iter()
            .find(|(k, _)| *k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Parameter names in order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.elements.iter().map(|(k, _)| *k)
    }

    /// Serialize to the inline XML fragment placed inside the operation element.
    pub fn to_fragment(&self) -> String {
        let mut out = String::new();
        for (name, value) in &self.elements {
            // Writing to a String cannot fail.
            let _ = write!(out, "<{name}>{}</{name}>", escape(value.as_str()));
        }
        out
    }
}

/// Build the request envelope for `operation` in `namespace`.
pub fn build_envelope(
    version: SoapVersion,
    namespace: &str,
    operation: &str,
    params: &SoapParams,
) -> String {
    format!(
        concat!(
            r#"<?xml version="1.0" encoding="utf-8"?>"#,
            r#"<soap:Envelope xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" "#,
            r#"xmlns:xsd="http://www.w3.org/2001/XMLSchema" "#,
            r#"xmlns:soap="{envelope_ns}">"#,
            r#"<soap:Body><{operation} xmlns="{namespace}">{params}</{operation}></soap:Body>"#,
            r#"</soap:Envelope>"#,
        ),
        envelope_ns = version.envelope_namespace(),
        operation = operation,
        namespace = escape(namespace),
        params = params.to_fragment(),
    )
}

/// Extract the text of `Envelope/Body/{operation}Response/{operation}Result`.
///
/// Element prefixes are ignored. An empty result element yields an empty
/// string; a missing node, an unparseable body, or a result holding
/// elements instead of text is [`SoapError::UpstreamShape`].
pub fn extract_result(operation: &str, body: &str) -> Result<String, SoapError> {
    let envelope = Element::parse(body).map_err(|_| SoapError::shape(operation))?;
    if envelope.name != "Envelope" {
        return Err(SoapError::shape(operation));
    }

    let response_name = format!("{operation}Response");
    let result_name = format!("{operation}Result");

    let result = envelope
        .child("Body")
        .and_then(|b| b.child(&response_name))
        .and_then(|r| r.child(&result_name))
        .ok_or_else(|| SoapError::shape(operation))?;

    if !result.children.is_empty() {
        return Err(SoapError::shape(operation));
    }
    Ok(result.text.clone())
}
