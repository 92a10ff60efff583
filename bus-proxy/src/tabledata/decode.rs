//! Result payload decoding.

use tracing::debug;

use crate::xml::Element;

use super::types::Dataset;

/// Decode a `<operation>Result>` text into a dataset.
///
/// The text is parsed as XML first. If that fails, or the top-level element
/// is not the dataset container, the four standard entity escapes are
/// undone once and parsing is retried: some deployments escape the payload
/// twice.
///
/// Markup that still fails to parse after the retry, such as an entity
/// the XML standard does not declare (`&nbsp;`), yields `None` for the
/// whole payload; no partial rows are salvaged.
///
/// `None` is not an error. The service sometimes returns a valid but empty
/// envelope, and callers treat `None` as "no rows".
///
/// ```
/// use bus_proxy::tabledata::decode;
///
/// assert_eq!(decode("<DS><D ln=\"527\"/></DS>").unwrap().len(), 1);
/// assert_eq!(decode("&lt;DS&gt;&lt;D ln=\"527\"/&gt;&lt;/DS&gt;").unwrap().len(), 1);
/// assert!(decode("").is_none());
/// ```
pub fn decode(result_text: &str) -> Option<Dataset> {
    if let Some(dataset) = parse_dataset(result_text) {
        return Some(dataset);
    }

    let unescaped = unescape_entities(result_text);
    let dataset = parse_dataset(&unescaped);
    if dataset.is_none() {
        debug!(len = result_text.len(), "no dataset in result text");
    }
    dataset
}

fn parse_dataset(text: &str) -> Option<Dataset> {
    let root = Element::parse(text).ok()?;
    Dataset::from_element(&root)
}

/// Undo `&lt; &gt; &quot; &amp;`, with `&amp;` last so that `&amp;lt;`
/// becomes `&lt;` rather than `<`.
pub fn unescape_entities(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_markup() {
        let ds = decode(r#"<DS><D lnt="527" pt="1"/><D lnt="525" pt="2"/></DS>"#).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.rows[0].get("lnt"), Some("527"));
    }

    #[test]
    fn double_escaped_markup() {
        let ds = decode("&lt;DS&gt;&lt;D&gt;&lt;ebn&gt;Nitra&lt;/ebn&gt;&lt;/D&gt;&lt;/DS&gt;").unwrap();
        assert_eq!(ds.len(), 1);
        assert_eq!(ds.rows[0].get("ebn"), Some("Nitra"));
    }

    #[test]
    fn escaped_quotes_in_attributes() {
        let ds = decode("&lt;DS&gt;&lt;D ebn=&quot;Nitra&quot;/&gt;&lt;/DS&gt;").unwrap();
        assert_eq!(ds.rows[0].get("ebn"), Some("Nitra"));
    }

    #[test]
    fn empty_dataset_is_some() {
        let ds = decode("<DS/>").unwrap();
        assert!(ds.is_empty());
    }

    #[test]
    fn single_row() {
        let ds = decode("<DS><D lnt=\"1\"/></DS>").unwrap();
        assert_eq!(ds.len(), 1);
    }

    #[test]
    fn missing_container_or_garbage_is_none() {
        assert!(decode("").is_none());
        assert!(decode("<NewDataSet><D/></NewDataSet>").is_none());
        assert!(decode("<DS><D></DS>").is_none());
        assert!(decode("Error: no data").is_none());
    }

    #[test]
    fn undeclared_entity_rejects_whole_payload() {
        let clean = r#"<DS><D lnt="527" pt="1" ebn="Nitra"/></DS>"#;
        assert_eq!(decode(clean).map(|ds| ds.len()), Some(1));

        let with_nbsp = r#"<DS><D lnt="527" pt="1" ebn="Nitra"/><D lnt="525" pt="1" ebn="Nitra&nbsp;AS"/></DS>"#;
        assert!(decode(with_nbsp).is_none());
    }

    #[test]
    fn ampersand_is_unescaped_last() {
        assert_eq!(unescape_entities("&amp;lt;"), "&lt;");
        assert_eq!(unescape_entities("&lt;a&gt; &quot;b&quot;"), "<a> \"b\"");
    }
}
