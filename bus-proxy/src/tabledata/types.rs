//! Raw dataset shapes as returned by the TableData service.
//!
//! A result payload is a `<DS>` element holding `<D>` rows. Field names
//! differ between the online and offline operations, so rows are kept as
//! plain name → text maps until the normalizer picks them apart.

use std::collections::{HashMap, HashSet};

use crate::xml::Element;

/// Name of the dataset container element.
pub const DATASET_ELEMENT: &str = "DS";

/// Name of a row element inside the dataset.
pub const ROW_ELEMENT: &str = "D";

/// One upstream row: field name → text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRow {
    fields: HashMap<String, String>,
}

impl RawRow {
    /// Collect a row's fields from a `<D>` element.
    ///
    /// Fields arrive either as attributes or as child elements depending on
    /// the deployment. A child element wins over an attribute of the same
    /// name, and the first child of a given name wins over later ones.
    pub fn from_element(element: &Element) -> Self {
        let mut fields: HashMap<String, String> = element.attributes.iter().cloned().collect();

        let mut seen = HashSet::new();
        for child in &element.children {
            if seen.insert(child.name.as_str()) {
                fields.insert(child.name.clone(), child.text.clone());
            }
        }

        Self { fields }
    }

    /// Value of `name`, trimmed; `None` when absent or blank.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RawRow {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

/// A decoded dataset: its rows in upstream order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dataset {
    pub rows: Vec<RawRow>,
}

impl Dataset {
    /// Build a dataset from a `<DS>` element; `None` for any other element.
    pub fn from_element(element: &Element) -> Option<Self> {
        if element.name != DATASET_ELEMENT {
            return None;
        }
        let rows = element
            .children_named(ROW_ELEMENT)
            .map(RawRow::from_element)
            .collect();
        Some(Self { rows })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fields_from_attributes_and_children() {
        let element = Element::parse(
            r#"<D lnt="attr" pt="1"><lnt>child</lnt><ebn> Nitra </ebn><ebn>second</ebn><fl></fl></D>"#,
        )
        .unwrap();
        let row = RawRow::from_element(&element);

        assert_eq!(row.get("lnt"), Some("child"));
        assert_eq!(row.get("pt"), Some("1"));
        assert_eq!(row.get("ebn"), Some("Nitra"));
        assert_eq!(row.get("fl"), None);
        assert_eq!(row.get("missing"), None);
        assert_eq!(row.len(), 4);
    }

    #[test]
    fn dataset_requires_ds_element() {
        let ds = Element::parse("<DS><D a=\"1\"/><X/><D a=\"2\"/></DS>").unwrap();
        let dataset = Dataset::from_element(&ds).unwrap();
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.rows[1].get("a"), Some("2"));

        let other = Element::parse("<NewDataSet/>").unwrap();
        assert!(Dataset::from_element(&other).is_none());
    }

    #[test]
    fn row_from_pairs() {
        let row: RawRow = [("ta", "3.9.15 0:17")].into_iter().collect();
        assert_eq!(row.get("ta"), Some("3.9.15 0:17"));
        assert!(!row.is_empty());
    }
}
