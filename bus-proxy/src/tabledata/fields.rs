//! Upstream field names and their precedence.
//!
//! The online and offline operations (and different deployments of the
//! service) disagree on field names. Each logical field is an ordered list
//! of candidate names; the first one present with a non-blank value wins.

use super::types::RawRow;

/// Ordered candidate names for one logical field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldCandidates(pub &'static [&'static str]);

impl FieldCandidates {
    /// First candidate present in `row`, with the name that matched.
    pub fn first<'r>(&self, row: &'r RawRow) -> Option<(&'static str, &'r str)> {
        self.0
            .iter()
            .find_map(|name| row.get(name).map(|value| (*name, value)))
    }

    /// Value of the first candidate present in `row`.
    pub fn value<'r>(&self, row: &'r RawRow) -> Option<&'r str> {
        self.first(row).map(|(_, value)| value)
    }

    pub fn names(&self) -> &'static [&'static str] {
        self.0
    }
}

/// Line number as text (e.g. `"010527"`).
pub const LINE_TEXT: FieldCandidates = FieldCandidates(&["lnt"]);

/// Line number as the numeric id (e.g. `10527`).
pub const LINE_NUMERIC: FieldCandidates = FieldCandidates(&["ln"]);

/// Platform: offline style first, then online style.
pub const PLATFORM: FieldCandidates = FieldCandidates(&["pt", "p"]);

/// Arrival time field name.
pub const ARRIVAL_TIME: &str = "ta";

/// Departure time field name.
pub const DEPARTURE_TIME: &str = "td";

/// Planned time: arrival preferred over departure.
pub const PLANNED_TIME: FieldCandidates = FieldCandidates(&[ARRIVAL_TIME, DEPARTURE_TIME]);

/// Headsign: end-of-line display name, then destination names.
pub const HEADSIGN: FieldCandidates = FieldCandidates(&["ebn", "en", "eb"]);

/// Delay in seconds.
pub const DELAY: FieldCandidates = FieldCandidates(&["de", "del"]);

/// Comma-separated status flags.
pub const FLAGS: FieldCandidates = FieldCandidates(&["fl"]);
