//! The canonical departure record.

use std::fmt;

use chrono::DateTime;
use chrono_tz::Tz;

/// Which upstream time field a record's timestamp came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlannedKind {
    Arrival,
    Departure,
}

impl PlannedKind {
    /// Wire name used in the JSON feed.
    pub fn as_str(&self) -> &'static str {
        match self {
            PlannedKind::Arrival => "arrival",
            PlannedKind::Departure => "departure",
        }
    }
}

impl fmt::Display for PlannedKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One upcoming departure at the stop.
///
/// Records are only produced by the row normalizer in
/// [`crate::tabledata`]; raw upstream rows never leave that module. They are
/// immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct DepartureRecord {
    line: String,
    headsign: String,
    platform: String,
    planned_text: String,
    planned_kind: PlannedKind,
    delay_seconds: Option<i64>,
    flags: Option<Vec<String>>,
    scheduled_at: DateTime<Tz>,
}

impl DepartureRecord {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        line: String,
        headsign: String,
        platform: String,
        planned_text: String,
        planned_kind: PlannedKind,
        delay_seconds: Option<i64>,
        flags: Option<Vec<String>>,
        scheduled_at: DateTime<Tz>,
    ) -> Self {
        Self {
            line,
            headsign,
            platform,
            planned_text,
            planned_kind,
            delay_seconds,
            flags,
            scheduled_at,
        }
    }

    /// Normalized public line number (never empty).
    pub fn line(&self) -> &str {
        &self.line
    }

    /// Destination text as shown on the vehicle.
    pub fn headsign(&self) -> &str {
        &self.headsign
    }

    pub fn platform(&self) -> &str {
        &self.platform
    }

    /// The planned time exactly as the service wrote it.
    pub fn planned_text(&self) -> &str {
        &self.planned_text
    }

    pub fn planned_kind(&self) -> PlannedKind {
        self.planned_kind
    }

    /// Delay in seconds; `None` means the service sent no delay at all,
    /// which is not the same as `Some(0)`.
    pub fn delay_seconds(&self) -> Option<i64> {
        self.delay_seconds
    }

    pub fn flags(&self) -> Option<&[String]> {
        self.flags.as_deref()
    }

    /// Planned instant in the stop's time zone.
    pub fn scheduled_at(&self) -> DateTime<Tz> {
        self.scheduled_at
    }
}
