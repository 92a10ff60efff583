//! Route descriptions for the departure board.
//!
//! A route table is a JSON object mapping `"line|headsign"` to the list of
//! stops the bus calls at, for example
//! `{ "527|Nitra, AS": ["Zlaté Moravce", "Beladice", "Nitra, AS"] }`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::warn;

/// Separator between consecutive stops in a printed route.
const STOP_SEPARATOR: &str = " → ";

/// Errors loading a route table.
#[derive(Debug, thiserror::Error)]
pub enum RouteTableError {
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid route table {path:?}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Lookup from (line, headsign) to the stops along the route.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteNames {
    routes: HashMap<String, Vec<String>>,
}

impl RouteNames {
    /// Load a route table from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, RouteTableError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| RouteTableError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let routes = serde_json::from_str(&text).map_err(|source| RouteTableError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self { routes })
    }

    /// Load a route table, or an empty one if the file is missing or invalid.
    pub fn load_or_empty(path: impl AsRef<Path>) -> Self {
        Self::load(path).unwrap_or_else(|e| {
            warn!(error = %e, "route table unavailable, routes will not be shown");
            Self::default()
        })
    }

    /// Build a table from in-memory entries.
    pub fn from_entries<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, Vec<String>)>,
        K: Into<String>,
    {
        Self {
            routes: entries.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// The stops for `line` towards `headsign`, if known.
    pub fn stops(&self, line: &str, headsign: &str) -> Option<&[String]> {
        self.routes
            .get(&route_key(line, headsign))
            .map(Vec::as_slice)
            .filter(|stops| !stops.is_empty())
    }

    /// Printable route, or a hint naming the key to add to the table.
    pub fn route(&self, line: &str, headsign: &str) -> String {
        match self.stops(line, headsign) {
            Some(stops) => stops.join(STOP_SEPARATOR),
            None => format!(
                "(route unknown, add key \"{}\" to the routes file)",
                route_key(line, headsign)
            ),
        }
    }
}

/// Table key for a line and headsign.
pub fn route_key(line: &str, headsign: &str) -> String {
    format!("{line}|{headsign}").trim().to_string()
}
