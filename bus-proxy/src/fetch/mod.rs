//! Dual-source fetching of stop times.
//!
//! The dispatch service has two ways to answer "what leaves this platform
//! next": a real-time (online) query and a timetable (offline) query over a
//! datetime range. The online query is tried first; the offline one only
//! runs when the online one produced nothing usable.

mod config;
mod fetcher;
mod params;

#[cfg(test)]
mod fetcher_tests;

pub use config::{OfflineWindow, StopConfig};
pub use fetcher::{DualSourceFetcher, FetchResult, Source, SourceProbe};
pub use params::{OFFLINE_OPERATION, ONLINE_OPERATION, offline_params, offline_range, online_params};
