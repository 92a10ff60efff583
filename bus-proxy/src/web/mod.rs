//! Web layer for the bus stop proxy.
//!
//! Exposes stop times as JSON for the school website and the board CLI.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router, parse_count, parse_platform};
pub use state::AppState;
