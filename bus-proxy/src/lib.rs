//! Bus stop departure proxy.
//!
//! Answers "what leaves this platform next" for one stop by querying a
//! dispatch company's TableData SOAP service. The real-time query is tried
//! first and the timetable query fills in when it has nothing.

pub mod board;
pub mod config;
pub mod domain;
pub mod fetch;
pub mod route_names;
pub mod service;
pub mod soap;
pub mod tabledata;
pub mod web;
pub mod xml;

#[cfg(test)]
mod test_support;
