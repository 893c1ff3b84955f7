//! HTTP inbound adapter: login, user listing screens and probes.

pub mod admin;
pub mod cache_control;
pub mod download;
pub mod error;
pub mod health;
pub mod listing;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;

pub use error::ApiResult;
