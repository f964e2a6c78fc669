//! HTTP inbound adapter exposing the portal's REST endpoints.

pub mod accounts;
pub mod error;
pub mod health;
pub mod schemas;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;

pub use crate::domain::ApiResult;
