//! HTTP inbound adapter exposing the `/api/v1` REST surface and health probes.

pub mod elements;
pub mod error;
pub mod health;
pub mod observations;
pub mod schemas;
pub mod session;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod uploads;
pub mod validation;

pub use error::ApiResult;
