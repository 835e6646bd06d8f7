//! cw-api: ChatWork REST API client
//!
//! Implements `cw_core::RemoteAccess` over HTTP.

pub mod api;
pub mod error;

pub use api::ChatworkClient;
pub use error::{ChatworkError, Result};
