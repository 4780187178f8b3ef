//! HTTP request handlers for API endpoints.
//!
//! Handlers parse and validate input, call into the services and map
//! failures to HTTP statuses through [`crate::error::ApiError`].

pub mod flights;
pub mod health;
pub mod metrics;
pub mod openapi;
pub mod reference;
pub mod root;
pub mod version;
pub mod weather;

pub use flights::*;
pub use health::*;
pub use metrics::*;
pub use openapi::*;
pub use reference::*;
pub use root::*;
pub use version::*;
pub use weather::*;
