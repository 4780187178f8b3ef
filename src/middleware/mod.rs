//! Custom middleware implementations for the API.
//!
//! This module contains middleware for CORS, request IDs and metrics
//! collection.

pub mod cors;
pub mod metrics;
pub mod request_id;

pub use cors::*;
pub use metrics::*;
pub use request_id::*;
