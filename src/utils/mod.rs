//! Utility functions and helper modules.
//!
//! Client IP and user agent extraction for request logging, and route
//! template extraction for metrics labels.

pub mod http;
pub mod route;

pub use http::*;
pub use route::*;
