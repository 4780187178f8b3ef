//! Data models and schemas for the Flight Track API.
//!
//! Request/response models for every endpoint plus the records loaded from
//! the reference datasets.

pub mod api;
pub mod climate;
pub mod flight;
pub mod reference;

pub use api::*;
pub use climate::*;
pub use flight::*;
pub use reference::*;
