//! API response models for standard endpoints.

use paperclip::actix::Apiv2Schema;
use serde::{Deserialize, Serialize};

/// Response model for the root endpoint
#[derive(Clone, Serialize, Deserialize, Apiv2Schema)]
pub struct WelcomeResponse {
    pub message: String,
}

/// Response model for the health check endpoint
#[derive(Clone, Serialize, Deserialize, Apiv2Schema)]
pub struct HealthResponse {
    pub status: String,
    /// Which reference datasets were loaded at start-up
    pub datasets: DatasetStatus,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Apiv2Schema)]
pub struct DatasetStatus {
    pub flights: bool,
    pub advisories: bool,
    pub visas: bool,
    pub airports: usize,
}

/// Response model for the version information endpoint
#[derive(Clone, Serialize, Deserialize, Apiv2Schema)]
pub struct VersionResponse {
    pub version: String,
    pub commit: String,
    pub build_time: String,
}
