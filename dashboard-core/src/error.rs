use reqwest::StatusCode;
use thiserror::Error;

/// Failure of a single backend exchange.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Failed to build HTTP client")]
    Build(#[source] reqwest::Error),

    #[error("Invalid backend URL '{0}'")]
    InvalidUrl(String),

    #[error("Request to {url} failed")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Request to {url} failed with status {status}")]
    Status { url: String, status: StatusCode },

    #[error("Malformed response from {url}")]
    MalformedResponse {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ClientError {
    /// Transport failures and non-2xx statuses.
    pub fn is_network(&self) -> bool {
        matches!(self, ClientError::Transport { .. } | ClientError::Status { .. })
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum GeolocationError {
    #[error("Location permission denied")]
    PermissionDenied,
    #[error("Geolocation is not available")]
    Unavailable,
    #[error("Geolocation error: {0}")]
    Other(String),
}

/// Everything that can end up in an error panel.
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error(transparent)]
    Client(#[from] ClientError),

    #[error(transparent)]
    Geolocation(#[from] GeolocationError),

    #[error("Reverse geocoding returned no usable city")]
    EmptyResult,
}

impl DashboardError {
    /// Short text for the error panel.
    pub fn user_message(&self) -> &'static str {
        match self {
            DashboardError::Client(e) if e.is_network() => {
                "Could not reach the weather service. Please try again."
            }
            DashboardError::Client(_) => "The weather service sent an unexpected response.",
            DashboardError::Geolocation(GeolocationError::PermissionDenied) => {
                "Location access was denied."
            }
            DashboardError::Geolocation(_) => "Your location could not be determined.",
            DashboardError::EmptyResult => "No city was found for your location.",
        }
    }
}
