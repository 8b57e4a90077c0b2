//! Error types for the LAMPY client.

/// Top-level error type for the client.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Device error: {0}")]
    Device(#[from] DeviceError),
}

/// Errors from the HTTP client shim.
///
/// Every way a request can fail shares this one enum so every flow needs
/// a single catch path. `Display` for `Status` is the bare message: that
/// is what the user sees on a retry prompt.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Non-2xx response. `message` is the server's `error` field when the
    /// body carried one, else a generic fallback.
    #[error("{message}")]
    Status {
        status: reqwest::StatusCode,
        message: String,
    },

    /// Connectivity-level failure (DNS, refused connection, timeout).
    #[error("Network error: {0}")]
    Transport(String),

    /// The response body could not be decoded as the expected JSON shape.
    #[error("Invalid response from server: {0}")]
    InvalidResponse(String),
}

impl ApiError {
    /// The HTTP status, when the server answered at all.
    pub fn status(&self) -> Option<reqwest::StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Session-store errors. These never escape the store: the store logs and
/// returns absent values instead (see `store::SessionStore`).
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Device-capability errors (location, camera, gallery).
#[derive(Debug, thiserror::Error)]
pub enum DeviceError {
    #[error("Permission denied for {capability}")]
    PermissionDenied { capability: String },

    #[error("Could not acquire a position fix: {0}")]
    PositionUnavailable(String),

    #[error("Reverse geocoding failed: {0}")]
    GeocodeFailed(String),

    #[error("Photo capture failed: {0}")]
    CaptureFailed(String),
}

/// Result type alias for the client.
pub type Result<T> = std::result::Result<T, Error>;
