/// Failure of a weather lookup.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Weather service unavailable")]
    Unavailable,
    #[error("Weather request rejected: {0}")]
    Rejected(String),
    #[error("Weather request timed out")]
    Timeout,
}

/// Failure to resolve the device's physical location.
#[derive(Debug, thiserror::Error)]
pub enum LocationError {
    #[error("Location service unavailable")]
    Unavailable,
    #[error("Location permission denied")]
    PermissionDenied,
    #[error("Location request timed out")]
    Timeout,
}

/// Failure reading or writing persisted preferences.
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Stored value could not be encoded or decoded: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Persistence writer has shut down")]
    WriterClosed,
}

impl FetchError {
    /// Message shown to the user on the dashboard.
    pub fn user_message(&self) -> &'static str {
        match self {
            FetchError::Timeout => "Request timed out",
            FetchError::Unavailable | FetchError::Rejected(_) => "Failed to fetch weather data",
        }
    }
}

impl LocationError {
    pub fn user_message(&self) -> &'static str {
        match self {
            LocationError::Timeout => "Request timed out",
            LocationError::PermissionDenied => "Location permission denied",
            LocationError::Unavailable => "Unable to retrieve your location",
        }
    }
}
