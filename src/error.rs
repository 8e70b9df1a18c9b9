//! Error handling for the marcación kiosk

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Error types
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// HTTP client error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Camera/decoder acquisition error
    #[error("Camera error: {0}")]
    Camera(String),
}
