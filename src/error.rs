//! Error types for the rendering service

use thiserror::Error;

/// Result type alias for rendering operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while producing an image
#[derive(Error, Debug)]
pub enum Error {
    /// None of the configured font candidates could be loaded
    #[error("No usable font found (tried: {})", .0.join(", "))]
    FontNotFound(Vec<String>),

    /// A font file exists but could not be parsed
    #[error("Invalid font data in {0}")]
    InvalidFont(String),

    /// Caller supplied dimensions that cannot produce an image
    #[error("Invalid dimensions: {0}")]
    InvalidDimensions(String),

    /// Failed to render content
    #[error("Rendering failed: {0}")]
    RenderError(String),

    /// Failed to encode the raster as PNG
    #[error("PNG encoding failed: {0}")]
    EncodeError(String),

    /// Operation timed out
    #[error("Operation timed out after {0}ms")]
    Timeout(u64),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// Headless browser failure (launch, navigation, screenshot)
    #[cfg(feature = "cdp")]
    #[error("Browser error: {0}")]
    BrowserError(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Whether the error was caused by caller input rather than the service.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Error::InvalidDimensions(_))
    }
}

impl From<image::ImageError> for Error {
    fn from(err: image::ImageError) -> Self {
        Error::EncodeError(err.to_string())
    }
}

#[cfg(feature = "cdp")]
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::BrowserError(err.to_string())
    }
}
