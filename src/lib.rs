//! Textshot
//!
//! Renders text or HTML into PNG images over HTTP.
//!
//! # Features
//!
//! - **Raster backend** (always on): draws text with a TrueType font, greedy
//!   pixel-width wrapping, a gradient background and 2x supersampling
//! - **CDP backend** (`cdp` feature): renders HTML through headless Chrome
//!   and captures a screenshot
//!
//! # Example
//!
//! ```no_run
//! use textshot::font::FontSource;
//! use textshot::rendering::{render_text_png, TextStyle};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let font = FontSource::default().resolve()?;
//! let style = TextStyle::full(800, 1000, 36, 20);
//! let shot = render_text_png(&font, "Hello, World!", &style)?;
//! std::fs::write("hello.png", &shot.png_data)?;
//! # Ok(())
//! # }
//! ```

use std::path::PathBuf;

pub mod error;
pub use error::{Error, Result};

pub mod font;
pub mod rendering;
pub mod server;
pub mod text;
pub mod wrap;

// Headless Chrome backend
#[cfg(feature = "cdp")]
pub mod cdp;

/// Configuration for the HTTP service
///
/// The defaults mirror the original deployment: port 8000 under the
/// `/image-api` prefix, with the bundled Manrope font preferred.
///
/// # Examples
///
/// ```
/// let cfg = textshot::ServiceConfig::default();
/// assert_eq!(cfg.route_prefix, "/image-api");
/// assert!(cfg.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Interface to bind
    pub host: String,
    /// Port to bind
    pub port: u16,
    /// Path prefix every route is mounted under (empty for the root)
    pub route_prefix: String,
    /// Font files tried in order at startup
    pub font_candidates: Vec<PathBuf>,
    /// Largest accepted width or height, in output pixels
    pub max_dimension: u32,
    /// Raster renders allowed to run at once
    pub render_concurrency: usize,
    /// CSS `font-family` used by the browser card template
    pub card_font_family: String,
    /// Headless Chrome settings
    #[cfg(feature = "cdp")]
    pub browser: cdp::BrowserConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            route_prefix: "/image-api".to_string(),
            font_candidates: font::DEFAULT_FONT_CANDIDATES.iter().map(PathBuf::from).collect(),
            max_dimension: 4096,
            render_concurrency: num_cpus::get(),
            card_font_family: "'Manrope', 'Helvetica Neue', Arial, sans-serif".to_string(),
            #[cfg(feature = "cdp")]
            browser: cdp::BrowserConfig::default(),
        }
    }
}

impl ServiceConfig {
    /// Check values that would otherwise fail at request time.
    pub fn validate(&self) -> Result<()> {
        if self.font_candidates.is_empty() {
            return Err(Error::ConfigError("at least one font candidate is required".into()));
        }
        if self.max_dimension == 0 {
            return Err(Error::ConfigError("max_dimension must be positive".into()));
        }
        if self.render_concurrency == 0 {
            return Err(Error::ConfigError("render_concurrency must be positive".into()));
        }
        if !self.route_prefix.is_empty()
            && (!self.route_prefix.starts_with('/') || self.route_prefix.ends_with('/'))
        {
            return Err(Error::ConfigError(format!(
                "route prefix {:?} must start with '/' and not end with one",
                self.route_prefix
            )));
        }
        Ok(())
    }

    /// `host:port` for the listener.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Viewport dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 800,
            height: 1000,
        }
    }
}
