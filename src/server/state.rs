use crate::font::LoadedFont;
use crate::ServiceConfig;
use std::sync::Arc;
use tokio::sync::Semaphore;

#[cfg(feature = "cdp")]
use crate::cdp::BrowserManager;

/// Shared application state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServiceConfig>,

    /// Resolved once at startup
    pub font: LoadedFont,

    /// Bounds concurrent CPU-bound raster renders
    pub render_permits: Arc<Semaphore>,

    /// Shared headless Chrome, launched on first use
    #[cfg(feature = "cdp")]
    pub browser: Arc<BrowserManager>,
}

impl AppState {
    pub fn new(config: ServiceConfig, font: LoadedFont) -> Self {
        let render_permits = Arc::new(Semaphore::new(config.render_concurrency.max(1)));

        Self {
            #[cfg(feature = "cdp")]
            browser: Arc::new(BrowserManager::new(config.browser.clone())),
            font,
            render_permits,
            config: Arc::new(config),
        }
    }
}
