//! Chrome DevTools Protocol renderer for HTML images
//!
//! One Chrome process is shared by every request. It is launched lazily on
//! first use behind an async mutex, so concurrent first requests still start
//! exactly one browser. Each request renders in its own tab which is closed
//! before the request returns.

use crate::rendering::Screenshot;
use crate::text::escape_html;
use crate::{Error, Result, Viewport};
use base64::Engine as Base64Engine;
use headless_chrome::protocol::cdp::Page;
use headless_chrome::{Browser, LaunchOptions};
use log::{debug, info, warn};
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::Mutex;

/// Launch settings for the shared Chrome instance.
#[derive(Debug, Clone)]
pub struct BrowserConfig {
    /// Window size; also the largest image a tab can capture.
    pub window: Viewport,
    /// Per-request budget covering tab creation, navigation and capture.
    pub timeout_ms: u64,
    /// Run Chrome with its sandbox (disable only inside containers).
    pub sandbox: bool,
    /// Explicit Chrome binary; auto-detected when `None`.
    pub chrome_path: Option<PathBuf>,
    /// How long the driver keeps an idle connection open.
    pub idle_timeout_secs: u64,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            window: Viewport {
                width: 2048,
                height: 2048,
            },
            timeout_ms: 30000,
            sandbox: true,
            chrome_path: None,
            idle_timeout_secs: 24 * 60 * 60,
        }
    }
}

/// Owns the shared browser handle.
pub struct BrowserManager {
    config: BrowserConfig,
    browser: Mutex<Option<Browser>>,
}

/// Where a capture failed: a dead browser must be relaunched, a failed page
/// only affects its own request.
enum CaptureFailure {
    Browser(Error),
    Page(Error),
}

impl BrowserManager {
    pub fn new(config: BrowserConfig) -> Self {
        Self {
            config,
            browser: Mutex::new(None),
        }
    }

    pub fn config(&self) -> &BrowserConfig {
        &self.config
    }

    /// Whether Chrome has been launched (and not discarded since).
    pub async fn is_launched(&self) -> bool {
        self.browser.lock().await.is_some()
    }

    /// Return the shared browser, launching it if needed.
    ///
    /// A failed launch leaves the slot empty so the next call tries again.
    pub async fn browser(&self) -> Result<Browser> {
        let mut slot = self.browser.lock().await;
        if let Some(browser) = slot.as_ref() {
            return Ok(browser.clone());
        }

        info!("Launching headless Chrome");
        let config = self.config.clone();
        let browser = tokio::task::spawn_blocking(move || launch(&config))
            .await
            .map_err(|e| Error::Other(format!("Browser launch task failed: {}", e)))??;

        *slot = Some(browser.clone());
        Ok(browser)
    }

    /// Render `html` in a fresh tab and capture a `width x height` PNG.
    pub async fn screenshot_html(&self, html: &str, width: u32, height: u32) -> Result<Screenshot> {
        let window = self.config.window;
        if width == 0 || height == 0 || width > window.width || height > window.height {
            return Err(Error::InvalidDimensions(format!(
                "browser images must be between 1x1 and {}x{}, got {}x{}",
                window.width, window.height, width, height
            )));
        }

        let browser = self.browser().await?;
        let html = html.to_owned();
        let timeout_ms = self.config.timeout_ms;
        let budget = Duration::from_millis(timeout_ms);

        let task = tokio::task::spawn_blocking(move || capture(&browser, &html, width, height, budget));
        let joined = tokio::time::timeout(budget, task)
            .await
            .map_err(|_| Error::Timeout(timeout_ms))?
            .map_err(|e| Error::Other(format!("Capture task failed: {}", e)))?;

        match joined {
            Ok(png_data) => Ok(Screenshot::new(width, height, png_data)),
            Err(CaptureFailure::Page(err)) => Err(err),
            Err(CaptureFailure::Browser(err)) => {
                warn!("Discarding browser handle after failure: {}", err);
                self.browser.lock().await.take();
                Err(err)
            }
        }
    }
}

fn launch(config: &BrowserConfig) -> Result<Browser> {
    let launch_options = LaunchOptions::default_builder()
        .headless(true)
        .sandbox(config.sandbox)
        .window_size(Some((config.window.width, config.window.height)))
        .path(config.chrome_path.clone())
        .idle_browser_timeout(Duration::from_secs(config.idle_timeout_secs))
        .build()
        .map_err(|e| Error::BrowserError(format!("Failed to build launch options: {}", e)))?;

    Browser::new(launch_options)
        .map_err(|e| Error::BrowserError(format!("Failed to launch browser: {}", e)))
}

fn capture(
    browser: &Browser,
    html: &str,
    width: u32,
    height: u32,
    timeout: Duration,
) -> std::result::Result<Vec<u8>, CaptureFailure> {
    let tab = browser
        .new_tab()
        .map_err(|e| CaptureFailure::Browser(Error::BrowserError(format!("Failed to create tab: {}", e))))?;
    tab.set_default_timeout(timeout);

    let url = format!(
        "data:text/html;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(html)
    );
    let clip = Page::Viewport {
        x: 0.0,
        y: 0.0,
        width: width as f64,
        height: height as f64,
        scale: 1.0,
    };

    let result = tab
        .navigate_to(&url)
        .and_then(|t| t.wait_until_navigated())
        .map_err(|e| Error::BrowserError(format!("Navigation failed: {}", e)))
        .and_then(|t| {
            t.capture_screenshot(Page::CaptureScreenshotFormatOption::Png, None, Some(clip), true)
                .map_err(|e| Error::BrowserError(format!("Screenshot failed: {}", e)))
        });

    if let Err(e) = tab.close(true) {
        warn!("Failed to close tab: {}", e);
    }

    let png = result.map_err(CaptureFailure::Page)?;
    debug!("Captured {}x{} screenshot ({} bytes)", width, height, png.len());
    Ok(png)
}

/// Styling for the text card rendered by the browser.
#[derive(Debug, Clone)]
pub struct CardStyle {
    pub width: u32,
    pub height: u32,
    pub font_size: u32,
    pub padding: u32,
    pub font_family: String,
}

/// Build a self-contained HTML page that shows `text` as a card.
///
/// The browser does the wrapping (`pre-wrap` keeps explicit newlines).
pub fn card_html(text: &str, style: &CardStyle) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<style>
  html, body {{ margin: 0; padding: 0; }}
  body {{
    width: {width}px;
    height: {height}px;
    overflow: hidden;
    box-sizing: border-box;
    padding: {padding}px;
    background: linear-gradient(to bottom, rgb(30, 30, 30), rgb(0, 0, 0));
    color: #ffffff;
    font-family: {family};
    font-weight: 700;
    font-size: {font_size}px;
    line-height: 1.3;
    white-space: pre-wrap;
    overflow-wrap: anywhere;
    -webkit-font-smoothing: antialiased;
  }}
</style>
</head>
<body>{text}</body>
</html>"#,
        width = style.width,
        height = style.height,
        padding = style.padding,
        family = style.font_family,
        font_size = style.font_size,
        text = escape_html(text),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card_style() -> CardStyle {
        CardStyle {
            width: 800,
            height: 1000,
            font_size: 36,
            padding: 20,
            font_family: "'Manrope', sans-serif".to_string(),
        }
    }

    #[test]
    fn card_html_escapes_text_and_applies_style() {
        let html = card_html("<script>alert(1)</script>", &card_style());
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(!html.contains("<script>"));
        assert!(html.contains("width: 800px;"));
        assert!(html.contains("font-size: 36px;"));
        assert!(html.contains("padding: 20px;"));
        assert!(html.contains("font-family: 'Manrope', sans-serif;"));
    }

    #[tokio::test]
    async fn manager_starts_without_browser() {
        let manager = BrowserManager::new(BrowserConfig::default());
        assert!(!manager.is_launched().await);
    }

    #[tokio::test]
    async fn oversize_capture_is_rejected_before_launch() {
        let manager = BrowserManager::new(BrowserConfig::default());
        let err = manager.screenshot_html("<p>x</p>", 4096, 10).await.unwrap_err();
        assert!(err.is_client_error());
        assert!(!manager.is_launched().await);
    }

    #[tokio::test]
    #[ignore] // Requires Chrome to be installed
    async fn screenshot_html_produces_png() {
        let manager = BrowserManager::new(BrowserConfig::default());
        let shot = manager
            .screenshot_html("<body style='background:#000'><h1 style='color:#fff'>Hi</h1></body>", 320, 200)
            .await
            .expect("screenshot");
        assert_eq!(&shot.png_data[..8], b"\x89PNG\r\n\x1a\n");
        assert!(manager.is_launched().await);
    }
}
