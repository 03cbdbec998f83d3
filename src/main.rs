use anyhow::Context;
use clap::Parser;
use log::info;
use std::path::PathBuf;
use textshot::font::FontSource;
use textshot::server::{self, AppState};
use textshot::ServiceConfig;

/// Render text or HTML into PNG images over HTTP
#[derive(Debug, Parser)]
#[command(name = "textshot", version, about)]
struct Args {
    /// Interface to bind
    #[arg(long, env = "TEXTSHOT_HOST", default_value = "0.0.0.0")]
    host: String,

    /// Port to bind
    #[arg(long, env = "TEXTSHOT_PORT", default_value_t = 8000)]
    port: u16,

    /// Path prefix for every route (empty to serve from the root)
    #[arg(long, env = "TEXTSHOT_PREFIX", default_value = "/image-api")]
    prefix: String,

    /// Font file to try, in order; repeat to add candidates (defaults to the built-in list)
    #[arg(long = "font", env = "TEXTSHOT_FONTS", value_delimiter = ',')]
    fonts: Vec<PathBuf>,

    /// Largest accepted width or height
    #[arg(long, env = "TEXTSHOT_MAX_DIMENSION", default_value_t = 4096)]
    max_dimension: u32,

    /// Raster renders allowed to run at once (defaults to the CPU count)
    #[arg(long, env = "TEXTSHOT_RENDER_CONCURRENCY")]
    render_concurrency: Option<usize>,

    /// CSS font-family for the browser card template
    #[arg(long, env = "TEXTSHOT_CARD_FONT_FAMILY")]
    card_font_family: Option<String>,

    /// Chrome binary (auto-detected when omitted)
    #[cfg(feature = "cdp")]
    #[arg(long, env = "TEXTSHOT_CHROME_PATH")]
    chrome_path: Option<PathBuf>,

    /// Per-request browser timeout in milliseconds
    #[cfg(feature = "cdp")]
    #[arg(long, env = "TEXTSHOT_BROWSER_TIMEOUT_MS", default_value_t = 30000)]
    browser_timeout_ms: u64,

    /// Run Chrome without its sandbox (needed in most containers)
    #[cfg(feature = "cdp")]
    #[arg(long, env = "TEXTSHOT_NO_SANDBOX")]
    no_sandbox: bool,
}

impl Args {
    fn into_config(self) -> ServiceConfig {
        let mut config = ServiceConfig {
            host: self.host,
            port: self.port,
            route_prefix: self.prefix,
            max_dimension: self.max_dimension,
            ..Default::default()
        };
        if !self.fonts.is_empty() {
            config.font_candidates = self.fonts;
        }
        if let Some(n) = self.render_concurrency {
            config.render_concurrency = n;
        }
        if let Some(family) = self.card_font_family {
            config.card_font_family = family;
        }
        #[cfg(feature = "cdp")]
        {
            config.browser.chrome_path = self.chrome_path;
            config.browser.timeout_ms = self.browser_timeout_ms;
            config.browser.sandbox = !self.no_sandbox;
        }
        config
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Args::parse().into_config();
    config.validate().context("invalid configuration")?;

    let font = FontSource::new(config.font_candidates.clone())
        .resolve()
        .context("failed to load a font at startup")?;
    info!("Font: {}", font.origin());

    let addr = config.bind_address();
    let state = AppState::new(config, font);
    let router = server::build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    server::serve(listener, router).await?;

    info!("Server stopped");
    Ok(())
}
