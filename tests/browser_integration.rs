#![cfg(feature = "cdp")]

//! Headless Chrome tests. Run with `cargo test --features cdp -- --ignored`.

use std::sync::Arc;
use textshot::cdp::{card_html, BrowserConfig, BrowserManager, CardStyle};
use textshot::font::FontSource;
use textshot::server::{self, AppState};
use textshot::ServiceConfig;

fn ci_browser_config() -> BrowserConfig {
    BrowserConfig {
        sandbox: std::env::var("TEXTSHOT_NO_SANDBOX").is_err(),
        ..Default::default()
    }
}

#[tokio::test]
#[ignore] // Requires Chrome to be installed
async fn concurrent_first_use_launches_one_browser() {
    let manager = Arc::new(BrowserManager::new(ci_browser_config()));

    let tasks = (0..4).map(|i| {
        let manager = manager.clone();
        async move {
            manager
                .screenshot_html(&format!("<h1>page {}</h1>", i), 200, 100)
                .await
        }
    });
    let results = futures::future::join_all(tasks).await;

    for res in results {
        let shot = res.expect("screenshot");
        assert_eq!(&shot.png_data[..8], b"\x89PNG\r\n\x1a\n");
    }
    assert!(manager.is_launched().await);
}

#[tokio::test]
#[ignore] // Requires Chrome to be installed
async fn card_renders_at_requested_size() {
    let manager = BrowserManager::new(ci_browser_config());
    let style = CardStyle {
        width: 400,
        height: 300,
        font_size: 24,
        padding: 16,
        font_family: "sans-serif".into(),
    };

    let shot = manager
        .screenshot_html(&card_html("Hello from the card", &style), 400, 300)
        .await
        .expect("screenshot");
    let img = image::load_from_memory(&shot.png_data).expect("decode");
    assert_eq!((img.width(), img.height()), (400, 300));
}

#[tokio::test]
#[ignore] // Requires Chrome to be installed
async fn html_route_returns_png() {
    let Ok(font) = FontSource::default().resolve() else {
        println!("no font available; skipping");
        return;
    };
    let config = ServiceConfig {
        browser: ci_browser_config(),
        ..Default::default()
    };

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    let router = server::build_router(AppState::new(config, font));
    tokio::spawn(async move {
        let _ = server::serve(listener, router).await;
    });

    let url = format!(
        "http://{}/image-api/html?html=%3Ch1%3EHi%3C%2Fh1%3E&width=320&height=240",
        addr
    );
    let resp = reqwest::get(url).await.expect("request");
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.headers()["content-type"], "image/png");
}

#[tokio::test]
async fn browser_routes_validate_before_launching() {
    let Ok(font) = FontSource::default().resolve() else {
        println!("no font available; skipping");
        return;
    };
    let state = AppState::new(ServiceConfig::default(), font);
    let browser = state.browser.clone();

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        let _ = server::serve(listener, server::build_router(state)).await;
    });

    let resp = reqwest::get(format!("http://{}/image-api/card?width=0", addr))
        .await
        .expect("request");
    assert_eq!(resp.status(), 400);
    assert!(!browser.is_launched().await);
}
