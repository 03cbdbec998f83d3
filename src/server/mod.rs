//! HTTP surface: router, handlers, shared state and error mapping

pub mod error;
pub mod handlers;
pub mod state;

pub use error::ApiError;
pub use state::AppState;

use axum::routing::get;
use axum::Router;
use log::info;
use tokio::net::TcpListener;

/// Build the router with every route mounted under `config.route_prefix`.
pub fn build_router(state: AppState) -> Router {
    let prefix = state.config.route_prefix.clone();
    let at = |path: &str| format!("{}{}", prefix, path);

    let mut router = Router::new()
        .route(&at("/"), get(handlers::text_image))
        .route(&at("/plain"), get(handlers::plain_text_image))
        .route(&at("/health"), get(handlers::health_check));

    // "/image-api" and "/image-api/" both reach the text route
    if !prefix.is_empty() {
        router = router.route(&prefix, get(handlers::text_image));
    }

    #[cfg(feature = "cdp")]
    {
        router = router
            .route(&at("/html"), get(handlers::html_image))
            .route(&at("/card"), get(handlers::card_image));
    }

    router.with_state(state)
}

/// Serve `router` until Ctrl-C.
pub async fn serve(listener: TcpListener, router: Router) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        info!("Listening on http://{}", addr);
    }
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        // No signal handler: run until the process is killed
        Err(_) => std::future::pending::<()>().await,
    }
}
