use crate::rendering::{render_text_png, Screenshot, TextStyle};
use crate::server::error::ApiError;
use crate::server::state::AppState;
use crate::text::clean_or_default;
use crate::ServiceConfig;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::info;
use serde::Deserialize;
use serde_json::{json, Value};

#[cfg(feature = "cdp")]
use crate::cdp::{card_html, CardStyle};
#[cfg(feature = "cdp")]
use crate::text::DEFAULT_TEXT;

pub const DEFAULT_WIDTH: u32 = 800;
pub const DEFAULT_HEIGHT: u32 = 1000;
pub const DEFAULT_FONT_SIZE: u32 = 36;
pub const DEFAULT_PADDING: u32 = 20;

/// Query string shared by the text routes.
///
/// `font_size_q` and `padding_q` are accepted as aliases for older clients.
#[derive(Debug, Clone, Deserialize)]
pub struct TextQuery {
    #[serde(default)]
    pub text: String,
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    #[serde(default = "default_font_size", alias = "font_size_q")]
    pub font_size: u32,
    #[serde(default = "default_padding", alias = "padding_q")]
    pub padding: u32,
}

#[cfg(feature = "cdp")]
#[derive(Debug, Clone, Deserialize)]
pub struct HtmlQuery {
    #[serde(default)]
    pub html: String,
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
}

fn default_width() -> u32 {
    DEFAULT_WIDTH
}

fn default_height() -> u32 {
    DEFAULT_HEIGHT
}

fn default_font_size() -> u32 {
    DEFAULT_FONT_SIZE
}

fn default_padding() -> u32 {
    DEFAULT_PADDING
}

impl TextQuery {
    /// Reject sizes that are out of range or leave no room for text.
    pub fn validate(&self, config: &ServiceConfig) -> Result<(), ApiError> {
        check_dimensions(self.width, self.height, config.max_dimension)?;
        if self.font_size == 0 || self.font_size > config.max_dimension {
            return Err(ApiError::BadRequest(format!(
                "font_size must be between 1 and {}",
                config.max_dimension
            )));
        }
        let inset = self.padding.saturating_mul(2);
        if inset >= self.width || inset >= self.height {
            return Err(ApiError::BadRequest(format!(
                "padding {} leaves no room in a {}x{} image",
                self.padding, self.width, self.height
            )));
        }
        Ok(())
    }
}

fn check_dimensions(width: u32, height: u32, max: u32) -> Result<(), ApiError> {
    if width == 0 || height == 0 || width > max || height > max {
        return Err(ApiError::BadRequest(format!(
            "width and height must be between 1 and {}, got {}x{}",
            max, width, height
        )));
    }
    Ok(())
}

/// `GET /` - gradient background, supersampled text.
pub async fn text_image(
    State(state): State<AppState>,
    query: Result<Query<TextQuery>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(q) = query?;
    q.validate(&state.config)?;
    let style = TextStyle::full(q.width, q.height, q.font_size, q.padding);
    render_raster(&state, &q.text, style).await
}

/// `GET /plain` - solid black background drawn at output size.
pub async fn plain_text_image(
    State(state): State<AppState>,
    query: Result<Query<TextQuery>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(q) = query?;
    q.validate(&state.config)?;
    let style = TextStyle::minimal(q.width, q.height, q.font_size, q.padding);
    render_raster(&state, &q.text, style).await
}

async fn render_raster(state: &AppState, text: &str, style: TextStyle) -> Result<Response, ApiError> {
    let text = clean_or_default(text);
    info!(
        "Rendering {} chars at {}x{} (font {}px, padding {}px, {}x supersample)",
        text.len(),
        style.width,
        style.height,
        style.font_size,
        style.padding,
        style.supersample
    );

    let permit = state
        .render_permits
        .clone()
        .acquire_owned()
        .await
        .map_err(|_| ApiError::Internal("Render queue closed".into()))?;
    let font = state.font.clone();

    let shot = tokio::task::spawn_blocking(move || {
        let _permit = permit;
        render_text_png(&font, &text, &style)
    })
    .await??;

    png_response(shot)
}

/// `GET /html` - screenshot of caller supplied HTML.
#[cfg(feature = "cdp")]
pub async fn html_image(
    State(state): State<AppState>,
    query: Result<Query<HtmlQuery>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(q) = query?;
    check_dimensions(q.width, q.height, state.config.max_dimension)?;

    let html = if q.html.trim().is_empty() {
        format!("<h1>{}</h1>", DEFAULT_TEXT)
    } else {
        q.html
    };
    info!("Rendering {} bytes of HTML at {}x{}", html.len(), q.width, q.height);

    let shot = state.browser.screenshot_html(&html, q.width, q.height).await?;
    png_response(shot)
}

/// `GET /card` - text laid out by the browser in the card template.
#[cfg(feature = "cdp")]
pub async fn card_image(
    State(state): State<AppState>,
    query: Result<Query<TextQuery>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(q) = query?;
    q.validate(&state.config)?;

    let text = match q.text.trim() {
        "" => DEFAULT_TEXT,
        t => t,
    };
    let style = CardStyle {
        width: q.width,
        height: q.height,
        font_size: q.font_size,
        padding: q.padding,
        font_family: state.config.card_font_family.clone(),
    };
    info!("Rendering card with {} chars at {}x{}", text.len(), q.width, q.height);

    let shot = state
        .browser
        .screenshot_html(&card_html(text, &style), q.width, q.height)
        .await?;
    png_response(shot)
}

/// `GET /health`
pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "message": "Text to Image Generator API",
    }))
}

fn png_response(shot: Screenshot) -> Result<Response, ApiError> {
    let etag = HeaderValue::from_str(&format!("\"{}\"", shot.etag()))
        .map_err(|e| ApiError::Internal(format!("Invalid ETag: {}", e)))?;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, HeaderValue::from_static("image/png")),
            (header::CACHE_CONTROL, HeaderValue::from_static("public, max-age=3600")),
            (header::CONTENT_DISPOSITION, HeaderValue::from_static("inline")),
            (header::ETAG, etag),
        ],
        shot.png_data,
    )
        .into_response())
}
