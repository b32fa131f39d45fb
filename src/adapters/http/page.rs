//! Reference browser client served at `/`.
//!
//! The page opens a WebSocket to `/ws` and speaks the same plain-text
//! protocol as any other client.

use axum::response::Html;

const INDEX_HTML: &str = include_str!("../../../static/index.html");

/// Route: `GET /`
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}
