use axum::response::Html;

const INDEX_HTML: &str = include_str!("../../templates/index.html");

/// Landing page, compiled into the binary
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}
