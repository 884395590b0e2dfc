use axum::Router;
use axum::extract::{Path, State};
use axum::response::{Html, IntoResponse, Response};
use tower_http::services::ServeDir;

use crate::state::AppState;

/// `GET /report/{report_name}` — the static consumer UI document.
///
/// The UI's own content is delegated entirely; this returns a thin HTML
/// shell that connects to `/stream/{report_name}` when `use_node` is false,
/// or redirects to the external dev server when it is true.
pub async fn handler(State(state): State<AppState>, Path(report_name): Path<String>) -> Response {
    let config = state.config();

    if config.server.use_node {
        let url = format!(
            "http://{}:{}/report/{report_name}",
            config.server.dev_server_host, config.server.dev_server_port
        );
        return axum::response::Redirect::temporary(&url).into_response();
    }

    Html(format!(
        "<!doctype html><html><head><title>{report_name}</title></head>\
         <body><div id=\"root\" data-report=\"{report_name}\"></div>\
         <script src=\"/static/bundle.js\"></script></body></html>",
    ))
    .into_response()
}

/// Mounts the static asset bundle under `/static` when a root directory is
/// configured and the proxy isn't delegating to an external dev server.
pub fn static_router(state: &AppState) -> Option<Router<AppState>> {
    let config = state.config();
    if config.server.use_node {
        return None;
    }

    let root = config.server.static_root.as_ref()?;
    Some(Router::new().nest_service("/static", ServeDir::new(root)))
}
