//! Static file serving.
//!
//! Serves files from the site directory with SPA fallback: a missing path
//! without an extension is a client route and gets `index.html`, a missing
//! path with an extension is a 404.

use std::path::Path;
use std::sync::Arc;

use axum::Router;
use axum::extract::{Request, State};
use axum::handler::Handler;
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use percent_encoding::percent_decode_str;
use tower::ServiceExt;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::set_header::SetResponseHeaderLayer;

use crate::state::AppState;

const INDEX_FILE: &str = "index.html";

/// Create router for static file serving with SPA fallback.
pub(crate) fn static_router(state: &Arc<AppState>) -> Router {
    let serve_dir = ServeDir::new(&state.site_dir)
        .append_index_html_on_directories(false)
        .fallback(spa_fallback.with_state(Arc::clone(state)));

    Router::new()
        .fallback_service(serve_dir)
        .layer(utf8_text_layer())
}

/// Serve `index.html` for client routes, 404 for everything else.
async fn spa_fallback(State(state): State<Arc<AppState>>, req: Request) -> Response {
    if !is_client_route(req.uri().path()) {
        tracing::debug!(path = req.uri().path(), "Not found");
        return StatusCode::NOT_FOUND.into_response();
    }

    let index = ServeFile::new(state.site_dir.join(INDEX_FILE));
    match index.oneshot(req).await {
        Ok(response) => response.into_response(),
        Err(never) => match never {},
    }
}

/// True for extension-less paths that stay inside the site directory.
fn is_client_route(path: &str) -> bool {
    let Ok(decoded) = percent_decode_str(path).decode_utf8() else {
        return false;
    };
    if decoded.split('/').any(|segment| segment == "..") {
        return false;
    }
    Path::new(decoded.as_ref()).extension().is_none()
}

/// Add `charset=utf-8` to markdown and HTML responses.
fn utf8_text_layer() -> SetResponseHeaderLayer<fn(&Response) -> Option<HeaderValue>> {
    SetResponseHeaderLayer::overriding(
        header::CONTENT_TYPE,
        utf8_content_type as fn(&Response) -> Option<HeaderValue>,
    )
}

fn utf8_content_type(response: &Response) -> Option<HeaderValue> {
    match response.headers().get(header::CONTENT_TYPE)?.to_str().ok()? {
        "text/markdown" => Some(HeaderValue::from_static("text/markdown; charset=utf-8")),
        "text/html" => Some(HeaderValue::from_static("text/html; charset=utf-8")),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_is_client_route() {
        assert!(is_client_route("/"));
        assert!(is_client_route("/docs/quickstart"));
        assert!(is_client_route("/docs/x/"));
        assert!(!is_client_route("/pages/quickstart.md"));
        assert!(!is_client_route("/favicon.ico"));
    }

    #[test]
    fn test_is_client_route_rejects_escapes() {
        assert!(!is_client_route("/pages/../../secret"));
        assert!(!is_client_route("/pages/%2E%2E/secret"));
        assert!(!is_client_route("/%FF"));
    }

    #[test]
    fn test_utf8_content_type() {
        let with_type = |value: &'static str| {
            let mut response = StatusCode::OK.into_response();
            response
                .headers_mut()
                .insert(header::CONTENT_TYPE, HeaderValue::from_static(value));
            utf8_content_type(&response)
        };

        assert_eq!(
            with_type("text/markdown"),
            Some(HeaderValue::from_static("text/markdown; charset=utf-8"))
        );
        assert_eq!(
            with_type("text/html"),
            Some(HeaderValue::from_static("text/html; charset=utf-8"))
        );
        assert_eq!(with_type("text/css"), None);
        assert_eq!(utf8_content_type(&StatusCode::NOT_FOUND.into_response()), None);
    }
}
