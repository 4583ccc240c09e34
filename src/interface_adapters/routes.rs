use crate::interface_adapters::http::{
    client_script_handler, index_handler, index_html_handler, not_found,
};
use crate::interface_adapters::net::ws_handler;
use crate::interface_adapters::state::AppState;
use axum::{
    Router,
    routing::{any, get},
};
use std::sync::Arc;

pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", any(index_handler))
        .route("/index.html", any(index_html_handler))
        .route("/client.js", any(client_script_handler))
        .route("/ws", get(ws_handler))
        .fallback(not_found)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::tuning::ArenaTuning;
    use crate::use_cases::{ArenaHandle, ArenaSettings};
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use std::path::PathBuf;
    use std::time::Duration;
    use tower::ServiceExt;

    const INDEX_HTML: &str = "<!doctype html><title>arena</title>";
    const CLIENT_JS: &str = "console.log('arena');";

    fn static_dir(with_client_script: bool) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("stamp-arena-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).expect("expected temp dir");
        std::fs::write(dir.join("index.html"), INDEX_HTML).expect("expected index.html");
        if with_client_script {
            std::fs::write(dir.join("client.js"), CLIENT_JS).expect("expected client.js");
        }
        dir
    }

    fn build_test_app(static_dir: PathBuf) -> Router {
        let arena = ArenaHandle::spawn(&ArenaSettings {
            input_channel_capacity: 16,
            world_broadcast_capacity: 16,
            tick_interval: Duration::from_secs(3600),
            tuning: ArenaTuning::default(),
        });
        app(Arc::new(AppState { arena, static_dir }))
    }

    async fn get(app: Router, uri: &str) -> (StatusCode, Option<String>, String) {
        let request = Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .expect("expected request to build");

        let response = app.oneshot(request).await.expect("expected response");

        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("expected response body");
        let body = String::from_utf8(body.to_vec()).expect("expected utf-8 body");
        (status, content_type, body)
    }

    #[tokio::test]
    async fn when_root_is_requested_without_upgrade_then_returns_index_html() {
        let app = build_test_app(static_dir(true));

        let (status, content_type, body) = get(app, "/").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(content_type.as_deref(), Some("text/html"));
        assert_eq!(body, INDEX_HTML);
    }

    #[tokio::test]
    async fn when_index_html_is_requested_then_returns_same_page() {
        let app = build_test_app(static_dir(true));

        let (status, _, body) = get(app, "/index.html").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, INDEX_HTML);
    }

    #[tokio::test]
    async fn when_client_script_is_requested_then_returns_javascript() {
        let app = build_test_app(static_dir(true));

        let (status, content_type, body) = get(app, "/client.js").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(content_type.as_deref(), Some("text/javascript"));
        assert_eq!(body, CLIENT_JS);
    }

    #[tokio::test]
    async fn when_unknown_path_is_requested_then_returns_404() {
        let app = build_test_app(static_dir(true));

        let (status, _, body) = get(app, "/public/client.js").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, "Not Found");
    }

    #[tokio::test]
    async fn when_static_file_cannot_be_read_then_returns_500() {
        let app = build_test_app(static_dir(false));

        let (status, _, body) = get(app, "/client.js").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, "Error loading file.");
    }
}
