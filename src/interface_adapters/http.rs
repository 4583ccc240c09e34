// Static client surface: two fixed files matched by exact path.

use crate::interface_adapters::net;
use crate::interface_adapters::state::AppState;

use axum::{
    extract::{
        State,
        ws::{WebSocketUpgrade, rejection::WebSocketUpgradeRejection},
    },
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use std::{path::Path, sync::Arc};
use tracing::error;

const NOT_FOUND_BODY: &str = "Not Found";
const READ_ERROR_BODY: &str = "Error loading file.";

#[derive(Debug, Clone, Copy)]
pub enum StaticFile {
    Index,
    ClientScript,
}

impl StaticFile {
    pub fn file_name(self) -> &'static str {
        match self {
            StaticFile::Index => "index.html",
            StaticFile::ClientScript => "client.js",
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            StaticFile::Index => "text/html",
            StaticFile::ClientScript => "text/javascript",
        }
    }
}

/// Reads the file on every request; a read failure only affects this requester.
pub async fn serve_static(static_dir: &Path, file: StaticFile) -> Response {
    let path = static_dir.join(file.file_name());
    match tokio::fs::read(&path).await {
        Ok(body) => ([(header::CONTENT_TYPE, file.content_type())], body).into_response(),
        Err(e) => {
            error!(path = %path.display(), error = %e, "failed to read static file");
            (StatusCode::INTERNAL_SERVER_ERROR, READ_ERROR_BODY).into_response()
        }
    }
}

/// `/` doubles as the WebSocket endpoint, since browsers connect to the bare host.
pub async fn index_handler(
    ws: Result<WebSocketUpgrade, WebSocketUpgradeRejection>,
    State(state): State<Arc<AppState>>,
) -> Response {
    match ws {
        Ok(ws) => net::upgrade(ws, &state),
        Err(_) => serve_static(&state.static_dir, StaticFile::Index).await,
    }
}

pub async fn index_html_handler(State(state): State<Arc<AppState>>) -> Response {
    serve_static(&state.static_dir, StaticFile::Index).await
}

pub async fn client_script_handler(State(state): State<Arc<AppState>>) -> Response {
    serve_static(&state.static_dir, StaticFile::ClientScript).await
}

pub async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, NOT_FOUND_BODY)
}
