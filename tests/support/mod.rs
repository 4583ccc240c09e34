// Shared helpers for spinning up a real arena server and talking to it over WebSocket.
#![allow(dead_code)]

use futures_util::{SinkExt, StreamExt};
use serde_json::Value;
use stamp_arena::ServerSettings;
use stamp_arena::domain::tuning::ArenaTuning;
use stamp_arena::use_cases::ArenaSettings;
use std::{net::SocketAddr, path::PathBuf, time::Duration};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};

// Upper bound for any single wait on the server.
pub const WAIT: Duration = Duration::from_secs(5);
// Long enough that the server only broadcasts in response to events.
pub const IDLE_TICK: Duration = Duration::from_secs(3600);

pub const INDEX_HTML: &str = "<!doctype html><title>arena</title>";
pub const CLIENT_JS: &str = "console.log('arena');";

pub struct TestServer {
    pub addr: SocketAddr,
}

impl TestServer {
    pub fn http_url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn ws_url(&self, path: &str) -> String {
        format!("ws://{}{}", self.addr, path)
    }

    pub async fn connect(&self) -> TestClient {
        self.connect_at("/").await
    }

    pub async fn connect_at(&self, path: &str) -> TestClient {
        let (stream, _response) = timeout(WAIT, connect_async(self.ws_url(path)))
            .await
            .expect("websocket connect timed out")
            .expect("websocket connect should succeed");
        TestClient { stream }
    }
}

// Start a server on an ephemeral port inside the current test runtime.
pub async fn spawn_server(tick_interval: Duration) -> TestServer {
    // Bind to an ephemeral port to avoid collisions with local services.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral test port");
    let addr = listener.local_addr().expect("get local addr");

    let settings = ServerSettings {
        arena: ArenaSettings {
            input_channel_capacity: 1024,
            world_broadcast_capacity: 128,
            tick_interval,
            tuning: ArenaTuning::default(),
        },
        static_dir: write_static_dir(),
    };

    // The server task lives until the test runtime shuts down.
    tokio::spawn(async move {
        stamp_arena::serve(listener, settings, std::future::pending())
            .await
            .expect("server failed");
    });

    TestServer { addr }
}

fn write_static_dir() -> PathBuf {
    let dir = std::env::temp_dir().join(format!("stamp-arena-it-{}", uuid::Uuid::new_v4()));
    std::fs::create_dir_all(&dir).expect("create static dir");
    std::fs::write(dir.join("index.html"), INDEX_HTML).expect("write index.html");
    std::fs::write(dir.join("client.js"), CLIENT_JS).expect("write client.js");
    dir
}

pub struct TestClient {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl TestClient {
    pub async fn send_text(&mut self, text: impl Into<String>) {
        let text: String = text.into();
        self.stream
            .send(Message::text(text))
            .await
            .expect("send should succeed");
    }

    pub async fn send_json(&mut self, value: Value) {
        self.send_text(value.to_string()).await;
    }

    pub async fn send_binary(&mut self, bytes: Vec<u8>) {
        self.stream
            .send(Message::binary(bytes))
            .await
            .expect("send should succeed");
    }

    // Next text message as JSON; control frames are skipped.
    pub async fn recv_json(&mut self) -> Value {
        loop {
            let msg = timeout(WAIT, self.stream.next())
                .await
                .expect("timed out waiting for a message")
                .expect("stream ended")
                .expect("websocket error");
            if msg.is_text() {
                let text = msg.to_text().expect("text frame");
                return serde_json::from_str(text).expect("server sends json");
            }
        }
    }

    pub async fn recv_assigned_id(&mut self) -> String {
        let msg = self.recv_json().await;
        assert_eq!(msg["type"], "assignId", "first message should be assignId");
        let id = msg["data"]["id"]
            .as_str()
            .expect("id should be a string")
            .to_string();
        assert!(!id.is_empty());
        id
    }

    pub async fn recv_game_state(&mut self) -> Value {
        let msg = self.recv_json().await;
        assert_eq!(msg["type"], "gameState");
        msg["data"].clone()
    }

    // Read game states until one matches.
    pub async fn recv_game_state_until(&mut self, pred: impl Fn(&Value) -> bool) -> Value {
        loop {
            let state = self.recv_game_state().await;
            if pred(&state) {
                return state;
            }
        }
    }

    pub async fn close(mut self) {
        let _ = self.stream.close(None).await;
    }

    // Drops the socket without a close frame.
    pub fn abort(self) {
        drop(self.stream);
    }
}

pub fn has_player(state: &Value, id: &str) -> bool {
    state["players"].get(id).is_some()
}

pub fn drawn_blocks(state: &Value) -> usize {
    state["drawnBlocks"].as_array().map_or(0, Vec::len)
}
