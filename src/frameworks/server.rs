// Framework bootstrap for the arena server runtime.

use crate::domain::tuning::ArenaTuning;
use crate::frameworks::config;
use crate::interface_adapters::net::spawn_world_serializer;
use crate::interface_adapters::routes;
use crate::interface_adapters::state::AppState;
use crate::use_cases::{ArenaHandle, ArenaSettings};

use std::future::Future;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::{io::Result, sync::Arc};

fn init_runtime() {
    // Load .env locally; safe to ignore when not present.
    let _ = dotenvy::dotenv();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .json()
            .with_current_span(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .init();
    }

    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "panic");
    }));
}

/// Everything `serve` needs besides the listener.
#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub arena: ArenaSettings,
    pub static_dir: PathBuf,
}

impl ServerSettings {
    pub fn from_env() -> Self {
        Self {
            arena: ArenaSettings {
                input_channel_capacity: config::INPUT_CHANNEL_CAPACITY,
                world_broadcast_capacity: config::WORLD_BROADCAST_CAPACITY,
                tick_interval: config::TICK_INTERVAL,
                tuning: ArenaTuning::default(),
            },
            static_dir: config::static_dir(),
        }
    }
}

/// Serves on `listener` until `shutdown` resolves, then stops the world task.
pub async fn serve<F>(
    listener: tokio::net::TcpListener,
    settings: ServerSettings,
    shutdown: F,
) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let address = listener.local_addr()?;

    // The world lives for as long as the server does.
    let arena = ArenaHandle::spawn(&settings.arena);
    spawn_world_serializer(&arena);
    tracing::debug!(
        tick_interval_ms = settings.arena.tick_interval.as_secs_f64() * 1000.0,
        static_dir = %settings.static_dir.display(),
        "arena configured"
    );

    let state = Arc::new(AppState {
        arena: arena.clone(),
        static_dir: settings.static_dir,
    });
    let app = routes::app(state);

    tracing::info!(%address, "listening");

    // Serve app and report errors rather than panicking
    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .inspect_err(|e| {
            tracing::error!(error = %e, "server error");
        });

    arena.shutdown();
    served
}

pub async fn run(listener: tokio::net::TcpListener) -> Result<()> {
    serve(listener, ServerSettings::from_env(), shutdown_signal()).await
}

pub async fn run_with_config() -> Result<()> {
    init_runtime();

    // All interfaces, so other machines on the LAN can join.
    let address = SocketAddr::from(([0, 0, 0, 0], config::http_port()));

    // Bind TCP listener with error handling
    let listener = tokio::net::TcpListener::bind(address)
        .await
        .inspect_err(|e| {
            tracing::error!(%address, error = %e, "failed to bind");
        })?;

    run(listener).await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for ctrl-c");
        // Keep serving rather than exiting on a broken signal handler.
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown requested");
}
