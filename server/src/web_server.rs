use std::future::Future;
use std::path::PathBuf;

use axum::{
    Router,
    extract::{State, WebSocketUpgrade},
    response::IntoResponse,
    routing::get,
};
use common::log;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
};

use crate::server_config::{GameConfig, WebConfig};
use crate::ws_handler::handle_websocket;

#[derive(Clone)]
pub struct WebServerState {
    pub game_config: GameConfig,
}

pub fn build_router(game_config: GameConfig, static_files_path: PathBuf) -> Router {
    let state = WebServerState { game_config };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/ws", get(ws_upgrade_handler))
        .nest_service("/ui", ServeDir::new(static_files_path))
        .layer(cors)
        .with_state(state)
}

pub async fn run_web_server(
    web_config: WebConfig,
    game_config: GameConfig,
    shutdown_signal: impl Future<Output = ()> + Send + 'static,
) -> Result<(), Box<dyn std::error::Error>> {
    let addr = web_config.socket_addr()?;
    let app = build_router(game_config, PathBuf::from(&web_config.static_files_path));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| format!("Failed to bind web server address {}: {}", addr, e))?;
    log!("Web server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    Ok(())
}

async fn ws_upgrade_handler(
    ws: WebSocketUpgrade,
    State(state): State<WebServerState>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_websocket(socket, state))
}
