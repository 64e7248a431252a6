use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};
use prost::Message as ProstMessage;
use tokio::sync::mpsc;

use common::log;
use common::proto::{ClientMessage, ErrorCode, ServerMessage};
use common::tictactoe::SessionCommand;

use crate::id_generator::generate_connection_id;
use crate::session_controller::{SessionController, make_error_response};
use crate::web_server::WebServerState;

pub async fn handle_websocket(socket: WebSocket, state: WebServerState) {
    let (mut ws_sender, mut ws_receiver) = socket.split();
    let (tx, mut rx) = mpsc::channel::<ServerMessage>(128);

    let send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            let buf = msg.encode_to_vec();
            if ws_sender.send(Message::Binary(buf.into())).await.is_err() {
                break;
            }
        }
    });

    let connection_id = generate_connection_id();
    log!("WebSocket client connected: {}", connection_id);

    let controller = SessionController::new(connection_id.clone(), &state.game_config, tx.clone());
    controller.send_state().await;

    while let Some(result) = ws_receiver.next().await {
        let data = match result {
            Ok(Message::Binary(data)) => data,
            Ok(Message::Close(_)) => break,
            Ok(_) => continue,
            Err(e) => {
                log!("[{}] WebSocket error: {}", connection_id, e);
                break;
            }
        };

        let client_message = match ClientMessage::decode(data.as_ref()) {
            Ok(m) => m,
            Err(e) => {
                log!("[{}] Failed to decode ClientMessage: {}", connection_id, e);
                send_invalid_message(&tx, format!("Failed to decode message: {}", e)).await;
                continue;
            }
        };

        match SessionCommand::from_proto(client_message) {
            Ok(Some(command)) => controller.handle(command).await,
            Ok(None) => {}
            Err(message) => {
                log!("[{}] Invalid command: {}", connection_id, message);
                send_invalid_message(&tx, message).await;
            }
        }
    }

    log!("WebSocket connection ended for client: {}", connection_id);
    controller.shutdown();
    send_task.abort();
}

async fn send_invalid_message(tx: &mpsc::Sender<ServerMessage>, message: String) {
    let response = make_error_response(ErrorCode::InvalidMessage, message);
    if let Err(e) = tx.send(response).await {
        log!("Failed to send error response: {}", e);
    }
}
