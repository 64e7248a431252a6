use std::sync::Arc;
use std::time::Duration;

use common::proto::{self, server_message};
use common::tictactoe::{GameError, GameSession, SessionCommand};
use common::{log, log_warn};
use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinHandle;

use crate::identifiers::ConnectionId;
use crate::server_config::GameConfig;

/// Owns one player's game and the pending delayed computer reply, if any.
#[derive(Clone)]
pub struct SessionController {
    connection_id: ConnectionId,
    session: Arc<Mutex<GameSession>>,
    pending_reply: Arc<std::sync::Mutex<Option<JoinHandle<()>>>>,
    computer_delay: Duration,
    outbound: mpsc::Sender<proto::ServerMessage>,
}

impl SessionController {
    pub fn new(
        connection_id: ConnectionId,
        config: &GameConfig,
        outbound: mpsc::Sender<proto::ServerMessage>,
    ) -> Self {
        Self {
            connection_id,
            session: Arc::new(Mutex::new(GameSession::new(config.default_mode, config.search))),
            pending_reply: Arc::new(std::sync::Mutex::new(None)),
            computer_delay: config.computer_delay(),
            outbound,
        }
    }

    pub async fn send_state(&self) {
        let state = {
            let session = self.session.lock().await;
            session.to_proto_state(session.is_computer_turn())
        };
        self.send(make_state_message(state)).await;
    }

    pub async fn handle(&self, command: SessionCommand) {
        match command {
            SessionCommand::PlaceMark(index) => self.place_mark(index).await,
            SessionCommand::Reset => {
                {
                    let mut session = self.session.lock().await;
                    self.cancel_pending_reply();
                    session.reset();
                }
                self.send_state().await;
            }
            SessionCommand::ResetScore => {
                self.session.lock().await.reset_scores();
                self.send_state().await;
            }
            SessionCommand::SetMode(mode) => {
                {
                    let mut session = self.session.lock().await;
                    self.cancel_pending_reply();
                    session.set_mode(mode);
                }
                log!("[{}] Mode set to {}", self.connection_id, mode);
                self.send_state().await;
            }
        }
    }

    pub fn shutdown(&self) {
        self.cancel_pending_reply();
    }

    async fn place_mark(&self, index: usize) {
        let result = {
            let mut session = self.session.lock().await;
            session.apply_move(index).map(|_| {
                let computer_turn = session.is_computer_turn();
                (
                    session.to_proto_state(computer_turn),
                    computer_turn.then(|| session.round()),
                )
            })
        };

        match result {
            Ok((state, computer_round)) => {
                self.send(make_state_message(state)).await;
                if let Some(round) = computer_round {
                    self.schedule_computer_reply(round);
                }
            }
            Err(e) => {
                log!("[{}] Rejected move: {}", self.connection_id, e);
                self.send(make_game_error(&e)).await;
            }
        }
    }

    fn schedule_computer_reply(&self, round: u64) {
        let controller = self.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(controller.computer_delay).await;
            controller.play_computer_reply(round).await;
        });

        if let Ok(mut pending) = self.pending_reply.lock()
            && let Some(previous) = pending.replace(handle)
        {
            previous.abort();
        }
    }

    async fn play_computer_reply(&self, round: u64) {
        let state = {
            let mut session = self.session.lock().await;
            if session.round() != round || !session.is_computer_turn() {
                return;
            }

            match session.play_computer_move() {
                Ok(report) => {
                    log!(
                        "[{}] Computer played cell {} (score {}, {} nodes, depth {})",
                        self.connection_id,
                        report.index,
                        report.score,
                        report.nodes,
                        report.max_depth
                    );
                }
                Err(e) => {
                    log_warn!("[{}] Computer move failed: {}", self.connection_id, e);
                    return;
                }
            }
            session.to_proto_state(false)
        };

        self.send(make_state_message(state)).await;
    }

    fn cancel_pending_reply(&self) {
        if let Ok(mut pending) = self.pending_reply.lock()
            && let Some(handle) = pending.take()
        {
            handle.abort();
        }
    }

    async fn send(&self, message: proto::ServerMessage) {
        if let Err(e) = self.outbound.send(message).await {
            log!("[{}] Failed to send message: {}", self.connection_id, e);
        }
    }
}

pub fn make_state_message(state: proto::GameStateUpdate) -> proto::ServerMessage {
    proto::ServerMessage {
        message: Some(server_message::Message::State(state)),
    }
}

pub fn make_error_response(code: proto::ErrorCode, message: String) -> proto::ServerMessage {
    proto::ServerMessage {
        message: Some(server_message::Message::Error(proto::ErrorResponse {
            code: code.into(),
            message,
        })),
    }
}

fn make_game_error(error: &GameError) -> proto::ServerMessage {
    make_error_response(error.to_proto_code(), error.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::tictactoe::{GameMode, SearchAlgorithm};

    fn make_controller(mode: GameMode) -> (SessionController, mpsc::Receiver<proto::ServerMessage>) {
        let (tx, rx) = mpsc::channel(32);
        let config = GameConfig {
            computer_delay_ms: 500,
            default_mode: mode,
            search: SearchAlgorithm::Minimax,
        };
        let controller = SessionController::new(ConnectionId::new("test".to_string()), &config, tx);
        (controller, rx)
    }

    async fn next_state(rx: &mut mpsc::Receiver<proto::ServerMessage>) -> proto::GameStateUpdate {
        match rx.recv().await.and_then(|m| m.message) {
            Some(server_message::Message::State(state)) => state,
            other => panic!("expected state update, got {:?}", other),
        }
    }

    fn drain(rx: &mut mpsc::Receiver<proto::ServerMessage>) -> Vec<proto::ServerMessage> {
        let mut messages = Vec::new();
        while let Ok(message) = rx.try_recv() {
            messages.push(message);
        }
        messages
    }

    #[tokio::test(start_paused = true)]
    async fn test_computer_replies_after_delay() {
        let (controller, mut rx) = make_controller(GameMode::Computer);

        controller.handle(SessionCommand::PlaceMark(0)).await;
        let thinking = next_state(&mut rx).await;
        assert!(thinking.computer_thinking);
        assert_eq!(thinking.current_mark, proto::PlayerMark::O as i32);

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(drain(&mut rx).is_empty());

        let reply = next_state(&mut rx).await;
        assert!(!reply.computer_thinking);
        assert_eq!(reply.cells[4], proto::CellState::O as i32);
        assert_eq!(reply.current_mark, proto::PlayerMark::X as i32);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_cancels_pending_reply() {
        let (controller, mut rx) = make_controller(GameMode::Computer);

        controller.handle(SessionCommand::PlaceMark(0)).await;
        assert!(next_state(&mut rx).await.computer_thinking);

        controller.handle(SessionCommand::Reset).await;
        let fresh = next_state(&mut rx).await;
        assert!(!fresh.computer_thinking);
        assert_eq!(fresh.round, 2);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(drain(&mut rx).is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_mode_change_cancels_pending_reply() {
        let (controller, mut rx) = make_controller(GameMode::Computer);

        controller.handle(SessionCommand::PlaceMark(4)).await;
        next_state(&mut rx).await;

        controller.handle(SessionCommand::SetMode(GameMode::Human)).await;
        let state = next_state(&mut rx).await;
        assert_eq!(state.mode, proto::GameMode::Human as i32);
        assert!(state.cells.iter().all(|&c| c == proto::CellState::Empty as i32));

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(drain(&mut rx).is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_human_mode_never_schedules_reply() {
        let (controller, mut rx) = make_controller(GameMode::Human);

        controller.handle(SessionCommand::PlaceMark(0)).await;
        let state = next_state(&mut rx).await;
        assert!(!state.computer_thinking);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(drain(&mut rx).is_empty());

        controller.handle(SessionCommand::PlaceMark(1)).await;
        let state = next_state(&mut rx).await;
        assert_eq!(state.cells[1], proto::CellState::O as i32);
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalid_move_reports_error() {
        let (controller, mut rx) = make_controller(GameMode::Human);

        controller.handle(SessionCommand::PlaceMark(0)).await;
        next_state(&mut rx).await;
        controller.handle(SessionCommand::PlaceMark(0)).await;

        match rx.recv().await.and_then(|m| m.message) {
            Some(server_message::Message::Error(error)) => {
                assert_eq!(error.code, proto::ErrorCode::InvalidMove as i32);
            }
            other => panic!("expected error, got {:?}", other),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_move_during_computer_turn_is_rejected() {
        let (controller, mut rx) = make_controller(GameMode::Computer);

        controller.handle(SessionCommand::PlaceMark(0)).await;
        next_state(&mut rx).await;
        controller.handle(SessionCommand::PlaceMark(1)).await;

        match rx.recv().await.and_then(|m| m.message) {
            Some(server_message::Message::Error(error)) => {
                assert_eq!(error.code, proto::ErrorCode::NotYourTurn as i32);
            }
            other => panic!("expected error, got {:?}", other),
        }

        let reply = next_state(&mut rx).await;
        assert_eq!(reply.cells[1], proto::CellState::Empty as i32);
        assert_eq!(reply.cells[4], proto::CellState::O as i32);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_score_keeps_board() {
        let (controller, mut rx) = make_controller(GameMode::Human);

        for index in [0, 3, 1, 4, 2] {
            controller.handle(SessionCommand::PlaceMark(index)).await;
            next_state(&mut rx).await;
        }

        controller.handle(SessionCommand::ResetScore).await;
        let state = next_state(&mut rx).await;
        assert_eq!(state.outcome, proto::OutcomeKind::Win as i32);
        assert_eq!(state.scores.map(|s| s.x_wins), Some(0));
    }
}
