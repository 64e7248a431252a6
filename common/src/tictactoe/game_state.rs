use super::board::Board;
use super::lines::Line;
use super::score::ScoreTally;
use super::search::{SearchAlgorithm, SearchReport, Searcher};
use super::types::{GameError, GameMode, GameOutcome, InvalidMoveReason, Mark};
use crate::proto;

/// The computer always plays O in computer mode.
pub const COMPUTER_MARK: Mark = Mark::O;

#[derive(Debug, Clone)]
pub struct GameSession {
    board: Board,
    current_mark: Mark,
    mode: GameMode,
    outcome: GameOutcome,
    winning_line: Option<Line>,
    scores: ScoreTally,
    round: u64,
    search_algorithm: SearchAlgorithm,
}

impl GameSession {
    pub fn new(mode: GameMode, search_algorithm: SearchAlgorithm) -> Self {
        Self {
            board: Board::new(),
            current_mark: Mark::X,
            mode,
            outcome: GameOutcome::InProgress,
            winning_line: None,
            scores: ScoreTally::default(),
            round: 1,
            search_algorithm,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn current_mark(&self) -> Mark {
        self.current_mark
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn outcome(&self) -> GameOutcome {
        self.outcome
    }

    pub fn winning_line(&self) -> Option<Line> {
        self.winning_line
    }

    pub fn scores(&self) -> ScoreTally {
        self.scores
    }

    /// Increments on every reset, so a delayed computer reply can tell
    /// whether the game it was scheduled for still exists.
    pub fn round(&self) -> u64 {
        self.round
    }

    pub fn is_computer_turn(&self) -> bool {
        self.mode == GameMode::Computer
            && !self.outcome.is_terminal()
            && self.current_mark == COMPUTER_MARK
    }

    pub fn apply_move(&mut self, index: usize) -> Result<GameOutcome, GameError> {
        if self.is_computer_turn() {
            return Err(GameError::NotYourTurn {
                mark: self.current_mark.opponent(),
            });
        }
        self.place_mark(index)
    }

    pub fn play_computer_move(&mut self) -> Result<SearchReport, GameError> {
        if self.outcome.is_terminal() {
            return Err(GameError::NoMovesAvailable);
        }
        if !self.is_computer_turn() {
            return Err(GameError::NotYourTurn { mark: COMPUTER_MARK });
        }

        let report = Searcher::new(self.search_algorithm).search(&self.board, self.current_mark)?;
        self.place_mark(report.index)?;
        Ok(report)
    }

    pub fn reset(&mut self) {
        self.board = Board::new();
        self.current_mark = Mark::X;
        self.outcome = GameOutcome::InProgress;
        self.winning_line = None;
        self.round += 1;
    }

    pub fn set_mode(&mut self, mode: GameMode) {
        self.mode = mode;
        self.reset();
    }

    pub fn reset_scores(&mut self) {
        self.scores.reset();
    }

    fn place_mark(&mut self, index: usize) -> Result<GameOutcome, GameError> {
        if self.outcome.is_terminal() {
            return Err(GameError::InvalidMove {
                index,
                reason: InvalidMoveReason::GameOver,
            });
        }

        self.board = self.board.apply_move(index, self.current_mark)?;
        self.check_game_over();

        if self.outcome.is_terminal() {
            self.scores.record(self.outcome);
        } else {
            self.current_mark = self.current_mark.opponent();
        }

        Ok(self.outcome)
    }

    fn check_game_over(&mut self) {
        self.outcome = self.board.evaluate();
        self.winning_line = self.board.winning_line().map(|(_, line)| line);
    }

    pub fn to_proto_state(&self, computer_thinking: bool) -> proto::GameStateUpdate {
        proto::GameStateUpdate {
            cells: self.board.to_proto_cells(),
            current_mark: self.current_mark.to_proto() as i32,
            mode: self.mode.to_proto() as i32,
            outcome: self.outcome.to_proto() as i32,
            winner: self
                .outcome
                .winner()
                .map_or(proto::PlayerMark::Unspecified, Mark::to_proto) as i32,
            winning_line: self
                .winning_line
                .map(|line| line.iter().map(|&i| i as u32).collect())
                .unwrap_or_default(),
            scores: Some(self.scores.to_proto()),
            computer_thinking,
            round: self.round,
        }
    }
}
