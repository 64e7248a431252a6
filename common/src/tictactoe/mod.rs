mod board;
mod game_state;
mod input;
mod lines;
mod score;
mod search;
mod types;

pub use board::Board;
pub use game_state::{COMPUTER_MARK, GameSession};
pub use input::{SessionCommand, command_from_key};
pub use lines::{LINES, Line};
pub use score::ScoreTally;
pub use search::{
    DRAW_SCORE, LOSS_SCORE, SearchAlgorithm, SearchReport, Searcher, WIN_SCORE, best_move,
    minimax_score,
};
pub use types::{CELL_COUNT, GameError, GameMode, GameOutcome, InvalidMoveReason, Mark};
