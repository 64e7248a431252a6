use serde::{Deserialize, Serialize};

use super::board::Board;
use super::types::{GameError, GameOutcome, Mark};

pub const WIN_SCORE: i32 = 1;
pub const LOSS_SCORE: i32 = -1;
pub const DRAW_SCORE: i32 = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SearchAlgorithm {
    #[default]
    Minimax,
    AlphaBeta,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchReport {
    pub index: usize,
    pub score: i32,
    pub nodes: u64,
    pub max_depth: usize,
}

pub fn best_move(board: &Board, side_to_move: Mark) -> Result<usize, GameError> {
    Searcher::new(SearchAlgorithm::Minimax)
        .search(board, side_to_move)
        .map(|report| report.index)
}

pub fn minimax_score(board: &Board, maximizer: Mark, to_move: Mark) -> i32 {
    let mut scratch = *board;
    Searcher::new(SearchAlgorithm::Minimax).minimax(&mut scratch, maximizer, to_move, 0)
}

fn terminal_score(board: &Board, maximizer: Mark) -> Option<i32> {
    match board.evaluate() {
        GameOutcome::Win(mark) if mark == maximizer => Some(WIN_SCORE),
        GameOutcome::Win(_) => Some(LOSS_SCORE),
        GameOutcome::Draw => Some(DRAW_SCORE),
        GameOutcome::InProgress => None,
    }
}

#[derive(Debug)]
pub struct Searcher {
    algorithm: SearchAlgorithm,
    nodes: u64,
    max_depth: usize,
}

impl Searcher {
    pub fn new(algorithm: SearchAlgorithm) -> Self {
        Self {
            algorithm,
            nodes: 0,
            max_depth: 0,
        }
    }

    /// Scores every empty cell in ascending order and keeps the first
    /// strictly greater score, so equal scores resolve to the lowest index.
    pub fn search(&mut self, board: &Board, side_to_move: Mark) -> Result<SearchReport, GameError> {
        self.nodes = 0;
        self.max_depth = 0;

        if board.evaluate().is_terminal() {
            return Err(GameError::NoMovesAvailable);
        }

        let mut scratch = *board;
        let mut best: Option<(usize, i32)> = None;

        for index in board.empty_cells() {
            scratch.place(index, side_to_move);
            let score = match self.algorithm {
                SearchAlgorithm::Minimax => {
                    self.minimax(&mut scratch, side_to_move, side_to_move.opponent(), 1)
                }
                SearchAlgorithm::AlphaBeta => {
                    let alpha = best.map_or(i32::MIN, |(_, score)| score);
                    self.alpha_beta(
                        &mut scratch,
                        side_to_move,
                        side_to_move.opponent(),
                        1,
                        alpha,
                        i32::MAX,
                    )
                }
            };
            scratch.clear(index);

            if best.is_none_or(|(_, best_score)| score > best_score) {
                best = Some((index, score));
            }

            if self.algorithm == SearchAlgorithm::AlphaBeta && score == WIN_SCORE {
                break;
            }
        }

        let (index, score) = best.ok_or(GameError::NoMovesAvailable)?;
        Ok(SearchReport {
            index,
            score,
            nodes: self.nodes,
            max_depth: self.max_depth,
        })
    }

    /// Exact minimax value of each empty cell for `side_to_move`.
    pub fn root_scores(&mut self, board: &Board, side_to_move: Mark) -> Vec<(usize, i32)> {
        let mut scratch = *board;
        board
            .empty_cells()
            .into_iter()
            .map(|index| {
                scratch.place(index, side_to_move);
                let score = self.minimax(&mut scratch, side_to_move, side_to_move.opponent(), 1);
                scratch.clear(index);
                (index, score)
            })
            .collect()
    }

    fn visit(&mut self, depth: usize) {
        self.nodes += 1;
        self.max_depth = self.max_depth.max(depth);
    }

    fn minimax(&mut self, board: &mut Board, maximizer: Mark, to_move: Mark, depth: usize) -> i32 {
        self.visit(depth);

        if let Some(score) = terminal_score(board, maximizer) {
            return score;
        }

        let maximizing = to_move == maximizer;
        let mut best = if maximizing { i32::MIN } else { i32::MAX };

        for index in board.empty_cells() {
            board.place(index, to_move);
            let score = self.minimax(board, maximizer, to_move.opponent(), depth + 1);
            board.clear(index);

            best = if maximizing {
                best.max(score)
            } else {
                best.min(score)
            };
        }

        best
    }

    fn alpha_beta(
        &mut self,
        board: &mut Board,
        maximizer: Mark,
        to_move: Mark,
        depth: usize,
        mut alpha: i32,
        mut beta: i32,
    ) -> i32 {
        self.visit(depth);

        if let Some(score) = terminal_score(board, maximizer) {
            return score;
        }

        let maximizing = to_move == maximizer;
        let mut best = if maximizing { i32::MIN } else { i32::MAX };

        for index in board.empty_cells() {
            board.place(index, to_move);
            let score = self.alpha_beta(board, maximizer, to_move.opponent(), depth + 1, alpha, beta);
            board.clear(index);

            if maximizing {
                best = best.max(score);
                alpha = alpha.max(best);
            } else {
                best = best.min(score);
                beta = beta.min(best);
            }

            if alpha >= beta {
                break;
            }
        }

        best
    }
}
