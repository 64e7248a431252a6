use std::fmt;

use serde::{Deserialize, Serialize};

use crate::proto;

pub const CELL_COUNT: usize = 9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mark {
    X,
    O,
}

impl Mark {
    pub fn opponent(self) -> Mark {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }

    pub fn to_proto(self) -> proto::PlayerMark {
        match self {
            Mark::X => proto::PlayerMark::X,
            Mark::O => proto::PlayerMark::O,
        }
    }
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mark::X => write!(f, "X"),
            Mark::O => write!(f, "O"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOutcome {
    InProgress,
    Win(Mark),
    Draw,
}

impl GameOutcome {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, GameOutcome::InProgress)
    }

    pub fn winner(&self) -> Option<Mark> {
        match self {
            GameOutcome::Win(mark) => Some(*mark),
            _ => None,
        }
    }

    pub fn to_proto(&self) -> proto::OutcomeKind {
        match self {
            GameOutcome::InProgress => proto::OutcomeKind::InProgress,
            GameOutcome::Win(_) => proto::OutcomeKind::Win,
            GameOutcome::Draw => proto::OutcomeKind::Draw,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameMode {
    Human,
    Computer,
}

impl GameMode {
    pub fn to_proto(self) -> proto::GameMode {
        match self {
            GameMode::Human => proto::GameMode::Human,
            GameMode::Computer => proto::GameMode::Computer,
        }
    }

    pub fn from_proto(mode: i32) -> Result<Self, String> {
        match proto::GameMode::try_from(mode) {
            Ok(proto::GameMode::Human) => Ok(GameMode::Human),
            Ok(proto::GameMode::Computer) => Ok(GameMode::Computer),
            Ok(proto::GameMode::Unspecified) => Err("Game mode not specified".to_string()),
            Err(_) => Err(format!("Unknown game mode: {}", mode)),
        }
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameMode::Human => write!(f, "human"),
            GameMode::Computer => write!(f, "computer"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    InvalidMove { index: usize, reason: InvalidMoveReason },
    NotYourTurn { mark: Mark },
    NoMovesAvailable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidMoveReason {
    OutOfRange,
    Occupied(Mark),
    GameOver,
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameError::InvalidMove { index, reason } => match reason {
                InvalidMoveReason::OutOfRange => {
                    write!(f, "Cell {} is out of range", index)
                }
                InvalidMoveReason::Occupied(mark) => {
                    write!(f, "Cell {} is already marked by {}", index, mark)
                }
                InvalidMoveReason::GameOver => {
                    write!(f, "Cannot play cell {}: game is already over", index)
                }
            },
            GameError::NotYourTurn { mark } => write!(f, "It is not {}'s turn", mark),
            GameError::NoMovesAvailable => write!(f, "No moves available on a finished board"),
        }
    }
}

impl std::error::Error for GameError {}

impl GameError {
    pub fn to_proto_code(&self) -> proto::ErrorCode {
        match self {
            GameError::InvalidMove { .. } => proto::ErrorCode::InvalidMove,
            GameError::NotYourTurn { .. } => proto::ErrorCode::NotYourTurn,
            GameError::NoMovesAvailable => proto::ErrorCode::NoMovesAvailable,
        }
    }
}
