use super::types::{CELL_COUNT, GameMode};
use crate::proto::{self, client_message};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionCommand {
    PlaceMark(usize),
    Reset,
    ResetScore,
    SetMode(GameMode),
}

/// Digits 1-9 select cells row by row, `r` restarts the round. Anything
/// else (including the theme key) is left to the presentation layer.
pub fn command_from_key(key: &str) -> Option<SessionCommand> {
    let mut chars = key.chars();
    let ch = chars.next()?;
    if chars.next().is_some() {
        return None;
    }

    match ch {
        '1'..='9' => ch
            .to_digit(10)
            .map(|digit| SessionCommand::PlaceMark(digit as usize - 1)),
        'r' | 'R' => Some(SessionCommand::Reset),
        _ => None,
    }
}

impl SessionCommand {
    pub fn from_proto(message: proto::ClientMessage) -> Result<Option<Self>, String> {
        let command = message
            .command
            .ok_or_else(|| "Client message has no command".to_string())?;

        match command {
            client_message::Command::PlaceMark(place) => {
                let index = place.index as usize;
                if index >= CELL_COUNT {
                    return Err(format!("Cell index {} is out of range", place.index));
                }
                Ok(Some(SessionCommand::PlaceMark(index)))
            }
            client_message::Command::KeyPress(key) => Ok(command_from_key(&key.key)),
            client_message::Command::ResetGame(_) => Ok(Some(SessionCommand::Reset)),
            client_message::Command::ResetScore(_) => Ok(Some(SessionCommand::ResetScore)),
            client_message::Command::SetMode(set_mode) => {
                GameMode::from_proto(set_mode.mode).map(|mode| Some(SessionCommand::SetMode(mode)))
            }
        }
    }
}
