use std::fmt;

use super::lines::{LINES, Line};
use super::types::{CELL_COUNT, GameError, GameOutcome, InvalidMoveReason, Mark};
use crate::proto;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Board {
    cells: [Option<Mark>; CELL_COUNT],
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_cells(cells: [Option<Mark>; CELL_COUNT]) -> Self {
        Self { cells }
    }

    /// Builds a board from a 9-character pattern of `X`, `O` and `_`.
    #[cfg(test)]
    pub fn from_pattern(pattern: &str) -> Self {
        let mut cells = [None; CELL_COUNT];
        for (index, ch) in pattern.chars().filter(|c| !c.is_whitespace()).enumerate() {
            cells[index] = match ch {
                'X' => Some(Mark::X),
                'O' => Some(Mark::O),
                _ => None,
            };
        }
        Self { cells }
    }

    pub fn cells(&self) -> &[Option<Mark>; CELL_COUNT] {
        &self.cells
    }

    pub fn cell(&self, index: usize) -> Option<Mark> {
        self.cells.get(index).copied().flatten()
    }

    pub fn apply_move(&self, index: usize, mark: Mark) -> Result<Board, GameError> {
        if index >= CELL_COUNT {
            return Err(GameError::InvalidMove {
                index,
                reason: InvalidMoveReason::OutOfRange,
            });
        }
        if self.evaluate().is_terminal() {
            return Err(GameError::InvalidMove {
                index,
                reason: InvalidMoveReason::GameOver,
            });
        }
        if let Some(occupant) = self.cells[index] {
            return Err(GameError::InvalidMove {
                index,
                reason: InvalidMoveReason::Occupied(occupant),
            });
        }

        let mut next = *self;
        next.cells[index] = Some(mark);
        Ok(next)
    }

    pub(crate) fn place(&mut self, index: usize, mark: Mark) {
        self.cells[index] = Some(mark);
    }

    pub(crate) fn clear(&mut self, index: usize) {
        self.cells[index] = None;
    }

    pub fn evaluate(&self) -> GameOutcome {
        if let Some((mark, _)) = self.winning_line() {
            return GameOutcome::Win(mark);
        }
        if self.is_full() {
            return GameOutcome::Draw;
        }
        GameOutcome::InProgress
    }

    pub fn winning_line(&self) -> Option<(Mark, Line)> {
        LINES.iter().find_map(|&line| {
            let [a, b, c] = line;
            match self.cells[a] {
                Some(mark) if self.cells[b] == Some(mark) && self.cells[c] == Some(mark) => {
                    Some((mark, line))
                }
                _ => None,
            }
        })
    }

    pub fn empty_cells(&self) -> Vec<usize> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.is_none())
            .map(|(index, _)| index)
            .collect()
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    pub fn count(&self, mark: Mark) -> usize {
        self.cells.iter().filter(|&&cell| cell == Some(mark)).count()
    }

    /// X moves whenever both sides have placed the same number of marks.
    pub fn side_to_move(&self) -> Mark {
        if self.count(Mark::X) > self.count(Mark::O) {
            Mark::O
        } else {
            Mark::X
        }
    }

    pub fn to_proto_cells(&self) -> Vec<i32> {
        self.cells
            .iter()
            .map(|cell| match cell {
                None => proto::CellState::Empty as i32,
                Some(Mark::X) => proto::CellState::X as i32,
                Some(Mark::O) => proto::CellState::O as i32,
            })
            .collect()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..3 {
            if row > 0 {
                writeln!(f, "---+---+---")?;
            }
            let symbols: Vec<String> = (0..3)
                .map(|col| match self.cells[row * 3 + col] {
                    Some(mark) => mark.to_string(),
                    None => " ".to_string(),
                })
                .collect();
            writeln!(f, " {} | {} | {} ", symbols[0], symbols[1], symbols[2])?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board_from_code(mut code: usize) -> Board {
        let mut cells = [None; CELL_COUNT];
        for cell in cells.iter_mut() {
            *cell = match code % 3 {
                1 => Some(Mark::X),
                2 => Some(Mark::O),
                _ => None,
            };
            code /= 3;
        }
        Board::from_cells(cells)
    }

    fn line_owner(board: &Board, line: &Line) -> Option<Mark> {
        let first = board.cell(line[0])?;
        if line.iter().all(|&i| board.cell(i) == Some(first)) {
            Some(first)
        } else {
            None
        }
    }

    #[test]
    fn test_new_board_is_empty_and_in_progress() {
        let board = Board::new();
        assert_eq!(board.empty_cells(), (0..9).collect::<Vec<_>>());
        assert_eq!(board.evaluate(), GameOutcome::InProgress);
        assert_eq!(board.side_to_move(), Mark::X);
    }

    #[test]
    fn test_apply_move_sets_cell_and_leaves_original_untouched() {
        let board = Board::new();
        let next = board.apply_move(4, Mark::X).unwrap();

        assert_eq!(next.cell(4), Some(Mark::X));
        assert_eq!(board.cell(4), None);
        assert_eq!(next.side_to_move(), Mark::O);
    }

    #[test]
    fn test_apply_move_rejects_out_of_range() {
        let board = Board::new();
        let result = board.apply_move(9, Mark::X);
        assert_eq!(
            result,
            Err(GameError::InvalidMove {
                index: 9,
                reason: InvalidMoveReason::OutOfRange,
            })
        );
    }

    #[test]
    fn test_apply_move_on_occupied_cell_never_changes_board() {
        let board = Board::from_pattern("X__ _O_ ___");
        for mark in [Mark::X, Mark::O] {
            for index in [0, 4] {
                let result = board.apply_move(index, mark);
                assert!(matches!(
                    result,
                    Err(GameError::InvalidMove {
                        reason: InvalidMoveReason::Occupied(_),
                        ..
                    })
                ));
            }
        }
        assert_eq!(board, Board::from_pattern("X__ _O_ ___"));
    }

    #[test]
    fn test_apply_move_rejects_after_win() {
        let board = Board::from_pattern("XXX OO_ ___");
        let result = board.apply_move(5, Mark::O);
        assert_eq!(
            result,
            Err(GameError::InvalidMove {
                index: 5,
                reason: InvalidMoveReason::GameOver,
            })
        );
    }

    #[test]
    fn test_evaluate_row_column_diagonal() {
        assert_eq!(Board::from_pattern("___ OOO XX_").evaluate(), GameOutcome::Win(Mark::O));
        assert_eq!(Board::from_pattern("X_O X_O X__").evaluate(), GameOutcome::Win(Mark::X));
        assert_eq!(Board::from_pattern("O_X _OX X_O").evaluate(), GameOutcome::Win(Mark::O));
        assert_eq!(Board::from_pattern("O_X _XO X__").evaluate(), GameOutcome::Win(Mark::X));
    }

    #[test]
    fn test_evaluate_draw() {
        let board = Board::from_pattern("XOX XOO OXX");
        assert_eq!(board.evaluate(), GameOutcome::Draw);
        assert!(board.empty_cells().is_empty());
    }

    #[test]
    fn test_full_board_with_line_is_win_not_draw() {
        let board = Board::from_pattern("XXX OOX OXO");
        assert_eq!(board.evaluate(), GameOutcome::Win(Mark::X));
    }

    #[test]
    fn test_winning_line_reports_first_in_canonical_order() {
        // Top row and left column both complete; the row comes first.
        let board = Board::from_pattern("XXX XOO XOO");
        assert_eq!(board.winning_line(), Some((Mark::X, [0, 1, 2])));

        let board = Board::from_pattern("XOO XO_ X__");
        assert_eq!(board.winning_line(), Some((Mark::X, [0, 3, 6])));
    }

    #[test]
    fn test_evaluate_matches_direct_line_check_on_every_board() {
        for code in 0..3usize.pow(9) {
            let board = board_from_code(code);
            let expected_winner = LINES.iter().find_map(|line| line_owner(&board, line));
            let empty = board.cells().iter().filter(|c| c.is_none()).count();

            let expected = match expected_winner {
                Some(mark) => GameOutcome::Win(mark),
                None if empty == 0 => GameOutcome::Draw,
                None => GameOutcome::InProgress,
            };
            assert_eq!(board.evaluate(), expected, "board code {}", code);
        }
    }

    #[test]
    fn test_empty_cells_are_ascending() {
        let board = Board::from_pattern("_X_ O__ X_O");
        assert_eq!(board.empty_cells(), vec![0, 2, 4, 5, 7]);
    }

    #[test]
    fn test_proto_cells_layout() {
        let board = Board::from_pattern("X__ _O_ ___");
        let cells = board.to_proto_cells();
        assert_eq!(cells.len(), 9);
        assert_eq!(cells[0], proto::CellState::X as i32);
        assert_eq!(cells[4], proto::CellState::O as i32);
        assert_eq!(cells[8], proto::CellState::Empty as i32);
    }

    #[test]
    fn test_display_renders_grid() {
        let board = Board::from_pattern("X__ _O_ __X");
        let rendered = board.to_string();
        assert_eq!(rendered.lines().count(), 5);
        assert!(rendered.starts_with(" X |   |   "));
    }
}
