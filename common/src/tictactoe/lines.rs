pub type Line = [usize; 3];

/// Rows, then columns, then diagonals. The first uniformly marked line in
/// this order is the one reported for highlighting.
pub const LINES: [Line; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];
