/// A (column, row) coordinate in a schedule table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    column: usize,
    row: usize,
}

impl Cell {
    #[must_use]
    pub const fn new(column: usize, row: usize) -> Self {
        Self { column, row }
    }

    #[must_use]
    pub const fn column(&self) -> usize {
        self.column
    }

    #[must_use]
    pub const fn row(&self) -> usize {
        self.row
    }

    /// Determines if the cell is at the given coordinate.
    #[must_use]
    pub const fn is_at(&self, column: usize, row: usize) -> bool {
        self.column == column && self.row == row
    }
}

impl std::fmt::Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.column, self.row)
    }
}
