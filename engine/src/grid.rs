use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

pub const DEFAULT_GRID_SIZE: usize = 10;
pub const MAX_GRID_SIZE: usize = 256;

pub const CELL_EMPTY: u8 = 0;
pub const CELL_FILLED: u8 = 1;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Cell {
    #[default]
    Empty,
    Filled,
}

impl Cell {
    pub fn is_filled(self) -> bool {
        self == Cell::Filled
    }

    pub fn as_u8(self) -> u8 {
        match self {
            Cell::Empty => CELL_EMPTY,
            Cell::Filled => CELL_FILLED,
        }
    }
}

/// Square playing field. `cells[row][col]`, row 0 at the top.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Grid {
    size: usize,
    cells: Vec<Vec<Cell>>,
}

/// Indices of every full row and column of a grid, ascending.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FullLines {
    pub rows: Vec<usize>,
    pub cols: Vec<usize>,
}

impl FullLines {
    pub fn count(&self) -> usize {
        self.rows.len() + self.cols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() && self.cols.is_empty()
    }
}

impl Grid {
    pub fn new(size: usize) -> EngineResult<Self> {
        if size == 0 {
            return Err(EngineError::config("grid size must be at least 1"));
        }
        if size > MAX_GRID_SIZE {
            return Err(EngineError::config(format!(
                "grid size {size} exceeds the maximum of {MAX_GRID_SIZE}"
            )));
        }
        Ok(Self {
            size,
            cells: vec![vec![Cell::Empty; size]; size],
        })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn get(&self, row: usize, col: usize) -> Option<Cell> {
        self.cells.get(row).and_then(|r| r.get(col)).copied()
    }

    pub fn is_filled(&self, row: usize, col: usize) -> bool {
        self.get(row, col).is_some_and(Cell::is_filled)
    }

    /// Direct cell write for presentation-side setup and tests. Out-of-range
    /// coordinates are ignored.
    pub fn set(&mut self, row: usize, col: usize, cell: Cell) {
        if let Some(slot) = self.cells.get_mut(row).and_then(|r| r.get_mut(col)) {
            *slot = cell;
        }
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.cells
    }

    pub fn filled_count(&self) -> usize {
        self.cells
            .iter()
            .map(|row| row.iter().filter(|c| c.is_filled()).count())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.filled_count() == 0
    }

    pub fn clear(&mut self) {
        for row in &mut self.cells {
            row.fill(Cell::Empty);
        }
    }

    /// Scans the whole grid, not only lines touched by the last placement.
    pub fn detect_full_lines(&self) -> FullLines {
        let mut lines = FullLines::default();
        for i in 0..self.size {
            if self.cells[i].iter().all(|c| c.is_filled()) {
                lines.rows.push(i);
            }
            if self.cells.iter().all(|row| row[i].is_filled()) {
                lines.cols.push(i);
            }
        }
        lines
    }

    /// Empties every listed row and column. Intersections are written twice,
    /// which is harmless since both writes are `Empty`.
    pub fn clear_lines(&mut self, lines: &FullLines) {
        for &row in &lines.rows {
            if let Some(r) = self.cells.get_mut(row) {
                r.fill(Cell::Empty);
            }
        }
        for &col in &lines.cols {
            for r in &mut self.cells {
                if let Some(cell) = r.get_mut(col) {
                    *cell = Cell::Empty;
                }
            }
        }
    }

    pub fn to_u8_rows(&self) -> Vec<Vec<u8>> {
        self.cells
            .iter()
            .map(|row| row.iter().map(|c| c.as_u8()).collect())
            .collect()
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.cells {
            for cell in row {
                f.write_str(if cell.is_filled() { "#" } else { "." })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_size_grid_is_rejected() {
        let err = Grid::new(0).unwrap_err();
        assert!(matches!(err, EngineError::InvalidConfiguration { .. }));
    }

    #[test]
    fn oversized_grid_is_rejected_without_allocating() {
        assert!(Grid::new(MAX_GRID_SIZE).is_ok());
        for size in [MAX_GRID_SIZE + 1, 1_000_000, usize::MAX] {
            let err = Grid::new(size).unwrap_err();
            assert!(matches!(err, EngineError::InvalidConfiguration { .. }));
        }
    }

    #[test]
    fn new_grid_is_square_and_empty() {
        let grid = Grid::new(DEFAULT_GRID_SIZE).unwrap();
        assert_eq!(grid.rows().len(), DEFAULT_GRID_SIZE);
        assert!(grid.rows().iter().all(|r| r.len() == DEFAULT_GRID_SIZE));
        assert!(grid.is_empty());
    }

    #[test]
    fn detects_full_row_and_column() {
        let mut grid = Grid::new(4).unwrap();
        for i in 0..4 {
            grid.set(2, i, Cell::Filled);
            grid.set(i, 1, Cell::Filled);
        }
        let lines = grid.detect_full_lines();
        assert_eq!(lines.rows, vec![2]);
        assert_eq!(lines.cols, vec![1]);
        assert_eq!(lines.count(), 2);

        grid.clear_lines(&lines);
        assert!(grid.is_empty());
        assert!(grid.detect_full_lines().is_empty());
    }

    #[test]
    fn set_ignores_out_of_range_cells() {
        let mut grid = Grid::new(3).unwrap();
        grid.set(3, 0, Cell::Filled);
        grid.set(0, 7, Cell::Filled);
        assert!(grid.is_empty());
        assert_eq!(grid.get(3, 0), None);
    }

    #[test]
    fn display_renders_hash_for_filled_cells() {
        let mut grid = Grid::new(2).unwrap();
        grid.set(0, 1, Cell::Filled);
        assert_eq!(grid.to_string(), ".#\n..\n");
    }
}
