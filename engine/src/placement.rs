use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::{EngineError, EngineResult};
use crate::grid::{Cell, DEFAULT_GRID_SIZE, FullLines, Grid, MAX_GRID_SIZE};
use crate::piece::{Piece, PieceId};

pub const POINTS_PER_LINE: u64 = 100;
pub const DEFAULT_INITIAL_SCORE: u64 = 640;
pub const DEFAULT_INITIAL_MOVES: i64 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineConfig {
    #[serde(default = "default_grid_size")]
    pub grid_size: usize,
    #[serde(default = "default_initial_score")]
    pub initial_score: u64,
    #[serde(default = "default_initial_moves")]
    pub initial_moves: i64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            grid_size: DEFAULT_GRID_SIZE,
            initial_score: DEFAULT_INITIAL_SCORE,
            initial_moves: DEFAULT_INITIAL_MOVES,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> EngineResult<()> {
        if self.grid_size == 0 {
            return Err(EngineError::config("gridSize must be at least 1"));
        }
        if self.grid_size > MAX_GRID_SIZE {
            return Err(EngineError::config(format!(
                "gridSize {} exceeds the maximum of {MAX_GRID_SIZE}",
                self.grid_size
            )));
        }
        Ok(())
    }
}

fn default_grid_size() -> usize {
    DEFAULT_GRID_SIZE
}

fn default_initial_score() -> u64 {
    DEFAULT_INITIAL_SCORE
}

fn default_initial_moves() -> i64 {
    DEFAULT_INITIAL_MOVES
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum Rejection {
    /// The piece's bounding box does not fit inside the grid at this anchor.
    OutOfBounds,
    /// An occupied piece cell would land on this already-filled grid cell.
    Overlap { row: usize, col: usize },
}

/// Grid after a successful drop, with the lines it cleared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    pub grid: Grid,
    pub cleared: FullLines,
}

impl Placement {
    pub fn cleared_count(&self) -> usize {
        self.cleared.count()
    }

    pub fn score_delta(&self) -> u64 {
        (self.cleared_count() as u64).saturating_mul(POINTS_PER_LINE)
    }
}

/// Checks bounds and overlap for `piece` anchored at `(anchor_row, anchor_col)`.
pub fn check_placement(
    grid: &Grid,
    piece: &Piece,
    anchor_row: i64,
    anchor_col: i64,
) -> Result<(usize, usize), Rejection> {
    let n = grid.size() as i64;
    let shape = &piece.shape;
    if anchor_row < 0
        || anchor_col < 0
        || anchor_row.saturating_add(shape.height() as i64) > n
        || anchor_col.saturating_add(shape.width() as i64) > n
    {
        return Err(Rejection::OutOfBounds);
    }

    let (row, col) = (anchor_row as usize, anchor_col as usize);
    for (r, c) in shape.occupied_cells() {
        if grid.is_filled(row + r, col + c) {
            return Err(Rejection::Overlap {
                row: row + r,
                col: col + c,
            });
        }
    }
    Ok((row, col))
}

/// Pure placement step: validates, stamps the piece, then clears every full
/// row and column of the resulting grid.
pub fn place(
    grid: &Grid,
    piece: &Piece,
    anchor_row: i64,
    anchor_col: i64,
) -> Result<Placement, Rejection> {
    let (row, col) = check_placement(grid, piece, anchor_row, anchor_col)?;

    let mut next = grid.clone();
    for (r, c) in piece.shape.occupied_cells() {
        next.set(row + r, col + c, Cell::Filled);
    }

    let cleared = next.detect_full_lines();
    next.clear_lines(&cleared);

    Ok(Placement {
        grid: next,
        cleared,
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacementOutcome {
    pub piece_id: PieceId,
    pub grid: Grid,
    pub cleared_rows: Vec<usize>,
    pub cleared_cols: Vec<usize>,
    pub cleared_count: usize,
    pub score_delta: u64,
    pub score: u64,
    pub moves: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlacementResult {
    Accepted(PlacementOutcome),
    Rejected(Rejection),
}

impl PlacementResult {
    pub fn is_accepted(&self) -> bool {
        matches!(self, PlacementResult::Accepted(_))
    }

    pub fn rejection(&self) -> Option<Rejection> {
        match self {
            PlacementResult::Accepted(_) => None,
            PlacementResult::Rejected(reason) => Some(*reason),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineSnapshot {
    pub grid: Vec<Vec<u8>>,
    pub grid_size: usize,
    pub score: u64,
    pub moves: i64,
}

/// Owns the grid, score and move counter of one game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Engine {
    config: EngineConfig,
    grid: Grid,
    score: u64,
    moves: i64,
}

impl Engine {
    pub fn new(config: EngineConfig) -> EngineResult<Self> {
        config.validate()?;
        Ok(Self {
            grid: Grid::new(config.grid_size)?,
            score: config.initial_score,
            moves: config.initial_moves,
            config,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Mutable grid access for scenario setup. Play goes through
    /// [`Engine::attempt_placement`].
    pub fn grid_mut_for_test(&mut self) -> &mut Grid {
        &mut self.grid
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn moves_remaining(&self) -> i64 {
        self.moves
    }

    pub fn reset(&mut self) {
        self.grid.clear();
        self.score = self.config.initial_score;
        self.moves = self.config.initial_moves;
    }

    pub fn attempt_placement(
        &mut self,
        piece: &Piece,
        anchor_row: i64,
        anchor_col: i64,
    ) -> PlacementResult {
        let placement = match place(&self.grid, piece, anchor_row, anchor_col) {
            Ok(placement) => placement,
            Err(reason) => {
                trace!(piece = piece.id, anchor_row, anchor_col, ?reason, "placement rejected");
                return PlacementResult::Rejected(reason);
            }
        };

        let score_delta = placement.score_delta();
        self.grid = placement.grid;
        self.score = self.score.saturating_add(score_delta);
        self.moves = self.moves.saturating_sub(1);

        debug!(
            piece = piece.id,
            anchor_row,
            anchor_col,
            rows = ?placement.cleared.rows,
            cols = ?placement.cleared.cols,
            score = self.score,
            moves = self.moves,
            "placement accepted"
        );

        PlacementResult::Accepted(PlacementOutcome {
            piece_id: piece.id,
            grid: self.grid.clone(),
            cleared_count: placement.cleared.count(),
            cleared_rows: placement.cleared.rows,
            cleared_cols: placement.cleared.cols,
            score_delta,
            score: self.score,
            moves: self.moves,
        })
    }

    pub fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot {
            grid: self.grid.to_u8_rows(),
            grid_size: self.grid.size(),
            score: self.score,
            moves: self.moves,
        }
    }
}
