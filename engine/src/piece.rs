use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

pub type PieceId = u32;

/// Occupancy matrix of a piece relative to its bounding box.
///
/// Always rectangular, at least 1x1, with at least one occupied cell. Serialized
/// as nested `0`/`1` rows so piece definitions read like the grid they land on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<u8>>", into = "Vec<Vec<u8>>")]
pub struct PieceShape {
    height: usize,
    width: usize,
    cells: Vec<bool>,
}

impl PieceShape {
    pub fn new(rows: Vec<Vec<bool>>) -> EngineResult<Self> {
        let height = rows.len();
        if height == 0 {
            return Err(EngineError::shape("shape has no rows"));
        }
        let width = rows[0].len();
        if width == 0 {
            return Err(EngineError::shape("shape row 0 is empty"));
        }
        if let Some((idx, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != width) {
            return Err(EngineError::shape(format!(
                "shape row {idx} has {} cells, expected {width}",
                row.len()
            )));
        }

        let cells: Vec<bool> = rows.into_iter().flatten().collect();
        if !cells.iter().any(|&c| c) {
            return Err(EngineError::shape("shape has no occupied cell"));
        }

        Ok(Self {
            height,
            width,
            cells,
        })
    }

    /// Builds a shape from `0`/`1` literal rows; any non-zero value is occupied.
    pub fn from_bits<R: AsRef<[u8]>>(rows: &[R]) -> EngineResult<Self> {
        Self::new(
            rows.iter()
                .map(|r| r.as_ref().iter().map(|&v| v != 0).collect())
                .collect(),
        )
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn is_occupied(&self, row: usize, col: usize) -> bool {
        row < self.height && col < self.width && self.cells[row * self.width + col]
    }

    /// Occupied `(row, col)` offsets in row-major order.
    pub fn occupied_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, c)| **c)
            .map(|(i, _)| (i / self.width, i % self.width))
    }

    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }

    pub fn to_bits(&self) -> Vec<Vec<u8>> {
        self.cells
            .chunks(self.width)
            .map(|row| row.iter().map(|&c| u8::from(c)).collect())
            .collect()
    }
}

impl TryFrom<Vec<Vec<u8>>> for PieceShape {
    type Error = EngineError;

    fn try_from(rows: Vec<Vec<u8>>) -> Result<Self, Self::Error> {
        Self::from_bits(&rows)
    }
}

impl From<PieceShape> for Vec<Vec<u8>> {
    fn from(shape: PieceShape) -> Self {
        shape.to_bits()
    }
}

/// A placeable piece instance. `id` and `color` are carried for the caller
/// and never affect placement.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Piece {
    pub id: PieceId,
    pub shape: PieceShape,
    pub color: String,
}

impl Piece {
    pub fn new(id: PieceId, shape: PieceShape, color: impl Into<String>) -> Self {
        Self {
            id,
            shape,
            color: color.into(),
        }
    }
}
