use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use qblock_engine::{Engine, EngineError, Piece, PieceId, PlacementResult};

use crate::settings::GameConfig;
use crate::supply::PieceSupply;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("piece {0} is not in the active set")]
    UnknownPiece(PieceId),

    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// State handed to a presentation layer after every call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub grid: Vec<Vec<u8>>,
    pub grid_size: usize,
    pub score: u64,
    pub moves: i64,
    pub out_of_moves: bool,
    pub pieces: Vec<Piece>,
}

/// One game: the engine plus the pieces currently offered to the player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSession {
    engine: Engine,
    supply: PieceSupply,
}

impl GameSession {
    pub fn new(config: GameConfig) -> Result<Self, SessionError> {
        let engine = Engine::new(config.engine)?;
        let supply = PieceSupply::new(config.pieces, config.supply)?;
        Ok(Self { engine, supply })
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn engine_mut_for_test(&mut self) -> &mut Engine {
        &mut self.engine
    }

    pub fn pieces(&self) -> &[Piece] {
        self.supply.active()
    }

    /// Drops active piece `piece_id` at `(row, col)`. A rejected drop keeps the
    /// piece in the active set; an accepted one consumes it.
    pub fn place(
        &mut self,
        piece_id: PieceId,
        row: i64,
        col: i64,
    ) -> Result<PlacementResult, SessionError> {
        let piece = self
            .supply
            .get(piece_id)
            .ok_or(SessionError::UnknownPiece(piece_id))?;

        let result = self.engine.attempt_placement(piece, row, col);
        if result.is_accepted() {
            self.supply.take(piece_id);
            debug!(piece = piece_id, remaining = self.supply.active().len(), "piece consumed");
        }
        Ok(result)
    }

    pub fn new_game(&mut self) {
        self.engine.reset();
        self.supply.reset();
        info!(
            grid_size = self.engine.grid().size(),
            score = self.engine.score(),
            moves = self.engine.moves_remaining(),
            "new game"
        );
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let engine = self.engine.snapshot();
        SessionSnapshot {
            grid: engine.grid,
            grid_size: engine.grid_size,
            score: engine.score,
            moves: engine.moves,
            out_of_moves: engine.moves <= 0,
            pieces: self.supply.active().to_vec(),
        }
    }
}
