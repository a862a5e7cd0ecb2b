use serde::{Deserialize, Serialize};
use tracing::warn;

use qblock_engine::{GameLogic, PieceId, PlacementResult, Rejection};

use crate::session::{GameSession, SessionError};
use crate::settings::GameConfig;

/// One scripted input, as read from a replay file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "action")]
pub enum SessionInput {
    #[serde(rename_all = "camelCase")]
    Place { piece_id: PieceId, row: i64, col: i64 },
    NewGame,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "status")]
pub enum StepReport {
    #[serde(rename_all = "camelCase")]
    Accepted { cleared: usize, score_delta: u64 },
    Rejected { reason: Rejection },
    #[serde(rename_all = "camelCase")]
    UnknownPiece { piece_id: PieceId },
    NewGame,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaytestState {
    pub session: GameSession,
    pub last: Option<StepReport>,
    pub accepted: u32,
    pub rejected: u32,
    pub lines_cleared: u64,
}

#[derive(Debug, Clone)]
pub struct PlacementLogic {
    fresh: GameSession,
}

impl PlacementLogic {
    pub fn new(config: GameConfig) -> Result<Self, SessionError> {
        Ok(Self {
            fresh: GameSession::new(config)?,
        })
    }
}

impl GameLogic for PlacementLogic {
    type State = PlaytestState;
    type Input = SessionInput;

    fn initial_state(&self) -> Self::State {
        PlaytestState {
            session: self.fresh.clone(),
            last: None,
            accepted: 0,
            rejected: 0,
            lines_cleared: 0,
        }
    }

    fn step(&self, state: &Self::State, input: Self::Input) -> Self::State {
        let mut next = state.clone();
        let report = match input {
            SessionInput::NewGame => {
                next.session.new_game();
                StepReport::NewGame
            }
            SessionInput::Place {
                piece_id,
                row,
                col,
            } => match next.session.place(piece_id, row, col) {
                Ok(PlacementResult::Accepted(outcome)) => {
                    next.accepted += 1;
                    next.lines_cleared += outcome.cleared_count as u64;
                    StepReport::Accepted {
                        cleared: outcome.cleared_count,
                        score_delta: outcome.score_delta,
                    }
                }
                Ok(PlacementResult::Rejected(reason)) => {
                    next.rejected += 1;
                    StepReport::Rejected { reason }
                }
                Err(err) => {
                    warn!(error = %err, "scripted placement skipped");
                    next.rejected += 1;
                    StepReport::UnknownPiece { piece_id }
                }
            },
        };
        next.last = Some(report);
        next
    }
}
