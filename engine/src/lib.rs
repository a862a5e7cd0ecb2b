pub mod error;
pub mod grid;
pub mod piece;
pub mod placement;

pub use error::{EngineError, EngineResult};
pub use grid::{Cell, FullLines, Grid, MAX_GRID_SIZE};
pub use piece::{Piece, PieceId, PieceShape};
pub use placement::{
    Engine, EngineConfig, EngineSnapshot, Placement, PlacementOutcome, PlacementResult,
    Rejection, place,
};

/// Deterministic turn function: the next state depends only on the current
/// state and the input.
pub trait GameLogic {
    type State;
    type Input;

    fn initial_state(&self) -> Self::State;
    fn step(&self, state: &Self::State, input: Self::Input) -> Self::State;
}

/// Drives a [`GameLogic`] from a stream of inputs without any frontend.
#[derive(Debug)]
pub struct HeadlessRunner<G: GameLogic> {
    game: G,
    state: G::State,
    frame: usize,
}

impl<G: GameLogic> HeadlessRunner<G> {
    pub fn new(game: G) -> Self {
        let state = game.initial_state();
        Self {
            game,
            state,
            frame: 0,
        }
    }

    pub fn frame(&self) -> usize {
        self.frame
    }

    pub fn state(&self) -> &G::State {
        &self.state
    }

    pub fn into_state(self) -> G::State {
        self.state
    }

    pub fn step(&mut self, input: G::Input) -> usize {
        self.state = self.game.step(&self.state, input);
        self.frame += 1;
        self.frame
    }

    pub fn run<I>(&mut self, inputs: I) -> usize
    where
        I: IntoIterator<Item = G::Input>,
    {
        let mut last_frame = self.frame();
        for input in inputs {
            last_frame = self.step(input);
        }
        last_frame
    }

    pub fn reset(&mut self) {
        self.state = self.game.initial_state();
        self.frame = 0;
    }
}
