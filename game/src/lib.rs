pub mod api;
pub mod logging;
pub mod playtest;
pub mod session;
pub mod settings;
pub mod supply;

pub use session::{GameSession, SessionError, SessionSnapshot};
pub use settings::{ConfigStore, GameConfig};
pub use supply::{PieceSupply, PieceTemplate, SupplyPolicy};
