//! Game simulation modules

pub mod collision;
pub mod entities;
pub mod field;
pub mod input;
pub mod scoreboard;
pub mod session;
pub mod spawn;

pub use session::{GameEvent, GameSession, RoomState, SessionHandle, SessionState};
