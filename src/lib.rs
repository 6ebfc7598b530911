//! Endless lane-hopping game core.
//!
//! The player hops across procedurally generated grass, road, river and rail
//! lanes. [`game::Game`] drives one run; the browser build in `web` wires it to
//! keyboard input, the animation frame loop and a JavaScript renderer.

pub mod engine;
pub mod game;
#[cfg(target_arch = "wasm32")]
mod web;

pub use game::collision::Status;
pub use game::config::{ConfigError, GameConfig};
pub use game::event::{DeathCause, GameEvent};
pub use game::player::Direction;
pub use game::snapshot::Snapshot;
pub use game::{Game, TickReport};
