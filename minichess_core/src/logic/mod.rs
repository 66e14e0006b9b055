//! Reference rules for the 6x6 variant, exposed to the engine through
//! [`PositionOracle`](crate::engine::PositionOracle) on [`game::GameState`].

pub mod board;
pub mod game;
pub mod generator;
pub mod zobrist;
