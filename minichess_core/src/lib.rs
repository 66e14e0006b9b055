//! Move selection for a two-player pawn/bishop/knight/king board game.
//!
//! The [`engine`] module holds the searcher: iterative deepening over a
//! negamax alpha-beta search with a transposition table and killer-move
//! ordering. It talks to the board only through [`engine::PositionOracle`].
//!
//! The [`logic`] module is a reference oracle for a 6x6 variant of the game.
//! It is what the tests drive the engine with, and a worked example for
//! anyone adapting their own board type.

pub mod engine;
pub mod logic;
