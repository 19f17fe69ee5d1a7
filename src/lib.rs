//! Space Invaders: simulation core, session state machine, renderer
//! contract and a crossterm front-end.

pub mod collision;
pub mod compute;
pub mod config;
pub mod display;
pub mod entities;
pub mod input;
pub mod render;
pub mod session;
pub mod tuning;

pub use session::Game;
pub use tuning::Tuning;
