//! Rules engines for the mini-game collection.
//!
//! Every game lives in its own module and is driven by plain method calls, so
//! the whole crate is testable on the host without a browser. Randomness is
//! always injected through an [`rand::Rng`] so runs are reproducible from a
//! seed.

pub mod arcade;
pub mod checkers;
pub mod chess;
mod error;
pub mod football;
pub mod jigsaw;
pub mod ludo;
pub mod maze;
pub mod racing;
pub mod sliding;
pub mod slots;
mod types;
pub mod uno;

pub use error::*;
pub use types::*;
