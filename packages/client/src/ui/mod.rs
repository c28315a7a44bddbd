//! Terminal front end.
//!
//! Consumes the connection core the way a graphical UI would: registers
//! callbacks, keeps a small view model, and forwards typed input.

pub mod cli;
pub mod render;
mod runner;
pub mod state;

pub use cli::Args;
pub use runner::{ClientError, run};
