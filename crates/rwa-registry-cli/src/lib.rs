//! Operator CLI for RWA registry snapshot files
//!
//! Each invocation loads a snapshot, applies at most one command as the
//! account given with `--as`, writes the snapshot back, and prints the facts
//! the command produced as JSON lines. Nothing is signed or broadcast.

pub mod cli;
pub mod handlers;
pub mod state;

pub use cli::{Cli, Command, ComponentSpec};
pub use handlers::run;
