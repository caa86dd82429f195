//! Command-line front end for the health metrics calculator API.
//!
//! `cli` declares the arguments, `commands` runs one session call per
//! invocation and `render` formats the result as text.

pub mod cli;
pub mod commands;
pub mod render;

pub use cli::Args;
pub use commands::execute;
