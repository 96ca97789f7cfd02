//! DocSeal command line interface

pub mod cli;
pub mod commands;

pub use cli::{Cli, Command};
pub use commands::{run, Status};
