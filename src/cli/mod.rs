//! Command-line interface module.

mod args;
pub mod common;
pub mod scan;
pub mod serve;
pub mod strip;

pub use args::{Cli, Commands, ModeArgs, ScanArgs, ServeArgs, StripArgs};
