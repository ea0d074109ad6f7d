//! Small helpers shared across commands.

pub mod hash;
pub mod mime;
pub mod path;
mod plural;

pub use plural::plural_count;
