//! Configuration section definitions.
//!
//! Each module corresponds to a section in `deschema.toml`:
//!
//! | Module  | TOML Section | Purpose                               |
//! |---------|--------------|---------------------------------------|
//! | `build` | `[build]`    | Input/output directories, extensions  |
//! | `serve` | `[serve]`    | Stripping HTTP server                 |
//!
//! `[strip]` maps directly onto [`crate::strip::StripConfig`].

mod build;
mod serve;

pub use build::BuildConfig;
pub use serve::ServeConfig;
