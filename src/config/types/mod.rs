//! Configuration utility types.
//!
//! | Module   | Purpose                                      |
//! |----------|----------------------------------------------|
//! | `error`  | ConfigError, diagnostics, field paths        |
//! | `handle` | Global configuration handle (thread-safe)    |

mod error;
pub mod handle;

pub use error::{ConfigDiagnostics, ConfigError, FieldPath};
pub use handle::{cfg, init_config, reload_config};
