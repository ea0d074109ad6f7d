//! Logging utilities with colored output and progress display.
//!
//! - `log!` prints a line with a colored `[module]` prefix
//! - `debug!` does the same, but only with `--verbose`
//! - [`ProgressLine`] keeps a single updating line of counters during a batch
//!
//! Everything is written to stderr: `deschema strip -` streams the rewritten
//! page on stdout.
//!
//! # Example
//!
//! ```ignore
//! log!("strip"; "rewrote {} files", count);
//!
//! let progress = ProgressLine::new("strip", &[("html", 69), ("copy", 10)]);
//! progress.inc("html");
//! progress.finish();
//! ```

use crossterm::{
    cursor, queue,
    terminal::{Clear, ClearType},
};
use owo_colors::OwoColorize;
use parking_lot::Mutex;
use std::{
    io::{Write, stderr},
    sync::atomic::{AtomicBool, AtomicUsize, Ordering},
};

/// Global verbose flag (set by --verbose CLI argument)
static VERBOSE: AtomicBool = AtomicBool::new(false);

/// A progress line currently occupies the last terminal line.
static PROGRESS_ACTIVE: AtomicBool = AtomicBool::new(false);

pub fn set_verbose(v: bool) {
    VERBOSE.store(v, Ordering::SeqCst);
}

pub fn is_verbose() -> bool {
    VERBOSE.load(Ordering::SeqCst)
}

/// Log a message with a colored module prefix
///
/// ```ignore
/// log!("module"; "message with {} formatting", args);
/// ```
#[macro_export]
macro_rules! log {
    ($module:expr; $($arg:tt)*) => {{
        $crate::logger::log($module, &format!($($arg)*))
    }};
}

/// Log a debug message (only shown when --verbose is enabled)
#[macro_export]
macro_rules! debug {
    ($module:expr; $($arg:tt)*) => {{
        if $crate::logger::is_verbose() {
            $crate::logger::log($module, &format!($($arg)*))
        }
    }};
}

/// Write one prefixed line, first clearing any progress line under the cursor.
pub fn log(module: &str, message: &str) {
    let mut err = stderr().lock();
    if PROGRESS_ACTIVE.load(Ordering::SeqCst) {
        clear_line(&mut err);
    }
    writeln!(err, "{} {message}", prefix(module)).ok();
    err.flush().ok();
}

/// `[module]`, colored by kind of message.
fn prefix(module: &str) -> String {
    let tag = format!("[{module}]");
    match module.to_ascii_lowercase().as_str() {
        "serve" => tag.bright_blue().bold().to_string(),
        "strip" | "scan" => tag.bright_green().bold().to_string(),
        "error" => tag.bright_red().bold().to_string(),
        _ => tag.bright_yellow().bold().to_string(),
    }
}

fn clear_line(out: &mut impl Write) {
    queue!(out, cursor::MoveToColumn(0), Clear(ClearType::CurrentLine)).ok();
}

// ============================================================================
// Progress Line
// ============================================================================

/// Single-line progress display with multiple counters
///
/// Displays: `[strip] html(42/69) copy(5/10)`
///
/// Redraws use `try_lock`, so a worker never waits on the terminal; a skipped
/// redraw is caught up by the next one.
pub struct ProgressLine {
    module: &'static str,
    counters: Vec<Counter>,
    lock: Mutex<()>,
    finished: bool,
}

struct Counter {
    name: &'static str,
    total: usize,
    current: AtomicUsize,
}

impl ProgressLine {
    /// Counters with a zero total are left out.
    pub fn new(module: &'static str, items: &[(&'static str, usize)]) -> Self {
        let counters = items
            .iter()
            .filter(|&&(_, total)| total > 0)
            .map(|&(name, total)| Counter {
                name,
                total,
                current: AtomicUsize::new(0),
            })
            .collect();

        PROGRESS_ACTIVE.store(true, Ordering::SeqCst);
        let progress = Self {
            module,
            counters,
            lock: Mutex::new(()),
            finished: false,
        };
        progress.draw(false);
        progress
    }

    /// Increment the counter with the given name.
    pub fn inc(&self, name: &str) {
        let Some(counter) = self.counters.iter().find(|c| c.name == name) else {
            return;
        };
        counter.current.fetch_add(1, Ordering::Relaxed);
        if let Some(_guard) = self.lock.try_lock() {
            self.draw(false);
        }
    }

    fn line(&self) -> String {
        let parts: Vec<_> = self
            .counters
            .iter()
            .map(|c| format!("{}({}/{})", c.name, c.current.load(Ordering::Relaxed), c.total))
            .collect();
        parts.join(" ")
    }

    fn draw(&self, keep: bool) {
        let mut err = stderr().lock();
        clear_line(&mut err);
        write!(err, "{} {}", prefix(self.module), self.line()).ok();
        if keep {
            writeln!(err).ok();
        }
        err.flush().ok();
    }

    /// Leave the final counts on screen.
    pub fn finish(mut self) {
        PROGRESS_ACTIVE.store(false, Ordering::SeqCst);
        {
            let _guard = self.lock.lock();
            self.draw(true);
        }
        self.finished = true;
    }
}

impl Drop for ProgressLine {
    fn drop(&mut self) {
        PROGRESS_ACTIVE.store(false, Ordering::SeqCst);
        if self.finished {
            return;
        }
        let mut err = stderr().lock();
        clear_line(&mut err);
        err.flush().ok();
    }
}
