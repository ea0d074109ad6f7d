//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Strip structured data from rendered HTML
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: deschema.toml, searched upward from cwd)
    #[arg(short = 'C', long, global = true, default_value = "deschema.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Rewrite HTML files with structured data removed
    #[command(visible_alias = "x")]
    Strip {
        #[command(flatten)]
        args: StripArgs,
    },

    /// Report structured data found in HTML files
    #[command(visible_alias = "q")]
    Scan {
        #[command(flatten)]
        args: ScanArgs,
    },

    /// Serve a rendered site, stripping pages on the fly
    #[command(visible_alias = "s")]
    Serve {
        #[command(flatten)]
        args: ServeArgs,
    },
}

/// Stripping mode overrides shared by Strip and Serve.
///
/// Each flag overrides the matching `[strip]` key; `--jsonld=false` disables.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct ModeArgs {
    /// Strip itemscope/itemtype/itemprop attributes
    #[arg(short, long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = true)]
    pub microdata: Option<bool>,

    /// Strip property/typeof attributes
    #[arg(short, long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = true)]
    pub rdfa: Option<bool>,

    /// Strip <script type="application/ld+json"> blocks
    #[arg(short, long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = true)]
    pub jsonld: Option<bool>,

    /// Suppress Yoast SEO schema graph output
    #[arg(long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = true)]
    pub yoast_jsonld: Option<bool>,

    /// Deregister WooCommerce page-footer structured data
    #[arg(long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = true)]
    pub woocommerce_jsonld: Option<bool>,

    /// Deregister WooCommerce order-email structured data
    #[arg(long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = true)]
    pub woocommerce_mail_jsonld: Option<bool>,
}

/// Strip command arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct StripArgs {
    /// Files or directories to rewrite. If omitted, uses `[build] input`.
    /// Use `-` to filter stdin to stdout.
    #[arg(value_name = "PATH", value_hint = clap::ValueHint::AnyPath)]
    pub paths: Vec<PathBuf>,

    /// Write results under this directory instead of rewriting in place
    #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
    pub output: Option<PathBuf>,

    /// Report what would change without writing anything
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    #[command(flatten)]
    pub modes: ModeArgs,
}

/// Scan command arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct ScanArgs {
    /// Files or directories to scan. If omitted, uses `[build] input`.
    /// Use `-` to scan stdin.
    #[arg(value_name = "PATH", value_hint = clap::ValueHint::AnyPath)]
    pub paths: Vec<PathBuf>,

    /// Pretty-print JSON output
    #[arg(short, long)]
    pub pretty: bool,

    /// Only list files that contain structured data
    #[arg(short = 'E', long)]
    pub filter_empty: bool,

    /// Write output to file instead of stdout
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub output: Option<PathBuf>,
}

/// Serve command arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct ServeArgs {
    /// Directory to serve (default: `[serve] root`, then `[build] input`)
    #[arg(value_hint = clap::ValueHint::DirPath)]
    pub root: Option<PathBuf>,

    /// Network interface to bind (e.g., 127.0.0.1, 0.0.0.0)
    #[arg(short, long)]
    pub interface: Option<std::net::IpAddr>,

    /// Port number to listen on
    #[arg(short, long)]
    pub port: Option<u16>,

    #[command(flatten)]
    pub modes: ModeArgs,
}

#[allow(unused)]
impl Cli {
    pub const fn is_strip(&self) -> bool {
        matches!(self.command, Commands::Strip { .. })
    }
    pub const fn is_scan(&self) -> bool {
        matches!(self.command, Commands::Scan { .. })
    }
    pub const fn is_serve(&self) -> bool {
        matches!(self.command, Commands::Serve { .. })
    }
}
