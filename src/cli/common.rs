//! Common utilities shared across CLI commands.

use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use jwalk::WalkDir;

use crate::config::SiteConfig;
use crate::integration::{Integration, RenderContext, RenderedPipeline};
use crate::utils::path::normalize_path;

const IGNORED_FILES: &[&str] = &[".DS_Store"];

/// A file picked up from the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputFile {
    /// Absolute path on disk.
    pub path: PathBuf,
    /// Path relative to the directory it was found under (file name for
    /// files given directly).
    pub rel: PathBuf,
}

impl InputFile {
    /// Site URL the file is served at, e.g. `/blog/` for `blog/index.html`.
    pub fn url(&self) -> String {
        let parts: Vec<_> = self
            .rel
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect();
        let url = format!("/{}", parts.join("/"));
        match url.rsplit_once('/') {
            Some((dir, "index.html" | "index.htm")) => format!("{dir}/"),
            _ => url,
        }
    }
}

/// Build the rendered-HTML pipeline for a page at `url`.
///
/// Shared by `strip` and `serve` so both classify pages the same way.
pub fn pipeline_for(url: &str, config: &SiteConfig) -> RenderedPipeline {
    let ctx = RenderContext::from_request(url, &config.serve.admin_prefixes);
    let mut pipeline = RenderedPipeline::new();
    Integration::new(config.strip).install(ctx, &mut pipeline);
    pipeline
}

/// Whether the CLI asked for stdin (`-` as the only path).
pub fn is_stdin(paths: &[PathBuf]) -> bool {
    paths.len() == 1 && paths[0].as_os_str() == "-"
}

/// Read all of stdin as raw bytes.
pub fn read_stdin() -> Result<Vec<u8>> {
    let mut body = Vec::new();
    io::stdin()
        .lock()
        .read_to_end(&mut body)
        .context("Failed to read stdin")?;
    Ok(body)
}

/// Collect input files from CLI paths, falling back to `default_dir`.
///
/// Anything under `exclude` (usually the output directory) is skipped so a
/// second run never re-reads its own output.
pub fn collect_input_files(
    paths: &[PathBuf],
    default_dir: &Path,
    exclude: Option<&Path>,
) -> Result<Vec<InputFile>> {
    let roots: Vec<PathBuf> = if paths.is_empty() {
        vec![default_dir.to_path_buf()]
    } else {
        paths.iter().map(|p| normalize_path(p)).collect()
    };

    let mut files = Vec::new();
    for root in &roots {
        if root.is_file() {
            let rel = root.file_name().map(PathBuf::from).unwrap_or_default();
            files.push(InputFile {
                path: root.clone(),
                rel,
            });
        } else if root.is_dir() {
            files.extend(collect_all_files(root).into_iter().filter_map(|path| {
                let rel = path.strip_prefix(root).ok()?.to_path_buf();
                Some(InputFile { path, rel })
            }));
        } else {
            anyhow::bail!("Path not found: {}", root.display());
        }
    }

    if let Some(exclude) = exclude {
        files.retain(|f| !f.path.starts_with(exclude));
    }
    files.sort_by(|a, b| a.path.cmp(&b.path));
    files.dedup_by(|a, b| a.path == b.path);
    Ok(files)
}

/// Collect all files from a directory recursively
fn collect_all_files(dir: &Path) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            let name = e.file_name().to_str().unwrap_or_default();
            !IGNORED_FILES.contains(&name)
        })
        .map(|e| e.path())
        .collect()
}
