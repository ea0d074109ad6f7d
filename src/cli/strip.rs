//! Strip command implementation.
//!
//! Rewrites a rendered site with structured data removed. Pages are
//! processed in parallel; each one goes through the same pipeline the
//! server uses, so admin screens and feeds are left alone here too.

use std::borrow::Cow;
use std::fs;
use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use rayon::prelude::*;

use super::common::{InputFile, collect_input_files, is_stdin, pipeline_for, read_stdin};
use crate::cli::StripArgs;
use crate::config::SiteConfig;
use crate::logger::ProgressLine;
use crate::strip::scan;
use crate::utils::plural_count;
use crate::{debug, log};

/// What happened to a single page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PageOutcome {
    Unchanged,
    Changed { removed: usize },
    Skipped,
}

/// Execute strip command
pub fn run_strip(args: &StripArgs, config: &SiteConfig) -> Result<()> {
    if is_stdin(&args.paths) {
        return strip_stdin(config);
    }

    let output = config.build.output.as_deref();
    let files = collect_input_files(&args.paths, &config.build.input, output)?;

    let (pages, mut assets): (Vec<&InputFile>, Vec<&InputFile>) =
        files.iter().partition(|f| config.build.is_html(&f.path));
    // In-place runs leave everything that is not a page untouched
    if output.is_none() {
        assets.clear();
    }

    if pages.is_empty() && assets.is_empty() {
        log!("strip"; "no pages found");
        return Ok(());
    }

    if args.dry_run {
        log!("strip"; "dry run, nothing will be written");
    }

    let progress = ProgressLine::new("strip", &[("html", pages.len()), ("copy", assets.len())]);

    let outcomes = pages
        .par_iter()
        .map(|file| {
            let outcome = strip_page(file, config, args.dry_run);
            progress.inc("html");
            outcome
        })
        .collect::<Result<Vec<_>>>()?;

    if let Some(output) = output {
        assets.par_iter().try_for_each(|file| -> Result<()> {
            if !args.dry_run {
                copy_file(&file.path, &output.join(&file.rel))?;
            }
            progress.inc("copy");
            Ok(())
        })?;
    }

    progress.finish();
    report(&outcomes, args.dry_run);
    Ok(())
}

/// Filter stdin to stdout.
fn strip_stdin(config: &SiteConfig) -> Result<()> {
    let body = read_stdin()?;

    let pipeline = pipeline_for("/", config);
    let mut buffer = pipeline.buffer();
    buffer.write_all(&body)?;
    let body = buffer.finish();

    let mut stdout = io::stdout().lock();
    stdout.write_all(&body).context("Failed to write stdout")?;
    stdout.flush()?;
    Ok(())
}

fn strip_page(file: &InputFile, config: &SiteConfig, dry_run: bool) -> Result<PageOutcome> {
    let bytes =
        fs::read(&file.path).with_context(|| format!("Failed to read {}", file.path.display()))?;
    let dest = config.build.output.as_ref().map(|out| out.join(&file.rel));

    let html = match String::from_utf8(bytes) {
        Ok(html) => html,
        Err(err) => {
            log!("warning"; "skipping {}: not valid UTF-8", file.rel.display());
            if let Some(dest) = &dest
                && !dry_run
            {
                write_file(dest, err.as_bytes())?;
            }
            return Ok(PageOutcome::Skipped);
        }
    };

    let pipeline = pipeline_for(&file.url(), config);
    let rendered = pipeline.render(&html);

    let outcome = match &rendered {
        Cow::Borrowed(_) => PageOutcome::Unchanged,
        Cow::Owned(out) => PageOutcome::Changed {
            removed: scan(&html).total().saturating_sub(scan(out).total()),
        },
    };
    debug!("strip"; "{} {:?}", file.rel.display(), outcome);

    if dry_run {
        return Ok(outcome);
    }

    match (&dest, outcome) {
        (Some(dest), _) => write_file(dest, rendered.as_bytes())?,
        (None, PageOutcome::Changed { .. }) => write_file(&file.path, rendered.as_bytes())?,
        (None, _) => {}
    }

    Ok(outcome)
}

fn write_file(path: &Path, contents: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::write(path, contents).with_context(|| format!("Failed to write {}", path.display()))
}

fn copy_file(from: &Path, to: &Path) -> Result<()> {
    if let Some(parent) = to.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::copy(from, to).with_context(|| format!("Failed to copy {}", from.display()))?;
    Ok(())
}

fn report(outcomes: &[PageOutcome], dry_run: bool) {
    let mut changed = 0;
    let mut removed = 0;
    let mut skipped = 0;
    for outcome in outcomes {
        match outcome {
            PageOutcome::Changed { removed: n } => {
                changed += 1;
                removed += n;
            }
            PageOutcome::Skipped => skipped += 1,
            PageOutcome::Unchanged => {}
        }
    }

    let verb = if dry_run { "would change" } else { "changed" };
    log!(
        "strip";
        "{verb} {changed} of {}, removed {}",
        plural_count(outcomes.len(), "page"),
        plural_count(removed, "construct")
    );
    if skipped > 0 {
        log!("warning"; "skipped {}", plural_count(skipped, "non-UTF-8 page"));
    }
}
