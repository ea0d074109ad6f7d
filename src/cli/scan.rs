//! Scan command implementation.
//!
//! Reports the structured data each page carries, without changing anything.
//! Output is JSON: one entry per page plus site-wide totals.

use std::fs;
use std::io::Write;

use anyhow::{Context, Result};
use rayon::prelude::*;
use serde::Serialize;

use super::common::{InputFile, collect_input_files, is_stdin, read_stdin};
use crate::cli::ScanArgs;
use crate::config::SiteConfig;
use crate::log;
use crate::strip::{Findings, scan};
use crate::utils::plural_count;

/// Findings for a single page
#[derive(Debug, Serialize)]
pub struct FileReport {
    pub path: String,
    #[serde(flatten)]
    pub findings: Findings,
}

/// Result for a whole scan
#[derive(Debug, Serialize)]
pub struct ScanReport {
    pub files: Vec<FileReport>,
    pub total: Findings,
}

impl ScanReport {
    fn from_files(files: Vec<FileReport>) -> Self {
        let mut total = Findings::default();
        for file in &files {
            total += file.findings;
        }
        Self { files, total }
    }

    /// Drop pages without structured data. Totals are unaffected.
    fn retain_non_empty(&mut self) {
        self.files.retain(|f| !f.findings.is_empty());
    }
}

/// Execute scan command
pub fn run_scan(args: &ScanArgs, config: &SiteConfig) -> Result<()> {
    let mut report = if is_stdin(&args.paths) {
        let body = read_stdin()?;
        ScanReport::from_files(vec![FileReport {
            path: "-".to_string(),
            findings: scan(&String::from_utf8_lossy(&body)),
        }])
    } else {
        let files = collect_input_files(&args.paths, &config.build.input, None)?;
        let pages: Vec<_> = files
            .into_iter()
            .filter(|f| config.build.is_html(&f.path))
            .collect();
        log!("scan"; "scanning {}", plural_count(pages.len(), "page"));
        scan_files(&pages, config)?
    };

    let with_data = report.files.iter().filter(|f| !f.findings.is_empty()).count();
    log!(
        "scan";
        "found structured data in {} ({} total)",
        plural_count(with_data, "page"),
        plural_count(report.total.total(), "construct")
    );

    if args.filter_empty {
        report.retain_non_empty();
    }
    output_report(&report, args)
}

fn scan_files(pages: &[InputFile], config: &SiteConfig) -> Result<ScanReport> {
    let files = pages
        .par_iter()
        .map(|file| -> Result<FileReport> {
            let bytes = fs::read(&file.path)
                .with_context(|| format!("Failed to read {}", file.path.display()))?;
            Ok(FileReport {
                path: config.root_relative(&file.path).to_string_lossy().to_string(),
                findings: scan(&String::from_utf8_lossy(&bytes)),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(ScanReport::from_files(files))
}

// ============================================================================
// Output Formatting
// ============================================================================

fn format_report(report: &ScanReport, pretty: bool) -> Result<String> {
    let formatted = if pretty {
        serde_json::to_string_pretty(report)?
    } else {
        serde_json::to_string(report)?
    };
    Ok(formatted)
}

fn output_report(report: &ScanReport, args: &ScanArgs) -> Result<()> {
    let formatted = format_report(report, args.pretty)?;

    // Output to file or stdout
    if let Some(ref output_path) = args.output {
        let mut file = fs::File::create(output_path)
            .with_context(|| format!("Failed to create {}", output_path.display()))?;
        writeln!(file, "{}", formatted)?;
        log!("scan"; "wrote output to {}", output_path.display());
    } else {
        println!("{}", formatted);
    }

    Ok(())
}
