//! Read-only report on a cache file pair (`prism inspect`).
//!
//! Runs the same validation the cache performs when it opens, but never
//! creates, truncates or deletes anything.

use std::collections::BTreeMap;

use prism_cache::store::{self, CacheSummary};
use prism_cache::CacheError;
use prism_common::ShaderKind;
use serde::Serialize;

use crate::target::{resolve_target, ResolvedTarget};
use crate::{GlobalArgs, InspectArgs, ReportFormat};

/// Outcome of inspecting one cache pair.
#[derive(Debug, Serialize)]
pub struct InspectReport {
    /// Index file path.
    pub index_path: String,
    /// Blob file path.
    pub blob_path: String,
    /// Configuration token of the pair.
    pub token: String,
    /// `valid`, `missing` or `invalid`.
    pub status: &'static str,
    /// Why the pair would be rebuilt on open.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub problem: Option<String>,
    /// Records in the index file.
    pub records: usize,
    /// Distinct entries.
    pub entries: usize,
    /// Entries per pipeline stage.
    pub kinds: BTreeMap<&'static str, usize>,
    /// Index file size.
    pub index_bytes: u64,
    /// Blob file size.
    pub blob_bytes: u64,
    /// Blob bytes covered by some entry.
    pub referenced_bytes: u64,
    /// Blob bytes no entry points at.
    pub unreferenced_bytes: u64,
}

impl InspectReport {
    fn new(target: &ResolvedTarget, scanned: Result<CacheSummary, CacheError>) -> Self {
        let mut report = Self {
            index_path: target.paths.index.display().to_string(),
            blob_path: target.paths.blob.display().to_string(),
            token: target.profile.token(),
            status: "valid",
            problem: None,
            records: 0,
            entries: 0,
            kinds: BTreeMap::new(),
            index_bytes: 0,
            blob_bytes: 0,
            referenced_bytes: 0,
            unreferenced_bytes: 0,
        };

        match scanned {
            Ok(summary) => {
                report.records = summary.records;
                report.entries = summary.index.len();
                for kind in ShaderKind::ALL {
                    report
                        .kinds
                        .insert(kind.name(), summary.index.count_kind(kind));
                }
                report.index_bytes = summary.index_bytes;
                report.blob_bytes = summary.blob_bytes;
                report.referenced_bytes = summary.index.referenced_bytes();
                report.unreferenced_bytes = summary.unreferenced_bytes();
            }
            Err(CacheError::Io { ref source, .. })
                if source.kind() == std::io::ErrorKind::NotFound =>
            {
                report.status = "missing";
            }
            Err(e) => {
                report.status = "invalid";
                report.problem = Some(e.to_string());
            }
        }
        report
    }

    fn render_text(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("   Index {}\n", self.index_path));
        out.push_str(&format!("    Blob {}\n", self.blob_path));
        out.push_str(&format!("   Token {}\n", self.token));
        out.push_str(&format!("  Status {}\n", self.status));
        if let Some(problem) = &self.problem {
            out.push_str(&format!(" Problem {problem}\n"));
        }
        if self.status == "valid" {
            out.push_str(&format!(
                " Entries {} ({} records)\n",
                self.entries, self.records
            ));
            for (kind, count) in &self.kinds {
                out.push_str(&format!("          {kind:<9} {count}\n"));
            }
            out.push_str(&format!(
                "   Bytes {} index, {} blob ({} referenced, {} unreferenced)\n",
                self.index_bytes,
                self.blob_bytes,
                self.referenced_bytes,
                self.unreferenced_bytes
            ));
        }
        out
    }
}

/// Runs the `prism inspect` command.
///
/// Returns exit code 0 for a valid pair and 1 for a missing or invalid one.
pub fn run(args: &InspectArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let target = resolve_target(&args.target, global)?;
    let report = InspectReport::new(&target, store::scan(&target.paths));

    match args.format {
        ReportFormat::Text => {
            if !global.quiet {
                print!("{}", report.render_text());
            }
        }
        ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    Ok(if report.status == "valid" { 0 } else { 1 })
}
