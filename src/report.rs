//! Persists the run's diagnostics as a JSON record keyed by site domain.

use crate::helpers::derive_domain;
use crate::models::{DiagnosticEvent, RunResult};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Default output root; files land at `console_error/site_url/<domain>.json`.
pub const DEFAULT_OUTPUT_ROOT: &str = "console_error";

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("failed to create output directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize run result: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Write the run result under `output_root`, unless no events were captured.
///
/// Returns the written path, or `None` when the run produced zero events (in
/// which case nothing is written at all). An existing file for the same
/// domain is overwritten.
pub fn persist(
    site_url: &str,
    events: Vec<DiagnosticEvent>,
    consent_clicked: bool,
    output_root: &Path,
) -> Result<Option<PathBuf>, ReportError> {
    if events.is_empty() {
        log::info!("No console errors captured");
        return Ok(None);
    }

    let domain = derive_domain(site_url);
    let output_dir = output_root.join("site_url");
    fs::create_dir_all(&output_dir).map_err(|source| ReportError::CreateDir {
        path: output_dir.clone(),
        source,
    })?;

    let result = RunResult {
        site_url: site_url.to_string(),
        domain: domain.clone(),
        scraped_at: chrono::Local::now().to_rfc3339(),
        gdpr_present: if consent_clicked { "TRUE" } else { "FALSE" }.to_string(),
        total_errors: events.len(),
        errors: events,
    };

    let path = output_dir.join(format!("{}.json", domain));
    let json = serde_json::to_string_pretty(&result)?;
    fs::write(&path, json).map_err(|source| ReportError::Write {
        path: path.clone(),
        source,
    })?;

    log::info!("Console errors saved to: {}", path.display());
    log::info!("Total errors captured: {}", result.total_errors);
    log::info!(
        "GDPR/Cookie consent detected: {}",
        if consent_clicked { "YES" } else { "NO" }
    );
    log_summary(&result.errors);

    Ok(Some(path))
}

/// Human-readable tally of event counts grouped by kind.
fn log_summary(events: &[DiagnosticEvent]) {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for event in events {
        *counts.entry(event.kind.to_string()).or_insert(0) += 1;
    }

    log::info!("Error summary:");
    for (kind, count) in counts {
        log::info!("  - {}: {}", kind, count);
    }
}
