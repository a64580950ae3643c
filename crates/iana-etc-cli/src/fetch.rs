//! Registry download.
//!
//! Thin collaborator around the conversion core: fetches a registry URL and
//! stores the raw bytes through an atomic write, so an interrupted download
//! never leaves a truncated XML file behind. No retries; transient network
//! failures abort the run.

use anyhow::{Context, Result};
use iana_etc_core::AtomicFile;
use std::path::Path;
use tracing::{debug, info};

/// Downloads `url` into `dest`, replacing it atomically on success.
pub fn download(url: &str, dest: &Path) -> Result<()> {
    info!("Fetching {}", url);
    let mut response = reqwest::blocking::get(url)
        .and_then(|response| response.error_for_status())
        .with_context(|| format!("request failed: {url}"))?;

    let mut out = AtomicFile::create(dest)?;
    let bytes = response
        .copy_to(&mut out)
        .with_context(|| format!("download interrupted: {url}"))?;
    out.commit()?;

    debug!("Stored {} bytes at {}", bytes, dest.display());
    Ok(())
}
