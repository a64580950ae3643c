//! iana-etc - generate services(5) and protocols(5) databases from the IANA registries
//!
//! This tool downloads the two IANA registry XML documents, converts them
//! into the flat-file databases, and packages everything into a
//! reproducible, content-addressed release archive.

mod fetch;

use anyhow::{Context, Result};
use clap::Parser;
use iana_etc_core::{release, transform, Config, Release};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, Level};
use tracing_subscriber::EnvFilter;

/// Generate services(5) and protocols(5) databases from the IANA registries
#[derive(Parser, Debug)]
#[command(name = "iana-etc")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Destination directory for downloaded sources and the generated release
    dest: PathBuf,

    /// Override the services registry URL (e.g. a local mirror)
    #[arg(long, value_name = "URL")]
    services_url: Option<String>,

    /// Override the protocols registry URL
    #[arg(long, value_name = "URL")]
    protocols_url: Option<String>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_target(false)
        .init();

    let mut config = Config::default();
    if let Some(url) = cli.services_url {
        config.services.url = url;
    }
    if let Some(url) = cli.protocols_url {
        config.protocols.url = url;
    }

    let dist = cli.dest.join("dist");
    fs::create_dir_all(&dist)
        .with_context(|| format!("failed to create directory: {}", dist.display()))?;

    let services_xml = cli.dest.join(&config.services.xml_filename);
    let protocols_xml = cli.dest.join(&config.protocols.xml_filename);
    fetch::download(&config.services.url, &services_xml)
        .context("could not download iana service names and port numbers")?;
    fetch::download(&config.protocols.url, &protocols_xml)
        .context("could not download iana protocol numbers")?;

    let artifacts = package_release(&cli.dest, &dist, &config, &services_xml, &protocols_xml)?;
    info!(
        "Release {} written to {}",
        artifacts.version,
        artifacts.tarball.display()
    );
    Ok(())
}

/// Converts the downloaded registries and packages the release artifacts.
///
/// Produces the two flat files under `dist`, the archive with its `.sha256`
/// sidecar, and the `.version` stamp at the destination root.
fn package_release(
    dest: &Path,
    dist: &Path,
    config: &Config,
    services_xml: &Path,
    protocols_xml: &Path,
) -> Result<Release> {
    let services_file = dist.join(&config.services.output_filename);
    let services_updated =
        transform::generate_services(services_xml, &services_file, &config.services.header)
            .context("generating services database")?;

    let protocols_file = dist.join(&config.protocols.output_filename);
    let protocols_updated =
        transform::generate_protocols(protocols_xml, &protocols_file, &config.protocols.header)
            .context("generating protocols database")?;

    let version = release::version_string(services_updated, protocols_updated);
    let members = [
        services_xml.to_path_buf(),
        services_file,
        protocols_xml.to_path_buf(),
        protocols_file,
    ];
    let artifacts =
        release::build_archive(dist, &version, &members).context("building release archive")?;
    release::write_version_stamp(&dest.join(".version"), &version)
        .context("writing version stamp")?;
    Ok(artifacts)
}
