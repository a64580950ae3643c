//! # iana-etc-core
//!
//! A library for converting IANA's published registries into the
//! `services(5)` and `protocols(5)` flat-file databases.
//!
//! This crate provides the core functionality for:
//! - Streaming records out of the registry XML documents
//! - Filtering and reformatting them into whitespace-column flat files
//! - Packaging a reproducible, content-addressed release archive
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`registry`]: Streaming, namespace-agnostic registry XML reading
//! - [`transform`]: Services and protocols flat-file generation
//! - [`release`]: Deterministic tar.gz packaging, hashing, version stamp
//! - [`atomic`]: Atomic file replacement
//! - [`config`]: Explicit pipeline configuration
//! - [`error`]: Error types and handling
//!
//! ## Example
//!
//! ```no_run
//! use iana_etc_core::{release, transform, Config};
//! use std::path::Path;
//!
//! let config = Config::default();
//! let dist = Path::new("out/dist");
//!
//! // Convert previously downloaded registry XML into the flat files
//! let services_updated = transform::generate_services(
//!     Path::new("out/service-names-port-numbers.xml"),
//!     &dist.join(&config.services.output_filename),
//!     &config.services.header,
//! )?;
//! let protocols_updated = transform::generate_protocols(
//!     Path::new("out/protocol-numbers.xml"),
//!     &dist.join(&config.protocols.output_filename),
//!     &config.protocols.header,
//! )?;
//!
//! // Package the release archive, digest, and version stamp
//! let version = release::version_string(services_updated, protocols_updated);
//! # Ok::<(), iana_etc_core::Error>(())
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unreachable_pub)]

pub mod atomic;
pub mod config;
pub mod error;
pub mod registry;
pub mod release;
pub mod transform;

// Re-export primary types for convenience
pub use atomic::AtomicFile;
pub use config::{Config, RegistrySpec};
pub use error::{Error, Result};
pub use registry::{Record, RegistryReader};
pub use release::{build_archive, sha256_file, version_string, write_version_stamp, Release};
pub use transform::{generate_protocols, generate_services};

/// Crate version for programmatic access
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
