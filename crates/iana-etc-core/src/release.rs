//! Release artifact packaging.
//!
//! Packages the two source XML files and the two generated databases into
//! `iana-etc-<version>.tar.gz`, where `<version>` is the later of the two
//! registry `updated` dates as `YYYYMMDD`. Every tar entry is written with
//! uid/gid 0, owner and group `root`, mtime 0, and mode 0644, and the gzip
//! header carries a zero mtime, so the archive bytes are a pure function of
//! the member names and contents. The SHA-256 of the finished archive goes
//! to a `.sha256` sidecar, and the bare version string to a stamp file for
//! downstream tooling.

use crate::atomic::AtomicFile;
use crate::error::{Error, Result};
use chrono::NaiveDate;
use flate2::{Compression, GzBuilder};
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Tar entry permission mode for every archive member
const MEMBER_MODE: u32 = 0o644;

/// A packaged release: the archive, its digest, and the version stamp
#[derive(Debug, Clone)]
pub struct Release {
    /// Release version, the later registry `updated` date as `YYYYMMDD`
    pub version: String,
    /// Path of the written `iana-etc-<version>.tar.gz`
    pub tarball: PathBuf,
    /// Hex SHA-256 digest of the archive bytes
    pub sha256: String,
}

/// Formats the release version from the two registry dates.
///
/// The later date wins.
pub fn version_string(services_updated: NaiveDate, protocols_updated: NaiveDate) -> String {
    services_updated
        .max(protocols_updated)
        .format("%Y%m%d")
        .to_string()
}

/// Builds `iana-etc-<version>.tar.gz` under `dist` from the member files,
/// writes the `.sha256` sidecar beside it, and returns the [`Release`].
///
/// Members keep their basenames under a shared `iana-etc-<version>/`
/// top-level directory, in the given order. Both the archive and the
/// sidecar are written atomically.
pub fn build_archive(dist: &Path, version: &str, members: &[PathBuf]) -> Result<Release> {
    let name = format!("iana-etc-{version}");
    let tarball = dist.join(format!("{name}.tar.gz"));

    let out = AtomicFile::create(&tarball)?;
    let encoder = GzBuilder::new().mtime(0).write(out, Compression::default());
    let mut builder = tar::Builder::new(encoder);
    for member in members {
        append_member(&mut builder, &name, member)?;
    }
    let out = builder
        .into_inner()
        .map_err(|e| Error::file_write(&tarball, e))?
        .finish()
        .map_err(|e| Error::file_write(&tarball, e))?;
    out.commit()?;
    debug!("Archive written to {}", tarball.display());

    let sha256 = sha256_file(&tarball)?;
    let sidecar_path = dist.join(format!("{name}.tar.gz.sha256"));
    let mut sidecar = AtomicFile::create(&sidecar_path)?;
    sidecar
        .write_all(sha256.as_bytes())
        .map_err(|e| Error::file_write(&sidecar_path, e))?;
    sidecar.commit()?;
    info!("Release {} packaged, sha256 {}", name, sha256);

    Ok(Release {
        version: version.to_string(),
        tarball,
        sha256,
    })
}

/// Appends one member file under `dir/` with fully normalized metadata
fn append_member<W: Write>(builder: &mut tar::Builder<W>, dir: &str, path: &Path) -> Result<()> {
    let basename = path.file_name().ok_or_else(|| {
        Error::internal(format!("member path has no file name: {}", path.display()))
    })?;
    let mut file = File::open(path).map_err(|e| Error::file_read(path, e))?;
    let len = file
        .metadata()
        .map_err(|e| Error::file_read(path, e))?
        .len();

    let mut header = tar::Header::new_gnu();
    header.set_size(len);
    header.set_mode(MEMBER_MODE);
    header.set_uid(0);
    header.set_gid(0);
    header.set_mtime(0);
    header.set_username("root")?;
    header.set_groupname("root")?;

    builder.append_data(&mut header, Path::new(dir).join(basename), &mut file)?;
    Ok(())
}

/// Hex SHA-256 digest of a file's contents
pub fn sha256_file(path: &Path) -> Result<String> {
    let file = File::open(path).map_err(|e| Error::file_read(path, e))?;
    let mut reader = BufReader::new(file);
    let mut hasher = Sha256::new();
    std::io::copy(&mut reader, &mut hasher).map_err(|e| Error::file_read(path, e))?;
    Ok(format!("{:x}", hasher.finalize()))
}

/// Atomically writes the bare version string to `path`
pub fn write_version_stamp(path: &Path, version: &str) -> Result<()> {
    let mut out = AtomicFile::create(path)?;
    out.write_all(version.as_bytes())
        .map_err(|e| Error::file_write(path, e))?;
    out.commit()
}
