//! Services flat-file transformer.
//!
//! Filters port/service assignment records into `services(5)` lines:
//!
//! ```text
//! http             80/tcp     # Hypertext Transfer Protocol
//! ```
//!
//! Name column is 16 characters, assignment column 10; a description under
//! 70 characters becomes a trailing comment. Range assignments collapse to
//! their start port. Records are deduplicated on the formatted entry
//! string, first occurrence winning in registry order.

use super::{has_whitespace, is_ignored, parse_int_field};
use crate::atomic::AtomicFile;
use crate::error::{Error, Result};
use crate::registry::RegistryReader;
use chrono::NaiveDate;
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::Path;
use tracing::{debug, trace};

/// Streams service records from `reader` into `out` as a services database.
///
/// Returns the document's `updated` date for version computation. Fails if
/// the document is malformed, lacks an `updated` element, or a surviving
/// record's port number does not parse.
pub fn write_services<R, W>(
    reader: &mut RegistryReader<R>,
    header: &str,
    out: &mut W,
) -> Result<NaiveDate>
where
    R: std::io::BufRead,
    W: Write,
{
    out.write_all(header.as_bytes())?;

    let mut seen: HashSet<String> = HashSet::new();
    let mut emitted = 0usize;

    for record in reader.by_ref() {
        let record = record?;
        let desc = record.description.as_deref().unwrap_or("");
        if is_ignored(desc) {
            continue;
        }
        let Some(name) = record.name.as_deref() else {
            continue;
        };
        if has_whitespace(name) {
            trace!("Skipping service name with whitespace: {:?}", name);
            continue;
        }
        let Some(protocol) = record.protocol.as_deref() else {
            continue;
        };
        let Some(number) = record.number.as_deref() else {
            continue;
        };

        let name = name.to_lowercase().replace('_', "-");
        let protocol = protocol.to_lowercase();
        // a range assignment collapses to its start port
        let start = number.split('-').next().unwrap_or(number);
        let port = parse_int_field("number", start)?;

        let assignment = format!("{port}/{protocol}");
        let entry = format!("{name:<16} {assignment:<10}");

        if !seen.insert(entry.clone()) {
            debug!("Skipping duplicate service entry: {}", entry.trim_end());
            continue;
        }

        out.write_all(entry.as_bytes())?;
        if !desc.is_empty() && desc.chars().count() < 70 {
            write!(out, " # {}", desc.replace('\n', ""))?;
        }
        out.write_all(b"\n")?;
        emitted += 1;
    }

    debug!("Emitted {} service entries", emitted);
    reader.updated()
}

/// Converts a registry XML file into a services database at `dest`.
///
/// The destination is written atomically: on any failure it keeps its
/// previous content.
pub fn generate_services(source: &Path, dest: &Path, header: &str) -> Result<NaiveDate> {
    let file = File::open(source).map_err(|e| Error::file_read(source, e))?;
    let mut reader = RegistryReader::new(BufReader::new(file));
    let mut out = AtomicFile::create(dest)?;
    let updated = write_services(&mut reader, header, &mut out)?;
    out.commit()?;
    Ok(updated)
}
