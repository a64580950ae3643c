//! Protocols flat-file transformer.
//!
//! Filters protocol-number records into `protocols(5)` lines:
//!
//! ```text
//! tcp              6 TCP            # Transmission Control
//! ```
//!
//! A record's name field sometimes lists several space-separated aliases;
//! only the first token is kept as the canonical alias, and its lowercased
//! form becomes the name column. Unlike the services transformer there is
//! no deduplication pass: protocol values are unique per registry, and a
//! registry that ever repeated one would show both lines.

use super::{is_ignored, parse_int_field};
use crate::atomic::AtomicFile;
use crate::error::{Error, Result};
use crate::registry::RegistryReader;
use chrono::NaiveDate;
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::Path;
use tracing::{debug, trace};

/// Streams protocol records from `reader` into `out` as a protocols database.
///
/// Returns the document's `updated` date for version computation. Fails if
/// the document is malformed, lacks an `updated` element, or a surviving
/// record's value does not parse.
pub fn write_protocols<R, W>(
    reader: &mut RegistryReader<R>,
    header: &str,
    out: &mut W,
) -> Result<NaiveDate>
where
    R: std::io::BufRead,
    W: Write,
{
    out.write_all(header.as_bytes())?;

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
        if is_ignored(name) {
            trace!("Skipping ignored protocol name: {:?}", name);
            continue;
        }
        let Some(value) = record.value.as_deref() else {
            continue;
        };
        let Some(alias) = name.split_whitespace().next() else {
            continue;
        };

        let name = alias.to_lowercase();
        let value = parse_int_field("value", value)?;

        // the alias keeps its registry casing, only the name column is lowered
        let assignment = format!("{value} {alias}");
        write!(out, "{name:<16} {assignment:<16}")?;
        if !desc.is_empty() && desc.chars().count() < 70 {
            write!(out, " # {}", desc.replace('\n', ""))?;
        }
        out.write_all(b"\n")?;
        emitted += 1;
    }

    debug!("Emitted {} protocol entries", emitted);
    reader.updated()
}

/// Converts a registry XML file into a protocols database at `dest`.
///
/// The destination is written atomically: on any failure it keeps its
/// previous content.
pub fn generate_protocols(source: &Path, dest: &Path, header: &str) -> Result<NaiveDate> {
    let file = File::open(source).map_err(|e| Error::file_read(source, e))?;
    let mut reader = RegistryReader::new(BufReader::new(file));
    let mut out = AtomicFile::create(dest)?;
    let updated = write_protocols(&mut reader, header, &mut out)?;
    out.commit()?;
    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const HEADER: &str = "# test header\n";

    fn run(records: &str) -> String {
        let xml = format!("<registry><updated>2024-04-01</updated>{records}</registry>");
        let mut reader = RegistryReader::new(xml.as_bytes());
        let mut out = Vec::new();
        let updated = write_protocols(&mut reader, HEADER, &mut out).unwrap();
        assert_eq!(updated, NaiveDate::from_ymd_opt(2024, 4, 1).unwrap());
        String::from_utf8(out).unwrap()
    }

    fn body(records: &str) -> String {
        run(records)
            .strip_prefix(HEADER)
            .expect("header comes first")
            .to_string()
    }

    #[test]
    fn test_tcp_example_line() {
        let out = body(
            "<record><name>TCP</name><value>6</value>\
             <description>Transmission Control</description></record>",
        );
        assert_eq!(out, "tcp              6 TCP            # Transmission Control\n");
    }

    #[test]
    fn test_alias_is_first_token_of_multi_word_name() {
        let out = body("<record><name>HMP Host Monitoring</name><value>20</value></record>");
        assert_eq!(out, "hmp              20 HMP          \n");
    }

    #[test]
    fn test_alias_keeps_registry_casing() {
        let out = body("<record><name>IPv6-ICMP</name><value>58</value></record>");
        assert_eq!(out, "ipv6-icmp        58 IPv6-ICMP    \n");
    }

    #[test]
    fn test_ignored_name_is_dropped() {
        let out = body(
            "<record><name>Reserved</name><value>255</value></record>\
             <record><name>Unassigned</name><value>144</value></record>",
        );
        assert_eq!(out, "");
    }

    #[test]
    fn test_ignored_description_is_dropped() {
        let out = body(
            "<record><name>old</name><value>9</value>\
             <description>deprecated in favor of something newer</description></record>",
        );
        assert_eq!(out, "");
    }

    #[test]
    fn test_records_missing_required_fields_are_dropped() {
        let out = body(
            "<record><value>6</value></record>\
             <record><name>novalue</name></record>",
        );
        assert_eq!(out, "");
    }

    #[test]
    fn test_no_deduplication() {
        let out = body(
            "<record><name>TCP</name><value>6</value></record>\
             <record><name>TCP</name><value>6</value></record>",
        );
        assert_eq!(
            out,
            "tcp              6 TCP           \ntcp              6 TCP           \n"
        );
    }

    #[test]
    fn test_comment_only_from_description() {
        let out = body("<record><name>UDP</name><value>17</value></record>");
        assert_eq!(out, "udp              17 UDP          \n");
    }

    #[test]
    fn test_unparsable_value_is_an_error() {
        let xml = "<registry><updated>2024-04-01</updated>\
                   <record><name>bad</name><value>six</value></record></registry>";
        let mut reader = RegistryReader::new(xml.as_bytes());
        let mut out = Vec::new();
        let err = write_protocols(&mut reader, HEADER, &mut out).unwrap_err();
        assert!(err.to_string().contains("six"));
    }

    #[test]
    fn test_generate_protocols_failure_preserves_existing_output() {
        let dir = tempfile::TempDir::new().unwrap();
        let source = dir.path().join("protocols.xml");
        let dest = dir.path().join("protocols");
        std::fs::write(&dest, "previous content").unwrap();
        std::fs::write(&source, "<registry></registry>").unwrap();

        assert!(generate_protocols(&source, &dest, HEADER).is_err());
        assert_eq!(std::fs::read_to_string(&dest).unwrap(), "previous content");
    }
}
