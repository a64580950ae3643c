//! Streaming reader for IANA registry XML documents.
//!
//! A registry document is a well-formed XML tree whose root has a descendant
//! `updated` element holding a `YYYY-MM-DD` date, and any number of
//! descendant `record` elements whose children (`description`, `name`,
//! `protocol`, `number`, `value`) describe one assignment each.
//!
//! [`RegistryReader`] walks the document once, forward-only, yielding one
//! [`Record`] per `record` element. Element tags are matched by local name,
//! so documents using a namespace prefix parse the same as unprefixed ones;
//! the prefix is stripped while handling each event rather than by mutating
//! parser state.
//!
//! A field element contributes only its leading text, the text before its
//! first child element. `<description>HTTP <xref data="rfc9110"/></description>`
//! therefore reads as `HTTP `, and nested markup never leaks into field
//! values.

use crate::error::{Error, Result};
use chrono::NaiveDate;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::io::BufRead;

/// One `record` element, flattened to the fields the transformers consume.
///
/// A field is `None` when the element is absent or empty, matching how the
/// transformers distinguish "no value" from text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    /// Human-readable assignment description
    pub description: Option<String>,
    /// Assigned service or protocol name
    pub name: Option<String>,
    /// Transport protocol (services registry)
    pub protocol: Option<String>,
    /// Port number or range (services registry)
    pub number: Option<String>,
    /// Protocol number (protocols registry)
    pub value: Option<String>,
}

/// Record fields recognized inside a `record` element
#[derive(Debug, Clone, Copy)]
enum Field {
    Description,
    Name,
    Protocol,
    Number,
    Value,
}

impl Field {
    fn from_tag(tag: &[u8]) -> Option<Self> {
        match tag {
            b"description" => Some(Field::Description),
            b"name" => Some(Field::Name),
            b"protocol" => Some(Field::Protocol),
            b"number" => Some(Field::Number),
            b"value" => Some(Field::Value),
            _ => None,
        }
    }
}

impl Record {
    fn set(&mut self, field: Field, text: String) {
        let slot = match field {
            Field::Description => &mut self.description,
            Field::Name => &mut self.name,
            Field::Protocol => &mut self.protocol,
            Field::Number => &mut self.number,
            Field::Value => &mut self.value,
        };
        *slot = Some(text);
    }
}

/// What the iteration loop does with an opening tag
#[derive(Debug, Clone, Copy)]
enum Open {
    Record,
    Updated,
}

/// Single-pass iterator over the records of one registry document.
///
/// Yields `Result<Record>`; the first malformed-XML error ends iteration.
/// After the document has been consumed, [`RegistryReader::updated`] returns
/// the date of the first `updated` element seen, or a
/// [`Error::MalformedDocument`] if the document has none.
pub struct RegistryReader<R: BufRead> {
    reader: Reader<R>,
    buf: Vec<u8>,
    updated: Option<NaiveDate>,
    done: bool,
}

impl<R: BufRead> RegistryReader<R> {
    /// Creates a reader over a registry XML byte stream
    pub fn new(source: R) -> Self {
        Self {
            reader: Reader::from_reader(source),
            buf: Vec::new(),
            updated: None,
            done: false,
        }
    }

    /// The document's `updated` date.
    ///
    /// Call after the record iterator has been exhausted; the date is
    /// captured while streaming past the element.
    pub fn updated(&self) -> Result<NaiveDate> {
        self.updated
            .ok_or_else(|| Error::malformed_document("no <updated> element found"))
    }

    fn read_event(&mut self) -> Result<Event<'_>> {
        self.buf.clear();
        self.reader
            .read_event_into(&mut self.buf)
            .map_err(|e| Error::malformed_document(e.to_string()))
    }

    /// Parses the subtree of an already-opened `updated` element
    fn read_updated(&mut self) -> Result<()> {
        let text = self.read_leading_text()?;
        let trimmed = text.trim();
        let date = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
            .map_err(|e| Error::invalid_date(trimmed, e))?;
        self.updated = Some(date);
        Ok(())
    }

    /// Parses the subtree of an already-opened `record` element
    fn read_record(&mut self) -> Result<Record> {
        let mut record = Record::default();
        loop {
            let event = self.read_event()?;
            let field = match event {
                Event::Start(ref e) => Field::from_tag(e.local_name().as_ref()),
                Event::Empty(_) => continue,
                Event::End(_) => return Ok(record),
                Event::Eof => {
                    return Err(Error::malformed_document(
                        "unexpected end of document inside <record>",
                    ))
                }
                _ => continue,
            };
            match field {
                Some(field) => {
                    let text = self.read_leading_text()?;
                    if !text.is_empty() {
                        record.set(field, text);
                    }
                }
                None => self.skip_subtree()?,
            }
        }
    }

    /// Collects the leading text of the element whose start tag was just
    /// consumed: text up to its first child element, with the rest of the
    /// subtree skipped.
    fn read_leading_text(&mut self) -> Result<String> {
        let mut text = String::new();
        let mut depth = 0usize;
        let mut capture = true;
        loop {
            match self.read_event()? {
                Event::Start(_) => {
                    capture = false;
                    depth += 1;
                }
                Event::Empty(_) => capture = false,
                Event::End(_) => {
                    if depth == 0 {
                        return Ok(text);
                    }
                    depth -= 1;
                }
                Event::Text(t) if capture && depth == 0 => {
                    let unescaped = t
                        .unescape()
                        .map_err(|e| Error::malformed_document(e.to_string()))?;
                    text.push_str(&unescaped);
                }
                Event::CData(c) if capture && depth == 0 => {
                    text.push_str(&String::from_utf8_lossy(&c.into_inner()));
                }
                Event::Eof => {
                    return Err(Error::malformed_document("unexpected end of document"))
                }
                _ => {}
            }
        }
    }

    /// Consumes the rest of the element whose start tag was just consumed
    fn skip_subtree(&mut self) -> Result<()> {
        let mut depth = 0usize;
        loop {
            match self.read_event()? {
                Event::Start(_) => depth += 1,
                Event::End(_) => {
                    if depth == 0 {
                        return Ok(());
                    }
                    depth -= 1;
                }
                Event::Eof => {
                    return Err(Error::malformed_document("unexpected end of document"))
                }
                _ => {}
            }
        }
    }
}

impl<R: BufRead> Iterator for RegistryReader<R> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        loop {
            let event = match self.read_event() {
                Ok(event) => event,
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            };
            let open = match event {
                Event::Start(ref e) => match e.local_name().as_ref() {
                    b"record" => Some(Open::Record),
                    b"updated" => Some(Open::Updated),
                    _ => None,
                },
                Event::Eof => {
                    self.done = true;
                    return None;
                }
                _ => None,
            };
            match open {
                Some(Open::Record) => {
                    let result = self.read_record();
                    if result.is_err() {
                        self.done = true;
                    }
                    return Some(result);
                }
                // only the first updated element counts; later ones stream
                // past as ignored events
                Some(Open::Updated) if self.updated.is_none() => {
                    if let Err(e) = self.read_updated() {
                        self.done = true;
                        return Some(Err(e));
                    }
                }
                _ => {}
            }
        }
    }
}
