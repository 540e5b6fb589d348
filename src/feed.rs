// file: feed.rs
// Purpose: Parses the closings XML feed into a FeedSnapshot.

use std::borrow::Cow;

use encoding_rs::{Encoding, UTF_8};
use log::debug;
use roxmltree::{Document, Node, ParsingOptions};

use crate::document::{ClosingRecord, FeedSnapshot};
use crate::errors::ClosingsError;

pub const RUN_DATE_TAG: &str = "RUN_DATE";
pub const RECORD_TAG: &str = "RECORD";
pub const ORGANIZATION_TAG: &str = "FORCED_ORGANIZATION_NAME";
pub const STATUS_TAG: &str = "FORCED_STATUS_NAME";

/// Parses the raw feed body.
///
/// `RUN_DATE` must be a direct child of the root element. Records are every `RECORD`
/// element below the root, in document order, and each must carry both the organization
/// and the status child elements. Any error aborts the whole parse.
pub fn parse_feed_bytes(raw: &[u8]) -> Result<FeedSnapshot, ClosingsError> {
    let text = decode_feed(raw)?;
    let options = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    let doc = Document::parse_with_options(&text, options)?;
    let root = doc.root_element();

    let run_date = child_text(root, RUN_DATE_TAG)?;

    let mut records = Vec::new();
    for node in root
        .descendants()
        .filter(|node| *node != root && node.has_tag_name(RECORD_TAG))
    {
        records.push(ClosingRecord {
            organization_name: child_text(node, ORGANIZATION_TAG)?,
            status_name: child_text(node, STATUS_TAG)?,
        });
    }
    debug!("Parsed {} closing records, feed run date: {}", records.len(), run_date);

    Ok(FeedSnapshot { run_date, records })
}

fn child_text(parent: Node, tag: &str) -> Result<String, ClosingsError> {
    parent
        .children()
        .find(|child| child.has_tag_name(tag))
        .map(|child| child.text().unwrap_or_default().to_string())
        .ok_or_else(|| ClosingsError::MissingElement(tag.to_string()))
}

/// Decodes the body with the charset named in the xml declaration, UTF-8 otherwise.
fn decode_feed(raw: &[u8]) -> Result<Cow<'_, str>, ClosingsError> {
    let raw = strip_bom(raw);
    let encoding = match declared_encoding(raw) {
        Some(label) => Encoding::for_label(label).unwrap_or_else(|| {
            debug!("Unknown feed encoding {}, decoding as UTF-8", String::from_utf8_lossy(label));
            UTF_8
        }),
        None => UTF_8,
    };
    encoding
        .decode_without_bom_handling_and_without_replacement(raw)
        .ok_or_else(|| ClosingsError::Encoding(encoding.name().to_string()))
}

/// The `encoding="..."` value of a leading `<?xml ... ?>` declaration.
fn declared_encoding(raw: &[u8]) -> Option<&[u8]> {
    let rest = raw.strip_prefix(b"<?xml")?;
    let decl_end = rest.windows(2).position(|window| window == b"?>")?;
    let decl = &rest[..decl_end];
    let attr_start = decl.windows(8).position(|window| window == b"encoding")? + 8;
    let value = decl[attr_start..].trim_ascii_start().strip_prefix(b"=")?.trim_ascii_start();
    let quote = *value.first()?;
    if quote != b'"' && quote != b'\'' {
        return None;
    }
    let value = &value[1..];
    let value_end = value.iter().position(|byte| *byte == quote)?;
    Some(&value[..value_end])
}

fn strip_bom(raw: &[u8]) -> &[u8] {
    raw.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(raw)
}
