//! Input Encoding Detection
//!
//! Documents arrive as raw bytes. UTF-8 (with or without BOM) is borrowed
//! as-is; UTF-16 detected by BOM or by the `<\0` / `\0<` pattern is
//! transcoded to an owned UTF-8 string, as is ISO-8859-1 when the XML
//! declaration names it.

use crate::error::ParseError;
use memchr::{memchr, memmem};
use std::borrow::Cow;

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XmlEncoding {
    Utf8,
    Utf16Le,
    Utf16Be,
    Latin1,
}

impl XmlEncoding {
    /// Detect encoding from byte order mark, initial bytes or declaration
    pub fn detect(input: &[u8]) -> Self {
        match input {
            [0xFF, 0xFE, ..] | [b'<', 0x00, ..] => XmlEncoding::Utf16Le,
            [0xFE, 0xFF, ..] | [0x00, b'<', ..] => XmlEncoding::Utf16Be,
            [0xEF, 0xBB, 0xBF, ..] => XmlEncoding::Utf8,
            _ => match declared_encoding(input) {
                Some(label) if is_latin1_label(label) => XmlEncoding::Latin1,
                _ => XmlEncoding::Utf8,
            },
        }
    }
}

/// Decode raw document bytes into UTF-8 text
pub fn decode_document(input: &[u8]) -> Result<Cow<'_, str>, ParseError> {
    match XmlEncoding::detect(input) {
        XmlEncoding::Utf8 => decode_utf8(input),
        XmlEncoding::Utf16Le => decode_utf16(input, &[0xFF, 0xFE], u16::from_le_bytes),
        XmlEncoding::Utf16Be => decode_utf16(input, &[0xFE, 0xFF], u16::from_be_bytes),
        XmlEncoding::Latin1 => Ok(Cow::Owned(input.iter().map(|&b| char::from(b)).collect())),
    }
}

fn decode_utf8(input: &[u8]) -> Result<Cow<'_, str>, ParseError> {
    let (prefix, body) = match input.strip_prefix(UTF8_BOM) {
        Some(body) => (UTF8_BOM.len(), body),
        None => {
            if let Some(label) = declared_encoding(input) {
                if !is_utf8_label(label) {
                    return Err(ParseError::new(
                        format!("unsupported encoding {}", String::from_utf8_lossy(label)),
                        0,
                    ));
                }
            }
            (0, input)
        }
    };

    std::str::from_utf8(body)
        .map(Cow::Borrowed)
        .map_err(|e| ParseError::new("invalid UTF-8 in document", prefix + e.valid_up_to()))
}

fn decode_utf16(
    input: &[u8],
    bom: &[u8],
    unit: fn([u8; 2]) -> u16,
) -> Result<Cow<'static, str>, ParseError> {
    let bytes = input.strip_prefix(bom).unwrap_or(input);
    if bytes.len() % 2 != 0 {
        return Err(ParseError::new("odd number of bytes in UTF-16 document", input.len()));
    }

    let code_units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| unit([pair[0], pair[1]]))
        .collect();

    String::from_utf16(&code_units)
        .map(Cow::Owned)
        .map_err(|_| ParseError::new("unpaired surrogate in UTF-16 document", 0))
}

/// Value of `encoding="..."` in a leading XML declaration
fn declared_encoding(input: &[u8]) -> Option<&[u8]> {
    let decl = input.strip_prefix(b"<?xml")?;
    let decl = &decl[..memmem::find(decl, b"?>")?];
    let rest = &decl[memmem::find(decl, b"encoding")? + b"encoding".len()..];

    let rest = rest.trim_ascii_start().strip_prefix(b"=")?.trim_ascii_start();
    let (&quote, value) = rest.split_first()?;
    if quote != b'"' && quote != b'\'' {
        return None;
    }
    Some(&value[..memchr(quote, value)?])
}

fn is_latin1_label(label: &[u8]) -> bool {
    ["ISO-8859-1", "ISO8859-1", "ISO_8859-1", "LATIN1", "L1"]
        .iter()
        .any(|name| label.eq_ignore_ascii_case(name.as_bytes()))
}

/// Labels whose bytes are read as UTF-8: UTF-8 itself and its ASCII subset.
/// UTF-16 labels are accepted too, since real UTF-16 input is caught by BOM
/// or byte pattern before the declaration is looked at.
fn is_utf8_label(label: &[u8]) -> bool {
    ["UTF-8", "UTF8", "US-ASCII", "ASCII", "UTF-16"]
        .iter()
        .any(|name| label.eq_ignore_ascii_case(name.as_bytes()))
}
