//! XML Entity Decoding
//!
//! Handles the predefined entities (`&lt; &gt; &amp; &quot; &apos;`) and
//! numeric character references (`&#123; &#x7B;`). Anything else, including
//! references to DTD-declared entities and references to characters XML does
//! not allow, passes through verbatim.
//!
//! Literal line breaks are normalized on the way: `\r\n` and a lone `\r`
//! become `\n`. In attribute values every literal tab, CR or LF becomes a
//! space. Characters produced by references are never normalized.
//!
//! Uses Cow for zero-copy when nothing needs rewriting.

use memchr::{memchr, memchr2, memchr3};
use std::borrow::Cow;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Context {
    Text,
    Attribute,
}

impl Context {
    /// Next byte that needs rewriting
    #[inline]
    fn find_special(self, bytes: &[u8]) -> Option<usize> {
        match self {
            Context::Text => memchr2(b'&', b'\r', bytes),
            Context::Attribute => match (memchr3(b'&', b'\r', b'\n', bytes), memchr(b'\t', bytes)) {
                (Some(a), Some(b)) => Some(a.min(b)),
                (a, b) => a.or(b),
            },
        }
    }

    #[inline]
    fn line_break(self) -> char {
        match self {
            Context::Text => '\n',
            Context::Attribute => ' ',
        }
    }
}

/// Decode character data
///
/// Returns Borrowed if there is no '&' or '\r'.
#[inline]
pub fn decode_text(input: &str) -> Cow<'_, str> {
    decode(input, Context::Text)
}

/// Decode an attribute value, mapping literal whitespace to spaces
#[inline]
pub fn decode_attribute(input: &str) -> Cow<'_, str> {
    decode(input, Context::Attribute)
}

/// Line-ending normalization only, for CDATA sections
#[inline]
pub fn normalize_line_endings(input: &str) -> Cow<'_, str> {
    if memchr(b'\r', input.as_bytes()).is_none() {
        return Cow::Borrowed(input);
    }
    Cow::Owned(input.replace("\r\n", "\n").replace('\r', "\n"))
}

fn decode(input: &str, context: Context) -> Cow<'_, str> {
    let bytes = input.as_bytes();
    let Some(first) = context.find_special(bytes) else {
        return Cow::Borrowed(input);
    };

    let mut result = String::with_capacity(input.len());
    let mut pos = 0;
    let mut next = Some(first);

    while let Some(found) = next {
        let at = pos + found;
        result.push_str(&input[pos..at]);

        pos = match bytes[at] {
            b'&' => {
                let decoded = memchr(b';', &bytes[at..])
                    .and_then(|semi| decode_entity(&input[at + 1..at + semi]).map(|c| (c, at + semi + 1)));
                match decoded {
                    Some((c, after)) => {
                        result.push(c);
                        after
                    }
                    None => {
                        result.push('&');
                        at + 1
                    }
                }
            }
            b'\r' => {
                result.push(context.line_break());
                if bytes.get(at + 1) == Some(&b'\n') {
                    at + 2
                } else {
                    at + 1
                }
            }
            // '\n' or '\t' inside an attribute value
            _ => {
                result.push(' ');
                at + 1
            }
        };
        next = context.find_special(&bytes[pos..]);
    }

    result.push_str(&input[pos..]);
    Cow::Owned(result)
}

/// Decode a single entity body (without '&' and ';')
fn decode_entity(entity: &str) -> Option<char> {
    match entity {
        "lt" => Some('<'),
        "gt" => Some('>'),
        "amp" => Some('&'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        _ => decode_numeric(entity.strip_prefix('#')?),
    }
}

fn decode_numeric(reference: &str) -> Option<char> {
    let codepoint = match reference.strip_prefix(['x', 'X']) {
        Some(hex) => u32::from_str_radix(hex, 16).ok()?,
        None => reference.parse::<u32>().ok()?,
    };
    char::from_u32(codepoint).filter(|&c| is_xml_char(c))
}

/// `Char` production of XML 1.0: tab, LF, CR and everything from U+0020
/// except U+FFFE and U+FFFF (surrogates are not `char`s)
#[inline]
fn is_xml_char(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r' | '\u{20}'..='\u{FFFD}' | '\u{10000}'..='\u{10FFFF}')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_entities() {
        let result = decode_text("Hello, World!");
        assert!(matches!(result, Cow::Borrowed(_)));
        assert_eq!(result, "Hello, World!");
    }

    #[test]
    fn test_predefined_entities() {
        let result = decode_text("&lt;hello&gt; &amp; &quot;world&quot; &apos;");
        assert_eq!(result, "<hello> & \"world\" '");
    }

    #[test]
    fn test_numeric_references() {
        assert_eq!(decode_text("&#65;&#x42;&#X43;"), "ABC");
        assert_eq!(decode_text("&#x1F600;"), "😀");
    }

    #[test]
    fn test_unknown_entity_passes_through() {
        assert_eq!(decode_text("&nbsp;x"), "&nbsp;x");
        assert_eq!(decode_text("&#xZZ;"), "&#xZZ;");
    }

    #[test]
    fn test_bare_ampersand() {
        assert_eq!(decode_text("fish & chips"), "fish & chips");
        assert_eq!(decode_text("a &amp b;"), "a &amp b;");
    }

    #[test]
    fn test_surrogate_codepoint_is_not_decoded() {
        assert_eq!(decode_text("&#xD800;"), "&#xD800;");
    }

    #[test]
    fn test_disallowed_characters_pass_through() {
        assert_eq!(decode_text("a&#0;b"), "a&#0;b");
        assert_eq!(decode_text("&#x1B;&#xFFFE;&#xFFFF;"), "&#x1B;&#xFFFE;&#xFFFF;");
        assert_eq!(decode_text("&#9;&#10;&#x10FFFF;"), "\t\n\u{10FFFF}");
    }

    #[test]
    fn test_text_line_endings() {
        assert_eq!(decode_text("a\r\nb\rc\nd"), "a\nb\nc\nd");
        assert_eq!(decode_text("x\r\n\r\n"), "x\n\n");
        assert!(matches!(decode_text("a\nb"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_attribute_whitespace() {
        assert_eq!(decode_attribute("1\r\n2\t3\n4"), "1 2 3 4");
        assert_eq!(decode_attribute("a\rb"), "a b");
        assert!(matches!(decode_attribute("plain value"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_referenced_whitespace_is_kept() {
        assert_eq!(decode_attribute("a&#10;b&#13;c&#9;"), "a\nb\rc\t");
        assert_eq!(decode_text("a&#13;\r\nb"), "a\r\nb");
    }

    #[test]
    fn test_cdata_line_endings() {
        assert_eq!(normalize_line_endings("a\r\nb\rc"), "a\nb\nc");
        assert!(matches!(normalize_line_endings("a\nb"), Cow::Borrowed(_)));
    }
}
