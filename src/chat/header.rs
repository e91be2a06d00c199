//! Out-of-band conversation id header.
//!
//! When the server creates a conversation for a turn it writes
//! `conversation_id:<digits>\n` before the first byte of model output.
//! There is no other framing in the stream.

use std::sync::LazyLock;

use regex::Regex;

static HEADER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\Aconversation_id:([0-9]+)\n").expect("Invalid header regex"));

#[derive(Debug, PartialEq, Eq)]
pub struct Header {
    pub conversation_id: i64,
    /// Length in bytes of the matched prefix including the newline
    pub len: usize,
}

/// Match the header anchored at the start of `text`. A value that does
/// not fit an `i64` is treated as ordinary text.
pub fn parse_header(text: &str) -> Option<Header> {
    let caps = HEADER_RE.captures(text)?;
    let whole = caps.get(0)?;
    let conversation_id = caps.get(1)?.as_str().parse::<i64>().ok()?;
    Some(Header {
        conversation_id,
        len: whole.end(),
    })
}

/// Format a header the way the server writes it.
pub fn format_header(conversation_id: i64) -> String {
    format!("conversation_id:{}\n", conversation_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_header() {
        let header = parse_header("conversation_id:42\nHello").unwrap();
        assert_eq!(header.conversation_id, 42);
        assert_eq!(&"conversation_id:42\nHello"[header.len..], "Hello");
    }

    #[test]
    fn test_header_only() {
        let header = parse_header("conversation_id:7\n").unwrap();
        assert_eq!(header.len, "conversation_id:7\n".len());
    }

    #[test]
    fn test_header_must_be_anchored() {
        assert!(parse_header(" conversation_id:42\nHello").is_none());
        assert!(parse_header("Hi\nconversation_id:42\n").is_none());
    }

    #[test]
    fn test_header_requires_newline_and_digits() {
        assert!(parse_header("conversation_id:42").is_none());
        assert!(parse_header("conversation_id:\n").is_none());
        assert!(parse_header("conversation_id:4a\n").is_none());
        assert!(parse_header("conversation_id: 42\n").is_none());
    }

    #[test]
    fn test_overflowing_id_is_not_a_header() {
        assert!(parse_header("conversation_id:99999999999999999999999\nHi").is_none());
    }

    #[test]
    fn test_format_header_matches_parser() {
        let header = parse_header(&format_header(1234)).unwrap();
        assert_eq!(header.conversation_id, 1234);
    }
}
