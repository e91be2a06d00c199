//! Incremental UTF-8 decoding of a chunked byte stream.
//!
//! Network chunks can end in the middle of a multi-byte character. The
//! decoder holds back the incomplete tail and prepends it to the next
//! chunk so the text that comes out is identical no matter where the
//! chunk boundaries fall.

use super::error::DecodeError;

#[derive(Debug, Default)]
pub struct Utf8Decoder {
    pending: Vec<u8>,
}

impl Utf8Decoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode the next chunk, appending the complete text to `out`. The
    /// appended text may be empty when the chunk only continues a
    /// pending sequence.
    ///
    /// On an invalid sequence the text before it is still appended
    /// before the error is returned.
    pub fn decode(&mut self, chunk: &[u8], out: &mut String) -> Result<(), DecodeError> {
        let mut buf = std::mem::take(&mut self.pending);
        buf.extend_from_slice(chunk);

        let (valid_up_to, invalid) = match std::str::from_utf8(&buf) {
            Ok(_) => (buf.len(), None),
            Err(e) => (e.valid_up_to(), e.error_len()),
        };

        // The prefix was just validated, this cannot fail
        if let Ok(text) = std::str::from_utf8(&buf[..valid_up_to]) {
            out.push_str(text);
        }

        match invalid {
            Some(len) => Err(DecodeError::Invalid {
                offset: valid_up_to,
                len,
            }),
            None => {
                self.pending = buf.split_off(valid_up_to);
                Ok(())
            }
        }
    }

    /// Signal the end of input. Any held back bytes can never form a
    /// character anymore.
    pub fn finish(self) -> Result<(), DecodeError> {
        if self.pending.is_empty() {
            Ok(())
        } else {
            Err(DecodeError::Truncated {
                bytes: self.pending.len(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode_chunks(chunks: &[&[u8]]) -> String {
        let mut decoder = Utf8Decoder::new();
        let mut out = String::new();
        for chunk in chunks {
            decoder.decode(chunk, &mut out).unwrap();
        }
        decoder.finish().unwrap();
        out
    }

    #[test]
    fn test_decode_ascii() {
        assert_eq!(decode_chunks(&[b"hello ", b"world"]), "hello world");
    }

    #[test]
    fn test_multibyte_split_mid_sequence() {
        // "é" is 0xC3 0xA9
        let mut decoder = Utf8Decoder::new();
        let mut out = String::new();
        decoder.decode(&[b'a', 0xC3], &mut out).unwrap();
        assert_eq!(out, "a");
        decoder.decode(&[0xA9, b'b'], &mut out).unwrap();
        assert_eq!(out, "aéb");
        decoder.finish().unwrap();
    }

    #[test]
    fn test_four_byte_char_one_byte_at_a_time() {
        let text = "ok 🦀 done";
        let bytes = text.as_bytes();
        let chunks: Vec<&[u8]> = bytes.chunks(1).collect();
        assert_eq!(decode_chunks(&chunks), text);
    }

    #[test]
    fn test_every_split_point_matches_whole() {
        let text = "Grüße, 世界! ünïcödé 🎉 end";
        let bytes = text.as_bytes();
        for a in 0..=bytes.len() {
            for b in a..=bytes.len() {
                let chunks = [&bytes[..a], &bytes[a..b], &bytes[b..]];
                assert_eq!(decode_chunks(&chunks), text, "split at {a} and {b}");
            }
        }
    }

    #[test]
    fn test_invalid_byte_is_an_error() {
        let mut decoder = Utf8Decoder::new();
        let mut out = String::new();
        let err = decoder.decode(&[b'a', 0xFF, b'b'], &mut out).unwrap_err();
        assert_eq!(err, DecodeError::Invalid { offset: 1, len: 1 });
    }

    #[test]
    fn test_invalid_byte_keeps_text_before_it() {
        let mut decoder = Utf8Decoder::new();
        let mut out = String::new();
        decoder.decode(&[b'o', 0xC3], &mut out).unwrap();
        let err = decoder.decode(&[0xA9, b'k', 0xFF], &mut out).unwrap_err();
        assert_eq!(out, "oék");
        assert_eq!(err, DecodeError::Invalid { offset: 3, len: 1 });
    }

    #[test]
    fn test_truncated_at_end_is_an_error() {
        let mut decoder = Utf8Decoder::new();
        let mut out = String::new();
        decoder.decode(&[0xE4, 0xB8], &mut out).unwrap();
        assert_eq!(out, "");
        assert_eq!(
            decoder.finish().unwrap_err(),
            DecodeError::Truncated { bytes: 2 }
        );
    }
}
