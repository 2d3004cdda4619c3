use core_types::InboundChunk;

/// Decode bytes as UTF-8, dropping invalid sequences instead of replacing them.
///
/// Returns the text and the number of bytes that were dropped. Unlike
/// `String::from_utf8_lossy` no U+FFFD is inserted, so a noisy line that
/// otherwise spells the request signal still matches.
pub fn decode_lossy(bytes: &[u8]) -> (String, usize) {
    let mut text = String::with_capacity(bytes.len());
    let mut discarded = 0;

    for chunk in bytes.utf8_chunks() {
        text.push_str(chunk.valid());
        discarded += chunk.invalid().len();
    }

    (text, discarded)
}

/// Wrap one poll's bytes into an [`InboundChunk`].
pub fn decode_chunk(bytes: Vec<u8>) -> InboundChunk {
    let (text, discarded) = decode_lossy(&bytes);
    InboundChunk {
        bytes,
        text,
        discarded,
    }
}

#[cfg(test)]
#[allow(clippy::panic, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_ascii() {
        let chunk = decode_chunk(b"GET_WEATHER\r\n".to_vec());
        assert_eq!(chunk.text, "GET_WEATHER\r\n");
        assert_eq!(chunk.discarded, 0);
        assert!(chunk.is_clean());
    }

    #[test]
    fn test_valid_multibyte() {
        let (text, discarded) = decode_lossy("收到icons：100".as_bytes());
        assert_eq!(text, "收到icons：100");
        assert_eq!(discarded, 0);
    }

    #[test]
    fn test_invalid_bytes_dropped() {
        let (text, discarded) = decode_lossy(b"GET_\xFFWEATHER\xFE\n");
        assert_eq!(text, "GET_WEATHER\n");
        assert_eq!(discarded, 2);
    }

    #[test]
    fn test_truncated_sequence_at_end() {
        // First two bytes of a three-byte sequence
        let (text, discarded) = decode_lossy(b"ok\xE6\x94");
        assert_eq!(text, "ok");
        assert_eq!(discarded, 2);
    }

    #[test]
    fn test_all_noise() {
        let chunk = decode_chunk(vec![0xFF, 0xFE, 0xFD]);
        assert!(chunk.text.is_empty());
        assert_eq!(chunk.discarded, 3);
        assert_eq!(chunk.bytes, vec![0xFF, 0xFE, 0xFD]);
    }
}
