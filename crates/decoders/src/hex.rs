/// Maximum length of the hex column before it is truncated with `...`.
const MAX_HEX_LEN: usize = 50;

/// Render bytes as `"0A 1B FF"` followed by a printable-ASCII column.
///
/// Used for debug logging of raw link traffic, where line endings and
/// undecodable bytes must stay visible.
pub fn hex_dump(bytes: &[u8]) -> String {
    let hex_str = bytes
        .iter()
        .map(|b| format!("{:02X}", b))
        .collect::<Vec<String>>()
        .join(" ");

    // Replace non-printable with '.'
    let ascii_str: String = bytes
        .iter()
        .map(|&b| {
            if (32..=126).contains(&b) {
                b as char
            } else {
                '.'
            }
        })
        .collect();

    let hex_col = match hex_str.get(..MAX_HEX_LEN - 3) {
        Some(head) if hex_str.len() > MAX_HEX_LEN => format!("{}...", head),
        _ => hex_str,
    };

    format!("[{}] {} |{}|", bytes.len(), hex_col, ascii_str)
}

#[cfg(test)]
#[allow(clippy::panic, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_dump() {
        assert_eq!(hex_dump(&[0x41, 0x42, 0x00, 0xFF]), "[4] 41 42 00 FF |AB..|");
    }

    #[test]
    fn test_hex_dump_empty() {
        assert_eq!(hex_dump(&[]), "[0]  ||");
    }

    #[test]
    fn test_hex_dump_line_ending_visible() {
        assert_eq!(hex_dump(b"hi\r\n"), "[4] 68 69 0D 0A |hi..|");
    }

    #[test]
    fn test_hex_dump_long_truncation() {
        let dump = hex_dump(&[0xAA; 50]);
        assert!(dump.starts_with("[50] AA AA"));
        let hex_col = dump.split(" |").next().unwrap();
        assert!(hex_col.ends_with("..."));
    }
}
