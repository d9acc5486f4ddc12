//! Byte-key helpers

/// Returns the smallest key that sorts strictly after `key`.
///
/// Appending a zero byte gives the immediate successor in lexicographic order.
pub fn next_row_key(key: &[u8]) -> Vec<u8> {
    let mut next = Vec::with_capacity(key.len() + 1);
    next.extend_from_slice(key);
    next.push(0);
    next
}

/// Renders bytes for logs and error messages.
///
/// Printable ASCII is kept as-is, everything else is written as `\xNN`.
pub fn printable(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    for &b in bytes {
        if b.is_ascii_graphic() || b == b' ' {
            out.push(b as char);
        } else {
            out.push_str(&format!("\\x{:02X}", b));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_row_key_sorts_after() {
        let key = b"1005".to_vec();
        let next = next_row_key(&key);
        assert!(next.as_slice() > key.as_slice());
        assert!(next.as_slice() < b"1005\x01".as_slice());
    }

    #[test]
    fn test_printable_escapes_binary() {
        assert_eq!(printable(b"row-1"), "row-1");
        assert_eq!(printable(&[b'a', 0x00, 0xFF]), "a\\x00\\xFF");
    }
}
