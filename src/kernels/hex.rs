//! Hex rendering for binary payloads that must survive JSON serialization.

/// Renders arbitrary bytes as a `0x`-prefixed lowercase hex string.
pub fn blob_to_hex(bytes: &[u8]) -> String {
    format!("0x{}", ::hex::encode(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blob_to_hex() {
        assert_eq!(blob_to_hex(&[0x00, 0xab, 0x10]), "0x00ab10");
        assert_eq!(blob_to_hex(&[]), "0x");
    }
}
