//! This module contains the pure, stateless kernel for decoding packed curve
//! payloads from vector log storage.
//!
//! Layout: a 2-byte header followed by consecutive little-endian IEEE-754
//! `f32` samples. Trailing bytes that do not fill a whole sample are ignored.
//! This module is panic-free.

/// Size of the header that precedes the first sample.
pub const CURVE_HEADER_LEN: usize = 2;

const SAMPLE_LEN: usize = std::mem::size_of::<f32>();

/// Decodes a curve payload.
///
/// An empty payload decodes to an empty curve. A payload too short to hold
/// its own header is malformed and yields `None`.
pub fn decode_curve_values(payload: &[u8]) -> Option<Vec<f32>> {
    if payload.is_empty() {
        return Some(Vec::new());
    }
    let body = payload.get(CURVE_HEADER_LEN..)?;
    let samples = body
        .chunks_exact(SAMPLE_LEN)
        .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect();
    Some(samples)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(header: [u8; 2], values: &[f32]) -> Vec<u8> {
        let mut buf = header.to_vec();
        for v in values {
            buf.extend_from_slice(&v.to_le_bytes());
        }
        buf
    }

    #[test]
    fn test_decode_matches_le_encoding() {
        let values = [0.0f32, -1.5, 3.25, f32::MAX, 1.0e-7];
        let payload = encode([0xAB, 0xCD], &values);
        assert_eq!(payload.len(), 2 + 4 * values.len());
        assert_eq!(decode_curve_values(&payload).unwrap(), values.to_vec());
    }

    #[test]
    fn test_header_only_payload_is_empty_curve() {
        assert_eq!(decode_curve_values(&[1, 2]).unwrap(), Vec::<f32>::new());
    }

    #[test]
    fn test_empty_payload_is_empty_curve() {
        assert_eq!(decode_curve_values(&[]).unwrap(), Vec::<f32>::new());
    }

    #[test]
    fn test_truncated_header_is_malformed() {
        assert_eq!(decode_curve_values(&[7]), None);
    }

    #[test]
    fn test_trailing_partial_sample_is_ignored() {
        let mut payload = encode([0, 0], &[2.5]);
        payload.extend_from_slice(&[0xFF, 0xFF]);
        assert_eq!(decode_curve_values(&payload).unwrap(), vec![2.5]);
    }
}
