// Copyright 2023-2025 Contributors to the Veraison project.
// SPDX-License-Identifier: Apache-2.0

/// Translate a nonce from the service's base64url wire encoding into the
/// standard base64 alphabet used by claim templates.
///
/// This is a plain `-`→`+`, `_`→`/` substitution: padding is neither added
/// nor removed, and characters outside the base64url alphabet pass through.
pub fn decode_wire_nonce(wire: &str) -> String {
    wire.chars()
        .map(|c| match c {
            '-' => '+',
            '_' => '/',
            other => other,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::{engine::general_purpose, Engine as _};

    // as handed out by the challenge-response API
    const TEST_WIRE_NONCE: &str = "QUp8F0FBs9DpodKK8xUg8NQimf6sQAfe2J1ormzZLxk=";

    #[test]
    fn substitution() {
        assert_eq!(decode_wire_nonce("ab-_cd-_"), "ab+/cd+/");
        assert_eq!(decode_wire_nonce(TEST_WIRE_NONCE), TEST_WIRE_NONCE);
        assert_eq!(decode_wire_nonce(""), "");
    }

    #[test]
    fn no_padding_correction() {
        assert_eq!(decode_wire_nonce("_-8"), "/+8");
    }

    #[test]
    fn round_trip_bytes() {
        let raw: Vec<u8> = (0u8..=255).step_by(3).collect();
        let wire = general_purpose::URL_SAFE.encode(&raw);

        let claim = decode_wire_nonce(&wire);

        assert_eq!(general_purpose::STANDARD.decode(claim).unwrap(), raw);
    }

    #[test]
    fn unpadded_wire_needs_compatible_length() {
        let wire = general_purpose::URL_SAFE_NO_PAD.encode([0xfbu8, 0xff, 0xfe, 0x01]);

        // 4 bytes encode to 6 chars, which the padded decoder rejects
        assert!(general_purpose::STANDARD
            .decode(decode_wire_nonce(&wire))
            .is_err());
    }
}
