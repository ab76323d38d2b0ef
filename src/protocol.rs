//! Probe and acknowledgment wire format.
//!
//! A probe is the raw UTF-8 bytes of the configured secret, no framing.
//! An acknowledgment is exactly one byte, [`ACK_BYTE`]. Both sides validate
//! the exact payload shape before accepting anything.

/// Payload of a valid acknowledgment datagram.
pub const ACK_BYTE: u8 = 0x01;

/// Largest probe we will look at. Secrets are short strings; anything
/// bigger than this cannot match and is dropped without comparison.
pub const MAX_PROBE_LEN: usize = 512;

/// Encode a probe datagram for the given secret.
pub fn encode_probe(secret: &str) -> &[u8] {
    secret.as_bytes()
}

/// Check an incoming datagram against the configured secret.
pub fn is_valid_probe(payload: &[u8], secret: &str) -> bool {
    payload.len() <= MAX_PROBE_LEN && payload == secret.as_bytes()
}

/// The fixed acknowledgment payload.
pub fn encode_ack() -> [u8; 1] {
    [ACK_BYTE]
}

/// Check that a datagram is exactly the one-byte acknowledgment.
pub fn is_valid_ack(payload: &[u8]) -> bool {
    payload.len() == 1 && payload[0] == ACK_BYTE
}
