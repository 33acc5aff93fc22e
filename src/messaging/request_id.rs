//! Correlation id generation.
//!
//! Ids only need to be unique among the requests one client has in flight.
//! The OS CSPRNG gives 40 random bits; when it is unavailable a base-36
//! millisecond timestamp is used instead, which can collide for calls made
//! within the same millisecond.

use std::time::{SystemTime, UNIX_EPOCH};

use rand::rngs::OsRng;
use rand::RngCore;

/// Number of random bytes in a request id.
const ID_BYTES: usize = 5;

/// Generate a fresh request id.
pub fn generate_request_id() -> String {
    let mut bytes = [0u8; ID_BYTES];
    match OsRng.try_fill_bytes(&mut bytes) {
        Ok(()) => encode_hex(&bytes),
        Err(e) => {
            tracing::warn!(error = %e, "OS randomness unavailable, using timestamp request id");
            timestamp_id()
        }
    }
}

fn encode_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

fn timestamp_id() -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis();
    to_base36(millis)
}

fn to_base36(mut value: u128) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if value == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while value > 0 {
        out.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_id_format() {
        let id = generate_request_id();
        assert_eq!(id.len(), 10);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_no_duplicates_in_10k_ids() {
        let ids: HashSet<String> = (0..10_000).map(|_| generate_request_id()).collect();
        assert_eq!(ids.len(), 10_000);
    }

    #[test]
    fn test_base36() {
        assert_eq!(to_base36(0), "0");
        assert_eq!(to_base36(35), "z");
        assert_eq!(to_base36(36), "10");
        assert_eq!(to_base36(1_700_000_000_000), "loyw3v28");
    }

    #[test]
    fn test_timestamp_fallback_is_base36() {
        let id = timestamp_id();
        assert!(!id.is_empty());
        assert!(id.chars().all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
    }
}
