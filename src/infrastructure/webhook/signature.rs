//! Delivery payload signing
//!
//! Signatures are HMAC-SHA256 over the exact serialized bytes sent to the
//! subscriber, presented as `sha256=<hex>`. Subscribers recompute the MAC
//! over the raw request body to verify authenticity.

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the signature on deliveries
pub const SIGNATURE_HEADER: &str = "X-Webhook-Signature";

const SIGNATURE_PREFIX: &str = "sha256=";

/// Sign a payload with a subscriber secret
pub fn sign(secret: &str, payload: &[u8]) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(payload);
    format!("{}{}", SIGNATURE_PREFIX, hex::encode(mac.finalize().into_bytes()))
}

/// Verify a signature against a payload, in constant time
pub fn verify(secret: &str, payload: &[u8], signature: &str) -> bool {
    let Some(hex_digest) = signature.strip_prefix(SIGNATURE_PREFIX) else {
        return false;
    };

    let Ok(expected) = hex::decode(hex_digest) else {
        return false;
    };

    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(payload);
    mac.verify_slice(&expected).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_and_verify_round_trip() {
        let payload = br#"{"type":"generation.completed","data":{}}"#;
        let signature = sign("topsecret", payload);

        assert!(signature.starts_with("sha256="));
        assert!(verify("topsecret", payload, &signature));
    }

    #[test]
    fn test_signature_is_deterministic() {
        let payload = b"payload";
        assert_eq!(sign("s", payload), sign("s", payload));
    }

    #[test]
    fn test_tampered_payload_fails_verification() {
        let signature = sign("topsecret", b"original");
        assert!(!verify("topsecret", b"tampered", &signature));
    }

    #[test]
    fn test_wrong_secret_fails_verification() {
        let signature = sign("secret-a", b"payload");
        assert!(!verify("secret-b", b"payload", &signature));
    }

    #[test]
    fn test_malformed_signature_rejected() {
        assert!(!verify("secret", b"payload", "md5=abc"));
        assert!(!verify("secret", b"payload", "sha256=not-hex"));
    }
}
