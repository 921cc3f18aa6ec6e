//! Versioned, salted password hashing.
//!
//! `hash` — PBKDF2-HMAC-SHA256 with a fresh random salt, serialized into
//!   the `$`-delimited record documented in the crate root.
//!
//! `verify` — re-derives the key from the stored salt and iteration count
//!   and compares constant-time. Malformed stored values yield `false`,
//!   never a panic: the store layer relies on that to classify them as
//!   legacy plaintext rather than as parse failures.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use pbkdf2::pbkdf2_hmac;
use rand::RngCore;
use sha2::Sha256;

/// Algorithm identifier — the first field of every encoded record. Kept
/// byte-for-byte compatible with credentials persisted by earlier releases.
pub const ALGORITHM_ID: &str = "PBKDF2WithHmacSHA256";

/// Iteration count for newly hashed passwords.
const DEFAULT_ITERATIONS: u32 = 120_000;

/// 128-bit salt.
const SALT_LEN: usize = 16;

/// 256-bit derived key.
const KEY_LEN: usize = 32;

/// Hash a secret into an encoded record.
///
/// Infallible for every input, including the empty string; the secret's
/// full UTF-8 byte sequence is fed to the KDF. Each call draws a fresh
/// salt, so two hashes of the same secret never compare equal as strings
/// yet both verify.
pub fn hash(secret: &str) -> String {
    let mut salt = [0u8; SALT_LEN];
    rand::rngs::OsRng.fill_bytes(&mut salt);

    let mut derived = [0u8; KEY_LEN];
    pbkdf2_hmac::<Sha256>(secret.as_bytes(), &salt, DEFAULT_ITERATIONS, &mut derived);

    format!(
        "{ALGORITHM_ID}${DEFAULT_ITERATIONS}${}${}",
        BASE64.encode(salt),
        BASE64.encode(derived)
    )
}

/// Verify a secret against a stored encoded record.
///
/// Returns `false` for anything that is not a well-formed record: wrong
/// field count, unknown algorithm id, non-integer or zero iteration
/// field, or undecodable/empty salt and key fields.
pub fn verify(secret: &str, stored: &str) -> bool {
    let fields: Vec<&str> = stored.split('$').collect();
    if fields.len() != 4 {
        return false;
    }
    if fields[0] != ALGORITHM_ID {
        return false;
    }
    let iterations: u32 = match fields[1].parse() {
        Ok(n) if n > 0 => n,
        _ => return false,
    };
    let salt = match BASE64.decode(fields[2]) {
        Ok(bytes) if !bytes.is_empty() => bytes,
        _ => return false,
    };
    let expected = match BASE64.decode(fields[3]) {
        Ok(bytes) if !bytes.is_empty() => bytes,
        _ => return false,
    };

    let mut actual = vec![0u8; expected.len()];
    pbkdf2_hmac::<Sha256>(secret.as_bytes(), &salt, iterations, &mut actual);

    constant_time_eq(&expected, &actual)
}

/// Pure format predicate: does `stored` carry the encoded-hash marker?
///
/// True only when the value starts with the algorithm id followed by `$`.
/// Everything else — including the empty string — is legacy plaintext as
/// far as the store layer is concerned.
pub fn has_encoded_format(stored: &str) -> bool {
    stored
        .strip_prefix(ALGORITHM_ID)
        .is_some_and(|rest| rest.starts_with('$'))
}

/// Constant-time byte comparison — no early exit on the first mismatching
/// byte, to resist timing side channels. Length mismatch is `false`.
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify_roundtrip() {
        let stored = hash("secret1");
        assert!(has_encoded_format(&stored));
        assert!(verify("secret1", &stored));
        assert!(!verify("secret2", &stored));
    }

    #[test]
    fn verify_is_case_sensitive() {
        let stored = hash("Secret");
        assert!(verify("Secret", &stored));
        assert!(!verify("secret", &stored));
        assert!(!verify("SECRET", &stored));
    }

    #[test]
    fn salts_differ_across_calls() {
        let a = hash("same-secret");
        let b = hash("same-secret");
        assert_ne!(a, b);
        assert!(verify("same-secret", &a));
        assert!(verify("same-secret", &b));
    }

    #[test]
    fn empty_and_unicode_secrets_are_supported() {
        let empty = hash("");
        assert!(verify("", &empty));
        assert!(!verify(" ", &empty));

        let unicode = hash("pässwörd-日本語-🔒");
        assert!(verify("pässwörd-日本語-🔒", &unicode));
        assert!(!verify("pässwörd-日本語", &unicode));
    }

    #[test]
    fn malformed_stored_values_verify_false() {
        assert!(!verify("anything", ""));
        assert!(!verify("anything", "not-a-valid-format"));
        assert!(!verify("anything", "PBKDF2WithHmacSHA256$120000$onlythree"));
        assert!(!verify("anything", "PBKDF2WithHmacSHA256$120000$a$b$extra"));
        // Wrong algorithm id
        assert!(!verify("anything", "PBKDF2WithHmacSHA1$120000$AAAA$AAAA"));
        // Non-integer and zero iteration fields
        assert!(!verify("anything", "PBKDF2WithHmacSHA256$abc$AAAA$AAAA"));
        assert!(!verify("anything", "PBKDF2WithHmacSHA256$0$AAAA$AAAA"));
        // Undecodable / empty base64 fields
        assert!(!verify("anything", "PBKDF2WithHmacSHA256$120000$!!$AAAA"));
        assert!(!verify("anything", "PBKDF2WithHmacSHA256$120000$AAAA$"));
    }

    #[test]
    fn format_predicate() {
        assert!(!has_encoded_format(""));
        assert!(!has_encoded_format("plaintext"));
        assert!(!has_encoded_format("PBKDF2WithHmacSHA256"));
        assert!(!has_encoded_format("PBKDF2WithHmacSHA256-no-delimiter"));
        assert!(has_encoded_format("PBKDF2WithHmacSHA256$"));
        assert!(has_encoded_format(&hash("x")));
    }

    #[test]
    fn encoded_record_shape() {
        let stored = hash("shape-check");
        let fields: Vec<&str> = stored.split('$').collect();
        assert_eq!(fields.len(), 4);
        assert_eq!(fields[0], ALGORITHM_ID);
        assert_eq!(fields[1], "120000");
        assert_eq!(BASE64.decode(fields[2]).unwrap().len(), 16);
        assert_eq!(BASE64.decode(fields[3]).unwrap().len(), 32);
    }

    #[test]
    fn constant_time_eq_works() {
        assert!(constant_time_eq(b"hello", b"hello"));
        assert!(!constant_time_eq(b"hello", b"world"));
        assert!(!constant_time_eq(b"short", b"longer"));
        assert!(constant_time_eq(b"", b""));
    }
}
