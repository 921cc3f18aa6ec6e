//! sk_crypto — password hashing primitives for the StockKeep data layer
//!
//! # Stored format
//! Credentials are persisted as a four-field, `$`-delimited record:
//!
//! ```text
//! PBKDF2WithHmacSHA256$<iterations>$<base64 salt>$<base64 derived key>
//! ```
//!
//! The first field doubles as a version marker: any stored value that does
//! not carry it is treated as a legacy plaintext secret by the store layer
//! and upgraded in place on the next successful login.

pub mod password;

pub use password::{constant_time_eq, has_encoded_format, hash, verify};
