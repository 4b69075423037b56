use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use sha2::{Digest, Sha256};
use std::fmt;
use zeroize::Zeroizing;

/// The identifiers a password is derived from.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct SeedInput<'a> {
    pub service: &'a str,
    pub secret: &'a str,
    pub iteration: u64,
}

impl<'a> SeedInput<'a> {
    pub fn new(service: &'a str, secret: &'a str, iteration: u64) -> Self {
        Self {
            service,
            secret,
            iteration,
        }
    }

    pub fn derive(&self) -> DerivedSeed {
        derive_seed(self.service, self.secret, self.iteration)
    }
}

/// Lowercase hex SHA-256 digest used to seed the generator.
pub struct DerivedSeed(Zeroizing<String>);

impl DerivedSeed {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for DerivedSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DerivedSeed(..)")
    }
}

/// Concatenates `service`, `secret` and `iteration` (in that order, no delimiter),
/// base64-encodes the UTF-8 bytes and hashes the encoding with SHA-256.
pub fn derive_seed(service: &str, secret: &str, iteration: u64) -> DerivedSeed {
    let composite = Zeroizing::new(format!("{service}{secret}{iteration}"));
    let encoded = Zeroizing::new(BASE64.encode(composite.as_bytes()));
    let digest = Sha256::digest(encoded.as_bytes());

    DerivedSeed(Zeroizing::new(hex::encode(digest)))
}
