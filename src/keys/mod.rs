//! Loading of secrets and PEM-encoded keys.
//!
//! Every parser validates the key eagerly so a bad key is reported while the
//! producer is constructed, never in the middle of a batch.

use jsonwebtoken::{Algorithm, EncodingKey};
use p256::pkcs8::EncodePrivateKey;
use rsa::pkcs1::DecodeRsaPublicKey;
use rsa::pkcs8::DecodePublicKey;
use rsa::RsaPublicKey;
use std::fs;
use std::path::Path;

use crate::error::KeyLoadError;

const RSA_PRIVATE: &str = "RSA private key";
const RSA_PUBLIC: &str = "RSA public key";
const EC_PRIVATE: &str = "P-256 private key";

/// Read a text secret, trimming surrounding whitespace.
pub fn load_text(path: impl AsRef<Path>) -> Result<String, KeyLoadError> {
    let path = path.as_ref();
    fs::read_to_string(path)
        .map(|text| text.trim().to_string())
        .map_err(|source| KeyLoadError::Read {
            path: path.to_path_buf(),
            source,
        })
}

/// Read a whole key file into memory.
pub fn read_file(path: impl AsRef<Path>) -> Result<Vec<u8>, KeyLoadError> {
    let path = path.as_ref();
    fs::read(path).map_err(|source| KeyLoadError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Parse a PKCS#1 or PKCS#8 RSA private key for RS256 signing.
pub fn rsa_private_key(pem: &[u8], origin: &str) -> Result<EncodingKey, KeyLoadError> {
    let key = EncodingKey::from_rsa_pem(pem).map_err(|e| invalid(origin, RSA_PRIVATE, e))?;
    probe(&key, Algorithm::RS256, origin, RSA_PRIVATE)?;
    Ok(key)
}

/// Parse a P-256 private key for ES256 signing.
///
/// Accepts PKCS#8 (`PRIVATE KEY`) directly and converts SEC1
/// (`EC PRIVATE KEY`) to PKCS#8 first.
pub fn ec_private_key(pem: &[u8], origin: &str) -> Result<EncodingKey, KeyLoadError> {
    let key = match EncodingKey::from_ec_pem(pem) {
        Ok(key) => key,
        Err(pkcs8_err) => {
            let text = std::str::from_utf8(pem).map_err(|e| invalid(origin, EC_PRIVATE, e))?;
            let secret = p256::SecretKey::from_sec1_pem(text)
                .map_err(|_| invalid(origin, EC_PRIVATE, pkcs8_err))?;
            let der = secret
                .to_pkcs8_der()
                .map_err(|e| invalid(origin, EC_PRIVATE, e))?;
            EncodingKey::from_ec_der(der.as_bytes())
        }
    };
    probe(&key, Algorithm::ES256, origin, EC_PRIVATE)?;
    Ok(key)
}

/// Parse an SPKI (`PUBLIC KEY`) or PKCS#1 (`RSA PUBLIC KEY`) RSA public key.
pub fn rsa_public_key(pem: &[u8], origin: &str) -> Result<RsaPublicKey, KeyLoadError> {
    let text = std::str::from_utf8(pem).map_err(|e| invalid(origin, RSA_PUBLIC, e))?;
    RsaPublicKey::from_public_key_pem(text)
        .or_else(|spki_err| RsaPublicKey::from_pkcs1_pem(text).map_err(|_| spki_err))
        .map_err(|e| invalid(origin, RSA_PUBLIC, e))
}

// jsonwebtoken only decodes the PEM envelope; the key itself is parsed on
// first use, so sign once up front.
fn probe(
    key: &EncodingKey,
    algorithm: Algorithm,
    origin: &str,
    expected: &'static str,
) -> Result<(), KeyLoadError> {
    jsonwebtoken::crypto::sign(b"jwtgen", key, algorithm)
        .map(|_| ())
        .map_err(|e| invalid(origin, expected, e))
}

fn invalid(origin: &str, expected: &'static str, reason: impl std::fmt::Display) -> KeyLoadError {
    KeyLoadError::InvalidKey {
        origin: origin.to_string(),
        expected,
        reason: reason.to_string(),
    }
}
