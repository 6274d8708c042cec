use aes_gcm::aead::{Aead, KeyInit, Payload};
use aes_gcm::{Aes256Gcm, Nonce};
use rand::RngCore;
use rsa::{Oaep, RsaPublicKey};
use sha1::Sha1;
use std::path::Path;

use super::{b64, TokenProducer};
use crate::claims::ClaimsBuilder;
use crate::error::{KeyLoadError, TokenError};
use crate::keys;

const CEK_LEN: usize = 32;
const IV_LEN: usize = 12;
const TAG_LEN: usize = 16;

/// RSA-OAEP + A256GCM encrypted tokens (JWE compact serialization).
///
/// Every token gets a fresh content-encryption key and IV; the key is wrapped
/// with RSA-OAEP (SHA-1, MGF1-SHA-1) for the holder of the private key.
pub struct JweProducer {
    key: RsaPublicKey,
    header: String,
    claims: ClaimsBuilder,
}

impl JweProducer {
    pub fn new(key: RsaPublicKey, claims: ClaimsBuilder) -> Self {
        let header = serde_json::json!({ "alg": "RSA-OAEP", "enc": "A256GCM" });

        Self {
            key,
            header: b64(header.to_string()),
            claims,
        }
    }

    pub fn from_pem(pem: &[u8], claims: ClaimsBuilder) -> Result<Self, KeyLoadError> {
        Ok(Self::new(keys::rsa_public_key(pem, "PEM input")?, claims))
    }

    pub fn from_pem_file(
        path: impl AsRef<Path>,
        claims: ClaimsBuilder,
    ) -> Result<Self, KeyLoadError> {
        let path = path.as_ref();
        let pem = keys::read_file(path)?;
        let key = keys::rsa_public_key(&pem, &path.display().to_string())?;
        Ok(Self::new(key, claims))
    }
}

impl TokenProducer for JweProducer {
    fn produce(&self) -> Result<String, TokenError> {
        let payload = self.claims.build().to_json()?;

        let mut rng = rand::thread_rng();
        let mut cek = [0u8; CEK_LEN];
        let mut iv = [0u8; IV_LEN];
        rng.fill_bytes(&mut cek);
        rng.fill_bytes(&mut iv);

        let encrypted_key = self
            .key
            .encrypt(&mut rng, Oaep::new::<Sha1>(), &cek)
            .map_err(|e| TokenError::Encryption(format!("content key wrap: {e}")))?;

        let cipher = Aes256Gcm::new(&cek.into());
        let mut sealed = cipher
            .encrypt(
                &Nonce::from(iv),
                Payload {
                    msg: &payload,
                    aad: self.header.as_bytes(),
                },
            )
            .map_err(|_| TokenError::Encryption("content encryption failed".to_string()))?;
        let tag = sealed.split_off(sealed.len() - TAG_LEN);

        Ok([
            self.header.clone(),
            b64(encrypted_key),
            b64(iv),
            b64(sealed),
            b64(tag),
        ]
        .join("."))
    }
}
