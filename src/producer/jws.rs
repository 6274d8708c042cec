use jsonwebtoken::{Algorithm, EncodingKey};
use std::path::Path;

use super::{b64, TokenProducer};
use crate::claims::{Claims, ClaimsBuilder};
use crate::error::{KeyLoadError, TokenError};
use crate::keys;

/// Signs claims into a JWS compact token with a fixed algorithm and key.
struct JwsSigner {
    algorithm: Algorithm,
    key: EncodingKey,
    // Encoded once, identical for every token.
    header: String,
}

impl JwsSigner {
    fn new(algorithm: Algorithm, key: EncodingKey) -> Self {
        let header = serde_json::json!({ "alg": algorithm, "typ": "JWT" });

        Self {
            algorithm,
            key,
            header: b64(header.to_string()),
        }
    }

    fn sign(&self, claims: &Claims) -> Result<String, TokenError> {
        let payload = b64(claims.to_json()?);

        let mut token = String::with_capacity(self.header.len() + payload.len() + 1);
        token.push_str(&self.header);
        token.push('.');
        token.push_str(&payload);

        let signature = jsonwebtoken::crypto::sign(token.as_bytes(), &self.key, self.algorithm)?;
        token.push('.');
        token.push_str(&signature);

        Ok(token)
    }
}

/// HMAC-SHA256 signed tokens from a shared secret.
pub struct Hs256Producer {
    signer: JwsSigner,
    claims: ClaimsBuilder,
}

impl Hs256Producer {
    pub fn new(secret: &[u8], claims: ClaimsBuilder) -> Self {
        Self {
            signer: JwsSigner::new(Algorithm::HS256, EncodingKey::from_secret(secret)),
            claims,
        }
    }

    /// Load the secret from a text file, trimmed of surrounding whitespace.
    pub fn from_secret_file(
        path: impl AsRef<Path>,
        claims: ClaimsBuilder,
    ) -> Result<Self, KeyLoadError> {
        let secret = keys::load_text(path)?;
        Ok(Self::new(secret.as_bytes(), claims))
    }
}

impl TokenProducer for Hs256Producer {
    fn produce(&self) -> Result<String, TokenError> {
        self.signer.sign(&self.claims.build())
    }
}

/// RSASSA-PKCS1-v1_5 SHA-256 signed tokens.
pub struct Rs256Producer {
    signer: JwsSigner,
    claims: ClaimsBuilder,
}

impl Rs256Producer {
    pub fn from_pem(pem: &[u8], claims: ClaimsBuilder) -> Result<Self, KeyLoadError> {
        Self::parse(pem, "PEM input", claims)
    }

    pub fn from_pem_file(
        path: impl AsRef<Path>,
        claims: ClaimsBuilder,
    ) -> Result<Self, KeyLoadError> {
        let path = path.as_ref();
        let pem = keys::read_file(path)?;
        Self::parse(&pem, &path.display().to_string(), claims)
    }

    fn parse(pem: &[u8], origin: &str, claims: ClaimsBuilder) -> Result<Self, KeyLoadError> {
        let key = keys::rsa_private_key(pem, origin)?;
        Ok(Self {
            signer: JwsSigner::new(Algorithm::RS256, key),
            claims,
        })
    }
}

impl TokenProducer for Rs256Producer {
    fn produce(&self) -> Result<String, TokenError> {
        self.signer.sign(&self.claims.build())
    }
}

/// ECDSA P-256 SHA-256 signed tokens.
pub struct Es256Producer {
    signer: JwsSigner,
    claims: ClaimsBuilder,
}

impl Es256Producer {
    pub fn from_pem(pem: &[u8], claims: ClaimsBuilder) -> Result<Self, KeyLoadError> {
        Self::parse(pem, "PEM input", claims)
    }

    pub fn from_pem_file(
        path: impl AsRef<Path>,
        claims: ClaimsBuilder,
    ) -> Result<Self, KeyLoadError> {
        let path = path.as_ref();
        let pem = keys::read_file(path)?;
        Self::parse(&pem, &path.display().to_string(), claims)
    }

    fn parse(pem: &[u8], origin: &str, claims: ClaimsBuilder) -> Result<Self, KeyLoadError> {
        let key = keys::ec_private_key(pem, origin)?;
        Ok(Self {
            signer: JwsSigner::new(Algorithm::ES256, key),
            claims,
        })
    }
}

impl TokenProducer for Es256Producer {
    fn produce(&self) -> Result<String, TokenError> {
        self.signer.sign(&self.claims.build())
    }
}
