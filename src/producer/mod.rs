//! Token producers: one token per call, from key material loaded once.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use std::fmt;
use std::path::Path;

use crate::claims::ClaimsBuilder;
use crate::error::{KeyLoadError, TokenError};

pub mod jwe;
pub mod jws;

pub use jwe::JweProducer;
pub use jws::{Es256Producer, Hs256Producer, Rs256Producer};

/// Yields one compact token per call.
///
/// A producer is shared by every worker of a batch, hence the `Sync` bound.
/// Plain closures returning `Result<String, TokenError>` are producers too.
pub trait TokenProducer: Sync {
    fn produce(&self) -> Result<String, TokenError>;
}

impl<F> TokenProducer for F
where
    F: Fn() -> Result<String, TokenError> + Sync,
{
    fn produce(&self) -> Result<String, TokenError> {
        self()
    }
}

/// The token families the generator knows how to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Hs256,
    Rs256,
    Es256,
    Jwe,
}

impl TokenKind {
    pub const ALL: [TokenKind; 4] = [
        TokenKind::Hs256,
        TokenKind::Rs256,
        TokenKind::Es256,
        TokenKind::Jwe,
    ];

    pub fn label(self) -> &'static str {
        match self {
            TokenKind::Hs256 => "HS256",
            TokenKind::Rs256 => "RS256",
            TokenKind::Es256 => "ES256",
            TokenKind::Jwe => "JWE",
        }
    }

    /// Key or secret file name inside the secrets directory.
    pub fn key_file(self) -> &'static str {
        match self {
            TokenKind::Hs256 => "hs256-secret.txt",
            TokenKind::Rs256 => "rs256-private.pem",
            TokenKind::Es256 => "es256-private.pem",
            TokenKind::Jwe => "rsa-public.pem",
        }
    }

    /// Output file name inside the output directory.
    pub fn output_file(self) -> &'static str {
        match self {
            TokenKind::Hs256 => "hs256-tokens.txt",
            TokenKind::Rs256 => "rs256-tokens.txt",
            TokenKind::Es256 => "es256-tokens.txt",
            TokenKind::Jwe => "jwe-tokens.txt",
        }
    }

    /// Number of dot-separated segments in tokens of this kind.
    pub fn segments(self) -> usize {
        match self {
            TokenKind::Jwe => 5,
            _ => 3,
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Build the producer for `kind` from its key file under `secrets_dir`.
pub fn load(
    kind: TokenKind,
    secrets_dir: &Path,
    claims: ClaimsBuilder,
) -> Result<Box<dyn TokenProducer>, KeyLoadError> {
    let path = secrets_dir.join(kind.key_file());

    Ok(match kind {
        TokenKind::Hs256 => Box::new(Hs256Producer::from_secret_file(&path, claims)?),
        TokenKind::Rs256 => Box::new(Rs256Producer::from_pem_file(&path, claims)?),
        TokenKind::Es256 => Box::new(Es256Producer::from_pem_file(&path, claims)?),
        TokenKind::Jwe => Box::new(JweProducer::from_pem_file(&path, claims)?),
    })
}

pub(crate) fn b64(bytes: impl AsRef<[u8]>) -> String {
    URL_SAFE_NO_PAD.encode(bytes)
}
