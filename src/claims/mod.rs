use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::TokenError;
use crate::random::RandomSource;

/// Length of the random `sub` and `rnd` claims.
pub const CLAIM_STRING_LEN: usize = 16;

/// Payload embedded in every generated token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (random alphanumeric)
    pub sub: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Random nonce (alphanumeric)
    pub rnd: String,
}

impl Claims {
    /// Compact JSON encoding used as the token payload.
    pub fn to_json(&self) -> Result<Vec<u8>, TokenError> {
        Ok(serde_json::to_vec(self)?)
    }
}

/// Builds a fresh [`Claims`] per token from a shared [`RandomSource`].
#[derive(Debug, Clone)]
pub struct ClaimsBuilder {
    random: Arc<RandomSource>,
}

impl ClaimsBuilder {
    pub fn new(random: Arc<RandomSource>) -> Self {
        Self { random }
    }

    pub fn build(&self) -> Claims {
        let sub = self.random.next_string(CLAIM_STRING_LEN);
        let rnd = self.random.next_string(CLAIM_STRING_LEN);

        Claims {
            sub,
            iat: Utc::now().timestamp(),
            rnd,
        }
    }
}
