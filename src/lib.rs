//! Bulk generation of signed (JWS) and encrypted (JWE) test tokens.
//!
//! A [`producer::TokenProducer`] turns pre-loaded key material into one
//! compact token per call, [`batch::generate`] fans a request count out over
//! every CPU while keeping output order, and [`sink::write_lines`] stores the
//! result one token per line.

pub mod batch;
pub mod claims;
pub mod config;
pub mod error;
pub mod inspect;
pub mod keys;
pub mod monitoring;
pub mod producer;
pub mod random;
pub mod sink;

#[cfg(test)]
pub mod test_utils;

pub use claims::{Claims, ClaimsBuilder};
pub use error::{BatchError, Error, KeyLoadError, Result, SinkError, TokenError};
pub use producer::{TokenKind, TokenProducer};
pub use random::RandomSource;
