//! Structural checks on compact tokens. Nothing here verifies a signature.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};

use crate::claims::Claims;
use crate::error::InspectError;

pub fn segment_count(token: &str) -> usize {
    token.split('.').count()
}

/// True for a 5-segment JWE compact serialization.
pub fn is_jwe_compact(token: &str) -> bool {
    segment_count(token) == 5
}

/// Decode the claims of a 3-segment JWS without checking its signature.
pub fn decode_jws_payload(token: &str) -> Result<Claims, InspectError> {
    let segments: Vec<&str> = token.split('.').collect();
    if segments.len() != 3 {
        return Err(InspectError::SegmentCount {
            expected: 3,
            found: segments.len(),
        });
    }

    let payload = URL_SAFE_NO_PAD.decode(segments[1])?;
    Ok(serde_json::from_slice(&payload)?)
}

/// Decode the protected header of a JWS or JWE.
pub fn decode_header(token: &str) -> Result<serde_json::Value, InspectError> {
    let header = token.split('.').next().unwrap_or_default();
    let bytes = URL_SAFE_NO_PAD.decode(header)?;
    Ok(serde_json::from_slice(&bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_jws_payload() {
        let payload = URL_SAFE_NO_PAD.encode(r#"{"sub":"abc","iat":42,"rnd":"xyz"}"#);
        let token = format!("e30.{payload}.sig");

        let claims = decode_jws_payload(&token).unwrap();
        assert_eq!(claims.sub, "abc");
        assert_eq!(claims.iat, 42);
        assert_eq!(claims.rnd, "xyz");
    }

    #[test]
    fn test_decode_jws_payload_invalid_parts() {
        let err = decode_jws_payload("only.two").unwrap_err();
        assert!(matches!(
            err,
            InspectError::SegmentCount {
                expected: 3,
                found: 2
            }
        ));
    }

    #[test]
    fn test_decode_jws_payload_invalid_base64() {
        let err = decode_jws_payload("a.!@#.c").unwrap_err();
        assert!(matches!(err, InspectError::Base64(_)));
    }

    #[test]
    fn test_decode_jws_payload_invalid_json() {
        let token = format!("a.{}.c", URL_SAFE_NO_PAD.encode("[1,2]"));
        let err = decode_jws_payload(&token).unwrap_err();
        assert!(matches!(err, InspectError::Json(_)));
    }

    #[test]
    fn test_is_jwe_compact() {
        assert!(is_jwe_compact("a.b.c.d.e"));
        assert!(!is_jwe_compact("a.b.c"));
        assert!(!is_jwe_compact(""));
    }

    #[test]
    fn test_decode_header() {
        let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"RSA-OAEP","enc":"A256GCM"}"#);
        let value = decode_header(&format!("{header}.b.c.d.e")).unwrap();

        assert_eq!(value["alg"], "RSA-OAEP");
        assert_eq!(value["enc"], "A256GCM");
    }
}
