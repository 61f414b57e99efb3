//! # JSON Web Key
//!
//! OKP (RFC 8037) representation of an Ed25519 key:
//!
//! ```json
//! {"kty":"OKP","crv":"Ed25519","x":"<base64url pubkey>","d":"<base64url seed>"}
//! ```
//!
//! The private member `d` may be split across several numbered variables
//! because some deployment targets cap environment variable length. The
//! pieces are concatenated in index order and replace `d` from the document.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use serde::Deserialize;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use super::errors::IdentityError;

/// Size of an Ed25519 seed and public key.
pub const ED25519_KEY_LEN: usize = 32;

/// Raw JWK members relevant to Ed25519.
#[derive(Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct Jwk {
    /// Key type, must be `OKP`.
    pub kty: String,
    /// Curve, must be `Ed25519`.
    #[serde(default)]
    pub crv: String,
    /// Public key (optional, cross-checked when present).
    #[serde(default)]
    pub x: Option<String>,
    /// Private seed.
    #[serde(default)]
    pub d: Option<String>,
}

impl std::fmt::Debug for Jwk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Jwk")
            .field("kty", &self.kty)
            .field("crv", &self.crv)
            .field("x", &self.x)
            .field("d", &self.d.as_ref().map(|_| "***"))
            .finish()
    }
}

impl Jwk {
    /// Parse a JWK document and apply split `d` parts, if any.
    pub fn parse(json: &str, d_parts: &[String]) -> Result<Self, IdentityError> {
        let mut jwk: Jwk =
            serde_json::from_str(json).map_err(|e| IdentityError::MalformedJwk(e.to_string()))?;

        if jwk.kty != "OKP" || jwk.crv != "Ed25519" {
            return Err(IdentityError::UnsupportedKeyType {
                kty: jwk.kty.clone(),
                crv: jwk.crv.clone(),
            });
        }

        if !d_parts.is_empty() {
            let joined: String = d_parts.iter().map(|p| p.trim()).collect();
            if let Some(old) = jwk.d.as_mut() {
                old.zeroize();
            }
            jwk.d = Some(joined);
        }

        Ok(jwk)
    }

    /// Decoded private seed.
    pub fn seed(&self) -> Result<Zeroizing<[u8; ED25519_KEY_LEN]>, IdentityError> {
        let encoded = self
            .d
            .as_deref()
            .ok_or_else(|| IdentityError::MalformedJwk("missing private member 'd'".into()))?;
        let bytes = Zeroizing::new(decode_field("d", encoded)?);
        let mut seed = Zeroizing::new([0u8; ED25519_KEY_LEN]);
        copy_exact("d", &bytes, &mut seed[..])?;
        Ok(seed)
    }

    /// Decoded public key, if the document carries one.
    pub fn public_key(&self) -> Result<Option<[u8; ED25519_KEY_LEN]>, IdentityError> {
        let Some(encoded) = self.x.as_deref() else {
            return Ok(None);
        };
        let bytes = decode_field("x", encoded)?;
        let mut key = [0u8; ED25519_KEY_LEN];
        copy_exact("x", &bytes, &mut key)?;
        Ok(Some(key))
    }
}

/// Decode base64url, tolerating trailing padding.
fn decode_field(field: &str, value: &str) -> Result<Vec<u8>, IdentityError> {
    URL_SAFE_NO_PAD
        .decode(value.trim().trim_end_matches('='))
        .map_err(|e| IdentityError::InvalidEncoding {
            field: field.to_string(),
            reason: e.to_string(),
        })
}

fn copy_exact(field: &str, src: &[u8], dst: &mut [u8]) -> Result<(), IdentityError> {
    if src.len() != dst.len() {
        return Err(IdentityError::InvalidKeyLength {
            field: field.to_string(),
            expected: dst.len(),
            actual: src.len(),
        });
    }
    dst.copy_from_slice(src);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn b64(bytes: &[u8]) -> String {
        URL_SAFE_NO_PAD.encode(bytes)
    }

    #[test]
    fn test_parse_minimal_okp() {
        let json = format!(r#"{{"kty":"OKP","crv":"Ed25519","d":"{}"}}"#, b64(&[7u8; 32]));
        let jwk = Jwk::parse(&json, &[]).unwrap();
        assert_eq!(*jwk.seed().unwrap(), [7u8; 32]);
        assert!(jwk.public_key().unwrap().is_none());
    }

    #[test]
    fn test_rejects_rsa_key() {
        let err = Jwk::parse(r#"{"kty":"RSA","n":"abc","e":"AQAB"}"#, &[]).unwrap_err();
        assert!(matches!(err, IdentityError::UnsupportedKeyType { .. }));
    }

    #[test]
    fn test_rejects_invalid_json() {
        let err = Jwk::parse("{not json", &[]).unwrap_err();
        assert!(matches!(err, IdentityError::MalformedJwk(_)));
    }

    #[test]
    fn test_split_parts_override_d() {
        let encoded = b64(&[9u8; 32]);
        let (head, tail) = encoded.split_at(20);
        let json = format!(r#"{{"kty":"OKP","crv":"Ed25519","d":"{}"}}"#, b64(&[1u8; 32]));

        let jwk = Jwk::parse(&json, &[head.to_string(), tail.to_string()]).unwrap();
        assert_eq!(*jwk.seed().unwrap(), [9u8; 32]);
    }

    #[test]
    fn test_missing_d_is_malformed() {
        let jwk = Jwk::parse(r#"{"kty":"OKP","crv":"Ed25519"}"#, &[]).unwrap();
        assert!(matches!(jwk.seed(), Err(IdentityError::MalformedJwk(_))));
    }

    #[test]
    fn test_wrong_seed_length() {
        let json = format!(r#"{{"kty":"OKP","crv":"Ed25519","d":"{}"}}"#, b64(&[1u8; 16]));
        let jwk = Jwk::parse(&json, &[]).unwrap();
        assert_eq!(
            jwk.seed().unwrap_err(),
            IdentityError::InvalidKeyLength {
                field: "d".into(),
                expected: 32,
                actual: 16
            }
        );
    }

    #[test]
    fn test_padded_values_accepted() {
        let json = format!(r#"{{"kty":"OKP","crv":"Ed25519","d":"{}="}}"#, b64(&[3u8; 32]));
        let jwk = Jwk::parse(&json, &[]).unwrap();
        assert_eq!(*jwk.seed().unwrap(), [3u8; 32]);
    }

    #[test]
    fn test_debug_hides_private_member() {
        let secret = b64(&[5u8; 32]);
        let json = format!(r#"{{"kty":"OKP","crv":"Ed25519","d":"{}"}}"#, secret);
        let jwk = Jwk::parse(&json, &[]).unwrap();
        let debug = format!("{:?}", jwk);
        assert!(!debug.contains(&secret));
        assert!(debug.contains("***"));
    }
}
