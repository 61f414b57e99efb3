//! # Identity Loading
//!
//! Load-once entry point used by the runtime at startup.

use std::sync::Arc;

use tracing::info;

use crate::domain::{IdentityError, Jwk, SigningIdentity};
use crate::ports::{KeySource, JWK_VARIABLE};

/// Load the signing identity from a key source.
///
/// Any error here is fatal for the process: without a key no ledger write
/// can be authorized.
pub fn load_identity<S: KeySource + ?Sized>(
    source: &S,
) -> Result<Arc<SigningIdentity>, IdentityError> {
    let document = source
        .get(JWK_VARIABLE)
        .ok_or_else(|| IdentityError::MissingVariable(JWK_VARIABLE.to_string()))?;
    let d_parts = source.d_parts();

    let jwk = Jwk::parse(&document, &d_parts)?;
    let identity = SigningIdentity::from_jwk(&jwk)?;

    info!(
        address = %identity.address(),
        split_parts = d_parts.len(),
        "[aw-01] Signing identity loaded"
    );

    Ok(Arc::new(identity))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::StaticKeySource;
    use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};

    fn jwk_json(seed: &[u8; 32]) -> String {
        format!(
            r#"{{"kty":"OKP","crv":"Ed25519","d":"{}"}}"#,
            URL_SAFE_NO_PAD.encode(seed)
        )
    }

    #[test]
    fn test_missing_jwk_is_fatal() {
        let err = load_identity(&StaticKeySource::new()).unwrap_err();
        assert_eq!(err, IdentityError::MissingVariable("ARXWEAVE_JWK".into()));
    }

    #[test]
    fn test_load_from_json() {
        let source = StaticKeySource::new().with(JWK_VARIABLE, jwk_json(&[4u8; 32]));
        let identity = load_identity(&source).unwrap();
        assert_eq!(identity.address(), SigningIdentity::from_seed(&[4u8; 32]).address());
    }

    #[test]
    fn test_load_with_split_fields() {
        let encoded = URL_SAFE_NO_PAD.encode([8u8; 32]);
        let (a, rest) = encoded.split_at(15);
        let (b, c) = rest.split_at(15);
        let source = StaticKeySource::new()
            .with(JWK_VARIABLE, r#"{"kty":"OKP","crv":"Ed25519"}"#)
            .with("ARXWEAVE_JWK_D_0", a)
            .with("ARXWEAVE_JWK_D_1", b)
            .with("ARXWEAVE_JWK_D_2", c);

        let identity = load_identity(&source).unwrap();
        assert_eq!(identity.owner(), SigningIdentity::from_seed(&[8u8; 32]).owner());
    }

    #[test]
    fn test_malformed_split_field_is_fatal() {
        let source = StaticKeySource::new()
            .with(JWK_VARIABLE, r#"{"kty":"OKP","crv":"Ed25519"}"#)
            .with("ARXWEAVE_JWK_D_0", "!!!");
        assert!(matches!(
            load_identity(&source),
            Err(IdentityError::InvalidEncoding { .. })
        ));
    }
}
