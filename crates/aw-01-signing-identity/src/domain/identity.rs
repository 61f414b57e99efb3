//! # Signing Identity
//!
//! Ed25519 key pair used to authorize every ledger write.
//!
//! ## Lifecycle
//!
//! Constructed once at process start, then shared read-only behind an `Arc`
//! by every concurrent publish run. The private key is zeroized on drop and
//! never appears in `Debug` output.
//!
//! Ed25519 signatures are deterministic: signing the same preimage twice with
//! the same key yields identical bytes, so a transaction id derived from the
//! signature is stable for identical content.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use sha2::{Digest, Sha256};

use super::errors::IdentityError;
use super::jwk::{Jwk, ED25519_KEY_LEN};

/// Size of an Ed25519 signature.
pub const SIGNATURE_LEN: usize = 64;

/// Long-lived key material for ledger writes.
pub struct SigningIdentity {
    signing_key: SigningKey,
    owner: String,
    address: String,
}

impl SigningIdentity {
    /// Build an identity from a 32-byte Ed25519 seed.
    pub fn from_seed(seed: &[u8; ED25519_KEY_LEN]) -> Self {
        let signing_key = SigningKey::from_bytes(seed);
        let public = signing_key.verifying_key().to_bytes();
        let owner = URL_SAFE_NO_PAD.encode(public);
        let address = URL_SAFE_NO_PAD.encode(Sha256::digest(public));
        Self {
            signing_key,
            owner,
            address,
        }
    }

    /// Build an identity from a parsed JWK, cross-checking `x` against `d`.
    pub fn from_jwk(jwk: &Jwk) -> Result<Self, IdentityError> {
        let seed = jwk.seed()?;
        let identity = Self::from_seed(&seed);

        if let Some(expected) = jwk.public_key()? {
            if expected != identity.public_key_bytes() {
                return Err(IdentityError::PublicKeyMismatch);
            }
        }

        Ok(identity)
    }

    /// Raw public key.
    pub fn public_key_bytes(&self) -> [u8; ED25519_KEY_LEN] {
        self.signing_key.verifying_key().to_bytes()
    }

    /// Public key, base64url. Travels as the transaction `owner`.
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Wallet address: base64url SHA-256 of the public key.
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Sign a message. Deterministic for a given key and message.
    pub fn sign(&self, message: &[u8]) -> [u8; SIGNATURE_LEN] {
        self.signing_key.sign(message).to_bytes()
    }

    /// Verify a signature made by this identity.
    pub fn verify(&self, message: &[u8], signature: &[u8; SIGNATURE_LEN]) -> bool {
        verify_owner_signature(&self.owner, message, signature)
    }
}

/// Verify a signature against a base64url `owner` public key.
///
/// Returns `false` for malformed owners instead of failing, so callers can
/// treat any mismatch uniformly.
pub fn verify_owner_signature(owner: &str, message: &[u8], signature: &[u8; SIGNATURE_LEN]) -> bool {
    let Ok(bytes) = URL_SAFE_NO_PAD.decode(owner) else {
        return false;
    };
    let Ok(key_bytes) = <[u8; ED25519_KEY_LEN]>::try_from(bytes.as_slice()) else {
        return false;
    };
    let Ok(key) = VerifyingKey::from_bytes(&key_bytes) else {
        return false;
    };
    key.verify(message, &Signature::from_bytes(signature)).is_ok()
}

impl std::fmt::Debug for SigningIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningIdentity")
            .field("owner", &self.owner)
            .field("address", &self.address)
            .field("signing_key", &"***")
            .finish()
    }
}
