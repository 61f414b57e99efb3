//! # Transaction Signing
//!
//! Builds and signs a transaction in one step.
//!
//! ## Preimage
//!
//! SHA-256 over a length-prefixed encoding of, in order: format, owner,
//! reward, data size, data root and each tag's name and value. Every field is
//! written as `u64 big-endian length || bytes`, so no two distinct field
//! sequences share a preimage.
//!
//! ## Id
//!
//! `id = base64url(SHA-256(signature))`. Ed25519 is deterministic, so identical
//! content signed by the same identity always yields the same id.

use aw_01_signing_identity::{verify_owner_signature, SigningIdentity};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use sha2::{Digest, Sha256};
use shared_types::LedgerTxId;

use crate::domain::{FeeQuote, LedgerError, SignedTransaction, Tag, Winston, TX_FORMAT};

fn write_field(hasher: &mut Sha256, bytes: &[u8]) {
    hasher.update((bytes.len() as u64).to_be_bytes());
    hasher.update(bytes);
}

/// Compute the signature preimage.
pub fn signature_preimage(
    owner: &str,
    reward: Winston,
    data_size: u64,
    data_root: &[u8; 32],
    tags: &[Tag],
) -> [u8; 32] {
    let mut hasher = Sha256::new();
    write_field(&mut hasher, &[TX_FORMAT]);
    write_field(&mut hasher, owner.as_bytes());
    write_field(&mut hasher, reward.to_string().as_bytes());
    write_field(&mut hasher, data_size.to_string().as_bytes());
    write_field(&mut hasher, data_root);
    write_field(&mut hasher, &(tags.len() as u64).to_be_bytes());
    for tag in tags {
        write_field(&mut hasher, tag.name.as_bytes());
        write_field(&mut hasher, tag.value.as_bytes());
    }
    hasher.finalize().into()
}

/// Derive the transaction id from a signature.
pub fn transaction_id(signature: &[u8; 64]) -> LedgerTxId {
    LedgerTxId(URL_SAFE_NO_PAD.encode(Sha256::digest(signature)))
}

/// Build and sign a transaction.
///
/// The quote must have been issued for exactly `payload.len()` bytes,
/// otherwise `LedgerError::StaleQuote` forces the caller to re-quote.
pub fn build_and_sign(
    payload: Vec<u8>,
    tags: Vec<Tag>,
    quote: &FeeQuote,
    identity: &SigningIdentity,
) -> Result<SignedTransaction, LedgerError> {
    if payload.is_empty() {
        return Err(LedgerError::EmptyPayload);
    }
    if !quote.covers(payload.len()) {
        return Err(LedgerError::StaleQuote {
            quoted: quote.byte_size,
            actual: payload.len() as u64,
        });
    }
    if let Some(tag) = tags.iter().find(|t| t.name.is_empty()) {
        return Err(LedgerError::InvalidTag(format!(
            "empty tag name (value '{}')",
            tag.value
        )));
    }

    let data_root: [u8; 32] = Sha256::digest(&payload).into();
    let owner = identity.owner().to_string();
    let preimage = signature_preimage(&owner, quote.fee, payload.len() as u64, &data_root, &tags);
    let signature = identity.sign(&preimage);

    Ok(SignedTransaction {
        id: transaction_id(&signature),
        owner,
        tags,
        data: payload,
        data_root,
        reward: quote.fee,
        signature,
    })
}

/// Check that a transaction's id, data root and signature agree with its
/// content.
pub fn verify_transaction(tx: &SignedTransaction) -> bool {
    let data_root: [u8; 32] = Sha256::digest(tx.data()).into();
    if &data_root != tx.data_root() || transaction_id(tx.signature()) != *tx.id() {
        return false;
    }
    let preimage = signature_preimage(
        tx.owner(),
        tx.reward(),
        tx.data_size(),
        tx.data_root(),
        tx.tags(),
    );
    verify_owner_signature(tx.owner(), &preimage, tx.signature())
}
