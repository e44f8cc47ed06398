//! Ed25519 signatures over canonical transaction payloads.
//!
//! The payload signed here is the same byte string the transaction id is
//! hashed from, so a signature vouches for exactly the fields that make
//! up the id.

use ed25519_dalek::{Signer, SigningKey, Verifier, VerifyingKey};
use zeta_types::{KeyPair, PublicKey, Signature};

/// Sign a canonical payload with the pair's private key.
pub fn sign_payload(payload: &[u8], keys: &KeyPair) -> Signature {
    let signing_key = SigningKey::from_bytes(&keys.private.0);
    Signature(signing_key.sign(payload).to_bytes())
}

/// Check a signature over a canonical payload.
///
/// Returns `false` for a malformed public key as well as for a bad
/// signature; the caller treats both the same way, as an invalid
/// transaction.
pub fn verify_payload(payload: &[u8], signature: &Signature, public_key: &PublicKey) -> bool {
    let Ok(verifying_key) = VerifyingKey::from_bytes(&public_key.0) else {
        return false;
    };
    let sig = ed25519_dalek::Signature::from_bytes(&signature.0);
    verifying_key.verify(payload, &sig).is_ok()
}
