//! Keccak-256 digests shared by the program and its clients.
//!
//! Every digest that ends up in a PDA seed is recomputed on chain, so clients
//! must derive them with exactly these functions.

use anchor_lang::prelude::Pubkey;
use sha3::{Digest, Keccak256};

use crate::constants::{ATTENDANCE_MESSAGE_DOMAIN, QR_DIGEST_DOMAIN};

pub fn keccak(parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    for part in parts {
        hasher.update(part);
    }
    hasher.finalize().into()
}

/// Key of the metadata claim that keeps event metadata URIs unique
pub fn metadata_key(metadata_uri: &str) -> [u8; 32] {
    keccak(&[metadata_uri.as_bytes()])
}

/// Message an organizer or verifier signs to attest that `attendee` was present.
///
/// Binding the timestamp makes every signature single-use once its digest is
/// recorded as consumed.
pub fn attendance_message(event_id: u64, attendee: &Pubkey, timestamp: i64) -> [u8; 32] {
    keccak(&[
        ATTENDANCE_MESSAGE_DOMAIN,
        &event_id.to_le_bytes(),
        attendee.as_ref(),
        &timestamp.to_le_bytes(),
    ])
}

pub fn qr_secret_hash(secret: &str) -> [u8; 32] {
    keccak(&[secret.as_bytes()])
}

/// Consumption digest of a QR secret for one event
pub fn qr_digest(event_id: u64, secret: &str) -> [u8; 32] {
    keccak(&[QR_DIGEST_DOMAIN, &event_id.to_le_bytes(), secret.as_bytes()])
}
