//! Verification flow shared by every attestation method.
//!
//! All three methods converge here: record the attendance, admit the
//! attendee into the event, issue the badge through the ledger, then attach
//! the badge to the record. Any failure aborts the whole instruction.

use anchor_lang::prelude::*;

use crate::{
    constants::{MAX_REASON_LEN, SIGNATURE_MAX_AGE_SECS},
    error::AttendanceError,
    events::{AttendanceRevoked, AttendanceVerified, AttendeeCountUpdated},
    guard::{GuardedOperation, OperationLock},
    hashing::attendance_message,
    state::{
        AttendanceRecord, AttendanceVerifier, Badge, BadgeIssue, BadgeLedger, Capabilities, Event,
        EventRegistry, UserStats, VerificationMethod,
    },
};

/// Who vouches for whom, and how
pub struct Attestation<'a> {
    pub attendee: Pubkey,
    pub verified_by: Pubkey,
    pub method: VerificationMethod,
    pub proof: &'a [u8],
    pub metadata_uri: &'a str,
}

/// Components the verifier calls into
pub struct Counterparts<'a> {
    pub registry: &'a EventRegistry,
    pub event: &'a mut Event,
    pub ledger: &'a mut BadgeLedger,
}

/// Preconditions shared by all verification methods, in order
pub fn ensure_verifiable(event: &Event, record: &AttendanceRecord, now: i64) -> Result<()> {
    require!(event.is_ongoing(now), AttendanceError::EventNotActive);
    require!(!record.attended, AttendanceError::AlreadyVerified);
    require!(event.has_capacity(), AttendanceError::CapacityExceeded);
    Ok(())
}

/// Freshness, digest and signer checks of a signed attestation. Returns the
/// message the attester must have signed.
pub fn accept_signed_attendance(
    event_id: u64,
    attendee: &Pubkey,
    attester_caps: Capabilities,
    timestamp: i64,
    proof_digest: [u8; 32],
    now: i64,
) -> Result<[u8; 32]> {
    let age = now
        .checked_sub(timestamp)
        .ok_or(AttendanceError::ArithmeticOverflow)?;
    require!(
        (0..SIGNATURE_MAX_AGE_SECS).contains(&age),
        AttendanceError::SignatureExpired
    );

    let message = attendance_message(event_id, attendee, timestamp);
    require!(message == proof_digest, AttendanceError::ProofDigestMismatch);
    require!(attester_caps.can_attest(), AttendanceError::UnauthorizedSigner);
    Ok(message)
}

/// Returns the token id of the issued badge
pub fn commit_attendance(
    verifier: &mut AttendanceVerifier,
    counterparts: Counterparts<'_>,
    record: &mut AttendanceRecord,
    issue: BadgeIssue<'_>,
    attestation: &Attestation<'_>,
    now: i64,
) -> Result<u64> {
    let Counterparts {
        registry,
        event,
        ledger,
    } = counterparts;

    ensure_verifiable(event, record, now)?;
    registry.ensure_not_paused()?;

    record.record(
        event.id,
        attestation.attendee,
        attestation.method,
        attestation.verified_by,
        attestation.proof,
        now,
    )?;

    let current_attendees = event.admit_attendee()?;
    emit!(AttendeeCountUpdated {
        event_id: event.id,
        current_attendees,
        max_attendees: event.max_attendees,
    });

    let token_id = {
        let mut ledger = OperationLock::acquire(ledger, GuardedOperation::Mint)?;
        ledger.issue(event, attestation.attendee, attestation.metadata_uri, issue, now)?
    };
    record.attach_badge(token_id);

    verifier.total_verified = verifier
        .total_verified
        .checked_add(1)
        .ok_or(AttendanceError::ArithmeticOverflow)?;

    emit!(AttendanceVerified {
        attendee: attestation.attendee,
        event_id: event.id,
        method: attestation.method,
        verified_by: attestation.verified_by,
        badge_id: token_id,
        timestamp: now,
    });

    Ok(token_id)
}

/// Badge accounts touched when a revocation cascades into the ledger
pub struct BadgeCascade<'a> {
    pub ledger: &'a mut BadgeLedger,
    pub badge: &'a mut Badge,
    pub stats: &'a mut UserStats,
}

pub fn revoke_attendance(
    verifier: &mut AttendanceVerifier,
    record: &mut AttendanceRecord,
    cascade: Option<BadgeCascade<'_>>,
    reason: &str,
    revoked_by: Pubkey,
    now: i64,
) -> Result<()> {
    require!(!reason.is_empty(), AttendanceError::EmptyReason);
    require!(reason.len() <= MAX_REASON_LEN, AttendanceError::FieldTooLong);
    record.revoke(reason, now)?;

    if record.badge_minted {
        let BadgeCascade { ledger, badge, stats } = cascade.ok_or(AttendanceError::AccountMissing)?;
        require!(badge.token_id == record.badge_id, AttendanceError::InvalidAccount);
        // A badge revoked directly on the ledger stays as it is.
        if !badge.revoked {
            let mut ledger = OperationLock::acquire(ledger, GuardedOperation::RevokeBadge)?;
            ledger.revoke(badge, stats, reason, revoked_by, now)?;
        }
    }

    verifier.total_revoked = verifier
        .total_revoked
        .checked_add(1)
        .ok_or(AttendanceError::ArithmeticOverflow)?;

    emit!(AttendanceRevoked {
        attendee: record.attendee,
        event_id: record.event_id,
        revoked_by,
        reason: reason.to_string(),
        timestamp: now,
    });
    Ok(())
}
