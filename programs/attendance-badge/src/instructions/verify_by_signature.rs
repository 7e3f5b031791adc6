use anchor_lang::prelude::*;

use crate::{
    account_io::{open_event_badges, open_user_stats, save_event_badges, save_user_stats, AccountWriter},
    attestation::{accept_signed_attendance, commit_attendance, ensure_verifiable, Attestation, Counterparts},
    contexts::VerifyBySignature,
    ed25519::verify_preceding_signature,
    error::AttendanceError,
    guard::{GuardedOperation, OperationLock},
    state::{BadgeIssue, Capabilities, VerificationMethod},
};

/// Accept a signed message `keccak(domain, event_id, attendee, timestamp)`
/// from an organizer or verifier, checked by the Ed25519 precompile call
/// placed just before this instruction.
pub fn handler(
    ctx: Context<VerifyBySignature>,
    event_id: u64,
    proof_digest: [u8; 32],
    attester: Pubkey,
    timestamp: i64,
    signature: [u8; 64],
    metadata_uri: String,
) -> Result<u64> {
    let attendee = ctx.accounts.attendee.key();
    let now = Clock::get()?.unix_timestamp;

    msg!("📝 Verifying signed attendance for event {}...", event_id);

    let accounts = &mut *ctx.accounts;
    accounts.attendance_verifier.ensure_not_paused()?;
    let mut verifier = OperationLock::acquire(
        &mut *accounts.attendance_verifier,
        GuardedOperation::VerifyBySignature,
    )?;
    ensure_verifiable(&accounts.event, &accounts.attendance_record, now)?;

    // =========================================================================
    // 1. Freshness, digest and attester tier
    // =========================================================================
    let attester_caps = Capabilities::of(accounts.attester_role.as_deref());
    let message = accept_signed_attendance(event_id, &attendee, attester_caps, timestamp, proof_digest, now)?;

    // =========================================================================
    // 2. Ed25519 precompile checked exactly this signer, message and signature
    // =========================================================================
    verify_preceding_signature(&accounts.instructions, &attester, &message, &signature)?;
    msg!("✓ Signed by {}", attester);

    // =========================================================================
    // 3. Replay
    // =========================================================================
    accounts
        .consumed_proof
        .consume(message, event_id, attendee, now, AttendanceError::SignatureReplayed)?;
    accounts.consumed_proof.bump = ctx.bumps.consumed_proof;

    // =========================================================================
    // 4. Record, admit, mint
    // =========================================================================
    let payer = accounts.attendee.to_account_info();
    let system_program = accounts.system_program.to_account_info();
    let writer = AccountWriter::new(&payer, &system_program, ctx.program_id);
    let stats_info = accounts.user_stats.to_account_info();
    let roster_info = accounts.event_badges.to_account_info();
    let mut stats = open_user_stats(&stats_info, attendee, ctx.bumps.user_stats, ctx.program_id)?;
    let mut roster = open_event_badges(&roster_info, event_id, ctx.bumps.event_badges, ctx.program_id)?;

    let token_id = commit_attendance(
        &mut verifier,
        Counterparts {
            registry: &accounts.event_registry,
            event: &mut accounts.event,
            ledger: &mut accounts.badge_ledger,
        },
        &mut accounts.attendance_record,
        BadgeIssue {
            marker: &mut accounts.issuance_marker,
            badge: &mut accounts.badge,
            stats: &mut stats,
            roster: &mut roster,
        },
        &Attestation {
            attendee,
            verified_by: attester,
            method: VerificationMethod::Signature,
            proof: &signature,
            metadata_uri: &metadata_uri,
        },
        now,
    )?;
    drop(verifier);

    accounts.attendance_record.bump = ctx.bumps.attendance_record;
    accounts.issuance_marker.bump = ctx.bumps.issuance_marker;
    accounts.badge.bump = ctx.bumps.badge;
    save_user_stats(&writer, &stats_info, &stats)?;
    save_event_badges(&writer, &roster_info, &roster)?;

    msg!("✅ Attendance verified! Badge {} minted for {}", token_id, attendee);

    Ok(token_id)
}
