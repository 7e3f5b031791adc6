use anchor_lang::prelude::*;

use crate::{
    account_io::{
        exists, open_event_badges, open_user_stats, read_account, save_event_badges, save_user_stats,
        AccountWriter,
    },
    attestation::{commit_attendance, ensure_verifiable, Attestation, Counterparts},
    contexts::VerifyByQr,
    error::AttendanceError,
    guard::{GuardedOperation, OperationLock},
    state::{BadgeIssue, QrChallenge, VerificationMethod},
};

/// Self-attested attendance: the caller presents the live QR secret
pub fn handler(
    ctx: Context<VerifyByQr>,
    event_id: u64,
    proof_digest: [u8; 32],
    secret: String,
    metadata_uri: String,
) -> Result<u64> {
    let attendee = ctx.accounts.attendee.key();
    let now = Clock::get()?.unix_timestamp;

    msg!("📝 Verifying QR attendance for event {}...", event_id);

    let accounts = &mut *ctx.accounts;
    accounts.attendance_verifier.ensure_not_paused()?;
    let mut verifier = OperationLock::acquire(
        &mut *accounts.attendance_verifier,
        GuardedOperation::VerifyByQr,
    )?;
    ensure_verifiable(&accounts.event, &accounts.attendance_record, now)?;

    let challenge_info = accounts.qr_challenge.to_account_info();
    require!(exists(&challenge_info), AttendanceError::QrNotGenerated);
    let challenge: QrChallenge = read_account(&challenge_info, ctx.program_id)?;
    let digest = challenge.redeem(&secret, now)?;
    require!(digest == proof_digest, AttendanceError::ProofDigestMismatch);

    accounts
        .consumed_proof
        .consume(digest, event_id, attendee, now, AttendanceError::QrAlreadyUsed)?;
    accounts.consumed_proof.bump = ctx.bumps.consumed_proof;
    msg!("✓ QR secret accepted");

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
            verified_by: attendee,
            method: VerificationMethod::QrCode,
            proof: secret.as_bytes(),
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
