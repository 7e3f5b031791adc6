use anchor_lang::prelude::*;

use crate::{
    account_io::{open_event_badges, open_user_stats, save_event_badges, save_user_stats, AccountWriter},
    attestation::{commit_attendance, Attestation, Counterparts},
    contexts::VerifyManually,
    error::AttendanceError,
    guard::{GuardedOperation, OperationLock},
    state::{BadgeIssue, Capabilities, VerificationMethod},
};

pub fn handler(
    ctx: Context<VerifyManually>,
    event_id: u64,
    attendee: Pubkey,
    note: String,
    metadata_uri: String,
) -> Result<u64> {
    let authority = ctx.accounts.authority.key();
    let caps = Capabilities::of(ctx.accounts.authority_role.as_deref());
    let now = Clock::get()?.unix_timestamp;

    require!(caps.is_privileged(), AttendanceError::Unauthorized);
    require!(attendee != Pubkey::default(), AttendanceError::InvalidAttendee);

    let accounts = &mut *ctx.accounts;
    accounts.attendance_verifier.ensure_not_paused()?;
    let mut verifier = OperationLock::acquire(
        &mut *accounts.attendance_verifier,
        GuardedOperation::VerifyManually,
    )?;

    let payer = accounts.authority.to_account_info();
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
            verified_by: authority,
            method: VerificationMethod::Manual,
            proof: note.as_bytes(),
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

    msg!("✅ {} attested {} at event {} (badge {})", authority, attendee, event_id, token_id);

    Ok(token_id)
}
