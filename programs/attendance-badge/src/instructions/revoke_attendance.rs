use anchor_lang::prelude::*;

use crate::{
    account_io::{exists, read_account, AccountWriter},
    attestation::{revoke_attendance, BadgeCascade},
    constants::ATTENDANCE_SEED,
    contexts::RevokeAttendance,
    error::AttendanceError,
    guard::{GuardedOperation, OperationLock},
    state::{AttendanceRecord, Capabilities},
};

pub fn handler(ctx: Context<RevokeAttendance>, event_id: u64, attendee: Pubkey, reason: String) -> Result<()> {
    let authority = ctx.accounts.authority.key();
    let caps = Capabilities::of(ctx.accounts.authority_role.as_deref());
    require!(caps.can_organize(), AttendanceError::Unauthorized);
    let now = Clock::get()?.unix_timestamp;

    let payer = ctx.accounts.authority.to_account_info();
    let system_program = ctx.accounts.system_program.to_account_info();
    let writer = AccountWriter::new(&payer, &system_program, ctx.program_id);

    let record_info = ctx.accounts.attendance_record.to_account_info();
    require!(exists(&record_info), AttendanceError::NotRecorded);
    let mut record: AttendanceRecord = read_account(&record_info, ctx.program_id)?;

    let accounts = &mut *ctx.accounts;
    accounts.attendance_verifier.ensure_not_paused()?;
    let mut verifier = OperationLock::acquire(
        &mut *accounts.attendance_verifier,
        GuardedOperation::RevokeAttendance,
    )?;

    let cascade = match (accounts.badge.as_deref_mut(), accounts.user_stats.as_deref_mut()) {
        (Some(badge), Some(stats)) => Some(BadgeCascade {
            ledger: &mut accounts.badge_ledger,
            badge,
            stats,
        }),
        _ => None,
    };
    revoke_attendance(&mut verifier, &mut record, cascade, &reason, authority, now)?;
    drop(verifier);

    writer.write(
        &record,
        &record_info,
        &[ATTENDANCE_SEED, event_id.to_le_bytes().as_ref(), attendee.as_ref()],
        ctx.bumps.attendance_record,
        0,
    )?;

    msg!("🚫 Attendance of {} at event {} revoked: {}", attendee, event_id, reason);

    Ok(())
}
