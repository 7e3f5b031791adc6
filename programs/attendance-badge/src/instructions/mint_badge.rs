use anchor_lang::prelude::*;

use crate::{
    account_io::{open_event_badges, open_user_stats, save_event_badges, save_user_stats, AccountWriter},
    contexts::MintBadge,
    error::AttendanceError,
    guard::{GuardedOperation, OperationLock},
    state::{BadgeIssue, Capabilities},
};

/// Direct mint outside the verification flow. No attendance record is written.
pub fn handler(
    ctx: Context<MintBadge>,
    event_id: u64,
    attendee: Pubkey,
    metadata_uri: String,
) -> Result<u64> {
    let caps = Capabilities::of(ctx.accounts.authority_role.as_deref());
    require!(caps.is_privileged(), AttendanceError::Unauthorized);
    let now = Clock::get()?.unix_timestamp;

    let payer = ctx.accounts.authority.to_account_info();
    let system_program = ctx.accounts.system_program.to_account_info();
    let writer = AccountWriter::new(&payer, &system_program, ctx.program_id);

    let stats_info = ctx.accounts.user_stats.to_account_info();
    let roster_info = ctx.accounts.event_badges.to_account_info();
    let mut stats = open_user_stats(&stats_info, attendee, ctx.bumps.user_stats, ctx.program_id)?;
    let mut roster = open_event_badges(&roster_info, event_id, ctx.bumps.event_badges, ctx.program_id)?;

    let accounts = &mut *ctx.accounts;
    let token_id = {
        let mut ledger = OperationLock::acquire(&mut *accounts.badge_ledger, GuardedOperation::Mint)?;
        ledger.issue(
            &accounts.event,
            attendee,
            &metadata_uri,
            BadgeIssue {
                marker: &mut accounts.issuance_marker,
                badge: &mut accounts.badge,
                stats: &mut stats,
                roster: &mut roster,
            },
            now,
        )?
    };
    accounts.issuance_marker.bump = ctx.bumps.issuance_marker;
    accounts.badge.bump = ctx.bumps.badge;

    save_user_stats(&writer, &stats_info, &stats)?;
    save_event_badges(&writer, &roster_info, &roster)?;

    msg!("✅ Badge {} minted for {} (event {})", token_id, attendee, event_id);

    Ok(token_id)
}
