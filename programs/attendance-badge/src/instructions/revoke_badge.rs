use anchor_lang::prelude::*;

use crate::{
    contexts::SetBadgeRevoked,
    error::AttendanceError,
    guard::{GuardedOperation, OperationLock},
    state::Capabilities,
};

pub fn handler(ctx: Context<SetBadgeRevoked>, token_id: u64, reason: String) -> Result<()> {
    let authority = ctx.accounts.authority.key();
    let caps = Capabilities::of(ctx.accounts.authority_role.as_deref());
    require!(caps.is_admin(), AttendanceError::Unauthorized);
    let now = Clock::get()?.unix_timestamp;

    let accounts = &mut *ctx.accounts;
    let mut ledger = OperationLock::acquire(&mut *accounts.badge_ledger, GuardedOperation::RevokeBadge)?;
    ledger.revoke(&mut accounts.badge, &mut accounts.user_stats, &reason, authority, now)?;

    msg!("🚫 Badge {} revoked: {}", token_id, reason);

    Ok(())
}
