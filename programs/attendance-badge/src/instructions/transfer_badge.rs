use anchor_lang::prelude::*;

use crate::contexts::TransferBadge;

pub fn handler(ctx: Context<TransferBadge>, token_id: u64, new_owner: Pubkey) -> Result<()> {
    let owner = ctx.accounts.owner.key();
    let now = Clock::get()?.unix_timestamp;

    ctx.accounts
        .badge_ledger
        .transfer(&mut ctx.accounts.badge, &owner, new_owner, now)?;

    msg!("✅ Badge {} transferred {} -> {}", token_id, owner, new_owner);

    Ok(())
}
