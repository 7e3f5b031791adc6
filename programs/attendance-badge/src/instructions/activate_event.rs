use anchor_lang::prelude::*;

use crate::{contexts::SetEventActive, events::EventActivated, state::Capabilities};

pub fn handler(ctx: Context<SetEventActive>, event_id: u64) -> Result<()> {
    let authority = ctx.accounts.authority.key();
    let caps = Capabilities::of(ctx.accounts.authority_role.as_deref());

    ctx.accounts.event_registry.ensure_not_paused()?;
    ctx.accounts.event.activate(caps)?;

    emit!(EventActivated {
        event_id,
        activated_by: authority,
        timestamp: Clock::get()?.unix_timestamp,
    });

    msg!("✅ Event {} reactivated", event_id);

    Ok(())
}
