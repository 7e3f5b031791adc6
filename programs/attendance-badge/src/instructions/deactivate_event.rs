use anchor_lang::prelude::*;

use crate::{
    contexts::SetEventActive,
    events::EventDeactivated,
    state::Capabilities,
};

pub fn handler(ctx: Context<SetEventActive>, event_id: u64, reason: String) -> Result<()> {
    let authority = ctx.accounts.authority.key();
    let caps = Capabilities::of(ctx.accounts.authority_role.as_deref());

    ctx.accounts.event_registry.ensure_not_paused()?;
    ctx.accounts.event.deactivate(&authority, caps, reason.clone())?;

    emit!(EventDeactivated {
        event_id,
        deactivated_by: authority,
        reason,
        timestamp: Clock::get()?.unix_timestamp,
    });

    msg!("⏸️ Event {} deactivated", event_id);

    Ok(())
}
