use anchor_lang::prelude::*;

use crate::{
    contexts::GrantRole,
    error::AttendanceError,
    events::{AdminAdded, OrganizerAdded, VerifierAdded},
    state::{Capabilities, Tier},
};

pub fn handler(ctx: Context<GrantRole>, principal: Pubkey, tier: Tier) -> Result<()> {
    let authority = ctx.accounts.authority.key();
    let caps = Capabilities::of(ctx.accounts.authority_role.as_deref());
    let now = Clock::get()?.unix_timestamp;

    let access_registry = &ctx.accounts.access_registry;
    access_registry.ensure_not_paused()?;
    access_registry.authorize_grant(&authority, caps, tier)?;
    require!(principal != Pubkey::default(), AttendanceError::InvalidPrincipal);

    let role = &mut ctx.accounts.role;
    role.principal = principal;
    role.bump = ctx.bumps.role;
    let added = role.grant(tier, now);

    emit_granted(principal, tier, authority, now);

    if added {
        msg!("✅ Granted {:?} to {}", tier, principal);
    } else {
        msg!("{} already holds {:?}", principal, tier);
    }

    Ok(())
}

pub(crate) fn emit_granted(principal: Pubkey, tier: Tier, granted_by: Pubkey, timestamp: i64) {
    match tier {
        Tier::Admin => emit!(AdminAdded {
            principal,
            granted_by,
            timestamp,
        }),
        Tier::Organizer => emit!(OrganizerAdded {
            principal,
            granted_by,
            timestamp,
        }),
        Tier::Verifier => emit!(VerifierAdded {
            principal,
            granted_by,
            timestamp,
        }),
    }
}
