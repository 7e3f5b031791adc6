use anchor_lang::prelude::*;

use crate::{
    account_io::{open_account, AccountWriter},
    constants::ROLE_SEED,
    contexts::RevokeRole,
    events::{AdminRemoved, OrganizerRemoved, VerifierRemoved},
    state::{Capabilities, RoleGrant, Tier},
};

pub fn handler(ctx: Context<RevokeRole>, principal: Pubkey, tier: Tier) -> Result<()> {
    let authority = ctx.accounts.authority.key();
    let caps = Capabilities::of(ctx.accounts.authority_role.as_deref());
    let now = Clock::get()?.unix_timestamp;

    let access_registry = &ctx.accounts.access_registry;
    access_registry.ensure_not_paused()?;
    access_registry.authorize_revoke(caps, &principal, tier)?;

    let role_info = ctx.accounts.role.to_account_info();
    let mut role: RoleGrant = open_account(&role_info, ctx.program_id)?;
    let held = role.revoke(tier, now);

    // A principal that never held the tier has nothing to write back
    if held {
        let payer = ctx.accounts.authority.to_account_info();
        let system_program = ctx.accounts.system_program.to_account_info();
        AccountWriter::new(&payer, &system_program, ctx.program_id).write(
            &role,
            &role_info,
            &[ROLE_SEED, principal.as_ref()],
            ctx.bumps.role,
            0,
        )?;
        msg!("✅ Revoked {:?} from {}", tier, principal);
    } else {
        msg!("{} does not hold {:?}", principal, tier);
    }

    match tier {
        Tier::Admin => emit!(AdminRemoved {
            principal,
            revoked_by: authority,
            timestamp: now,
        }),
        Tier::Organizer => emit!(OrganizerRemoved {
            principal,
            revoked_by: authority,
            timestamp: now,
        }),
        Tier::Verifier => emit!(VerifierRemoved {
            principal,
            revoked_by: authority,
            timestamp: now,
        }),
    }

    Ok(())
}
