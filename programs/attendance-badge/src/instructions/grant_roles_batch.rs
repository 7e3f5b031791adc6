use anchor_lang::prelude::*;

use crate::{
    account_io::{expect_pda, open_account, AccountWriter},
    constants::ROLE_SEED,
    contexts::GrantRolesBatch,
    error::AttendanceError,
    instructions::{grant_role::emit_granted, validate_batch_shape},
    state::{Capabilities, RoleGrant, Tier},
};

/// Grant one tier to many principals. Any invalid entry aborts the batch.
pub fn handler<'info>(
    ctx: Context<'_, '_, 'info, 'info, GrantRolesBatch<'info>>,
    tier: Tier,
    principals: Vec<Pubkey>,
) -> Result<()> {
    let authority = ctx.accounts.authority.key();
    let caps = Capabilities::of(ctx.accounts.authority_role.as_deref());
    let now = Clock::get()?.unix_timestamp;

    let access_registry = &ctx.accounts.access_registry;
    access_registry.ensure_not_paused()?;
    access_registry.authorize_grant(&authority, caps, tier)?;

    validate_batch_shape(principals.len(), principals.len(), ctx.remaining_accounts.len(), 1)?;

    let payer = ctx.accounts.authority.to_account_info();
    let system_program = ctx.accounts.system_program.to_account_info();
    let writer = AccountWriter::new(&payer, &system_program, ctx.program_id);

    for (principal, role_info) in principals.iter().zip(ctx.remaining_accounts) {
        require!(*principal != Pubkey::default(), AttendanceError::InvalidPrincipal);
        let seeds: [&[u8]; 2] = [ROLE_SEED, principal.as_ref()];
        let bump = expect_pda(role_info, &seeds, ctx.program_id)?;

        let mut role: RoleGrant = open_account(role_info, ctx.program_id)?;
        role.principal = *principal;
        role.bump = bump;
        role.grant(tier, now);
        writer.write(&role, role_info, &seeds, bump, 8 + RoleGrant::INIT_SPACE)?;

        emit_granted(*principal, tier, authority, now);
    }

    msg!("✅ Granted {:?} to {} principals", tier, principals.len());

    Ok(())
}
