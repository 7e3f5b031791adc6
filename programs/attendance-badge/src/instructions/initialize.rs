use anchor_lang::prelude::*;

use crate::{
    contexts::Initialize,
    events::AdminAdded,
    state::Tier,
};

pub fn handler(ctx: Context<Initialize>) -> Result<()> {
    let owner = ctx.accounts.owner.key();
    let now = Clock::get()?.unix_timestamp;

    let access_registry = &mut ctx.accounts.access_registry;
    access_registry.owner = owner;
    access_registry.root_admin = owner;
    access_registry.paused = false;
    access_registry.bump = ctx.bumps.access_registry;

    let event_registry = &mut ctx.accounts.event_registry;
    event_registry.next_event_id = 1;
    event_registry.total_events = 0;
    event_registry.paused = false;
    event_registry.bump = ctx.bumps.event_registry;

    let badge_ledger = &mut ctx.accounts.badge_ledger;
    badge_ledger.next_token_id = 1;
    badge_ledger.total_minted = 0;
    badge_ledger.total_revoked = 0;
    badge_ledger.paused = false;
    badge_ledger.locks = 0;
    badge_ledger.bump = ctx.bumps.badge_ledger;

    let attendance_verifier = &mut ctx.accounts.attendance_verifier;
    attendance_verifier.total_verified = 0;
    attendance_verifier.total_revoked = 0;
    attendance_verifier.paused = false;
    attendance_verifier.locks = 0;
    attendance_verifier.bump = ctx.bumps.attendance_verifier;

    let owner_role = &mut ctx.accounts.owner_role;
    owner_role.principal = owner;
    owner_role.grant(Tier::Admin, now);
    owner_role.bump = ctx.bumps.owner_role;

    emit!(AdminAdded {
        principal: owner,
        granted_by: owner,
        timestamp: now,
    });

    msg!("✅ Attendance badge system initialized!");
    msg!("   Owner / root admin: {}", owner);

    Ok(())
}
