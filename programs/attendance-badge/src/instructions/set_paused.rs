use anchor_lang::prelude::*;

use crate::{
    contexts::SetPaused,
    error::AttendanceError,
    events::PauseStateChanged,
    state::{Capabilities, Component},
};

/// The switch itself is never gated by the pause it controls.
pub fn handler(ctx: Context<SetPaused>, component: Component, paused: bool) -> Result<()> {
    let authority = ctx.accounts.authority.key();
    let caps = Capabilities::of(ctx.accounts.authority_role.as_deref());
    require!(caps.is_admin(), AttendanceError::Unauthorized);

    let accounts = ctx.accounts;
    match component {
        Component::AccessRegistry => accounts.access_registry.paused = paused,
        Component::EventRegistry => accounts.event_registry.paused = paused,
        Component::BadgeLedger => accounts.badge_ledger.paused = paused,
        Component::AttendanceVerifier => accounts.attendance_verifier.paused = paused,
    }

    emit!(PauseStateChanged {
        component,
        paused,
        changed_by: authority,
        timestamp: Clock::get()?.unix_timestamp,
    });

    msg!("✅ {:?} paused: {}", component, paused);

    Ok(())
}
