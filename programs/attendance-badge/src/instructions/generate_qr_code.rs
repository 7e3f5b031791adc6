use anchor_lang::prelude::*;

use crate::{
    contexts::GenerateQrCode,
    error::AttendanceError,
    events::QrCodeGenerated,
    state::{Capabilities, Tier},
};

pub fn handler(ctx: Context<GenerateQrCode>, event_id: u64, secret: String, validity_secs: i64) -> Result<()> {
    let authority = ctx.accounts.authority.key();
    let caps = Capabilities::of(ctx.accounts.authority_role.as_deref());
    let now = Clock::get()?.unix_timestamp;

    ctx.accounts.attendance_verifier.ensure_not_paused()?;

    let event = &ctx.accounts.event;
    require!(
        authority == event.organizer || caps.holds(Tier::Verifier) || caps.is_admin(),
        AttendanceError::Unauthorized
    );
    require!(event.is_active, AttendanceError::EventInactive);

    let qr_challenge = &mut ctx.accounts.qr_challenge;
    let expires_at = qr_challenge.issue(event_id, &secret, validity_secs, authority, now)?;
    qr_challenge.bump = ctx.bumps.qr_challenge;

    emit!(QrCodeGenerated {
        event_id,
        challenge_hash: qr_challenge.secret_hash,
        expires_at,
        generated_by: authority,
    });

    msg!("✅ QR challenge for event {} valid until {}", event_id, expires_at);

    Ok(())
}
