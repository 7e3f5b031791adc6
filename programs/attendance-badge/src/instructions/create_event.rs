use anchor_lang::prelude::*;

use crate::{
    account_io::{open_account, AccountWriter},
    constants::{CATEGORY_INDEX_SEED, ORGANIZER_INDEX_SEED},
    contexts::CreateEvent,
    error::AttendanceError,
    events::EventCreated,
    hashing::metadata_key as derive_metadata_key,
    state::{Capabilities, EventDetails, EventIndex},
};

pub fn handler(
    ctx: Context<CreateEvent>,
    metadata_key: [u8; 32],
    metadata_uri: String,
    details: EventDetails,
) -> Result<u64> {
    let organizer = ctx.accounts.organizer.key();
    let caps = Capabilities::of(ctx.accounts.organizer_role.as_deref());
    let now = Clock::get()?.unix_timestamp;

    require!(caps.can_organize(), AttendanceError::Unauthorized);
    let event_registry = &mut ctx.accounts.event_registry;
    event_registry.ensure_not_paused()?;

    let category = details.category.clone();
    let event = &mut ctx.accounts.event;
    let event_id = event_registry.allocate_id()?;
    event.open(event_id, organizer, metadata_uri, details, now)?;
    event.bump = ctx.bumps.event;

    require!(
        derive_metadata_key(&event.metadata_uri) == metadata_key,
        AttendanceError::InvalidAccount
    );
    let metadata_claim = &mut ctx.accounts.metadata_claim;
    metadata_claim.claim(event_id)?;
    metadata_claim.bump = ctx.bumps.metadata_claim;

    // ========================================================================
    // Secondary indexes (insertion order)
    // ========================================================================
    let payer = ctx.accounts.organizer.to_account_info();
    let system_program = ctx.accounts.system_program.to_account_info();
    let writer = AccountWriter::new(&payer, &system_program, ctx.program_id);

    let organizer_info = ctx.accounts.organizer_index.to_account_info();
    let mut by_organizer: EventIndex = open_account(&organizer_info, ctx.program_id)?;
    by_organizer.push(event_id);
    by_organizer.bump = ctx.bumps.organizer_index;
    writer.write(
        &by_organizer,
        &organizer_info,
        &[ORGANIZER_INDEX_SEED, organizer.as_ref()],
        ctx.bumps.organizer_index,
        0,
    )?;

    if !category.is_empty() {
        let category_info = ctx.accounts.category_index.to_account_info();
        let mut by_category: EventIndex = open_account(&category_info, ctx.program_id)?;
        by_category.push(event_id);
        by_category.bump = ctx.bumps.category_index;
        writer.write(
            &by_category,
            &category_info,
            &[CATEGORY_INDEX_SEED, category.as_bytes()],
            ctx.bumps.category_index,
            0,
        )?;
    }

    let event = &ctx.accounts.event;
    emit!(EventCreated {
        event_id,
        organizer,
        title: event.title.clone(),
        start_time: event.start_time,
        end_time: event.end_time,
        max_attendees: event.max_attendees,
        timestamp: now,
    });

    msg!("✅ Event {} created by {}", event_id, organizer);
    msg!("   Window: {} .. {}", event.start_time, event.end_time);
    if event.max_attendees > 0 {
        msg!("   Capacity: {}", event.max_attendees);
    }

    Ok(event_id)
}
