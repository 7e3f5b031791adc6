use anchor_lang::prelude::*;

use crate::{
    account_io::{expect_pda, open_account, AccountWriter},
    constants::CATEGORY_INDEX_SEED,
    contexts::UpdateEvent,
    error::AttendanceError,
    events::EventUpdated,
    state::{Capabilities, EventDetails, EventIndex},
};

pub fn handler(ctx: Context<UpdateEvent>, event_id: u64, details: EventDetails) -> Result<()> {
    let authority = ctx.accounts.authority.key();
    let caps = Capabilities::of(ctx.accounts.authority_role.as_deref());
    let now = Clock::get()?.unix_timestamp;

    ctx.accounts.event_registry.ensure_not_paused()?;

    let event = &mut ctx.accounts.event;
    let old_category = event.category.clone();
    let new_category = details.category.clone();
    event.update(&authority, caps, details, now)?;

    if old_category != new_category {
        let payer = ctx.accounts.authority.to_account_info();
        let system_program = ctx.accounts.system_program.to_account_info();
        let writer = AccountWriter::new(&payer, &system_program, ctx.program_id);

        if !old_category.is_empty() {
            let info = ctx
                .accounts
                .old_category_index
                .as_ref()
                .ok_or(AttendanceError::AccountMissing)?
                .to_account_info();
            let seeds: [&[u8]; 2] = [CATEGORY_INDEX_SEED, old_category.as_bytes()];
            let bump = expect_pda(&info, &seeds, ctx.program_id)?;
            let mut index: EventIndex = open_account(&info, ctx.program_id)?;
            index.remove(event_id);
            writer.write(&index, &info, &seeds, bump, 0)?;
        }

        if !new_category.is_empty() {
            let info = ctx
                .accounts
                .new_category_index
                .as_ref()
                .ok_or(AttendanceError::AccountMissing)?
                .to_account_info();
            let seeds: [&[u8]; 2] = [CATEGORY_INDEX_SEED, new_category.as_bytes()];
            let bump = expect_pda(&info, &seeds, ctx.program_id)?;
            let mut index: EventIndex = open_account(&info, ctx.program_id)?;
            index.push(event_id);
            index.bump = bump;
            writer.write(&index, &info, &seeds, bump, 0)?;
        }

        msg!("   Category: {:?} -> {:?}", old_category, new_category);
    }

    emit!(EventUpdated {
        event_id,
        updated_by: authority,
        timestamp: now,
    });

    msg!("✅ Event {} updated", event_id);

    Ok(())
}
