use anchor_lang::prelude::*;

use crate::{
    account_io::{
        expect_pda, open_account, open_event_badges, open_user_stats, save_event_badges, save_user_stats,
        AccountWriter,
    },
    constants::*,
    contexts::BatchMintBadges,
    error::AttendanceError,
    guard::{GuardedOperation, OperationLock},
    instructions::validate_batch_shape,
    state::{Badge, BadgeIssue, Capabilities, IssuanceMarker},
};

/// Mint one badge per attendee. The first failing entry aborts the batch.
pub fn handler<'info>(
    ctx: Context<'_, '_, 'info, 'info, BatchMintBadges<'info>>,
    event_id: u64,
    attendees: Vec<Pubkey>,
    metadata_uris: Vec<String>,
) -> Result<Vec<u64>> {
    let caps = Capabilities::of(ctx.accounts.authority_role.as_deref());
    require!(caps.is_privileged(), AttendanceError::Unauthorized);
    validate_batch_shape(
        attendees.len(),
        metadata_uris.len(),
        ctx.remaining_accounts.len(),
        BATCH_MINT_ACCOUNTS_PER_ENTRY,
    )?;
    let now = Clock::get()?.unix_timestamp;
    let program_id = ctx.program_id;

    let payer = ctx.accounts.authority.to_account_info();
    let system_program = ctx.accounts.system_program.to_account_info();
    let writer = AccountWriter::new(&payer, &system_program, program_id);

    let roster_info = ctx.accounts.event_badges.to_account_info();
    let mut roster = open_event_badges(&roster_info, event_id, ctx.bumps.event_badges, program_id)?;

    let accounts = &mut *ctx.accounts;
    let mut ledger = OperationLock::acquire(&mut *accounts.badge_ledger, GuardedOperation::BatchMint)?;
    let mut token_ids = Vec::with_capacity(attendees.len());

    let entries = ctx.remaining_accounts.chunks(BATCH_MINT_ACCOUNTS_PER_ENTRY);
    for ((attendee, metadata_uri), entry) in attendees.iter().zip(&metadata_uris).zip(entries) {
        let [marker_info, badge_info, stats_info] = entry else {
            return err!(AttendanceError::AccountMissing);
        };

        let event_id_bytes = event_id.to_le_bytes();
        let marker_seeds: [&[u8]; 3] = [ISSUANCE_SEED, &event_id_bytes, attendee.as_ref()];
        let marker_bump = expect_pda(marker_info, &marker_seeds, program_id)?;
        let token_id_bytes = ledger.next_token_id.to_le_bytes();
        let badge_seeds: [&[u8]; 2] = [BADGE_SEED, &token_id_bytes];
        let badge_bump = expect_pda(badge_info, &badge_seeds, program_id)?;
        let stats_bump = expect_pda(stats_info, &[USER_STATS_SEED, attendee.as_ref()], program_id)?;

        let mut marker: IssuanceMarker = open_account(marker_info, program_id)?;
        let mut badge = Badge::default();
        let mut stats = open_user_stats(stats_info, *attendee, stats_bump, program_id)?;

        let token_id = ledger.issue(
            &accounts.event,
            *attendee,
            metadata_uri,
            BadgeIssue {
                marker: &mut marker,
                badge: &mut badge,
                stats: &mut stats,
                roster: &mut roster,
            },
            now,
        )?;
        marker.bump = marker_bump;
        badge.bump = badge_bump;

        writer.write(&marker, marker_info, &marker_seeds, marker_bump, 8 + IssuanceMarker::INIT_SPACE)?;
        writer.write(&badge, badge_info, &badge_seeds, badge_bump, 8 + Badge::INIT_SPACE)?;
        save_user_stats(&writer, stats_info, &stats)?;
        token_ids.push(token_id);
    }
    drop(ledger);

    save_event_badges(&writer, &roster_info, &roster)?;

    msg!("✅ Minted {} badges for event {}", token_ids.len(), event_id);

    Ok(token_ids)
}
