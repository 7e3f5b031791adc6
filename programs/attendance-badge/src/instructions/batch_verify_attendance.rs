use anchor_lang::prelude::*;

use crate::{
    account_io::{
        expect_pda, open_account, open_event_badges, open_user_stats, save_event_badges, save_user_stats,
        AccountWriter,
    },
    attestation::{commit_attendance, Attestation, Counterparts},
    constants::*,
    contexts::BatchVerifyAttendance,
    error::AttendanceError,
    guard::{GuardedOperation, OperationLock},
    instructions::validate_batch_shape,
    state::{AttendanceRecord, Badge, BadgeIssue, Capabilities, IssuanceMarker, VerificationMethod},
};

/// Manually verify many attendees. Attendees already verified for the event
/// are skipped so a partially applied batch can be resubmitted; any other
/// failure aborts the whole batch.
///
/// Badge accounts follow the ledger's next token id, counting only the
/// entries that are actually verified.
pub fn handler<'info>(
    ctx: Context<'_, '_, 'info, 'info, BatchVerifyAttendance<'info>>,
    event_id: u64,
    attendees: Vec<Pubkey>,
    metadata_uris: Vec<String>,
    note: String,
) -> Result<Vec<u64>> {
    let authority = ctx.accounts.authority.key();
    let caps = Capabilities::of(ctx.accounts.authority_role.as_deref());
    require!(caps.is_privileged(), AttendanceError::Unauthorized);
    validate_batch_shape(
        attendees.len(),
        metadata_uris.len(),
        ctx.remaining_accounts.len(),
        BATCH_VERIFY_ACCOUNTS_PER_ENTRY,
    )?;
    let now = Clock::get()?.unix_timestamp;
    let program_id = ctx.program_id;

    let payer = ctx.accounts.authority.to_account_info();
    let system_program = ctx.accounts.system_program.to_account_info();
    let writer = AccountWriter::new(&payer, &system_program, program_id);
    let roster_info = ctx.accounts.event_badges.to_account_info();
    let mut roster = open_event_badges(&roster_info, event_id, ctx.bumps.event_badges, program_id)?;

    let accounts = &mut *ctx.accounts;
    accounts.attendance_verifier.ensure_not_paused()?;
    let mut verifier = OperationLock::acquire(
        &mut *accounts.attendance_verifier,
        GuardedOperation::BatchVerify,
    )?;

    let event_id_bytes = event_id.to_le_bytes();
    let mut token_ids = Vec::with_capacity(attendees.len());
    let mut skipped = 0usize;

    let entries = ctx.remaining_accounts.chunks(BATCH_VERIFY_ACCOUNTS_PER_ENTRY);
    for ((attendee, metadata_uri), entry) in attendees.iter().zip(&metadata_uris).zip(entries) {
        let [record_info, marker_info, badge_info, stats_info] = entry else {
            return err!(AttendanceError::AccountMissing);
        };
        require!(*attendee != Pubkey::default(), AttendanceError::InvalidAttendee);

        let record_seeds: [&[u8]; 3] = [ATTENDANCE_SEED, &event_id_bytes, attendee.as_ref()];
        let record_bump = expect_pda(record_info, &record_seeds, program_id)?;
        let mut record: AttendanceRecord = open_account(record_info, program_id)?;
        if record.attended {
            msg!("   {} already verified, skipping", attendee);
            skipped += 1;
            continue;
        }

        let marker_seeds: [&[u8]; 3] = [ISSUANCE_SEED, &event_id_bytes, attendee.as_ref()];
        let marker_bump = expect_pda(marker_info, &marker_seeds, program_id)?;
        let token_id_bytes = accounts.badge_ledger.next_token_id.to_le_bytes();
        let badge_seeds: [&[u8]; 2] = [BADGE_SEED, &token_id_bytes];
        let badge_bump = expect_pda(badge_info, &badge_seeds, program_id)?;
        let stats_bump = expect_pda(stats_info, &[USER_STATS_SEED, attendee.as_ref()], program_id)?;

        let mut marker: IssuanceMarker = open_account(marker_info, program_id)?;
        let mut badge = Badge::default();
        let mut stats = open_user_stats(stats_info, *attendee, stats_bump, program_id)?;

        let token_id = commit_attendance(
            &mut verifier,
            Counterparts {
                registry: &accounts.event_registry,
                event: &mut accounts.event,
                ledger: &mut accounts.badge_ledger,
            },
            &mut record,
            BadgeIssue {
                marker: &mut marker,
                badge: &mut badge,
                stats: &mut stats,
                roster: &mut roster,
            },
            &Attestation {
                attendee: *attendee,
                verified_by: authority,
                method: VerificationMethod::Manual,
                proof: note.as_bytes(),
                metadata_uri,
            },
            now,
        )?;
        record.bump = record_bump;
        marker.bump = marker_bump;
        badge.bump = badge_bump;

        writer.write(&record, record_info, &record_seeds, record_bump, 8 + AttendanceRecord::INIT_SPACE)?;
        writer.write(&marker, marker_info, &marker_seeds, marker_bump, 8 + IssuanceMarker::INIT_SPACE)?;
        writer.write(&badge, badge_info, &badge_seeds, badge_bump, 8 + Badge::INIT_SPACE)?;
        save_user_stats(&writer, stats_info, &stats)?;
        token_ids.push(token_id);
    }
    drop(verifier);

    save_event_badges(&writer, &roster_info, &roster)?;

    msg!(
        "✅ Batch verified {} attendees for event {} ({} skipped)",
        token_ids.len(),
        event_id,
        skipped
    );

    Ok(token_ids)
}
