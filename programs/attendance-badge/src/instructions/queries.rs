//! Read-only handlers. They never fail on missing optional state: absent
//! index, stats or marker accounts read as empty. Only lookups of a
//! specific event or badge report `NotFound`.
//!
//! List queries are paged so the result always fits in return data.

use anchor_lang::prelude::*;

use crate::{
    account_io::{category_index_address, exists, open_account, read_account},
    constants::MAX_PAGE_LEN,
    contexts::*,
    error::AttendanceError,
    state::*,
};

fn require_found<T: AccountDeserialize>(info: &AccountInfo, program_id: &Pubkey) -> Result<T> {
    require!(exists(info), AttendanceError::NotFound);
    read_account(info, program_id)
}

/// Ids `offset..offset + limit` of `ids`. A zero `limit`, or one above
/// `MAX_PAGE_LEN`, asks for the largest page.
pub fn page(ids: &[u64], offset: u32, limit: u16) -> Vec<u64> {
    let limit = match usize::from(limit) {
        0 => MAX_PAGE_LEN,
        n => n.min(MAX_PAGE_LEN),
    };
    ids.iter()
        .skip(offset as usize)
        .take(limit)
        .copied()
        .collect()
}

// ============================================================================
// ACCESS REGISTRY
// ============================================================================

pub fn check_role(ctx: Context<RoleQuery>, tier: Tier) -> Result<bool> {
    let role: RoleGrant = open_account(&ctx.accounts.role, ctx.program_id)?;
    Ok(role.holds(tier))
}

// ============================================================================
// EVENT REGISTRY
// ============================================================================

pub fn get_event(ctx: Context<EventQuery>) -> Result<Event> {
    require_found(&ctx.accounts.event, ctx.program_id)
}

pub fn is_event_ongoing(ctx: Context<EventQuery>) -> Result<bool> {
    let event: Event = require_found(&ctx.accounts.event, ctx.program_id)?;
    Ok(event.is_ongoing(Clock::get()?.unix_timestamp))
}

pub fn event_has_capacity(ctx: Context<EventQuery>) -> Result<bool> {
    let event: Event = require_found(&ctx.accounts.event, ctx.program_id)?;
    Ok(event.has_capacity())
}

pub fn get_events_by_organizer(ctx: Context<OrganizerEventsQuery>, offset: u32, limit: u16) -> Result<Vec<u64>> {
    let index: EventIndex = open_account(&ctx.accounts.index, ctx.program_id)?;
    Ok(page(&index.event_ids, offset, limit))
}

pub fn get_events_by_category(
    ctx: Context<CategoryEventsQuery>,
    category: String,
    offset: u32,
    limit: u16,
) -> Result<Vec<u64>> {
    // No category this long can hold events
    let Some((address, _)) = category_index_address(&category, ctx.program_id) else {
        return Ok(Vec::new());
    };
    require_keys_eq!(address, ctx.accounts.index.key(), AttendanceError::InvalidAccount);
    let index: EventIndex = open_account(&ctx.accounts.index, ctx.program_id)?;
    Ok(page(&index.event_ids, offset, limit))
}

// ============================================================================
// BADGE LEDGER
// ============================================================================

pub fn get_badge(ctx: Context<BadgeQuery>) -> Result<Badge> {
    require_found(&ctx.accounts.badge, ctx.program_id)
}

pub fn get_user_badges(ctx: Context<UserStatsQuery>, offset: u32, limit: u16) -> Result<Vec<u64>> {
    let stats: UserStats = open_account(&ctx.accounts.user_stats, ctx.program_id)?;
    Ok(page(&stats.badge_ids(), offset, limit))
}

pub fn get_user_active_badges(ctx: Context<UserStatsQuery>, offset: u32, limit: u16) -> Result<Vec<u64>> {
    let stats: UserStats = open_account(&ctx.accounts.user_stats, ctx.program_id)?;
    Ok(page(&stats.active_badge_ids(), offset, limit))
}

pub fn get_user_stats(ctx: Context<UserStatsQuery>) -> Result<UserStatsSummary> {
    let stats: UserStats = open_account(&ctx.accounts.user_stats, ctx.program_id)?;
    Ok(UserStatsSummary::from(&stats))
}

pub fn get_event_badges(ctx: Context<EventBadgesQuery>, offset: u32, limit: u16) -> Result<Vec<u64>> {
    let roster: EventBadges = open_account(&ctx.accounts.event_badges, ctx.program_id)?;
    Ok(page(&roster.token_ids, offset, limit))
}

pub fn badge_issued(ctx: Context<IssuanceQuery>) -> Result<bool> {
    let marker: IssuanceMarker = open_account(&ctx.accounts.issuance_marker, ctx.program_id)?;
    Ok(marker.is_issued())
}

// ============================================================================
// ATTENDANCE VERIFIER
// ============================================================================

pub fn has_attended(ctx: Context<AttendanceQuery>) -> Result<bool> {
    let record: AttendanceRecord = open_account(&ctx.accounts.attendance_record, ctx.program_id)?;
    Ok(record.attended)
}

pub fn get_attendance(ctx: Context<AttendanceQuery>) -> Result<AttendanceRecord> {
    require!(exists(&ctx.accounts.attendance_record), AttendanceError::NotRecorded);
    read_account(&ctx.accounts.attendance_record, ctx.program_id)
}
