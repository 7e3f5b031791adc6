use anchor_lang::prelude::*;
use anchor_lang::solana_program::sysvar::instructions as instructions_sysvar;

use crate::{constants::*, error::AttendanceError, state::*};

// ============================================================================
// GENESIS
// ============================================================================

/// Create the four component configs and make the signer owner and root admin
#[derive(Accounts)]
pub struct Initialize<'info> {
    /// Becomes the system owner and root admin
    #[account(mut)]
    pub owner: Signer<'info>,

    #[account(
        init,
        payer = owner,
        space = 8 + AccessRegistry::INIT_SPACE,
        seeds = [ACCESS_REGISTRY_SEED],
        bump
    )]
    pub access_registry: Account<'info, AccessRegistry>,

    #[account(
        init,
        payer = owner,
        space = 8 + EventRegistry::INIT_SPACE,
        seeds = [EVENT_REGISTRY_SEED],
        bump
    )]
    pub event_registry: Account<'info, EventRegistry>,

    #[account(
        init,
        payer = owner,
        space = 8 + BadgeLedger::INIT_SPACE,
        seeds = [BADGE_LEDGER_SEED],
        bump
    )]
    pub badge_ledger: Account<'info, BadgeLedger>,

    #[account(
        init,
        payer = owner,
        space = 8 + AttendanceVerifier::INIT_SPACE,
        seeds = [ATTENDANCE_VERIFIER_SEED],
        bump
    )]
    pub attendance_verifier: Account<'info, AttendanceVerifier>,

    /// Owner's role account, created holding Admin
    #[account(
        init,
        payer = owner,
        space = 8 + RoleGrant::INIT_SPACE,
        seeds = [ROLE_SEED, owner.key().as_ref()],
        bump
    )]
    pub owner_role: Account<'info, RoleGrant>,

    pub system_program: Program<'info, System>,
}

// ============================================================================
// ACCESS REGISTRY
// ============================================================================

#[derive(Accounts)]
#[instruction(principal: Pubkey)]
pub struct GrantRole<'info> {
    #[account(mut)]
    pub authority: Signer<'info>,

    #[account(seeds = [ACCESS_REGISTRY_SEED], bump = access_registry.bump)]
    pub access_registry: Account<'info, AccessRegistry>,

    /// Caller's tiers; absent when the caller holds none
    #[account(seeds = [ROLE_SEED, authority.key().as_ref()], bump)]
    pub authority_role: Option<Account<'info, RoleGrant>>,

    #[account(
        init_if_needed,
        payer = authority,
        space = 8 + RoleGrant::INIT_SPACE,
        seeds = [ROLE_SEED, principal.as_ref()],
        bump
    )]
    pub role: Account<'info, RoleGrant>,

    pub system_program: Program<'info, System>,
}

#[derive(Accounts)]
#[instruction(principal: Pubkey)]
pub struct RevokeRole<'info> {
    #[account(mut)]
    pub authority: Signer<'info>,

    #[account(seeds = [ACCESS_REGISTRY_SEED], bump = access_registry.bump)]
    pub access_registry: Account<'info, AccessRegistry>,

    #[account(seeds = [ROLE_SEED, authority.key().as_ref()], bump)]
    pub authority_role: Option<Account<'info, RoleGrant>>,

    /// CHECK: principal's role PDA; may not exist, in which case revoking is a no-op
    #[account(mut, seeds = [ROLE_SEED, principal.as_ref()], bump)]
    pub role: UncheckedAccount<'info>,

    pub system_program: Program<'info, System>,
}

/// Role accounts of the principals are passed as remaining accounts, in order
#[derive(Accounts)]
pub struct GrantRolesBatch<'info> {
    #[account(mut)]
    pub authority: Signer<'info>,

    #[account(seeds = [ACCESS_REGISTRY_SEED], bump = access_registry.bump)]
    pub access_registry: Account<'info, AccessRegistry>,

    #[account(seeds = [ROLE_SEED, authority.key().as_ref()], bump)]
    pub authority_role: Option<Account<'info, RoleGrant>>,

    pub system_program: Program<'info, System>,
}

#[derive(Accounts)]
#[instruction(principal: Pubkey)]
pub struct RoleQuery<'info> {
    /// CHECK: role PDA of `principal`; missing means no tiers
    #[account(seeds = [ROLE_SEED, principal.as_ref()], bump)]
    pub role: UncheckedAccount<'info>,
}

/// Flip one component's pause switch (Admin only)
#[derive(Accounts)]
pub struct SetPaused<'info> {
    pub authority: Signer<'info>,

    #[account(seeds = [ROLE_SEED, authority.key().as_ref()], bump)]
    pub authority_role: Option<Account<'info, RoleGrant>>,

    #[account(mut, seeds = [ACCESS_REGISTRY_SEED], bump = access_registry.bump)]
    pub access_registry: Account<'info, AccessRegistry>,

    #[account(mut, seeds = [EVENT_REGISTRY_SEED], bump = event_registry.bump)]
    pub event_registry: Account<'info, EventRegistry>,

    #[account(mut, seeds = [BADGE_LEDGER_SEED], bump = badge_ledger.bump)]
    pub badge_ledger: Account<'info, BadgeLedger>,

    #[account(mut, seeds = [ATTENDANCE_VERIFIER_SEED], bump = attendance_verifier.bump)]
    pub attendance_verifier: Account<'info, AttendanceVerifier>,
}

// ============================================================================
// EVENT REGISTRY
// ============================================================================

#[derive(Accounts)]
#[instruction(metadata_key: [u8; 32], metadata_uri: String, details: EventDetails)]
pub struct CreateEvent<'info> {
    /// The category length is checked here, before it is used as a seed
    #[account(
        mut,
        constraint = details.category.len() <= MAX_CATEGORY_LEN @ AttendanceError::FieldTooLong
    )]
    pub organizer: Signer<'info>,

    #[account(seeds = [ROLE_SEED, organizer.key().as_ref()], bump)]
    pub organizer_role: Option<Account<'info, RoleGrant>>,

    #[account(mut, seeds = [EVENT_REGISTRY_SEED], bump = event_registry.bump)]
    pub event_registry: Account<'info, EventRegistry>,

    /// New event at the next sequential id
    #[account(
        init,
        payer = organizer,
        space = 8 + Event::INIT_SPACE,
        seeds = [EVENT_SEED, event_registry.next_event_id.to_le_bytes().as_ref()],
        bump
    )]
    pub event: Account<'info, Event>,

    /// Uniqueness marker for the metadata URI; `metadata_key` is checked
    /// against keccak(metadata_uri) in the handler
    #[account(
        init_if_needed,
        payer = organizer,
        space = 8 + MetadataClaim::INIT_SPACE,
        seeds = [EVENT_METADATA_SEED, metadata_key.as_ref()],
        bump
    )]
    pub metadata_claim: Account<'info, MetadataClaim>,

    /// CHECK: organizer's event index, created or grown in the handler
    #[account(mut, seeds = [ORGANIZER_INDEX_SEED, organizer.key().as_ref()], bump)]
    pub organizer_index: UncheckedAccount<'info>,

    /// CHECK: category's event index, created or grown in the handler
    #[account(mut, seeds = [CATEGORY_INDEX_SEED, details.category.as_bytes()], bump)]
    pub category_index: UncheckedAccount<'info>,

    pub system_program: Program<'info, System>,
}

#[derive(Accounts)]
#[instruction(event_id: u64)]
pub struct UpdateEvent<'info> {
    #[account(mut)]
    pub authority: Signer<'info>,

    #[account(seeds = [ROLE_SEED, authority.key().as_ref()], bump)]
    pub authority_role: Option<Account<'info, RoleGrant>>,

    #[account(seeds = [EVENT_REGISTRY_SEED], bump = event_registry.bump)]
    pub event_registry: Account<'info, EventRegistry>,

    #[account(mut, seeds = [EVENT_SEED, event_id.to_le_bytes().as_ref()], bump = event.bump)]
    pub event: Account<'info, Event>,

    /// CHECK: index of the current category; required only when the category changes
    #[account(mut)]
    pub old_category_index: Option<UncheckedAccount<'info>>,

    /// CHECK: index of the new category; required only when the category changes
    #[account(mut)]
    pub new_category_index: Option<UncheckedAccount<'info>>,

    pub system_program: Program<'info, System>,
}

/// Deactivate or reactivate an event
#[derive(Accounts)]
#[instruction(event_id: u64)]
pub struct SetEventActive<'info> {
    pub authority: Signer<'info>,

    #[account(seeds = [ROLE_SEED, authority.key().as_ref()], bump)]
    pub authority_role: Option<Account<'info, RoleGrant>>,

    #[account(seeds = [EVENT_REGISTRY_SEED], bump = event_registry.bump)]
    pub event_registry: Account<'info, EventRegistry>,

    #[account(mut, seeds = [EVENT_SEED, event_id.to_le_bytes().as_ref()], bump = event.bump)]
    pub event: Account<'info, Event>,
}

#[derive(Accounts)]
#[instruction(event_id: u64)]
pub struct EventQuery<'info> {
    /// CHECK: event PDA; a missing account yields NotFound
    #[account(seeds = [EVENT_SEED, event_id.to_le_bytes().as_ref()], bump)]
    pub event: UncheckedAccount<'info>,
}

#[derive(Accounts)]
#[instruction(organizer: Pubkey)]
pub struct OrganizerEventsQuery<'info> {
    /// CHECK: organizer index PDA; missing means no events
    #[account(seeds = [ORGANIZER_INDEX_SEED, organizer.as_ref()], bump)]
    pub index: UncheckedAccount<'info>,
}

#[derive(Accounts)]
pub struct CategoryEventsQuery<'info> {
    /// CHECK: category index PDA, address checked in the handler; missing
    /// means no events
    pub index: UncheckedAccount<'info>,
}

// ============================================================================
// BADGE LEDGER
// ============================================================================

/// Direct mint by a privileged principal
#[derive(Accounts)]
#[instruction(event_id: u64, attendee: Pubkey)]
pub struct MintBadge<'info> {
    #[account(mut)]
    pub authority: Signer<'info>,

    #[account(seeds = [ROLE_SEED, authority.key().as_ref()], bump)]
    pub authority_role: Option<Account<'info, RoleGrant>>,

    #[account(seeds = [EVENT_SEED, event_id.to_le_bytes().as_ref()], bump = event.bump)]
    pub event: Account<'info, Event>,

    #[account(mut, seeds = [BADGE_LEDGER_SEED], bump = badge_ledger.bump)]
    pub badge_ledger: Account<'info, BadgeLedger>,

    #[account(
        init_if_needed,
        payer = authority,
        space = 8 + IssuanceMarker::INIT_SPACE,
        seeds = [ISSUANCE_SEED, event_id.to_le_bytes().as_ref(), attendee.as_ref()],
        bump
    )]
    pub issuance_marker: Account<'info, IssuanceMarker>,

    #[account(
        init,
        payer = authority,
        space = 8 + Badge::INIT_SPACE,
        seeds = [BADGE_SEED, badge_ledger.next_token_id.to_le_bytes().as_ref()],
        bump
    )]
    pub badge: Account<'info, Badge>,

    /// CHECK: attendee statistics, created or grown in the handler
    #[account(mut, seeds = [USER_STATS_SEED, attendee.as_ref()], bump)]
    pub user_stats: UncheckedAccount<'info>,

    /// CHECK: event roster, created or grown in the handler
    #[account(mut, seeds = [EVENT_BADGES_SEED, event_id.to_le_bytes().as_ref()], bump)]
    pub event_badges: UncheckedAccount<'info>,

    pub system_program: Program<'info, System>,
}

/// Per attendee, remaining accounts are (issuance marker, badge, user stats)
#[derive(Accounts)]
#[instruction(event_id: u64)]
pub struct BatchMintBadges<'info> {
    #[account(mut)]
    pub authority: Signer<'info>,

    #[account(seeds = [ROLE_SEED, authority.key().as_ref()], bump)]
    pub authority_role: Option<Account<'info, RoleGrant>>,

    #[account(seeds = [EVENT_SEED, event_id.to_le_bytes().as_ref()], bump = event.bump)]
    pub event: Account<'info, Event>,

    #[account(mut, seeds = [BADGE_LEDGER_SEED], bump = badge_ledger.bump)]
    pub badge_ledger: Account<'info, BadgeLedger>,

    /// CHECK: event roster, created or grown in the handler
    #[account(mut, seeds = [EVENT_BADGES_SEED, event_id.to_le_bytes().as_ref()], bump)]
    pub event_badges: UncheckedAccount<'info>,

    pub system_program: Program<'info, System>,
}

/// Revoke or restore a badge (Admin only)
#[derive(Accounts)]
#[instruction(token_id: u64)]
pub struct SetBadgeRevoked<'info> {
    pub authority: Signer<'info>,

    #[account(seeds = [ROLE_SEED, authority.key().as_ref()], bump)]
    pub authority_role: Option<Account<'info, RoleGrant>>,

    #[account(mut, seeds = [BADGE_LEDGER_SEED], bump = badge_ledger.bump)]
    pub badge_ledger: Account<'info, BadgeLedger>,

    #[account(mut, seeds = [BADGE_SEED, token_id.to_le_bytes().as_ref()], bump = badge.bump)]
    pub badge: Account<'info, Badge>,

    /// Statistics of the principal that earned the badge
    #[account(
        mut,
        seeds = [USER_STATS_SEED, badge.attendee.as_ref()],
        bump = user_stats.bump
    )]
    pub user_stats: Account<'info, UserStats>,
}

#[derive(Accounts)]
#[instruction(token_id: u64)]
pub struct TransferBadge<'info> {
    /// Current badge owner
    pub owner: Signer<'info>,

    #[account(seeds = [BADGE_LEDGER_SEED], bump = badge_ledger.bump)]
    pub badge_ledger: Account<'info, BadgeLedger>,

    #[account(mut, seeds = [BADGE_SEED, token_id.to_le_bytes().as_ref()], bump = badge.bump)]
    pub badge: Account<'info, Badge>,
}

#[derive(Accounts)]
#[instruction(token_id: u64)]
pub struct BadgeQuery<'info> {
    /// CHECK: badge PDA; a missing account yields NotFound
    #[account(seeds = [BADGE_SEED, token_id.to_le_bytes().as_ref()], bump)]
    pub badge: UncheckedAccount<'info>,
}

#[derive(Accounts)]
#[instruction(user: Pubkey)]
pub struct UserStatsQuery<'info> {
    /// CHECK: stats PDA; missing means the user holds no badges
    #[account(seeds = [USER_STATS_SEED, user.as_ref()], bump)]
    pub user_stats: UncheckedAccount<'info>,
}

#[derive(Accounts)]
#[instruction(event_id: u64)]
pub struct EventBadgesQuery<'info> {
    /// CHECK: roster PDA; missing means no badges were minted
    #[account(seeds = [EVENT_BADGES_SEED, event_id.to_le_bytes().as_ref()], bump)]
    pub event_badges: UncheckedAccount<'info>,
}

#[derive(Accounts)]
#[instruction(event_id: u64, attendee: Pubkey)]
pub struct IssuanceQuery<'info> {
    /// CHECK: issuance marker PDA; missing means not issued
    #[account(
        seeds = [ISSUANCE_SEED, event_id.to_le_bytes().as_ref(), attendee.as_ref()],
        bump
    )]
    pub issuance_marker: UncheckedAccount<'info>,
}

// ============================================================================
// ATTENDANCE VERIFIER
// ============================================================================

#[derive(Accounts)]
#[instruction(event_id: u64)]
pub struct GenerateQrCode<'info> {
    #[account(mut)]
    pub authority: Signer<'info>,

    #[account(seeds = [ROLE_SEED, authority.key().as_ref()], bump)]
    pub authority_role: Option<Account<'info, RoleGrant>>,

    #[account(seeds = [ATTENDANCE_VERIFIER_SEED], bump = attendance_verifier.bump)]
    pub attendance_verifier: Account<'info, AttendanceVerifier>,

    #[account(seeds = [EVENT_SEED, event_id.to_le_bytes().as_ref()], bump = event.bump)]
    pub event: Account<'info, Event>,

    /// Overwritten on every generation
    #[account(
        init_if_needed,
        payer = authority,
        space = 8 + QrChallenge::INIT_SPACE,
        seeds = [QR_CHALLENGE_SEED, event_id.to_le_bytes().as_ref()],
        bump
    )]
    pub qr_challenge: Account<'info, QrChallenge>,

    pub system_program: Program<'info, System>,
}

/// Attendee presents an organizer or verifier signature
#[derive(Accounts)]
#[instruction(event_id: u64, proof_digest: [u8; 32], attester: Pubkey)]
pub struct VerifyBySignature<'info> {
    /// Attendee; pays for the records
    #[account(mut)]
    pub attendee: Signer<'info>,

    /// Tiers of the principal that signed the attendance message
    #[account(seeds = [ROLE_SEED, attester.as_ref()], bump)]
    pub attester_role: Option<Account<'info, RoleGrant>>,

    #[account(mut, seeds = [ATTENDANCE_VERIFIER_SEED], bump = attendance_verifier.bump)]
    pub attendance_verifier: Account<'info, AttendanceVerifier>,

    #[account(seeds = [EVENT_REGISTRY_SEED], bump = event_registry.bump)]
    pub event_registry: Account<'info, EventRegistry>,

    #[account(mut, seeds = [EVENT_SEED, event_id.to_le_bytes().as_ref()], bump = event.bump)]
    pub event: Account<'info, Event>,

    #[account(mut, seeds = [BADGE_LEDGER_SEED], bump = badge_ledger.bump)]
    pub badge_ledger: Account<'info, BadgeLedger>,

    #[account(
        init_if_needed,
        payer = attendee,
        space = 8 + AttendanceRecord::INIT_SPACE,
        seeds = [ATTENDANCE_SEED, event_id.to_le_bytes().as_ref(), attendee.key().as_ref()],
        bump
    )]
    pub attendance_record: Account<'info, AttendanceRecord>,

    /// Keyed by the signed message digest
    #[account(
        init_if_needed,
        payer = attendee,
        space = 8 + ConsumedProof::INIT_SPACE,
        seeds = [CONSUMED_PROOF_SEED, proof_digest.as_ref()],
        bump
    )]
    pub consumed_proof: Account<'info, ConsumedProof>,

    #[account(
        init_if_needed,
        payer = attendee,
        space = 8 + IssuanceMarker::INIT_SPACE,
        seeds = [ISSUANCE_SEED, event_id.to_le_bytes().as_ref(), attendee.key().as_ref()],
        bump
    )]
    pub issuance_marker: Account<'info, IssuanceMarker>,

    #[account(
        init,
        payer = attendee,
        space = 8 + Badge::INIT_SPACE,
        seeds = [BADGE_SEED, badge_ledger.next_token_id.to_le_bytes().as_ref()],
        bump
    )]
    pub badge: Account<'info, Badge>,

    /// CHECK: attendee statistics, created or grown in the handler
    #[account(mut, seeds = [USER_STATS_SEED, attendee.key().as_ref()], bump)]
    pub user_stats: UncheckedAccount<'info>,

    /// CHECK: event roster, created or grown in the handler
    #[account(mut, seeds = [EVENT_BADGES_SEED, event_id.to_le_bytes().as_ref()], bump)]
    pub event_badges: UncheckedAccount<'info>,

    /// CHECK: instructions sysvar, read to find the Ed25519 precompile call
    #[account(address = instructions_sysvar::ID)]
    pub instructions: UncheckedAccount<'info>,

    pub system_program: Program<'info, System>,
}

/// Attendee presents the event's live QR secret
#[derive(Accounts)]
#[instruction(event_id: u64, proof_digest: [u8; 32])]
pub struct VerifyByQr<'info> {
    #[account(mut)]
    pub attendee: Signer<'info>,

    #[account(mut, seeds = [ATTENDANCE_VERIFIER_SEED], bump = attendance_verifier.bump)]
    pub attendance_verifier: Account<'info, AttendanceVerifier>,

    #[account(seeds = [EVENT_REGISTRY_SEED], bump = event_registry.bump)]
    pub event_registry: Account<'info, EventRegistry>,

    #[account(mut, seeds = [EVENT_SEED, event_id.to_le_bytes().as_ref()], bump = event.bump)]
    pub event: Account<'info, Event>,

    #[account(mut, seeds = [BADGE_LEDGER_SEED], bump = badge_ledger.bump)]
    pub badge_ledger: Account<'info, BadgeLedger>,

    /// CHECK: QR challenge PDA; a missing account yields QrNotGenerated
    #[account(seeds = [QR_CHALLENGE_SEED, event_id.to_le_bytes().as_ref()], bump)]
    pub qr_challenge: UncheckedAccount<'info>,

    #[account(
        init_if_needed,
        payer = attendee,
        space = 8 + AttendanceRecord::INIT_SPACE,
        seeds = [ATTENDANCE_SEED, event_id.to_le_bytes().as_ref(), attendee.key().as_ref()],
        bump
    )]
    pub attendance_record: Account<'info, AttendanceRecord>,

    /// Keyed by keccak("qr" || event_id || secret)
    #[account(
        init_if_needed,
        payer = attendee,
        space = 8 + ConsumedProof::INIT_SPACE,
        seeds = [CONSUMED_PROOF_SEED, proof_digest.as_ref()],
        bump
    )]
    pub consumed_proof: Account<'info, ConsumedProof>,

    #[account(
        init_if_needed,
        payer = attendee,
        space = 8 + IssuanceMarker::INIT_SPACE,
        seeds = [ISSUANCE_SEED, event_id.to_le_bytes().as_ref(), attendee.key().as_ref()],
        bump
    )]
    pub issuance_marker: Account<'info, IssuanceMarker>,

    #[account(
        init,
        payer = attendee,
        space = 8 + Badge::INIT_SPACE,
        seeds = [BADGE_SEED, badge_ledger.next_token_id.to_le_bytes().as_ref()],
        bump
    )]
    pub badge: Account<'info, Badge>,

    /// CHECK: attendee statistics, created or grown in the handler
    #[account(mut, seeds = [USER_STATS_SEED, attendee.key().as_ref()], bump)]
    pub user_stats: UncheckedAccount<'info>,

    /// CHECK: event roster, created or grown in the handler
    #[account(mut, seeds = [EVENT_BADGES_SEED, event_id.to_le_bytes().as_ref()], bump)]
    pub event_badges: UncheckedAccount<'info>,

    pub system_program: Program<'info, System>,
}

/// Trusted third-party attestation for an explicit attendee
#[derive(Accounts)]
#[instruction(event_id: u64, attendee: Pubkey)]
pub struct VerifyManually<'info> {
    #[account(mut)]
    pub authority: Signer<'info>,

    #[account(seeds = [ROLE_SEED, authority.key().as_ref()], bump)]
    pub authority_role: Option<Account<'info, RoleGrant>>,

    #[account(mut, seeds = [ATTENDANCE_VERIFIER_SEED], bump = attendance_verifier.bump)]
    pub attendance_verifier: Account<'info, AttendanceVerifier>,

    #[account(seeds = [EVENT_REGISTRY_SEED], bump = event_registry.bump)]
    pub event_registry: Account<'info, EventRegistry>,

    #[account(mut, seeds = [EVENT_SEED, event_id.to_le_bytes().as_ref()], bump = event.bump)]
    pub event: Account<'info, Event>,

    #[account(mut, seeds = [BADGE_LEDGER_SEED], bump = badge_ledger.bump)]
    pub badge_ledger: Account<'info, BadgeLedger>,

    #[account(
        init_if_needed,
        payer = authority,
        space = 8 + AttendanceRecord::INIT_SPACE,
        seeds = [ATTENDANCE_SEED, event_id.to_le_bytes().as_ref(), attendee.as_ref()],
        bump
    )]
    pub attendance_record: Account<'info, AttendanceRecord>,

    #[account(
        init_if_needed,
        payer = authority,
        space = 8 + IssuanceMarker::INIT_SPACE,
        seeds = [ISSUANCE_SEED, event_id.to_le_bytes().as_ref(), attendee.as_ref()],
        bump
    )]
    pub issuance_marker: Account<'info, IssuanceMarker>,

    #[account(
        init,
        payer = authority,
        space = 8 + Badge::INIT_SPACE,
        seeds = [BADGE_SEED, badge_ledger.next_token_id.to_le_bytes().as_ref()],
        bump
    )]
    pub badge: Account<'info, Badge>,

    /// CHECK: attendee statistics, created or grown in the handler
    #[account(mut, seeds = [USER_STATS_SEED, attendee.as_ref()], bump)]
    pub user_stats: UncheckedAccount<'info>,

    /// CHECK: event roster, created or grown in the handler
    #[account(mut, seeds = [EVENT_BADGES_SEED, event_id.to_le_bytes().as_ref()], bump)]
    pub event_badges: UncheckedAccount<'info>,

    pub system_program: Program<'info, System>,
}

/// Per attendee, remaining accounts are
/// (attendance record, issuance marker, badge, user stats)
#[derive(Accounts)]
#[instruction(event_id: u64)]
pub struct BatchVerifyAttendance<'info> {
    #[account(mut)]
    pub authority: Signer<'info>,

    #[account(seeds = [ROLE_SEED, authority.key().as_ref()], bump)]
    pub authority_role: Option<Account<'info, RoleGrant>>,

    #[account(mut, seeds = [ATTENDANCE_VERIFIER_SEED], bump = attendance_verifier.bump)]
    pub attendance_verifier: Account<'info, AttendanceVerifier>,

    #[account(seeds = [EVENT_REGISTRY_SEED], bump = event_registry.bump)]
    pub event_registry: Account<'info, EventRegistry>,

    #[account(mut, seeds = [EVENT_SEED, event_id.to_le_bytes().as_ref()], bump = event.bump)]
    pub event: Account<'info, Event>,

    #[account(mut, seeds = [BADGE_LEDGER_SEED], bump = badge_ledger.bump)]
    pub badge_ledger: Account<'info, BadgeLedger>,

    /// CHECK: event roster, created or grown in the handler
    #[account(mut, seeds = [EVENT_BADGES_SEED, event_id.to_le_bytes().as_ref()], bump)]
    pub event_badges: UncheckedAccount<'info>,

    pub system_program: Program<'info, System>,
}

#[derive(Accounts)]
#[instruction(event_id: u64, attendee: Pubkey)]
pub struct RevokeAttendance<'info> {
    #[account(mut)]
    pub authority: Signer<'info>,

    #[account(seeds = [ROLE_SEED, authority.key().as_ref()], bump)]
    pub authority_role: Option<Account<'info, RoleGrant>>,

    #[account(mut, seeds = [ATTENDANCE_VERIFIER_SEED], bump = attendance_verifier.bump)]
    pub attendance_verifier: Account<'info, AttendanceVerifier>,

    /// CHECK: attendance PDA; a missing account yields NotRecorded
    #[account(
        mut,
        seeds = [ATTENDANCE_SEED, event_id.to_le_bytes().as_ref(), attendee.as_ref()],
        bump
    )]
    pub attendance_record: UncheckedAccount<'info>,

    #[account(mut, seeds = [BADGE_LEDGER_SEED], bump = badge_ledger.bump)]
    pub badge_ledger: Account<'info, BadgeLedger>,

    /// Badge minted for this attendance, matched against the record in the handler
    #[account(mut)]
    pub badge: Option<Account<'info, Badge>>,

    #[account(mut, seeds = [USER_STATS_SEED, attendee.as_ref()], bump)]
    pub user_stats: Option<Account<'info, UserStats>>,

    pub system_program: Program<'info, System>,
}

#[derive(Accounts)]
#[instruction(event_id: u64, attendee: Pubkey)]
pub struct AttendanceQuery<'info> {
    /// CHECK: attendance PDA; missing means never verified
    #[account(
        seeds = [ATTENDANCE_SEED, event_id.to_le_bytes().as_ref(), attendee.as_ref()],
        bump
    )]
    pub attendance_record: UncheckedAccount<'info>,
}
