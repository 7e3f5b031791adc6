pub mod account_io;
pub mod attestation;
pub mod constants;
pub mod contexts;
pub mod ed25519;
pub mod error;
pub mod events;
pub mod guard;
pub mod hashing;
pub mod instructions;
pub mod state;

use anchor_lang::prelude::*;

pub use contexts::*;
pub use error::*;
pub use events::*;
pub use state::*;

declare_id!("6nA8pyyeSe2xTFeLohf65kB2AaL2mQpKKdrKedrh5Kmv");

/// Attendance Badge: verifiable event attendance with badge issuance
///
/// Four components, each with its own config account and pause switch:
/// - Access Registry: independent Admin / Organizer / Verifier tiers
/// - Event Registry: event lifecycle, capacity and secondary indexes
/// - Badge Ledger: one badge per (event, attendee), user statistics
/// - Attendance Verifier: signature, QR and manual attestation
///
/// Attendance is proven one of three ways:
/// - Ed25519 signature from an organizer or verifier (precompile introspection)
/// - Short-lived per-event QR secret, presented by the attendee
/// - Manual attestation by any privileged principal (also in batches)
#[program]
pub mod attendance_badge {
    use super::*;

    // ========================================================================
    // ACCESS REGISTRY
    // ========================================================================

    /// Create the component configs; the signer becomes owner and root admin
    pub fn initialize(ctx: Context<Initialize>) -> Result<()> {
        instructions::initialize::handler(ctx)
    }

    /// Grant a tier (Admin only; the owner may always grant Admin)
    pub fn grant_role(ctx: Context<GrantRole>, principal: Pubkey, tier: Tier) -> Result<()> {
        instructions::grant_role::handler(ctx, principal, tier)
    }

    /// Revoke a tier (Admin only). Revoking an unheld tier is a no-op.
    pub fn revoke_role(ctx: Context<RevokeRole>, principal: Pubkey, tier: Tier) -> Result<()> {
        instructions::revoke_role::handler(ctx, principal, tier)
    }

    /// Grant one tier to several principals; role PDAs go in remaining accounts
    pub fn grant_roles_batch<'info>(
        ctx: Context<'_, '_, 'info, 'info, GrantRolesBatch<'info>>,
        tier: Tier,
        principals: Vec<Pubkey>,
    ) -> Result<()> {
        instructions::grant_roles_batch::handler(ctx, tier, principals)
    }

    pub fn check_role(ctx: Context<RoleQuery>, _principal: Pubkey, tier: Tier) -> Result<bool> {
        instructions::queries::check_role(ctx, tier)
    }

    /// Pause or unpause one component (Admin only)
    pub fn set_paused(ctx: Context<SetPaused>, component: Component, paused: bool) -> Result<()> {
        instructions::set_paused::handler(ctx, component, paused)
    }

    // ========================================================================
    // EVENT REGISTRY
    // ========================================================================

    /// Create an event (Organizer or Admin). `metadata_key` is keccak256(metadata_uri).
    pub fn create_event(
        ctx: Context<CreateEvent>,
        metadata_key: [u8; 32],
        metadata_uri: String,
        details: EventDetails,
    ) -> Result<u64> {
        instructions::create_event::handler(ctx, metadata_key, metadata_uri, details)
    }

    /// Update an active event (its organizer or Admin)
    pub fn update_event(ctx: Context<UpdateEvent>, event_id: u64, details: EventDetails) -> Result<()> {
        instructions::update_event::handler(ctx, event_id, details)
    }

    pub fn deactivate_event(ctx: Context<SetEventActive>, event_id: u64, reason: String) -> Result<()> {
        instructions::deactivate_event::handler(ctx, event_id, reason)
    }

    /// Reactivate an event (Admin only)
    pub fn activate_event(ctx: Context<SetEventActive>, event_id: u64) -> Result<()> {
        instructions::activate_event::handler(ctx, event_id)
    }

    pub fn get_event(ctx: Context<EventQuery>, _event_id: u64) -> Result<Event> {
        instructions::queries::get_event(ctx)
    }

    pub fn is_event_ongoing(ctx: Context<EventQuery>, _event_id: u64) -> Result<bool> {
        instructions::queries::is_event_ongoing(ctx)
    }

    pub fn event_has_capacity(ctx: Context<EventQuery>, _event_id: u64) -> Result<bool> {
        instructions::queries::event_has_capacity(ctx)
    }

    /// Paged: ids `offset..offset + limit`; a zero limit returns the largest page
    pub fn get_events_by_organizer(
        ctx: Context<OrganizerEventsQuery>,
        _organizer: Pubkey,
        offset: u32,
        limit: u16,
    ) -> Result<Vec<u64>> {
        instructions::queries::get_events_by_organizer(ctx, offset, limit)
    }

    pub fn get_events_by_category(
        ctx: Context<CategoryEventsQuery>,
        category: String,
        offset: u32,
        limit: u16,
    ) -> Result<Vec<u64>> {
        instructions::queries::get_events_by_category(ctx, category, offset, limit)
    }

    // ========================================================================
    // BADGE LEDGER
    // ========================================================================

    /// Mint directly, outside the verification flow (any privileged tier)
    pub fn mint_badge(
        ctx: Context<MintBadge>,
        event_id: u64,
        attendee: Pubkey,
        metadata_uri: String,
    ) -> Result<u64> {
        instructions::mint_badge::handler(ctx, event_id, attendee, metadata_uri)
    }

    /// All-or-nothing mint for several attendees
    pub fn batch_mint_badges<'info>(
        ctx: Context<'_, '_, 'info, 'info, BatchMintBadges<'info>>,
        event_id: u64,
        attendees: Vec<Pubkey>,
        metadata_uris: Vec<String>,
    ) -> Result<Vec<u64>> {
        instructions::batch_mint_badges::handler(ctx, event_id, attendees, metadata_uris)
    }

    /// Revoke a badge (Admin only)
    pub fn revoke_badge(ctx: Context<SetBadgeRevoked>, token_id: u64, reason: String) -> Result<()> {
        instructions::revoke_badge::handler(ctx, token_id, reason)
    }

    /// Restore a revoked badge (Admin only)
    pub fn restore_badge(ctx: Context<SetBadgeRevoked>, token_id: u64) -> Result<()> {
        instructions::restore_badge::handler(ctx, token_id)
    }

    pub fn transfer_badge(ctx: Context<TransferBadge>, token_id: u64, new_owner: Pubkey) -> Result<()> {
        instructions::transfer_badge::handler(ctx, token_id, new_owner)
    }

    pub fn get_badge(ctx: Context<BadgeQuery>, _token_id: u64) -> Result<Badge> {
        instructions::queries::get_badge(ctx)
    }

    pub fn get_user_badges(ctx: Context<UserStatsQuery>, _user: Pubkey, offset: u32, limit: u16) -> Result<Vec<u64>> {
        instructions::queries::get_user_badges(ctx, offset, limit)
    }

    pub fn get_user_active_badges(
        ctx: Context<UserStatsQuery>,
        _user: Pubkey,
        offset: u32,
        limit: u16,
    ) -> Result<Vec<u64>> {
        instructions::queries::get_user_active_badges(ctx, offset, limit)
    }

    pub fn get_user_stats(ctx: Context<UserStatsQuery>, _user: Pubkey) -> Result<UserStatsSummary> {
        instructions::queries::get_user_stats(ctx)
    }

    pub fn get_event_badges(ctx: Context<EventBadgesQuery>, _event_id: u64, offset: u32, limit: u16) -> Result<Vec<u64>> {
        instructions::queries::get_event_badges(ctx, offset, limit)
    }

    pub fn badge_issued(ctx: Context<IssuanceQuery>, _event_id: u64, _attendee: Pubkey) -> Result<bool> {
        instructions::queries::badge_issued(ctx)
    }

    // ========================================================================
    // ATTENDANCE VERIFIER
    // ========================================================================

    /// Install a fresh QR secret for an event, replacing any previous one
    pub fn generate_qr_code(
        ctx: Context<GenerateQrCode>,
        event_id: u64,
        secret: String,
        validity_secs: i64,
    ) -> Result<()> {
        instructions::generate_qr_code::handler(ctx, event_id, secret, validity_secs)
    }

    /// Must be preceded by an Ed25519 precompile instruction over
    /// `proof_digest` signed by `attester`
    #[allow(clippy::too_many_arguments)]
    pub fn verify_by_signature(
        ctx: Context<VerifyBySignature>,
        event_id: u64,
        proof_digest: [u8; 32],
        attester: Pubkey,
        timestamp: i64,
        signature: [u8; 64],
        metadata_uri: String,
    ) -> Result<u64> {
        instructions::verify_by_signature::handler(
            ctx,
            event_id,
            proof_digest,
            attester,
            timestamp,
            signature,
            metadata_uri,
        )
    }

    /// `proof_digest` is keccak256("qr" || event_id || secret)
    pub fn verify_by_qr(
        ctx: Context<VerifyByQr>,
        event_id: u64,
        proof_digest: [u8; 32],
        secret: String,
        metadata_uri: String,
    ) -> Result<u64> {
        instructions::verify_by_qr::handler(ctx, event_id, proof_digest, secret, metadata_uri)
    }

    pub fn verify_manually(
        ctx: Context<VerifyManually>,
        event_id: u64,
        attendee: Pubkey,
        note: String,
        metadata_uri: String,
    ) -> Result<u64> {
        instructions::verify_manually::handler(ctx, event_id, attendee, note, metadata_uri)
    }

    /// Manual verification of many attendees; already-verified ones are skipped
    pub fn batch_verify_attendance<'info>(
        ctx: Context<'_, '_, 'info, 'info, BatchVerifyAttendance<'info>>,
        event_id: u64,
        attendees: Vec<Pubkey>,
        metadata_uris: Vec<String>,
        note: String,
    ) -> Result<Vec<u64>> {
        instructions::batch_verify_attendance::handler(ctx, event_id, attendees, metadata_uris, note)
    }

    /// Organizer or Admin; cascades into the minted badge
    pub fn revoke_attendance(
        ctx: Context<RevokeAttendance>,
        event_id: u64,
        attendee: Pubkey,
        reason: String,
    ) -> Result<()> {
        instructions::revoke_attendance::handler(ctx, event_id, attendee, reason)
    }

    pub fn has_attended(ctx: Context<AttendanceQuery>, _event_id: u64, _attendee: Pubkey) -> Result<bool> {
        instructions::queries::has_attended(ctx)
    }

    pub fn get_attendance(
        ctx: Context<AttendanceQuery>,
        _event_id: u64,
        _attendee: Pubkey,
    ) -> Result<AttendanceRecord> {
        instructions::queries::get_attendance(ctx)
    }
}
