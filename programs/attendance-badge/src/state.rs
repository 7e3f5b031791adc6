use anchor_lang::prelude::*;

use crate::{
    constants::*,
    error::AttendanceError,
    events::{BadgeMinted, BadgeRestored, BadgeRevoked, BadgeTransferred, StreakUpdated},
    guard::Lockable,
    hashing::{qr_digest, qr_secret_hash},
};

fn require_text(value: &str, max_len: usize, empty: AttendanceError) -> Result<()> {
    require!(!value.is_empty(), AttendanceError::from(empty));
    require!(value.len() <= max_len, AttendanceError::FieldTooLong);
    Ok(())
}

fn require_max_len(value: &str, max_len: usize) -> Result<()> {
    require!(value.len() <= max_len, AttendanceError::FieldTooLong);
    Ok(())
}

// ============================================================================
// ACCESS REGISTRY - Permission tiers
// ============================================================================

/// Independently grantable permission tier. Tiers do not imply each other.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq, InitSpace)]
pub enum Tier {
    Admin,
    Organizer,
    Verifier,
}

impl Tier {
    pub const fn bit(self) -> u8 {
        match self {
            Tier::Admin => 1 << 0,
            Tier::Organizer => 1 << 1,
            Tier::Verifier => 1 << 2,
        }
    }
}

/// Components that carry their own pause switch
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq, InitSpace)]
pub enum Component {
    AccessRegistry,
    EventRegistry,
    BadgeLedger,
    AttendanceVerifier,
}

#[account]
#[derive(InitSpace, Default)]
pub struct AccessRegistry {
    /// Break-glass authority: may grant Admin without holding it
    pub owner: Pubkey,

    /// Genesis admin; its Admin tier can never be revoked
    pub root_admin: Pubkey,

    pub paused: bool,

    pub bump: u8,
}

impl AccessRegistry {
    pub fn ensure_not_paused(&self) -> Result<()> {
        require!(!self.paused, AttendanceError::SystemPaused);
        Ok(())
    }

    pub fn authorize_grant(&self, caller: &Pubkey, caller_caps: Capabilities, tier: Tier) -> Result<()> {
        let break_glass = tier == Tier::Admin && *caller == self.owner;
        require!(
            caller_caps.is_admin() || break_glass,
            AttendanceError::Unauthorized
        );
        Ok(())
    }

    pub fn authorize_revoke(&self, caller_caps: Capabilities, principal: &Pubkey, tier: Tier) -> Result<()> {
        require!(caller_caps.is_admin(), AttendanceError::Unauthorized);
        require!(
            !(tier == Tier::Admin && *principal == self.root_admin),
            AttendanceError::CannotRevokeRootAdmin
        );
        Ok(())
    }
}

#[account]
#[derive(InitSpace, Default)]
pub struct RoleGrant {
    pub principal: Pubkey,

    /// Bitset of `Tier::bit` values
    pub tiers: u8,

    pub updated_at: i64,

    pub bump: u8,
}

impl RoleGrant {
    pub fn holds(&self, tier: Tier) -> bool {
        self.tiers & tier.bit() != 0
    }

    /// Returns whether the tier was newly added. Granting twice is a no-op.
    pub fn grant(&mut self, tier: Tier, now: i64) -> bool {
        let added = !self.holds(tier);
        self.tiers |= tier.bit();
        self.updated_at = now;
        added
    }

    /// Returns whether the tier was held before.
    pub fn revoke(&mut self, tier: Tier, now: i64) -> bool {
        let held = self.holds(tier);
        self.tiers &= !tier.bit();
        self.updated_at = now;
        held
    }
}

/// Capability set of a principal for the duration of one call. A principal
/// without a role account holds nothing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Capabilities(u8);

impl Capabilities {
    pub fn of(grant: Option<&RoleGrant>) -> Self {
        Self(grant.map_or(0, |grant| grant.tiers))
    }

    pub fn from_tiers(tiers: &[Tier]) -> Self {
        Self(tiers.iter().fold(0, |bits, tier| bits | tier.bit()))
    }

    pub fn holds(self, tier: Tier) -> bool {
        self.0 & tier.bit() != 0
    }

    pub fn is_admin(self) -> bool {
        self.holds(Tier::Admin)
    }

    /// Organizer or Verifier, the tiers whose signatures attest attendance
    pub fn can_attest(self) -> bool {
        self.holds(Tier::Organizer) || self.holds(Tier::Verifier)
    }

    /// Organizer or Admin
    pub fn can_organize(self) -> bool {
        self.holds(Tier::Organizer) || self.is_admin()
    }

    /// Any of Admin, Organizer, Verifier
    pub fn is_privileged(self) -> bool {
        self.0 != 0
    }
}

// ============================================================================
// EVENT REGISTRY
// ============================================================================

#[account]
#[derive(InitSpace, Default)]
pub struct EventRegistry {
    /// Next event id to assign (starts at 1, never reused)
    pub next_event_id: u64,

    pub total_events: u64,

    pub paused: bool,

    pub bump: u8,
}

impl EventRegistry {
    pub fn ensure_not_paused(&self) -> Result<()> {
        require!(!self.paused, AttendanceError::SystemPaused);
        Ok(())
    }

    pub fn allocate_id(&mut self) -> Result<u64> {
        let id = self.next_event_id;
        self.next_event_id = id.checked_add(1).ok_or(AttendanceError::ArithmeticOverflow)?;
        self.total_events = self
            .total_events
            .checked_add(1)
            .ok_or(AttendanceError::ArithmeticOverflow)?;
        Ok(id)
    }
}

/// Mutable part of an event, shared by create and update
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct EventDetails {
    pub title: String,
    pub description: String,
    pub start_time: i64,
    pub end_time: i64,
    /// 0 means unlimited
    pub max_attendees: u64,
    pub location: String,
    pub category: String,
}

impl EventDetails {
    pub fn validate(&self, now: i64) -> Result<()> {
        require_text(&self.title, MAX_TITLE_LEN, AttendanceError::EmptyTitle)?;
        require_text(&self.description, MAX_DESCRIPTION_LEN, AttendanceError::EmptyDescription)?;
        require_max_len(&self.location, MAX_LOCATION_LEN)?;
        require_max_len(&self.category, MAX_CATEGORY_LEN)?;
        require!(self.start_time > now, AttendanceError::StartTimeInPast);
        require!(self.end_time > self.start_time, AttendanceError::InvalidTimeRange);
        Ok(())
    }
}

#[account]
#[derive(InitSpace, Default)]
pub struct Event {
    pub id: u64,

    pub organizer: Pubkey,

    #[max_len(MAX_TITLE_LEN)]
    pub title: String,

    #[max_len(MAX_DESCRIPTION_LEN)]
    pub description: String,

    /// Opaque content-addressed reference, unique across events
    #[max_len(MAX_METADATA_URI_LEN)]
    pub metadata_uri: String,

    pub start_time: i64,

    pub end_time: i64,

    /// 0 means unlimited
    pub max_attendees: u64,

    pub current_attendees: u64,

    #[max_len(MAX_LOCATION_LEN)]
    pub location: String,

    #[max_len(MAX_CATEGORY_LEN)]
    pub category: String,

    pub is_active: bool,

    pub created_at: i64,

    #[max_len(MAX_REASON_LEN)]
    pub deactivation_reason: String,

    pub bump: u8,
}

impl Event {
    /// Populate a freshly created event record
    pub fn open(
        &mut self,
        id: u64,
        organizer: Pubkey,
        metadata_uri: String,
        details: EventDetails,
        now: i64,
    ) -> Result<()> {
        require_text(&metadata_uri, MAX_METADATA_URI_LEN, AttendanceError::EmptyMetadataUri)?;
        details.validate(now)?;

        self.id = id;
        self.organizer = organizer;
        self.metadata_uri = metadata_uri;
        self.current_attendees = 0;
        self.is_active = true;
        self.created_at = now;
        self.deactivation_reason = String::new();
        self.apply(details);
        Ok(())
    }

    fn apply(&mut self, details: EventDetails) {
        self.title = details.title;
        self.description = details.description;
        self.start_time = details.start_time;
        self.end_time = details.end_time;
        self.max_attendees = details.max_attendees;
        self.location = details.location;
        self.category = details.category;
    }

    /// Only the event's own organizer or an Admin may manage an event
    pub fn ensure_managed_by(&self, caller: &Pubkey, caller_caps: Capabilities) -> Result<()> {
        require!(
            *caller == self.organizer || caller_caps.is_admin(),
            AttendanceError::Unauthorized
        );
        Ok(())
    }

    pub fn update(
        &mut self,
        caller: &Pubkey,
        caller_caps: Capabilities,
        details: EventDetails,
        now: i64,
    ) -> Result<()> {
        self.ensure_managed_by(caller, caller_caps)?;
        require!(self.is_active, AttendanceError::EventInactive);
        details.validate(now)?;
        require!(
            details.max_attendees == 0 || details.max_attendees >= self.current_attendees,
            AttendanceError::CapacityBelowAttendance
        );
        self.apply(details);
        Ok(())
    }

    pub fn deactivate(&mut self, caller: &Pubkey, caller_caps: Capabilities, reason: String) -> Result<()> {
        self.ensure_managed_by(caller, caller_caps)?;
        require!(self.is_active, AttendanceError::EventInactive);
        require_max_len(&reason, MAX_REASON_LEN)?;
        self.is_active = false;
        self.deactivation_reason = reason;
        Ok(())
    }

    /// Reactivation is reserved to Admins so an organizer cannot lift an
    /// admin-imposed freeze.
    pub fn activate(&mut self, caller_caps: Capabilities) -> Result<()> {
        require!(caller_caps.is_admin(), AttendanceError::Unauthorized);
        require!(!self.is_active, AttendanceError::EventAlreadyActive);
        self.is_active = true;
        self.deactivation_reason = String::new();
        Ok(())
    }

    pub fn is_ongoing(&self, now: i64) -> bool {
        self.is_active && now >= self.start_time && now <= self.end_time
    }

    pub fn has_capacity(&self) -> bool {
        self.max_attendees == 0 || self.current_attendees < self.max_attendees
    }

    /// Check capacity and count one more attendee as a single step.
    pub fn admit_attendee(&mut self) -> Result<u64> {
        require!(self.is_active, AttendanceError::EventInactive);
        require!(self.has_capacity(), AttendanceError::CapacityExceeded);
        self.current_attendees = self
            .current_attendees
            .checked_add(1)
            .ok_or(AttendanceError::ArithmeticOverflow)?;
        Ok(self.current_attendees)
    }
}

/// Marks a metadata URI as taken. Seeds: [b"event_metadata", keccak(uri)]
#[account]
#[derive(InitSpace, Default)]
pub struct MetadataClaim {
    pub event_id: u64,

    pub bump: u8,
}

impl MetadataClaim {
    pub fn claim(&mut self, event_id: u64) -> Result<()> {
        require!(self.event_id == 0, AttendanceError::MetadataAlreadyUsed);
        self.event_id = event_id;
        Ok(())
    }
}

/// Insertion-ordered list of event ids, keyed by organizer or category
#[account]
#[derive(Default)]
pub struct EventIndex {
    pub event_ids: Vec<u64>,

    pub bump: u8,
}

impl EventIndex {
    pub const fn space(len: usize) -> usize {
        8 + 4 + 8 * len + 1
    }

    pub fn push(&mut self, event_id: u64) {
        if !self.event_ids.contains(&event_id) {
            self.event_ids.push(event_id);
        }
    }

    pub fn remove(&mut self, event_id: u64) -> bool {
        let before = self.event_ids.len();
        self.event_ids.retain(|id| *id != event_id);
        self.event_ids.len() != before
    }
}

// ============================================================================
// BADGE LEDGER
// ============================================================================

#[account]
#[derive(InitSpace, Default)]
pub struct BadgeLedger {
    /// Next token id to assign (starts at 1, never reused)
    pub next_token_id: u64,

    pub total_minted: u64,

    pub total_revoked: u64,

    pub paused: bool,

    /// Operations currently in flight (see `guard`)
    pub locks: u16,

    pub bump: u8,
}

impl Lockable for BadgeLedger {
    fn locks_mut(&mut self) -> &mut u16 {
        &mut self.locks
    }
}

/// Accounts written when one badge is issued
pub struct BadgeIssue<'a> {
    pub marker: &'a mut IssuanceMarker,
    pub badge: &'a mut Badge,
    pub stats: &'a mut UserStats,
    pub roster: &'a mut EventBadges,
}

impl BadgeLedger {
    pub fn ensure_not_paused(&self) -> Result<()> {
        require!(!self.paused, AttendanceError::SystemPaused);
        Ok(())
    }

    /// Mint the badge for `(event, attendee)`. One badge per pair, ever.
    pub fn issue(
        &mut self,
        event: &Event,
        attendee: Pubkey,
        metadata_uri: &str,
        accounts: BadgeIssue<'_>,
        now: i64,
    ) -> Result<u64> {
        self.ensure_not_paused()?;
        require!(attendee != Pubkey::default(), AttendanceError::InvalidAttendee);
        require_text(metadata_uri, MAX_METADATA_URI_LEN, AttendanceError::EmptyMetadataUri)?;
        require!(!accounts.marker.is_issued(), AttendanceError::AlreadyIssued);
        require!(event.is_active, AttendanceError::EventInactive);

        let token_id = self.next_token_id;
        self.next_token_id = token_id
            .checked_add(1)
            .ok_or(AttendanceError::ArithmeticOverflow)?;
        self.total_minted = self
            .total_minted
            .checked_add(1)
            .ok_or(AttendanceError::ArithmeticOverflow)?;

        let badge = accounts.badge;
        badge.token_id = token_id;
        badge.event_id = event.id;
        badge.attendee = attendee;
        badge.owner = attendee;
        badge.minted_at = now;
        badge.metadata_uri = metadata_uri.to_string();
        badge.revoked = false;
        badge.revoke_reason = String::new();
        badge.revoked_at = 0;

        let marker = accounts.marker;
        marker.event_id = event.id;
        marker.attendee = attendee;
        marker.token_id = token_id;

        let stats = accounts.stats;
        stats.user = attendee;
        let streak = stats.record_mint(token_id, event.id, now)?;

        accounts.roster.event_id = event.id;
        accounts.roster.token_ids.push(token_id);

        emit!(BadgeMinted {
            token_id,
            event_id: event.id,
            owner: attendee,
            metadata_uri: metadata_uri.to_string(),
            timestamp: now,
        });
        emit!(StreakUpdated {
            user: attendee,
            streak,
            timestamp: now,
        });

        Ok(token_id)
    }

    pub fn revoke(
        &mut self,
        badge: &mut Badge,
        stats: &mut UserStats,
        reason: &str,
        revoked_by: Pubkey,
        now: i64,
    ) -> Result<()> {
        self.ensure_not_paused()?;
        require_text(reason, MAX_REASON_LEN, AttendanceError::EmptyReason)?;
        require!(!badge.revoked, AttendanceError::BadgeAlreadyRevoked);
        require_keys_eq!(stats.user, badge.attendee, AttendanceError::InvalidAccount);

        badge.revoked = true;
        badge.revoke_reason = reason.to_string();
        badge.revoked_at = now;
        stats.record_revocation(badge.token_id)?;
        self.total_revoked = self
            .total_revoked
            .checked_add(1)
            .ok_or(AttendanceError::ArithmeticOverflow)?;

        emit!(BadgeRevoked {
            token_id: badge.token_id,
            owner: badge.owner,
            reason: reason.to_string(),
            revoked_by,
            timestamp: now,
        });
        Ok(())
    }

    pub fn restore(
        &mut self,
        badge: &mut Badge,
        stats: &mut UserStats,
        restored_by: Pubkey,
        now: i64,
    ) -> Result<()> {
        self.ensure_not_paused()?;
        require!(badge.revoked, AttendanceError::BadgeNotRevoked);
        require_keys_eq!(stats.user, badge.attendee, AttendanceError::InvalidAccount);

        badge.revoked = false;
        badge.revoke_reason = String::new();
        badge.revoked_at = 0;
        stats.record_restoration(badge.token_id)?;
        self.total_revoked = self
            .total_revoked
            .checked_sub(1)
            .ok_or(AttendanceError::ArithmeticOverflow)?;

        emit!(BadgeRestored {
            token_id: badge.token_id,
            owner: badge.owner,
            restored_by,
            timestamp: now,
        });
        Ok(())
    }

    /// Move a badge to a new owner. Revoked badges never move.
    pub fn transfer(&self, badge: &mut Badge, from: &Pubkey, to: Pubkey, now: i64) -> Result<()> {
        self.ensure_not_paused()?;
        require!(!badge.revoked, AttendanceError::BadgeRevokedNonTransferable);
        require_keys_eq!(badge.owner, *from, AttendanceError::NotBadgeOwner);
        require!(to != Pubkey::default(), AttendanceError::InvalidPrincipal);

        badge.owner = to;
        emit!(BadgeTransferred {
            token_id: badge.token_id,
            from: *from,
            to,
            timestamp: now,
        });
        Ok(())
    }
}

#[account]
#[derive(InitSpace, Default)]
pub struct Badge {
    pub token_id: u64,

    pub event_id: u64,

    /// Principal that earned the badge; statistics stay with them
    pub attendee: Pubkey,

    /// Current holder
    pub owner: Pubkey,

    pub minted_at: i64,

    #[max_len(MAX_METADATA_URI_LEN)]
    pub metadata_uri: String,

    pub revoked: bool,

    #[max_len(MAX_REASON_LEN)]
    pub revoke_reason: String,

    pub revoked_at: i64,

    pub bump: u8,
}

/// Ledger-side attended flag for (event, attendee). Seeds: [b"issuance", event_id, attendee]
#[account]
#[derive(InitSpace, Default)]
pub struct IssuanceMarker {
    pub event_id: u64,

    pub attendee: Pubkey,

    /// 0 until a badge is issued
    pub token_id: u64,

    pub bump: u8,
}

impl IssuanceMarker {
    pub fn is_issued(&self) -> bool {
        self.token_id != 0
    }
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HeldBadge {
    pub token_id: u64,
    pub event_id: u64,
    pub revoked: bool,
}

impl HeldBadge {
    pub const SIZE: usize = 8 + 8 + 1;
}

#[account]
#[derive(Default)]
pub struct UserStats {
    pub user: Pubkey,

    /// Badges ever minted to this user
    pub total_badges: u64,

    /// Badges currently not revoked
    pub active_badges: u64,

    /// Bumped on every successful mint
    pub streak: u64,

    pub last_minted_at: i64,

    /// Every badge earned, in mint order
    pub badges: Vec<HeldBadge>,

    pub bump: u8,
}

impl UserStats {
    pub const fn space(len: usize) -> usize {
        8 + 32 + 8 + 8 + 8 + 8 + 4 + HeldBadge::SIZE * len + 1
    }

    /// Returns the new streak
    pub fn record_mint(&mut self, token_id: u64, event_id: u64, now: i64) -> Result<u64> {
        self.total_badges = self
            .total_badges
            .checked_add(1)
            .ok_or(AttendanceError::ArithmeticOverflow)?;
        self.active_badges = self
            .active_badges
            .checked_add(1)
            .ok_or(AttendanceError::ArithmeticOverflow)?;
        self.streak = self
            .streak
            .checked_add(1)
            .ok_or(AttendanceError::ArithmeticOverflow)?;
        self.last_minted_at = now;
        self.badges.push(HeldBadge {
            token_id,
            event_id,
            revoked: false,
        });
        Ok(self.streak)
    }

    pub fn record_revocation(&mut self, token_id: u64) -> Result<()> {
        self.active_badges = self
            .active_badges
            .checked_sub(1)
            .ok_or(AttendanceError::ArithmeticOverflow)?;
        if let Some(held) = self.badges.iter_mut().find(|held| held.token_id == token_id) {
            held.revoked = true;
        }
        Ok(())
    }

    pub fn record_restoration(&mut self, token_id: u64) -> Result<()> {
        self.active_badges = self
            .active_badges
            .checked_add(1)
            .ok_or(AttendanceError::ArithmeticOverflow)?;
        if let Some(held) = self.badges.iter_mut().find(|held| held.token_id == token_id) {
            held.revoked = false;
        }
        Ok(())
    }

    pub fn badge_ids(&self) -> Vec<u64> {
        self.badges.iter().map(|held| held.token_id).collect()
    }

    pub fn active_badge_ids(&self) -> Vec<u64> {
        self.badges
            .iter()
            .filter(|held| !held.revoked)
            .map(|held| held.token_id)
            .collect()
    }
}

/// Tokens minted for one event, in mint order
#[account]
#[derive(Default)]
pub struct EventBadges {
    pub event_id: u64,

    pub token_ids: Vec<u64>,

    pub bump: u8,
}

impl EventBadges {
    pub const fn space(len: usize) -> usize {
        8 + 8 + 4 + 8 * len + 1
    }
}

/// Aggregate counters returned by the user statistics query
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UserStatsSummary {
    pub total_badges: u64,
    pub active_badges: u64,
    pub streak: u64,
    pub last_minted_at: i64,
}

impl From<&UserStats> for UserStatsSummary {
    fn from(stats: &UserStats) -> Self {
        Self {
            total_badges: stats.total_badges,
            active_badges: stats.active_badges,
            streak: stats.streak,
            last_minted_at: stats.last_minted_at,
        }
    }
}

// ============================================================================
// ATTENDANCE VERIFIER
// ============================================================================

#[account]
#[derive(InitSpace, Default)]
pub struct AttendanceVerifier {
    pub total_verified: u64,

    pub total_revoked: u64,

    pub paused: bool,

    /// Operations currently in flight (see `guard`)
    pub locks: u16,

    pub bump: u8,
}

impl Lockable for AttendanceVerifier {
    fn locks_mut(&mut self) -> &mut u16 {
        &mut self.locks
    }
}

impl AttendanceVerifier {
    pub fn ensure_not_paused(&self) -> Result<()> {
        require!(!self.paused, AttendanceError::SystemPaused);
        Ok(())
    }
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq, InitSpace)]
pub enum VerificationMethod {
    #[default]
    Signature,
    QrCode,
    Manual,
}

/// One verified attendance fact. Seeds: [b"attendance", event_id, attendee]
#[account]
#[derive(InitSpace, Default)]
pub struct AttendanceRecord {
    pub attendee: Pubkey,

    pub event_id: u64,

    pub verified_at: i64,

    pub method: VerificationMethod,

    /// Attesting principal (signer, the attendee itself for QR, or the manual attester)
    pub verified_by: Pubkey,

    /// Signature bytes, QR secret or free-text note
    #[max_len(MAX_PROOF_LEN)]
    pub proof: Vec<u8>,

    pub badge_minted: bool,

    pub badge_id: u64,

    /// Gate for re-verification; cleared on revocation while the record stays
    pub attended: bool,

    pub revoked_at: i64,

    #[max_len(MAX_REASON_LEN)]
    pub revoke_reason: String,

    pub bump: u8,
}

impl AttendanceRecord {
    pub fn record(
        &mut self,
        event_id: u64,
        attendee: Pubkey,
        method: VerificationMethod,
        verified_by: Pubkey,
        proof: &[u8],
        now: i64,
    ) -> Result<()> {
        require!(proof.len() <= MAX_PROOF_LEN, AttendanceError::FieldTooLong);
        self.attendee = attendee;
        self.event_id = event_id;
        self.verified_at = now;
        self.method = method;
        self.verified_by = verified_by;
        self.proof = proof.to_vec();
        self.badge_minted = false;
        self.badge_id = 0;
        self.attended = true;
        self.revoked_at = 0;
        self.revoke_reason = String::new();
        Ok(())
    }

    pub fn attach_badge(&mut self, token_id: u64) {
        self.badge_minted = true;
        self.badge_id = token_id;
    }

    /// Clear the attended gate, keeping the record for audit
    pub fn revoke(&mut self, reason: &str, now: i64) -> Result<()> {
        require!(self.attended, AttendanceError::NotRecorded);
        self.attended = false;
        self.revoked_at = now;
        self.revoke_reason = reason.to_string();
        Ok(())
    }
}

/// Live QR challenge for an event. Regenerating overwrites the previous one.
#[account]
#[derive(InitSpace, Default)]
pub struct QrChallenge {
    pub event_id: u64,

    /// keccak256 of the secret
    pub secret_hash: [u8; 32],

    pub expires_at: i64,

    pub generated_by: Pubkey,

    pub bump: u8,
}

impl QrChallenge {
    /// Install a new secret; returns the expiry
    pub fn issue(
        &mut self,
        event_id: u64,
        secret: &str,
        validity_secs: i64,
        generated_by: Pubkey,
        now: i64,
    ) -> Result<i64> {
        require_text(secret, MAX_PROOF_LEN, AttendanceError::EmptySecret)?;
        require!(
            validity_secs > 0 && validity_secs <= MAX_QR_VALIDITY_SECS,
            AttendanceError::InvalidQrValidity
        );
        let expires_at = now
            .checked_add(validity_secs)
            .ok_or(AttendanceError::ArithmeticOverflow)?;

        self.event_id = event_id;
        self.secret_hash = qr_secret_hash(secret);
        self.expires_at = expires_at;
        self.generated_by = generated_by;
        Ok(expires_at)
    }

    /// Check a submitted secret; returns its consumption digest
    pub fn redeem(&self, secret: &str, now: i64) -> Result<[u8; 32]> {
        require!(self.expires_at != 0, AttendanceError::QrNotGenerated);
        require!(now <= self.expires_at, AttendanceError::QrExpired);
        require!(
            qr_secret_hash(secret) == self.secret_hash,
            AttendanceError::InvalidQrSecret
        );
        Ok(qr_digest(self.event_id, secret))
    }
}

/// A signature or QR digest that has been used. Seeds: [b"consumed_proof", digest]
#[account]
#[derive(InitSpace, Default)]
pub struct ConsumedProof {
    pub digest: [u8; 32],

    pub event_id: u64,

    pub consumed_by: Pubkey,

    pub consumed_at: i64,

    pub bump: u8,
}

impl ConsumedProof {
    pub fn consume(
        &mut self,
        digest: [u8; 32],
        event_id: u64,
        consumed_by: Pubkey,
        now: i64,
        replayed: AttendanceError,
    ) -> Result<()> {
        require!(self.digest == [0u8; 32], AttendanceError::from(replayed));
        self.digest = digest;
        self.event_id = event_id;
        self.consumed_by = consumed_by;
        self.consumed_at = now;
        Ok(())
    }
}
