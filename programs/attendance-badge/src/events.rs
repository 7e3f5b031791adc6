use anchor_lang::prelude::*;

use crate::state::{Component, VerificationMethod};

// ============================================================================
// ACCESS REGISTRY
// ============================================================================

#[event]
pub struct AdminAdded {
    pub principal: Pubkey,
    pub granted_by: Pubkey,
    pub timestamp: i64,
}

#[event]
pub struct AdminRemoved {
    pub principal: Pubkey,
    pub revoked_by: Pubkey,
    pub timestamp: i64,
}

#[event]
pub struct OrganizerAdded {
    pub principal: Pubkey,
    pub granted_by: Pubkey,
    pub timestamp: i64,
}

#[event]
pub struct OrganizerRemoved {
    pub principal: Pubkey,
    pub revoked_by: Pubkey,
    pub timestamp: i64,
}

#[event]
pub struct VerifierAdded {
    pub principal: Pubkey,
    pub granted_by: Pubkey,
    pub timestamp: i64,
}

#[event]
pub struct VerifierRemoved {
    pub principal: Pubkey,
    pub revoked_by: Pubkey,
    pub timestamp: i64,
}

#[event]
pub struct PauseStateChanged {
    pub component: Component,
    pub paused: bool,
    pub changed_by: Pubkey,
    pub timestamp: i64,
}

// ============================================================================
// EVENT REGISTRY
// ============================================================================

#[event]
pub struct EventCreated {
    pub event_id: u64,
    pub organizer: Pubkey,
    pub title: String,
    pub start_time: i64,
    pub end_time: i64,
    pub max_attendees: u64,
    pub timestamp: i64,
}

#[event]
pub struct EventUpdated {
    pub event_id: u64,
    pub updated_by: Pubkey,
    pub timestamp: i64,
}

#[event]
pub struct EventDeactivated {
    pub event_id: u64,
    pub deactivated_by: Pubkey,
    pub reason: String,
    pub timestamp: i64,
}

#[event]
pub struct EventActivated {
    pub event_id: u64,
    pub activated_by: Pubkey,
    pub timestamp: i64,
}

#[event]
pub struct AttendeeCountUpdated {
    pub event_id: u64,
    pub current_attendees: u64,
    pub max_attendees: u64,
}

// ============================================================================
// BADGE LEDGER
// ============================================================================

#[event]
pub struct BadgeMinted {
    pub token_id: u64,
    pub event_id: u64,
    pub owner: Pubkey,
    pub metadata_uri: String,
    pub timestamp: i64,
}

#[event]
pub struct BadgeRevoked {
    pub token_id: u64,
    pub owner: Pubkey,
    pub reason: String,
    pub revoked_by: Pubkey,
    pub timestamp: i64,
}

#[event]
pub struct BadgeRestored {
    pub token_id: u64,
    pub owner: Pubkey,
    pub restored_by: Pubkey,
    pub timestamp: i64,
}

#[event]
pub struct BadgeTransferred {
    pub token_id: u64,
    pub from: Pubkey,
    pub to: Pubkey,
    pub timestamp: i64,
}

#[event]
pub struct StreakUpdated {
    pub user: Pubkey,
    pub streak: u64,
    pub timestamp: i64,
}

// ============================================================================
// ATTENDANCE VERIFIER
// ============================================================================

#[event]
pub struct AttendanceVerified {
    pub attendee: Pubkey,
    pub event_id: u64,
    pub method: VerificationMethod,
    pub verified_by: Pubkey,
    pub badge_id: u64,
    pub timestamp: i64,
}

#[event]
pub struct QrCodeGenerated {
    pub event_id: u64,
    /// keccak256 of the secret; the secret itself is never logged
    pub challenge_hash: [u8; 32],
    pub expires_at: i64,
    pub generated_by: Pubkey,
}

#[event]
pub struct AttendanceRevoked {
    pub attendee: Pubkey,
    pub event_id: u64,
    pub revoked_by: Pubkey,
    pub reason: String,
    pub timestamp: i64,
}
