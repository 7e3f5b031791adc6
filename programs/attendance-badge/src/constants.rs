// ============================================================================
// SEEDS FOR PDA DERIVATION
// ============================================================================

pub const ACCESS_REGISTRY_SEED: &[u8] = b"access_registry";

pub const ROLE_SEED: &[u8] = b"role";

pub const EVENT_REGISTRY_SEED: &[u8] = b"event_registry";

pub const EVENT_SEED: &[u8] = b"event";

pub const EVENT_METADATA_SEED: &[u8] = b"event_metadata";

pub const ORGANIZER_INDEX_SEED: &[u8] = b"organizer_events";

pub const CATEGORY_INDEX_SEED: &[u8] = b"category_events";

pub const BADGE_LEDGER_SEED: &[u8] = b"badge_ledger";

pub const BADGE_SEED: &[u8] = b"badge";

pub const ISSUANCE_SEED: &[u8] = b"issuance";

pub const USER_STATS_SEED: &[u8] = b"user_stats";

pub const EVENT_BADGES_SEED: &[u8] = b"event_badges";

pub const ATTENDANCE_VERIFIER_SEED: &[u8] = b"attendance_verifier";

pub const ATTENDANCE_SEED: &[u8] = b"attendance";

pub const QR_CHALLENGE_SEED: &[u8] = b"qr_challenge";

pub const CONSUMED_PROOF_SEED: &[u8] = b"consumed_proof";

// ============================================================================
// FIELD LIMITS (bytes)
// ============================================================================

pub const MAX_TITLE_LEN: usize = 64;

pub const MAX_DESCRIPTION_LEN: usize = 256;

pub const MAX_METADATA_URI_LEN: usize = 200;

pub const MAX_LOCATION_LEN: usize = 64;

/// Categories double as PDA seeds, so they can never exceed one seed (32 bytes)
pub const MAX_CATEGORY_LEN: usize = 32;

pub const MAX_REASON_LEN: usize = 128;

/// Raw signature bytes, QR secret or free-text note kept on the attendance record
pub const MAX_PROOF_LEN: usize = 128;

// ============================================================================
// VERIFICATION POLICY
// ============================================================================

/// Domain tag prefixed to every signed attendance message
pub const ATTENDANCE_MESSAGE_DOMAIN: &[u8] = b"attendance-badge:v1";

/// Domain tag for QR consumption digests
pub const QR_DIGEST_DOMAIN: &[u8] = b"qr";

/// A signed attendance message is accepted for 5 minutes
pub const SIGNATURE_MAX_AGE_SECS: i64 = 300;

/// Longest lifetime of a QR challenge (1 day)
pub const MAX_QR_VALIDITY_SECS: i64 = 86_400;

/// Upper bound on entries in one batch instruction (transaction account limit)
pub const MAX_BATCH_SIZE: usize = 8;

/// Remaining accounts per attendee in a batch verification:
/// attendance record, issuance marker, badge, user stats
pub const BATCH_VERIFY_ACCOUNTS_PER_ENTRY: usize = 4;

/// Remaining accounts per attendee in a batch mint:
/// issuance marker, badge, user stats
pub const BATCH_MINT_ACCOUNTS_PER_ENTRY: usize = 3;

/// Runtime cap on instruction return data
pub const MAX_RETURN_DATA: usize = 1024;

/// Most ids one list query returns, so a Borsh `Vec<u64>` fits in return data
pub const MAX_PAGE_LEN: usize = (MAX_RETURN_DATA - 4) / 8;
