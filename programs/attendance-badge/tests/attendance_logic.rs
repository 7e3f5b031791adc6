//! Host-side scenarios over in-memory component state.
//!
//! `Deployment` holds every account the program would touch. Each call runs
//! on a copy that only replaces the live state when the call succeeds, which
//! mirrors instruction atomicity on chain.

use std::collections::HashMap;

use anchor_lang::prelude::*;
use attendance_badge::{
    attestation::{
        accept_signed_attendance, commit_attendance, ensure_verifiable, revoke_attendance, Attestation,
        BadgeCascade, Counterparts,
    },
    constants::{BATCH_MINT_ACCOUNTS_PER_ENTRY, BATCH_VERIFY_ACCOUNTS_PER_ENTRY, MAX_BATCH_SIZE},
    error::AttendanceError,
    guard::GuardedOperation,
    hashing::{attendance_message, metadata_key},
    instructions::validate_batch_shape,
    state::{
        AccessRegistry, AttendanceRecord, AttendanceVerifier, Badge, BadgeIssue, BadgeLedger, Capabilities,
        ConsumedProof, Event, EventBadges, EventDetails, EventRegistry, IssuanceMarker, MetadataClaim,
        QrChallenge, RoleGrant, Tier, UserStats, VerificationMethod,
    },
};

const T0: i64 = 1_700_000_000;
const START: i64 = T0 + 60;
const END: i64 = T0 + 3_600;
const DURING: i64 = T0 + 120;

fn assert_error<T: std::fmt::Debug>(result: Result<T>, expected: AttendanceError) {
    match result {
        Ok(value) => panic!("expected {expected:?}, got Ok({value:?})"),
        Err(err) => assert_eq!(err, anchor_lang::error::Error::from(expected)),
    }
}

fn details(max_attendees: u64, category: &str) -> EventDetails {
    EventDetails {
        title: "Solana Breakpoint".to_string(),
        description: "Builders meetup".to_string(),
        start_time: START,
        end_time: END,
        max_attendees,
        location: "Lisbon".to_string(),
        category: category.to_string(),
    }
}

#[derive(Clone, Default)]
struct Deployment {
    access: AccessRegistry,
    roles: HashMap<Pubkey, RoleGrant>,
    registry: EventRegistry,
    events: HashMap<u64, Event>,
    claims: HashMap<[u8; 32], MetadataClaim>,
    ledger: BadgeLedger,
    badges: HashMap<u64, Badge>,
    markers: HashMap<(u64, Pubkey), IssuanceMarker>,
    stats: HashMap<Pubkey, UserStats>,
    rosters: HashMap<u64, EventBadges>,
    verifier: AttendanceVerifier,
    records: HashMap<(u64, Pubkey), AttendanceRecord>,
    challenges: HashMap<u64, QrChallenge>,
    consumed: HashMap<[u8; 32], ConsumedProof>,
}

impl Deployment {
    fn genesis(owner: Pubkey) -> Self {
        let mut deployment = Self {
            access: AccessRegistry {
                owner,
                root_admin: owner,
                ..Default::default()
            },
            registry: EventRegistry {
                next_event_id: 1,
                ..Default::default()
            },
            ledger: BadgeLedger {
                next_token_id: 1,
                ..Default::default()
            },
            ..Default::default()
        };
        let mut role = RoleGrant {
            principal: owner,
            ..Default::default()
        };
        role.grant(Tier::Admin, T0);
        deployment.roles.insert(owner, role);
        deployment
    }

    fn caps(&self, principal: &Pubkey) -> Capabilities {
        Capabilities::of(self.roles.get(principal))
    }

    fn atomically<T>(&mut self, call: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        let mut draft = self.clone();
        let out = call(&mut draft)?;
        *self = draft;
        Ok(out)
    }

    // ------------------------------------------------------------------
    // Access registry
    // ------------------------------------------------------------------

    fn grant(&mut self, caller: Pubkey, principal: Pubkey, tier: Tier) -> Result<bool> {
        self.atomically(|d| {
            d.access.ensure_not_paused()?;
            d.access.authorize_grant(&caller, d.caps(&caller), tier)?;
            require!(principal != Pubkey::default(), AttendanceError::InvalidPrincipal);
            let role = d.roles.entry(principal).or_default();
            role.principal = principal;
            Ok(role.grant(tier, T0))
        })
    }

    fn revoke(&mut self, caller: Pubkey, principal: Pubkey, tier: Tier) -> Result<bool> {
        self.atomically(|d| {
            d.access.ensure_not_paused()?;
            d.access.authorize_revoke(d.caps(&caller), &principal, tier)?;
            Ok(d
                .roles
                .get_mut(&principal)
                .map_or(false, |role| role.revoke(tier, T0)))
        })
    }

    fn grant_batch(&mut self, caller: Pubkey, principals: &[Pubkey], tier: Tier) -> Result<()> {
        self.atomically(|d| {
            d.access.ensure_not_paused()?;
            d.access.authorize_grant(&caller, d.caps(&caller), tier)?;
            validate_batch_shape(principals.len(), principals.len(), principals.len(), 1)?;
            for principal in principals {
                require!(*principal != Pubkey::default(), AttendanceError::InvalidPrincipal);
                let role = d.roles.entry(*principal).or_default();
                role.principal = *principal;
                role.grant(tier, T0);
            }
            Ok(())
        })
    }

    // ------------------------------------------------------------------
    // Event registry
    // ------------------------------------------------------------------

    fn create_event(&mut self, caller: Pubkey, uri: &str, details: EventDetails) -> Result<u64> {
        self.atomically(|d| {
            require!(d.caps(&caller).can_organize(), AttendanceError::Unauthorized);
            d.registry.ensure_not_paused()?;
            let event_id = d.registry.allocate_id()?;
            let mut event = Event::default();
            event.open(event_id, caller, uri.to_string(), details, T0)?;
            d.claims.entry(metadata_key(uri)).or_default().claim(event_id)?;
            d.events.insert(event_id, event);
            Ok(event_id)
        })
    }

    fn event(&self, event_id: u64) -> &Event {
        &self.events[&event_id]
    }

    // ------------------------------------------------------------------
    // Attendance verifier
    // ------------------------------------------------------------------

    fn commit(&mut self, event_id: u64, attestation: &Attestation<'_>, now: i64) -> Result<u64> {
        let key = (event_id, attestation.attendee);
        let mut event = self.events[&event_id].clone();
        let mut record = self.records.get(&key).cloned().unwrap_or_default();
        let mut marker = self.markers.get(&key).cloned().unwrap_or_default();
        let mut badge = Badge::default();
        let mut stats = self.stats.get(&attestation.attendee).cloned().unwrap_or_default();
        let mut roster = self.rosters.get(&event_id).cloned().unwrap_or_default();

        let token_id = commit_attendance(
            &mut self.verifier,
            Counterparts {
                registry: &self.registry,
                event: &mut event,
                ledger: &mut self.ledger,
            },
            &mut record,
            BadgeIssue {
                marker: &mut marker,
                badge: &mut badge,
                stats: &mut stats,
                roster: &mut roster,
            },
            attestation,
            now,
        )?;

        self.events.insert(event_id, event);
        self.records.insert(key, record);
        self.markers.insert(key, marker);
        self.badges.insert(token_id, badge);
        self.stats.insert(attestation.attendee, stats);
        self.rosters.insert(event_id, roster);
        Ok(token_id)
    }

    fn verify_manually(&mut self, caller: Pubkey, event_id: u64, attendee: Pubkey, now: i64) -> Result<u64> {
        self.atomically(|d| {
            require!(d.caps(&caller).is_privileged(), AttendanceError::Unauthorized);
            require!(attendee != Pubkey::default(), AttendanceError::InvalidAttendee);
            d.verifier.ensure_not_paused()?;
            d.commit(
                event_id,
                &Attestation {
                    attendee,
                    verified_by: caller,
                    method: VerificationMethod::Manual,
                    proof: b"checked in at the door",
                    metadata_uri: "ipfs://badge",
                },
                now,
            )
        })
    }

    fn generate_qr(&mut self, caller: Pubkey, event_id: u64, secret: &str, validity: i64, now: i64) -> Result<i64> {
        self.atomically(|d| {
            d.verifier.ensure_not_paused()?;
            let caps = d.caps(&caller);
            let event = d.event(event_id);
            require!(
                caller == event.organizer || caps.holds(Tier::Verifier) || caps.is_admin(),
                AttendanceError::Unauthorized
            );
            require!(event.is_active, AttendanceError::EventInactive);
            d.challenges
                .entry(event_id)
                .or_default()
                .issue(event_id, secret, validity, caller, now)
        })
    }

    fn verify_by_qr(&mut self, attendee: Pubkey, event_id: u64, secret: &str, now: i64) -> Result<u64> {
        self.atomically(|d| {
            d.verifier.ensure_not_paused()?;
            let record = d.records.get(&(event_id, attendee)).cloned().unwrap_or_default();
            ensure_verifiable(d.event(event_id), &record, now)?;
            let challenge = d
                .challenges
                .get(&event_id)
                .ok_or(AttendanceError::QrNotGenerated)?;
            let digest = challenge.redeem(secret, now)?;
            d.consumed
                .entry(digest)
                .or_default()
                .consume(digest, event_id, attendee, now, AttendanceError::QrAlreadyUsed)?;
            d.commit(
                event_id,
                &Attestation {
                    attendee,
                    verified_by: attendee,
                    method: VerificationMethod::QrCode,
                    proof: secret.as_bytes(),
                    metadata_uri: "ipfs://badge",
                },
                now,
            )
        })
    }

    fn verify_by_signature(
        &mut self,
        attendee: Pubkey,
        event_id: u64,
        attester: Pubkey,
        timestamp: i64,
        now: i64,
    ) -> Result<u64> {
        self.atomically(|d| {
            d.verifier.ensure_not_paused()?;
            let record = d.records.get(&(event_id, attendee)).cloned().unwrap_or_default();
            ensure_verifiable(d.event(event_id), &record, now)?;
            let digest = attendance_message(event_id, &attendee, timestamp);
            let message = accept_signed_attendance(event_id, &attendee, d.caps(&attester), timestamp, digest, now)?;
            d.consumed
                .entry(message)
                .or_default()
                .consume(message, event_id, attendee, now, AttendanceError::SignatureReplayed)?;
            d.commit(
                event_id,
                &Attestation {
                    attendee,
                    verified_by: attester,
                    method: VerificationMethod::Signature,
                    proof: &[7u8; 64],
                    metadata_uri: "ipfs://badge",
                },
                now,
            )
        })
    }

    fn batch_verify(
        &mut self,
        caller: Pubkey,
        event_id: u64,
        attendees: &[Pubkey],
        uris: &[&str],
        now: i64,
    ) -> Result<Vec<u64>> {
        self.atomically(|d| {
            require!(d.caps(&caller).is_privileged(), AttendanceError::Unauthorized);
            validate_batch_shape(
                attendees.len(),
                uris.len(),
                attendees.len() * BATCH_VERIFY_ACCOUNTS_PER_ENTRY,
                BATCH_VERIFY_ACCOUNTS_PER_ENTRY,
            )?;
            d.verifier.ensure_not_paused()?;
            let mut minted = Vec::new();
            for (attendee, uri) in attendees.iter().zip(uris) {
                let attended = d
                    .records
                    .get(&(event_id, *attendee))
                    .map_or(false, |record| record.attended);
                if attended {
                    continue;
                }
                minted.push(d.commit(
                    event_id,
                    &Attestation {
                        attendee: *attendee,
                        verified_by: caller,
                        method: VerificationMethod::Manual,
                        proof: b"roll call",
                        metadata_uri: uri,
                    },
                    now,
                )?);
            }
            Ok(minted)
        })
    }

    fn revoke_attendance(&mut self, caller: Pubkey, event_id: u64, attendee: Pubkey, reason: &str) -> Result<()> {
        self.atomically(|d| {
            require!(d.caps(&caller).can_organize(), AttendanceError::Unauthorized);
            d.verifier.ensure_not_paused()?;
            let key = (event_id, attendee);
            let mut record = d
                .records
                .get(&key)
                .cloned()
                .ok_or(AttendanceError::NotRecorded)?;
            let mut badge = d.badges.get(&record.badge_id).cloned().unwrap_or_default();
            let mut stats = d.stats.get(&attendee).cloned().unwrap_or_default();
            revoke_attendance(
                &mut d.verifier,
                &mut record,
                Some(BadgeCascade {
                    ledger: &mut d.ledger,
                    badge: &mut badge,
                    stats: &mut stats,
                }),
                reason,
                caller,
                DURING,
            )?;
            if record.badge_minted {
                d.badges.insert(badge.token_id, badge);
                d.stats.insert(attendee, stats);
            }
            d.records.insert(key, record);
            Ok(())
        })
    }

    // ------------------------------------------------------------------
    // Badge ledger
    // ------------------------------------------------------------------

    fn mint(&mut self, caller: Pubkey, event_id: u64, attendee: Pubkey, uri: &str) -> Result<u64> {
        self.atomically(|d| {
            require!(d.caps(&caller).is_privileged(), AttendanceError::Unauthorized);
            d.issue(event_id, attendee, uri)
        })
    }

    fn issue(&mut self, event_id: u64, attendee: Pubkey, uri: &str) -> Result<u64> {
        let key = (event_id, attendee);
        let event = self.events[&event_id].clone();
        let mut marker = self.markers.get(&key).cloned().unwrap_or_default();
        let mut badge = Badge::default();
        let mut stats = self.stats.get(&attendee).cloned().unwrap_or_default();
        let mut roster = self.rosters.get(&event_id).cloned().unwrap_or_default();
        let token_id = self.ledger.issue(
            &event,
            attendee,
            uri,
            BadgeIssue {
                marker: &mut marker,
                badge: &mut badge,
                stats: &mut stats,
                roster: &mut roster,
            },
            DURING,
        )?;
        self.markers.insert(key, marker);
        self.badges.insert(token_id, badge);
        self.stats.insert(attendee, stats);
        self.rosters.insert(event_id, roster);
        Ok(token_id)
    }

    fn batch_mint(&mut self, caller: Pubkey, event_id: u64, attendees: &[Pubkey], uris: &[&str]) -> Result<Vec<u64>> {
        self.atomically(|d| {
            require!(d.caps(&caller).is_privileged(), AttendanceError::Unauthorized);
            validate_batch_shape(
                attendees.len(),
                uris.len(),
                attendees.len() * BATCH_MINT_ACCOUNTS_PER_ENTRY,
                BATCH_MINT_ACCOUNTS_PER_ENTRY,
            )?;
            attendees
                .iter()
                .zip(uris)
                .map(|(attendee, uri)| d.issue(event_id, *attendee, uri))
                .collect()
        })
    }

    fn has_attended(&self, event_id: u64, attendee: Pubkey) -> bool {
        self.records
            .get(&(event_id, attendee))
            .map_or(false, |record| record.attended)
    }
}

/// Owner, an organizer with one event, and a verifier
struct Fixture {
    deployment: Deployment,
    owner: Pubkey,
    organizer: Pubkey,
    verifier: Pubkey,
    event_id: u64,
}

fn fixture(capacity: u64) -> Fixture {
    let owner = Pubkey::new_unique();
    let organizer = Pubkey::new_unique();
    let verifier = Pubkey::new_unique();
    let mut deployment = Deployment::genesis(owner);
    deployment.grant(owner, organizer, Tier::Organizer).unwrap();
    deployment.grant(owner, verifier, Tier::Verifier).unwrap();
    let event_id = deployment
        .create_event(organizer, "ipfs://event-meta", details(capacity, "conference"))
        .unwrap();
    Fixture {
        deployment,
        owner,
        organizer,
        verifier,
        event_id,
    }
}

// ============================================================================
// Verification scenarios
// ============================================================================

#[test]
fn manual_verification_issues_badge_and_blocks_repeat() {
    let Fixture {
        mut deployment,
        verifier,
        event_id,
        ..
    } = fixture(1);
    let attendee = Pubkey::new_unique();

    let token_id = deployment
        .verify_manually(verifier, event_id, attendee, DURING)
        .unwrap();
    assert_eq!(token_id, 1);

    let record = &deployment.records[&(event_id, attendee)];
    assert!(record.attended);
    assert_eq!(record.method, VerificationMethod::Manual);
    assert_eq!(record.verified_by, verifier);
    assert!(record.badge_minted);
    assert_eq!(record.badge_id, 1);

    let badge = &deployment.badges[&1];
    assert_eq!(badge.event_id, event_id);
    assert_eq!(badge.owner, attendee);
    assert!(!badge.revoked);

    let stats = &deployment.stats[&attendee];
    assert_eq!((stats.total_badges, stats.active_badges, stats.streak), (1, 1, 1));
    assert_eq!(deployment.event(event_id).current_attendees, 1);
    assert_eq!(deployment.rosters[&event_id].token_ids, vec![1]);
    assert_eq!(deployment.verifier.total_verified, 1);

    assert_error(
        deployment.verify_manually(verifier, event_id, attendee, DURING),
        AttendanceError::AlreadyVerified,
    );
}

#[test]
fn last_slot_goes_to_first_attendee() {
    let Fixture {
        mut deployment,
        verifier,
        event_id,
        ..
    } = fixture(1);

    deployment
        .verify_manually(verifier, event_id, Pubkey::new_unique(), DURING)
        .unwrap();
    assert_error(
        deployment.verify_manually(verifier, event_id, Pubkey::new_unique(), DURING),
        AttendanceError::CapacityExceeded,
    );
    assert_eq!(deployment.event(event_id).current_attendees, 1);
    assert_eq!(deployment.ledger.total_minted, 1);
}

#[test]
fn only_capacity_many_racing_attendees_get_in() {
    let Fixture {
        mut deployment,
        verifier,
        event_id,
        ..
    } = fixture(3);

    let outcomes: Vec<_> = (0..10)
        .map(|_| deployment.verify_manually(verifier, event_id, Pubkey::new_unique(), DURING))
        .collect();

    assert_eq!(outcomes.iter().filter(|outcome| outcome.is_ok()).count(), 3);
    for outcome in outcomes.into_iter().skip(3) {
        assert_error(outcome, AttendanceError::CapacityExceeded);
    }
    assert_eq!(deployment.event(event_id).current_attendees, 3);
}

#[test]
fn verification_only_while_event_is_ongoing() {
    let Fixture {
        mut deployment,
        owner,
        organizer,
        verifier,
        event_id,
    } = fixture(0);
    let attendee = Pubkey::new_unique();

    assert_error(
        deployment.verify_manually(verifier, event_id, attendee, START - 1),
        AttendanceError::EventNotActive,
    );
    assert_error(
        deployment.verify_manually(verifier, event_id, attendee, END + 1),
        AttendanceError::EventNotActive,
    );

    let organizer_caps = deployment.caps(&organizer);
    deployment
        .events
        .get_mut(&event_id)
        .unwrap()
        .deactivate(&organizer, organizer_caps, "weather".to_string())
        .unwrap();
    assert_error(
        deployment.verify_manually(verifier, event_id, attendee, DURING),
        AttendanceError::EventNotActive,
    );

    let owner_caps = deployment.caps(&owner);
    deployment.events.get_mut(&event_id).unwrap().activate(owner_caps).unwrap();
    assert!(deployment.verify_manually(verifier, event_id, attendee, DURING).is_ok());
}

#[test]
fn manual_verification_requires_a_tier_and_an_attendee() {
    let Fixture {
        mut deployment,
        verifier,
        event_id,
        ..
    } = fixture(0);

    assert_error(
        deployment.verify_manually(Pubkey::new_unique(), event_id, Pubkey::new_unique(), DURING),
        AttendanceError::Unauthorized,
    );
    assert_error(
        deployment.verify_manually(verifier, event_id, Pubkey::default(), DURING),
        AttendanceError::InvalidAttendee,
    );
}

#[test]
fn expired_qr_code_is_rejected() {
    let Fixture {
        mut deployment,
        organizer,
        event_id,
        ..
    } = fixture(0);

    deployment
        .generate_qr(organizer, event_id, "secret1", 1, DURING)
        .unwrap();
    assert_error(
        deployment.verify_by_qr(Pubkey::new_unique(), event_id, "secret1", DURING + 2),
        AttendanceError::QrExpired,
    );
    assert_eq!(deployment.event(event_id).current_attendees, 0);
}

#[test]
fn qr_secret_admits_exactly_one_attendee() {
    let Fixture {
        mut deployment,
        verifier,
        event_id,
        ..
    } = fixture(0);
    let first = Pubkey::new_unique();
    let second = Pubkey::new_unique();

    assert_error(
        deployment.verify_by_qr(first, event_id, "secret1", DURING),
        AttendanceError::QrNotGenerated,
    );

    deployment
        .generate_qr(verifier, event_id, "secret1", 600, DURING)
        .unwrap();
    assert_error(
        deployment.verify_by_qr(first, event_id, "secret2", DURING),
        AttendanceError::InvalidQrSecret,
    );

    deployment.verify_by_qr(first, event_id, "secret1", DURING).unwrap();
    let record = &deployment.records[&(event_id, first)];
    assert_eq!(record.method, VerificationMethod::QrCode);
    assert_eq!(record.verified_by, first);

    assert_error(
        deployment.verify_by_qr(second, event_id, "secret1", DURING),
        AttendanceError::QrAlreadyUsed,
    );

    // Regenerating replaces the secret
    deployment
        .generate_qr(verifier, event_id, "secret2", 600, DURING)
        .unwrap();
    deployment.verify_by_qr(second, event_id, "secret2", DURING).unwrap();
}

#[test]
fn qr_generation_is_limited_to_event_staff() {
    let Fixture {
        mut deployment,
        owner,
        organizer,
        event_id,
        ..
    } = fixture(0);

    let other_organizer = Pubkey::new_unique();
    deployment.grant(owner, other_organizer, Tier::Organizer).unwrap();
    assert_error(
        deployment.generate_qr(other_organizer, event_id, "s", 60, DURING),
        AttendanceError::Unauthorized,
    );
    assert!(deployment.generate_qr(owner, event_id, "s", 60, DURING).is_ok());

    let organizer_caps = deployment.caps(&organizer);
    deployment
        .events
        .get_mut(&event_id)
        .unwrap()
        .deactivate(&organizer, organizer_caps, String::new())
        .unwrap();
    assert_error(
        deployment.generate_qr(organizer, event_id, "s", 60, DURING),
        AttendanceError::EventInactive,
    );
}

#[test]
fn signer_without_attesting_tier_is_rejected() {
    let Fixture {
        mut deployment,
        owner,
        verifier,
        event_id,
        ..
    } = fixture(0);
    let attendee = Pubkey::new_unique();

    assert_error(
        deployment.verify_by_signature(attendee, event_id, Pubkey::new_unique(), DURING, DURING),
        AttendanceError::UnauthorizedSigner,
    );
    // Admin alone does not attest
    assert_error(
        deployment.verify_by_signature(attendee, event_id, owner, DURING, DURING),
        AttendanceError::UnauthorizedSigner,
    );
    assert!(!deployment.has_attended(event_id, attendee));

    deployment
        .verify_by_signature(attendee, event_id, verifier, DURING, DURING)
        .unwrap();
    let record = &deployment.records[&(event_id, attendee)];
    assert_eq!(record.method, VerificationMethod::Signature);
    assert_eq!(record.verified_by, verifier);
}

#[test]
fn signed_attendance_has_a_freshness_window() {
    let attendee = Pubkey::new_unique();
    let verifier_caps = Capabilities::from_tiers(&[Tier::Verifier]);
    let accept = |timestamp: i64| {
        accept_signed_attendance(
            1,
            &attendee,
            verifier_caps,
            timestamp,
            attendance_message(1, &attendee, timestamp),
            DURING,
        )
    };

    assert!(accept(DURING).is_ok());
    assert!(accept(DURING - 299).is_ok());
    assert_error(accept(DURING - 300), AttendanceError::SignatureExpired);
    assert_error(accept(DURING + 1), AttendanceError::SignatureExpired);

    assert_error(
        accept_signed_attendance(1, &attendee, verifier_caps, DURING, [0u8; 32], DURING),
        AttendanceError::ProofDigestMismatch,
    );
}

#[test]
fn consumed_signature_cannot_be_replayed() {
    let Fixture {
        mut deployment,
        organizer,
        verifier,
        event_id,
        ..
    } = fixture(0);
    let attendee = Pubkey::new_unique();

    deployment
        .verify_by_signature(attendee, event_id, verifier, DURING, DURING)
        .unwrap();
    assert_error(
        deployment.verify_by_signature(attendee, event_id, verifier, DURING, DURING + 1),
        AttendanceError::AlreadyVerified,
    );

    // Once the attended gate is cleared only the consumed digest stops reuse
    deployment
        .revoke_attendance(organizer, event_id, attendee, "duplicate wristband")
        .unwrap();
    assert_error(
        deployment.verify_by_signature(attendee, event_id, verifier, DURING, DURING + 1),
        AttendanceError::SignatureReplayed,
    );
}

// ============================================================================
// Batches
// ============================================================================

#[test]
fn batch_with_mismatched_lengths_changes_nothing() {
    let Fixture {
        mut deployment,
        verifier,
        event_id,
        ..
    } = fixture(0);
    let attendees = [Pubkey::new_unique(), Pubkey::new_unique()];

    assert_error(
        deployment.batch_verify(verifier, event_id, &attendees, &["ipfs://x"], DURING),
        AttendanceError::LengthMismatch,
    );
    assert_eq!(deployment.event(event_id).current_attendees, 0);
    assert_eq!(deployment.ledger.next_token_id, 1);
    assert!(deployment.records.is_empty());
}

#[test]
fn batch_shape_checks() {
    let per_entry = BATCH_VERIFY_ACCOUNTS_PER_ENTRY;
    assert_error(validate_batch_shape(0, 0, 0, per_entry), AttendanceError::EmptyInput);
    assert_error(validate_batch_shape(2, 1, 8, per_entry), AttendanceError::LengthMismatch);
    let too_many = MAX_BATCH_SIZE + 1;
    assert_error(
        validate_batch_shape(too_many, too_many, too_many * per_entry, per_entry),
        AttendanceError::BatchTooLarge,
    );
    assert_error(validate_batch_shape(2, 2, 7, per_entry), AttendanceError::AccountMissing);
    assert!(validate_batch_shape(2, 2, 8, per_entry).is_ok());
}

#[test]
fn batch_verification_skips_already_verified_attendees() {
    let Fixture {
        mut deployment,
        verifier,
        event_id,
        ..
    } = fixture(0);
    let attendees = [Pubkey::new_unique(), Pubkey::new_unique(), Pubkey::new_unique()];

    deployment
        .verify_manually(verifier, event_id, attendees[1], DURING)
        .unwrap();

    let minted = deployment
        .batch_verify(verifier, event_id, &attendees, &["ipfs://a", "ipfs://b", "ipfs://c"], DURING)
        .unwrap();
    assert_eq!(minted, vec![2, 3]);
    assert!(attendees.iter().all(|a| deployment.has_attended(event_id, *a)));

    // Resubmitting the same batch is a no-op
    let minted = deployment
        .batch_verify(verifier, event_id, &attendees, &["ipfs://a", "ipfs://b", "ipfs://c"], DURING)
        .unwrap();
    assert!(minted.is_empty());
    assert_eq!(deployment.event(event_id).current_attendees, 3);
}

#[test]
fn batch_mint_is_all_or_nothing() {
    let Fixture {
        mut deployment,
        verifier,
        event_id,
        ..
    } = fixture(0);
    let repeat = Pubkey::new_unique();
    let attendees = [Pubkey::new_unique(), repeat, repeat];

    assert_error(
        deployment.batch_mint(verifier, event_id, &attendees, &["ipfs://1", "ipfs://2", "ipfs://3"]),
        AttendanceError::AlreadyIssued,
    );
    assert_eq!(deployment.ledger.total_minted, 0);
    assert_eq!(deployment.ledger.next_token_id, 1);
    assert!(deployment.badges.is_empty());

    let minted = deployment
        .batch_mint(verifier, event_id, &attendees[..2], &["ipfs://1", "ipfs://2"])
        .unwrap();
    assert_eq!(minted, vec![1, 2]);
    assert_eq!(deployment.rosters[&event_id].token_ids, vec![1, 2]);
}

// ============================================================================
// Revocation
// ============================================================================

#[test]
fn revoking_attendance_cascades_to_the_badge() {
    let Fixture {
        mut deployment,
        organizer,
        verifier,
        event_id,
        ..
    } = fixture(0);
    let attendee = Pubkey::new_unique();
    let token_id = deployment
        .verify_manually(verifier, event_id, attendee, DURING)
        .unwrap();

    deployment
        .revoke_attendance(organizer, event_id, attendee, "left early")
        .unwrap();

    let badge = &deployment.badges[&token_id];
    assert!(badge.revoked);
    assert_eq!(badge.revoke_reason, "left early");
    let stats = &deployment.stats[&attendee];
    assert_eq!(stats.active_badges, 0);
    assert_eq!(stats.total_badges, 1);
    assert!(stats.active_badge_ids().is_empty());

    assert!(!deployment.has_attended(event_id, attendee));
    let record = &deployment.records[&(event_id, attendee)];
    assert_eq!(record.verified_by, verifier);
    assert_eq!(record.badge_id, token_id);
    assert_eq!(record.revoke_reason, "left early");
    assert_eq!(deployment.verifier.total_revoked, 1);
    assert_eq!(deployment.ledger.total_revoked, 1);
}

#[test]
fn revoked_attendee_passes_the_gate_but_gets_no_second_badge() {
    let Fixture {
        mut deployment,
        owner,
        organizer,
        verifier,
        event_id,
    } = fixture(0);
    let attendee = Pubkey::new_unique();
    let token_id = deployment
        .verify_manually(verifier, event_id, attendee, DURING)
        .unwrap();
    deployment
        .revoke_attendance(organizer, event_id, attendee, "badge shared")
        .unwrap();

    // Verifier side: the attended gate is open again
    let record = deployment.records[&(event_id, attendee)].clone();
    assert!(ensure_verifiable(deployment.event(event_id), &record, DURING).is_ok());

    // Ledger side: the pair keeps its issuance and the badge stays revoked
    assert_error(
        deployment.verify_manually(verifier, event_id, attendee, DURING),
        AttendanceError::AlreadyIssued,
    );
    assert!(deployment.badges[&token_id].revoked);
    assert!(!deployment.has_attended(event_id, attendee));

    // Only an explicit restore brings the badge back
    let mut badge = deployment.badges[&token_id].clone();
    let mut stats = deployment.stats[&attendee].clone();
    deployment
        .ledger
        .restore(&mut badge, &mut stats, owner, DURING)
        .unwrap();
    assert!(!badge.revoked);
    assert_eq!(stats.active_badges, 1);
}

#[test]
fn revocation_preconditions() {
    let Fixture {
        mut deployment,
        organizer,
        verifier,
        event_id,
        ..
    } = fixture(0);
    let attendee = Pubkey::new_unique();

    assert_error(
        deployment.revoke_attendance(organizer, event_id, attendee, "no-show"),
        AttendanceError::NotRecorded,
    );

    deployment
        .verify_manually(verifier, event_id, attendee, DURING)
        .unwrap();
    assert_error(
        deployment.revoke_attendance(verifier, event_id, attendee, "no-show"),
        AttendanceError::Unauthorized,
    );
    assert_error(
        deployment.revoke_attendance(organizer, event_id, attendee, ""),
        AttendanceError::EmptyReason,
    );

    deployment
        .revoke_attendance(organizer, event_id, attendee, "no-show")
        .unwrap();
    assert_error(
        deployment.revoke_attendance(organizer, event_id, attendee, "again"),
        AttendanceError::NotRecorded,
    );
}

#[test]
fn cascade_leaves_an_already_revoked_badge_alone() {
    let Fixture {
        mut deployment,
        owner,
        organizer,
        verifier,
        event_id,
    } = fixture(0);
    let attendee = Pubkey::new_unique();
    let token_id = deployment
        .verify_manually(verifier, event_id, attendee, DURING)
        .unwrap();

    let mut badge = deployment.badges[&token_id].clone();
    let mut stats = deployment.stats[&attendee].clone();
    deployment
        .ledger
        .revoke(&mut badge, &mut stats, "fraud", owner, DURING)
        .unwrap();
    deployment.badges.insert(token_id, badge);
    deployment.stats.insert(attendee, stats);

    deployment
        .revoke_attendance(organizer, event_id, attendee, "fraud confirmed")
        .unwrap();
    assert_eq!(deployment.badges[&token_id].revoke_reason, "fraud");
    assert_eq!(deployment.stats[&attendee].active_badges, 0);
    assert_eq!(deployment.ledger.total_revoked, 1);
}

// ============================================================================
// Ledger
// ============================================================================

#[test]
fn direct_mint_checks() {
    let Fixture {
        mut deployment,
        owner,
        organizer,
        verifier,
        event_id,
    } = fixture(0);
    let attendee = Pubkey::new_unique();

    assert_error(
        deployment.mint(Pubkey::new_unique(), event_id, attendee, "ipfs://x"),
        AttendanceError::Unauthorized,
    );
    assert_error(
        deployment.mint(verifier, event_id, Pubkey::default(), "ipfs://x"),
        AttendanceError::InvalidAttendee,
    );
    assert_error(
        deployment.mint(verifier, event_id, attendee, ""),
        AttendanceError::EmptyMetadataUri,
    );

    assert_eq!(deployment.mint(owner, event_id, attendee, "ipfs://x").unwrap(), 1);
    assert!(deployment.markers[&(event_id, attendee)].is_issued());
    assert_error(
        deployment.mint(owner, event_id, attendee, "ipfs://y"),
        AttendanceError::AlreadyIssued,
    );

    let organizer_caps = deployment.caps(&organizer);
    deployment
        .events
        .get_mut(&event_id)
        .unwrap()
        .deactivate(&organizer, organizer_caps, String::new())
        .unwrap();
    assert_error(
        deployment.mint(owner, event_id, Pubkey::new_unique(), "ipfs://z"),
        AttendanceError::EventInactive,
    );
}

#[test]
fn revoked_badges_do_not_move_and_stats_stay_with_the_earner() {
    let Fixture {
        mut deployment,
        owner,
        verifier,
        event_id,
        ..
    } = fixture(0);
    let attendee = Pubkey::new_unique();
    let friend = Pubkey::new_unique();
    let token_id = deployment
        .verify_manually(verifier, event_id, attendee, DURING)
        .unwrap();

    let mut badge = deployment.badges[&token_id].clone();
    let mut stats = deployment.stats[&attendee].clone();
    let ledger = &mut deployment.ledger;

    assert_error(
        ledger.transfer(&mut badge, &friend, attendee, DURING),
        AttendanceError::NotBadgeOwner,
    );
    ledger.transfer(&mut badge, &attendee, friend, DURING).unwrap();
    assert_eq!(badge.owner, friend);
    assert_eq!(badge.attendee, attendee);

    // Revoking after transfer still adjusts the earner's statistics
    ledger.revoke(&mut badge, &mut stats, "resold", owner, DURING).unwrap();
    assert_eq!(stats.active_badges, 0);
    assert_error(
        ledger.transfer(&mut badge, &friend, attendee, DURING),
        AttendanceError::BadgeRevokedNonTransferable,
    );
    assert_error(
        ledger.revoke(&mut badge, &mut stats, "again", owner, DURING),
        AttendanceError::BadgeAlreadyRevoked,
    );
}

#[test]
fn streak_counts_every_mint() {
    let Fixture {
        mut deployment,
        organizer,
        verifier,
        ..
    } = fixture(0);
    let attendee = Pubkey::new_unique();

    let second_event = deployment
        .create_event(organizer, "ipfs://event-2", details(0, "workshop"))
        .unwrap();
    deployment.verify_manually(verifier, 1, attendee, DURING).unwrap();
    deployment
        .verify_manually(verifier, second_event, attendee, DURING)
        .unwrap();

    let stats = &deployment.stats[&attendee];
    assert_eq!(stats.streak, 2);
    assert_eq!(stats.badge_ids(), vec![1, 2]);
    assert_eq!(stats.last_minted_at, DURING);
}

// ============================================================================
// Access, pause and re-entrancy
// ============================================================================

#[test]
fn grants_are_idempotent_and_admin_gated() {
    let Fixture {
        mut deployment,
        owner,
        organizer,
        verifier,
        ..
    } = fixture(0);

    let before = deployment.roles[&verifier].tiers;
    assert!(!deployment.grant(owner, verifier, Tier::Verifier).unwrap());
    assert_eq!(deployment.roles[&verifier].tiers, before);

    assert_error(
        deployment.grant(organizer, Pubkey::new_unique(), Tier::Verifier),
        AttendanceError::Unauthorized,
    );
    assert_error(
        deployment.grant(owner, Pubkey::default(), Tier::Verifier),
        AttendanceError::InvalidPrincipal,
    );

    assert!(deployment.revoke(owner, organizer, Tier::Organizer).unwrap());
    assert!(!deployment.revoke(owner, organizer, Tier::Organizer).unwrap());
    assert!(!deployment.revoke(owner, Pubkey::new_unique(), Tier::Verifier).unwrap());
    assert_error(
        deployment.revoke(owner, owner, Tier::Admin),
        AttendanceError::CannotRevokeRootAdmin,
    );
}

#[test]
fn owner_can_always_restore_admin() {
    let Fixture {
        mut deployment,
        owner,
        ..
    } = fixture(0);
    let second_admin = Pubkey::new_unique();

    deployment.grant(owner, second_admin, Tier::Admin).unwrap();
    deployment.roles.get_mut(&owner).unwrap().revoke(Tier::Admin, T0);
    assert!(!deployment.caps(&owner).is_admin());

    assert_error(
        deployment.grant(owner, Pubkey::new_unique(), Tier::Organizer),
        AttendanceError::Unauthorized,
    );
    assert!(deployment.grant(owner, owner, Tier::Admin).unwrap());
    assert!(deployment.caps(&owner).is_admin());
}

#[test]
fn batch_grant_is_all_or_nothing() {
    let Fixture {
        mut deployment,
        owner,
        organizer,
        ..
    } = fixture(0);
    let first = Pubkey::new_unique();
    let second = Pubkey::new_unique();

    assert_error(
        deployment.grant_batch(owner, &[first, Pubkey::default(), second], Tier::Verifier),
        AttendanceError::InvalidPrincipal,
    );
    assert!(!deployment.caps(&first).can_attest());
    assert!(!deployment.roles.contains_key(&first));

    assert_error(deployment.grant_batch(owner, &[], Tier::Verifier), AttendanceError::EmptyInput);
    let crowd: Vec<Pubkey> = (0..=MAX_BATCH_SIZE).map(|_| Pubkey::new_unique()).collect();
    assert_error(
        deployment.grant_batch(owner, &crowd, Tier::Verifier),
        AttendanceError::BatchTooLarge,
    );
    assert_error(
        deployment.grant_batch(organizer, &[first], Tier::Verifier),
        AttendanceError::Unauthorized,
    );

    deployment.grant_batch(owner, &[first, second], Tier::Verifier).unwrap();
    assert!(deployment.caps(&first).can_attest());
    assert!(deployment.caps(&second).can_attest());
}

#[test]
fn organizers_create_events_with_unique_metadata() {
    let Fixture {
        mut deployment,
        organizer,
        verifier,
        event_id,
        ..
    } = fixture(0);

    assert_error(
        deployment.create_event(verifier, "ipfs://other", details(0, "")),
        AttendanceError::Unauthorized,
    );
    assert_error(
        deployment.create_event(organizer, "ipfs://event-meta", details(0, "")),
        AttendanceError::MetadataAlreadyUsed,
    );
    assert_eq!(deployment.registry.next_event_id, event_id + 1);

    let next = deployment
        .create_event(organizer, "ipfs://other", details(0, ""))
        .unwrap();
    assert_eq!(next, event_id + 1);
    assert_eq!(deployment.event(next).organizer, organizer);
}

#[test]
fn paused_components_fail_fast() {
    let Fixture {
        mut deployment,
        owner,
        organizer,
        verifier,
        event_id,
    } = fixture(0);
    let attendee = Pubkey::new_unique();

    deployment.verifier.paused = true;
    assert_error(
        deployment.verify_manually(verifier, event_id, attendee, DURING),
        AttendanceError::SystemPaused,
    );
    deployment.verifier.paused = false;

    deployment.ledger.paused = true;
    assert_error(
        deployment.verify_manually(verifier, event_id, attendee, DURING),
        AttendanceError::SystemPaused,
    );
    deployment.ledger.paused = false;

    deployment.registry.paused = true;
    assert_error(
        deployment.verify_manually(verifier, event_id, attendee, DURING),
        AttendanceError::SystemPaused,
    );
    assert_error(
        deployment.create_event(organizer, "ipfs://paused", details(0, "")),
        AttendanceError::SystemPaused,
    );
    deployment.registry.paused = false;

    deployment.access.paused = true;
    assert_error(
        deployment.grant(owner, Pubkey::new_unique(), Tier::Verifier),
        AttendanceError::SystemPaused,
    );
    // Reads stay available
    assert!(deployment.caps(&verifier).can_attest());
    deployment.access.paused = false;

    assert!(deployment.verify_manually(verifier, event_id, attendee, DURING).is_ok());
    assert_eq!(deployment.event(event_id).current_attendees, 1);
}

#[test]
fn mint_in_flight_rejects_nested_verification() {
    let Fixture {
        mut deployment,
        verifier,
        event_id,
        ..
    } = fixture(0);

    deployment.ledger.locks = GuardedOperation::Mint.bit();
    assert_error(
        deployment.verify_manually(verifier, event_id, Pubkey::new_unique(), DURING),
        AttendanceError::ReentrantCall,
    );
    assert_eq!(deployment.event(event_id).current_attendees, 0);

    deployment.ledger.locks = 0;
    assert!(deployment
        .verify_manually(verifier, event_id, Pubkey::new_unique(), DURING)
        .is_ok());
    assert_eq!(deployment.ledger.locks, 0);
}
