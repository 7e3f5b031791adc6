use anchor_lang::prelude::*;

#[error_code]
pub enum AttendanceError {
    #[msg("Caller does not hold a role permitted to perform this action")]
    Unauthorized,

    #[msg("Attestation signer is neither an organizer nor a verifier")]
    UnauthorizedSigner,

    #[msg("Principal must not be the zero address")]
    InvalidPrincipal,

    #[msg("Attendee must not be the zero address")]
    InvalidAttendee,

    #[msg("The root admin cannot lose the admin role")]
    CannotRevokeRootAdmin,

    #[msg("Title must not be empty")]
    EmptyTitle,

    #[msg("Description must not be empty")]
    EmptyDescription,

    #[msg("Metadata URI must not be empty")]
    EmptyMetadataUri,

    #[msg("A reason is required")]
    EmptyReason,

    #[msg("QR secret must not be empty")]
    EmptySecret,

    #[msg("Field exceeds its maximum length")]
    FieldTooLong,

    #[msg("Event must start in the future")]
    StartTimeInPast,

    #[msg("Event must end after it starts")]
    InvalidTimeRange,

    #[msg("Requested record does not exist")]
    NotFound,

    #[msg("Metadata URI is already used by another event")]
    MetadataAlreadyUsed,

    #[msg("Event is not active")]
    EventInactive,

    #[msg("Event is already active")]
    EventAlreadyActive,

    #[msg("Event is not ongoing")]
    EventNotActive,

    #[msg("Event has reached its attendee capacity")]
    CapacityExceeded,

    #[msg("Capacity cannot drop below the current attendee count")]
    CapacityBelowAttendance,

    #[msg("A badge was already issued for this event and attendee")]
    AlreadyIssued,

    #[msg("Badge is already revoked")]
    BadgeAlreadyRevoked,

    #[msg("Badge is not revoked")]
    BadgeNotRevoked,

    #[msg("Revoked badges cannot be transferred")]
    BadgeRevokedNonTransferable,

    #[msg("Caller does not own this badge")]
    NotBadgeOwner,

    #[msg("Attendance already verified for this event")]
    AlreadyVerified,

    #[msg("No attendance recorded for this event and attendee")]
    NotRecorded,

    #[msg("Signature has already been used")]
    SignatureReplayed,

    #[msg("Signed attendance message is too old or from the future")]
    SignatureExpired,

    #[msg("Missing or malformed Ed25519 verification instruction")]
    InvalidSignatureInstruction,

    #[msg("No QR code generated for this event")]
    QrNotGenerated,

    #[msg("QR code has expired")]
    QrExpired,

    #[msg("QR secret does not match")]
    InvalidQrSecret,

    #[msg("QR code has already been used")]
    QrAlreadyUsed,

    #[msg("QR validity must be positive and at most one day")]
    InvalidQrValidity,

    #[msg("Supplied proof digest does not match the recomputed digest")]
    ProofDigestMismatch,

    #[msg("Component is paused")]
    SystemPaused,

    #[msg("Operation is already in progress")]
    ReentrantCall,

    #[msg("Batch input arrays differ in length")]
    LengthMismatch,

    #[msg("Batch input must not be empty")]
    EmptyInput,

    #[msg("Batch exceeds the maximum number of entries")]
    BatchTooLarge,

    #[msg("Not enough accounts supplied for the batch")]
    AccountMissing,

    #[msg("Supplied account does not match the expected address or owner")]
    InvalidAccount,

    #[msg("Arithmetic overflow in counter")]
    ArithmeticOverflow,
}
