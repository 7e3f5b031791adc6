use anchor_lang::prelude::*;

use crate::{constants::MAX_BATCH_SIZE, error::AttendanceError};

pub mod activate_event;
pub mod batch_mint_badges;
pub mod batch_verify_attendance;
pub mod create_event;
pub mod deactivate_event;
pub mod generate_qr_code;
pub mod grant_role;
pub mod grant_roles_batch;
pub mod initialize;
pub mod mint_badge;
pub mod queries;
pub mod restore_badge;
pub mod revoke_attendance;
pub mod revoke_badge;
pub mod revoke_role;
pub mod set_paused;
pub mod transfer_badge;
pub mod update_event;
pub mod verify_by_qr;
pub mod verify_by_signature;
pub mod verify_manually;

/// Shape check shared by the batch instructions, run before any account is touched.
pub fn validate_batch_shape(entries: usize, other_len: usize, accounts: usize, per_entry: usize) -> Result<()> {
    require!(entries > 0, AttendanceError::EmptyInput);
    require!(entries == other_len, AttendanceError::LengthMismatch);
    require!(entries <= MAX_BATCH_SIZE, AttendanceError::BatchTooLarge);
    require!(accounts >= entries * per_entry, AttendanceError::AccountMissing);
    Ok(())
}
