//! Ed25519 precompile introspection.
//!
//! The attestation signature is verified by the runtime's Ed25519 program in
//! the instruction right before ours. Here we only confirm that instruction
//! checked the expected signer, message and signature.

use anchor_lang::{
    prelude::*,
    solana_program::sysvar::instructions::{load_current_index_checked, load_instruction_at_checked},
};

use crate::error::AttendanceError;

/// Native Ed25519 signature verification program
pub const ED25519_PROGRAM_ID: Pubkey = pubkey!("Ed25519SigVerify111111111111111111111111111");

const SIGNATURE_LEN: usize = 64;
const PUBKEY_LEN: usize = 32;
const OFFSETS_START: usize = 2;
const OFFSETS_LEN: usize = 14;

/// Marks an offset as referring to the precompile instruction's own data
const SELF_INSTRUCTION: u16 = u16::MAX;

/// Verify that the instruction preceding the current one is an Ed25519
/// precompile call over exactly (`signer`, `message`, `signature`).
pub fn verify_preceding_signature(
    instructions_sysvar: &AccountInfo,
    signer: &Pubkey,
    message: &[u8],
    signature: &[u8; 64],
) -> Result<()> {
    let current = load_current_index_checked(instructions_sysvar)?;
    require!(current > 0, AttendanceError::InvalidSignatureInstruction);

    let ix = load_instruction_at_checked(usize::from(current - 1), instructions_sysvar)?;
    require_keys_eq!(
        ix.program_id,
        ED25519_PROGRAM_ID,
        AttendanceError::InvalidSignatureInstruction
    );
    require!(ix.accounts.is_empty(), AttendanceError::InvalidSignatureInstruction);

    check_ed25519_instruction(&ix.data, signer, message, signature)
}

fn read_u16(data: &[u8], at: usize) -> Result<u16> {
    let bytes = data
        .get(at..at + 2)
        .ok_or(AttendanceError::InvalidSignatureInstruction)?;
    Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
}

fn slice(data: &[u8], offset: u16, len: usize) -> Result<&[u8]> {
    let start = usize::from(offset);
    data.get(start..start + len)
        .ok_or_else(|| error!(AttendanceError::InvalidSignatureInstruction))
}

/// Parse an Ed25519 precompile payload holding one signature whose offsets
/// all point into the payload itself.
pub fn check_ed25519_instruction(
    data: &[u8],
    signer: &Pubkey,
    message: &[u8],
    signature: &[u8; 64],
) -> Result<()> {
    require!(
        data.len() >= OFFSETS_START + OFFSETS_LEN && data[0] == 1,
        AttendanceError::InvalidSignatureInstruction
    );

    let at = OFFSETS_START;
    let signature_offset = read_u16(data, at)?;
    let signature_ix = read_u16(data, at + 2)?;
    let pubkey_offset = read_u16(data, at + 4)?;
    let pubkey_ix = read_u16(data, at + 6)?;
    let message_offset = read_u16(data, at + 8)?;
    let message_len = read_u16(data, at + 10)?;
    let message_ix = read_u16(data, at + 12)?;

    require!(
        signature_ix == SELF_INSTRUCTION
            && pubkey_ix == SELF_INSTRUCTION
            && message_ix == SELF_INSTRUCTION,
        AttendanceError::InvalidSignatureInstruction
    );
    require!(
        usize::from(message_len) == message.len(),
        AttendanceError::InvalidSignatureInstruction
    );

    require!(
        slice(data, pubkey_offset, PUBKEY_LEN)? == signer.as_ref(),
        AttendanceError::InvalidSignatureInstruction
    );
    require!(
        slice(data, signature_offset, SIGNATURE_LEN)? == signature.as_slice(),
        AttendanceError::InvalidSignatureInstruction
    );
    require!(
        slice(data, message_offset, message.len())? == message,
        AttendanceError::InvalidSignatureInstruction
    );
    Ok(())
}
