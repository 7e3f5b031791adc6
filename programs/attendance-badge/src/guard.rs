//! Per-operation re-entrancy locks.
//!
//! Each guarded operation owns one bit in a `u16` stored on its component
//! account. Acquiring a held bit fails with `ReentrantCall`; the bit is
//! released when the lock goes out of scope, including on error paths.

use std::ops::{Deref, DerefMut};

use anchor_lang::prelude::*;

use crate::error::AttendanceError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u16)]
pub enum GuardedOperation {
    VerifyBySignature = 1 << 0,
    VerifyByQr = 1 << 1,
    VerifyManually = 1 << 2,
    BatchVerify = 1 << 3,
    RevokeAttendance = 1 << 4,
    Mint = 1 << 5,
    BatchMint = 1 << 6,
    RevokeBadge = 1 << 7,
    RestoreBadge = 1 << 8,
}

impl GuardedOperation {
    pub const fn bit(self) -> u16 {
        self as u16
    }
}

pub trait Lockable {
    fn locks_mut(&mut self) -> &mut u16;
}

pub struct OperationLock<'a, T: Lockable> {
    target: &'a mut T,
    operation: GuardedOperation,
}

impl<'a, T: Lockable> OperationLock<'a, T> {
    pub fn acquire(target: &'a mut T, operation: GuardedOperation) -> Result<Self> {
        let locks = target.locks_mut();
        require!(*locks & operation.bit() == 0, AttendanceError::ReentrantCall);
        *locks |= operation.bit();
        Ok(Self { target, operation })
    }
}

impl<T: Lockable> Deref for OperationLock<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        self.target
    }
}

impl<T: Lockable> DerefMut for OperationLock<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        self.target
    }
}

impl<T: Lockable> Drop for OperationLock<'_, T> {
    fn drop(&mut self) {
        *self.target.locks_mut() &= !self.operation.bit();
    }
}
