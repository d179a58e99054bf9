//! SBI hypercall dispatch.
//!
//! Guests call into the hypervisor with `ecall`, passing the extension ID in
//! `a7`, the function ID in `a6` and up to six arguments in `a0..=a5`. An
//! [`SbiExtensionRegistry`] maps extension IDs to the [`SbiExtension`] owning
//! them and [`SbiExtensionRegistry::ecall`] performs the whole
//! decode, dispatch and write-back sequence.

mod base;
mod ecall;
mod extension;

use axerrno::AxError;

pub use base::{BaseExtension, MachineIds};
pub use extension::{SbiCall, SbiExtension, SbiExtensionRegistry, SbiOutcome, SbiProbe};

/// The SBI specification major version implemented for guests.
pub const SBI_VERSION_MAJOR: usize = 0;
/// The SBI specification minor version implemented for guests.
pub const SBI_VERSION_MINOR: usize = 3;
/// The SBI implementation ID reported to guests.
pub const SBI_IMPID: usize = 2;

/// The number of argument registers of an SBI call.
pub const SBI_MAX_ARGS: usize = 6;

/// `scause` of an environment call from VS-mode.
pub const CAUSE_VIRTUAL_SUPERVISOR_ECALL: usize = 10;

/// First extension ID of the legacy SBI v0.1 calls, which return a single
/// value in `a0`.
pub const SBI_EXT_LEGACY_START: usize = 0x00;
/// Last extension ID of the legacy SBI v0.1 calls.
pub const SBI_EXT_LEGACY_END: usize = 0x0F;

/// Base extension.
pub const SBI_EXT_BASE: usize = 0x10;

/// Returns whether `ext_id` is a legacy SBI v0.1 extension ID.
pub const fn is_legacy_extension(ext_id: usize) -> bool {
    matches!(ext_id, SBI_EXT_LEGACY_START..=SBI_EXT_LEGACY_END)
}

/// Standard SBI error codes returned to guests in `a0`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(isize)]
pub enum SbiError {
    Failed = -1,
    NotSupported = -2,
    InvalidParam = -3,
    Denied = -4,
    InvalidAddress = -5,
    AlreadyAvailable = -6,
    AlreadyStarted = -7,
    AlreadyStopped = -8,
}

impl SbiError {
    /// The signed error code of the calling convention.
    pub const fn code(self) -> isize {
        self as isize
    }

    /// The error code as it is placed in a guest register.
    pub const fn as_reg(self) -> usize {
        self.code() as usize
    }
}

impl From<AxError> for SbiError {
    fn from(err: AxError) -> Self {
        match err {
            AxError::InvalidInput | AxError::InvalidData => Self::InvalidParam,
            AxError::PermissionDenied => Self::Denied,
            AxError::BadAddress => Self::InvalidAddress,
            AxError::Unsupported => Self::NotSupported,
            AxError::AlreadyExists => Self::AlreadyAvailable,
            _ => Self::Failed,
        }
    }
}
