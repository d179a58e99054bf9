use alloc::boxed::Box;
use alloc::vec::Vec;

use axerrno::{ax_err, AxResult};

use super::{SbiError, SBI_MAX_ARGS};
use crate::exit::GuestTrap;

/// Answers the Base extension's `probe_extension` query.
pub trait SbiProbe {
    /// Returns 0 if `ext_id` is not available, or an extension-specific
    /// non-zero value otherwise.
    fn probe_extension(&self, ext_id: usize) -> usize;
}

/// A decoded SBI call.
pub struct SbiCall<'a> {
    /// The extension ID (`a7`).
    pub ext_id: usize,
    /// The function ID (`a6`).
    pub func_id: usize,
    /// The call arguments (`a0..=a5`).
    pub args: [usize; SBI_MAX_ARGS],
    probe: &'a dyn SbiProbe,
}

impl<'a> SbiCall<'a> {
    /// Creates a call that probes extensions against `probe`.
    pub fn new(
        ext_id: usize,
        func_id: usize,
        args: [usize; SBI_MAX_ARGS],
        probe: &'a dyn SbiProbe,
    ) -> Self {
        Self {
            ext_id,
            func_id,
            args,
            probe,
        }
    }

    /// Probes `ext_id` against the registry the call is dispatched from.
    pub fn probe_extension(&self, ext_id: usize) -> usize {
        self.probe.probe_extension(ext_id)
    }
}

/// What an extension handler asks the dispatcher to do.
#[derive(Debug, PartialEq, Eq)]
pub enum SbiOutcome {
    /// Complete the call with a value or an SBI error.
    Ret(Result<usize, SbiError>),
    /// Do not complete the call; re-raise the trap into the guest instead.
    Redirect(GuestTrap),
}

impl From<Result<usize, SbiError>> for SbiOutcome {
    fn from(ret: Result<usize, SbiError>) -> Self {
        Self::Ret(ret)
    }
}

/// An SBI extension: a handler for a contiguous range of extension IDs.
///
/// `V` is the hypervisor's vCPU type, handed to the handler so it can act on
/// the calling vCPU.
pub trait SbiExtension<V>: Send + Sync {
    /// The first extension ID handled.
    fn extid_start(&self) -> usize;

    /// The last extension ID handled (inclusive).
    fn extid_end(&self) -> usize;

    /// The Base extension's `probe_extension` answer for `ext_id`.
    fn probe(&self, _ext_id: usize) -> usize {
        1
    }

    /// Handles `call` on behalf of `vcpu`.
    fn handle(&self, vcpu: &mut V, call: &SbiCall<'_>) -> SbiOutcome;
}

/// The table of registered SBI extensions.
///
/// Extensions are registered at boot through `&mut self`; once the registry
/// is shared it is read-only, so lookups and dispatch need no locking.
pub struct SbiExtensionRegistry<V> {
    extensions: Vec<Box<dyn SbiExtension<V>>>,
}

impl<V> SbiExtensionRegistry<V> {
    /// Creates an empty registry.
    pub const fn new() -> Self {
        Self {
            extensions: Vec::new(),
        }
    }

    /// Registers `ext`.
    ///
    /// Fails if its range is inverted or intersects a registered extension.
    pub fn register(&mut self, ext: Box<dyn SbiExtension<V>>) -> AxResult {
        let (start, end) = (ext.extid_start(), ext.extid_end());
        if start > end {
            return ax_err!(
                InvalidInput,
                format!("SBI extension range [{:#x}, {:#x}] is inverted", start, end)
            );
        }
        if let Some(other) = self
            .extensions
            .iter()
            .find(|e| e.extid_start() <= end && start <= e.extid_end())
        {
            return ax_err!(
                AlreadyExists,
                format!(
                    "SBI extension range [{:#x}, {:#x}] overlaps [{:#x}, {:#x}]",
                    start,
                    end,
                    other.extid_start(),
                    other.extid_end()
                )
            );
        }
        self.extensions.push(ext);
        Ok(())
    }

    /// Returns the extension whose ID range contains `ext_id`.
    pub fn find_extension(&self, ext_id: usize) -> Option<&dyn SbiExtension<V>> {
        self.extensions
            .iter()
            .find(|e| e.extid_start() <= ext_id && ext_id <= e.extid_end())
            .map(|e| e.as_ref())
    }

    /// The number of registered extensions.
    pub fn len(&self) -> usize {
        self.extensions.len()
    }

    /// Whether no extension is registered.
    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty()
    }
}

impl<V> SbiProbe for SbiExtensionRegistry<V> {
    fn probe_extension(&self, ext_id: usize) -> usize {
        self.find_extension(ext_id).map_or(0, |ext| ext.probe(ext_id))
    }
}

impl<V> Default for SbiExtensionRegistry<V> {
    fn default() -> Self {
        Self::new()
    }
}
