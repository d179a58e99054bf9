#[allow(unused_imports)] // used in doc
use crate::sbi::SbiExtensionRegistry;

/// A trap to be re-raised into the guest instead of completing an ecall.
///
/// The fields mirror the VS-level trap CSRs the hypervisor programs when it
/// redirects the trap.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GuestTrap {
    /// The guest PC of the trapping instruction. Filled in by the dispatcher.
    pub sepc: usize,
    /// The exception cause to report to the guest. Must be non-zero.
    pub scause: usize,
    /// The trap value (faulting address or instruction bits).
    pub stval: usize,
    /// The guest physical address of a guest-page fault, shifted right by 2.
    pub htval: usize,
    /// The transformed trapping instruction.
    pub htinst: usize,
}

/// The result of [`SbiExtensionRegistry::ecall`].
#[non_exhaustive]
#[derive(Debug, PartialEq, Eq)]
pub enum EcallExit {
    /// The call completed: the result registers were written and the guest PC
    /// was advanced past the `ecall` instruction.
    ///
    /// This includes calls to extensions nobody registered, which the guest
    /// sees as `SBI_ERR_NOT_SUPPORTED`.
    Handled,
    /// The handler asked for the trap to be redirected to the guest.
    ///
    /// The guest registers are untouched; the caller must inject this trap
    /// through its trap-injection path.
    Redirect(GuestTrap),
}
