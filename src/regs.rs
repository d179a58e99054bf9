/// Indices of the RISC-V general-purpose registers used by the SBI calling
/// convention, numbered as `x10..=x17`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(usize)]
pub enum GprIndex {
    A0 = 10,
    A1 = 11,
    A2 = 12,
    A3 = 13,
    A4 = 14,
    A5 = 15,
    A6 = 16,
    A7 = 17,
}

impl GprIndex {
    /// The argument registers `a0..=a5`, in order.
    pub const ARGS: [GprIndex; 6] = [
        GprIndex::A0,
        GprIndex::A1,
        GprIndex::A2,
        GprIndex::A3,
        GprIndex::A4,
        GprIndex::A5,
    ];

    /// The architectural register number (`xN`).
    pub const fn number(self) -> usize {
        self as usize
    }
}

/// Register file of a trapped guest hart, as seen by the ecall dispatcher.
///
/// This is implemented by the architecture-specific vCPU of the hypervisor. It
/// exposes only what a hypercall needs: the argument/result registers and the
/// trapped program counter.
///
/// # Design Philosophy
///
/// - **Decoupled**: the dispatcher never depends on the layout of the
///   hypervisor's trap frame
/// - **Minimal**: write-back is limited to `a0`, `a1` and `sepc`
pub trait SbiTrapFrame {
    /// Reads a general-purpose register.
    fn gpr(&self, reg: GprIndex) -> usize;

    /// Sets the value of a general-purpose register.
    fn set_gpr(&mut self, reg: GprIndex, val: usize);

    /// The guest program counter at which the trap was taken.
    fn sepc(&self) -> usize;

    /// Sets the guest program counter to resume at.
    fn set_sepc(&mut self, pc: usize);
}
