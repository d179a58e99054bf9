use axerrno::{ax_err, AxResult};

use super::{
    is_legacy_extension, SbiCall, SbiError, SbiExtensionRegistry, SbiOutcome,
    CAUSE_VIRTUAL_SUPERVISOR_ECALL, SBI_MAX_ARGS,
};
use crate::exit::EcallExit;
use crate::regs::{GprIndex, SbiTrapFrame};

/// Length of the `ecall` instruction.
const ECALL_INSN_LEN: usize = 4;

impl<V> SbiExtensionRegistry<V> {
    /// Handles an `ecall` trapped from `vcpu` with cause `cause`.
    ///
    /// Decodes the call from `regs`, dispatches it to the owning extension and
    /// writes the result back:
    ///
    /// - SBI v0.2+ calls get the error code in `a0` and the value in `a1`;
    /// - legacy v0.1 calls get a single result in `a0`;
    /// - calls to unregistered extensions get `SBI_ERR_NOT_SUPPORTED`.
    ///
    /// In all these cases `sepc` is advanced past the `ecall`. If the handler
    /// asks for a redirect, nothing is written and the trap is returned in
    /// [`EcallExit::Redirect`] with its `sepc` set to the trapping PC.
    ///
    /// Fails only if `cause` is not an environment call from VS-mode.
    pub fn ecall<R>(&self, vcpu: &mut V, cause: usize, regs: &mut R) -> AxResult<EcallExit>
    where
        R: SbiTrapFrame + ?Sized,
    {
        if cause != CAUSE_VIRTUAL_SUPERVISOR_ECALL {
            return ax_err!(
                InvalidInput,
                format!("trap cause {:#x} is not a VS-mode ecall", cause)
            );
        }

        let mut args = [0; SBI_MAX_ARGS];
        for (arg, reg) in args.iter_mut().zip(GprIndex::ARGS) {
            *arg = regs.gpr(reg);
        }
        let call = SbiCall::new(regs.gpr(GprIndex::A7), regs.gpr(GprIndex::A6), args, self);

        let outcome = match self.find_extension(call.ext_id) {
            Some(ext) => {
                trace!(
                    "SBI call ext {:#x} func {:#x} args {:x?}",
                    call.ext_id,
                    call.func_id,
                    call.args
                );
                ext.handle(vcpu, &call)
            }
            None => {
                debug!(
                    "Unsupported SBI call ext {:#x} func {:#x}",
                    call.ext_id, call.func_id
                );
                SbiOutcome::Ret(Err(SbiError::NotSupported))
            }
        };

        match outcome {
            SbiOutcome::Redirect(mut trap) => {
                trap.sepc = regs.sepc();
                Ok(EcallExit::Redirect(trap))
            }
            SbiOutcome::Ret(ret) => {
                if is_legacy_extension(call.ext_id) {
                    let a0 = match ret {
                        Ok(value) => value,
                        Err(err) => err.as_reg(),
                    };
                    regs.set_gpr(GprIndex::A0, a0);
                } else {
                    let (a0, a1) = match ret {
                        Ok(value) => (0, value),
                        Err(err) => (err.as_reg(), 0),
                    };
                    regs.set_gpr(GprIndex::A0, a0);
                    regs.set_gpr(GprIndex::A1, a1);
                }
                regs.set_sepc(regs.sepc().wrapping_add(ECALL_INSN_LEN));
                Ok(EcallExit::Handled)
            }
        }
    }
}
