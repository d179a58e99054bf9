use super::{
    SbiCall, SbiError, SbiExtension, SbiOutcome, SBI_EXT_BASE, SBI_IMPID, SBI_VERSION_MAJOR,
    SBI_VERSION_MINOR,
};

const GET_SPEC_VERSION: usize = 0;
const GET_IMP_ID: usize = 1;
const GET_IMP_VERSION: usize = 2;
const PROBE_EXT: usize = 3;
const GET_MVENDORID: usize = 4;
const GET_MARCHID: usize = 5;
const GET_MIMPID: usize = 6;

/// Machine identification values presented to guests.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MachineIds {
    pub mvendorid: usize,
    pub marchid: usize,
    pub mimpid: usize,
}

/// The SBI Base extension, identifying the hypervisor to the guest.
#[derive(Clone, Copy, Debug, Default)]
pub struct BaseExtension {
    impl_version: usize,
    ids: MachineIds,
}

impl BaseExtension {
    /// Creates the extension reporting `impl_version` and `ids`.
    pub const fn new(impl_version: usize, ids: MachineIds) -> Self {
        Self { impl_version, ids }
    }

    /// The value returned by `sbi_get_spec_version`.
    pub const fn spec_version() -> usize {
        (SBI_VERSION_MAJOR << 24) | SBI_VERSION_MINOR
    }
}

impl<V> SbiExtension<V> for BaseExtension {
    fn extid_start(&self) -> usize {
        SBI_EXT_BASE
    }

    fn extid_end(&self) -> usize {
        SBI_EXT_BASE
    }

    fn handle(&self, _vcpu: &mut V, call: &SbiCall<'_>) -> SbiOutcome {
        let ret = match call.func_id {
            GET_SPEC_VERSION => Ok(Self::spec_version()),
            GET_IMP_ID => Ok(SBI_IMPID),
            GET_IMP_VERSION => Ok(self.impl_version),
            PROBE_EXT => Ok(call.probe_extension(call.args[0])),
            GET_MVENDORID => Ok(self.ids.mvendorid),
            GET_MARCHID => Ok(self.ids.marchid),
            GET_MIMPID => Ok(self.ids.mimpid),
            _ => Err(SbiError::NotSupported),
        };
        SbiOutcome::Ret(ret)
    }
}
