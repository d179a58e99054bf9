use alloc::boxed::Box;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::any::Any;
use core::fmt::Write;

use axerrno::{ax_err, AxResult};

use super::{DeviceNode, DomainList, IrqDomain, IrqDomainOps};
use crate::hal::HostIrqHal;

/// The default size of the host IRQ number space.
pub const DEFAULT_HOST_IRQ_COUNT: usize = 1024;

/// Owner of all host IRQ domains.
///
/// The manager is the explicit context of the domain layer: it is constructed
/// once when the interrupt subsystem starts and passed (or shared) to every
/// user. All methods take `&self` and may be called concurrently from any core,
/// including from interrupt context.
pub struct IrqDomainManager<H: HostIrqHal> {
    hal: H,
    capacity: usize,
    domains: DomainList,
}

impl<H: HostIrqHal> IrqDomainManager<H> {
    /// Creates a manager with no domains over [`DEFAULT_HOST_IRQ_COUNT`] host
    /// IRQ numbers.
    pub fn new(hal: H) -> Self {
        Self::with_capacity(hal, DEFAULT_HOST_IRQ_COUNT)
    }

    /// Creates a manager with no domains over `capacity` host IRQ numbers.
    pub fn with_capacity(hal: H, capacity: usize) -> Self {
        Self {
            hal,
            capacity,
            domains: DomainList::new(),
        }
    }

    /// The size of the host IRQ number space.
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// The underlying HAL.
    pub const fn hal(&self) -> &H {
        &self.hal
    }

    /// Translates a host IRQ number into the hardware index within `domain`.
    pub fn hwirq_from_hirq(&self, domain: &IrqDomain, hirq: usize) -> AxResult<usize> {
        if !domain.contains(hirq) {
            return ax_err!(InvalidInput);
        }
        Ok(hirq - domain.base())
    }

    /// Returns the host IRQ number mapped for `hwirq`, or `None` if the line
    /// has no live mapping yet.
    pub fn find_mapping(&self, domain: &IrqDomain, hwirq: usize) -> AxResult<Option<usize>> {
        if hwirq >= domain.count() {
            return ax_err!(InvalidInput);
        }
        let hirq = domain.base() + hwirq;
        Ok(self.hal.irq_get(hirq).map(|_| hirq))
    }

    /// Maps `hwirq` of `domain` to its host IRQ number, creating the mapping
    /// through the allocator if it does not exist yet.
    pub fn create_mapping(&self, domain: &IrqDomain, hwirq: usize) -> AxResult<usize> {
        if let Some(hirq) = self.find_mapping(domain, hwirq)? {
            return Ok(hirq);
        }
        let hirq = domain.base() + hwirq;
        self.hal.create_mapping(hirq)?;
        Ok(hirq)
    }

    /// Disposes the mapping of `hirq` through the allocator.
    pub fn dispose_mapping(&self, hirq: usize) -> AxResult {
        if self.get_domain_for(hirq).is_none() {
            return ax_err!(InvalidInput);
        }
        self.hal.dispose_mapping(hirq)
    }

    /// Returns the domain owning `hirq`.
    pub fn get_domain_for(&self, hirq: usize) -> Option<Arc<IrqDomain>> {
        let domain = self.domains.find(|d| d.contains(hirq));
        if domain.is_none() {
            warn!("Failed to find host IRQ {} domain", hirq);
        }
        domain
    }

    /// Returns the first domain, in registration order, for which `pred`
    /// holds.
    ///
    /// `pred` runs with the registry read-locked and local interrupts masked;
    /// it must not call back into the manager's `add` or `remove`.
    pub fn find_domain<F>(&self, pred: F) -> Option<Arc<IrqDomain>>
    where
        F: FnMut(&IrqDomain) -> bool,
    {
        self.domains.find(pred)
    }

    /// Returns the domain registered for the device-tree node `node`.
    pub fn find_by_node(&self, node: DeviceNode) -> Option<Arc<IrqDomain>> {
        self.find_domain(|d| d.of_node() == Some(node))
    }

    /// Registers a domain of `size` lines.
    ///
    /// With `base` given, the domain occupies `[base, base + size)`.
    /// Otherwise a region is requested from the allocator. Either way the
    /// range must be non-empty, must fit in the host IRQ number space and
    /// must not overlap a live domain.
    ///
    /// A region handed out by the allocator stays reserved when the range is
    /// then rejected: [`HostIrqHal`] has no operation to give it back.
    pub fn add(
        &self,
        of_node: Option<DeviceNode>,
        base: Option<usize>,
        size: usize,
        ops: Option<&'static dyn IrqDomainOps>,
        host_data: Option<Box<dyn Any + Send + Sync>>,
    ) -> AxResult<Arc<IrqDomain>> {
        if size == 0 {
            return ax_err!(InvalidInput, "IRQ domain must have at least one line");
        }

        let base = match base {
            Some(base) => base,
            None => self.hal.alloc_region(size).map_err(|err| {
                warn!("Failed to find available slot for {} IRQs: {:?}", size, err);
                err
            })?,
        };
        match base.checked_add(size) {
            Some(end) if end <= self.capacity => {}
            _ => {
                return ax_err!(
                    InvalidInput,
                    format!(
                        "IRQ domain at {} of {} lines exceeds {} host IRQs",
                        base, size, self.capacity
                    )
                )
            }
        }

        let domain = Arc::new(IrqDomain::new(of_node, base, size, ops, host_data));
        if let Err(conflict) = self
            .domains
            .push_tail_unless(domain.clone(), |d| d.overlaps(base, size))
        {
            return ax_err!(
                AlreadyExists,
                format!(
                    "IRQ range [{}, {}) overlaps domain [{}, {})",
                    base,
                    base + size,
                    conflict.base(),
                    conflict.end()
                )
            );
        }
        trace!("IRQ domain [{}, {}) added", domain.base(), domain.end());
        Ok(domain)
    }

    /// Unregisters `domain` and disposes every mapping in its range.
    ///
    /// Disposal is best-effort: a failing slot is logged and the remaining
    /// slots are still disposed.
    pub fn remove(&self, domain: &Arc<IrqDomain>) {
        if !self.domains.unlink(domain) {
            warn!(
                "IRQ domain [{}, {}) is not registered",
                domain.base(),
                domain.end()
            );
            return;
        }
        for hirq in domain.base()..domain.end() {
            if let Err(err) = self.hal.dispose_mapping(hirq) {
                debug!("Failed to dispose host IRQ {}: {:?}", hirq, err);
            }
        }
        trace!("IRQ domain [{}, {}) removed", domain.base(), domain.end());
    }

    /// A snapshot of the live domains in registration order.
    pub fn domains(&self) -> Vec<Arc<IrqDomain>> {
        self.domains.read().to_vec()
    }

    /// The number of live domains.
    pub fn len(&self) -> usize {
        self.domains.len()
    }

    /// Whether no domain is registered.
    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }

    /// Writes every domain and its mapped host IRQs to `out`.
    pub fn debug_dump(&self, out: &mut dyn Write) {
        let domains = self.domains.read();
        for domain in domains.iter() {
            let _ = writeln!(
                out,
                "  Group from IRQ {} to {}:",
                domain.base(),
                domain.end()
            );
            for idx in domain.base()..domain.end() {
                let Some(irq) = self.hal.irq_get(idx) else {
                    continue;
                };
                if irq.num != idx {
                    let _ = writeln!(out, "WARNING: IRQ {} not correctly set", idx);
                }
                let _ = writeln!(
                    out,
                    "    IRQ {} mapped, name: {}, chip: {}",
                    idx,
                    irq.name,
                    irq.chip.unwrap_or("None")
                );
            }
        }
    }
}
