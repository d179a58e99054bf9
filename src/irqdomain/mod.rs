//! Host IRQ domains.
//!
//! An IRQ domain owns a contiguous range `[base, end)` of host IRQ numbers
//! (hirq) and represents the hardware lines (hwirq) of one interrupt controller,
//! so that `hirq = base + hwirq`. Domains are kept in a [`DomainList`] owned by
//! an [`IrqDomainManager`].

mod list;
mod manager;

use alloc::boxed::Box;
use core::any::Any;
use core::fmt;

use axerrno::{ax_err, AxResult};

pub use list::DomainList;
pub use manager::{IrqDomainManager, DEFAULT_HOST_IRQ_COUNT};

/// An opaque reference to the device-tree node an IRQ domain was probed from.
///
/// It is only stored and compared, never dereferenced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeviceNode(usize);

impl DeviceNode {
    /// Wraps a raw node handle (for instance a phandle or a node address).
    pub const fn new(handle: usize) -> Self {
        Self(handle)
    }

    /// Returns the raw node handle.
    pub const fn handle(&self) -> usize {
        self.0
    }
}

/// The trigger type encoded in an interrupt specifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IrqTrigger {
    /// No trigger type given; the controller default applies.
    None,
    /// Rising edge.
    EdgeRising,
    /// Falling edge.
    EdgeFalling,
    /// Both edges.
    EdgeBoth,
    /// Active-high level.
    LevelHigh,
    /// Active-low level.
    LevelLow,
}

impl IrqTrigger {
    /// Decodes the low nibble of a device-tree trigger cell.
    pub fn from_cell(cell: u32) -> AxResult<Self> {
        match cell & 0xf {
            0 => Ok(Self::None),
            1 => Ok(Self::EdgeRising),
            2 => Ok(Self::EdgeFalling),
            3 => Ok(Self::EdgeBoth),
            4 => Ok(Self::LevelHigh),
            8 => Ok(Self::LevelLow),
            other => ax_err!(InvalidInput, format!("bad trigger type {:#x}", other)),
        }
    }
}

/// Optional per-domain capabilities supplied by the controller driver.
pub trait IrqDomainOps: Send + Sync {
    /// Translates an interrupt specifier into a hardware IRQ index and trigger
    /// type. The default decodes a one-cell specifier.
    fn xlate(&self, _domain: &IrqDomain, intspec: &[u32]) -> AxResult<(usize, IrqTrigger)> {
        match intspec.first() {
            Some(&hwirq) => Ok((hwirq as usize, IrqTrigger::None)),
            None => ax_err!(InvalidInput, "empty interrupt specifier"),
        }
    }
}

/// Domain operations for controllers using one- or two-cell specifiers
/// (`<hwirq>` or `<hwirq trigger>`).
#[derive(Debug, Default, Clone, Copy)]
pub struct SimpleIrqDomainOps;

impl IrqDomainOps for SimpleIrqDomainOps {
    fn xlate(&self, _domain: &IrqDomain, intspec: &[u32]) -> AxResult<(usize, IrqTrigger)> {
        match intspec {
            [hwirq] => Ok((*hwirq as usize, IrqTrigger::None)),
            [hwirq, trigger, ..] => Ok((*hwirq as usize, IrqTrigger::from_cell(*trigger)?)),
            [] => ax_err!(InvalidInput, "empty interrupt specifier"),
        }
    }
}

/// Shared instance of [`SimpleIrqDomainOps`] for drivers to register with.
pub static SIMPLE_IRQ_DOMAIN_OPS: SimpleIrqDomainOps = SimpleIrqDomainOps;

/// Used for domains registered without operations.
struct OneCellOps;

impl IrqDomainOps for OneCellOps {}

/// A contiguous range of host IRQ numbers owned by one interrupt controller.
pub struct IrqDomain {
    base: usize,
    count: usize,
    of_node: Option<DeviceNode>,
    ops: Option<&'static dyn IrqDomainOps>,
    host_data: Option<Box<dyn Any + Send + Sync>>,
}

impl IrqDomain {
    pub(crate) fn new(
        of_node: Option<DeviceNode>,
        base: usize,
        count: usize,
        ops: Option<&'static dyn IrqDomainOps>,
        host_data: Option<Box<dyn Any + Send + Sync>>,
    ) -> Self {
        Self {
            base,
            count,
            of_node,
            ops,
            host_data,
        }
    }

    /// The first host IRQ number owned by this domain.
    pub const fn base(&self) -> usize {
        self.base
    }

    /// The number of hardware lines this domain represents.
    pub const fn count(&self) -> usize {
        self.count
    }

    /// One past the last host IRQ number owned by this domain.
    pub const fn end(&self) -> usize {
        self.base + self.count
    }

    /// Whether `hirq` lies within `[base, end)`.
    pub const fn contains(&self, hirq: usize) -> bool {
        self.base <= hirq && hirq < self.end()
    }

    /// Whether the ranges of `self` and `[base, base + count)` intersect.
    pub(crate) const fn overlaps(&self, base: usize, count: usize) -> bool {
        self.base < base + count && base < self.end()
    }

    /// The device-tree node this domain was registered for.
    pub const fn of_node(&self) -> Option<DeviceNode> {
        self.of_node
    }

    /// The driver-supplied domain operations, if any.
    pub fn ops(&self) -> Option<&'static dyn IrqDomainOps> {
        self.ops
    }

    /// The driver data attached at registration, if it is of type `T`.
    pub fn host_data<T: Any>(&self) -> Option<&T> {
        self.host_data.as_deref()?.downcast_ref()
    }

    /// Translates an interrupt specifier into a hardware IRQ index of this
    /// domain, using the domain's operations or the one-cell default.
    pub fn xlate(&self, intspec: &[u32]) -> AxResult<(usize, IrqTrigger)> {
        let ops = self.ops.unwrap_or(&OneCellOps);
        let (hwirq, trigger) = ops.xlate(self, intspec)?;
        if hwirq >= self.count {
            return ax_err!(
                InvalidInput,
                format!("hwirq {} out of domain of {} lines", hwirq, self.count)
            );
        }
        Ok((hwirq, trigger))
    }
}

impl fmt::Debug for IrqDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IrqDomain")
            .field("base", &self.base)
            .field("end", &self.end())
            .field("of_node", &self.of_node)
            .field("has_ops", &self.ops.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TwoCellOnly;

    impl IrqDomainOps for TwoCellOnly {
        fn xlate(&self, _domain: &IrqDomain, intspec: &[u32]) -> AxResult<(usize, IrqTrigger)> {
            match intspec {
                [hwirq, trigger] => Ok((*hwirq as usize, IrqTrigger::from_cell(*trigger)?)),
                _ => ax_err!(InvalidInput),
            }
        }
    }

    static TWO_CELL_ONLY: TwoCellOnly = TwoCellOnly;

    #[test]
    fn test_default_xlate_is_one_cell() {
        let domain = IrqDomain::new(None, 32, 16, None, None);
        assert_eq!(domain.xlate(&[5]).unwrap(), (5, IrqTrigger::None));
        assert_eq!(domain.xlate(&[5, 4]).unwrap(), (5, IrqTrigger::None));
        assert!(domain.xlate(&[]).is_err());
        assert!(domain.xlate(&[16]).is_err());
    }

    #[test]
    fn test_custom_ops_xlate() {
        let domain = IrqDomain::new(None, 0, 8, Some(&TWO_CELL_ONLY), None);
        assert_eq!(domain.xlate(&[3, 8]).unwrap(), (3, IrqTrigger::LevelLow));
        assert!(domain.xlate(&[3]).is_err());
        assert!(domain.xlate(&[3, 5]).is_err());
    }

    #[test]
    fn test_host_data_downcast() {
        let domain = IrqDomain::new(
            Some(DeviceNode::new(0xc00_0000)),
            0,
            4,
            Some(&SIMPLE_IRQ_DOMAIN_OPS),
            Some(Box::new(0xabcdu32)),
        );
        assert_eq!(domain.host_data::<u32>(), Some(&0xabcd));
        assert_eq!(domain.host_data::<u64>(), None);
        assert_eq!(domain.of_node().map(|n| n.handle()), Some(0xc00_0000));
        assert_eq!(domain.xlate(&[1, 1]).unwrap(), (1, IrqTrigger::EdgeRising));
    }

    #[test]
    fn test_contains_is_half_open() {
        let domain = IrqDomain::new(None, 100, 8, None, None);
        assert!(!domain.contains(99));
        assert!(domain.contains(100));
        assert!(domain.contains(107));
        assert!(!domain.contains(108));
        assert!(domain.overlaps(107, 1));
        assert!(!domain.overlaps(108, 4));
        assert!(!domain.overlaps(96, 4));
    }
}
