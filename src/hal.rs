use axerrno::AxResult;

/// A snapshot of one entry of the generic host interrupt registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostIrqInfo {
    /// The host IRQ number recorded in the registry entry.
    pub num: usize,
    /// The name the entry was registered with.
    pub name: &'static str,
    /// The name of the interrupt chip driving the line, if one is attached.
    pub chip: Option<&'static str>,
}

/// The interfaces which the underlying hypervisor must implement for the IRQ
/// domain layer.
///
/// The extended-IRQ allocator is the authority on the lifecycle of raw host
/// IRQ numbers; the domain layer never tracks which lines are mapped itself and
/// asks [`HostIrqHal::irq_get`] instead.
pub trait HostIrqHal {
    /// Reserves a contiguous region of `size` host IRQ numbers.
    ///
    /// # Returns
    ///
    /// * `usize` - The first host IRQ number of the region.
    fn alloc_region(&self, size: usize) -> AxResult<usize>;

    /// Materializes a mapping for the host IRQ number `hirq`.
    ///
    /// # Returns
    ///
    /// * `usize` - The host IRQ number backing the new mapping.
    fn create_mapping(&self, hirq: usize) -> AxResult<usize>;

    /// Tears down the mapping for the host IRQ number `hirq`.
    fn dispose_mapping(&self, hirq: usize) -> AxResult;

    /// Looks up the generic registry entry for `hirq`, if any.
    fn irq_get(&self, hirq: usize) -> Option<HostIrqInfo>;
}
