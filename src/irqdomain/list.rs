use alloc::sync::Arc;
use alloc::vec::Vec;

use super::IrqDomain;
use crate::lock::{IrqSafeReadGuard, IrqSafeRwLock};

/// The ordered set of live IRQ domains, guarded by an interrupt-safe RW lock.
///
/// Domains are kept in insertion order. Readers never see a partially inserted
/// or partially removed domain: every structural change happens entirely under
/// the write side of the lock.
pub struct DomainList {
    domains: IrqSafeRwLock<Vec<Arc<IrqDomain>>>,
}

impl DomainList {
    /// Creates an empty list.
    pub const fn new() -> Self {
        Self {
            domains: IrqSafeRwLock::new(Vec::new()),
        }
    }

    /// Appends `domain` at the tail unless `reject` holds for a live domain.
    ///
    /// The check and the insertion happen under one write-side critical
    /// section. On rejection the conflicting domain is returned.
    pub fn push_tail_unless<F>(
        &self,
        domain: Arc<IrqDomain>,
        mut reject: F,
    ) -> Result<(), Arc<IrqDomain>>
    where
        F: FnMut(&IrqDomain) -> bool,
    {
        let mut domains = self.domains.write();
        if let Some(conflict) = domains.iter().find(|d| reject(d)) {
            return Err(conflict.clone());
        }
        domains.push(domain);
        Ok(())
    }

    /// Unlinks `domain`, returning whether it was a member.
    pub fn unlink(&self, domain: &Arc<IrqDomain>) -> bool {
        let mut domains = self.domains.write();
        match domains.iter().position(|d| Arc::ptr_eq(d, domain)) {
            Some(pos) => {
                domains.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Returns the first domain satisfying `pred`, scanning in insertion order.
    pub fn find<F>(&self, mut pred: F) -> Option<Arc<IrqDomain>>
    where
        F: FnMut(&IrqDomain) -> bool,
    {
        self.domains.read().iter().find(|d| pred(d)).cloned()
    }

    /// Holds the read side for the lifetime of the returned guard.
    pub fn read(&self) -> IrqSafeReadGuard<'_, Vec<Arc<IrqDomain>>> {
        self.domains.read()
    }

    /// The number of live domains.
    pub fn len(&self) -> usize {
        self.domains.read().len()
    }

    /// Whether no domain is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for DomainList {
    fn default() -> Self {
        Self::new()
    }
}
