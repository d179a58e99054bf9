//! Reader/writer spin lock that masks local interrupts while held.

use core::ops::{Deref, DerefMut};

use kernel_guard::IrqSave;
use spin::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// A reader/writer spin lock usable from interrupt-handling context.
///
/// Both the read and the write side disable local interrupt delivery *before*
/// spinning on the lock and restore the previous interrupt state only *after*
/// the lock has been released. An interrupt handler running on the same core
/// therefore can never observe this lock held by the code it interrupted, so it
/// may take the lock itself without deadlocking.
///
/// Critical sections must stay short and must not block: other cores spin with
/// their interrupts masked while waiting.
pub struct IrqSafeRwLock<T> {
    inner: RwLock<T>,
}

/// Shared access to the data guarded by an [`IrqSafeRwLock`].
pub struct IrqSafeReadGuard<'a, T> {
    // Field order matters: the lock must be released before interrupts are
    // restored.
    guard: RwLockReadGuard<'a, T>,
    _irq: IrqSave,
}

/// Exclusive access to the data guarded by an [`IrqSafeRwLock`].
pub struct IrqSafeWriteGuard<'a, T> {
    guard: RwLockWriteGuard<'a, T>,
    _irq: IrqSave,
}

impl<T> IrqSafeRwLock<T> {
    /// Creates a new unlocked lock wrapping `data`.
    pub const fn new(data: T) -> Self {
        Self {
            inner: RwLock::new(data),
        }
    }

    /// Acquires shared access, masking local interrupts until the guard drops.
    pub fn read(&self) -> IrqSafeReadGuard<'_, T> {
        let irq = IrqSave::new();
        IrqSafeReadGuard {
            guard: self.inner.read(),
            _irq: irq,
        }
    }

    /// Acquires exclusive access, masking local interrupts until the guard
    /// drops.
    pub fn write(&self) -> IrqSafeWriteGuard<'_, T> {
        let irq = IrqSave::new();
        IrqSafeWriteGuard {
            guard: self.inner.write(),
            _irq: irq,
        }
    }

    /// Consumes the lock and returns the inner data.
    pub fn into_inner(self) -> T {
        self.inner.into_inner()
    }
}

impl<T: Default> Default for IrqSafeRwLock<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T> Deref for IrqSafeReadGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.guard
    }
}

impl<T> Deref for IrqSafeWriteGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.guard
    }
}

impl<T> DerefMut for IrqSafeWriteGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.guard
    }
}

#[cfg(test)]
mod tests {
    use super::IrqSafeRwLock;

    #[test]
    fn test_readers_share_lock() {
        let lock = IrqSafeRwLock::new(7usize);
        let a = lock.read();
        let b = lock.read();
        assert_eq!(*a + *b, 14);
    }

    #[test]
    fn test_writer_after_readers_release() {
        let lock = IrqSafeRwLock::new(alloc::vec::Vec::new());
        {
            let r = lock.read();
            assert!(r.is_empty());
        }
        lock.write().push(1u32);
        assert_eq!(lock.read().as_slice(), &[1]);
        assert_eq!(lock.into_inner(), alloc::vec![1]);
    }
}
