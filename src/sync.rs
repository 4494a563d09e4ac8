//! Mutual exclusion used by the accumulator, its pools and shared generators.
//!
//! With `std` this is `std::sync::Mutex`; a poisoned lock is recovered because
//! every guarded state stays valid between individual field updates. Without
//! `std` it falls back to a spin lock.

#[cfg(feature = "std")]
pub type LockGuard<'a, T> = std::sync::MutexGuard<'a, T>;

#[cfg(not(feature = "std"))]
pub type LockGuard<'a, T> = spin::MutexGuard<'a, T>;

/// A non-reentrant lock. Never acquire a lock while holding one that comes
/// later in the order: accumulator core, schedule, pool.
#[derive(Debug)]
pub struct Lock<T> {
    #[cfg(feature = "std")]
    inner: std::sync::Mutex<T>,
    #[cfg(not(feature = "std"))]
    inner: spin::Mutex<T>,
}

impl<T> Lock<T> {
    pub fn new(value: T) -> Self {
        Self {
            #[cfg(feature = "std")]
            inner: std::sync::Mutex::new(value),
            #[cfg(not(feature = "std"))]
            inner: spin::Mutex::new(value),
        }
    }

    pub fn lock(&self) -> LockGuard<'_, T> {
        #[cfg(feature = "std")]
        {
            self.inner.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
        }

        #[cfg(not(feature = "std"))]
        {
            self.inner.lock()
        }
    }

    pub fn into_inner(self) -> T {
        #[cfg(feature = "std")]
        {
            self.inner.into_inner().unwrap_or_else(std::sync::PoisonError::into_inner)
        }

        #[cfg(not(feature = "std"))]
        {
            self.inner.into_inner()
        }
    }
}
