use std::fmt;
use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::trace;

use super::transport::Transport;

type Factory<T> = Box<dyn Fn() -> T + Send + Sync>;

/// Bounded cache of idle transport handles.
///
/// [`acquire`](HandlePool::acquire) never blocks: it reuses an idle handle or
/// builds a new one. Handles come back through the [`PooledHandle`] guard,
/// are aborted, and are kept only while the pool is below capacity.
///
/// The idle list is guarded by a mutex that is only held for the push or pop
/// itself, never across an `.await`.
pub struct HandlePool<T> {
    idle: Mutex<Vec<T>>,
    capacity: usize,
    factory: Factory<T>,
    created: AtomicUsize,
    acquired: AtomicUsize,
    returned: AtomicUsize,
    discarded: AtomicUsize,
}

/// Counters describing what a pool has done so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PoolStats {
    /// Handles built by the factory.
    pub created: usize,
    pub acquired: usize,
    /// Handles given back, whether kept or discarded.
    pub returned: usize,
    /// Handles dropped because the pool was full.
    pub discarded: usize,
    /// Handles currently waiting for reuse.
    pub idle: usize,
}

impl<T: Transport> HandlePool<T> {
    pub fn new(capacity: usize, factory: impl Fn() -> T + Send + Sync + 'static) -> Self {
        Self {
            idle: Mutex::new(Vec::with_capacity(capacity)),
            capacity,
            factory: Box::new(factory),
            created: AtomicUsize::new(0),
            acquired: AtomicUsize::new(0),
            returned: AtomicUsize::new(0),
            discarded: AtomicUsize::new(0),
        }
    }

    /// Take an idle handle, or build one if none is idle.
    pub fn acquire(self: &Arc<Self>) -> PooledHandle<T> {
        let reused = self.idle_list().pop();
        let handle = reused.unwrap_or_else(|| {
            self.created.fetch_add(1, Ordering::Relaxed);
            (self.factory)()
        });
        self.acquired.fetch_add(1, Ordering::Relaxed);
        PooledHandle {
            handle: Some(handle),
            pool: Arc::clone(self),
        }
    }

    fn release(&self, mut handle: T) {
        handle.abort();
        self.returned.fetch_add(1, Ordering::Relaxed);

        let mut idle = self.idle_list();
        if idle.len() < self.capacity {
            idle.push(handle);
        } else {
            drop(idle);
            self.discarded.fetch_add(1, Ordering::Relaxed);
            trace!(capacity = self.capacity, "pool full, dropping handle");
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn idle_len(&self) -> usize {
        self.idle_list().len()
    }

    pub fn stats(&self) -> PoolStats {
        PoolStats {
            created: self.created.load(Ordering::Relaxed),
            acquired: self.acquired.load(Ordering::Relaxed),
            returned: self.returned.load(Ordering::Relaxed),
            discarded: self.discarded.load(Ordering::Relaxed),
            idle: self.idle_len(),
        }
    }

    fn idle_list(&self) -> MutexGuard<'_, Vec<T>> {
        self.idle.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T> fmt::Debug for HandlePool<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlePool")
            .field("capacity", &self.capacity)
            .field("created", &self.created.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

/// Exclusive ownership of one handle, returned to its pool exactly once:
/// either through [`release`](PooledHandle::release) or on drop.
pub struct PooledHandle<T: Transport> {
    handle: Option<T>,
    pool: Arc<HandlePool<T>>,
}

impl<T: Transport> PooledHandle<T> {
    /// Give the handle back now instead of at the end of the scope.
    pub fn release(self) {
        drop(self);
    }
}

impl<T: Transport> Deref for PooledHandle<T> {
    type Target = T;

    fn deref(&self) -> &T {
        self.handle.as_ref().expect("handle is present until the guard drops")
    }
}

impl<T: Transport> DerefMut for PooledHandle<T> {
    fn deref_mut(&mut self) -> &mut T {
        self.handle.as_mut().expect("handle is present until the guard drops")
    }
}

impl<T: Transport> Drop for PooledHandle<T> {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            self.pool.release(handle);
        }
    }
}
