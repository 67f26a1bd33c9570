//! Opt-in process-wide tree instances.
//!
//! A [`NameSpaceTree`] is an ordinary owned value; callers that can thread
//! one through their own state should just do that. This module exists for
//! call sites that can't — library boundaries mirroring the original C
//! assignment's single file-scope `root`, where the value must be reachable
//! from anywhere without being passed explicitly. `GlobalTree` lazily builds
//! one instance behind a `Mutex`, the same pattern the teacher crate uses for
//! its process-wide `NAME_POOL` (there interned behind a `LazyLock`, here
//! behind a `Mutex` since the tree mutates rather than only grows).
//!
//! Access is always through [`GlobalTree::with`], which serializes callers;
//! this is strictly more conservative than the original's unsynchronized
//! global, but costs nothing in the intended single-threaded use and removes
//! a whole class of caller error.

use std::sync::{Mutex, OnceLock};

use crate::tree::{Dt, Ft, NameSpaceTree};

/// A lazily-constructed, mutex-guarded process-wide tree instance.
pub struct GlobalTree<M: 'static> {
    inner: OnceLock<Mutex<NameSpaceTree<M>>>,
}

impl<M> GlobalTree<M> {
    pub const fn new() -> Self {
        Self {
            inner: OnceLock::new(),
        }
    }

    /// Runs `f` against the global instance, constructing it (uninitialized)
    /// on first use. Recovers from a poisoned lock rather than propagating
    /// the panic, since a poisoned tree is still structurally whatever it
    /// was at the panic point, and `init`/`destroy` remain available to
    /// reset it.
    pub fn with<R>(&self, f: impl FnOnce(&mut NameSpaceTree<M>) -> R) -> R {
        let mutex = self.inner.get_or_init(|| Mutex::new(NameSpaceTree::new()));
        let mut guard = match mutex.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        f(&mut guard)
    }
}

impl<M> Default for GlobalTree<M> {
    fn default() -> Self {
        Self::new()
    }
}

/// The process-wide DT instance, analogous to the original's global `root`
/// for the directory-only variant.
pub static DT_TREE: GlobalTree<Dt> = GlobalTree::new();

/// The process-wide FT instance.
pub static FT_TREE: GlobalTree<Ft> = GlobalTree::new();
