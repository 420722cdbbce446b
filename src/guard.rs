//! Debug-only guard against reentrant table access.
//!
//! The table calls user code (`K: Eq`, `K: Hash`) while probing a chain.
//! If that user code calls back into the same table, the probe observes a
//! structure it is in the middle of reading. In debug builds the guard
//! turns such reentrancy into a panic at the outermost entry point; in
//! release builds it compiles away entirely.

use core::cell::Cell;
use core::marker::PhantomData;

/// Per-table access flag. Guarded entry points do
/// `let _g = self.access.enter();` and hold the token for their duration.
#[derive(Debug, Default)]
pub(crate) struct DebugAccess {
    #[cfg(debug_assertions)]
    busy: Cell<bool>,
    // The Cell makes this !Sync, matching the single-threaded contract.
    _single_threaded: PhantomData<Cell<()>>,
}

impl DebugAccess {
    pub(crate) const fn new() -> Self {
        Self {
            #[cfg(debug_assertions)]
            busy: Cell::new(false),
            _single_threaded: PhantomData,
        }
    }

    /// Mark the table busy until the returned token drops. Panics in debug
    /// builds if the table is already busy.
    #[inline]
    pub(crate) fn enter(&self) -> AccessToken<'_> {
        #[cfg(debug_assertions)]
        {
            assert!(
                !self.busy.replace(true),
                "reentrant access to a chain-set during a probe"
            );
            return AccessToken { owner: self };
        }

        #[cfg(not(debug_assertions))]
        {
            return AccessToken { _ghost: PhantomData };
        }
    }
}

/// RAII token returned by [`DebugAccess::enter`].
pub(crate) struct AccessToken<'a> {
    #[cfg(debug_assertions)]
    owner: &'a DebugAccess,
    #[cfg(not(debug_assertions))]
    _ghost: PhantomData<&'a ()>,
}

impl Drop for AccessToken<'_> {
    fn drop(&mut self) {
        #[cfg(debug_assertions)]
        self.owner.busy.set(false);
    }
}
