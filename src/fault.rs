//! Deterministic allocation-failure injection.
//!
//! The original C implementation this core reimplements can fail any
//! `malloc` call, and the atomicity property (§8.1 invariant 6, §8.4
//! scenario S4) depends on that failure being recoverable mid-insert. Rust
//! has no portable way to make `Vec`/`Box` allocation fail and return
//! `Result` instead of aborting, so this module stands in for it: every
//! point [`node::Node::create`](crate::node::Node::create) would `malloc`
//! in the original calls [`check`] first. In ordinary use `check` always
//! succeeds; tests arm a countdown with [`arm`] to make the Nth call fail,
//! reproducing the original's fault-injection test harness deterministically.
//!
//! Only ever compiled for our own tests (`cfg(test)`) or the
//! `fault-injection` feature (enabled for our dev-dependencies via the
//! self-dependency trick in `Cargo.toml`, so `tests/scenarios.rs` — an
//! external crate that can't see `#[cfg(test)]` items — still gets it).
//! A downstream consumer building this crate normally never sees this
//! module at all, so nothing outside our own test builds can arm it.

use std::cell::Cell;

thread_local! {
    static REMAINING: Cell<Option<usize>> = const { Cell::new(None) };
}

/// Arms the injector so the `calls_until_failure`-th subsequent call to
/// [`check`] fails with [`NamespaceTreeError::MemoryError`](crate::error::NamespaceTreeError::MemoryError)
/// (0 means the very next call fails). Calls before that return `Ok(())`
/// and count down.
pub fn arm(calls_until_failure: usize) {
    REMAINING.with(|r| r.set(Some(calls_until_failure)));
}

/// Disarms the injector; subsequent calls to [`check`] always succeed.
pub fn disarm() {
    REMAINING.with(|r| r.set(None));
}

/// Called at each simulated allocation point. Always `Ok(())` unless armed.
pub fn check() -> crate::error::Result<()> {
    REMAINING.with(|r| match r.get() {
        None => Ok(()),
        Some(0) => Err(crate::error::NamespaceTreeError::MemoryError),
        Some(n) => {
            r.set(Some(n - 1));
            Ok(())
        }
    })
}
