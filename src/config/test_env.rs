//! Serialized access to the process environment for tests.
//!
//! Every test that sets variables, or reads them through `${NAME}`
//! references, holds the same lock.

use std::sync::{Mutex, MutexGuard, PoisonError};

static ENV_LOCK: Mutex<()> = Mutex::new(());

pub(crate) fn lock() -> MutexGuard<'static, ()> {
    ENV_LOCK.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Run `f` with `vars` set, removing them afterwards.
pub(crate) fn with_vars<R>(vars: &[(&str, &str)], f: impl FnOnce() -> R) -> R {
    let _guard = lock();
    for (name, value) in vars {
        std::env::set_var(name, value);
    }
    let out = f();
    for (name, _) in vars {
        std::env::remove_var(name);
    }
    out
}
