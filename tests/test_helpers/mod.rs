//! Scoped environment overrides for integration tests.

use std::env;
use std::sync::{Mutex, MutexGuard, PoisonError};

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Restores the touched variables when dropped.
///
/// Holds a process-wide lock so concurrently running tests never observe
/// each other's overrides.
pub struct ScopedEnv {
    saved: Vec<(&'static str, Option<String>)>,
    _lock: MutexGuard<'static, ()>,
}

impl ScopedEnv {
    /// Applies `overrides`; `None` unsets the variable.
    pub fn apply(overrides: &[(&'static str, Option<&str>)]) -> Self {
        let lock = ENV_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
        let saved = overrides
            .iter()
            .map(|(name, value)| {
                let previous = env::var(name).ok();
                write_var(name, *value);
                (*name, previous)
            })
            .collect();

        Self { saved, _lock: lock }
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        for (name, previous) in self.saved.drain(..).rev() {
            write_var(name, previous.as_deref());
        }
    }
}

fn write_var(name: &str, value: Option<&str>) {
    // SAFETY: ENV_LOCK serializes every environment mutation made by tests.
    unsafe {
        match value {
            Some(value) => env::set_var(name, value),
            None => env::remove_var(name),
        }
    }
}
