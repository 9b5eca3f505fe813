//! Process environment helpers shared by integration test binaries.

use std::env;
use std::ffi::{OsStr, OsString};
use std::sync::{Mutex, MutexGuard, OnceLock};

/// One variable update: `None` removes the variable.
pub type EnvChange = (OsString, Option<OsString>);

static ENV_MUTEX: OnceLock<Mutex<()>> = OnceLock::new();

/// Applies environment updates until dropped, then restores the previous
/// values. Holds a process-wide lock for its whole lifetime.
pub struct EnvVarGuard {
    restore: Vec<EnvChange>,
    _lock: MutexGuard<'static, ()>,
}

impl EnvVarGuard {
    /// Applies `changes` in order.
    pub fn set_many(changes: &[EnvChange]) -> Self {
        let lock = ENV_MUTEX
            .get_or_init(|| Mutex::new(()))
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let restore = changes
            .iter()
            .map(|(key, value)| {
                let before = env::var_os(key);
                write_var(key, value.as_deref());
                (key.clone(), before)
            })
            .collect();
        Self {
            restore,
            _lock: lock,
        }
    }
}

impl Drop for EnvVarGuard {
    fn drop(&mut self) {
        for (key, value) in self.restore.drain(..).rev() {
            write_var(&key, value.as_deref());
        }
    }
}

fn write_var(key: &OsStr, value: Option<&OsStr>) {
    // SAFETY: every mutation happens while `ENV_MUTEX` is held.
    unsafe {
        match value {
            Some(text) => env::set_var(key, text),
            None => env::remove_var(key),
        }
    }
}
