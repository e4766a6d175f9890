//! One-time device initialization shared by registries.
//!
//! Every registry built against the same output device should open it only
//! once. The guard is an explicit object handed to each registry rather than
//! a global, so tests can [`reset`](BackendInitGuard::reset) it.

use parking_lot::Mutex;
use tracing::debug;

/// Records whether device initialization has been attempted.
#[derive(Debug, Default)]
pub struct BackendInitGuard {
    claimed: Mutex<bool>,
}

impl BackendInitGuard {
    /// Unclaimed guard.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether an initialization has been attempted.
    #[must_use]
    pub fn is_claimed(&self) -> bool {
        *self.claimed.lock()
    }

    /// Forget any previous attempt.
    pub fn reset(&self) {
        *self.claimed.lock() = false;
    }

    /// Run `init` if it is due.
    ///
    /// It is due when `force` is set, or when the device is not ready and no
    /// attempt has been made yet. The guard is claimed before `init` runs, so
    /// a failed attempt is not retried, and the lock is held throughout so
    /// concurrent callers cannot both initialize.
    pub fn initialize_with<R, I>(&self, force: bool, is_ready: R, init: I) -> bool
    where
        R: FnOnce() -> bool,
        I: FnOnce(),
    {
        let mut claimed = self.claimed.lock();
        if !force && (*claimed || is_ready()) {
            debug!("Audio backend already initialized, skipping");
            return false;
        }
        *claimed = true;
        init();
        true
    }
}
