/*!
 * Global Tracker
 * Process-wide tracker with an exit-time purge hook
 */

use super::MemoryTracker;
use log::info;
use std::sync::{Once, OnceLock};

static GLOBAL: OnceLock<MemoryTracker> = OnceLock::new();
static EXIT_HOOK: Once = Once::new();

/// Process-wide shared tracker.
///
/// Constructed lazily on first access. The first successful registration
/// installs an exit-time hook that purges every instance, so blocks issued
/// through the global tracker are reclaimed even if the caller never purges.
pub fn global() -> &'static MemoryTracker {
    GLOBAL.get_or_init(|| {
        info!("Global memory tracker initialized");
        MemoryTracker::new().with_first_register_hook(install_exit_hook)
    })
}

fn install_exit_hook() {
    EXIT_HOOK.call_once(|| {
        // SAFETY: purge_at_exit is a plain extern "C" fn that only touches
        // Sync statics
        unsafe {
            libc::atexit(purge_at_exit);
        }
        info!("Exit-time purge hook installed");
    });
}

extern "C" fn purge_at_exit() {
    if let Some(tracker) = GLOBAL.get() {
        let freed = tracker.release_all();
        info!("Exit-time purge reclaimed {} bytes", freed);
    }
}
