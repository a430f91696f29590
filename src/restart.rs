//! Restart Controller
//!
//! The agent cannot hot-reload its tool registry; a committed tool set
//! only takes effect on the next process start. The controller flushes
//! history and exits cleanly. An external supervisor (systemd unit,
//! shell wrapper, container runtime) is expected to relaunch the binary;
//! the replay on startup then answers the turn that triggered the
//! restart.

use tracing::{error, info};

use crate::store::HistoryStore;

/// Flush history and terminate the process with a zero exit code.
///
/// A flush failure is logged but does not block the exit: the worst
/// case is the loss of the triggering user turn, while refusing to
/// restart would leave the committed tools unusable.
pub fn flush_and_exit(history: &HistoryStore) -> ! {
    if let Err(err) = history.save() {
        error!(%err, "failed to flush history before restart");
    }
    info!("restarting to load committed tools");
    std::process::exit(0);
}
