use std::sync::{Condvar, Mutex};

use crate::cancel::CancellationToken;
use crate::config::Config;
use crate::state::{CloseReason, Shared};

/// The single guarded record plus its signalling primitives, shared between
/// the two pump threads and every `Tc` handle cloned from the same engine.
///
/// This is the generalisation of the teacher's `Arc<Mutex<Manager>>` plus its
/// per-stream `Condvar`s down to a single peer-to-peer connection: one
/// `Shared` record, one reader condvar, one cancellation token.
pub(crate) struct Core {
    pub(crate) shared: Mutex<Shared>,
    pub(crate) read_cvar: Condvar,
    pub(crate) cancel: CancellationToken,
    pub(crate) config: Config,
}

impl Core {
    pub(crate) fn new(config: Config) -> Self {
        Core {
            shared: Mutex::new(Shared::new()),
            read_cvar: Condvar::new(),
            cancel: CancellationToken::new(),
            config,
        }
    }

    /// Idempotent terminal-state transition used by both pumps and by the
    /// public `close()` call (§4.4, §4.5). Cancels the shared token so the
    /// other pump and any blocked reader notice on their next wake-up,
    /// without either of them ever having to poll `Shared` under a lock held
    /// across blocking substrate I/O.
    pub(crate) fn close(&self, reason: CloseReason) {
        {
            let mut guard = self.shared.lock().unwrap();
            guard.close(reason);
        }
        self.cancel.cancel();
        self.read_cvar.notify_all();
    }
}
