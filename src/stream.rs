use std::io::{self, Read, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::cancel::CancellationToken;
use crate::config::Config;
use crate::core::Core;
use crate::err::Error;
use crate::pump;
use crate::state::CloseReason;
use crate::substrate::{SubstrateReader, SubstrateWriter};

/// One symmetric end of the reliable, ordered, duplex transport (§2).
///
/// Created with [`Tc::new`], wired to a substrate with [`Tc::start`], then
/// used via [`Tc::read`]/[`Tc::write`]/[`Tc::close`] — or the [`Read`]/
/// [`Write`] impls, for composing with generic I/O code.
pub struct Tc {
    core: Arc<Core>,
    started: AtomicBool,
    handles: std::sync::Mutex<Option<(JoinHandle<()>, JoinHandle<()>)>>,
}

impl Tc {
    pub fn new(config: Config) -> Self {
        Tc {
            core: Arc::new(Core::new(config)),
            started: AtomicBool::new(false),
            handles: std::sync::Mutex::new(None),
        }
    }

    /// Spawns the input and output pump threads against the given substrate
    /// halves. `parent` lets an embedder tie this engine's lifetime to a
    /// wider shutdown token; cancelling it has the same effect as calling
    /// [`Tc::close`]. Returns `Error::Closed` if called more than once.
    pub fn start<R, W>(&self, reader: R, writer: W, parent: Option<CancellationToken>) -> Result<(), Error>
    where
        R: SubstrateReader,
        W: SubstrateWriter,
    {
        if self.started.swap(true, Ordering::AcqRel) {
            return Err(Error::Closed);
        }

        if let Some(parent) = parent {
            let core = Arc::clone(&self.core);
            thread::spawn(move || {
                // A parent cancellation is a one-way trigger into this
                // engine's own token; we don't propagate the other way.
                loop {
                    if parent.is_cancelled() {
                        core.close(CloseReason::Requested);
                        break;
                    }
                    if core.cancel.is_cancelled() {
                        break;
                    }
                    parent.sleep(std::time::Duration::from_millis(50));
                }
            });
        }

        let input_core = Arc::clone(&self.core);
        let input_handle = thread::spawn(move || pump::run_input(reader, input_core));

        let output_core = Arc::clone(&self.core);
        let output_handle = thread::spawn(move || pump::run_output(writer, output_core));

        *self.handles.lock().unwrap() = Some((input_handle, output_handle));
        Ok(())
    }

    /// Appends to the output buffer; never partial, never blocks (§4.4).
    pub fn write(&self, buf: &[u8]) -> Result<usize, Error> {
        let mut guard = self.core.shared.lock().unwrap();
        if !guard.is_open() {
            return Err(self.terminal_error(&guard));
        }
        guard.enqueue_write(buf);
        Ok(buf.len())
    }

    /// Drains up to `buf.len()` bytes, waiting up to `read_timeout` for data
    /// to arrive if `input_buf` is currently empty (§4.4).
    pub fn read(&self, buf: &mut [u8]) -> Result<usize, Error> {
        let mut guard = self.core.shared.lock().unwrap();

        if !guard.input_available() && guard.is_open() {
            let (g, result) = self
                .core
                .read_cvar
                .wait_timeout_while(guard, self.core.config.read_timeout, |shared| {
                    !shared.input_available() && shared.is_open()
                })
                .unwrap();
            guard = g;

            if result.timed_out() && !guard.input_available() && guard.is_open() {
                return Err(Error::Timeout);
            }
        }

        if guard.input_available() {
            return Ok(guard.read_input(buf));
        }

        Err(self.terminal_error(&guard))
    }

    /// Idempotent: cancels the engine and, best-effort, asks the output pump
    /// to send a final `FIN` before it exits (§4.4, §4.5).
    pub fn close(&self) {
        self.core.close(CloseReason::Requested);
    }

    pub fn is_closed(&self) -> bool {
        !self.core.shared.lock().unwrap().is_open()
    }

    fn terminal_error(&self, guard: &crate::state::Shared) -> Error {
        match guard.close_reason {
            Some(CloseReason::PeerGone) => Error::PeerGone,
            Some(CloseReason::ProtocolViolation) => Error::ProtocolViolation,
            Some(CloseReason::SubstrateIo) => Error::SubstrateIo(io::Error::new(
                io::ErrorKind::ConnectionAborted,
                "substrate connection aborted",
            )),
            Some(CloseReason::Requested) | Some(CloseReason::PeerFin) | None => Error::Closed,
        }
    }
}

impl Drop for Tc {
    fn drop(&mut self) {
        self.close();
    }
}

impl Read for Tc {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        Tc::read(self, buf).map_err(|err| match err {
            Error::Timeout => io::Error::new(io::ErrorKind::TimedOut, err),
            Error::Closed | Error::PeerGone => io::Error::new(io::ErrorKind::NotConnected, err),
            Error::ProtocolViolation => io::Error::new(io::ErrorKind::InvalidData, err),
            Error::SubstrateIo(inner) => inner,
        })
    }
}

impl Write for Tc {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Tc::write(self, buf).map_err(|err| match err {
            Error::Timeout => io::Error::new(io::ErrorKind::TimedOut, err),
            Error::Closed | Error::PeerGone => io::Error::new(io::ErrorKind::NotConnected, err),
            Error::ProtocolViolation => io::Error::new(io::ErrorKind::InvalidData, err),
            Error::SubstrateIo(inner) => inner,
        })
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
