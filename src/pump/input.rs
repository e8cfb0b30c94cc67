use std::io;
use std::sync::Arc;
use std::time::Instant;

use log::{debug, trace, warn};

use crate::core::Core;
use crate::segment::{Header, HEADER_LEN};
use crate::state::CloseReason;
use crate::substrate::SubstrateReader;

fn is_timeout(err: &io::Error) -> bool {
    matches!(err.kind(), io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut)
}

/// Drains inbound segments, advances ack state, and delivers payload to
/// `input_buf` (§4.2). Runs on its own thread until the engine is closed.
pub(crate) fn run<R: SubstrateReader>(mut reader: R, core: Arc<Core>) {
    // Bounding the header read lets a thread that has no fresh data to
    // deliver still notice cancellation promptly, the way the teacher's
    // `nix::poll` loop re-checks its tick between reads instead of blocking
    // the segment loop forever.
    if let Err(err) = reader.set_read_deadline(Some(core.config.segment_data_timeout)) {
        debug!("input pump: failed to arm initial read deadline: {err}");
    }

    loop {
        if core.cancel.is_cancelled() {
            break;
        }

        let mut header_bytes = [0u8; HEADER_LEN];
        match reader.read_exact(&mut header_bytes) {
            Ok(()) => {}
            Err(err) if is_timeout(&err) => continue,
            Err(err) => {
                debug!("input pump: substrate read error on header: {err}");
                core.close(CloseReason::SubstrateIo);
                break;
            }
        }

        let header = match Header::decode(&header_bytes, core.config.max_segment_data()) {
            Ok(header) => header,
            Err(_) => {
                warn!("input pump: header length exceeds max_segment_data, protocol violation");
                core.close(CloseReason::ProtocolViolation);
                break;
            }
        };

        let mut data = vec![0u8; header.length as usize];
        let data_result = reader.read_exact(&mut data);

        match data_result {
            Ok(()) => {}
            Err(err) if is_timeout(&err) => {
                if core.config.debug {
                    trace!(
                        "input pump: segment data timed out after header (seq={}, len={}), dropping",
                        header.seq,
                        header.length
                    );
                }
                continue;
            }
            Err(err) => {
                debug!("input pump: substrate read error on segment data: {err}");
                core.close(CloseReason::SubstrateIo);
                break;
            }
        }

        let fin = header.fin() && data.is_empty();

        let delivered = {
            let mut guard = core.shared.lock().unwrap();

            if header.ack > guard.input_ack {
                guard.advance_ack(header.ack);
                guard.retransmissions = 0;
            }

            let delivered = guard.accept_input(header.seq, &data);
            guard.last_input_ack_time = Instant::now();

            if fin {
                guard.close(CloseReason::PeerFin);
            }

            delivered
        };

        if core.config.debug {
            trace!(
                "input pump: wake-up, seq={}, ack={}, len={}, fin={}, delivered={}",
                header.seq,
                header.ack,
                header.length,
                fin,
                delivered
            );
        }

        if delivered || fin {
            core.read_cvar.notify_all();
        }

        if fin {
            core.cancel.cancel();
            break;
        }
    }
}
