use std::sync::Arc;
use std::time::Instant;

use log::{debug, trace};

use crate::core::Core;
use crate::segment::Segment;
use crate::state::CloseReason;
use crate::substrate::SubstrateWriter;

/// Writes one segment's worth of bytes to the substrate, splitting `data`
/// into chunks of at most `max_segment_data` (§4.3 step 4).
fn write_chunks<W: SubstrateWriter>(
    writer: &mut W,
    mut seq: u32,
    ack: u32,
    data: &[u8],
    max_segment_data: u16,
) -> std::io::Result<()> {
    if data.is_empty() {
        return Ok(());
    }

    for chunk in data.chunks(max_segment_data as usize) {
        let segment = Segment::data(seq, ack, chunk.to_vec());
        writer.write_all(&segment.encode())?;
        seq = seq.wrapping_add(chunk.len() as u32);
    }
    Ok(())
}

/// Partitions outbound bytes into segments, honours the congestion window,
/// and retransmits on a timer (§4.3). Runs on its own thread until the
/// engine is closed.
pub(crate) fn run<W: SubstrateWriter>(mut writer: W, core: Arc<Core>) {
    let cfg = core.config;

    loop {
        let snapshot = {
            let guard = core.shared.lock().unwrap();
            if !guard.is_open() {
                let reason = guard.close_reason;
                Some((reason, guard.output_seq, guard.input_seq))
            } else {
                None
            }
        };

        if let Some((reason, seq, ack)) = snapshot {
            if reason == Some(CloseReason::Requested) {
                if cfg.debug {
                    trace!("output pump: sending best-effort fin before shutdown");
                }
                let fin = Segment::fin(seq, ack);
                if let Err(err) = writer.write_all(&fin.encode()) {
                    debug!("output pump: best-effort fin write failed: {err}");
                }
            }
            break;
        }

        let now = Instant::now();
        let mut guard = core.shared.lock().unwrap();
        let elapsed = now.duration_since(guard.last_input_ack_time);
        let outstanding = guard.unacked_outstanding();

        if elapsed > cfg.retransmission_interval && outstanding > 0 {
            guard.retransmissions += 1;
            if guard.retransmissions >= cfg.max_retransmissions {
                drop(guard);
                debug!("output pump: retransmission budget exhausted, closing");
                core.close(CloseReason::PeerGone);
                continue;
            }

            let data = guard.unacked();
            let seq = guard.input_ack;
            let ack = guard.input_seq;
            drop(guard);

            if cfg.debug {
                trace!("output pump: retransmitting {} unacked bytes from seq={}", data.len(), seq);
            }

            if let Err(err) = write_chunks(&mut writer, seq, ack, &data, cfg.max_segment_data()) {
                debug!("output pump: substrate write error during retransmit: {err}");
                core.close(CloseReason::SubstrateIo);
                continue;
            }

            core.cancel.sleep(cfg.congestion_wait);
            continue;
        }

        if outstanding >= cfg.congestion_window {
            drop(guard);
            core.cancel.sleep(cfg.congestion_wait);
            continue;
        }

        let cap = (cfg.congestion_window - outstanding) as usize;
        let pending = guard.unsent(cap);
        if pending.is_empty() {
            drop(guard);
            core.cancel.sleep(cfg.starvation_retry);
            continue;
        }

        let seq = guard.output_seq;
        let ack = guard.input_seq;
        drop(guard);

        if let Err(err) = write_chunks(&mut writer, seq, ack, &pending, cfg.max_segment_data()) {
            debug!("output pump: substrate write error: {err}");
            core.close(CloseReason::SubstrateIo);
            continue;
        }

        let mut guard = core.shared.lock().unwrap();
        guard.advance_output_seq(pending.len() as u32);
        guard.retransmissions = 0;
    }
}
