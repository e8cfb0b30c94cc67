use std::cmp;
use std::collections::VecDeque;
use std::time::Instant;

/// Terminal states of a [`crate::Tc`] (§4.5). `Open -> Closed` is one-way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Open,
    Closed,
}

/// Why the engine transitioned to `Closed` (§4.5, §4.6) — kept separate from
/// [`crate::Error`] since the latter wraps a non-`Clone` `io::Error` and this
/// needs to be read back out of `Shared` by every subsequent caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    Requested,
    SubstrateIo,
    ProtocolViolation,
    PeerGone,
    PeerFin,
}

/// The single mutex-guarded record the two pumps and the caller's
/// `read`/`write`/`close` all contend for (§5). Everything here is plain
/// bookkeeping; no blocking I/O is ever attempted while holding it.
pub struct Shared {
    /// Bytes written but not yet acknowledged by the peer, indexed starting
    /// at `input_ack` (the oldest byte still here is offset `input_ack`).
    pub output_buf: VecDeque<u8>,
    /// Offset of the next byte to transmit for the first time.
    pub output_seq: u32,
    /// The peer's latest cumulative ack.
    pub input_ack: u32,
    /// Our own cumulative ack: the next inbound byte offset we expect.
    pub input_seq: u32,
    /// Contiguous payload received but not yet drained by the caller.
    pub input_buf: VecDeque<u8>,
    /// Instant of the most recent segment received from the peer.
    pub last_input_ack_time: Instant,
    /// Consecutive retransmissions attempted without a fresh ack.
    pub retransmissions: u32,
    pub state: State,
    pub close_reason: Option<CloseReason>,
}

impl Shared {
    pub fn new() -> Self {
        Shared {
            output_buf: VecDeque::new(),
            output_seq: 0,
            input_ack: 0,
            input_seq: 0,
            input_buf: VecDeque::new(),
            last_input_ack_time: Instant::now(),
            retransmissions: 0,
            state: State::Open,
            close_reason: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.state == State::Open
    }

    /// Idempotent: once closed, the reason the first caller gave wins (§4.4,
    /// `close()` called N times has the same effect as once).
    pub fn close(&mut self, reason: CloseReason) {
        if self.state == State::Open {
            self.state = State::Closed;
            self.close_reason = Some(reason);
        }
    }

    /// Appends to `output_buf` (I-1..I-3 are preserved: this only ever grows
    /// the unsent tail, never touches `output_seq`/`input_ack`).
    pub fn enqueue_write(&mut self, buf: &[u8]) {
        self.output_buf.extend(buf.iter().copied());
    }

    /// How many written bytes have never been put on the wire.
    pub fn unsent_len(&self) -> u32 {
        let written = self.input_ack.wrapping_add(self.output_buf.len() as u32);
        written.wrapping_sub(self.output_seq)
    }

    /// Bytes `output_seq..` from `output_buf`, truncated to `cap`.
    pub fn unsent(&mut self, cap: usize) -> Vec<u8> {
        let sent = self.output_seq.wrapping_sub(self.input_ack) as usize;
        let take = cmp::min(self.unsent_len() as usize, cap);
        self.output_buf
            .make_contiguous()
            .iter()
            .skip(sent)
            .take(take)
            .copied()
            .collect()
    }

    /// Bytes `input_ack..output_seq` from `output_buf` — the unacked suffix
    /// resent wholesale on a retransmission tick (§4.3 step 1).
    pub fn unacked(&mut self) -> Vec<u8> {
        let len = self.output_seq.wrapping_sub(self.input_ack) as usize;
        self.output_buf
            .make_contiguous()
            .iter()
            .take(len)
            .copied()
            .collect()
    }

    pub fn unacked_outstanding(&self) -> u32 {
        self.output_seq.wrapping_sub(self.input_ack)
    }

    pub fn advance_output_seq(&mut self, n: u32) {
        self.output_seq = self.output_seq.wrapping_add(n);
    }

    /// Releases everything below the peer's new cumulative ack (I-2): once
    /// released, those bytes can never be retransmitted again.
    pub fn advance_ack(&mut self, new_ack: u32) {
        let delta = new_ack.wrapping_sub(self.input_ack) as usize;
        let drain = cmp::min(delta, self.output_buf.len());
        self.output_buf.drain(..drain);
        self.input_ack = new_ack;
    }

    /// Accepts an inbound segment's payload if it is exactly the next
    /// contiguous byte; drops duplicates and gaps silently (§4.2 step 6).
    pub fn accept_input(&mut self, seq: u32, data: &[u8]) -> bool {
        if seq == self.input_seq {
            self.input_buf.extend(data.iter().copied());
            self.input_seq = self.input_seq.wrapping_add(data.len() as u32);
            true
        } else {
            false
        }
    }

    pub fn read_input(&mut self, buf: &mut [u8]) -> usize {
        let len = cmp::min(buf.len(), self.input_buf.len());
        for slot in buf[..len].iter_mut() {
            *slot = self.input_buf.pop_front().unwrap();
        }
        len
    }

    pub fn input_available(&self) -> bool {
        !self.input_buf.is_empty()
    }
}

impl Default for Shared {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_then_take_unsent_respects_cap() {
        let mut s = Shared::new();
        s.enqueue_write(b"hello world");
        let chunk = s.unsent(5);
        assert_eq!(chunk, b"hello");
        s.advance_output_seq(chunk.len() as u32);
        let rest = s.unsent(100);
        assert_eq!(rest, b" world");
    }

    #[test]
    fn ack_release_drops_only_acked_prefix() {
        let mut s = Shared::new();
        s.enqueue_write(b"abcdef");
        s.advance_output_seq(6);
        s.advance_ack(3);
        assert_eq!(s.output_buf.len(), 3);
        assert_eq!(s.unacked_outstanding(), 3);
    }

    #[test]
    fn accept_input_rejects_gap_and_duplicate() {
        let mut s = Shared::new();
        assert!(s.accept_input(0, b"abc"));
        assert_eq!(s.input_seq, 3);
        // duplicate
        assert!(!s.accept_input(0, b"abc"));
        // gap
        assert!(!s.accept_input(10, b"xyz"));
        assert_eq!(s.input_seq, 3);
    }

    #[test]
    fn read_input_drains_in_order() {
        let mut s = Shared::new();
        s.accept_input(0, b"abcdef");
        let mut buf = [0u8; 4];
        let n = s.read_input(&mut buf);
        assert_eq!(n, 4);
        assert_eq!(&buf[..n], b"abcd");
        let n = s.read_input(&mut buf);
        assert_eq!(&buf[..n], b"ef");
    }
}
