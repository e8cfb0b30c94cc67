//! A reliable, ordered, bidirectional byte-stream transport over an opaque,
//! packet-oriented substrate (a DNS tunnel, a `TcpStream`, anything that
//! carries bytes). Implements a TCP-like engine from first principles:
//! segmented framing, sequence/ack numbers, a static congestion window,
//! timer-driven retransmission, duplex buffering and cooperative shutdown.
//!
//! The transport itself never dials or listens; it is handed two already
//! connected substrate halves by [`Tc::start`] and treats them as an opaque
//! packet-in/packet-out pair (see [`substrate`]).

mod cancel;
mod config;
mod core;
mod err;
mod pump;
mod segment;
mod state;
mod stream;
mod substrate;

pub use cancel::CancellationToken;
pub use config::Config;
pub use err::Error;
pub use segment::{Header, Segment, HEADER_LEN};
pub use stream::Tc;
pub use substrate::{ReadDeadline, SubstrateReader, SubstrateWriter};
