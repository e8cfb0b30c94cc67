use std::io::{self, Read, Write};
use std::net::{TcpStream, UdpSocket};
use std::time::Duration;

/// What the engine needs from its substrate beyond plain `Read`: the ability
/// to bound a single read by a deadline (§4.2 step 3 — abandon, don't close,
/// when a segment's data portion doesn't show up in time).
///
/// The substrate itself is expected to be an already-connected,
/// packet-oriented carrier from the engine's point of view — a DNS
/// query/response channel, a `TcpStream`, anything that delivers bytes in
/// order. This crate is agnostic to what is on the other end of it.
pub trait ReadDeadline: Read {
    fn set_read_deadline(&mut self, timeout: Option<Duration>) -> io::Result<()>;
}

impl ReadDeadline for TcpStream {
    fn set_read_deadline(&mut self, timeout: Option<Duration>) -> io::Result<()> {
        self.set_read_timeout(timeout)
    }
}

impl ReadDeadline for UdpSocket {
    fn set_read_deadline(&mut self, timeout: Option<Duration>) -> io::Result<()> {
        self.set_read_timeout(timeout)
    }
}

/// Marker bound gathering what the input pump needs from its half of the substrate.
pub trait SubstrateReader: ReadDeadline + Send + 'static {}
impl<T: ReadDeadline + Send + 'static> SubstrateReader for T {}

/// Marker bound gathering what the output pump needs from its half of the substrate.
pub trait SubstrateWriter: Write + Send + 'static {}
impl<T: Write + Send + 'static> SubstrateWriter for T {}
