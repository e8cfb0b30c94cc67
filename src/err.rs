use std::io;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("read timed out with no data")]
    Timeout,

    #[error("the connection is closed")]
    Closed,

    #[error("peer sent a malformed segment")]
    ProtocolViolation,

    #[error("retransmission budget exhausted, peer presumed gone")]
    PeerGone,

    #[error("substrate I/O error: {0}")]
    SubstrateIo(#[from] io::Error),
}
