use crate::err::Error;

/// `seq`(4) + `ack`(4) + `flags`(1) + `length`(2), big-endian.
pub const HEADER_LEN: usize = 11;

const FLAG_FIN: u8 = 0b0000_0001;

/// A decoded segment header, before its payload has been read off the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub seq: u32,
    pub ack: u32,
    pub flags: u8,
    pub length: u16,
}

impl Header {
    pub fn fin(&self) -> bool {
        self.flags & FLAG_FIN != 0
    }

    /// Parses a fixed-size header, rejecting a `length` beyond `max_segment_data`.
    ///
    /// Splitting header decode from the data read lets the input pump read
    /// exactly `HEADER_LEN` bytes first, then read exactly `length` more under
    /// its own deadline, instead of buffering a whole maximal-size segment.
    pub fn decode(bytes: &[u8; HEADER_LEN], max_segment_data: u16) -> Result<Self, Error> {
        let seq = u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        let ack = u32::from_be_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);
        let flags = bytes[8];
        let length = u16::from_be_bytes([bytes[9], bytes[10]]);

        if length > max_segment_data {
            return Err(Error::ProtocolViolation);
        }

        Ok(Header {
            seq,
            ack,
            flags,
            length,
        })
    }

    fn encode(&self) -> [u8; HEADER_LEN] {
        let mut out = [0u8; HEADER_LEN];
        out[0..4].copy_from_slice(&self.seq.to_be_bytes());
        out[4..8].copy_from_slice(&self.ack.to_be_bytes());
        out[8] = self.flags;
        out[9..11].copy_from_slice(&self.length.to_be_bytes());
        out
    }
}

/// A full segment: header plus however many payload bytes `length` names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub seq: u32,
    pub ack: u32,
    pub fin: bool,
    pub data: Vec<u8>,
}

impl Segment {
    pub fn data(seq: u32, ack: u32, data: Vec<u8>) -> Self {
        Segment {
            seq,
            ack,
            fin: false,
            data,
        }
    }

    pub fn fin(seq: u32, ack: u32) -> Self {
        Segment {
            seq,
            ack,
            fin: true,
            data: Vec::new(),
        }
    }

    fn header(&self) -> Header {
        Header {
            seq: self.seq,
            ack: self.ack,
            flags: if self.fin { FLAG_FIN } else { 0 },
            // `data.len()` is always constructed to fit `max_segment_data`,
            // which itself is a u16 (§6.6); see the output pump for the split.
            length: self.data.len() as u16,
        }
    }

    pub fn encode(&self) -> Vec<u8> {
        let header = self.header();
        let mut out = Vec::with_capacity(HEADER_LEN + self.data.len());
        out.extend_from_slice(&header.encode());
        out.extend_from_slice(&self.data);
        out
    }

    pub fn from_parts(header: Header, data: Vec<u8>) -> Self {
        Segment {
            seq: header.seq,
            ack: header.ack,
            fin: header.fin(),
            data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_a_data_segment() {
        let seg = Segment::data(42, 7, vec![1, 2, 3, 4]);
        let bytes = seg.encode();

        let mut header_bytes = [0u8; HEADER_LEN];
        header_bytes.copy_from_slice(&bytes[..HEADER_LEN]);
        let header = Header::decode(&header_bytes, u16::MAX).unwrap();
        let decoded = Segment::from_parts(header, bytes[HEADER_LEN..].to_vec());

        assert_eq!(decoded, seg);
    }

    #[test]
    fn round_trips_a_fin_segment() {
        let seg = Segment::fin(100, 50);
        let bytes = seg.encode();
        assert_eq!(bytes.len(), HEADER_LEN);

        let mut header_bytes = [0u8; HEADER_LEN];
        header_bytes.copy_from_slice(&bytes[..HEADER_LEN]);
        let header = Header::decode(&header_bytes, u16::MAX).unwrap();
        assert!(header.fin());
        assert_eq!(header.length, 0);

        let decoded = Segment::from_parts(header, Vec::new());
        assert_eq!(decoded, seg);
    }

    #[test]
    fn rejects_oversized_length() {
        let seg = Segment::data(0, 0, vec![0u8; 20]);
        let bytes = seg.encode();
        let mut header_bytes = [0u8; HEADER_LEN];
        header_bytes.copy_from_slice(&bytes[..HEADER_LEN]);

        let err = Header::decode(&header_bytes, 10).unwrap_err();
        assert!(matches!(err, Error::ProtocolViolation));
    }

    #[test]
    fn header_is_big_endian() {
        let seg = Segment::data(0x0102_0304, 0x0506_0708, vec![0xAB]);
        let bytes = seg.encode();
        assert_eq!(&bytes[0..4], &[0x01, 0x02, 0x03, 0x04]);
        assert_eq!(&bytes[4..8], &[0x05, 0x06, 0x07, 0x08]);
        assert_eq!(bytes[8], 0);
        assert_eq!(&bytes[9..11], &[0x00, 0x01]);
        assert_eq!(bytes[11], 0xAB);
    }
}
