use bytes::{BufMut, Bytes, BytesMut};

use super::{EtherFrame, ETHER_HEADER_LEN};
use crate::error::{check_len, Result};

/// Length of the physical-layer preamble, start-of-frame delimiter included.
pub const PREAMBLE_LEN: usize = 8;
/// Length of the trailing frame-check sequence.
pub const FCS_LEN: usize = 4;
/// Preamble written by [`EtherPacket::new`].
pub const DEFAULT_PREAMBLE: [u8; PREAMBLE_LEN] = [0, 0, 0, 0, 0, 0, 1, 0];

/// A frame together with its physical-layer envelope.
///
/// Preamble and FCS are carried as given. Nothing here computes or checks
/// them against the frame content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EtherPacket {
    /// Preamble and start-of-frame delimiter.
    pub preamble: [u8; PREAMBLE_LEN],
    /// The enclosed frame.
    pub frame: EtherFrame,
    /// Frame-check sequence.
    pub fcs: [u8; FCS_LEN],
}

impl EtherPacket {
    /// Wrap `frame` with the default preamble and a zeroed FCS.
    pub fn new(frame: EtherFrame) -> Self {
        Self {
            preamble: DEFAULT_PREAMBLE,
            frame,
            fcs: [0; FCS_LEN],
        }
    }

    /// Split `buf` into preamble, frame and FCS.
    ///
    /// The FCS is taken from the last four bytes, everything between the
    /// preamble and the FCS is decoded as a frame.
    pub fn decode(buf: &[u8]) -> Result<Self> {
        check_len(buf, PREAMBLE_LEN + ETHER_HEADER_LEN + FCS_LEN)?;

        let fcs_start = buf.len() - FCS_LEN;
        let frame = EtherFrame::decode(&buf[PREAMBLE_LEN..fcs_start])?;

        let mut preamble = [0; PREAMBLE_LEN];
        preamble.copy_from_slice(&buf[..PREAMBLE_LEN]);
        let mut fcs = [0; FCS_LEN];
        fcs.copy_from_slice(&buf[fcs_start..]);

        Ok(Self {
            preamble,
            frame,
            fcs,
        })
    }

    /// Serialize preamble, frame and FCS in transmission order.
    pub fn encode(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(self.len());
        buf.put_slice(&self.preamble);
        self.frame.encode_into(&mut buf);
        buf.put_slice(&self.fcs);
        buf.freeze()
    }

    /// Total length of the encoded packet.
    pub fn len(&self) -> usize {
        PREAMBLE_LEN + self.frame.len() + FCS_LEN
    }

    /// Never empty, see [`EtherFrame::is_empty`].
    pub fn is_empty(&self) -> bool {
        false
    }
}
