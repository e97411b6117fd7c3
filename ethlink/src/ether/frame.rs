use byteorder::{ByteOrder, NetworkEndian};
use bytes::{BufMut, Bytes, BytesMut};

use super::{EtherAddr, EtherType, EtherTypeRegistry};
use crate::error::{check_len, Error, Result};

/// A constant that defines the fixed byte length of the Ethernet II header.
pub const ETHER_HEADER_LEN: usize = 14;

/// An Ethernet II frame: addressing header, resolved type and payload.
///
/// ```text
/// 0          6          12     14
/// +----------+----------+------+----------------
/// | dst_addr | src_addr | type | payload ...
/// +----------+----------+------+----------------
/// ```
///
/// The payload is opaque to the frame, it is only delimited by the length of
/// the buffer handed to [`EtherFrame::decode`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EtherFrame {
    dst_addr: EtherAddr,
    src_addr: EtherAddr,
    ethertype: EtherType,
    payload: Bytes,
}

impl EtherFrame {
    /// Assemble an outbound frame.
    pub fn new(
        dst_addr: EtherAddr,
        src_addr: EtherAddr,
        ethertype: EtherType,
        payload: impl Into<Bytes>,
    ) -> Self {
        Self {
            dst_addr,
            src_addr,
            ethertype,
            payload: payload.into(),
        }
    }

    /// Decode a frame from the raw bytes read off the link.
    ///
    /// The payload is copied out of `buf`.
    pub fn decode(buf: &[u8]) -> Result<Self> {
        check_len(buf, ETHER_HEADER_LEN).map_err(|err| {
            tracing::trace!(len = buf.len(), "frame too short");
            err
        })?;

        let code = NetworkEndian::read_u16(&buf[12..14]);
        let ethertype = EtherTypeRegistry::global().resolve(code).ok_or_else(|| {
            tracing::trace!(code, "unregistered ethertype");
            Error::UnsupportedEtherType(code)
        })?;

        Ok(Self {
            dst_addr: EtherAddr::from_bytes(&buf[0..6]),
            src_addr: EtherAddr::from_bytes(&buf[6..12]),
            ethertype,
            payload: Bytes::copy_from_slice(&buf[ETHER_HEADER_LEN..]),
        })
    }

    /// Serialize the frame into a fresh buffer.
    pub fn encode(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(self.len());
        self.encode_into(&mut buf);
        buf.freeze()
    }

    /// Append the serialized frame to `buf`.
    pub fn encode_into<B: BufMut>(&self, buf: &mut B) {
        buf.put_slice(self.dst_addr.as_bytes());
        buf.put_slice(self.src_addr.as_bytes());
        buf.put_u16(EtherTypeRegistry::global().wire_code_of(self.ethertype));
        buf.put_slice(&self.payload);
    }

    /// Total length of the encoded frame.
    #[inline]
    pub fn len(&self) -> usize {
        ETHER_HEADER_LEN + self.payload.len()
    }

    /// A frame always has a header, so it is never empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Destination address.
    #[inline]
    pub fn dst_addr(&self) -> EtherAddr {
        self.dst_addr
    }

    /// Source address.
    #[inline]
    pub fn src_addr(&self) -> EtherAddr {
        self.src_addr
    }

    /// Protocol of the payload.
    #[inline]
    pub fn ethertype(&self) -> EtherType {
        self.ethertype
    }

    /// The payload bytes.
    #[inline]
    pub fn payload(&self) -> &Bytes {
        &self.payload
    }

    /// Length of the payload.
    #[inline]
    pub fn payload_len(&self) -> usize {
        self.payload.len()
    }

    /// Take the payload out of the frame.
    pub fn into_payload(self) -> Bytes {
        self.payload
    }
}
