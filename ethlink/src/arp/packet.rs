use byteorder::{ByteOrder, NetworkEndian};
use bytes::{BufMut, Bytes, BytesMut};

use super::{Hardware, Operation};
use crate::error::{check_len, Error, Result};
use crate::ether::{EtherAddr, EtherFrame, EtherType, EtherTypeRegistry};
use crate::ipv4::{ipv4_from_bytes, Ipv4Addr, IPV4_ADDR_LEN};

/// A constant that defines the fixed byte length of the Arp packet.
pub const ARP_HEADER_LEN: usize = 28;
/// A fixed Arp request header with zeroed addresses.
pub const ARP_HEADER_TEMPLATE: [u8; ARP_HEADER_LEN] = [
    0x00, 0x01, 0x08, 0x00, 0x06, 0x04, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
];

const ETHER_ADDR_LEN: u8 = 6;

/// An ARP packet for Ethernet hardware addresses and IPv4 protocol addresses.
///
/// ```text
/// 0       2       4    5    6       8           14        18          24        28
/// +-------+-------+----+----+-------+-----------+---------+-----------+---------+
/// | htype | ptype |hlen|plen|  op   | sender hw | sndr ip | target hw | tgt ip  |
/// +-------+-------+----+----+-------+-----------+---------+-----------+---------+
/// ```
///
/// Every field sits at a fixed offset. Packets announcing other address
/// lengths are rejected instead of being parsed with a variable layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ArpPacket {
    hardware_type: Hardware,
    protocol_type: EtherType,
    hardware_addr_len: u8,
    protocol_addr_len: u8,
    operation: Operation,
    sender_ether_addr: EtherAddr,
    sender_ipv4_addr: Ipv4Addr,
    target_ether_addr: EtherAddr,
    target_ipv4_addr: Ipv4Addr,
}

impl ArpPacket {
    /// Build a packet of the Ethernet/IPv4 profile.
    pub fn new(
        operation: Operation,
        sender_ether_addr: EtherAddr,
        sender_ipv4_addr: Ipv4Addr,
        target_ether_addr: EtherAddr,
        target_ipv4_addr: Ipv4Addr,
    ) -> Self {
        Self {
            hardware_type: Hardware::ETHERNET,
            protocol_type: EtherType::Ipv4,
            hardware_addr_len: ETHER_ADDR_LEN,
            protocol_addr_len: IPV4_ADDR_LEN as u8,
            operation,
            sender_ether_addr,
            sender_ipv4_addr,
            target_ether_addr,
            target_ipv4_addr,
        }
    }

    /// Build a request asking who owns `target_ip`.
    ///
    /// `target_mac` is usually [`EtherAddr::ZERO`] since it is the unknown
    /// being resolved.
    pub fn new_request(
        sender_mac: EtherAddr,
        target_mac: EtherAddr,
        sender_ip: Ipv4Addr,
        target_ip: Ipv4Addr,
    ) -> Self {
        Self::new(Operation::REQUEST, sender_mac, sender_ip, target_mac, target_ip)
    }

    /// Decode the first 28 bytes of `buf`.
    ///
    /// Bytes past the packet, such as padding up to the Ethernet minimum
    /// frame size, are ignored.
    pub fn decode(buf: &[u8]) -> Result<Self> {
        check_len(buf, ARP_HEADER_LEN).map_err(|err| {
            tracing::trace!(len = buf.len(), "arp packet too short");
            err
        })?;

        let hardware_type = NetworkEndian::read_u16(&buf[0..2]);
        if Hardware::from(hardware_type) != Hardware::ETHERNET {
            tracing::trace!(hardware_type, "arp hardware type rejected");
            return Err(Error::UnsupportedHardwareType(hardware_type));
        }

        let protocol_type = NetworkEndian::read_u16(&buf[2..4]);
        if EtherTypeRegistry::global().resolve(protocol_type) != Some(EtherType::Ipv4) {
            tracing::trace!(protocol_type, "arp protocol type rejected");
            return Err(Error::UnsupportedProtocolType(protocol_type));
        }

        let (hardware_addr_len, protocol_addr_len) = (buf[4], buf[5]);
        if hardware_addr_len != ETHER_ADDR_LEN || protocol_addr_len != IPV4_ADDR_LEN as u8 {
            tracing::trace!(hardware_addr_len, protocol_addr_len, "arp address lengths rejected");
            return Err(Error::UnsupportedAddressLength(
                hardware_addr_len,
                protocol_addr_len,
            ));
        }

        Ok(Self {
            hardware_type: Hardware::ETHERNET,
            protocol_type: EtherType::Ipv4,
            hardware_addr_len,
            protocol_addr_len,
            operation: Operation::from(NetworkEndian::read_u16(&buf[6..8])),
            sender_ether_addr: EtherAddr::from_bytes(&buf[8..14]),
            sender_ipv4_addr: ipv4_from_bytes(&buf[14..18]),
            target_ether_addr: EtherAddr::from_bytes(&buf[18..24]),
            target_ipv4_addr: ipv4_from_bytes(&buf[24..28]),
        })
    }

    /// Decode the payload of `frame`, which must announce ARP.
    pub fn from_frame(frame: &EtherFrame) -> Result<Self> {
        match frame.ethertype() {
            EtherType::Arp => Self::decode(frame.payload()),
            other => Err(Error::UnexpectedEtherType(other)),
        }
    }

    /// Serialize the packet, always 28 bytes.
    pub fn encode(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(ARP_HEADER_LEN);
        self.encode_into(&mut buf);
        buf.freeze()
    }

    /// Append the serialized packet to `buf`.
    pub fn encode_into<B: BufMut>(&self, buf: &mut B) {
        buf.put_u16(self.hardware_type.raw());
        buf.put_u16(EtherTypeRegistry::global().wire_code_of(self.protocol_type));
        buf.put_u8(self.hardware_addr_len);
        buf.put_u8(self.protocol_addr_len);
        buf.put_u16(self.operation.raw());
        buf.put_slice(self.sender_ether_addr.as_bytes());
        buf.put_slice(&self.sender_ipv4_addr.octets());
        buf.put_slice(self.target_ether_addr.as_bytes());
        buf.put_slice(&self.target_ipv4_addr.octets());
    }

    /// Put the packet in an Ethernet frame sent from `src` to `dst`.
    pub fn to_frame(&self, dst: EtherAddr, src: EtherAddr) -> EtherFrame {
        EtherFrame::new(dst, src, EtherType::Arp, self.encode())
    }

    /// Hardware address space.
    #[inline]
    pub fn hardware_type(&self) -> Hardware {
        self.hardware_type
    }

    /// Protocol address space.
    #[inline]
    pub fn protocol_type(&self) -> EtherType {
        self.protocol_type
    }

    /// Length of a hardware address, always 6.
    #[inline]
    pub fn hardware_addr_len(&self) -> u8 {
        self.hardware_addr_len
    }

    /// Length of a protocol address, always 4.
    #[inline]
    pub fn protocol_addr_len(&self) -> u8 {
        self.protocol_addr_len
    }

    /// Request, reply, or another opcode.
    #[inline]
    pub fn operation(&self) -> Operation {
        self.operation
    }

    /// Hardware address of the sender.
    #[inline]
    pub fn sender_ether_addr(&self) -> EtherAddr {
        self.sender_ether_addr
    }

    /// Protocol address of the sender.
    #[inline]
    pub fn sender_ipv4_addr(&self) -> Ipv4Addr {
        self.sender_ipv4_addr
    }

    /// Hardware address of the target.
    #[inline]
    pub fn target_ether_addr(&self) -> EtherAddr {
        self.target_ether_addr
    }

    /// Protocol address of the target.
    #[inline]
    pub fn target_ipv4_addr(&self) -> Ipv4Addr {
        self.target_ipv4_addr
    }

    /// Whether this is a request.
    pub fn is_request(&self) -> bool {
        self.operation == Operation::REQUEST
    }

    /// Whether this is a reply.
    pub fn is_reply(&self) -> bool {
        self.operation == Operation::REPLY
    }
}
