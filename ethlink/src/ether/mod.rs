//! Ethernet II framing.

use core::fmt;
use core::str::FromStr;

use crate::Error;

mod registry;
pub use registry::{EtherType, EtherTypeRegistry};

mod frame;
pub use frame::{EtherFrame, ETHER_HEADER_LEN};

mod packet;
pub use packet::{EtherPacket, DEFAULT_PREAMBLE, FCS_LEN, PREAMBLE_LEN};

/// A six-octet Ethernet II address.
#[derive(Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Default)]
pub struct EtherAddr(pub [u8; 6]);

impl EtherAddr {
    /// The broadcast address.
    pub const BROADCAST: EtherAddr = EtherAddr([0xff; 6]);

    /// The all-zero address, used as the unknown target of an ARP request.
    pub const ZERO: EtherAddr = EtherAddr([0x00; 6]);

    /// Construct an Ethernet address from a sequence of octets, in big-endian.
    ///
    /// # Panics
    /// The function panics if `data` is not six octets long.
    pub fn from_bytes(data: &[u8]) -> EtherAddr {
        let mut bytes = [0; 6];
        bytes.copy_from_slice(data);
        EtherAddr(bytes)
    }

    /// Return an Ethernet address as a sequence of octets, in big-endian.
    pub const fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Query whether the address is an unicast address.
    pub fn is_unicast(&self) -> bool {
        !(self.is_broadcast() || self.is_multicast())
    }

    /// Query whether this address is the broadcast address.
    pub fn is_broadcast(&self) -> bool {
        *self == Self::BROADCAST
    }

    /// Query whether the 'multicast' bit in the OUI is set.
    pub const fn is_multicast(&self) -> bool {
        self.0[0] & 0x01 != 0
    }

    /// Query whether the 'locally administered' bit in the OUI is set.
    pub const fn is_local(&self) -> bool {
        self.0[0] & 0x02 != 0
    }

    /// Parse a string with the form 'Aa:0b:Cc:11:02:33' into `EtherAddr`.
    ///
    /// Every group must hold exactly two hex digits.
    pub fn parse_from<T: AsRef<str>>(s: T) -> Option<Self> {
        let mut result = [0; 6];
        let mut groups = s.as_ref().split(':');
        for octet in result.iter_mut() {
            let group = groups.next()?;
            if group.len() != 2 || !group.bytes().all(|b| b.is_ascii_hexdigit()) {
                return None;
            }
            *octet = u8::from_str_radix(group, 16).ok()?;
        }
        if groups.next().is_some() {
            return None;
        }
        Some(Self(result))
    }
}

impl FromStr for EtherAddr {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_from(s).ok_or_else(|| Error::InvalidEtherAddr(s.to_string()))
    }
}

impl From<[u8; 6]> for EtherAddr {
    fn from(bytes: [u8; 6]) -> Self {
        EtherAddr(bytes)
    }
}

impl fmt::Display for EtherAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bytes = self.0;
        write!(
            f,
            "{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}",
            bytes[0], bytes[1], bytes[2], bytes[3], bytes[4], bytes[5]
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn etheraddr_parse_from() {
        let s = "Aa:Bb:Cc:11:22:33";
        assert_eq!(
            EtherAddr::parse_from(s),
            Some(EtherAddr::from_bytes(&[0xAa, 0xBb, 0xCc, 0x11, 0x22, 0x33]))
        );
        assert_eq!(EtherAddr::parse_from("Aa:Bb:Cc:11:22"), None);
        assert_eq!(EtherAddr::parse_from("Aa:Bb:Cc:11:22:33:44"), None);
        assert_eq!(EtherAddr::parse_from("Aaa:Bb:Cc:11:22:33"), None);
        assert_eq!(EtherAddr::parse_from("Zz:Bb:Cc:11:22:33"), None);
        assert_eq!(EtherAddr::parse_from("a:Bb:Cc:11:22:33"), None);
        assert_eq!(EtherAddr::parse_from("+a:Bb:Cc:11:22:33"), None);
    }

    #[test]
    fn etheraddr_from_str() {
        let addr: EtherAddr = "aa:bb:cc:dd:ee:ff".parse().unwrap();
        assert_eq!(addr, EtherAddr([0xaa, 0xbb, 0xcc, 0xdd, 0xee, 0xff]));
        assert_eq!(
            "nope".parse::<EtherAddr>(),
            Err(Error::InvalidEtherAddr("nope".to_string()))
        );
    }

    #[test]
    fn etheraddr_display() {
        let addr = EtherAddr([0xAA, 0xBB, 0xCC, 0x01, 0x02, 0x03]);
        assert_eq!(addr.to_string(), "aa:bb:cc:01:02:03");
        assert_eq!(EtherAddr::parse_from(addr.to_string()), Some(addr));
    }

    #[test]
    fn etheraddr_classes() {
        assert!(EtherAddr::BROADCAST.is_broadcast());
        assert!(EtherAddr::BROADCAST.is_multicast());
        assert!(!EtherAddr::BROADCAST.is_unicast());
        assert!(EtherAddr([0x01, 0x00, 0x5e, 0, 0, 1]).is_multicast());
        assert!(EtherAddr([0x02, 0, 0, 0, 0, 1]).is_local());
        assert!(EtherAddr([0x10, 0x22, 0x33, 0x44, 0x55, 0x66]).is_unicast());
        assert_eq!(EtherAddr::default(), EtherAddr::ZERO);
    }
}
