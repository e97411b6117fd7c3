//! The error type shared by every codec in this crate.

use crate::ether::EtherType;

quick_error! {
    /// Reasons a buffer could not be decoded.
    ///
    /// Malformed input is expected on a live link, so every failure is
    /// reported through this type and none of the codecs panic on it.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum Error {
        /// The buffer is shorter than the fixed layout requires.
        ///
        /// Holds the length the layout needs, then the length that was given.
        InsufficientData(needed: usize, actual: usize) {
            display("insufficient data: need {} bytes, got {}", needed, actual)
        }
        /// The 16-bit type field has no entry in the EtherType registry.
        UnsupportedEtherType(code: u16) {
            display("unsupported ethertype {:#06x}", code)
        }
        /// The frame decoded fine but carries a different protocol.
        UnexpectedEtherType(actual: EtherType) {
            display("unexpected ethertype {}", actual)
        }
        /// ARP hardware type other than Ethernet.
        UnsupportedHardwareType(code: u16) {
            display("unsupported arp hardware type {}", code)
        }
        /// ARP protocol type other than IPv4.
        UnsupportedProtocolType(code: u16) {
            display("unsupported arp protocol type {:#06x}", code)
        }
        /// ARP address lengths outside the Ethernet/IPv4 profile (6/4).
        ///
        /// Holds the hardware address length, then the protocol address length.
        UnsupportedAddressLength(hardware: u8, protocol: u8) {
            display("unsupported arp address lengths {}/{}", hardware, protocol)
        }
        /// Text that is not a colon-separated MAC address.
        InvalidEtherAddr(text: String) {
            display("invalid ethernet address {:?}", text)
        }
    }
}

/// Result alias used across the crate.
pub type Result<T> = core::result::Result<T, Error>;

#[inline]
pub(crate) fn check_len(buf: &[u8], needed: usize) -> Result<()> {
    if buf.len() < needed {
        return Err(Error::InsufficientData(needed, buf.len()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        let err = Error::InsufficientData(14, 3);
        assert_eq!(err.to_string(), "insufficient data: need 14 bytes, got 3");
        assert_eq!(
            Error::UnsupportedEtherType(0x9999).to_string(),
            "unsupported ethertype 0x9999"
        );
        assert_eq!(
            Error::UnexpectedEtherType(EtherType::Ipv4).to_string(),
            "unexpected ethertype IPv4"
        );
    }

    #[test]
    fn check_len_boundary() {
        assert!(check_len(&[0; 14], 14).is_ok());
        assert_eq!(check_len(&[0; 13], 14), Err(Error::InsufficientData(14, 13)));
    }
}
