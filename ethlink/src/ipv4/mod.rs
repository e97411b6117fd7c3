//! IPv4 addressing.
//!
//! ARP only copies protocol addresses around, so the standard library type is
//! all this crate needs.

pub use core::net::Ipv4Addr;

/// Length of an IPv4 address on the wire.
pub const IPV4_ADDR_LEN: usize = 4;

#[inline]
pub(crate) fn ipv4_from_bytes(data: &[u8]) -> Ipv4Addr {
    let mut bytes = [0; IPV4_ADDR_LEN];
    bytes.copy_from_slice(data);
    Ipv4Addr::from(bytes)
}
