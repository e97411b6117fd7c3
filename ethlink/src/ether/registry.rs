use core::convert::TryFrom;
use core::fmt;
use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::Error;

/// Protocols an Ethernet II frame can announce in its type field.
///
/// The wire code of each variant is owned by [`EtherTypeRegistry`]; use
/// `u16::from` and `EtherType::try_from` to cross the boundary.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy)]
pub enum EtherType {
    /// Internet Protocol version 4.
    Ipv4,
    /// Address Resolution Protocol.
    Arp,
    /// IEEE 802.1Q VLAN tag.
    Vlan,
    /// Internet Protocol version 6.
    Ipv6,
}

impl EtherType {
    const COUNT: usize = 4;

    /// Name of the protocol as commonly written.
    pub const fn name(&self) -> &'static str {
        match self {
            EtherType::Ipv4 => "IPv4",
            EtherType::Arp => "ARP",
            EtherType::Vlan => "VLAN",
            EtherType::Ipv6 => "IPv6",
        }
    }
}

impl fmt::Display for EtherType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// Ordered by variant discriminant.
const ETHER_TYPE_TABLE: [(EtherType, u16); EtherType::COUNT] = [
    (EtherType::Ipv4, 0x0800),
    (EtherType::Arp, 0x0806),
    (EtherType::Vlan, 0x8100),
    (EtherType::Ipv6, 0x86DD),
];

static REGISTRY: Lazy<EtherTypeRegistry> = Lazy::new(EtherTypeRegistry::build);

/// Bidirectional, read-only mapping between [`EtherType`] and wire codes.
///
/// There is a single instance per process, built on first use and never
/// modified afterwards, so lookups from any thread need no locking.
#[derive(Debug)]
pub struct EtherTypeRegistry {
    by_code: HashMap<u16, EtherType>,
    by_type: [u16; EtherType::COUNT],
}

impl EtherTypeRegistry {
    /// The process-wide registry.
    #[inline]
    pub fn global() -> &'static EtherTypeRegistry {
        &REGISTRY
    }

    fn build() -> Self {
        let mut by_code = HashMap::with_capacity(ETHER_TYPE_TABLE.len());
        let mut by_type = [0; EtherType::COUNT];
        for (idx, &(ethertype, code)) in ETHER_TYPE_TABLE.iter().enumerate() {
            debug_assert_eq!(ethertype as usize, idx);
            let prev = by_code.insert(code, ethertype);
            debug_assert!(prev.is_none(), "duplicate wire code {:#06x}", code);
            by_type[ethertype as usize] = code;
        }
        Self { by_code, by_type }
    }

    /// Look up the protocol registered for `code`.
    ///
    /// Unregistered codes resolve to `None`, never to a default variant.
    #[inline]
    pub fn resolve(&self, code: u16) -> Option<EtherType> {
        self.by_code.get(&code).copied()
    }

    /// The wire code of `ethertype`.
    #[inline]
    pub fn wire_code_of(&self, ethertype: EtherType) -> u16 {
        self.by_type[ethertype as usize]
    }

    /// Every registered `(EtherType, wire code)` pair.
    pub fn iter(&self) -> impl Iterator<Item = (EtherType, u16)> + '_ {
        ETHER_TYPE_TABLE
            .iter()
            .map(move |&(ethertype, _)| (ethertype, self.wire_code_of(ethertype)))
    }

    /// Number of registered protocols.
    pub fn len(&self) -> usize {
        self.by_code.len()
    }

    /// Whether the registry is empty. It never is.
    pub fn is_empty(&self) -> bool {
        self.by_code.is_empty()
    }
}

impl From<EtherType> for u16 {
    #[inline]
    fn from(value: EtherType) -> u16 {
        EtherTypeRegistry::global().wire_code_of(value)
    }
}

impl TryFrom<u16> for EtherType {
    type Error = Error;

    #[inline]
    fn try_from(code: u16) -> Result<Self, Self::Error> {
        EtherTypeRegistry::global()
            .resolve(code)
            .ok_or(Error::UnsupportedEtherType(code))
    }
}
