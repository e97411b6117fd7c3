//! Configuration file for the arping tool.

use std::fmt;
use std::fs;
use std::net::Ipv4Addr;
use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use ethlink::ether::EtherAddr;
use serde::{Deserialize, Deserializer};
use tracing::{debug, warn};

/// Settings read from a TOML file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Config {
    /// Interface to send the request on.
    pub device: String,

    /// Our hardware address. Read from the interface when absent.
    #[serde(default, deserialize_with = "ether_addr")]
    pub vmac: Option<EtherAddr>,

    /// Our IPv4 address. Read from the interface when absent.
    #[serde(default)]
    pub vip: Option<Ipv4Addr>,

    /// Netmask of our IPv4 address.
    #[serde(default = "default_vmask")]
    pub vmask: Ipv4Addr,

    /// Informational, ARP does not carry a TTL.
    #[serde(default = "default_ip_ttl")]
    pub ip_ttl: u8,

    /// Address to resolve. The command line may override it.
    #[serde(default)]
    pub target: Option<Ipv4Addr>,

    /// How long to wait for the reply.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_vmask() -> Ipv4Addr {
    Ipv4Addr::new(255, 255, 255, 0)
}

fn default_ip_ttl() -> u8 {
    64
}

fn default_timeout_ms() -> u64 {
    3000
}

fn ether_addr<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<EtherAddr>, D::Error> {
    let text = String::deserialize(deserializer)?;
    text.parse().map(Some).map_err(serde::de::Error::custom)
}

/// The addresses a request is sent from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalAddrs {
    pub mac: EtherAddr,
    pub ip: Ipv4Addr,
    pub mask: Ipv4Addr,
}

impl LocalAddrs {
    /// Whether `addr` lies in our subnet.
    pub fn in_subnet(&self, addr: Ipv4Addr) -> bool {
        let mask = u32::from(self.mask);
        u32::from(self.ip) & mask == u32::from(addr) & mask
    }
}

impl Config {
    /// Read and parse the file at `path`.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("failed to parse {}", path.display()))
    }

    /// Parse configuration text.
    pub fn parse(text: &str) -> Result<Self> {
        let config: Config = toml::from_str(text)?;
        Ok(config)
    }

    /// Settle our addresses from the configuration and what the interface
    /// reports.
    ///
    /// A configured value is used as given, with a warning when the
    /// interface disagrees. A missing one is taken from the interface.
    pub fn local_addrs(
        &self,
        iface_mac: Option<EtherAddr>,
        iface_ip: Option<Ipv4Addr>,
    ) -> Result<LocalAddrs> {
        Ok(LocalAddrs {
            mac: pick("vmac", self.vmac, iface_mac, &self.device)?,
            ip: pick("vip", self.vip, iface_ip, &self.device)?,
            mask: self.vmask,
        })
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

fn pick<T>(key: &str, configured: Option<T>, iface: Option<T>, device: &str) -> Result<T>
where
    T: Copy + PartialEq + fmt::Display,
{
    match (configured, iface) {
        (Some(configured), Some(iface)) if configured != iface => {
            warn!(
                key,
                %configured,
                interface = %iface,
                device,
                "configured address differs from the interface, replies may not reach us"
            );
            Ok(configured)
        }
        (Some(configured), _) => Ok(configured),
        (None, Some(iface)) => {
            debug!(key, value = %iface, device, "using address of the interface");
            Ok(iface)
        }
        (None, None) => bail!("{} is not configured and {} does not report one", key, device),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
        device = "eth0"
    "#;

    const IFACE_MAC: EtherAddr = EtherAddr([0x02, 0, 0, 0, 0, 0x99]);
    const IFACE_IP: Ipv4Addr = Ipv4Addr::new(10, 0, 0, 99);

    #[test]
    fn full_config() {
        let config = Config::parse(
            r#"
            device = "enp0s5"
            vmac = "AA:BB:CC:DD:EE:FF"
            vip = "10.211.55.23"
            vmask = "255.255.0.0"
            ip-ttl = 32
            target = "10.211.55.1"
            timeout-ms = 500
            "#,
        )
        .unwrap();
        assert_eq!(config.device, "enp0s5");
        assert_eq!(
            config.vmac,
            Some(EtherAddr([0xaa, 0xbb, 0xcc, 0xdd, 0xee, 0xff]))
        );
        assert_eq!(config.vip, Some(Ipv4Addr::new(10, 211, 55, 23)));
        assert_eq!(config.vmask, Ipv4Addr::new(255, 255, 0, 0));
        assert_eq!(config.ip_ttl, 32);
        assert_eq!(config.target, Some(Ipv4Addr::new(10, 211, 55, 1)));
        assert_eq!(config.timeout(), Duration::from_millis(500));
    }

    #[test]
    fn defaults() {
        let config = Config::parse(MINIMAL).unwrap();
        assert_eq!(config.vmac, None);
        assert_eq!(config.vip, None);
        assert_eq!(config.vmask, Ipv4Addr::new(255, 255, 255, 0));
        assert_eq!(config.ip_ttl, 64);
        assert_eq!(config.target, None);
        assert_eq!(config.timeout_ms, 3000);
    }

    #[test]
    fn bad_mac_rejected() {
        let res = Config::parse(
            r#"
            device = "eth0"
            vmac = "02:00:00:00:01"
            "#,
        );
        assert!(res.is_err());
    }

    #[test]
    fn local_addrs_from_interface() {
        let config = Config::parse(MINIMAL).unwrap();
        let local = config
            .local_addrs(Some(IFACE_MAC), Some(IFACE_IP))
            .unwrap();
        assert_eq!(local.mac, IFACE_MAC);
        assert_eq!(local.ip, IFACE_IP);
        assert_eq!(local.mask, Ipv4Addr::new(255, 255, 255, 0));
    }

    #[test]
    fn local_addrs_configured_wins() {
        let config = Config::parse(
            r#"
            device = "eth0"
            vmac = "02:00:00:00:00:01"
            vip = "10.0.0.1"
            "#,
        )
        .unwrap();
        let local = config
            .local_addrs(Some(IFACE_MAC), Some(IFACE_IP))
            .unwrap();
        assert_eq!(local.mac, EtherAddr([0x02, 0, 0, 0, 0, 0x01]));
        assert_eq!(local.ip, Ipv4Addr::new(10, 0, 0, 1));

        // Nothing to compare against, the configuration is still used.
        let local = config.local_addrs(None, None).unwrap();
        assert_eq!(local.mac, EtherAddr([0x02, 0, 0, 0, 0, 0x01]));
    }

    #[test]
    fn local_addrs_mixed_sources() {
        let config = Config::parse(
            r#"
            device = "eth0"
            vip = "10.0.0.1"
            "#,
        )
        .unwrap();
        let local = config.local_addrs(Some(IFACE_MAC), None).unwrap();
        assert_eq!(local.mac, IFACE_MAC);
        assert_eq!(local.ip, Ipv4Addr::new(10, 0, 0, 1));
    }

    #[test]
    fn local_addrs_missing() {
        let config = Config::parse(MINIMAL).unwrap();
        let err = config.local_addrs(None, Some(IFACE_IP)).unwrap_err();
        assert!(err.to_string().contains("vmac"));
        let err = config.local_addrs(Some(IFACE_MAC), None).unwrap_err();
        assert!(err.to_string().contains("vip"));
    }

    #[test]
    fn subnet_check() {
        let local = LocalAddrs {
            mac: IFACE_MAC,
            ip: Ipv4Addr::new(10, 0, 0, 1),
            mask: Ipv4Addr::new(255, 255, 255, 0),
        };
        assert!(local.in_subnet(Ipv4Addr::new(10, 0, 0, 254)));
        assert!(!local.in_subnet(Ipv4Addr::new(10, 0, 1, 1)));
    }

    #[test]
    fn sample_file_loads() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("arping.toml");
        let config = Config::load(path).unwrap();
        assert_eq!(config.target, Some(Ipv4Addr::new(10, 0, 0, 2)));
    }
}
