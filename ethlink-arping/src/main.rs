//! Resolve one IPv4 address to a MAC address over a raw Ethernet socket.

mod config;
mod socket;

use std::io;
use std::net::Ipv4Addr;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use clap::Parser;
use ethlink::arp::ArpPacket;
use ethlink::ether::{EtherAddr, EtherFrame};
use tracing::{debug, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use config::Config;
use socket::RawSocket;

// Largest untagged frame without FCS.
const MAX_FRAME_LEN: usize = 1514;

#[derive(Parser)]
#[command(name = "ethlink-arping")]
#[command(about = "Send an ARP request and wait for the reply")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// Configuration file path
    #[arg(short, long)]
    config: PathBuf,

    /// Address to resolve, overrides `target` from the configuration
    #[arg(short, long)]
    target: Option<Ipv4Addr>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins over --verbose.
    let fallback = if cli.verbose { "debug" } else { "info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(true).without_time())
        .try_init()
        .ok();

    let config = Config::load(&cli.config)?;
    let target = cli
        .target
        .or(config.target)
        .context("no target address in the configuration or on the command line")?;

    let socket = RawSocket::open_arp(&config.device)
        .with_context(|| format!("failed to open raw socket on {}", config.device))?;
    socket.set_read_timeout(Duration::from_millis(100))?;
    debug!(ifindex = socket.ifindex(), "socket bound");

    let iface_mac = socket
        .hardware_addr()
        .map_err(|err| warn!(%err, "cannot read interface mac address"))
        .ok();
    let iface_ip = socket::interface_ipv4_addr(&config.device)
        .map_err(|err| warn!(%err, "cannot list interface addresses"))
        .ok()
        .flatten();
    let local = config.local_addrs(iface_mac, iface_ip)?;

    info!(
        device = %config.device,
        mac = %local.mac,
        ip = %local.ip,
        mask = %local.mask,
        ttl = config.ip_ttl,
        "using local addresses"
    );
    if !local.in_subnet(target) {
        warn!(%target, "target is outside the local subnet, nobody may answer");
    }

    let request = ArpPacket::new_request(local.mac, EtherAddr::ZERO, local.ip, target);
    let frame = request.to_frame(EtherAddr::BROADCAST, local.mac).encode();
    let sent = socket.send(&frame).context("failed to send arp request")?;
    debug!(len = sent, "arp request sent");

    match wait_for_reply(&socket, target, config.timeout())? {
        Some(reply) => {
            println!("{} is at {}", reply.sender_ipv4_addr(), reply.sender_ether_addr());
            Ok(())
        }
        None => bail!("no reply from {} within {} ms", target, config.timeout_ms),
    }
}

fn wait_for_reply(
    socket: &RawSocket,
    target: Ipv4Addr,
    timeout: Duration,
) -> Result<Option<ArpPacket>> {
    let deadline = Instant::now() + timeout;
    let mut buf = [0u8; MAX_FRAME_LEN];

    while Instant::now() < deadline {
        let len = match socket.recv(&mut buf) {
            Ok(len) => len,
            Err(err)
                if matches!(
                    err.kind(),
                    io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut | io::ErrorKind::Interrupted
                ) =>
            {
                continue
            }
            Err(err) => return Err(err).context("failed to receive"),
        };
        if let Some(reply) = match_reply(&buf[..len], target) {
            return Ok(Some(reply));
        }
    }
    Ok(None)
}

/// The ARP reply from `target` carried in `buf`, if that is what it holds.
fn match_reply(buf: &[u8], target: Ipv4Addr) -> Option<ArpPacket> {
    let arp = EtherFrame::decode(buf)
        .and_then(|frame| ArpPacket::from_frame(&frame))
        .map_err(|err| debug!(%err, "skipping frame"))
        .ok()?;
    if arp.is_reply() && arp.sender_ipv4_addr() == target {
        Some(arp)
    } else {
        debug!(op = %arp.operation(), sender = %arp.sender_ipv4_addr(), "ignoring arp packet");
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ethlink::arp::Operation;
    use ethlink::ether::EtherType;

    fn reply_from(ip: Ipv4Addr) -> Vec<u8> {
        ArpPacket::new(
            Operation::REPLY,
            EtherAddr([0x02, 0, 0, 0, 0, 0x22]),
            ip,
            EtherAddr([0x02, 0, 0, 0, 0, 0x11]),
            Ipv4Addr::new(10, 0, 0, 1),
        )
        .to_frame(EtherAddr([0x02, 0, 0, 0, 0, 0x11]), EtherAddr([0x02, 0, 0, 0, 0, 0x22]))
        .encode()
        .to_vec()
    }

    #[test]
    fn matches_reply_from_target() {
        let target = Ipv4Addr::new(10, 0, 0, 2);
        let reply = match_reply(&reply_from(target), target).unwrap();
        assert_eq!(reply.sender_ether_addr(), EtherAddr([0x02, 0, 0, 0, 0, 0x22]));
    }

    #[test]
    fn ignores_other_frames() {
        let target = Ipv4Addr::new(10, 0, 0, 2);
        assert!(match_reply(&reply_from(Ipv4Addr::new(10, 0, 0, 3)), target).is_none());

        let request = ArpPacket::new_request(
            EtherAddr([0x02, 0, 0, 0, 0, 0x22]),
            EtherAddr::ZERO,
            target,
            Ipv4Addr::new(10, 0, 0, 1),
        )
        .to_frame(EtherAddr::BROADCAST, EtherAddr([0x02, 0, 0, 0, 0, 0x22]))
        .encode();
        assert!(match_reply(&request, target).is_none());

        let ipv4 = EtherFrame::new(
            EtherAddr::BROADCAST,
            EtherAddr::ZERO,
            EtherType::Ipv4,
            vec![0u8; 28],
        );
        assert!(match_reply(&ipv4.encode(), target).is_none());

        assert!(match_reply(&[0xff; 10], target).is_none());
    }

    #[test]
    fn cli_parses() {
        let args = ["ethlink-arping", "-c", "arping.toml", "-t", "10.0.0.9", "-v"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert_eq!(cli.config, PathBuf::from("arping.toml"));
        assert_eq!(cli.target, Some(Ipv4Addr::new(10, 0, 0, 9)));
        assert!(cli.verbose);
        assert!(Cli::try_parse_from(["ethlink-arping"]).is_err());
    }
}
