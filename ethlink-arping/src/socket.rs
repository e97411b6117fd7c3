//! Linux `AF_PACKET` raw socket carrying whole Ethernet frames.

use std::ffi::{CStr, CString};
use std::io;
use std::mem;
use std::net::Ipv4Addr;
use std::os::unix::io::{AsRawFd, RawFd};
use std::ptr;
use std::time::Duration;

use ethlink::ether::EtherAddr;

/// Convert a host-order `u16` to network byte order.
#[inline]
pub fn htons(v: u16) -> u16 {
    v.to_be()
}

fn cvt(res: libc::c_int) -> io::Result<libc::c_int> {
    if res < 0 {
        Err(io::Error::last_os_error())
    } else {
        Ok(res)
    }
}

fn cvt_size(res: libc::ssize_t) -> io::Result<usize> {
    if res < 0 {
        Err(io::Error::last_os_error())
    } else {
        Ok(res as usize)
    }
}

fn interface_name(device: &str) -> io::Result<CString> {
    CString::new(device).map_err(|_| {
        io::Error::new(io::ErrorKind::InvalidInput, "interface name has a nul byte")
    })
}

/// Argument of the `SIOCGIFHWADDR` ioctl.
#[repr(C)]
struct IfreqHwaddr {
    ifr_name: [libc::c_char; libc::IF_NAMESIZE],
    ifr_hwaddr: libc::sockaddr,
    // The kernel copies a whole `struct ifreq`, whose union is 24 bytes.
    _pad: [u8; 8],
}

/// The first IPv4 address assigned to `device`, if any.
pub fn interface_ipv4_addr(device: &str) -> io::Result<Option<Ipv4Addr>> {
    let mut head: *mut libc::ifaddrs = ptr::null_mut();
    cvt(unsafe { libc::getifaddrs(&mut head) })?;

    let mut found = None;
    let mut cur = head;
    while !cur.is_null() {
        let ifa = unsafe { &*cur };
        cur = ifa.ifa_next;
        if ifa.ifa_addr.is_null() || ifa.ifa_name.is_null() {
            continue;
        }
        let name = unsafe { CStr::from_ptr(ifa.ifa_name) };
        let family = unsafe { (*ifa.ifa_addr).sa_family };
        if name.to_bytes() == device.as_bytes() && libc::c_int::from(family) == libc::AF_INET {
            let sin = unsafe { &*(ifa.ifa_addr as *const libc::sockaddr_in) };
            found = Some(Ipv4Addr::from(u32::from_be(sin.sin_addr.s_addr)));
            break;
        }
    }

    unsafe { libc::freeifaddrs(head) };
    Ok(found)
}

/// A raw link-layer socket bound to one interface and one EtherType.
#[derive(Debug)]
pub struct RawSocket {
    fd: RawFd,
    ifindex: libc::c_int,
    name: CString,
}

impl RawSocket {
    /// Open a socket on `device` that sees ARP frames only.
    pub fn open_arp(device: &str) -> io::Result<Self> {
        Self::open(device, libc::ETH_P_ARP as u16)
    }

    /// Open a socket on `device` for frames of type `ethertype`.
    pub fn open(device: &str, ethertype: u16) -> io::Result<Self> {
        let name = interface_name(device)?;
        let ifindex = unsafe { libc::if_nametoindex(name.as_ptr()) };
        if ifindex == 0 {
            return Err(io::Error::last_os_error());
        }

        let protocol = htons(ethertype);
        let fd = cvt(unsafe {
            libc::socket(libc::AF_PACKET, libc::SOCK_RAW, libc::c_int::from(protocol))
        })?;
        // Owned from here on, closed by drop on any error below.
        let socket = RawSocket {
            fd,
            ifindex: ifindex as libc::c_int,
            name,
        };

        let mut addr: libc::sockaddr_ll = unsafe { mem::zeroed() };
        addr.sll_family = libc::AF_PACKET as libc::c_ushort;
        addr.sll_protocol = protocol;
        addr.sll_ifindex = socket.ifindex;
        cvt(unsafe {
            libc::bind(
                socket.fd,
                &addr as *const libc::sockaddr_ll as *const libc::sockaddr,
                mem::size_of::<libc::sockaddr_ll>() as libc::socklen_t,
            )
        })?;

        Ok(socket)
    }

    /// Index of the bound interface.
    pub fn ifindex(&self) -> i32 {
        self.ifindex
    }

    /// Hardware address of the bound interface.
    pub fn hardware_addr(&self) -> io::Result<EtherAddr> {
        let mut req: IfreqHwaddr = unsafe { mem::zeroed() };
        let name = self.name.as_bytes();
        if name.len() >= libc::IF_NAMESIZE {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "interface name too long",
            ));
        }
        for (dst, &src) in req.ifr_name.iter_mut().zip(name) {
            *dst = src as libc::c_char;
        }

        let req_ptr = &mut req as *mut IfreqHwaddr;
        cvt(unsafe { libc::ioctl(self.fd, libc::SIOCGIFHWADDR as _, req_ptr) })?;

        if req.ifr_hwaddr.sa_family != libc::ARPHRD_ETHER {
            return Err(io::Error::new(
                io::ErrorKind::Unsupported,
                "interface is not an ethernet device",
            ));
        }
        let mut bytes = [0; 6];
        for (dst, &src) in bytes.iter_mut().zip(&req.ifr_hwaddr.sa_data) {
            *dst = src as u8;
        }
        Ok(EtherAddr(bytes))
    }

    /// Make `recv` give up with `WouldBlock` after `timeout`.
    pub fn set_read_timeout(&self, timeout: Duration) -> io::Result<()> {
        let tv = libc::timeval {
            tv_sec: timeout.as_secs() as libc::time_t,
            tv_usec: timeout.subsec_micros() as libc::suseconds_t,
        };
        cvt(unsafe {
            libc::setsockopt(
                self.fd,
                libc::SOL_SOCKET,
                libc::SO_RCVTIMEO,
                &tv as *const libc::timeval as *const libc::c_void,
                mem::size_of::<libc::timeval>() as libc::socklen_t,
            )
        })?;
        Ok(())
    }

    /// Transmit one complete frame.
    pub fn send(&self, frame: &[u8]) -> io::Result<usize> {
        cvt_size(unsafe {
            libc::send(
                self.fd,
                frame.as_ptr() as *const libc::c_void,
                frame.len(),
                0,
            )
        })
    }

    /// Receive one frame into `buf`, returning its length.
    pub fn recv(&self, buf: &mut [u8]) -> io::Result<usize> {
        cvt_size(unsafe {
            libc::recv(
                self.fd,
                buf.as_mut_ptr() as *mut libc::c_void,
                buf.len(),
                0,
            )
        })
    }
}

impl AsRawFd for RawSocket {
    fn as_raw_fd(&self) -> RawFd {
        self.fd
    }
}

impl Drop for RawSocket {
    fn drop(&mut self) {
        unsafe {
            libc::close(self.fd);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn htons_is_network_order() {
        assert_eq!(htons(0x1234).to_ne_bytes(), [0x12, 0x34]);
        assert_eq!(htons(libc::ETH_P_ARP as u16).to_ne_bytes(), [0x08, 0x06]);
    }

    #[test]
    fn unknown_interface() {
        let err = RawSocket::open_arp("no-such-if0").unwrap_err();
        assert_ne!(err.kind(), io::ErrorKind::InvalidInput);
        let err = RawSocket::open_arp("bad\0name").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }

    #[test]
    fn no_ipv4_addr_for_unknown_interface() {
        assert_eq!(interface_ipv4_addr("no-such-if0").unwrap(), None);
    }
}
