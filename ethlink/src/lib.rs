#![warn(missing_docs, missing_debug_implementations, rust_2018_idioms)]

//! Decode and encode Ethernet II frames and the ARP packets they carry.
//!
//! Decoded values own their bytes, so the receive buffer can be reused as
//! soon as `decode` returns.

#[macro_use]
extern crate quick_error;

#[macro_use]
mod macros;

pub mod error;
pub use error::{Error, Result};

pub mod arp;
pub mod ether;
pub mod ipv4;
