// SPDX-License-Identifier: MIT OR Apache-2.0
//! tipi: a compact telemetry/instrumentation wire protocol for
//! resource-constrained devices that need to stream typed, tagged values to a
//! host over an unreliable byte-oriented link (UART, CDC-ACM, SLIP-like
//! tunnels).
//!
//! A record is a varint key (`(tag << 3) | wire_type`) followed by a
//! wire-type-shaped payload: a varint, 4 little-endian bytes, or a varint
//! length plus that many raw bytes. Records are packed into frames, each
//! frame gets a CRC-16/MODBUS trailer, the whole thing is COBS-encoded so it
//! contains no `0x00` byte, and frames are delimited by a single `0x00` on
//! the wire. A record may straddle more than one frame; only frame
//! boundaries carry integrity, never record structure.
//!
//! The usage can be described at a high level as:
//!
//! 1. On the device, create a [`Sender`] over a staging buffer and a
//!    [`framer::Write`] sink, and call `stream_*` for each value.
//! 2. On the host, split the incoming byte stream on `0x00`, COBS-decode
//!    each frame with [`cobs::decode`], verify its CRC-16/MODBUS trailer
//!    with [`crc::checksum`], and feed the payload bytes one at a time to a
//!    [`Receiver`], which dispatches complete fields to a [`Handler`].
//!
//! The `std` feature is on by default (for `std::error::Error` impls);
//! disable default features for `no_std` targets. Enable `defmt` for trace
//! logging from [`Framer::flush`](framer::Framer::flush).

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(clippy::all)]

#[cfg(feature = "std")]
extern crate std;

pub mod cobs;
pub mod crc;
pub mod varint;

mod error;
mod framer;
mod receiver;
mod sender;
mod wire;

pub use error::Error;
pub use framer::{Framer, Write, MAX_STAGING_BUF, MIN_STAGING_BUF};
pub use receiver::{Handler, Receiver};
pub use sender::Sender;
pub use wire::WireType;
