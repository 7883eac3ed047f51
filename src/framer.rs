//! Bounded staging buffer that turns staged payload bytes into CRC-protected,
//! COBS-encoded, zero-delimited frames.

use tinyvec::ArrayVec;

use crate::cobs;
use crate::crc;
use crate::error::Error;

/// Smallest legal staging buffer, inclusive.
pub const MIN_STAGING_BUF: usize = 16;
/// Largest legal staging buffer, inclusive.
pub const MAX_STAGING_BUF: usize = 200;

/// Bytes reserved in the staging buffer for the CRC trailer; `stage` flushes
/// early to keep this much room free so a flush never has to split the CRC
/// itself across frames.
const RESERVED: usize = 8;

/// Largest COBS-encoded scratch needed for any legal staging buffer (its
/// largest payload plus the 2-byte CRC trailer).
const ENCODED_SCRATCH: usize = cobs::max_encoded_len(MAX_STAGING_BUF + 2);

/// Trait for the physical byte sink a `Framer`/`Sender` writes frames to.
///
/// The sink is assumed to either accept the whole slice or block; partial
/// writes and I/O failures are not modeled (sink errors are out of scope —
/// see the crate's error-handling notes).
pub trait Write {
    /// Writes `bytes` to the sink.
    fn write(&mut self, bytes: &[u8]);
}

/// Owns a bounded staging buffer and emits CRC-protected, COBS-encoded,
/// zero-delimited frames through a `Write` sink.
pub struct Framer<'buf, W: Write> {
    buf: &'buf mut [u8],
    fill: usize,
    sink: W,
}

impl<'buf, W: Write> Framer<'buf, W> {
    /// Creates a framer over `buf` and `sink`.
    ///
    /// # Errors
    ///
    /// Returns `Error::Invalid` if `buf.len()` is outside
    /// `[MIN_STAGING_BUF, MAX_STAGING_BUF]`.
    pub fn new(buf: &'buf mut [u8], sink: W) -> Result<Self, Error> {
        if buf.len() < MIN_STAGING_BUF || buf.len() > MAX_STAGING_BUF {
            return Err(Error::Invalid);
        }
        Ok(Self { buf, fill: 0, sink })
    }

    /// Capacity of the staging buffer, in bytes.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Bytes currently staged, awaiting flush.
    #[must_use]
    pub fn fill(&self) -> usize {
        self.fill
    }

    /// Appends `bytes` to the staging buffer, flushing a frame whenever the
    /// reserved tail would otherwise be encroached on, so the reserved room
    /// for the CRC trailer is always available.
    pub fn stage(&mut self, mut bytes: &[u8]) {
        let safe_cap = self.buf.len() - RESERVED;
        while !bytes.is_empty() {
            if self.fill >= safe_cap {
                self.flush();
            }
            let available = safe_cap - self.fill;
            let to_copy = bytes.len().min(available);
            self.buf[self.fill..self.fill + to_copy].copy_from_slice(&bytes[..to_copy]);
            self.fill += to_copy;
            bytes = &bytes[to_copy..];
        }
    }

    /// Finalizes and emits the current frame: appends the CRC-16/MODBUS
    /// trailer, COBS-encodes the result, and writes it followed by a single
    /// `0x00` delimiter. A no-op when nothing is staged.
    pub fn flush(&mut self) {
        if self.fill == 0 {
            return;
        }

        let crc = crc::checksum(&self.buf[..self.fill]);
        self.buf[self.fill] = (crc & 0xFF) as u8;
        self.buf[self.fill + 1] = (crc >> 8) as u8;
        self.fill += 2;

        let mut encoded: ArrayVec<[u8; ENCODED_SCRATCH]> = ArrayVec::new();
        encoded.set_len(ENCODED_SCRATCH);
        let len = cobs::encode(&self.buf[..self.fill], encoded.as_mut_slice());

        #[cfg(feature = "defmt")]
        defmt::trace!(
            "tipi: flushing frame ({=usize} payload bytes, {=usize} encoded)",
            self.fill,
            len
        );

        self.sink.write(&encoded[..len]);
        self.sink.write(&[0]);
        self.fill = 0;
    }
}
