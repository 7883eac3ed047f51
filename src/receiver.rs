//! Byte-at-a-time receive state machine for the post-COBS, CRC-stripped
//! record stream.
//!
//! The component that feeds `parse_byte` is assumed to have already split
//! the wire stream on `0x00`, COBS-decoded each frame, and verified its
//! CRC-16/MODBUS trailer (see `crate::cobs` and `crate::crc`). Reassembly
//! across frame boundaries is automatic because this state machine only
//! ever sees the concatenated record stream; a record may straddle two
//! frames and `parse_byte` can't tell.

use crate::error::Error;
use crate::varint::MAX_VARINT_SHIFT;
use crate::wire::WireType;

/// Parser states, matching the reference state table 1:1. `Idle` also
/// covers decoding the (possibly multi-byte) varint key before the wire
/// type is known — see the crate's key-width design note.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Idle,
    Varint,
    Fix32,
    LenHeader,
    BlobBody,
}

/// Receives one decoded field per complete record.
///
/// The payload is handed over in wire order: 4 little-endian bytes for
/// `VARINT`/`FIX32` fields, `length` raw bytes for `LEN` fields. Reversing
/// ZigZag for a signed field, or reinterpreting a `FIX32` payload as a
/// float, is the implementor's job — this crate carries no schema.
pub trait Handler {
    /// Called once per complete field, with the unsigned tag (not capped at
    /// 4 bits — see the key-width design note) and its raw wire payload.
    fn on_field(&mut self, tag: u32, payload: &[u8]);
}

/// Byte-at-a-time parser over a bounded scratch buffer.
pub struct Receiver<'scratch, H: Handler> {
    scratch: &'scratch mut [u8],
    scratch_idx: usize,
    state: State,
    tag: u32,
    accumulator: u32,
    shift: u32,
    length: usize,
    handler: H,
}

impl<'scratch, H: Handler> Receiver<'scratch, H> {
    /// Creates a receiver over `scratch` (used for `FIX32` and `LEN` blob
    /// assembly) and `handler`.
    ///
    /// # Errors
    ///
    /// Returns `Error::Invalid` if `scratch` is smaller than 4 bytes — too
    /// small to even hold a `FIX32` payload.
    pub fn new(scratch: &'scratch mut [u8], handler: H) -> Result<Self, Error> {
        if scratch.len() < 4 {
            return Err(Error::Invalid);
        }
        Ok(Self {
            scratch,
            scratch_idx: 0,
            state: State::Idle,
            tag: 0,
            accumulator: 0,
            shift: 0,
            length: 0,
            handler,
        })
    }

    /// The largest blob length this receiver can accept, bounded by its
    /// scratch buffer rather than a fixed constant (see the scratch-sizing
    /// design note: the reference's fixed 64-byte scratch with a 256-byte
    /// length cap can overrun; here the two are tied together).
    #[must_use]
    pub fn max_blob_len(&self) -> usize {
        self.scratch.len()
    }

    /// Resets the parser to its initial state, discarding any
    /// partially-assembled record. An embedder calls this to resynchronize
    /// after `parse_byte` returns `Error::Invalid`, typically at the next
    /// frame boundary.
    pub fn reset(&mut self) {
        self.state = State::Idle;
        self.accumulator = 0;
        self.shift = 0;
        self.scratch_idx = 0;
        self.length = 0;
    }

    /// Feeds one byte of the record stream into the parser, firing
    /// `Handler::on_field` once per complete field.
    ///
    /// # Errors
    ///
    /// Returns `Error::Invalid` for an unrecognized wire type, a key or
    /// length varint that doesn't terminate within 5 bytes, or a declared
    /// blob length exceeding `max_blob_len()`. The parser is left in
    /// `Idle` state after any error; callers may also call `reset()`
    /// explicitly for clarity at a frame boundary.
    pub fn parse_byte(&mut self, byte: u8) -> Result<(), Error> {
        let result = match self.state {
            State::Idle => self.on_idle(byte),
            State::Varint => self.on_varint(byte),
            State::Fix32 => self.on_fix32(byte),
            State::LenHeader => self.on_len_header(byte),
            State::BlobBody => self.on_blob_body(byte),
        };
        if result.is_err() {
            self.reset();
        }
        result
    }

    fn on_idle(&mut self, byte: u8) -> Result<(), Error> {
        if self.shift >= MAX_VARINT_SHIFT {
            return Err(Error::Invalid);
        }
        self.accumulator |= u32::from(byte & 0x7F) << self.shift;
        if byte & 0x80 != 0 {
            self.shift += 7;
            return Ok(());
        }

        let key = self.accumulator;
        self.tag = key >> 3;
        self.accumulator = 0;
        self.shift = 0;

        match WireType::from_u32(key & 0x7) {
            Some(WireType::Varint) => {
                self.state = State::Varint;
            }
            Some(WireType::Fix32) => {
                self.scratch_idx = 0;
                self.state = State::Fix32;
            }
            Some(WireType::Len) => {
                self.state = State::LenHeader;
            }
            Some(WireType::Fix64) | None => return Err(Error::Invalid),
        }
        Ok(())
    }

    fn on_varint(&mut self, byte: u8) -> Result<(), Error> {
        if self.shift >= MAX_VARINT_SHIFT {
            return Err(Error::Invalid);
        }
        self.accumulator |= u32::from(byte & 0x7F) << self.shift;
        if byte & 0x80 != 0 {
            self.shift += 7;
            return Ok(());
        }

        let payload = self.accumulator.to_le_bytes();
        self.handler.on_field(self.tag, &payload);
        self.state = State::Idle;
        self.accumulator = 0;
        self.shift = 0;
        Ok(())
    }

    fn on_fix32(&mut self, byte: u8) -> Result<(), Error> {
        self.scratch[self.scratch_idx] = byte;
        self.scratch_idx += 1;
        if self.scratch_idx == 4 {
            let tag = self.tag;
            self.handler.on_field(tag, &self.scratch[..4]);
            self.state = State::Idle;
            self.scratch_idx = 0;
        }
        Ok(())
    }

    fn on_len_header(&mut self, byte: u8) -> Result<(), Error> {
        if self.shift >= MAX_VARINT_SHIFT {
            return Err(Error::Invalid);
        }
        self.accumulator |= u32::from(byte & 0x7F) << self.shift;
        if byte & 0x80 != 0 {
            self.shift += 7;
            return Ok(());
        }

        let length = self.accumulator as usize;
        if length > self.scratch.len() {
            return Err(Error::Invalid);
        }
        self.length = length;
        self.accumulator = 0;
        self.shift = 0;

        if length == 0 {
            let tag = self.tag;
            self.handler.on_field(tag, &[]);
            self.state = State::Idle;
        } else {
            self.scratch_idx = 0;
            self.state = State::BlobBody;
        }
        Ok(())
    }

    fn on_blob_body(&mut self, byte: u8) -> Result<(), Error> {
        self.scratch[self.scratch_idx] = byte;
        self.scratch_idx += 1;
        if self.scratch_idx == self.length {
            let tag = self.tag;
            let length = self.length;
            self.handler.on_field(tag, &self.scratch[..length]);
            self.state = State::Idle;
            self.scratch_idx = 0;
        }
        Ok(())
    }
}
