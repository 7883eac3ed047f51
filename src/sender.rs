//! Typed sender API: encodes tag-length-value records and streams them
//! through a `Framer`, flushing (at least) one frame per call.

use tinyvec::ArrayVec;

use crate::error::Error;
use crate::framer::{Framer, Write};
use crate::varint;
use crate::wire::WireType;

/// Scratch size for a single record's key plus non-blob payload, or a
/// blob's key plus length header. Matches the reference sender's internal
/// `uint8_t buf[10]` scratch.
const HEADER_SCRATCH: usize = 10;

/// Encodes typed field values into tag-length-value records and streams
/// them through a `Framer`.
///
/// Each `stream_*` call stages `key || payload` and always flushes, so one
/// call corresponds to at least one complete frame on the wire. A blob
/// whose header and body exceed the staging buffer's capacity is
/// fragmented across multiple frames automatically; frame boundaries carry
/// only integrity, never record structure, so the receiver reassembles the
/// logical record transparently.
pub struct Sender<'buf, W: Write> {
    framer: Framer<'buf, W>,
}

impl<'buf, W: Write> Sender<'buf, W> {
    /// Creates a sender over a staging buffer (`[16, 200]` bytes) and sink.
    ///
    /// # Errors
    ///
    /// Returns `Error::Invalid` if `buf.len()` is outside `[16, 200]`.
    pub fn new(buf: &'buf mut [u8], sink: W) -> Result<Self, Error> {
        Ok(Self {
            framer: Framer::new(buf, sink)?,
        })
    }

    /// Encodes `(tag << 3) | wire` as a varint key.
    fn key(tag: u8, wire: WireType) -> ArrayVec<[u8; HEADER_SCRATCH]> {
        let mut out: ArrayVec<[u8; HEADER_SCRATCH]> = ArrayVec::new();
        out.set_len(HEADER_SCRATCH);
        let key = (u32::from(tag) << 3) | wire as u32;
        let n = varint::encode_varint(key, out.as_mut_slice());
        out.truncate(n);
        out
    }

    fn stream_varint(&mut self, tag: u8, value: u32) -> Result<(), Error> {
        let mut header = Self::key(tag, WireType::Varint);
        let mut payload = [0u8; 5];
        let n = varint::encode_varint(value, &mut payload);
        header.extend_from_slice(&payload[..n]);
        self.framer.stage(&header);
        self.framer.flush();
        Ok(())
    }

    /// Streams an unsigned 8-bit value as a `VARINT` record.
    pub fn stream_u8(&mut self, tag: u8, value: u8) -> Result<(), Error> {
        self.stream_varint(tag, u32::from(value))
    }

    /// Streams an unsigned 16-bit value as a `VARINT` record.
    pub fn stream_u16(&mut self, tag: u8, value: u16) -> Result<(), Error> {
        self.stream_varint(tag, u32::from(value))
    }

    /// Streams an unsigned 32-bit value as a `VARINT` record.
    pub fn stream_u32(&mut self, tag: u8, value: u32) -> Result<(), Error> {
        self.stream_varint(tag, value)
    }

    /// Streams a signed 8-bit value, ZigZag-encoded after sign-extension to
    /// 32 bits (not a raw unsigned cast — small negative values must still
    /// cost one wire byte).
    pub fn stream_i8(&mut self, tag: u8, value: i8) -> Result<(), Error> {
        self.stream_varint(tag, varint::zigzag_encode(i32::from(value)))
    }

    /// Streams a signed 16-bit value, ZigZag-encoded after sign-extension to
    /// 32 bits.
    pub fn stream_i16(&mut self, tag: u8, value: i16) -> Result<(), Error> {
        self.stream_varint(tag, varint::zigzag_encode(i32::from(value)))
    }

    /// Streams a signed 32-bit value, ZigZag-encoded.
    pub fn stream_i32(&mut self, tag: u8, value: i32) -> Result<(), Error> {
        self.stream_varint(tag, varint::zigzag_encode(value))
    }

    /// Streams an IEEE-754 single-precision float as its little-endian bit
    /// pattern, as a `FIX32` record.
    pub fn stream_float(&mut self, tag: u8, value: f32) -> Result<(), Error> {
        let header = Self::key(tag, WireType::Fix32);
        self.framer.stage(&header);
        self.framer.stage(&value.to_le_bytes());
        self.framer.flush();
        Ok(())
    }

    /// Streams a length-prefixed blob as a `LEN` record.
    ///
    /// # Errors
    ///
    /// Returns `Error::Invalid` if `data.len()` doesn't fit in a `u32`.
    pub fn stream_blob(&mut self, tag: u8, data: &[u8]) -> Result<(), Error> {
        let mut header = Self::key(tag, WireType::Len);
        let mut len_buf = [0u8; 5];
        let len = u32::try_from(data.len()).map_err(|_| Error::Invalid)?;
        let n = varint::encode_varint(len, &mut len_buf);
        header.extend_from_slice(&len_buf[..n]);
        self.framer.stage(&header);
        self.framer.stage(data);
        self.framer.flush();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::Sender;
    use crate::cobs;
    use crate::crc;
    use crate::framer::Write;

    #[derive(Default)]
    struct Wire {
        bytes: Vec<u8>,
    }

    impl Write for &mut Wire {
        fn write(&mut self, bytes: &[u8]) {
            self.bytes.extend_from_slice(bytes);
        }
    }

    /// Splits the raw wire bytes on `0x00` into individual frames, COBS-
    /// decodes each, and verifies its CRC, returning the payload bytes
    /// (CRC trailer stripped) of every frame in emission order.
    fn unstuff_frames(wire: &[u8]) -> Vec<Vec<u8>> {
        wire.split(|&b| b == 0)
            .filter(|chunk| !chunk.is_empty())
            .map(|chunk| {
                let mut decoded = vec![0u8; chunk.len()];
                let n = cobs::decode(chunk, &mut decoded).unwrap();
                let payload = &decoded[..n - 2];
                let received_crc = u16::from(decoded[n - 2]) | (u16::from(decoded[n - 1]) << 8);
                assert_eq!(crc::checksum(payload), received_crc);
                payload.to_vec()
            })
            .collect()
    }

    #[rstest::rstest]
    #[case::s1_stream_u32(1, &[0x08, 0x2A])]
    fn s1_stream_u32(#[case] tag: u8, #[case] expected_prefix: &[u8]) {
        let mut wire = Wire::default();
        let mut buf = [0u8; 64];
        let mut sender = Sender::new(&mut buf, &mut wire).unwrap();
        sender.stream_u32(tag, 42).unwrap();
        let frames = unstuff_frames(&wire.bytes);
        assert_eq!(frames.len(), 1);
        assert_eq!(&frames[0][..2], expected_prefix);
    }

    #[test]
    fn s2_stream_u16_max() {
        let mut wire = Wire::default();
        let mut buf = [0u8; 64];
        let mut sender = Sender::new(&mut buf, &mut wire).unwrap();
        sender.stream_u16(2, 0xFFFF).unwrap();
        let frames = unstuff_frames(&wire.bytes);
        assert_eq!(&frames[0][..4], &[0x10, 0xFF, 0xFF, 0x03]);
    }

    #[test]
    fn s3_stream_u32_300() {
        let mut wire = Wire::default();
        let mut buf = [0u8; 64];
        let mut sender = Sender::new(&mut buf, &mut wire).unwrap();
        sender.stream_u32(2, 300).unwrap();
        let frames = unstuff_frames(&wire.bytes);
        assert_eq!(&frames[0][..3], &[0x10, 0xAC, 0x02]);
    }

    #[test]
    fn s4_stream_i8_negative_five() {
        let mut wire = Wire::default();
        let mut buf = [0u8; 64];
        let mut sender = Sender::new(&mut buf, &mut wire).unwrap();
        sender.stream_i8(10, -5).unwrap();
        let frames = unstuff_frames(&wire.bytes);
        assert_eq!(&frames[0][..2], &[0x50, 0x09]);
    }

    #[test]
    fn s5_stream_float() {
        let mut wire = Wire::default();
        let mut buf = [0u8; 64];
        let mut sender = Sender::new(&mut buf, &mut wire).unwrap();
        let value = 123.456_f32;
        sender.stream_float(3, value).unwrap();
        let frames = unstuff_frames(&wire.bytes);
        assert_eq!(frames[0][0], 0x1D);
        let recovered = f32::from_le_bytes(frames[0][1..5].try_into().unwrap());
        assert!((recovered - value).abs() < 1e-4);
    }

    #[test]
    fn s6_blob_fragments_across_frames() {
        let mut wire = Wire::default();
        let mut buf = [0u8; 32];
        let mut sender = Sender::new(&mut buf, &mut wire).unwrap();
        let data: Vec<u8> = (0..60u16).map(|i| (i + 1) as u8).collect();
        sender.stream_blob(5, &data).unwrap();
        let frames = unstuff_frames(&wire.bytes);
        assert!(frames.len() >= 2);
        let reassembled: Vec<u8> = frames.into_iter().flatten().collect();
        assert_eq!(reassembled[0], 0x2A);
        assert_eq!(reassembled[1], 60);
        assert_eq!(&reassembled[2..], &data[..]);
    }

    #[test]
    fn every_call_flushes_at_least_one_frame() {
        let mut wire = Wire::default();
        let mut buf = [0u8; 128];
        let mut sender = Sender::new(&mut buf, &mut wire).unwrap();
        for i in 0..11u8 {
            let before = wire.bytes.len();
            sender.stream_blob(1, &[0xAA]).unwrap();
            assert!(wire.bytes.len() > before, "call {i} produced no bytes");
        }
    }

    #[test]
    fn no_internal_zero_outside_delimiters() {
        let mut wire = Wire::default();
        let mut buf = [0u8; 40];
        let mut sender = Sender::new(&mut buf, &mut wire).unwrap();
        sender.stream_blob(7, &[0u8; 50]).unwrap();
        for frame in wire.bytes.split(|&b| b == 0).filter(|f| !f.is_empty()) {
            assert!(frame.iter().all(|&b| b != 0));
        }
    }
}
