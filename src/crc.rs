//! CRC-16/MODBUS: reflected CRC-16, polynomial `0xA001`, init `0xFFFF`, no
//! final XOR. Used as the frame integrity trailer, written low-byte-first.

use crc::{Crc, CRC_16_MODBUS};

/// CRC-16/MODBUS algorithm instance, built from the `crc` crate's catalog
/// rather than a hand-rolled bit-reflection loop.
pub const CRC16_MODBUS: Crc<u16> = Crc::<u16>::new(&CRC_16_MODBUS);

/// Computes the CRC-16/MODBUS checksum of `data`.
#[must_use]
pub fn checksum(data: &[u8]) -> u16 {
    CRC16_MODBUS.checksum(data)
}

#[cfg(test)]
mod tests {
    use super::checksum;

    #[test]
    fn known_vector() {
        // "123456789" is the standard CRC-16/MODBUS check string.
        assert_eq!(checksum(b"123456789"), 0x4B37);
    }

    #[test]
    fn empty_input_is_the_initial_value() {
        assert_eq!(checksum(&[]), 0xFFFF);
    }
}
