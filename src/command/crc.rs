//! CRC-32 (IEEE 802.3, reflected, polynomial 0xEDB88320).
//!
//! Bitwise form; frame bodies are at most 9 bytes.

/// Standard CRC-32 as used by zlib/Ethernet: init `0xFFFF_FFFF`, final XOR.
pub fn crc32_ieee(bytes: &[u8]) -> u32 {
    let mut crc = 0xFFFF_FFFFu32;
    for &b in bytes {
        crc ^= b as u32;
        for _ in 0..8 {
            let mask = 0u32.wrapping_sub(crc & 1);
            crc = (crc >> 1) ^ (0xEDB8_8320u32 & mask);
        }
    }
    !crc
}
