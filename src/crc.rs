//! CRC-8 used by Sensirion sensors: polynomial 0x131 (x^8 + x^5 + x^4 + 1), initial value 0xff,
//! MSB first, no reflection and no final XOR.

const POLYNOMIAL: u16 = 0x131;
const INIT: u16 = 0xff;

/// Computes the checksum the sensor appends after every 2-byte word.
pub fn crc8(data: &[u8]) -> u8 {
    // 9 bits are needed between the shift and the XOR with the polynomial
    let mut crc = INIT;
    for byte in data {
        crc ^= u16::from(*byte);
        for _ in 0..8 {
            crc = if crc & 0x80 != 0 {
                (crc << 1) ^ POLYNOMIAL
            } else {
                crc << 1
            };
        }
    }
    (crc & 0xff) as u8
}
