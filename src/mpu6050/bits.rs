//! Register field helpers. A field is addressed by its most significant bit
//! and its length, as in the MPU6050 register map.

/// Bit n of a byte, 0 or 1
pub fn get_bit(byte: u8, n: u8) -> u8 {
    (byte >> n) & 1
}

pub fn set_bit(byte: &mut u8, n: u8, enable: bool) {
    if enable {
        *byte |= 1 << n;
    } else {
        *byte &= !(1 << n);
    }
}

fn field_mask(start_bit: u8, length: u8) -> (u8, u8) {
    let shift = (start_bit + 1).saturating_sub(length);
    let mask = (((1u16 << length) - 1) as u8) << shift;
    (mask, shift)
}

/// Field of `length` bits ending at `start_bit`, shifted down
pub fn get_bits(byte: u8, start_bit: u8, length: u8) -> u8 {
    let (mask, shift) = field_mask(start_bit, length);
    (byte & mask) >> shift
}

/// Replaces field of `length` bits ending at `start_bit` with `data`
pub fn set_bits(byte: &mut u8, start_bit: u8, length: u8, data: u8) {
    let (mask, shift) = field_mask(start_bit, length);
    *byte = (*byte & !mask) | ((data << shift) & mask);
}
