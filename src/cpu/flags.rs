//! 6502 processor status register (P) flag bits.

pub const FLAG_CARRY: u8 = 1 << 0;
pub const FLAG_ZERO: u8 = 1 << 1;
pub const FLAG_INTERRUPT_DISABLE: u8 = 1 << 2;
pub const FLAG_DECIMAL: u8 = 1 << 3;  // Stored, never acted on (2A03 has no BCD)
pub const FLAG_BREAK: u8 = 1 << 4;    // Only meaningful in a pushed copy of P
pub const FLAG_UNUSED: u8 = 1 << 5;   // Always 1 when read on 6502
pub const FLAG_OVERFLOW: u8 = 1 << 6;
pub const FLAG_NEGATIVE: u8 = 1 << 7;

/// True if every bit of `flag` is set in `status`.
#[inline]
pub fn get(status: u8, flag: u8) -> bool {
    status & flag == flag
}

/// Set or clear `flag` in `status`.
#[inline]
pub fn set(status: &mut u8, flag: u8, on: bool) {
    if on {
        *status |= flag;
    } else {
        *status &= !flag;
    }
}
