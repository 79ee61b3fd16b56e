//! Cartridge mappers: PRG/CHR address translation and nametable mirroring.

use std::fmt;

/// Nametable mirroring selected by the board (iNES flags 6, bit 0).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mirroring {
    /// $2000 = $2400 and $2800 = $2C00 (vertical scrolling games).
    Horizontal,
    /// $2000 = $2800 and $2400 = $2C00 (horizontal scrolling games).
    Vertical,
}

impl fmt::Display for Mirroring {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mirroring::Horizontal => f.write_str("horizontal"),
            Mirroring::Vertical => f.write_str("vertical"),
        }
    }
}

pub mod mapper;

pub mod mapper0;
