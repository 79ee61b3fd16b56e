//! 2C02 system palette: the 64 colours a palette RAM entry can select.
//!
//! Colours are stored as `0x00RRGGBB`, the pixel format of the frame buffer. A replacement
//! palette can be read from a `.pal` file (64 RGB triples).

use std::fs;
use std::io;
use std::path::Path;

use thiserror::Error;

pub const PALETTE_SIZE: usize = 64;
/// Length of a `.pal` file holding one RGB triple per colour.
pub const PAL_FILE_LEN: usize = PALETTE_SIZE * 3;

pub const NES_PALETTE_RGB: [u32; PALETTE_SIZE] = [
    0x545454, 0x001E74, 0x081090, 0x300088, 0x440064, 0x5C0030, 0x540400, 0x3C1800,
    0x202A00, 0x083A00, 0x004000, 0x003C00, 0x00323C, 0x000000, 0x000000, 0x000000,
    0x989698, 0x084CC4, 0x3032EC, 0x5C1EE4, 0x8814B0, 0xA01464, 0x982220, 0x783C00,
    0x545A00, 0x287200, 0x087C00, 0x007628, 0x006678, 0x000000, 0x000000, 0x000000,
    0xECEEEC, 0x4C9AEC, 0x787CEC, 0xB062EC, 0xE454EC, 0xEC58B4, 0xEC6A64, 0xD48820,
    0xA0AA00, 0x74C400, 0x4CD020, 0x38CC6C, 0x38B4CC, 0x3C3C3C, 0x000000, 0x000000,
    0xECEEEC, 0xA8CCEC, 0xBCBCEC, 0xD4B2EC, 0xECAEEC, 0xECAED4, 0xECB4B0, 0xE4C490,
    0xCCD278, 0xB4DE78, 0xA8E290, 0x98E2B4, 0xA0D6E4, 0xA0A2A0, 0x000000, 0x000000,
];

#[derive(Debug, Error)]
pub enum PaletteError {
    #[error("could not read palette file: {0}")]
    Io(#[from] io::Error),
    #[error("palette file is {0} bytes, expected a multiple of {PAL_FILE_LEN}")]
    BadLength(usize),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Palette {
    colors: [u32; PALETTE_SIZE],
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            colors: NES_PALETTE_RGB,
        }
    }
}

impl Palette {
    /// Parse `.pal` data. Files with emphasis variants (several 192-byte blocks) are accepted
    /// and only the first block is used.
    pub fn from_pal_bytes(data: &[u8]) -> Result<Self, PaletteError> {
        if data.is_empty() || data.len() % PAL_FILE_LEN != 0 {
            return Err(PaletteError::BadLength(data.len()));
        }

        let mut colors = [0; PALETTE_SIZE];
        for (color, rgb) in colors.iter_mut().zip(data.chunks_exact(3)) {
            *color = (rgb[0] as u32) << 16 | (rgb[1] as u32) << 8 | rgb[2] as u32;
        }
        Ok(Self { colors })
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, PaletteError> {
        let data = fs::read(path)?;
        Self::from_pal_bytes(&data)
    }

    /// RGB for a palette RAM value; only the low six bits select a colour.
    pub fn color(&self, index: u8) -> u32 {
        self.colors[(index & 0x3F) as usize]
    }
}
