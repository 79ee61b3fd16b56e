//! PPU register bits and the internal scroll/address register.
//!
//! See [PPU registers](https://www.nesdev.org/wiki/PPU_registers) and
//! [PPU scrolling](https://www.nesdev.org/wiki/PPU_scrolling) for the `v`/`t` layout.

// PPUCTRL ($2000)
pub const CTRL_NAMETABLE_X: u8 = 1 << 0;
pub const CTRL_NAMETABLE_Y: u8 = 1 << 1;
pub const CTRL_INCREMENT_MODE: u8 = 1 << 2; // 0: +1 across, 1: +32 down
pub const CTRL_PATTERN_BACKGROUND: u8 = 1 << 4;
pub const CTRL_ENABLE_NMI: u8 = 1 << 7;

// PPUMASK ($2001)
pub const MASK_RENDER_BACKGROUND: u8 = 1 << 3;
pub const MASK_RENDER_SPRITES: u8 = 1 << 4;

// PPUSTATUS ($2002); the low five bits are open bus and the sprite flags are never set
pub const STATUS_VERTICAL_BLANK: u8 = 1 << 7;

/// A "loopy" register (`v` or `t`): 15 bits of scroll position that double as the VRAM
/// address used by $2007.
///
/// ```text
/// yyy NN YYYYY XXXXX
/// ||| || ||||| +++++-- coarse X scroll
/// ||| || +++++-------- coarse Y scroll
/// ||| ++-------------- nametable select
/// +++----------------- fine Y scroll
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Loopy(pub u16);

impl Loopy {
    const COARSE_X: u16 = 0x001F;
    const COARSE_Y: u16 = 0x03E0;
    const NAMETABLE_X: u16 = 0x0400;
    const NAMETABLE_Y: u16 = 0x0800;
    const FINE_Y: u16 = 0x7000;

    pub fn coarse_x(self) -> u16 {
        self.0 & Self::COARSE_X
    }

    pub fn coarse_y(self) -> u16 {
        (self.0 & Self::COARSE_Y) >> 5
    }

    pub fn nametable_x(self) -> u16 {
        (self.0 & Self::NAMETABLE_X) >> 10
    }

    pub fn nametable_y(self) -> u16 {
        (self.0 & Self::NAMETABLE_Y) >> 11
    }

    pub fn fine_y(self) -> u16 {
        (self.0 & Self::FINE_Y) >> 12
    }

    pub fn set_coarse_x(&mut self, value: u16) {
        self.0 = (self.0 & !Self::COARSE_X) | (value & 0x1F);
    }

    pub fn set_coarse_y(&mut self, value: u16) {
        self.0 = (self.0 & !Self::COARSE_Y) | ((value & 0x1F) << 5);
    }

    pub fn set_nametable_x(&mut self, value: u16) {
        self.0 = (self.0 & !Self::NAMETABLE_X) | ((value & 1) << 10);
    }

    pub fn set_nametable_y(&mut self, value: u16) {
        self.0 = (self.0 & !Self::NAMETABLE_Y) | ((value & 1) << 11);
    }

    pub fn set_fine_y(&mut self, value: u16) {
        self.0 = (self.0 & !Self::FINE_Y) | ((value & 0x07) << 12);
    }
}
