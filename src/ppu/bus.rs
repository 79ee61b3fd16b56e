//! PPU address space ($0000-$3FFF).
//!
//! See [PPU memory map](https://www.nesdev.org/wiki/PPU_memory_map):
//! pattern tables live on the cartridge, the four nametables fold onto 2 KiB of console VRAM
//! according to the board's mirroring, and the top of the space is 32 bytes of palette RAM.

use std::cell::RefCell;
use std::rc::Rc;

use crate::cartridge::{cartridge::Cartridge, mapper::Mirroring};

pub const VRAM_SIZE: usize = 0x800;
pub const PALETTE_RAM_SIZE: usize = 32;

pub struct PpuBus {
    /// Two 1 KiB nametable banks.
    pub vram: [u8; VRAM_SIZE],
    /// Palette RAM $3F00-$3F1F.
    pub palette: [u8; PALETTE_RAM_SIZE],
    cartridge: Option<Rc<RefCell<Cartridge>>>,
}

impl Default for PpuBus {
    fn default() -> Self {
        Self::new()
    }
}

impl PpuBus {
    pub fn new() -> Self {
        Self {
            vram: [0; VRAM_SIZE],
            palette: [0; PALETTE_RAM_SIZE],
            cartridge: None,
        }
    }

    pub fn insert_cartridge(&mut self, cartridge: Rc<RefCell<Cartridge>>) {
        self.cartridge = Some(cartridge);
    }

    fn cartridge(&self) -> &Rc<RefCell<Cartridge>> {
        match &self.cartridge {
            Some(cartridge) => cartridge,
            None => panic!("PPU bus accessed before a cartridge was inserted"),
        }
    }

    pub fn read(&self, addr: u16) -> u8 {
        match addr {
            0x0000..=0x1FFF => self.cartridge().borrow().ppu_read(addr),
            0x2000..=0x3EFF => self.vram[self.nametable_index(addr)],
            0x3F00..=0x3FFF => self.palette[Self::palette_index(addr)],
            _ => panic!("PPU bus: read at ${:04X} is outside $0000-$3FFF", addr),
        }
    }

    pub fn write(&mut self, addr: u16, data: u8) {
        match addr {
            0x0000..=0x1FFF => self.cartridge().borrow_mut().ppu_write(addr, data),
            0x2000..=0x3EFF => {
                let index = self.nametable_index(addr);
                self.vram[index] = data;
            }
            // palette entries are six bits wide
            0x3F00..=0x3FFF => self.palette[Self::palette_index(addr)] = data & 0x3F,
            _ => panic!("PPU bus: write at ${:04X} is outside $0000-$3FFF", addr),
        }
    }

    /// Map $2000-$3EFF to an offset in the 2 KiB of VRAM. $3000-$3EFF repeats $2000-$2EFF.
    pub fn nametable_index(&self, addr: u16) -> usize {
        let offset = (addr & 0x03FF) as usize;
        let bank = match self.cartridge().borrow().mirroring {
            // $2000 = $2400, $2800 = $2C00
            Mirroring::Horizontal => (addr >> 11) & 1,
            // $2000 = $2800, $2400 = $2C00
            Mirroring::Vertical => (addr >> 10) & 1,
        };
        bank as usize * 0x400 + offset
    }

    /// Map $3F00-$3FFF to one of the 32 palette bytes. The backdrop slots of the sprite
    /// palettes ($3F10/$3F14/$3F18/$3F1C) are the same bytes as $3F00/$3F04/$3F08/$3F0C.
    pub fn palette_index(addr: u16) -> usize {
        let index = (addr & 0x1F) as usize;
        match index {
            0x10 | 0x14 | 0x18 | 0x1C => index - 0x10,
            _ => index,
        }
    }
}
