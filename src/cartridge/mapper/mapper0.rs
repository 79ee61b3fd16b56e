//! Mapper 0 ([NROM](https://www.nesdev.org/wiki/NROM)): no bank switching, 16 or 32 KiB PRG,
//! 8 KiB CHR ROM or RAM.

use log::debug;

use crate::cartridge::mapper::mapper::Mapper;

pub const PRG_BANK_SIZE: usize = 16 * 1024;
pub const CHR_BANK_SIZE: usize = 8 * 1024;

pub struct Mapper0 {
    prg_rom: Vec<u8>,
    chr: Vec<u8>,
    chr_is_ram: bool,
    prg_mask: u16,
}

impl Mapper0 {
    /// `prg_rom` must hold one or two 16 KiB banks. An empty `chr_rom` gets 8 KiB of CHR RAM.
    pub fn new(prg_rom: Vec<u8>, chr_rom: Vec<u8>) -> Self {
        // A single bank appears at both $8000 and $C000.
        let prg_mask = if prg_rom.len() > PRG_BANK_SIZE { 0x7FFF } else { 0x3FFF };
        let chr_is_ram = chr_rom.is_empty();
        let chr = if chr_is_ram { vec![0; CHR_BANK_SIZE] } else { chr_rom };

        Self {
            prg_rom,
            chr,
            chr_is_ram,
            prg_mask,
        }
    }
}

impl Mapper for Mapper0 {
    fn cpu_read(&self, addr: u16) -> u8 {
        match addr {
            0x8000..=0xFFFF => self.prg_rom[(addr & self.prg_mask) as usize],
            _ => panic!("NROM: CPU read at ${:04X} is below PRG ROM ($8000-$FFFF)", addr),
        }
    }

    fn cpu_write(&mut self, addr: u16, data: u8) {
        match addr {
            0x8000..=0xFFFF => {
                debug!("NROM: ignored write ${:02X} to PRG ROM at ${:04X}", data, addr)
            }
            _ => panic!("NROM: CPU write at ${:04X} is below PRG ROM ($8000-$FFFF)", addr),
        }
    }

    fn ppu_read(&self, addr: u16) -> u8 {
        match addr {
            0x0000..=0x1FFF => self.chr[addr as usize],
            _ => panic!("NROM: PPU read at ${:04X} is outside CHR ($0000-$1FFF)", addr),
        }
    }

    fn ppu_write(&mut self, addr: u16, data: u8) {
        match addr {
            0x0000..=0x1FFF if self.chr_is_ram => self.chr[addr as usize] = data,
            0x0000..=0x1FFF => {
                debug!("NROM: ignored write ${:02X} to CHR ROM at ${:04X}", data, addr)
            }
            _ => panic!("NROM: PPU write at ${:04X} is outside CHR ($0000-$1FFF)", addr),
        }
    }
}
