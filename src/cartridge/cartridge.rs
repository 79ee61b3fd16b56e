//! NES cartridge loading from iNES and NES 2.0 images (.nes files).
//!
//! Implements the [iNES](https://www.nesdev.org/wiki/INES) layout: a 16-byte header (magic
//! "NES\x1A", PRG size in 16 KiB units, CHR size in 8 KiB units, flags 6-7 for mirroring,
//! trainer and mapper number), an optional 512-byte trainer, then PRG ROM, then CHR ROM.
//! [NES 2.0](https://www.nesdev.org/wiki/NES_2.0) images are recognised by bits 2-3 of
//! byte 7 and extend the bank counts with the nibbles of byte 9.

use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use log::info;
use thiserror::Error;

use crate::cartridge::mapper::Mirroring;
use crate::cartridge::mapper::mapper::Mapper;
use crate::cartridge::mapper::mapper0::{CHR_BANK_SIZE, Mapper0, PRG_BANK_SIZE};

pub const HEADER_SIZE: usize = 16;
pub const TRAINER_SIZE: usize = 512;
pub const MAGIC: [u8; 4] = *b"NES\x1A";

const FLAG6_VERTICAL: u8 = 0x01;
const FLAG6_TRAINER: u8 = 0x04;

#[derive(Debug, Error)]
pub enum CartridgeError {
    #[error("could not read ROM file: {0}")]
    Io(#[from] io::Error),
    #[error("not an iNES image (bad magic bytes)")]
    BadMagic,
    #[error("ROM image truncated in {section}: expected {expected} bytes, found {actual}")]
    Truncated {
        section: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("mapper {0} is not supported")]
    UnsupportedMapper(u8),
    #[error("NROM needs one or two 16 KiB PRG banks, image declares {0}")]
    PrgBanks(usize),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    INes,
    Nes2,
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Format::INes => f.write_str("iNES"),
            Format::Nes2 => f.write_str("NES 2.0"),
        }
    }
}

/// Cartridge: the mapper that owns PRG/CHR memory, plus what the header said about the board.
pub struct Cartridge {
    pub mapper: Box<dyn Mapper>,
    pub mapper_id: u8,
    pub mirroring: Mirroring,
    pub format: Format,
    pub prg_banks: usize,
    pub chr_banks: usize,
    pub has_trainer: bool,
}

impl Cartridge {
    /// Read and parse an image from disk.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, CartridgeError> {
        let data = fs::read(path.as_ref())?;
        let cart = Self::from_bytes(&data)?;
        info!("loaded {}", path.as_ref().display());
        Ok(cart)
    }

    /// Parse an image held in memory.
    pub fn from_bytes(data: &[u8]) -> Result<Self, CartridgeError> {
        if data.len() < HEADER_SIZE {
            return Err(CartridgeError::Truncated {
                section: "header",
                expected: HEADER_SIZE,
                actual: data.len(),
            });
        }
        let header = &data[..HEADER_SIZE];
        if header[..4] != MAGIC {
            return Err(CartridgeError::BadMagic);
        }

        let format = if header[7] & 0x0C == 0x08 {
            Format::Nes2
        } else {
            Format::INes
        };

        let mut prg_banks = header[4] as usize;
        let mut chr_banks = header[5] as usize;
        if format == Format::Nes2 {
            prg_banks |= ((header[9] & 0x0F) as usize) << 8;
            chr_banks |= ((header[9] & 0xF0) as usize) << 4;
        }

        let mapper_id = (header[7] & 0xF0) | (header[6] >> 4);
        let mirroring = if header[6] & FLAG6_VERTICAL != 0 {
            Mirroring::Vertical
        } else {
            Mirroring::Horizontal
        };
        let has_trainer = header[6] & FLAG6_TRAINER != 0;

        let mut offset = HEADER_SIZE;
        if has_trainer {
            offset += TRAINER_SIZE;
        }
        let prg_rom = section(data, "PRG ROM", offset, prg_banks * PRG_BANK_SIZE)?;
        offset += prg_rom.len();
        let chr_rom = section(data, "CHR ROM", offset, chr_banks * CHR_BANK_SIZE)?;

        let mapper: Box<dyn Mapper> = match mapper_id {
            0 => {
                if !(1..=2).contains(&prg_banks) {
                    return Err(CartridgeError::PrgBanks(prg_banks));
                }
                Box::new(Mapper0::new(prg_rom.to_vec(), chr_rom.to_vec()))
            }
            id => return Err(CartridgeError::UnsupportedMapper(id)),
        };

        let cart = Self {
            mapper,
            mapper_id,
            mirroring,
            format,
            prg_banks,
            chr_banks,
            has_trainer,
        };
        for line in cart.report().lines() {
            info!("{}", line);
        }
        Ok(cart)
    }

    /// Human-readable summary of the header.
    pub fn report(&self) -> String {
        let chr = if self.chr_banks == 0 {
            format!("{} KiB RAM", CHR_BANK_SIZE / 1024)
        } else {
            format!("{} KiB", self.chr_banks * CHR_BANK_SIZE / 1024)
        };
        format!(
            "Format: {}\nMapper: {}\nMirroring: {}\nPRG ROM: {} KiB\nCHR: {}\nTrainer: {}",
            self.format,
            self.mapper_id,
            self.mirroring,
            self.prg_banks * PRG_BANK_SIZE / 1024,
            chr,
            if self.has_trainer { "yes" } else { "no" }
        )
    }

    /// CPU access to $8000-$FFFF.
    pub fn cpu_read(&self, addr: u16) -> u8 {
        self.mapper.cpu_read(addr)
    }

    pub fn cpu_write(&mut self, addr: u16, data: u8) {
        self.mapper.cpu_write(addr, data);
    }

    /// PPU access to the pattern tables, $0000-$1FFF.
    pub fn ppu_read(&self, addr: u16) -> u8 {
        self.mapper.ppu_read(addr)
    }

    pub fn ppu_write(&mut self, addr: u16, data: u8) {
        self.mapper.ppu_write(addr, data);
    }
}

fn section<'a>(
    data: &'a [u8],
    name: &'static str,
    offset: usize,
    len: usize,
) -> Result<&'a [u8], CartridgeError> {
    let end = offset + len;
    if data.len() < end {
        return Err(CartridgeError::Truncated {
            section: name,
            expected: len,
            actual: data.len().saturating_sub(offset),
        });
    }
    Ok(&data[offset..end])
}
