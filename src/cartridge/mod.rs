//! Cartridge images and the address translation they carry.
//!
//! - **cartridge**: parses iNES / NES 2.0 images into PRG/CHR memory plus a mapper.
//! - **mapper**: the [`Mapper`](mapper::mapper::Mapper) trait and NROM (mapper 0).

pub mod cartridge;
pub mod mapper;

#[cfg(test)]
mod tests;
