//! Kestrel: a cycle-stepped NES (Nintendo Entertainment System) core written in Rust.
//!
//! Implements the parts of the NES chipset documented on the
//! [NESdev Wiki](https://www.nesdev.org/wiki/NES_reference_guide) that a background-only
//! NROM game needs: the Ricoh 2A03 CPU core, the 2C02 PPU background pipeline, both memory
//! buses, and mapper 0 cartridges.
//!
//! ## Modules (NESdev references)
//!
//! - **bus** – [CPU memory map](https://www.nesdev.org/wiki/CPU_memory_map): RAM, PPU
//!   registers, APU/IO block, cartridge
//! - **cartridge** – [iNES](https://www.nesdev.org/wiki/INES) / [NES 2.0](https://www.nesdev.org/wiki/NES_2.0)
//!   loading; [NROM](https://www.nesdev.org/wiki/NROM) (mapper 0)
//! - **cpu** – [6502](https://www.nesdev.org/wiki/CPU) / 2A03: decode table, addressing modes,
//!   [NMI](https://www.nesdev.org/wiki/NMI) and IRQ entry
//! - **ppu** – [PPU](https://www.nesdev.org/wiki/PPU), [scrolling](https://www.nesdev.org/wiki/PPU_scrolling),
//!   [rendering](https://www.nesdev.org/wiki/PPU_rendering), palette, 256×240 frame
//! - **nes** – the master clock tying CPU and PPU together (3 PPU dots per CPU cycle)
//! - **logger** – coloured stderr backend for the `log` facade

pub mod bus;
pub mod cartridge;
pub mod cpu;
pub mod logger;
pub mod nes;
pub mod ppu;
