//! 6502 CPU emulation for the NES.
//!
//! Official instruction set plus the 2A03's multi-byte NOPs; every other opcode is a no-op.
//! Memory and I/O go through the [`Bus`](crate::bus::Bus) trait.

pub mod cpu;
pub mod flags;
pub mod instruction;
