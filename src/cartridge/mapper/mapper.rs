//! Mapper trait: how the CPU and PPU sides of the cartridge connector see its memory.

/// Address translation for one cartridge board.
///
/// The CPU side covers $8000-$FFFF and the PPU side covers $0000-$1FFF. An address outside
/// the side's window means the bus above routed it wrongly, so implementations panic.
pub trait Mapper {
    fn cpu_read(&self, addr: u16) -> u8;
    fn cpu_write(&mut self, addr: u16, data: u8);
    fn ppu_read(&self, addr: u16) -> u8;
    fn ppu_write(&mut self, addr: u16, data: u8);
}
