//! CPU memory bus and address decoding for the NES.
//!
//! See [CPU memory map](https://www.nesdev.org/wiki/CPU_memory_map). Maps CPU addresses to
//! work RAM, the PPU registers, the APU/IO block, and the cartridge.

use std::cell::RefCell;
use std::rc::Rc;

use crate::{
    cartridge::cartridge::Cartridge,
    ppu::{bus::PpuBus, ppu::PPU},
};

pub const RAM_SIZE: usize = 0x0800;
pub const APU_IO_SIZE: usize = 0x18;
pub const APU_IO_TEST_SIZE: usize = 0x08;

/// Memory-mapped access as seen by the CPU.
pub trait Bus {
    fn read(&mut self, addr: u16) -> u8;
    fn write(&mut self, addr: u16, data: u8);
}

/// Main NES bus: RAM, PPU (with its own bus), APU/IO registers, and cartridge.
pub struct CpuBus {
    pub ram: [u8; RAM_SIZE],
    /// $4000-$4017. The APU and controller ports are not emulated; this is plain storage.
    pub apu_io: [u8; APU_IO_SIZE],
    /// $4018-$401F, normally disabled test-mode registers.
    pub apu_io_test: [u8; APU_IO_TEST_SIZE],
    pub ppu: PPU,
    pub ppu_bus: PpuBus,
    cartridge: Option<Rc<RefCell<Cartridge>>>,
}

impl Default for CpuBus {
    fn default() -> Self {
        Self::new()
    }
}

impl CpuBus {
    /// Bus with no cartridge. Cartridge-space accesses panic until one is inserted.
    pub fn new() -> Self {
        Self {
            ram: [0; RAM_SIZE],
            apu_io: [0; APU_IO_SIZE],
            apu_io_test: [0; APU_IO_TEST_SIZE],
            ppu: PPU::new(),
            ppu_bus: PpuBus::new(),
            cartridge: None,
        }
    }

    /// Connect the cartridge to both the CPU and the PPU side.
    pub fn insert_cartridge(&mut self, cartridge: Cartridge) {
        let cartridge = Rc::new(RefCell::new(cartridge));
        self.ppu_bus.insert_cartridge(Rc::clone(&cartridge));
        self.cartridge = Some(cartridge);
    }

    fn cartridge(&self) -> &Rc<RefCell<Cartridge>> {
        match &self.cartridge {
            Some(cartridge) => cartridge,
            None => panic!("CPU bus accessed cartridge space before a cartridge was inserted"),
        }
    }
}

impl Bus for CpuBus {
    fn read(&mut self, addr: u16) -> u8 {
        match addr {
            // Internal RAM (mirrored 4x in 0x0000-0x1FFF)
            0x0000..=0x1FFF => self.ram[(addr & 0x07FF) as usize],
            // PPU registers $2000-$3FFF (mirrored every 8 bytes)
            0x2000..=0x3FFF => self.ppu.cpu_read(&self.ppu_bus, addr & 0x0007),
            0x4000..=0x4017 => self.apu_io[(addr - 0x4000) as usize],
            0x4018..=0x401F => self.apu_io_test[(addr - 0x4018) as usize],
            0x4020..=0xFFFF => self.cartridge().borrow().cpu_read(addr),
        }
    }

    fn write(&mut self, addr: u16, data: u8) {
        match addr {
            0x0000..=0x1FFF => self.ram[(addr & 0x07FF) as usize] = data,
            0x2000..=0x3FFF => self.ppu.cpu_write(&mut self.ppu_bus, addr & 0x0007, data),
            0x4000..=0x4017 => self.apu_io[(addr - 0x4000) as usize] = data,
            0x4018..=0x401F => self.apu_io_test[(addr - 0x4018) as usize] = data,
            0x4020..=0xFFFF => self.cartridge().borrow_mut().cpu_write(addr, data),
        }
    }
}
