//! The console: CPU and CPU bus (which owns the PPU and the PPU bus), driven from one master
//! clock running at PPU dot rate.

use log::info;

use crate::{
    bus::CpuBus,
    cartridge::cartridge::Cartridge,
    cpu::cpu::CPU,
    ppu::palette::Palette,
};

/// Frames between progress lines in the log (ten seconds of NTSC video).
const FRAME_LOG_INTERVAL: u64 = 600;

pub struct Nes {
    pub cpu: CPU,
    pub bus: CpuBus,
    system_clock: u64,
}

impl Nes {
    /// Console with `cartridge` inserted, in power-on state. Call [`Nes::reset`] before running.
    pub fn new(cartridge: Cartridge) -> Self {
        let mut bus = CpuBus::new();
        bus.insert_cartridge(cartridge);
        Self {
            cpu: CPU::new(),
            bus,
            system_clock: 0,
        }
    }

    /// Press the reset button.
    pub fn reset(&mut self) {
        self.bus.ppu.reset();
        self.cpu.reset(&mut self.bus);
        self.system_clock = 0;
    }

    /// One master clock: one PPU dot, and one CPU cycle on every third.
    pub fn tick(&mut self) {
        self.bus.ppu.clock(&mut self.bus.ppu_bus);

        if self.system_clock % 3 == 0 {
            self.cpu.clock(&mut self.bus);
        }

        if self.bus.ppu.take_nmi() {
            self.cpu.nmi(&mut self.bus);
        }

        self.system_clock += 1;
    }

    /// Tick until the PPU finishes the current frame.
    pub fn run_frame(&mut self) {
        // a frame may already have ended under `tick` or `step_instruction`
        self.bus.ppu.frame_complete = false;
        while !self.bus.ppu.frame_complete {
            self.tick();
        }

        let frames = self.frame_count();
        if frames % FRAME_LOG_INTERVAL == 0 {
            info!("frame {} ({} CPU cycles)", frames, self.cpu.clock_count);
        }
    }

    /// Tick until the CPU has finished the instruction in flight and completed the next one.
    pub fn step_instruction(&mut self) {
        while self.cpu.complete() {
            self.tick();
        }
        while !self.cpu.complete() {
            self.tick();
        }
    }

    /// 256×240 pixels, 0x00RRGGBB.
    pub fn frame(&self) -> &[u32] {
        self.bus.ppu.frame()
    }

    pub fn frame_count(&self) -> u64 {
        self.bus.ppu.frame_count
    }

    /// Master clocks since the last reset.
    pub fn system_clock(&self) -> u64 {
        self.system_clock
    }

    pub fn set_palette(&mut self, palette: Palette) {
        self.bus.ppu.set_palette(palette);
    }

    /// One CHR pattern table (0 or 1) as 128×128 pixels through sub-palette `palette`.
    pub fn pattern_table(&self, table: u8, palette: u8) -> Vec<u32> {
        self.bus.ppu.pattern_table(&self.bus.ppu_bus, table, palette)
    }
}
