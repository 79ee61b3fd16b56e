//! NES PPU (2C02) background pipeline and timing.
//!
//! The PPU walks 262 scanlines (numbered -1..=260) of 341 dots each. Scanline -1 is the
//! pre-render line, 0..=239 are visible, 241 starts vertical blank. On the pre-render and
//! visible lines the background is fetched eight dots per tile into 16-bit shift registers,
//! one pixel is shifted out per visible dot, and the `v` register is advanced the way the
//! hardware does it. Registers: $2000-$2007 (mirrored), reached through [`PPU::cpu_read`]
//! and [`PPU::cpu_write`].

use crate::ppu::{
    bus::PpuBus,
    palette::Palette,
    registers::{
        CTRL_ENABLE_NMI, CTRL_INCREMENT_MODE, CTRL_NAMETABLE_X, CTRL_NAMETABLE_Y,
        CTRL_PATTERN_BACKGROUND, Loopy, MASK_RENDER_BACKGROUND, MASK_RENDER_SPRITES,
        STATUS_VERTICAL_BLANK,
    },
};

pub const SCREEN_WIDTH: usize = 256;
pub const SCREEN_HEIGHT: usize = 240;

pub const DOTS_PER_SCANLINE: u16 = 341;
pub const PRE_RENDER_SCANLINE: i16 = -1;
pub const VBLANK_SCANLINE: i16 = 241;
/// First scanline number that wraps back to the pre-render line.
pub const SCANLINES_END: i16 = 261;

/// Side length in pixels of a rendered pattern table (16×16 tiles of 8×8).
pub const PATTERN_TABLE_SIZE: usize = 128;

/// OAM (Object Attribute Memory): 64 sprites × 4 bytes. Each entry: Y, tile, attr, X.
pub const OAM_LEN: usize = 256;

pub struct PPU {
    pub ctrl: u8,
    pub mask: u8,
    pub status: u8,

    pub oam: [u8; OAM_LEN],
    pub oam_addr: u8,

    /// Current VRAM address.
    pub v: Loopy,
    /// Temporary VRAM address; the top-left of the screen while rendering.
    pub t: Loopy,
    pub fine_x: u8,
    /// Shared first/second write latch of $2005 and $2006.
    pub write_toggle: bool,
    data_buffer: u8,

    bg_next_tile_id: u8,
    bg_next_tile_attrib: u8,
    bg_next_tile_lsb: u8,
    bg_next_tile_msb: u8,
    bg_shifter_pattern_lo: u16,
    bg_shifter_pattern_hi: u16,
    bg_shifter_attrib_lo: u16,
    bg_shifter_attrib_hi: u16,

    pub scanline: i16,
    pub cycle: u16,

    /// Raised at the start of vblank when PPUCTRL enables it; taken by the driver.
    pub nmi: bool,
    /// Raised when the pre-render line comes round again.
    pub frame_complete: bool,
    pub frame_count: u64,

    /// 256×240 framebuffer (0xRRGGBB per pixel). Row-major, left-to-right, top-to-bottom.
    pub framebuffer: Vec<u32>,
    pub system_palette: Palette,
}

impl Default for PPU {
    fn default() -> Self {
        Self::new()
    }
}

impl PPU {
    /// Create PPU in initial state (pre-render scanline -1, cycle 0).
    pub fn new() -> Self {
        Self {
            ctrl: 0,
            mask: 0,
            status: 0,
            oam: [0; OAM_LEN],
            oam_addr: 0,
            v: Loopy::default(),
            t: Loopy::default(),
            fine_x: 0,
            write_toggle: false,
            data_buffer: 0,
            bg_next_tile_id: 0,
            bg_next_tile_attrib: 0,
            bg_next_tile_lsb: 0,
            bg_next_tile_msb: 0,
            bg_shifter_pattern_lo: 0,
            bg_shifter_pattern_hi: 0,
            bg_shifter_attrib_lo: 0,
            bg_shifter_attrib_hi: 0,
            scanline: PRE_RENDER_SCANLINE,
            cycle: 0,
            nmi: false,
            frame_complete: false,
            frame_count: 0,
            framebuffer: vec![0; SCREEN_WIDTH * SCREEN_HEIGHT],
            system_palette: Palette::default(),
        }
    }

    /// Back to the power-up register state. OAM, the framebuffer and the system palette keep
    /// their contents.
    pub fn reset(&mut self) {
        self.ctrl = 0;
        self.mask = 0;
        self.status = 0;
        self.oam_addr = 0;
        self.v = Loopy::default();
        self.t = Loopy::default();
        self.fine_x = 0;
        self.write_toggle = false;
        self.data_buffer = 0;
        self.bg_next_tile_id = 0;
        self.bg_next_tile_attrib = 0;
        self.bg_next_tile_lsb = 0;
        self.bg_next_tile_msb = 0;
        self.bg_shifter_pattern_lo = 0;
        self.bg_shifter_pattern_hi = 0;
        self.bg_shifter_attrib_lo = 0;
        self.bg_shifter_attrib_hi = 0;
        self.scanline = PRE_RENDER_SCANLINE;
        self.cycle = 0;
        self.nmi = false;
        self.frame_complete = false;
        self.frame_count = 0;
    }

    pub fn set_palette(&mut self, palette: Palette) {
        self.system_palette = palette;
    }

    pub fn frame(&self) -> &[u32] {
        &self.framebuffer
    }

    /// Clear and return the NMI output.
    pub fn take_nmi(&mut self) -> bool {
        std::mem::take(&mut self.nmi)
    }

    /// Advance PPU by one dot.
    pub fn clock(&mut self, bus: &mut PpuBus) {
        if self.scanline < 240 {
            if self.scanline == PRE_RENDER_SCANLINE && self.cycle == 1 {
                self.status &= !STATUS_VERTICAL_BLANK;
            }

            if (2..258).contains(&self.cycle) || (321..338).contains(&self.cycle) {
                self.update_shifters();

                match (self.cycle - 1) % 8 {
                    0 => {
                        self.load_background_shifters();
                        self.bg_next_tile_id = bus.read(0x2000 | (self.v.0 & 0x0FFF));
                    }
                    2 => self.fetch_attribute(bus),
                    4 => {
                        self.bg_next_tile_lsb = bus.read(self.pattern_row_addr());
                    }
                    6 => {
                        self.bg_next_tile_msb = bus.read(self.pattern_row_addr() + 8);
                    }
                    7 => self.increment_scroll_x(),
                    _ => {}
                }
            }

            if self.cycle == 256 {
                self.increment_scroll_y();
            }

            if self.cycle == 257 {
                self.load_background_shifters();
                self.transfer_address_x();
            }

            // Unused nametable fetches at the end of the line.
            if self.cycle == 338 || self.cycle == 340 {
                self.bg_next_tile_id = bus.read(0x2000 | (self.v.0 & 0x0FFF));
            }

            if self.scanline == PRE_RENDER_SCANLINE && (280..305).contains(&self.cycle) {
                self.transfer_address_y();
            }
        }

        if self.scanline == VBLANK_SCANLINE && self.cycle == 1 {
            self.status |= STATUS_VERTICAL_BLANK;
            if self.ctrl & CTRL_ENABLE_NMI != 0 {
                self.nmi = true;
            }
        }

        if (0..SCREEN_HEIGHT as i16).contains(&self.scanline)
            && (1..=SCREEN_WIDTH as u16).contains(&self.cycle)
        {
            let (pixel, palette) = self.background_pixel();
            let x = (self.cycle - 1) as usize;
            let y = self.scanline as usize;
            let color = self.color(bus, palette, pixel);
            self.framebuffer[y * SCREEN_WIDTH + x] = color;
        }

        self.cycle += 1;
        if self.cycle >= DOTS_PER_SCANLINE {
            self.cycle = 0;
            self.scanline += 1;
            if self.scanline >= SCANLINES_END {
                self.scanline = PRE_RENDER_SCANLINE;
                self.frame_count += 1;
                self.frame_complete = true;
            }
        }
    }

    /// CPU read of register `reg` (0-7, relative to $2000).
    pub fn cpu_read(&mut self, bus: &PpuBus, reg: u16) -> u8 {
        match reg & 0x0007 {
            // PPUSTATUS: three flag bits over stale bus contents
            2 => {
                let data = (self.status & 0xE0) | (self.data_buffer & 0x1F);
                self.status &= !STATUS_VERTICAL_BLANK;
                self.write_toggle = false;
                data
            }
            // OAMDATA: reads do not increment
            4 => self.oam[self.oam_addr as usize],
            // PPUDATA: one read behind, except palette RAM
            7 => {
                let addr = self.v.0 & 0x3FFF;
                let mut data = self.data_buffer;
                self.data_buffer = bus.read(addr);
                if addr >= 0x3F00 {
                    data = self.data_buffer;
                }
                self.increment_vram_addr();
                data
            }
            reg => panic!(
                "PPU: read of write-only register {} (${:04X})",
                reg,
                0x2000 + reg
            ),
        }
    }

    /// CPU write of register `reg` (0-7, relative to $2000).
    pub fn cpu_write(&mut self, bus: &mut PpuBus, reg: u16, data: u8) {
        match reg & 0x0007 {
            0 => {
                self.ctrl = data;
                self.t.set_nametable_x((data & CTRL_NAMETABLE_X) as u16);
                self.t.set_nametable_y(((data & CTRL_NAMETABLE_Y) >> 1) as u16);
            }
            1 => self.mask = data,
            2 => panic!("PPU: write of read-only status register ($2002)"),
            3 => self.oam_addr = data,
            4 => {
                self.oam[self.oam_addr as usize] = data;
                self.oam_addr = self.oam_addr.wrapping_add(1);
            }
            // PPUSCROLL: X then Y
            5 => {
                if !self.write_toggle {
                    self.fine_x = data & 0x07;
                    self.t.set_coarse_x((data >> 3) as u16);
                } else {
                    self.t.set_fine_y((data & 0x07) as u16);
                    self.t.set_coarse_y((data >> 3) as u16);
                }
                self.write_toggle = !self.write_toggle;
            }
            // PPUADDR: high byte then low byte; the second write lands in v
            6 => {
                if !self.write_toggle {
                    self.t.0 = (self.t.0 & 0x00FF) | (((data & 0x3F) as u16) << 8);
                } else {
                    self.t.0 = (self.t.0 & 0xFF00) | data as u16;
                    self.v = self.t;
                }
                self.write_toggle = !self.write_toggle;
            }
            7 => {
                bus.write(self.v.0 & 0x3FFF, data);
                self.increment_vram_addr();
            }
            _ => unreachable!(),
        }
    }

    /// Render one 4 KiB pattern table (0 or 1) as 128×128 pixels through sub-palette
    /// `palette` (0-7).
    pub fn pattern_table(&self, bus: &PpuBus, table: u8, palette: u8) -> Vec<u32> {
        let mut out = vec![0; PATTERN_TABLE_SIZE * PATTERN_TABLE_SIZE];
        let base = ((table & 1) as u16) << 12;

        for tile_y in 0..16u16 {
            for tile_x in 0..16u16 {
                let tile = base + tile_y * 256 + tile_x * 16;

                for row in 0..8u16 {
                    let mut lsb = bus.read(tile + row);
                    let mut msb = bus.read(tile + row + 8);

                    // low bit is the rightmost pixel
                    for col in 0..8u16 {
                        let pixel = ((msb & 0x01) << 1) | (lsb & 0x01);
                        lsb >>= 1;
                        msb >>= 1;

                        let x = (tile_x * 8 + (7 - col)) as usize;
                        let y = (tile_y * 8 + row) as usize;
                        out[y * PATTERN_TABLE_SIZE + x] = self.color(bus, palette & 0x07, pixel);
                    }
                }
            }
        }
        out
    }

    /// RGB for `pixel` (0-3) of sub-palette `palette` (0-7). Pixel 0 is the shared backdrop.
    pub fn color(&self, bus: &PpuBus, palette: u8, pixel: u8) -> u32 {
        let addr = if pixel == 0 {
            0x3F00
        } else {
            0x3F00 + ((palette as u16) << 2) + pixel as u16
        };
        self.system_palette.color(bus.read(addr))
    }

    fn rendering_enabled(&self) -> bool {
        self.mask & (MASK_RENDER_BACKGROUND | MASK_RENDER_SPRITES) != 0
    }

    fn increment_vram_addr(&mut self) {
        let step = if self.ctrl & CTRL_INCREMENT_MODE != 0 { 32 } else { 1 };
        self.v.0 = self.v.0.wrapping_add(step) & 0x7FFF;
    }

    fn pattern_row_addr(&self) -> u16 {
        let half = ((self.ctrl & CTRL_PATTERN_BACKGROUND) as u16) << 8; // bit 4 -> $1000
        half + ((self.bg_next_tile_id as u16) << 4) + self.v.fine_y()
    }

    fn fetch_attribute(&mut self, bus: &PpuBus) {
        let v = self.v;
        let addr = 0x23C0
            | (v.nametable_y() << 11)
            | (v.nametable_x() << 10)
            | ((v.coarse_y() >> 2) << 3)
            | (v.coarse_x() >> 2);

        // each attribute byte covers 4×4 tiles, two bits per 2×2 quadrant
        let mut attrib = bus.read(addr);
        if v.coarse_y() & 0x02 != 0 {
            attrib >>= 4;
        }
        if v.coarse_x() & 0x02 != 0 {
            attrib >>= 2;
        }
        self.bg_next_tile_attrib = attrib & 0x03;
    }

    fn increment_scroll_x(&mut self) {
        if !self.rendering_enabled() {
            return;
        }
        if self.v.coarse_x() == 31 {
            self.v.set_coarse_x(0);
            self.v.set_nametable_x(self.v.nametable_x() ^ 1);
        } else {
            self.v.set_coarse_x(self.v.coarse_x() + 1);
        }
    }

    fn increment_scroll_y(&mut self) {
        if !self.rendering_enabled() {
            return;
        }
        if self.v.fine_y() < 7 {
            self.v.set_fine_y(self.v.fine_y() + 1);
            return;
        }

        self.v.set_fine_y(0);
        match self.v.coarse_y() {
            // last row of tiles; rows 30 and 31 hold attributes
            29 => {
                self.v.set_coarse_y(0);
                self.v.set_nametable_y(self.v.nametable_y() ^ 1);
            }
            31 => self.v.set_coarse_y(0),
            y => self.v.set_coarse_y(y + 1),
        }
    }

    fn transfer_address_x(&mut self) {
        if self.rendering_enabled() {
            self.v.set_nametable_x(self.t.nametable_x());
            self.v.set_coarse_x(self.t.coarse_x());
        }
    }

    fn transfer_address_y(&mut self) {
        if self.rendering_enabled() {
            self.v.set_fine_y(self.t.fine_y());
            self.v.set_nametable_y(self.t.nametable_y());
            self.v.set_coarse_y(self.t.coarse_y());
        }
    }

    fn load_background_shifters(&mut self) {
        self.bg_shifter_pattern_lo =
            (self.bg_shifter_pattern_lo & 0xFF00) | self.bg_next_tile_lsb as u16;
        self.bg_shifter_pattern_hi =
            (self.bg_shifter_pattern_hi & 0xFF00) | self.bg_next_tile_msb as u16;

        // attributes are per tile, so widen the two bits across all eight pixels
        let lo = if self.bg_next_tile_attrib & 0x01 != 0 { 0xFF } else { 0x00 };
        let hi = if self.bg_next_tile_attrib & 0x02 != 0 { 0xFF } else { 0x00 };
        self.bg_shifter_attrib_lo = (self.bg_shifter_attrib_lo & 0xFF00) | lo;
        self.bg_shifter_attrib_hi = (self.bg_shifter_attrib_hi & 0xFF00) | hi;
    }

    fn update_shifters(&mut self) {
        if self.mask & MASK_RENDER_BACKGROUND != 0 {
            self.bg_shifter_pattern_lo <<= 1;
            self.bg_shifter_pattern_hi <<= 1;
            self.bg_shifter_attrib_lo <<= 1;
            self.bg_shifter_attrib_hi <<= 1;
        }
    }

    /// (pixel, palette) under the fine X tap of the shift registers.
    fn background_pixel(&self) -> (u8, u8) {
        if self.mask & MASK_RENDER_BACKGROUND == 0 {
            return (0, 0);
        }
        let mux = 0x8000 >> self.fine_x;

        let p0 = (self.bg_shifter_pattern_lo & mux != 0) as u8;
        let p1 = (self.bg_shifter_pattern_hi & mux != 0) as u8;
        let a0 = (self.bg_shifter_attrib_lo & mux != 0) as u8;
        let a1 = (self.bg_shifter_attrib_hi & mux != 0) as u8;

        ((p1 << 1) | p0, (a1 << 1) | a0)
    }
}
