//! Whole-console runs: CPU, PPU and cartridge clocked together from the master clock.

use kestrel::{
    cartridge::cartridge::Cartridge,
    nes::Nes,
    ppu::palette::NES_PALETTE_RGB,
};

const PRG_SIZE: usize = 16 * 1024;
const CHR_SIZE: usize = 8 * 1024;
const DOTS_PER_FRAME: u64 = 262 * 341;

/// 16 KiB NROM image with `program` at $8000 and `nmi` at $9000.
fn nrom(program: &[u8], nmi: &[u8]) -> Cartridge {
    let mut prg = vec![0xEA; PRG_SIZE];
    prg[..program.len()].copy_from_slice(program);
    prg[0x1000..0x1000 + nmi.len()].copy_from_slice(nmi);

    // NMI $9000, RESET $8000, IRQ $8000
    prg[0x3FFA..].copy_from_slice(&[0x00, 0x90, 0x00, 0x80, 0x00, 0x80]);

    let mut image = vec![b'N', b'E', b'S', 0x1A, 1, 1, 0x01, 0x00];
    image.resize(16, 0);
    image.extend_from_slice(&prg);
    image.extend(std::iter::repeat_n(0u8, CHR_SIZE));
    Cartridge::from_bytes(&image).unwrap()
}

fn boot(program: &[u8], nmi: &[u8]) -> Nes {
    let mut nes = Nes::new(nrom(program, nmi));
    nes.reset();
    nes
}

#[test]
fn every_frame_is_the_same_number_of_dots() {
    // JMP $8000
    let mut nes = boot(&[0x4C, 0x00, 0x80], &[0x40]);

    nes.run_frame();
    assert_eq!(nes.frame_count(), 1);
    assert_eq!(nes.system_clock(), DOTS_PER_FRAME);

    nes.run_frame();
    nes.run_frame();
    assert_eq!(nes.frame_count(), 3);
    assert_eq!(nes.system_clock(), 3 * DOTS_PER_FRAME);
}

#[test]
fn run_frame_after_ticking_across_a_frame_boundary() {
    let mut nes = boot(&[0x4C, 0x00, 0x80], &[0x40]);
    for _ in 0..DOTS_PER_FRAME + 10 {
        nes.tick();
    }
    assert_eq!(nes.frame_count(), 1);

    nes.run_frame();
    assert_eq!(nes.frame_count(), 2);
    assert_eq!(nes.system_clock(), 2 * DOTS_PER_FRAME);
}

#[test]
fn cpu_runs_at_a_third_of_the_dot_rate() {
    let mut nes = boot(&[0x4C, 0x00, 0x80], &[0x40]);
    nes.run_frame();

    // first dot clocks the CPU too
    assert_eq!(nes.cpu.clock_count, DOTS_PER_FRAME.div_ceil(3));
}

#[test]
fn vblank_nmi_fires_once_per_frame() {
    // LDA #$80; STA $2000; loop: JMP loop
    let program = [0xA9, 0x80, 0x8D, 0x00, 0x20, 0x4C, 0x05, 0x80];
    // INC $10; RTI
    let handler = [0xE6, 0x10, 0x40];
    let mut nes = boot(&program, &handler);

    for _ in 0..3 {
        nes.run_frame();
    }
    assert_eq!(nes.bus.ram[0x10], 3);
}

#[test]
fn no_nmi_while_disabled() {
    let mut nes = boot(&[0x4C, 0x00, 0x80], &[0xE6, 0x10, 0x40]);
    nes.run_frame();
    nes.run_frame();
    assert_eq!(nes.bus.ram[0x10], 0);
}

#[test]
fn backdrop_written_in_vblank_fills_the_next_frame() {
    let program = [
        0x2C, 0x02, 0x20, // wait: BIT $2002
        0x10, 0xFB, //       BPL wait
        0xA9, 0x3F, //       LDA #$3F
        0x8D, 0x06, 0x20, // STA $2006
        0xA9, 0x00, //       LDA #$00
        0x8D, 0x06, 0x20, // STA $2006
        0xA9, 0x21, //       LDA #$21
        0x8D, 0x07, 0x20, // STA $2007
        0x4C, 0x14, 0x80, // halt: JMP halt
    ];
    let mut nes = boot(&program, &[0x40]);

    nes.run_frame();
    assert_eq!(nes.bus.ppu_bus.palette[0], 0x21);

    nes.run_frame();
    let expected = NES_PALETTE_RGB[0x21];
    assert!(nes.frame().iter().all(|&pixel| pixel == expected));
}

#[test]
fn step_instruction_finishes_one_instruction() {
    // LDA #$80; STA $2000
    let mut nes = boot(&[0xA9, 0x80, 0x8D, 0x00, 0x20], &[0x40]);

    // reset sequence
    nes.step_instruction();
    assert_eq!(nes.cpu.pc, 0x8000);

    nes.step_instruction();
    assert_eq!(nes.cpu.pc, 0x8002);
    assert_eq!(nes.cpu.a, 0x80);

    nes.step_instruction();
    assert_eq!(nes.cpu.pc, 0x8005);
    assert_eq!(nes.bus.ppu.ctrl, 0x80);
}

#[test]
fn reset_restarts_the_master_clock() {
    let mut nes = boot(&[0x4C, 0x00, 0x80], &[0x40]);
    nes.run_frame();
    nes.reset();

    assert_eq!(nes.system_clock(), 0);
    assert_eq!(nes.frame_count(), 0);
    assert_eq!(nes.cpu.pc, 0x8000);
}

#[test]
fn pattern_tables_render_through_the_palette() {
    let nes = boot(&[0x4C, 0x00, 0x80], &[0x40]);
    let table = nes.pattern_table(0, 0);

    // blank CHR, black backdrop at power-up
    assert_eq!(table.len(), 128 * 128);
    assert!(table.iter().all(|&pixel| pixel == NES_PALETTE_RGB[0]));
}
