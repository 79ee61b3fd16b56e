//! NES emulator entry point.
//!
//! Loads a cartridge and runs the console with a display window.
//! Usage: kestrel [--scale N] [--palette FILE] [--pattern-table] path/to/game.nes

use std::path::PathBuf;
use std::process;
use std::time::{Duration, Instant};

use clap::Parser;
use kestrel::{
    cartridge::cartridge::Cartridge,
    logger,
    nes::Nes,
    ppu::{
        palette::Palette,
        ppu::{PATTERN_TABLE_SIZE, SCREEN_HEIGHT, SCREEN_WIDTH},
    },
};
use log::{LevelFilter, error, info};
use minifb::{Key, KeyRepeat, Scale, Window, WindowOptions};

/// NES runs at ~60.0988 Hz (NTSC). Target one frame per 16.67 ms for ~60 fps.
const FRAME_DURATION: Duration = Duration::from_nanos(16_666_667);

/// Cycle-stepped NES core (NROM, background only)
#[derive(Parser, Debug)]
#[command(name = "kestrel", version, about, long_about = None)]
struct Args {
    /// Path to the iNES ROM file
    rom: PathBuf,

    /// Window scale factor (1, 2, 4 or 8)
    #[arg(short, long, default_value_t = 2, value_parser = parse_scale)]
    scale: u8,

    /// Window title
    #[arg(short, long, default_value = "Kestrel")]
    title: String,

    /// .pal file (64 RGB triples) replacing the built-in 2C02 palette
    #[arg(short, long)]
    palette: Option<PathBuf>,

    /// Show the cartridge's two pattern tables instead of running the game
    #[arg(long)]
    pattern_table: bool,

    /// Log level: off, error, warn, info, debug or trace
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

fn parse_scale(s: &str) -> Result<u8, String> {
    match s.parse::<u8>() {
        Ok(n @ (1 | 2 | 4 | 8)) => Ok(n),
        _ => Err(format!("`{}` is not one of 1, 2, 4, 8", s)),
    }
}

fn window_scale(scale: u8) -> Scale {
    match scale {
        1 => Scale::X1,
        4 => Scale::X4,
        8 => Scale::X8,
        _ => Scale::X2,
    }
}

fn main() {
    let args = Args::parse();

    let level = match args.log_level.parse::<LevelFilter>() {
        Ok(level) => level,
        Err(_) => {
            eprintln!("invalid log level `{}`", args.log_level);
            process::exit(2);
        }
    };
    if let Err(e) = logger::init(level) {
        eprintln!("could not install logger: {}", e);
    }

    let cartridge = match Cartridge::load(&args.rom) {
        Ok(cartridge) => cartridge,
        Err(e) => {
            error!("{}: {}", args.rom.display(), e);
            process::exit(1);
        }
    };

    let mut nes = Nes::new(cartridge);
    if let Some(path) = &args.palette {
        match Palette::from_file(path) {
            Ok(palette) => nes.set_palette(palette),
            Err(e) => {
                error!("{}: {}", path.display(), e);
                process::exit(1);
            }
        }
    }
    nes.reset();

    let result = if args.pattern_table {
        show_pattern_tables(&nes, &args)
    } else {
        run(&mut nes, &args)
    };
    if let Err(e) = result {
        error!("window: {}", e);
        process::exit(1);
    }
}

fn open_window(args: &Args, width: usize, height: usize) -> Result<Window, minifb::Error> {
    Window::new(
        &args.title,
        width,
        height,
        WindowOptions {
            scale: window_scale(args.scale),
            ..WindowOptions::default()
        },
    )
}

fn run(nes: &mut Nes, args: &Args) -> Result<(), minifb::Error> {
    let mut window = open_window(args, SCREEN_WIDTH, SCREEN_HEIGHT)?;

    while window.is_open() && !window.is_key_down(Key::Escape) {
        let frame_start = Instant::now();

        nes.run_frame();
        window.update_with_buffer(nes.frame(), SCREEN_WIDTH, SCREEN_HEIGHT)?;

        // Pace to ~60 fps so we don't burn CPU (emulation is far faster than real NES)
        let elapsed = frame_start.elapsed();
        if elapsed < FRAME_DURATION {
            std::thread::sleep(FRAME_DURATION - elapsed);
        }
    }

    info!("stopped after {} frames", nes.frame_count());
    Ok(())
}

/// Both pattern tables side by side. P cycles through the eight sub-palettes.
fn show_pattern_tables(nes: &Nes, args: &Args) -> Result<(), minifb::Error> {
    let width = PATTERN_TABLE_SIZE * 2;
    let height = PATTERN_TABLE_SIZE;
    let mut window = open_window(args, width, height)?;
    window.set_target_fps(30);

    let mut palette = 0u8;
    let mut buffer = vec![0u32; width * height];

    while window.is_open() && !window.is_key_down(Key::Escape) {
        if window.is_key_pressed(Key::P, KeyRepeat::No) {
            palette = (palette + 1) % 8;
            info!("pattern tables drawn with palette {}", palette);
        }

        for table in 0..2u8 {
            let pixels = nes.pattern_table(table, palette);
            let x0 = table as usize * PATTERN_TABLE_SIZE;
            for (y, row) in pixels.chunks_exact(PATTERN_TABLE_SIZE).enumerate() {
                let start = y * width + x0;
                buffer[start..start + PATTERN_TABLE_SIZE].copy_from_slice(row);
            }
        }

        window.update_with_buffer(&buffer, width, height)?;
    }
    Ok(())
}
