use crate::cartridge::{
    cartridge::{Cartridge, CartridgeError, Format, TRAINER_SIZE},
    mapper::Mirroring,
};

/// iNES image whose PRG bytes hold their bank number and whose CHR bytes hold `addr & 0xFF`.
fn image(prg_banks: u8, chr_banks: u8, flags6: u8, flags7: u8) -> Vec<u8> {
    let mut data = vec![b'N', b'E', b'S', 0x1A, prg_banks, chr_banks, flags6, flags7];
    data.resize(16, 0);
    if flags6 & 0x04 != 0 {
        data.extend(std::iter::repeat_n(0xEE, TRAINER_SIZE));
    }
    for bank in 0..prg_banks {
        data.extend(std::iter::repeat_n(bank + 1, 16 * 1024));
    }
    for i in 0..chr_banks as usize * 8 * 1024 {
        data.push(i as u8);
    }
    data
}

#[test]
fn parses_header_fields() {
    let cart = Cartridge::from_bytes(&image(2, 1, 0x01, 0x00)).unwrap();

    assert_eq!(cart.format, Format::INes);
    assert_eq!(cart.mapper_id, 0);
    assert_eq!(cart.mirroring, Mirroring::Vertical);
    assert_eq!(cart.prg_banks, 2);
    assert_eq!(cart.chr_banks, 1);
    assert!(!cart.has_trainer);
}

#[test]
fn horizontal_mirroring_when_bit_clear() {
    let cart = Cartridge::from_bytes(&image(1, 1, 0x00, 0x00)).unwrap();
    assert_eq!(cart.mirroring, Mirroring::Horizontal);
}

#[test]
fn rejects_bad_magic() {
    let mut data = image(1, 1, 0, 0);
    data[3] = 0x00;
    assert!(matches!(
        Cartridge::from_bytes(&data),
        Err(CartridgeError::BadMagic)
    ));
}

#[test]
fn rejects_truncated_prg() {
    let mut data = image(2, 0, 0, 0);
    data.truncate(16 + 20 * 1024);
    match Cartridge::from_bytes(&data) {
        Err(CartridgeError::Truncated {
            section,
            expected,
            actual,
        }) => {
            assert_eq!(section, "PRG ROM");
            assert_eq!(expected, 32 * 1024);
            assert_eq!(actual, 20 * 1024);
        }
        _ => panic!("expected a truncation error"),
    }
}

#[test]
fn rejects_short_header() {
    assert!(matches!(
        Cartridge::from_bytes(b"NES"),
        Err(CartridgeError::Truncated { section: "header", .. })
    ));
}

#[test]
fn rejects_other_mappers() {
    // mapper 4: low nibble from flags 6, high nibble from flags 7
    let data = image(2, 1, 0x40, 0x00);
    assert!(matches!(
        Cartridge::from_bytes(&data),
        Err(CartridgeError::UnsupportedMapper(4))
    ));

    let data = image(2, 1, 0x10, 0x20);
    assert!(matches!(
        Cartridge::from_bytes(&data),
        Err(CartridgeError::UnsupportedMapper(0x21))
    ));
}

#[test]
fn rejects_nrom_without_prg() {
    assert!(matches!(
        Cartridge::from_bytes(&image(0, 1, 0, 0)),
        Err(CartridgeError::PrgBanks(0))
    ));
}

#[test]
fn skips_trainer() {
    let cart = Cartridge::from_bytes(&image(1, 1, 0x04, 0x00)).unwrap();
    assert!(cart.has_trainer);
    assert_eq!(cart.cpu_read(0x8000), 1);
    assert_eq!(cart.ppu_read(0x0005), 5);
}

#[test]
fn detects_nes2_and_extends_bank_counts() {
    let mut data = image(1, 1, 0x00, 0x08);
    data[9] = 0x00;
    let cart = Cartridge::from_bytes(&data).unwrap();
    assert_eq!(cart.format, Format::Nes2);

    // byte 9 nibbles are the high bits of the counts; an iNES image ignores them
    let mut data = image(1, 1, 0x00, 0x00);
    data[9] = 0x11;
    let cart = Cartridge::from_bytes(&data).unwrap();
    assert_eq!(cart.format, Format::INes);
    assert_eq!(cart.prg_banks, 1);

    let mut data = image(1, 1, 0x00, 0x08);
    data[9] = 0x10;
    assert!(matches!(
        Cartridge::from_bytes(&data),
        Err(CartridgeError::Truncated { section: "CHR ROM", .. })
    ));
}

#[test]
fn single_prg_bank_is_mirrored() {
    let mut data = image(1, 1, 0, 0);
    data[16 + 0x1234] = 0x42;
    let cart = Cartridge::from_bytes(&data).unwrap();

    assert_eq!(cart.cpu_read(0x9234), 0x42);
    assert_eq!(cart.cpu_read(0xD234), 0x42);
}

#[test]
fn two_prg_banks_fill_the_window() {
    let cart = Cartridge::from_bytes(&image(2, 1, 0, 0)).unwrap();
    assert_eq!(cart.cpu_read(0x8000), 1);
    assert_eq!(cart.cpu_read(0xBFFF), 1);
    assert_eq!(cart.cpu_read(0xC000), 2);
    assert_eq!(cart.cpu_read(0xFFFF), 2);
}

#[test]
fn prg_rom_ignores_writes() {
    let mut cart = Cartridge::from_bytes(&image(1, 1, 0, 0)).unwrap();
    cart.cpu_write(0x8000, 0x99);
    assert_eq!(cart.cpu_read(0x8000), 1);
}

#[test]
fn chr_rom_ignores_writes() {
    let mut cart = Cartridge::from_bytes(&image(1, 1, 0, 0)).unwrap();
    cart.ppu_write(0x0010, 0x99);
    assert_eq!(cart.ppu_read(0x0010), 0x10);
}

#[test]
fn missing_chr_gives_chr_ram() {
    let mut cart = Cartridge::from_bytes(&image(1, 0, 0, 0)).unwrap();
    assert_eq!(cart.ppu_read(0x1FFF), 0);
    cart.ppu_write(0x1FFF, 0x5A);
    assert_eq!(cart.ppu_read(0x1FFF), 0x5A);
    assert!(cart.report().contains("CHR: 8 KiB RAM"));
}

#[test]
fn report_describes_board() {
    let cart = Cartridge::from_bytes(&image(2, 1, 0x01, 0x00)).unwrap();
    let report = cart.report();
    assert!(report.contains("Format: iNES"));
    assert!(report.contains("Mapper: 0"));
    assert!(report.contains("Mirroring: vertical"));
    assert!(report.contains("PRG ROM: 32 KiB"));
    assert!(report.contains("CHR: 8 KiB"));
}

#[test]
#[should_panic(expected = "below PRG ROM")]
fn cpu_read_below_prg_is_fatal() {
    let cart = Cartridge::from_bytes(&image(1, 1, 0, 0)).unwrap();
    cart.cpu_read(0x6000);
}

#[test]
#[should_panic(expected = "outside CHR")]
fn ppu_read_above_chr_is_fatal() {
    let cart = Cartridge::from_bytes(&image(1, 1, 0, 0)).unwrap();
    cart.ppu_read(0x2000);
}

#[test]
fn load_reports_missing_file() {
    assert!(matches!(
        Cartridge::load("/nonexistent/kestrel/rom.nes"),
        Err(CartridgeError::Io(_))
    ));
}
