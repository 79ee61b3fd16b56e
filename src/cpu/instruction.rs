//! Opcode decode table.
//!
//! Each of the 256 opcode bytes maps to an [`Instruction`]: mnemonic, addressing mode and
//! base cycle count, as listed in the
//! [6502 instruction reference](https://www.nesdev.org/wiki/6502_instructions). Page-cross
//! and branch penalties are added by the CPU when the instruction runs.
//!
//! Opcodes outside the official set decode as `NOP` (the multi-byte NOPs the 2A03 really has)
//! or `XXX`. Both keep their real addressing mode so the program counter steps over any
//! operand bytes, and both execute as no-ops.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mnemonic {
    Adc, And, Asl, Bcc, Bcs, Beq, Bit, Bmi, Bne, Bpl, Brk, Bvc, Bvs, Clc,
    Cld, Cli, Clv, Cmp, Cpx, Cpy, Dec, Dex, Dey, Eor, Inc, Inx, Iny, Jmp,
    Jsr, Lda, Ldx, Ldy, Lsr, Nop, Ora, Pha, Php, Pla, Plp, Rol, Ror, Rti,
    Rts, Sbc, Sec, Sed, Sei, Sta, Stx, Sty, Tax, Tay, Tsx, Txa, Txs, Tya,
    /// Unofficial or unknown opcode.
    Xxx,
}

impl Mnemonic {
    pub const ALL: [Mnemonic; 57] = {
        use Mnemonic::*;
        [
            Adc, And, Asl, Bcc, Bcs, Beq, Bit, Bmi, Bne, Bpl, Brk, Bvc, Bvs, Clc,
            Cld, Cli, Clv, Cmp, Cpx, Cpy, Dec, Dex, Dey, Eor, Inc, Inx, Iny, Jmp,
            Jsr, Lda, Ldx, Ldy, Lsr, Nop, Ora, Pha, Php, Pla, Plp, Rol, Ror, Rti,
            Rts, Sbc, Sec, Sed, Sei, Sta, Stx, Sty, Tax, Tay, Tsx, Txa, Txs, Tya,
            Xxx,
        ]
    };

    /// Three-letter assembler name, upper case.
    pub fn name(self) -> &'static str {
        use Mnemonic::*;
        match self {
            Adc => "ADC", And => "AND", Asl => "ASL", Bcc => "BCC", Bcs => "BCS",
            Beq => "BEQ", Bit => "BIT", Bmi => "BMI", Bne => "BNE", Bpl => "BPL",
            Brk => "BRK", Bvc => "BVC", Bvs => "BVS", Clc => "CLC", Cld => "CLD",
            Cli => "CLI", Clv => "CLV", Cmp => "CMP", Cpx => "CPX", Cpy => "CPY",
            Dec => "DEC", Dex => "DEX", Dey => "DEY", Eor => "EOR", Inc => "INC",
            Inx => "INX", Iny => "INY", Jmp => "JMP", Jsr => "JSR", Lda => "LDA",
            Ldx => "LDX", Ldy => "LDY", Lsr => "LSR", Nop => "NOP", Ora => "ORA",
            Pha => "PHA", Php => "PHP", Pla => "PLA", Plp => "PLP", Rol => "ROL",
            Ror => "ROR", Rti => "RTI", Rts => "RTS", Sbc => "SBC", Sec => "SEC",
            Sed => "SED", Sei => "SEI", Sta => "STA", Stx => "STX", Sty => "STY",
            Tax => "TAX", Tay => "TAY", Tsx => "TSX", Txa => "TXA", Txs => "TXS",
            Tya => "TYA", Xxx => "XXX",
        }
    }
}

impl fmt::Display for Mnemonic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown mnemonic `{0}`")]
pub struct UnknownMnemonic(pub String);

impl FromStr for Mnemonic {
    type Err = UnknownMnemonic;

    /// Case-insensitive lookup by assembler name (`"adc"`, `"LDA"`, ...).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Mnemonic::ALL
            .iter()
            .copied()
            .find(|m| m.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownMnemonic(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressingMode {
    Implicit,
    Accumulator,
    Immediate,
    ZeroPage,
    ZeroPageX,
    ZeroPageY,
    Absolute,
    AbsoluteX,
    AbsoluteY,
    /// `JMP ($nnnn)` only.
    Indirect,
    /// `(d,X)`
    IndexedIndirect,
    /// `(d),Y`
    IndirectIndexed,
    Relative,
}

impl AddressingMode {
    /// Number of operand bytes following the opcode.
    pub fn operand_len(self) -> u8 {
        use AddressingMode::*;
        match self {
            Implicit | Accumulator => 0,
            Immediate | ZeroPage | ZeroPageX | ZeroPageY | IndexedIndirect | IndirectIndexed
            | Relative => 1,
            Absolute | AbsoluteX | AbsoluteY | Indirect => 2,
        }
    }

    pub fn name(self) -> &'static str {
        use AddressingMode::*;
        match self {
            Implicit => "IMP",
            Accumulator => "ACC",
            Immediate => "IMM",
            ZeroPage => "ZP0",
            ZeroPageX => "ZPX",
            ZeroPageY => "ZPY",
            Absolute => "ABS",
            AbsoluteX => "ABX",
            AbsoluteY => "ABY",
            Indirect => "IND",
            IndexedIndirect => "IZX",
            IndirectIndexed => "IZY",
            Relative => "REL",
        }
    }
}

impl fmt::Display for AddressingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One decode table entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instruction {
    pub mnemonic: Mnemonic,
    pub mode: AddressingMode,
    /// Base cycle count, before page-cross and branch penalties.
    pub cycles: u8,
}

impl Instruction {
    #[inline]
    pub fn decode(opcode: u8) -> &'static Instruction {
        &INSTRUCTIONS[opcode as usize]
    }

    /// Lowest opcode whose entry has this mnemonic and addressing mode.
    pub fn find(mnemonic: Mnemonic, mode: AddressingMode) -> Option<u8> {
        INSTRUCTIONS
            .iter()
            .position(|i| i.mnemonic == mnemonic && i.mode == mode)
            .map(|p| p as u8)
    }

    /// Total instruction length in bytes, opcode included.
    pub fn size(&self) -> u8 {
        1 + self.mode.operand_len()
    }
}

const fn op(mnemonic: Mnemonic, mode: AddressingMode, cycles: u8) -> Instruction {
    Instruction { mnemonic, mode, cycles }
}

use AddressingMode::*;
use Mnemonic::*;

pub static INSTRUCTIONS: [Instruction; 256] = [
    /* 0x00 */ op(Brk, Implicit, 7),
    /* 0x01 */ op(Ora, IndexedIndirect, 6),
    /* 0x02 */ op(Xxx, Implicit, 2),
    /* 0x03 */ op(Xxx, IndexedIndirect, 8),
    /* 0x04 */ op(Nop, ZeroPage, 3),
    /* 0x05 */ op(Ora, ZeroPage, 3),
    /* 0x06 */ op(Asl, ZeroPage, 5),
    /* 0x07 */ op(Xxx, ZeroPage, 5),
    /* 0x08 */ op(Php, Implicit, 3),
    /* 0x09 */ op(Ora, Immediate, 2),
    /* 0x0A */ op(Asl, Accumulator, 2),
    /* 0x0B */ op(Xxx, Immediate, 2),
    /* 0x0C */ op(Nop, Absolute, 4),
    /* 0x0D */ op(Ora, Absolute, 4),
    /* 0x0E */ op(Asl, Absolute, 6),
    /* 0x0F */ op(Xxx, Absolute, 6),
    /* 0x10 */ op(Bpl, Relative, 2),
    /* 0x11 */ op(Ora, IndirectIndexed, 5),
    /* 0x12 */ op(Xxx, Implicit, 2),
    /* 0x13 */ op(Xxx, IndirectIndexed, 8),
    /* 0x14 */ op(Nop, ZeroPageX, 4),
    /* 0x15 */ op(Ora, ZeroPageX, 4),
    /* 0x16 */ op(Asl, ZeroPageX, 6),
    /* 0x17 */ op(Xxx, ZeroPageX, 6),
    /* 0x18 */ op(Clc, Implicit, 2),
    /* 0x19 */ op(Ora, AbsoluteY, 4),
    /* 0x1A */ op(Nop, Implicit, 2),
    /* 0x1B */ op(Xxx, AbsoluteY, 7),
    /* 0x1C */ op(Nop, AbsoluteX, 4),
    /* 0x1D */ op(Ora, AbsoluteX, 4),
    /* 0x1E */ op(Asl, AbsoluteX, 7),
    /* 0x1F */ op(Xxx, AbsoluteX, 7),
    /* 0x20 */ op(Jsr, Absolute, 6),
    /* 0x21 */ op(And, IndexedIndirect, 6),
    /* 0x22 */ op(Xxx, Implicit, 2),
    /* 0x23 */ op(Xxx, IndexedIndirect, 8),
    /* 0x24 */ op(Bit, ZeroPage, 3),
    /* 0x25 */ op(And, ZeroPage, 3),
    /* 0x26 */ op(Rol, ZeroPage, 5),
    /* 0x27 */ op(Xxx, ZeroPage, 5),
    /* 0x28 */ op(Plp, Implicit, 4),
    /* 0x29 */ op(And, Immediate, 2),
    /* 0x2A */ op(Rol, Accumulator, 2),
    /* 0x2B */ op(Xxx, Immediate, 2),
    /* 0x2C */ op(Bit, Absolute, 4),
    /* 0x2D */ op(And, Absolute, 4),
    /* 0x2E */ op(Rol, Absolute, 6),
    /* 0x2F */ op(Xxx, Absolute, 6),
    /* 0x30 */ op(Bmi, Relative, 2),
    /* 0x31 */ op(And, IndirectIndexed, 5),
    /* 0x32 */ op(Xxx, Implicit, 2),
    /* 0x33 */ op(Xxx, IndirectIndexed, 8),
    /* 0x34 */ op(Nop, ZeroPageX, 4),
    /* 0x35 */ op(And, ZeroPageX, 4),
    /* 0x36 */ op(Rol, ZeroPageX, 6),
    /* 0x37 */ op(Xxx, ZeroPageX, 6),
    /* 0x38 */ op(Sec, Implicit, 2),
    /* 0x39 */ op(And, AbsoluteY, 4),
    /* 0x3A */ op(Nop, Implicit, 2),
    /* 0x3B */ op(Xxx, AbsoluteY, 7),
    /* 0x3C */ op(Nop, AbsoluteX, 4),
    /* 0x3D */ op(And, AbsoluteX, 4),
    /* 0x3E */ op(Rol, AbsoluteX, 7),
    /* 0x3F */ op(Xxx, AbsoluteX, 7),
    /* 0x40 */ op(Rti, Implicit, 6),
    /* 0x41 */ op(Eor, IndexedIndirect, 6),
    /* 0x42 */ op(Xxx, Implicit, 2),
    /* 0x43 */ op(Xxx, IndexedIndirect, 8),
    /* 0x44 */ op(Nop, ZeroPage, 3),
    /* 0x45 */ op(Eor, ZeroPage, 3),
    /* 0x46 */ op(Lsr, ZeroPage, 5),
    /* 0x47 */ op(Xxx, ZeroPage, 5),
    /* 0x48 */ op(Pha, Implicit, 3),
    /* 0x49 */ op(Eor, Immediate, 2),
    /* 0x4A */ op(Lsr, Accumulator, 2),
    /* 0x4B */ op(Xxx, Immediate, 2),
    /* 0x4C */ op(Jmp, Absolute, 3),
    /* 0x4D */ op(Eor, Absolute, 4),
    /* 0x4E */ op(Lsr, Absolute, 6),
    /* 0x4F */ op(Xxx, Absolute, 6),
    /* 0x50 */ op(Bvc, Relative, 2),
    /* 0x51 */ op(Eor, IndirectIndexed, 5),
    /* 0x52 */ op(Xxx, Implicit, 2),
    /* 0x53 */ op(Xxx, IndirectIndexed, 8),
    /* 0x54 */ op(Nop, ZeroPageX, 4),
    /* 0x55 */ op(Eor, ZeroPageX, 4),
    /* 0x56 */ op(Lsr, ZeroPageX, 6),
    /* 0x57 */ op(Xxx, ZeroPageX, 6),
    /* 0x58 */ op(Cli, Implicit, 2),
    /* 0x59 */ op(Eor, AbsoluteY, 4),
    /* 0x5A */ op(Nop, Implicit, 2),
    /* 0x5B */ op(Xxx, AbsoluteY, 7),
    /* 0x5C */ op(Nop, AbsoluteX, 4),
    /* 0x5D */ op(Eor, AbsoluteX, 4),
    /* 0x5E */ op(Lsr, AbsoluteX, 7),
    /* 0x5F */ op(Xxx, AbsoluteX, 7),
    /* 0x60 */ op(Rts, Implicit, 6),
    /* 0x61 */ op(Adc, IndexedIndirect, 6),
    /* 0x62 */ op(Xxx, Implicit, 2),
    /* 0x63 */ op(Xxx, IndexedIndirect, 8),
    /* 0x64 */ op(Nop, ZeroPage, 3),
    /* 0x65 */ op(Adc, ZeroPage, 3),
    /* 0x66 */ op(Ror, ZeroPage, 5),
    /* 0x67 */ op(Xxx, ZeroPage, 5),
    /* 0x68 */ op(Pla, Implicit, 4),
    /* 0x69 */ op(Adc, Immediate, 2),
    /* 0x6A */ op(Ror, Accumulator, 2),
    /* 0x6B */ op(Xxx, Immediate, 2),
    /* 0x6C */ op(Jmp, Indirect, 5),
    /* 0x6D */ op(Adc, Absolute, 4),
    /* 0x6E */ op(Ror, Absolute, 6),
    /* 0x6F */ op(Xxx, Absolute, 6),
    /* 0x70 */ op(Bvs, Relative, 2),
    /* 0x71 */ op(Adc, IndirectIndexed, 5),
    /* 0x72 */ op(Xxx, Implicit, 2),
    /* 0x73 */ op(Xxx, IndirectIndexed, 8),
    /* 0x74 */ op(Nop, ZeroPageX, 4),
    /* 0x75 */ op(Adc, ZeroPageX, 4),
    /* 0x76 */ op(Ror, ZeroPageX, 6),
    /* 0x77 */ op(Xxx, ZeroPageX, 6),
    /* 0x78 */ op(Sei, Implicit, 2),
    /* 0x79 */ op(Adc, AbsoluteY, 4),
    /* 0x7A */ op(Nop, Implicit, 2),
    /* 0x7B */ op(Xxx, AbsoluteY, 7),
    /* 0x7C */ op(Nop, AbsoluteX, 4),
    /* 0x7D */ op(Adc, AbsoluteX, 4),
    /* 0x7E */ op(Ror, AbsoluteX, 7),
    /* 0x7F */ op(Xxx, AbsoluteX, 7),
    /* 0x80 */ op(Nop, Immediate, 2),
    /* 0x81 */ op(Sta, IndexedIndirect, 6),
    /* 0x82 */ op(Nop, Immediate, 2),
    /* 0x83 */ op(Xxx, IndexedIndirect, 6),
    /* 0x84 */ op(Sty, ZeroPage, 3),
    /* 0x85 */ op(Sta, ZeroPage, 3),
    /* 0x86 */ op(Stx, ZeroPage, 3),
    /* 0x87 */ op(Xxx, ZeroPage, 3),
    /* 0x88 */ op(Dey, Implicit, 2),
    /* 0x89 */ op(Nop, Immediate, 2),
    /* 0x8A */ op(Txa, Implicit, 2),
    /* 0x8B */ op(Xxx, Immediate, 2),
    /* 0x8C */ op(Sty, Absolute, 4),
    /* 0x8D */ op(Sta, Absolute, 4),
    /* 0x8E */ op(Stx, Absolute, 4),
    /* 0x8F */ op(Xxx, Absolute, 4),
    /* 0x90 */ op(Bcc, Relative, 2),
    /* 0x91 */ op(Sta, IndirectIndexed, 6),
    /* 0x92 */ op(Xxx, Implicit, 2),
    /* 0x93 */ op(Xxx, IndirectIndexed, 6),
    /* 0x94 */ op(Sty, ZeroPageX, 4),
    /* 0x95 */ op(Sta, ZeroPageX, 4),
    /* 0x96 */ op(Stx, ZeroPageY, 4),
    /* 0x97 */ op(Xxx, ZeroPageY, 4),
    /* 0x98 */ op(Tya, Implicit, 2),
    /* 0x99 */ op(Sta, AbsoluteY, 5),
    /* 0x9A */ op(Txs, Implicit, 2),
    /* 0x9B */ op(Xxx, AbsoluteY, 5),
    /* 0x9C */ op(Xxx, AbsoluteX, 5),
    /* 0x9D */ op(Sta, AbsoluteX, 5),
    /* 0x9E */ op(Xxx, AbsoluteY, 5),
    /* 0x9F */ op(Xxx, AbsoluteY, 5),
    /* 0xA0 */ op(Ldy, Immediate, 2),
    /* 0xA1 */ op(Lda, IndexedIndirect, 6),
    /* 0xA2 */ op(Ldx, Immediate, 2),
    /* 0xA3 */ op(Xxx, IndexedIndirect, 6),
    /* 0xA4 */ op(Ldy, ZeroPage, 3),
    /* 0xA5 */ op(Lda, ZeroPage, 3),
    /* 0xA6 */ op(Ldx, ZeroPage, 3),
    /* 0xA7 */ op(Xxx, ZeroPage, 3),
    /* 0xA8 */ op(Tay, Implicit, 2),
    /* 0xA9 */ op(Lda, Immediate, 2),
    /* 0xAA */ op(Tax, Implicit, 2),
    /* 0xAB */ op(Xxx, Immediate, 2),
    /* 0xAC */ op(Ldy, Absolute, 4),
    /* 0xAD */ op(Lda, Absolute, 4),
    /* 0xAE */ op(Ldx, Absolute, 4),
    /* 0xAF */ op(Xxx, Absolute, 4),
    /* 0xB0 */ op(Bcs, Relative, 2),
    /* 0xB1 */ op(Lda, IndirectIndexed, 5),
    /* 0xB2 */ op(Xxx, Implicit, 2),
    /* 0xB3 */ op(Xxx, IndirectIndexed, 5),
    /* 0xB4 */ op(Ldy, ZeroPageX, 4),
    /* 0xB5 */ op(Lda, ZeroPageX, 4),
    /* 0xB6 */ op(Ldx, ZeroPageY, 4),
    /* 0xB7 */ op(Xxx, ZeroPageY, 4),
    /* 0xB8 */ op(Clv, Implicit, 2),
    /* 0xB9 */ op(Lda, AbsoluteY, 4),
    /* 0xBA */ op(Tsx, Implicit, 2),
    /* 0xBB */ op(Xxx, AbsoluteY, 4),
    /* 0xBC */ op(Ldy, AbsoluteX, 4),
    /* 0xBD */ op(Lda, AbsoluteX, 4),
    /* 0xBE */ op(Ldx, AbsoluteY, 4),
    /* 0xBF */ op(Xxx, AbsoluteY, 4),
    /* 0xC0 */ op(Cpy, Immediate, 2),
    /* 0xC1 */ op(Cmp, IndexedIndirect, 6),
    /* 0xC2 */ op(Nop, Immediate, 2),
    /* 0xC3 */ op(Xxx, IndexedIndirect, 8),
    /* 0xC4 */ op(Cpy, ZeroPage, 3),
    /* 0xC5 */ op(Cmp, ZeroPage, 3),
    /* 0xC6 */ op(Dec, ZeroPage, 5),
    /* 0xC7 */ op(Xxx, ZeroPage, 5),
    /* 0xC8 */ op(Iny, Implicit, 2),
    /* 0xC9 */ op(Cmp, Immediate, 2),
    /* 0xCA */ op(Dex, Implicit, 2),
    /* 0xCB */ op(Xxx, Immediate, 2),
    /* 0xCC */ op(Cpy, Absolute, 4),
    /* 0xCD */ op(Cmp, Absolute, 4),
    /* 0xCE */ op(Dec, Absolute, 6),
    /* 0xCF */ op(Xxx, Absolute, 6),
    /* 0xD0 */ op(Bne, Relative, 2),
    /* 0xD1 */ op(Cmp, IndirectIndexed, 5),
    /* 0xD2 */ op(Xxx, Implicit, 2),
    /* 0xD3 */ op(Xxx, IndirectIndexed, 8),
    /* 0xD4 */ op(Nop, ZeroPageX, 4),
    /* 0xD5 */ op(Cmp, ZeroPageX, 4),
    /* 0xD6 */ op(Dec, ZeroPageX, 6),
    /* 0xD7 */ op(Xxx, ZeroPageX, 6),
    /* 0xD8 */ op(Cld, Implicit, 2),
    /* 0xD9 */ op(Cmp, AbsoluteY, 4),
    /* 0xDA */ op(Nop, Implicit, 2),
    /* 0xDB */ op(Xxx, AbsoluteY, 7),
    /* 0xDC */ op(Nop, AbsoluteX, 4),
    /* 0xDD */ op(Cmp, AbsoluteX, 4),
    /* 0xDE */ op(Dec, AbsoluteX, 7),
    /* 0xDF */ op(Xxx, AbsoluteX, 7),
    /* 0xE0 */ op(Cpx, Immediate, 2),
    /* 0xE1 */ op(Sbc, IndexedIndirect, 6),
    /* 0xE2 */ op(Nop, Immediate, 2),
    /* 0xE3 */ op(Xxx, IndexedIndirect, 8),
    /* 0xE4 */ op(Cpx, ZeroPage, 3),
    /* 0xE5 */ op(Sbc, ZeroPage, 3),
    /* 0xE6 */ op(Inc, ZeroPage, 5),
    /* 0xE7 */ op(Xxx, ZeroPage, 5),
    /* 0xE8 */ op(Inx, Implicit, 2),
    /* 0xE9 */ op(Sbc, Immediate, 2),
    /* 0xEA */ op(Nop, Implicit, 2),
    /* 0xEB */ op(Xxx, Immediate, 2),
    /* 0xEC */ op(Cpx, Absolute, 4),
    /* 0xED */ op(Sbc, Absolute, 4),
    /* 0xEE */ op(Inc, Absolute, 6),
    /* 0xEF */ op(Xxx, Absolute, 6),
    /* 0xF0 */ op(Beq, Relative, 2),
    /* 0xF1 */ op(Sbc, IndirectIndexed, 5),
    /* 0xF2 */ op(Xxx, Implicit, 2),
    /* 0xF3 */ op(Xxx, IndirectIndexed, 8),
    /* 0xF4 */ op(Nop, ZeroPageX, 4),
    /* 0xF5 */ op(Sbc, ZeroPageX, 4),
    /* 0xF6 */ op(Inc, ZeroPageX, 6),
    /* 0xF7 */ op(Xxx, ZeroPageX, 6),
    /* 0xF8 */ op(Sed, Implicit, 2),
    /* 0xF9 */ op(Sbc, AbsoluteY, 4),
    /* 0xFA */ op(Nop, Implicit, 2),
    /* 0xFB */ op(Xxx, AbsoluteY, 7),
    /* 0xFC */ op(Nop, AbsoluteX, 4),
    /* 0xFD */ op(Sbc, AbsoluteX, 4),
    /* 0xFE */ op(Inc, AbsoluteX, 7),
    /* 0xFF */ op(Xxx, AbsoluteX, 7),
];
