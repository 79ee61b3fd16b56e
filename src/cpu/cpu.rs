//! 2A03 CPU core (a 6502 without decimal mode).
//!
//! The core is cycle-stepped: [`CPU::clock`] advances exactly one CPU cycle. An instruction
//! executes in full on the cycle its opcode is fetched and then occupies the remaining
//! cycles of its cost, so the externally visible timing is per-instruction exact.
//! Decode goes through the static table in [`crate::cpu::instruction`]; the addressing-mode
//! resolver and the operation are two closed `match` dispatchers over that table's enums.
//!
//! The CPU does not own its bus. Every entry point that touches memory borrows one for the
//! duration of the call, so the CPU and the PPU can never observe each other half-updated.

use log::{Level, debug, log_enabled, trace, warn};

use crate::{
    bus::Bus,
    cpu::{
        flags::{
            self, FLAG_BREAK, FLAG_CARRY, FLAG_DECIMAL, FLAG_INTERRUPT_DISABLE, FLAG_NEGATIVE,
            FLAG_OVERFLOW, FLAG_UNUSED, FLAG_ZERO,
        },
        instruction::{AddressingMode, Instruction, Mnemonic},
    },
};

pub const NMI_VECTOR: u16 = 0xFFFA;
pub const RESET_VECTOR: u16 = 0xFFFC;
pub const IRQ_VECTOR: u16 = 0xFFFE;
pub const STACK_PAGE: u16 = 0x0100;

pub struct CPU {
    pub a: u8,
    pub x: u8,
    pub y: u8,
    pub sp: u8,
    pub pc: u16,
    pub status: u8,
    /// Cycles left before the next opcode fetch.
    pub cycles: u8,
    /// Cycles elapsed since power-on.
    pub clock_count: u64,

    // Decode/execute scratch, rewritten by every instruction.
    opcode: u8,
    mode: AddressingMode,
    fetched: u8,
    addr_abs: u16,
    addr_rel: i8,

    reported_unknown: [bool; 256],
}

impl Default for CPU {
    fn default() -> Self {
        Self::new()
    }
}

impl CPU {
    /// Power-on state. Call [`CPU::reset`] before clocking so PC comes from the reset vector.
    pub fn new() -> Self {
        Self {
            a: 0,
            x: 0,
            y: 0,
            sp: 0xFD,
            pc: 0,
            status: FLAG_UNUSED | FLAG_INTERRUPT_DISABLE,
            cycles: 0,
            clock_count: 0,
            opcode: 0,
            mode: AddressingMode::Implicit,
            fetched: 0,
            addr_abs: 0,
            addr_rel: 0,
            reported_unknown: [false; 256],
        }
    }

    pub fn reset<B: Bus>(&mut self, bus: &mut B) {
        self.pc = Self::read_vector(bus, RESET_VECTOR);

        self.sp = 0xFD; // resets at 0xFD instead of 0xFF for some reason
        self.status = FLAG_INTERRUPT_DISABLE | FLAG_UNUSED;

        self.a = 0;
        self.x = 0;
        self.y = 0;

        self.opcode = 0;
        self.fetched = 0;
        self.addr_abs = 0;
        self.addr_rel = 0;

        self.cycles = 7;
    }

    /// Advance one CPU cycle. When the previous instruction has used up its cycles, the next
    /// one is fetched, decoded and executed, and its cost becomes the new countdown.
    pub fn clock<B: Bus>(&mut self, bus: &mut B) {
        if self.cycles == 0 {
            let pc = self.pc;
            self.opcode = self.fetch_byte(bus);
            self.status |= FLAG_UNUSED;

            let instruction = Instruction::decode(self.opcode);
            if log_enabled!(Level::Trace) {
                self.trace(pc, instruction);
            }

            self.cycles = instruction.cycles;
            self.mode = instruction.mode;

            let page_crossed = self.resolve(bus);
            let pays_penalty = self.execute(instruction.mnemonic, bus);
            if page_crossed && pays_penalty {
                self.cycles += 1;
            }

            self.status |= FLAG_UNUSED;
        }

        self.clock_count += 1;
        self.cycles -= 1;
    }

    /// True between instructions (the next `clock` fetches a new opcode).
    pub fn complete(&self) -> bool {
        self.cycles == 0
    }

    /// Clock until the current instruction, or the pending reset/interrupt sequence, has
    /// finished. Returns the number of cycles that took.
    pub fn step<B: Bus>(&mut self, bus: &mut B) -> u32 {
        let mut elapsed = 0;
        loop {
            self.clock(bus);
            elapsed += 1;
            if self.complete() {
                return elapsed;
            }
        }
    }

    /// Opcode of the instruction most recently fetched.
    pub fn opcode(&self) -> u8 {
        self.opcode
    }

    /// Maskable interrupt request. Ignored while the I flag is set.
    pub fn irq<B: Bus>(&mut self, bus: &mut B) {
        if self.status & FLAG_INTERRUPT_DISABLE != 0 {
            debug!("IRQ masked at ${:04X}", self.pc);
            return;
        }

        debug!("IRQ taken at ${:04X}", self.pc);
        self.interrupt(bus, IRQ_VECTOR);
        self.cycles = 7;
    }

    /// Non-maskable interrupt, raised by the PPU at the start of vblank.
    pub fn nmi<B: Bus>(&mut self, bus: &mut B) {
        debug!("NMI taken at ${:04X}", self.pc);
        self.interrupt(bus, NMI_VECTOR);
        self.cycles = 8;
    }

    fn interrupt<B: Bus>(&mut self, bus: &mut B, vector: u16) {
        self.push(bus, (self.pc >> 8) as u8);
        self.push(bus, self.pc as u8);

        flags::set(&mut self.status, FLAG_BREAK, false);
        flags::set(&mut self.status, FLAG_UNUSED, true);
        flags::set(&mut self.status, FLAG_INTERRUPT_DISABLE, true);
        self.push(bus, self.status);

        self.pc = Self::read_vector(bus, vector);
    }

    fn trace(&self, pc: u16, instruction: &Instruction) {
        trace!(
            "{:04X}  {:02X}  {} {}  A:{:02X} X:{:02X} Y:{:02X} P:{:02X} SP:{:02X} CYC:{}",
            pc,
            self.opcode,
            instruction.mnemonic,
            instruction.mode,
            self.a,
            self.x,
            self.y,
            self.status,
            self.sp,
            self.clock_count
        );
    }

    fn read_vector<B: Bus>(bus: &mut B, vector: u16) -> u16 {
        let lo = bus.read(vector) as u16;
        let hi = bus.read(vector.wrapping_add(1)) as u16;
        (hi << 8) | lo
    }

    fn fetch_byte<B: Bus>(&mut self, bus: &mut B) -> u8 {
        let byte = bus.read(self.pc);
        self.pc = self.pc.wrapping_add(1);
        byte
    }

    fn fetch_word<B: Bus>(&mut self, bus: &mut B) -> u16 {
        let lo = self.fetch_byte(bus) as u16;
        let hi = self.fetch_byte(bus) as u16;
        (hi << 8) | lo
    }

    fn push<B: Bus>(&mut self, bus: &mut B, value: u8) {
        bus.write(STACK_PAGE | self.sp as u16, value);
        self.sp = self.sp.wrapping_sub(1);
    }

    fn pop<B: Bus>(&mut self, bus: &mut B) -> u8 {
        self.sp = self.sp.wrapping_add(1);
        bus.read(STACK_PAGE | self.sp as u16)
    }

    /// Resolve the current addressing mode into `addr_abs` / `addr_rel` (or `fetched` for
    /// register operands). Returns true when indexing crossed a page.
    fn resolve<B: Bus>(&mut self, bus: &mut B) -> bool {
        match self.mode {
            AddressingMode::Implicit | AddressingMode::Accumulator => {
                self.fetched = self.a;
                false
            }
            AddressingMode::Immediate => {
                self.addr_abs = self.pc;
                self.pc = self.pc.wrapping_add(1);
                false
            }
            AddressingMode::ZeroPage => {
                self.addr_abs = self.fetch_byte(bus) as u16;
                false
            }
            // Indexed zero page never leaves page zero.
            AddressingMode::ZeroPageX => {
                self.addr_abs = self.fetch_byte(bus).wrapping_add(self.x) as u16;
                false
            }
            AddressingMode::ZeroPageY => {
                self.addr_abs = self.fetch_byte(bus).wrapping_add(self.y) as u16;
                false
            }
            AddressingMode::Relative => {
                self.addr_rel = self.fetch_byte(bus) as i8;
                false
            }
            AddressingMode::Absolute => {
                self.addr_abs = self.fetch_word(bus);
                false
            }
            AddressingMode::AbsoluteX => {
                let base = self.fetch_word(bus);
                self.addr_abs = base.wrapping_add(self.x as u16);
                (base & 0xFF00) != (self.addr_abs & 0xFF00)
            }
            AddressingMode::AbsoluteY => {
                let base = self.fetch_word(bus);
                self.addr_abs = base.wrapping_add(self.y as u16);
                (base & 0xFF00) != (self.addr_abs & 0xFF00)
            }
            AddressingMode::Indirect => {
                let ptr = self.fetch_word(bus);
                let lo = bus.read(ptr) as u16;
                // page-boundary bug: the high byte never comes from the next page
                let hi_addr = (ptr & 0xFF00) | (ptr.wrapping_add(1) & 0x00FF);
                let hi = bus.read(hi_addr) as u16;
                self.addr_abs = (hi << 8) | lo;
                false
            }
            AddressingMode::IndexedIndirect => {
                let ptr = self.fetch_byte(bus).wrapping_add(self.x);
                let lo = bus.read(ptr as u16) as u16;
                let hi = bus.read(ptr.wrapping_add(1) as u16) as u16;
                self.addr_abs = (hi << 8) | lo;
                false
            }
            AddressingMode::IndirectIndexed => {
                let ptr = self.fetch_byte(bus);
                let lo = bus.read(ptr as u16) as u16;
                let hi = bus.read(ptr.wrapping_add(1) as u16) as u16;
                let base = (hi << 8) | lo;
                self.addr_abs = base.wrapping_add(self.y as u16);
                (base & 0xFF00) != (self.addr_abs & 0xFF00)
            }
        }
    }

    /// Operand value for the current instruction.
    fn fetch<B: Bus>(&mut self, bus: &mut B) -> u8 {
        if !matches!(self.mode, AddressingMode::Implicit | AddressingMode::Accumulator) {
            self.fetched = bus.read(self.addr_abs);
        }
        self.fetched
    }

    /// Write a read-modify-write result back to A or memory, depending on the mode.
    fn store<B: Bus>(&mut self, bus: &mut B, value: u8) {
        if matches!(self.mode, AddressingMode::Implicit | AddressingMode::Accumulator) {
            self.a = value;
        } else {
            bus.write(self.addr_abs, value);
        }
    }

    /// Run one operation. Returns true if the operation pays the page-cross penalty.
    fn execute<B: Bus>(&mut self, mnemonic: Mnemonic, bus: &mut B) -> bool {
        match mnemonic {
            Mnemonic::Adc => {
                let value = self.fetch(bus);
                self.add_with_carry(value);
                true
            }
            // A - M - (1 - C) == A + !M + C
            Mnemonic::Sbc => {
                let value = self.fetch(bus);
                self.add_with_carry(value ^ 0xFF);
                true
            }
            Mnemonic::And => {
                let value = self.fetch(bus);
                self.a &= value;
                self.update_zero_and_negative_flags(self.a);
                true
            }
            Mnemonic::Ora => {
                let value = self.fetch(bus);
                self.a |= value;
                self.update_zero_and_negative_flags(self.a);
                true
            }
            Mnemonic::Eor => {
                let value = self.fetch(bus);
                self.a ^= value;
                self.update_zero_and_negative_flags(self.a);
                true
            }
            Mnemonic::Asl => {
                let value = self.fetch(bus);
                let result = value << 1;
                flags::set(&mut self.status, FLAG_CARRY, value & 0x80 != 0);
                self.update_zero_and_negative_flags(result);
                self.store(bus, result);
                false
            }
            Mnemonic::Lsr => {
                let value = self.fetch(bus);
                let result = value >> 1;
                flags::set(&mut self.status, FLAG_CARRY, value & 0x01 != 0);
                self.update_zero_and_negative_flags(result);
                self.store(bus, result);
                false
            }
            Mnemonic::Rol => {
                let value = self.fetch(bus);
                let result = (value << 1) | (self.status & FLAG_CARRY);
                flags::set(&mut self.status, FLAG_CARRY, value & 0x80 != 0);
                self.update_zero_and_negative_flags(result);
                self.store(bus, result);
                false
            }
            Mnemonic::Ror => {
                let value = self.fetch(bus);
                let result = ((self.status & FLAG_CARRY) << 7) | (value >> 1);
                flags::set(&mut self.status, FLAG_CARRY, value & 0x01 != 0);
                self.update_zero_and_negative_flags(result);
                self.store(bus, result);
                false
            }
            Mnemonic::Bit => {
                let value = self.fetch(bus);
                flags::set(&mut self.status, FLAG_ZERO, self.a & value == 0);
                flags::set(&mut self.status, FLAG_NEGATIVE, value & 0x80 != 0);
                flags::set(&mut self.status, FLAG_OVERFLOW, value & 0x40 != 0);
                false
            }
            Mnemonic::Cmp => {
                let value = self.fetch(bus);
                self.compare(self.a, value);
                true
            }
            Mnemonic::Cpx => {
                let value = self.fetch(bus);
                self.compare(self.x, value);
                false
            }
            Mnemonic::Cpy => {
                let value = self.fetch(bus);
                self.compare(self.y, value);
                false
            }
            Mnemonic::Lda => {
                self.a = self.fetch(bus);
                self.update_zero_and_negative_flags(self.a);
                true
            }
            Mnemonic::Ldx => {
                self.x = self.fetch(bus);
                self.update_zero_and_negative_flags(self.x);
                true
            }
            Mnemonic::Ldy => {
                self.y = self.fetch(bus);
                self.update_zero_and_negative_flags(self.y);
                true
            }
            Mnemonic::Sta => {
                bus.write(self.addr_abs, self.a);
                false
            }
            Mnemonic::Stx => {
                bus.write(self.addr_abs, self.x);
                false
            }
            Mnemonic::Sty => {
                bus.write(self.addr_abs, self.y);
                false
            }
            Mnemonic::Inc => {
                let result = self.fetch(bus).wrapping_add(1);
                bus.write(self.addr_abs, result);
                self.update_zero_and_negative_flags(result);
                false
            }
            Mnemonic::Dec => {
                let result = self.fetch(bus).wrapping_sub(1);
                bus.write(self.addr_abs, result);
                self.update_zero_and_negative_flags(result);
                false
            }
            Mnemonic::Inx => {
                self.x = self.x.wrapping_add(1);
                self.update_zero_and_negative_flags(self.x);
                false
            }
            Mnemonic::Iny => {
                self.y = self.y.wrapping_add(1);
                self.update_zero_and_negative_flags(self.y);
                false
            }
            Mnemonic::Dex => {
                self.x = self.x.wrapping_sub(1);
                self.update_zero_and_negative_flags(self.x);
                false
            }
            Mnemonic::Dey => {
                self.y = self.y.wrapping_sub(1);
                self.update_zero_and_negative_flags(self.y);
                false
            }
            Mnemonic::Bcc => self.branch(!flags::get(self.status, FLAG_CARRY)),
            Mnemonic::Bcs => self.branch(flags::get(self.status, FLAG_CARRY)),
            Mnemonic::Beq => self.branch(flags::get(self.status, FLAG_ZERO)),
            Mnemonic::Bne => self.branch(!flags::get(self.status, FLAG_ZERO)),
            Mnemonic::Bmi => self.branch(flags::get(self.status, FLAG_NEGATIVE)),
            Mnemonic::Bpl => self.branch(!flags::get(self.status, FLAG_NEGATIVE)),
            Mnemonic::Bvs => self.branch(flags::get(self.status, FLAG_OVERFLOW)),
            Mnemonic::Bvc => self.branch(!flags::get(self.status, FLAG_OVERFLOW)),
            Mnemonic::Jmp => {
                self.pc = self.addr_abs;
                false
            }
            Mnemonic::Jsr => {
                let return_addr = self.pc.wrapping_sub(1);
                self.push(bus, (return_addr >> 8) as u8);
                self.push(bus, return_addr as u8);
                self.pc = self.addr_abs;
                false
            }
            Mnemonic::Rts => {
                let lo = self.pop(bus) as u16;
                let hi = self.pop(bus) as u16;
                self.pc = ((hi << 8) | lo).wrapping_add(1);
                false
            }
            Mnemonic::Brk => {
                self.pc = self.pc.wrapping_add(1); // +1 because of padding byte

                self.status |= FLAG_INTERRUPT_DISABLE;
                self.push(bus, (self.pc >> 8) as u8);
                self.push(bus, self.pc as u8);

                self.status |= FLAG_BREAK;
                self.push(bus, self.status);
                self.status &= !FLAG_BREAK;

                self.pc = Self::read_vector(bus, IRQ_VECTOR);
                false
            }
            Mnemonic::Rti => {
                let status = self.pop(bus);
                self.status = (status & !FLAG_BREAK) | FLAG_UNUSED;

                let lo = self.pop(bus) as u16;
                let hi = self.pop(bus) as u16;
                self.pc = (hi << 8) | lo;
                false
            }
            Mnemonic::Pha => {
                self.push(bus, self.a);
                false
            }
            Mnemonic::Php => {
                self.push(bus, self.status | FLAG_BREAK | FLAG_UNUSED);
                false
            }
            Mnemonic::Pla => {
                self.a = self.pop(bus);
                self.update_zero_and_negative_flags(self.a);
                false
            }
            Mnemonic::Plp => {
                let value = self.pop(bus);
                self.status = (value & !FLAG_BREAK) | FLAG_UNUSED;
                false
            }
            Mnemonic::Clc => self.assign_flag(FLAG_CARRY, false),
            Mnemonic::Cld => self.assign_flag(FLAG_DECIMAL, false),
            Mnemonic::Cli => self.assign_flag(FLAG_INTERRUPT_DISABLE, false),
            Mnemonic::Clv => self.assign_flag(FLAG_OVERFLOW, false),
            Mnemonic::Sec => self.assign_flag(FLAG_CARRY, true),
            Mnemonic::Sed => self.assign_flag(FLAG_DECIMAL, true),
            Mnemonic::Sei => self.assign_flag(FLAG_INTERRUPT_DISABLE, true),
            Mnemonic::Tax => {
                self.x = self.a;
                self.update_zero_and_negative_flags(self.x);
                false
            }
            Mnemonic::Tay => {
                self.y = self.a;
                self.update_zero_and_negative_flags(self.y);
                false
            }
            Mnemonic::Txa => {
                self.a = self.x;
                self.update_zero_and_negative_flags(self.a);
                false
            }
            Mnemonic::Tya => {
                self.a = self.y;
                self.update_zero_and_negative_flags(self.a);
                false
            }
            Mnemonic::Tsx => {
                self.x = self.sp;
                self.update_zero_and_negative_flags(self.x);
                false
            }
            Mnemonic::Txs => {
                self.sp = self.x;
                false
            }
            // Only the absolute,X forms can cross a page.
            Mnemonic::Nop => true,
            Mnemonic::Xxx => {
                if !self.reported_unknown[self.opcode as usize] {
                    self.reported_unknown[self.opcode as usize] = true;
                    let size = Instruction::decode(self.opcode).size();
                    warn!(
                        "unofficial opcode ${:02X} at ${:04X} executed as NOP",
                        self.opcode,
                        self.pc.wrapping_sub(size as u16)
                    );
                }
                // LAX (d),Y, LAS abs,Y and LAX abs,Y read their operand like LDA does
                matches!(self.opcode, 0xB3 | 0xBB | 0xBF)
            }
        }
    }

    fn add_with_carry(&mut self, value: u8) {
        let carry_in = (self.status & FLAG_CARRY) as u16;
        let sum = self.a as u16 + value as u16 + carry_in;
        let result = sum as u8;

        flags::set(&mut self.status, FLAG_CARRY, sum > 0xFF);
        flags::set(
            &mut self.status,
            FLAG_OVERFLOW,
            (!(self.a ^ value) & (self.a ^ result)) & 0x80 != 0,
        );

        self.a = result;
        self.update_zero_and_negative_flags(self.a);
    }

    fn compare(&mut self, register: u8, value: u8) {
        flags::set(&mut self.status, FLAG_CARRY, register >= value);
        self.update_zero_and_negative_flags(register.wrapping_sub(value));
    }

    /// Taken branches cost one extra cycle, two if the target is on another page.
    fn branch(&mut self, condition: bool) -> bool {
        if condition {
            self.cycles += 1;
            self.addr_abs = self.pc.wrapping_add(self.addr_rel as u16);

            if (self.addr_abs & 0xFF00) != (self.pc & 0xFF00) {
                self.cycles += 1;
            }

            self.pc = self.addr_abs;
        }
        false
    }

    fn assign_flag(&mut self, flag: u8, on: bool) -> bool {
        flags::set(&mut self.status, flag, on);
        false
    }

    fn update_zero_and_negative_flags(&mut self, value: u8) {
        flags::set(&mut self.status, FLAG_ZERO, value == 0);
        flags::set(&mut self.status, FLAG_NEGATIVE, value & 0x80 != 0);
    }
}
