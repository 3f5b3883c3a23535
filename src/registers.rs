use std::fmt;

/// depth of the return-address stack
pub const STACK_DEPTH: usize = 16;

/// A register selector, V0..VF. Built by masking a nibble, so it can never
/// point outside the register file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Register(u8);

impl Register {
    pub const V0: Register = Register(0x0);
    /// VF doubles as carry/borrow/collision flag
    pub const VF: Register = Register(0xF);

    pub fn new(nibble: u8) -> Self {
        Register(nibble & 0x0f)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "V{:X}", self.0)
    }
}

/// The programmer-visible CPU state, plus the program counter and call stack
/// that programs can only touch through jumps, calls and returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registers {
    v: [u8; 16],
    /// index register; an address, not range-checked here
    pub i: u16,
    pub pc: u16,
    stack: [u16; STACK_DEPTH],
    sp: u8,
}

impl Registers {
    pub fn new(pc: u16) -> Self {
        Registers {
            v: [0; 16],
            i: 0,
            pc,
            stack: [0; STACK_DEPTH],
            sp: 0,
        }
    }

    pub fn get(&self, r: Register) -> u8 {
        self.v[r.index()]
    }

    pub fn set(&mut self, r: Register, value: u8) {
        self.v[r.index()] = value;
    }

    /// VF = 1 or 0
    pub fn set_flag(&mut self, flag: bool) {
        self.set(Register::VF, flag as u8);
    }

    pub fn v(&self) -> &[u8; 16] {
        &self.v
    }

    /// push a return address; false (and nothing pushed) if the stack is full
    pub fn push(&mut self, addr: u16) -> bool {
        if self.sp as usize >= STACK_DEPTH {
            return false;
        }
        self.stack[self.sp as usize] = addr;
        self.sp += 1;
        true
    }

    /// pop a return address; None if the stack is empty
    pub fn pop(&mut self) -> Option<u16> {
        if self.sp == 0 {
            return None;
        }
        self.sp -= 1;
        Some(self.stack[self.sp as usize])
    }

    pub fn sp(&self) -> u8 {
        self.sp
    }

    /// the live part of the stack, oldest first
    pub fn stack(&self) -> &[u16] {
        &self.stack[..self.sp as usize]
    }

    /// step past one instruction
    pub fn advance(&mut self) {
        self.pc = self.pc.wrapping_add(2);
    }

    /// step past the next instruction
    pub fn skip(&mut self) {
        self.advance();
    }

    /// go back to the instruction just fetched
    pub fn rewind(&mut self) {
        self.pc = self.pc.wrapping_sub(2);
    }
}

impl fmt::Display for Registers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (n, value) in self.v.iter().enumerate() {
            write!(f, "V{:X}={:02X}", n, value)?;
            f.write_str(if n % 8 == 7 { "\n" } else { " " })?;
        }
        writeln!(f, "I={:04X} PC={:04X} SP={:X}", self.i, self.pc, self.sp)?;
        write!(f, "STACK=[")?;
        for (n, addr) in self.stack().iter().enumerate() {
            if n > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{:04X}", addr)?;
        }
        write!(f, "]")
    }
}
