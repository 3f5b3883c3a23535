use std::fmt;

use crate::registers::Register;

/// # Opcodes
///
/// Chip-8 opcodes are 16 bits each. Their behavior is cased on some combination of:
/// - `(n, _, _, _)` broad categorization; applies to all opcodes
/// - `(_, _, _, n)` specific behavior within a category
/// - `(_, _, n, n)` more specific behavior within a category
/// - `(_, n, n, n)` some fixed function that doesn't require variables (e.g. CLS; clear screen)
///
/// Nibbles not used to determine the operation often (but not always) carry important data.
/// - `(_, n, n, n)` a 12-bit address
/// - `(_, _, n, n)` a byte assigned to and/or compared with Vx
/// - `(_, n, _, _)` the register Vx, or the range V0..Vx
/// - `(_, _, n, _)` the register Vy
pub trait Opcode {
    fn nibbles(&self) -> (u8, u8, u8, u8);

    /// `[_x__]`
    fn x(&self) -> u8;

    /// `[__y_]`
    fn y(&self) -> u8;

    /// `[___n]`
    fn n(&self) -> u8;

    /// `[__kk]`
    fn kk(&self) -> u8;

    /// `[_nnn]`
    fn addr(&self) -> u16;
}

impl Opcode for u16 {
    fn nibbles(&self) -> (u8, u8, u8, u8) {
        (((self & 0xF000) >> 12) as u8, self.x(), self.y(), self.n())
    }

    fn x(&self) -> u8 {
        ((self & 0x0F00) >> 8) as u8
    }

    fn y(&self) -> u8 {
        ((self & 0x00F0) >> 4) as u8
    }

    fn n(&self) -> u8 {
        (self & 0x000F) as u8
    }

    fn kk(&self) -> u8 {
        (self & 0x00FF) as u8
    }

    fn addr(&self) -> u16 {
        self & 0x0FFF
    }
}

/// A decoded instruction. Decoding is total: anything unrecognised comes
/// out as `Unknown` and executes as a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    /// 0nnn: jump to native routine; not supported, executes as a no-op
    Sys(u16),
    /// 00E0
    Cls,
    /// 00EE
    Ret,
    /// 1nnn
    Jump(u16),
    /// 2nnn
    Call(u16),
    /// 3xkk
    SkipEqImm(Register, u8),
    /// 4xkk
    SkipNeImm(Register, u8),
    /// 5xy0
    SkipEqReg(Register, Register),
    /// 6xkk
    LoadImm(Register, u8),
    /// 7xkk, no carry
    AddImm(Register, u8),
    /// 8xy0
    Move(Register, Register),
    /// 8xy1
    Or(Register, Register),
    /// 8xy2
    And(Register, Register),
    /// 8xy3
    Xor(Register, Register),
    /// 8xy4, VF = carry
    AddReg(Register, Register),
    /// 8xy5, Vx = Vx - Vy, VF = NOT borrow
    Sub(Register, Register),
    /// 8xy6, VF = bit shifted out
    ShiftRight(Register),
    /// 8xy7, Vx = Vy - Vx, VF = NOT borrow
    SubN(Register, Register),
    /// 8xyE, VF = bit shifted out
    ShiftLeft(Register),
    /// 9xy0
    SkipNeReg(Register, Register),
    /// Annn
    LoadIndex(u16),
    /// Bnnn, PC = V0 + nnn
    JumpOffset(u16),
    /// Cxkk
    Random(Register, u8),
    /// Dxyn
    Draw(Register, Register, u8),
    /// Ex9E
    SkipKeyPressed(Register),
    /// ExA1
    SkipKeyNotPressed(Register),
    /// Fx07
    LoadDelay(Register),
    /// Fx0A
    WaitKey(Register),
    /// Fx15
    SetDelay(Register),
    /// Fx18
    SetSound(Register),
    /// Fx1E
    AddIndex(Register),
    /// Fx29
    LoadGlyph(Register),
    /// Fx33
    StoreBcd(Register),
    /// Fx55, V0..=Vx to memory at I
    StoreRegs(Register),
    /// Fx65, memory at I to V0..=Vx
    LoadRegs(Register),
    Unknown(u16),
}

impl Instruction {
    pub fn decode(op: u16) -> Self {
        use Instruction::*;

        let x = Register::new(op.x());
        let y = Register::new(op.y());
        match op.nibbles() {
            (0x0, 0x0, 0xE, 0x0) => Cls,
            (0x0, 0x0, 0xE, 0xE) => Ret,
            (0x0, ..) => Sys(op.addr()),
            (0x1, ..) => Jump(op.addr()),
            (0x2, ..) => Call(op.addr()),
            (0x3, ..) => SkipEqImm(x, op.kk()),
            (0x4, ..) => SkipNeImm(x, op.kk()),
            // the low nibble of 5xy_ and 9xy_ isn't checked
            (0x5, ..) => SkipEqReg(x, y),
            (0x6, ..) => LoadImm(x, op.kk()),
            (0x7, ..) => AddImm(x, op.kk()),
            (0x8, .., 0x0) => Move(x, y),
            (0x8, .., 0x1) => Or(x, y),
            (0x8, .., 0x2) => And(x, y),
            (0x8, .., 0x3) => Xor(x, y),
            (0x8, .., 0x4) => AddReg(x, y),
            (0x8, .., 0x5) => Sub(x, y),
            (0x8, .., 0x6) => ShiftRight(x),
            (0x8, .., 0x7) => SubN(x, y),
            (0x8, .., 0xE) => ShiftLeft(x),
            (0x9, ..) => SkipNeReg(x, y),
            (0xA, ..) => LoadIndex(op.addr()),
            (0xB, ..) => JumpOffset(op.addr()),
            (0xC, ..) => Random(x, op.kk()),
            (0xD, ..) => Draw(x, y, op.n()),
            (0xE, _, 0x9, 0xE) => SkipKeyPressed(x),
            (0xE, _, 0xA, 0x1) => SkipKeyNotPressed(x),
            (0xF, _, 0x0, 0x7) => LoadDelay(x),
            (0xF, _, 0x0, 0xA) => WaitKey(x),
            (0xF, _, 0x1, 0x5) => SetDelay(x),
            (0xF, _, 0x1, 0x8) => SetSound(x),
            (0xF, _, 0x1, 0xE) => AddIndex(x),
            (0xF, _, 0x2, 0x9) => LoadGlyph(x),
            (0xF, _, 0x3, 0x3) => StoreBcd(x),
            (0xF, _, 0x5, 0x5) => StoreRegs(x),
            (0xF, _, 0x6, 0x5) => LoadRegs(x),
            _ => Unknown(op),
        }
    }
}

impl From<u16> for Instruction {
    fn from(op: u16) -> Self {
        Instruction::decode(op)
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Instruction::*;

        match *self {
            Sys(a) => write!(f, "SYS {:#05X}", a),
            Cls => write!(f, "CLS"),
            Ret => write!(f, "RET"),
            Jump(a) => write!(f, "JP {:#05X}", a),
            Call(a) => write!(f, "CALL {:#05X}", a),
            SkipEqImm(x, kk) => write!(f, "SE {}, {:#04X}", x, kk),
            SkipNeImm(x, kk) => write!(f, "SNE {}, {:#04X}", x, kk),
            SkipEqReg(x, y) => write!(f, "SE {}, {}", x, y),
            LoadImm(x, kk) => write!(f, "LD {}, {:#04X}", x, kk),
            AddImm(x, kk) => write!(f, "ADD {}, {:#04X}", x, kk),
            Move(x, y) => write!(f, "LD {}, {}", x, y),
            Or(x, y) => write!(f, "OR {}, {}", x, y),
            And(x, y) => write!(f, "AND {}, {}", x, y),
            Xor(x, y) => write!(f, "XOR {}, {}", x, y),
            AddReg(x, y) => write!(f, "ADD {}, {}", x, y),
            Sub(x, y) => write!(f, "SUB {}, {}", x, y),
            ShiftRight(x) => write!(f, "SHR {}", x),
            SubN(x, y) => write!(f, "SUBN {}, {}", x, y),
            ShiftLeft(x) => write!(f, "SHL {}", x),
            SkipNeReg(x, y) => write!(f, "SNE {}, {}", x, y),
            LoadIndex(a) => write!(f, "LD I, {:#05X}", a),
            JumpOffset(a) => write!(f, "JP V0, {:#05X}", a),
            Random(x, kk) => write!(f, "RND {}, {:#04X}", x, kk),
            Draw(x, y, n) => write!(f, "DRW {}, {}, {}", x, y, n),
            SkipKeyPressed(x) => write!(f, "SKP {}", x),
            SkipKeyNotPressed(x) => write!(f, "SKNP {}", x),
            LoadDelay(x) => write!(f, "LD {}, DT", x),
            WaitKey(x) => write!(f, "LD {}, K", x),
            SetDelay(x) => write!(f, "LD DT, {}", x),
            SetSound(x) => write!(f, "LD ST, {}", x),
            AddIndex(x) => write!(f, "ADD I, {}", x),
            LoadGlyph(x) => write!(f, "LD F, {}", x),
            StoreBcd(x) => write!(f, "LD B, {}", x),
            StoreRegs(x) => write!(f, "LD [I], {}", x),
            LoadRegs(x) => write!(f, "LD {}, [I]", x),
            Unknown(op) => write!(f, "??? {:#06X}", op),
        }
    }
}

/// decode a program image two bytes at a time, as if loaded at `base`; a
/// trailing odd byte is ignored
pub fn disassemble(program: &[u8], base: u16) -> Vec<(u16, Instruction)> {
    program
        .chunks_exact(2)
        .enumerate()
        .map(|(n, pair)| {
            let addr = base.wrapping_add(2 * n as u16);
            (addr, Instruction::decode(u16::from_be_bytes([pair[0], pair[1]])))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use Instruction::*;

    fn r(n: u8) -> Register {
        Register::new(n)
    }

    #[test]
    fn test_nibbles() {
        let op: u16 = 0xABCD;
        assert_eq!(op.nibbles(), (0xA, 0xB, 0xC, 0xD));
    }

    #[test]
    fn test_fields() {
        let op: u16 = 0xABCD;
        assert_eq!(op.x(), 0xB);
        assert_eq!(op.y(), 0xC);
        assert_eq!(op.n(), 0xD);
        assert_eq!(op.kk(), 0xCD);
        assert_eq!(op.addr(), 0x0BCD);
    }

    #[test]
    fn test_decode_control_flow() {
        assert_eq!(Instruction::decode(0x00E0), Cls);
        assert_eq!(Instruction::decode(0x00EE), Ret);
        assert_eq!(Instruction::decode(0x0123), Sys(0x123));
        assert_eq!(Instruction::decode(0x1ABC), Jump(0xABC));
        assert_eq!(Instruction::decode(0x2ABC), Call(0xABC));
        assert_eq!(Instruction::decode(0xBABC), JumpOffset(0xABC));
    }

    #[test]
    fn test_decode_skips() {
        assert_eq!(Instruction::decode(0x3122), SkipEqImm(r(1), 0x22));
        assert_eq!(Instruction::decode(0x4122), SkipNeImm(r(1), 0x22));
        assert_eq!(Instruction::decode(0x5120), SkipEqReg(r(1), r(2)));
        assert_eq!(Instruction::decode(0x9120), SkipNeReg(r(1), r(2)));
        assert_eq!(Instruction::decode(0xE19E), SkipKeyPressed(r(1)));
        assert_eq!(Instruction::decode(0xE1A1), SkipKeyNotPressed(r(1)));
    }

    #[test]
    fn test_decode_alu() {
        assert_eq!(Instruction::decode(0x8120), Move(r(1), r(2)));
        assert_eq!(Instruction::decode(0x8121), Or(r(1), r(2)));
        assert_eq!(Instruction::decode(0x8122), And(r(1), r(2)));
        assert_eq!(Instruction::decode(0x8123), Xor(r(1), r(2)));
        assert_eq!(Instruction::decode(0x8124), AddReg(r(1), r(2)));
        assert_eq!(Instruction::decode(0x8125), Sub(r(1), r(2)));
        assert_eq!(Instruction::decode(0x8126), ShiftRight(r(1)));
        assert_eq!(Instruction::decode(0x8127), SubN(r(1), r(2)));
        assert_eq!(Instruction::decode(0x812E), ShiftLeft(r(1)));
        assert_eq!(Instruction::decode(0x8128), Unknown(0x8128));
    }

    #[test]
    fn test_decode_f_group() {
        assert_eq!(Instruction::decode(0xF307), LoadDelay(r(3)));
        assert_eq!(Instruction::decode(0xF30A), WaitKey(r(3)));
        assert_eq!(Instruction::decode(0xF315), SetDelay(r(3)));
        assert_eq!(Instruction::decode(0xF318), SetSound(r(3)));
        assert_eq!(Instruction::decode(0xF31E), AddIndex(r(3)));
        assert_eq!(Instruction::decode(0xF329), LoadGlyph(r(3)));
        assert_eq!(Instruction::decode(0xF333), StoreBcd(r(3)));
        assert_eq!(Instruction::decode(0xF355), StoreRegs(r(3)));
        assert_eq!(Instruction::decode(0xF365), LoadRegs(r(3)));
        assert_eq!(Instruction::decode(0xF399), Unknown(0xF399));
        assert_eq!(Instruction::decode(0xE1FF), Unknown(0xE1FF));
    }

    #[test]
    fn test_decode_misc() {
        assert_eq!(Instruction::decode(0x6AFF), LoadImm(r(0xA), 0xFF));
        assert_eq!(Instruction::decode(0x7A01), AddImm(r(0xA), 0x01));
        assert_eq!(Instruction::decode(0xA123), LoadIndex(0x123));
        assert_eq!(Instruction::decode(0xC30F), Random(r(3), 0x0F));
        assert_eq!(Instruction::decode(0xD125), Draw(r(1), r(2), 5));
    }

    #[test]
    fn test_mnemonics() {
        assert_eq!(Instruction::decode(0x6011).to_string(), "LD V0, 0x11");
        assert_eq!(Instruction::decode(0xD125).to_string(), "DRW V1, V2, 5");
        assert_eq!(Instruction::decode(0xF10A).to_string(), "LD V1, K");
        assert_eq!(Instruction::decode(0x1200).to_string(), "JP 0x200");
    }

    #[test]
    fn test_disassemble() {
        let prog = [0x60, 0x11, 0x00, 0xE0, 0x12];
        assert_eq!(
            disassemble(&prog, 0x200),
            vec![(0x200, LoadImm(r(0), 0x11)), (0x202, Cls)]
        );
    }
}
