//! # interpreter
//!
//! Owns every piece of machine state and runs one fetch/decode/execute cycle
//! per call to `execute_cycle`. The host decides how often that happens, feeds
//! key events in between cycles, and redraws when the display is flagged
//! dirty.
//!
//! Wait-for-key is a state, not a blocking call: `Fx0A` with no key latched
//! parks the machine in `ExecState::WaitingForKey` with the program counter
//! left on the `Fx0A` itself. Cycles in that state don't decode anything;
//! they just check the latch. The host can also call `resume` right after
//! delivering a key to finish the wait without spending a cycle.

use std::fs::File;
use std::io;
use std::path::Path;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::{Config, TimerMode};
use crate::error::Result;
use crate::framebuffer::FrameBuffer;
use crate::instruction::Instruction;
use crate::keypad::{ExecState, KeyLatch};
use crate::memory::{Memory, MemoryMap, RAM_SIZE_BYTES};
use crate::registers::{Register, Registers};
use crate::timers::Timers;

pub struct Chip8Interpreter {
    config: Config,
    memory: Memory,
    registers: Registers,
    timers: Timers,
    framebuffer: FrameBuffer,
    keys: KeyLatch,
    state: ExecState,
    display_dirty: bool,
    rng: StdRng,
}

fn seeded(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    }
}

impl Default for Chip8Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Chip8Interpreter {
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        Chip8Interpreter {
            memory: Memory::new(config.font_addr),
            registers: Registers::new(config.entry_point),
            timers: Timers::new(),
            framebuffer: FrameBuffer::new(),
            keys: KeyLatch::new(),
            state: ExecState::Running,
            display_dirty: false,
            rng: seeded(config.rng_seed),
            config,
        }
    }

    /// back to power-on state: memory wiped (font restored), registers
    /// zeroed, pc at the entry point. the config survives
    pub fn reset(&mut self) {
        *self = Self::with_config(self.config.clone());
    }

    /// load a chip8 program at the entry point
    pub fn load_program(&mut self, reader: &mut impl io::Read) -> Result<usize> {
        self.load_program_at(reader, self.config.entry_point)
    }

    pub fn load_program_at(&mut self, reader: &mut impl io::Read, addr: u16) -> Result<usize> {
        let n = self.memory.load_program(reader, addr)?;
        log::debug!("loaded {} bytes at {:#05x}", n, addr);
        Ok(n)
    }

    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<usize> {
        let mut f = File::open(path)?;
        self.load_program(&mut f)
    }

    /// load pre-assembled instructions at the entry point
    pub fn load_words(&mut self, words: &[u16]) -> usize {
        self.load_words_at(words, self.config.entry_point)
    }

    pub fn load_words_at(&mut self, words: &[u16], addr: u16) -> usize {
        self.memory.load_words(words, addr)
    }

    /// one fetch/decode/execute cycle, then a timer tick if the machine owns
    /// the timers
    pub fn execute_cycle(&mut self) {
        match self.state {
            ExecState::Running => {
                let pc = self.registers.pc;
                let op = self.memory.get_word(pc);
                self.registers.advance();
                let instruction = Instruction::decode(op);
                log::trace!("{:04X}: {:04X} {}", pc, op, instruction);
                self.execute(instruction);
            }
            ExecState::WaitingForKey { register } => {
                if !self.complete_wait(register) {
                    log::trace!("{:04X}: waiting for key", self.registers.pc);
                }
            }
        }
        if self.config.timer_mode == TimerMode::PerCycle {
            self.timers.tick();
        }
    }

    /// finish a pending wait-for-key straight away if a key is latched.
    /// returns true if the machine was waiting and is now running
    pub fn resume(&mut self) -> bool {
        match self.state {
            ExecState::WaitingForKey { register } => self.complete_wait(register),
            ExecState::Running => false,
        }
    }

    /// take the highest latched key into `register` and step past the `Fx0A`
    /// that's being waited on
    fn complete_wait(&mut self, register: Register) -> bool {
        match self.keys.take_highest() {
            Some(key) => {
                self.registers.set(register, key);
                self.registers.advance();
                self.state = ExecState::Running;
                log::debug!("key {:X} -> {}, resuming", key, register);
                true
            }
            None => false,
        }
    }

    /// decrement the timers; for hosts running `TimerMode::External`
    pub fn tick_timers(&mut self) {
        self.timers.tick();
    }

    /// apply one instruction; the program counter has already been moved
    /// past it
    pub fn execute(&mut self, instruction: Instruction) {
        use Instruction::*;

        let regs = &mut self.registers;
        match instruction {
            Sys(addr) => log::debug!("SYS {:#05x} unsupported, ignored", addr),
            Cls => {
                self.framebuffer.clear();
                self.display_dirty = true;
            }
            Ret => match regs.pop() {
                Some(addr) => regs.pc = addr,
                None => log::debug!("RET with empty stack, ignored"),
            },
            Jump(addr) => regs.pc = addr,
            Call(addr) => {
                let ret = regs.pc;
                if regs.push(ret) {
                    regs.pc = addr;
                } else {
                    log::debug!("CALL {:#05x} with full stack, ignored", addr);
                }
            }
            SkipEqImm(x, kk) => {
                if regs.get(x) == kk {
                    regs.skip();
                }
            }
            SkipNeImm(x, kk) => {
                if regs.get(x) != kk {
                    regs.skip();
                }
            }
            SkipEqReg(x, y) => {
                if regs.get(x) == regs.get(y) {
                    regs.skip();
                }
            }
            SkipNeReg(x, y) => {
                if regs.get(x) != regs.get(y) {
                    regs.skip();
                }
            }
            LoadImm(x, kk) => regs.set(x, kk),
            AddImm(x, kk) => regs.set(x, regs.get(x).wrapping_add(kk)),
            Move(x, y) => regs.set(x, regs.get(y)),
            Or(x, y) => regs.set(x, regs.get(x) | regs.get(y)),
            And(x, y) => regs.set(x, regs.get(x) & regs.get(y)),
            Xor(x, y) => regs.set(x, regs.get(x) ^ regs.get(y)),
            // flag-producing ops: both results come from the operands as they
            // were before; the flag is written last so it wins when x is VF
            AddReg(x, y) => {
                let (sum, carry) = regs.get(x).overflowing_add(regs.get(y));
                regs.set(x, sum);
                regs.set_flag(carry);
            }
            Sub(x, y) => {
                let (vx, vy) = (regs.get(x), regs.get(y));
                regs.set(x, vx.wrapping_sub(vy));
                regs.set_flag(vx >= vy);
            }
            SubN(x, y) => {
                let (vx, vy) = (regs.get(x), regs.get(y));
                regs.set(x, vy.wrapping_sub(vx));
                regs.set_flag(vy >= vx);
            }
            ShiftRight(x) => {
                let vx = regs.get(x);
                regs.set(x, vx >> 1);
                regs.set_flag(vx & 0x01 != 0);
            }
            ShiftLeft(x) => {
                let vx = regs.get(x);
                regs.set(x, vx << 1);
                regs.set_flag(vx & 0x80 != 0);
            }
            LoadIndex(addr) => regs.i = addr,
            JumpOffset(addr) => regs.pc = addr.wrapping_add(regs.get(Register::V0) as u16),
            Random(x, kk) => {
                let byte: u8 = self.rng.gen();
                regs.set(x, byte & kk);
            }
            Draw(x, y, n) => {
                let rows = self.memory.get_ro_slice(regs.i, n as usize);
                let collision = self.framebuffer.draw_sprite(regs.get(x), regs.get(y), rows);
                regs.set_flag(collision);
                self.display_dirty = true;
            }
            SkipKeyPressed(x) => {
                if self.keys.is_pressed(regs.get(x)) {
                    regs.skip();
                }
            }
            SkipKeyNotPressed(x) => {
                if !self.keys.is_pressed(regs.get(x)) {
                    regs.skip();
                }
            }
            LoadDelay(x) => regs.set(x, self.timers.delay()),
            WaitKey(x) => {
                regs.rewind();
                self.state = ExecState::WaitingForKey { register: x };
                if !self.complete_wait(x) {
                    log::debug!("waiting for key into {}", x);
                }
            }
            SetDelay(x) => self.timers.set_delay(regs.get(x)),
            SetSound(x) => self.timers.set_sound(regs.get(x)),
            AddIndex(x) => regs.i = regs.i.wrapping_add(regs.get(x) as u16),
            LoadGlyph(x) => regs.i = self.memory.glyph_addr(regs.get(x)),
            StoreBcd(x) => {
                let vx = regs.get(x);
                let i = regs.i;
                self.memory.write_byte(i, vx / 100);
                self.memory.write_byte(i.wrapping_add(1), vx / 10 % 10);
                self.memory.write_byte(i.wrapping_add(2), vx % 10);
            }
            StoreRegs(x) => {
                let count = block_len(regs.i, x);
                let dst = self.memory.get_rw_slice(regs.i, count);
                dst.copy_from_slice(&regs.v()[..count]);
            }
            LoadRegs(x) => {
                let count = block_len(regs.i, x);
                let src = self.memory.get_ro_slice(regs.i, count);
                for (n, &byte) in src.iter().enumerate() {
                    regs.set(Register::new(n as u8), byte);
                }
            }
            Unknown(op) => log::debug!("unknown opcode {:04X}, ignored", op),
        }
    }

    pub fn registers(&self) -> &Registers {
        &self.registers
    }

    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    pub fn timers(&self) -> &Timers {
        &self.timers
    }

    pub fn framebuffer(&self) -> &FrameBuffer {
        &self.framebuffer
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn exec_state(&self) -> ExecState {
        self.state
    }

    pub fn is_waiting(&self) -> bool {
        matches!(self.state, ExecState::WaitingForKey { .. })
    }

    /// true once something has changed the display since the host last
    /// cleared the flag
    pub fn display_dirty(&self) -> bool {
        self.display_dirty
    }

    pub fn clear_display_dirty(&mut self) {
        self.display_dirty = false;
    }

    /// read and clear the dirty flag in one go
    pub fn take_display_dirty(&mut self) -> bool {
        std::mem::take(&mut self.display_dirty)
    }

    pub fn sound_active(&self) -> bool {
        self.timers.sound_active()
    }

    pub fn keys(&self) -> &KeyLatch {
        &self.keys
    }

    pub fn keys_mut(&mut self) -> &mut KeyLatch {
        &mut self.keys
    }

    pub fn press_key(&mut self, key: u8) -> Result<()> {
        self.keys.press(key)
    }

    pub fn release_key(&mut self, key: u8) -> Result<()> {
        self.keys.release(key)
    }

    pub fn toggle_key(&mut self, key: u8) -> Result<()> {
        self.keys.toggle(key)
    }

    /// one colour per pixel, using the configured on/off colours
    pub fn render(&self, out: &mut [u32]) -> Result<()> {
        self.framebuffer
            .render_into(out, self.config.on_color, self.config.off_color)
    }

    pub fn dump_display(&self) -> String {
        self.framebuffer.to_string()
    }

    pub fn dump_registers(&self) -> String {
        format!(
            "{}\nDT={:02X} ST={:02X} KEYS={:04X} {:?}",
            self.registers,
            self.timers.delay(),
            self.timers.sound(),
            self.keys.bits(),
            self.state
        )
    }
}

/// how many of V0..=Vx fit between `i` and the end of memory
fn block_len(i: u16, x: Register) -> usize {
    let wanted = x.index() + 1;
    let room = RAM_SIZE_BYTES.saturating_sub(i as usize);
    if room < wanted {
        log::debug!("block transfer at {:#05x} clamped to {} registers", i, room);
    }
    wanted.min(room)
}
