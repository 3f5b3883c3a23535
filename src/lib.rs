//! # chip8
//!
//! A CHIP-8 virtual machine, plus the bits of terminal glue needed to run it.
//!
//! ## Design
//!
//! * the machine is one owned value, `Chip8Interpreter`; the host steps it
//!   with `execute_cycle` and decides how fast that happens
//! * one instruction per cycle: fetch two bytes big-endian, decode once into
//!   a closed `Instruction` enum, execute by matching on it
//! * nothing in a cycle can fail: stack overflow/underflow, unknown opcodes
//!   and block transfers running off the end of RAM are dropped or clamped
//!   and logged at debug level
//! * wait-for-key (`Fx0A`) is an explicit `ExecState`, not a blocking call
//! * the display is a packed 1bpp framebuffer; the host gets told when it's
//!   dirty and can read the bytes or render them to colours
//! * timers tick once per cycle by default, or from the host's own clock
//!   (`TimerMode::External`)
//!
//! Model
//!
//! Host (src/main.rs)
//!  |-- display, input, sound, config
//!  |-- interpreter(config)
//!  |    |-- memory (font baked in), registers, timers
//!  |    |-- framebuffer, key latch, exec state
//!  |    `-- instruction set
//!  `-- main loop
//!       |-- poll input; latch keys; resume if waiting
//!       |-- interpreter.execute_cycle()
//!       |-- tick timers at 60Hz; beep while the sound timer runs
//!       |-- redraw if the display is dirty
//!       `-- sleep to the next cycle
pub mod config;
pub mod display;
pub mod error;
pub mod framebuffer;
pub mod input;
pub mod instruction;
pub mod interpreter;
pub mod keypad;
pub mod memory;
pub mod registers;
pub mod sound;
pub mod timers;

pub use config::{Config, TimerMode};
pub use error::{Chip8Error, Result};
pub use instruction::Instruction;
pub use interpreter::Chip8Interpreter;
pub use keypad::ExecState;
