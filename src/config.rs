/// where programs are conventionally loaded, and where execution starts
pub const DEFAULT_ENTRY_POINT: u16 = 0x200;

/// where the built-in hex font lives
pub const DEFAULT_FONT_ADDR: u16 = 0x050;

/// ARGB colours used by `render`
pub const DEFAULT_ON_COLOR: u32 = 0xFFFF_FFFF;
pub const DEFAULT_OFF_COLOR: u32 = 0xFF00_0000;

/// who decrements the delay and sound timers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerMode {
    /// once after every executed instruction; timer duration then depends on
    /// how fast the host steps the machine
    PerCycle,
    /// never by the machine itself; the host calls `tick_timers` from a
    /// wall-clock source (60Hz on the COSMAC VIP)
    External,
}

/// machine configuration, fixed for the lifetime of an interpreter (and kept
/// across resets)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub entry_point: u16,
    pub font_addr: u16,
    pub timer_mode: TimerMode,
    pub rng_seed: Option<u64>,
    pub on_color: u32,
    pub off_color: u32,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            entry_point: DEFAULT_ENTRY_POINT,
            font_addr: DEFAULT_FONT_ADDR,
            timer_mode: TimerMode::PerCycle,
            rng_seed: None,
            on_color: DEFAULT_ON_COLOR,
            off_color: DEFAULT_OFF_COLOR,
        }
    }
}

impl Config {
    pub fn with_entry_point(mut self, addr: u16) -> Self {
        self.entry_point = addr;
        self
    }

    pub fn with_font_addr(mut self, addr: u16) -> Self {
        self.font_addr = addr;
        self
    }

    pub fn with_timer_mode(mut self, mode: TimerMode) -> Self {
        self.timer_mode = mode;
        self
    }

    /// make `Cxkk` deterministic
    pub fn with_rng_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }

    pub fn with_colors(mut self, on: u32, off: u32) -> Self {
        self.on_color = on;
        self.off_color = off;
        self
    }
}
