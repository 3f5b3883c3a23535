use crate::error::{Chip8Error, Result};
use crate::registers::Register;

/// number of keys on the hex pad
pub const KEY_COUNT: u8 = 16;

/// Bitmask of asserted keys, bit k for key k. The host sets bits; the machine
/// consumes the whole mask when a wait-for-key instruction completes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyLatch(u16);

fn check(key: u8) -> Result<u16> {
    if key < KEY_COUNT {
        Ok(1 << key)
    } else {
        Err(Chip8Error::BadKey(key))
    }
}

impl KeyLatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, key: u8) -> Result<()> {
        self.0 |= check(key)?;
        Ok(())
    }

    pub fn release(&mut self, key: u8) -> Result<()> {
        self.0 &= !check(key)?;
        Ok(())
    }

    /// flip a key, for hosts that only see "something happened to this key"
    pub fn toggle(&mut self, key: u8) -> Result<()> {
        self.0 ^= check(key)?;
        Ok(())
    }

    /// only the low nibble of `key` is looked at, as the skip instructions do
    pub fn is_pressed(&self, key: u8) -> bool {
        self.0 & (1 << (key & 0x0f)) != 0
    }

    pub fn bits(&self) -> u16 {
        self.0
    }

    pub fn set_bits(&mut self, bits: u16) {
        self.0 = bits;
    }

    pub fn clear(&mut self) {
        self.0 = 0;
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// the highest-numbered asserted key
    pub fn highest(&self) -> Option<u8> {
        match self.0 {
            0 => None,
            bits => Some(15 - bits.leading_zeros() as u8),
        }
    }

    /// the highest-numbered asserted key; empties the latch
    pub fn take_highest(&mut self) -> Option<u8> {
        let key = self.highest();
        self.clear();
        key
    }
}

/// whether the instruction stream is running or stalled on `Fx0A`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExecState {
    #[default]
    Running,
    WaitingForKey { register: Register },
}
