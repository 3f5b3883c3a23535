use beep::beep;

use crate::error::{Chip8Error, Result};

/// something that can beep while the sound timer runs
pub trait Sound {
    fn beep(&mut self) -> Result<()>;
    fn stop(&mut self) -> Result<()>;
    fn is_beeping(&self) -> bool;

    /// start or stop to match the sound timer, only touching the device on a change
    fn update(&mut self, active: bool) -> Result<()> {
        match (active, self.is_beeping()) {
            (true, false) => self.beep(),
            (false, true) => self.stop(),
            _ => Ok(()),
        }
    }
}

const SIMPLEBEEP_PITCH: u16 = 2093; // C

/// the PC speaker, via the `beep` crate
pub struct SimpleBeep {
    is_beeping: bool,
}

impl SimpleBeep {
    pub fn new() -> Self {
        SimpleBeep { is_beeping: false }
    }
}

impl Default for SimpleBeep {
    fn default() -> Self {
        Self::new()
    }
}

impl Sound for SimpleBeep {
    fn beep(&mut self) -> Result<()> {
        beep(SIMPLEBEEP_PITCH).map_err(|e| Chip8Error::Sound(e.to_string()))?;
        self.is_beeping = true;
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        beep(0).map_err(|e| Chip8Error::Sound(e.to_string()))?;
        self.is_beeping = false;
        Ok(())
    }

    fn is_beeping(&self) -> bool {
        self.is_beeping
    }
}

/// silence; remembers what it was asked to do
#[derive(Default)]
pub struct Mute {
    is_beeping: bool,
}

impl Mute {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Sound for Mute {
    fn beep(&mut self) -> Result<()> {
        self.is_beeping = true;
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        self.is_beeping = false;
        Ok(())
    }

    fn is_beeping(&self) -> bool {
        self.is_beeping
    }
}
