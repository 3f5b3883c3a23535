/// The delay and sound timers. Both count down to zero and stop there; the
/// sound timer beeps for as long as it is non-zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Timers {
    delay: u8,
    sound: u8,
}

impl Timers {
    pub fn new() -> Self {
        Self::default()
    }

    /// decrement both timers by one, flooring at zero
    pub fn tick(&mut self) {
        self.delay = self.delay.saturating_sub(1);
        self.sound = self.sound.saturating_sub(1);
    }

    pub fn delay(&self) -> u8 {
        self.delay
    }

    pub fn sound(&self) -> u8 {
        self.sound
    }

    pub fn set_delay(&mut self, value: u8) {
        self.delay = value;
    }

    pub fn set_sound(&mut self, value: u8) {
        self.sound = value;
    }

    pub fn sound_active(&self) -> bool {
        self.sound > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_decrements() {
        let mut t = Timers::new();
        t.set_delay(3);
        t.set_sound(1);
        t.tick();
        assert_eq!((t.delay(), t.sound()), (2, 0));
    }

    #[test]
    fn test_tick_floors_at_zero() {
        let mut t = Timers::new();
        t.set_delay(1);
        for _ in 0..5 {
            t.tick();
        }
        assert_eq!((t.delay(), t.sound()), (0, 0));
    }

    #[test]
    fn test_sound_active() {
        let mut t = Timers::new();
        assert!(!t.sound_active());
        t.set_sound(2);
        assert!(t.sound_active());
        t.tick();
        t.tick();
        assert!(!t.sound_active());
    }
}
