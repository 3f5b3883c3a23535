use crossterm::event::{poll, read, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal;
use std::collections::HashMap;
use std::time::Duration;

use crate::error::Result;

/// map of the left-hand side of a qwerty keyboard to the hex pad
/// ```text
/// |1|2|3|C|      |1|2|3|4|
/// |4|5|6|D|  <-  |Q|W|E|R|
/// |7|8|9|E|  <-  |A|S|D|F|
/// |A|0|B|F|      |Z|X|C|V|
/// ```
const CHIP8_CONVENTIONAL_KEYMAP: [(char, u8); 16] = [
    ('x', 0x00),
    ('1', 0x01),
    ('2', 0x02),
    ('3', 0x03),
    ('q', 0x04),
    ('w', 0x05),
    ('e', 0x06),
    ('a', 0x07),
    ('s', 0x08),
    ('d', 0x09),
    ('z', 0x0a),
    ('c', 0x0b),
    ('4', 0x0c),
    ('r', 0x0d),
    ('f', 0x0e),
    ('v', 0x0f),
];

/// what the host loop needs to know about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostEvent {
    /// a hex pad key went down
    Key(u8),
    Quit,
}

/// reads keypresses
pub trait Input {
    /// everything that's happened since the last call, without blocking
    fn poll_events(&mut self) -> Result<Vec<HostEvent>>;
}

/// translate a terminal key into a host event, if it means anything
fn map_key(keymap: &HashMap<char, u8>, evt: KeyEvent) -> Option<HostEvent> {
    match evt.code {
        KeyCode::Esc => Some(HostEvent::Quit),
        KeyCode::Char('c') if evt.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(HostEvent::Quit)
        }
        KeyCode::Char(key) => match keymap.get(&key.to_ascii_lowercase()) {
            Some(mapped_key) => Some(HostEvent::Key(*mapped_key)),
            None => {
                log::warn!("can't map {:?} to a hex pad key", key);
                None
            }
        },
        _ => None,
    }
}

/// terminal keyboard via crossterm; puts the terminal in raw mode for as long
/// as it lives
pub struct TermInput {
    keymap: HashMap<char, u8>,
}

impl TermInput {
    pub fn new() -> Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(TermInput {
            keymap: HashMap::from(CHIP8_CONVENTIONAL_KEYMAP),
        })
    }
}

impl Drop for TermInput {
    fn drop(&mut self) {
        if let Err(e) = terminal::disable_raw_mode() {
            log::error!("couldn't leave raw mode: {}", e);
        }
    }
}

impl Input for TermInput {
    fn poll_events(&mut self) -> Result<Vec<HostEvent>> {
        let mut events = Vec::new();
        while poll(Duration::from_millis(0))? {
            match read()? {
                Event::Key(evt) => events.extend(map_key(&self.keymap, evt)),
                other => log::trace!("ignoring terminal event {:?}", other),
            }
        }
        Ok(events)
    }
}

/// dummy Input implementation for testing; hands out its events once
pub struct DummyInput {
    events: Vec<HostEvent>,
}

impl DummyInput {
    pub fn new(events: &[HostEvent]) -> Self {
        DummyInput {
            events: Vec::from(events),
        }
    }
}

impl Input for DummyInput {
    fn poll_events(&mut self) -> Result<Vec<HostEvent>> {
        Ok(std::mem::take(&mut self.events))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_conventional_layout() {
        let keymap = HashMap::from(CHIP8_CONVENTIONAL_KEYMAP);
        assert_eq!(map_key(&keymap, key(KeyCode::Char('x'))), Some(HostEvent::Key(0x0)));
        assert_eq!(map_key(&keymap, key(KeyCode::Char('4'))), Some(HostEvent::Key(0xC)));
        assert_eq!(map_key(&keymap, key(KeyCode::Char('V'))), Some(HostEvent::Key(0xF)));
        assert_eq!(map_key(&keymap, key(KeyCode::Char('p'))), None);
        assert_eq!(map_key(&keymap, key(KeyCode::Tab)), None);
    }

    #[test]
    fn test_quit_keys() {
        let keymap = HashMap::from(CHIP8_CONVENTIONAL_KEYMAP);
        assert_eq!(map_key(&keymap, key(KeyCode::Esc)), Some(HostEvent::Quit));
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(map_key(&keymap, ctrl_c), Some(HostEvent::Quit));
    }

    #[test]
    fn test_every_pad_key_mapped_once() {
        let keymap = HashMap::from(CHIP8_CONVENTIONAL_KEYMAP);
        let mut seen: Vec<u8> = keymap.values().copied().collect();
        seen.sort_unstable();
        assert_eq!(seen, (0..16).collect::<Vec<u8>>());
    }

    #[test]
    fn test_dummy_drains() -> Result<()> {
        let mut d = DummyInput::new(&[HostEvent::Key(3), HostEvent::Quit]);
        assert_eq!(d.poll_events()?, vec![HostEvent::Key(3), HostEvent::Quit]);
        assert!(d.poll_events()?.is_empty());
        Ok(())
    }
}
