use chip8::display::{Display, DummyDisplay};
use chip8::input::{DummyInput, HostEvent, Input};
use chip8::memory::MemoryMap;
use chip8::registers::Register;
use chip8::{Chip8Interpreter, Config, ExecState, Result};

#[test]
fn test_three_loads() {
    let mut chip8 = Chip8Interpreter::new();
    chip8.load_words(&[0x6011, 0x6112, 0x6213]);
    for _ in 0..3 {
        chip8.execute_cycle();
    }
    let v = chip8.registers().v();
    assert_eq!(&v[..3], &[0x11, 0x12, 0x13]);
    assert!(v[3..].iter().all(|&b| b == 0));
    assert_eq!(chip8.registers().pc, 0x206);
}

#[test]
fn test_cls_on_dirty_screen() {
    // tile the screen with solid 8x8 blocks read from 0x300, then CLS
    let mut chip8 = Chip8Interpreter::new();
    let mut prog = vec![0xA300, 0x6000, 0x6100];
    for row in 0..4u16 {
        for col in 0..8u16 {
            prog.push(0x6000 | (col * 8));
            prog.push(0x6100 | (row * 8));
            prog.push(0xD018);
        }
    }
    prog.push(0x00E0);
    let n_draws = prog.len() - 1;
    chip8.load_words(&prog);
    chip8.load_words_at(&[0xFFFF; 8], 0x300);

    for _ in 0..n_draws {
        chip8.execute_cycle();
    }
    assert!(chip8.framebuffer().as_bytes().iter().all(|&b| b == 0xFF));
    chip8.clear_display_dirty();

    chip8.execute_cycle();
    assert!(chip8.framebuffer().as_bytes().iter().all(|&b| b == 0));
    assert!(chip8.display_dirty());
}

#[test]
fn test_wait_for_key_through_host_loop() -> Result<()> {
    // wait for a key, draw its glyph, spin
    let mut chip8 = Chip8Interpreter::with_config(Config::default().with_rng_seed(3));
    chip8.load_words(&[0xF50A, 0xF529, 0xD005, 0x1206]);
    let mut display = DummyDisplay::new();
    let mut input = DummyInput::new(&[]);

    for _ in 0..10 {
        for event in input.poll_events()? {
            if let HostEvent::Key(k) = event {
                chip8.press_key(k)?;
            }
        }
        chip8.execute_cycle();
    }
    assert_eq!(chip8.exec_state(), ExecState::WaitingForKey { register: Register::new(5) });
    assert_eq!(chip8.registers().pc, 0x200);

    input = DummyInput::new(&[HostEvent::Key(0x1), HostEvent::Key(0x7)]);
    for _ in 0..4 {
        for event in input.poll_events()? {
            if let HostEvent::Key(k) = event {
                chip8.press_key(k)?;
            }
        }
        chip8.execute_cycle();
        if chip8.take_display_dirty() {
            display.draw(chip8.framebuffer().as_bytes())?;
        }
    }
    assert_eq!(chip8.registers().get(Register::new(5)), 0x7);
    assert!(chip8.keys().is_empty());
    assert_eq!(display.frames, 1);
    // glyph 7 top row, drawn at (0, 0)
    assert_eq!(display.last[0], 0xF0);
    assert_eq!(chip8.memory().read_byte(chip8.registers().i), 0xF0);
    Ok(())
}

#[test]
fn test_subroutine_nesting_limit() {
    // 0x200: CALL 0x200 forever; the 17th call is dropped
    let mut chip8 = Chip8Interpreter::new();
    chip8.load_words(&[0x2200]);
    for _ in 0..16 {
        chip8.execute_cycle();
        assert_eq!(chip8.registers().pc, 0x200);
    }
    assert_eq!(chip8.registers().sp(), 16);
    chip8.execute_cycle();
    assert_eq!(chip8.registers().sp(), 16);
    assert_eq!(chip8.registers().pc, 0x202);
}
