use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Parser;

use chip8::display::{Display, MonoTermDisplay};
use chip8::input::{HostEvent, Input, TermInput};
use chip8::keypad::KEY_COUNT;
use chip8::sound::{Mute, SimpleBeep, Sound};
use chip8::{Chip8Interpreter, Config, Result, TimerMode};

/// terminals only report key-downs, so a key counts as held for this long
const KEY_HOLD: Duration = Duration::from_millis(150);

#[derive(Parser)]
#[command(name = "chip8")]
#[command(about = "A CHIP-8 interpreter in the terminal. Logs go to stderr; redirect it.")]
struct Args {
    /// ROM file to load
    rom: PathBuf,

    #[arg(long, default_value_t = 500, help = "Instructions per second")]
    hz: u32,

    #[arg(long, default_value_t = 60, help = "Timer ticks per second")]
    timer_hz: u32,

    #[arg(long, value_parser = parse_addr, default_value = "0x200", help = "Load and entry address")]
    offset: u16,

    #[arg(long, help = "Seed for the random number instruction")]
    seed: Option<u64>,

    #[arg(long, help = "Beep on the PC speaker while the sound timer runs")]
    sound: bool,

    #[arg(long, help = "Stop after this many instructions")]
    cycles: Option<u64>,

    #[arg(long, help = "Log every instruction executed")]
    trace: bool,
}

fn parse_addr(s: &str) -> std::result::Result<u16, String> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u16::from_str_radix(hex, 16),
        None => s.parse(),
    };
    parsed.map_err(|e| format!("bad address {:?}: {}", s, e))
}

fn period(hz: u32) -> Duration {
    Duration::from_secs_f64(1.0 / hz.max(1) as f64)
}

fn run(args: &Args) -> Result<()> {
    let mut config = Config::default()
        .with_entry_point(args.offset)
        .with_timer_mode(TimerMode::External);
    if let Some(seed) = args.seed {
        config = config.with_rng_seed(seed);
    }
    let mut interpreter = Chip8Interpreter::with_config(config);
    let n = interpreter.load_file(&args.rom)?;
    log::info!("loaded {} ({} bytes)", args.rom.display(), n);

    let mut display = MonoTermDisplay::new()?;
    let mut input = TermInput::new()?;
    let mut sound: Box<dyn Sound> = if args.sound {
        Box::new(SimpleBeep::new())
    } else {
        Box::new(Mute::new())
    };

    let cycle_time = period(args.hz);
    let timer_time = period(args.timer_hz);
    let mut held: [Option<Instant>; KEY_COUNT as usize] = [None; KEY_COUNT as usize];
    let mut last_timer = Instant::now();
    let mut executed: u64 = 0;

    display.draw(interpreter.framebuffer().as_bytes())?;
    'main: loop {
        let started = Instant::now();

        for event in input.poll_events()? {
            match event {
                HostEvent::Quit => break 'main,
                HostEvent::Key(key) => {
                    interpreter.press_key(key)?;
                    held[key as usize] = Some(started);
                }
            }
        }
        for (key, since) in held.iter_mut().enumerate() {
            if matches!(since, Some(t) if started.duration_since(*t) >= KEY_HOLD) {
                interpreter.release_key(key as u8)?;
                *since = None;
            }
        }
        interpreter.resume();

        interpreter.execute_cycle();
        executed += 1;

        while last_timer.elapsed() >= timer_time {
            interpreter.tick_timers();
            last_timer += timer_time;
        }
        sound.update(interpreter.sound_active())?;

        if interpreter.take_display_dirty() {
            display.draw(interpreter.framebuffer().as_bytes())?;
        }

        if args.cycles.map_or(false, |limit| executed >= limit) {
            log::info!("stopping after {} cycles", executed);
            break;
        }

        let elapsed = started.elapsed();
        if elapsed < cycle_time {
            spin_sleep::sleep(cycle_time - elapsed);
        }
    }

    sound.stop()?;
    log::debug!("final state\n{}", interpreter.dump_registers());
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut logger = env_logger::Builder::from_default_env();
    if args.trace {
        logger.filter_module("chip8", log::LevelFilter::Trace);
    }
    logger.init();

    let res = run(&args);

    // shove some junk on stdout to stop the cli messing up the last frame
    for _ in 0..4 {
        println!();
    }
    res
}
