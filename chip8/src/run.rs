use std::error::Error;
use std::fs;
use std::path::Path;
use std::time::{Duration, Instant};

use log::{info, warn};
use sdl2::event::Event;
use sdl2::keyboard::Keycode;

use chipvm::constants::{FRAME_RATE, KEY_COUNT};
use chipvm::Chip8;
use display::Display;

use crate::audio::Beeper;
use crate::keymap::keymap;

/// Host loop settings collected from the command line.
pub struct Settings {
    pub cycles_per_frame: u32,
    pub volume: f32,
    pub scale: u32,
}

pub fn run(rom: &Path, settings: &Settings) -> Result<(), Box<dyn Error>> {
    let program = fs::read(rom)?;
    let mut chip8 = Chip8::new(&program)?;

    // Get SDL2 context
    let sdl = sdl2::init()?;
    let title = match rom.file_stem() {
        Some(stem) => format!("Chip-8 - {}", stem.to_string_lossy()),
        None => "Chip-8".to_string(),
    };
    let mut display = Display::new(&sdl, &title, settings.scale)?;
    match Beeper::new(&sdl, settings.volume) {
        Ok(beeper) => chip8.set_audio(Box::new(beeper)),
        Err(e) => warn!("Audio unavailable, running muted [error: {}]", e),
    }
    let mut events = sdl.event_pump()?;

    let frame_time = Duration::from_secs(1) / FRAME_RATE;
    let mut keys = [false; KEY_COUNT];
    info!(
        "Running {} [cycles per frame: {}]",
        rom.display(),
        settings.cycles_per_frame
    );

    'event: loop {
        let frame_start = Instant::now();

        // Handle input
        for event in events.poll_iter() {
            match event {
                Event::Quit { .. } => break 'event,
                Event::KeyDown {
                    keycode: Some(key), ..
                } if key == Keycode::Escape => break 'event,
                Event::KeyDown {
                    keycode: Some(key), ..
                } => {
                    if let Some(kc) = keymap(key) {
                        keys[kc as usize] = true;
                    }
                }
                Event::KeyUp {
                    keycode: Some(key), ..
                } => {
                    if let Some(kc) = keymap(key) {
                        keys[kc as usize] = false;
                    }
                }
                _ => continue,
            };
        }
        chip8.set_keys(keys);

        // Update state
        for _ in 0..settings.cycles_per_frame {
            chip8.tick()?;
        }

        // If the frame buffer changed, render the current frame
        if chip8.take_dirty_flag() {
            display.render(chip8.snapshot())?;
        }

        // Handle timing
        let elapsed = frame_start.elapsed();
        if elapsed < frame_time {
            std::thread::sleep(frame_time - elapsed);
        }
    }

    info!("Window closed");
    Ok(())
}
