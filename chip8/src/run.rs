use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::{anyhow, Context};
use sdl2::event::Event;
use sdl2::keyboard::Keycode;
use tracing::{debug, info};

use octet_core::{Chip8, Config};
use octet_display::Display;

use crate::keymap::keymap;

/// How much faster than real time to run while fast forwarding
const FAST_FORWARD: u32 = 4;

/// How long to sleep between polls of the event loop
const FRAME_TIME: Duration = Duration::from_millis(2);

pub fn run(rom: &Path, config: Config, scale: u32) -> anyhow::Result<()> {
    let mut chip8 = Chip8::with_config(config);

    // Load ROM
    let file = File::open(rom).with_context(|| format!("unable to open {}", rom.display()))?;
    let mut reader = BufReader::new(file);
    chip8
        .load_rom(&mut reader)
        .with_context(|| format!("unable to load {}", rom.display()))?;
    info!("successfully loaded {}", rom.display());

    // Get SDL2 context
    let sdl = sdl2::init().map_err(|e| anyhow!(e))?;
    let mut display = Display::new(&sdl, scale)?;
    let mut events = sdl.event_pump().map_err(|e| anyhow!(e))?;

    let mut last_cycle = Instant::now();

    // Whether or not the default clock speed should be respected
    let mut fast_forward = false;
    // Whether the game's state should be cycled forwards or backwards
    let mut rewind = false;

    'event: loop {
        // If the draw flag is set, render the current frame and unset it
        if let Some(frame) = chip8.get_frame() {
            display.render(frame)?;
            chip8.clear_redraw();
        }

        // Handle input
        for event in events.poll_iter() {
            match event {
                Event::Quit { .. } => break 'event,
                Event::KeyDown {
                    keycode: Some(key), ..
                } => match (key, keymap(key)) {
                    (_, Some(kc)) => chip8.key_press(kc)?,
                    (Keycode::Space, _) => fast_forward = true,
                    (Keycode::Escape, _) => rewind = true,
                    _ => continue,
                },
                Event::KeyUp {
                    keycode: Some(key), ..
                } => match (key, keymap(key)) {
                    (_, Some(kc)) => chip8.key_release(kc)?,
                    (Keycode::Space, _) => fast_forward = false,
                    (Keycode::Escape, _) => rewind = false,
                    _ => continue,
                },
                _ => continue,
            };
        }

        // Update state
        let current_time = Instant::now();
        let elapsed = current_time - last_cycle;
        last_cycle = current_time;
        if rewind {
            chip8.reverse_cycle();
            // The whole frame buffer may have changed
            chip8.state_mut().draw_flag = true;
        } else {
            let elapsed = if fast_forward {
                elapsed * FAST_FORWARD
            } else {
                elapsed
            };
            chip8.run_for(elapsed)?;
        }

        std::thread::sleep(FRAME_TIME);
    }

    debug!(pc = chip8.state().pc, "quitting");
    Ok(())
}
