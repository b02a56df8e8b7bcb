use log::debug;
use sdl2::audio::{AudioCallback, AudioDevice, AudioSpecDesired};

use chipvm::Audio;

const SAMPLE_RATE: i32 = 44_100;
const TONE_FREQUENCY: f32 = 440.0;

struct SquareWave {
    phase_inc: f32,
    phase: f32,
    volume: f32,
}

impl AudioCallback for SquareWave {
    type Channel = f32;

    fn callback(&mut self, out: &mut [f32]) {
        for sample in out.iter_mut() {
            *sample = if self.phase <= 0.5 {
                self.volume
            } else {
                -self.volume
            };
            self.phase = (self.phase + self.phase_inc) % 1.0;
        }
    }
}

/// # Beeper
/// A paused SDL2 playback device producing a 440 Hz square wave.
/// Resuming or pausing it only happens on a change, so repeated calls are free.
pub struct Beeper {
    device: AudioDevice<SquareWave>,
    playing: bool,
}

impl Beeper {
    /// # Arguments
    /// * `sdl` an sdl2 context with which to play
    /// * `volume` amplitude of the wave, 0.0..=1.0
    pub fn new(sdl: &sdl2::Sdl, volume: f32) -> Result<Self, String> {
        let audio_subsystem = sdl.audio()?;
        let desired = AudioSpecDesired {
            freq: Some(SAMPLE_RATE),
            channels: Some(1),
            samples: None,
        };
        let device = audio_subsystem.open_playback(None, &desired, |spec| SquareWave {
            phase_inc: TONE_FREQUENCY / spec.freq as f32,
            phase: 0.0,
            volume,
        })?;

        Ok(Beeper {
            device,
            playing: false,
        })
    }
}

impl Audio for Beeper {
    fn start_tone(&mut self) {
        if !self.playing {
            self.device.resume();
            self.playing = true;
            debug!("Tone started");
        }
    }

    fn stop_tone(&mut self) {
        if self.playing {
            self.device.pause();
            self.playing = false;
            debug!("Tone stopped");
        }
    }
}
