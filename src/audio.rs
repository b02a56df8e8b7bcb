/// # Audio
/// Plays the machine's single tone.
///
/// The tick driver signals one or the other on every tick depending on the sound timer,
/// so both calls must be no-ops when the tone is already in the requested state.
pub trait Audio {
    fn start_tone(&mut self);
    fn stop_tone(&mut self);
}
