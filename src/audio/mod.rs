//! Looping clip playback with hover-driven volume fades.
//!
//! Clips are decoded from WAV (via hound), downmixed to mono and resampled to
//! the output device rate, then mixed in a CPAL output callback. The
//! [`AudioTransport`] owns every fade and the single active clip.

mod clip;
mod mixer;
mod output;
mod resample;
mod transport;

pub use clip::load_clip;
pub use mixer::Mixer;
pub use output::{AudioOutput, ClipId, NullOutput, PlaybackError};
pub use transport::{
    AudioTransport, TransportPhase, FADE_DURATION, FADE_IN_STEP, FADE_STEPS, FADE_STEP_INTERVAL,
    TARGET_VOLUME,
};
