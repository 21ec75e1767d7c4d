use std::fmt;
use std::path::Path;

/// Index of a loaded clip inside an [`AudioOutput`]. Acts as a weak handle:
/// holding one does not keep anything playing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClipId(pub(crate) usize);

impl ClipId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for ClipId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "clip#{}", self.0)
    }
}

/// Why a play request was rejected. Never surfaced to the user; the
/// transport logs it and leaves the clip silent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackError {
    /// The clip's resource could not be loaded or decoded.
    ClipUnavailable { clip: ClipId, reason: String },
    /// Audio output is disabled (`--mute` or no device).
    OutputDisabled,
    UnknownClip(ClipId),
}

impl fmt::Display for PlaybackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlaybackError::ClipUnavailable { clip, reason } => {
                write!(f, "{clip} unavailable: {reason}")
            }
            PlaybackError::OutputDisabled => write!(f, "audio output disabled"),
            PlaybackError::UnknownClip(clip) => write!(f, "{clip} was never loaded"),
        }
    }
}

impl std::error::Error for PlaybackError {}

/// Playback surface driven by the transport.
///
/// Clips loop forever once playing. `load` never fails: a resource that
/// cannot be decoded is still registered, and its `play` calls are rejected.
pub trait AudioOutput {
    /// Register a clip, primed at volume 0 and paused.
    fn load(&mut self, source: &Path) -> ClipId;
    fn play(&mut self, clip: ClipId) -> Result<(), PlaybackError>;
    fn pause(&mut self, clip: ClipId);
    /// Seek back to the start of the clip.
    fn rewind(&mut self, clip: ClipId);
    fn set_volume(&mut self, clip: ClipId, volume: f32);
}

impl<T: AudioOutput + ?Sized> AudioOutput for Box<T> {
    fn load(&mut self, source: &Path) -> ClipId {
        (**self).load(source)
    }

    fn play(&mut self, clip: ClipId) -> Result<(), PlaybackError> {
        (**self).play(clip)
    }

    fn pause(&mut self, clip: ClipId) {
        (**self).pause(clip)
    }

    fn rewind(&mut self, clip: ClipId) {
        (**self).rewind(clip)
    }

    fn set_volume(&mut self, clip: ClipId, volume: f32) {
        (**self).set_volume(clip, volume)
    }
}

/// Output used when audio is muted or no device could be opened.
#[derive(Debug, Default)]
pub struct NullOutput {
    loaded: usize,
}

impl NullOutput {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AudioOutput for NullOutput {
    fn load(&mut self, _source: &Path) -> ClipId {
        let clip = ClipId(self.loaded);
        self.loaded += 1;
        clip
    }

    fn play(&mut self, clip: ClipId) -> Result<(), PlaybackError> {
        if clip.0 >= self.loaded {
            return Err(PlaybackError::UnknownClip(clip));
        }
        Err(PlaybackError::OutputDisabled)
    }

    fn pause(&mut self, _clip: ClipId) {}

    fn rewind(&mut self, _clip: ClipId) {}

    fn set_volume(&mut self, _clip: ClipId, _volume: f32) {}
}
