//! Looping clip playback through a CPAL output stream.
//!
//! The main thread owns the [`Mixer`] and edits the voice table; the CPAL
//! callback thread reads it to fill device buffers. Each voice loops its
//! clip forever while unpaused.

use super::clip::load_clip;
use super::output::{AudioOutput, ClipId, PlaybackError};
use crate::{lock_or_recover, log_debug};
use anyhow::{anyhow, Context, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{SampleFormat, StreamConfig};
use std::path::Path;
use std::sync::{Arc, Mutex};

pub(super) enum ClipSource {
    Ready(Arc<[f32]>),
    Unavailable(String),
}

pub(super) struct MixVoice {
    pub(super) source: ClipSource,
    pub(super) position: usize,
    pub(super) volume: f32,
    pub(super) playing: bool,
}

#[derive(Default)]
pub(super) struct MixState {
    pub(super) voices: Vec<MixVoice>,
}

impl MixState {
    pub(super) fn push(&mut self, source: ClipSource) -> ClipId {
        self.voices.push(MixVoice {
            source,
            position: 0,
            volume: 0.0,
            playing: false,
        });
        ClipId(self.voices.len() - 1)
    }

    pub(super) fn play(&mut self, clip: ClipId) -> Result<(), PlaybackError> {
        let voice = self
            .voices
            .get_mut(clip.0)
            .ok_or(PlaybackError::UnknownClip(clip))?;
        match &voice.source {
            ClipSource::Ready(_) => {
                voice.playing = true;
                Ok(())
            }
            ClipSource::Unavailable(reason) => Err(PlaybackError::ClipUnavailable {
                clip,
                reason: reason.clone(),
            }),
        }
    }

    pub(super) fn voice_mut(&mut self, clip: ClipId) -> Option<&mut MixVoice> {
        self.voices.get_mut(clip.0)
    }

    /// Produce the next mono output sample, advancing every playing voice.
    pub(super) fn next_sample(&mut self) -> f32 {
        let mut acc = 0.0f32;
        for voice in self.voices.iter_mut().filter(|v| v.playing) {
            let ClipSource::Ready(samples) = &voice.source else {
                continue;
            };
            if samples.is_empty() {
                continue;
            }
            if voice.position >= samples.len() {
                voice.position = 0;
            }
            acc += samples[voice.position] * voice.volume;
            voice.position = (voice.position + 1) % samples.len();
        }
        acc.clamp(-1.0, 1.0)
    }

    pub(super) fn render_into<T: Copy>(
        &mut self,
        data: &mut [T],
        channels: usize,
        convert: impl Fn(f32) -> T,
    ) {
        for frame in data.chunks_mut(channels.max(1)) {
            let value = convert(self.next_sample());
            frame.fill(value);
        }
    }
}

/// Audio output device wrapper that mixes looping clips.
pub struct Mixer {
    state: Arc<Mutex<MixState>>,
    sample_rate: u32,
    device_name: String,
    _stream: cpal::Stream,
}

impl Mixer {
    /// List output device names for `--list-output-devices`.
    pub fn list_devices() -> Result<Vec<String>> {
        let host = cpal::default_host();
        let devices = host
            .output_devices()
            .context("no output devices available")?;
        let mut names = Vec::new();
        for device in devices {
            if let Ok(name) = device.name() {
                names.push(name);
            }
        }
        Ok(names)
    }

    /// Open the preferred (or default) output device and start a silent stream.
    pub fn open(preferred_device: Option<&str>) -> Result<Self> {
        let host = cpal::default_host();
        let device = match preferred_device {
            Some(name) => {
                let mut devices = host
                    .output_devices()
                    .context("no output devices available")?;
                devices
                    .find(|d| d.name().map(|n| n == name).unwrap_or(false))
                    .ok_or_else(|| anyhow!("output device '{name}' not found"))?
            }
            None => host
                .default_output_device()
                .context("no default output device available")?,
        };
        let device_name = device
            .name()
            .unwrap_or_else(|_| "Unknown Device".to_string());

        let default_config = device.default_output_config()?;
        let format = default_config.sample_format();
        let config: StreamConfig = default_config.into();
        let sample_rate = config.sample_rate.0;
        let channels = usize::from(config.channels.max(1));
        log_debug(&format!(
            "Mixer config: device={device_name} format={format:?} sample_rate={sample_rate}Hz channels={channels}"
        ));

        let state = Arc::new(Mutex::new(MixState::default()));
        let callback_state = state.clone();
        let err_fn = |err| log_debug(&format!("audio_stream_error: {err}"));

        let stream = match format {
            SampleFormat::F32 => device.build_output_stream(
                &config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    if let Ok(mut mix) = callback_state.lock() {
                        mix.render_into(data, channels, |s| s);
                    }
                },
                err_fn,
                None,
            )?,
            SampleFormat::I16 => device.build_output_stream(
                &config,
                move |data: &mut [i16], _: &cpal::OutputCallbackInfo| {
                    if let Ok(mut mix) = callback_state.lock() {
                        mix.render_into(data, channels, |s| (s * i16::MAX as f32) as i16);
                    }
                },
                err_fn,
                None,
            )?,
            SampleFormat::U16 => device.build_output_stream(
                &config,
                move |data: &mut [u16], _: &cpal::OutputCallbackInfo| {
                    if let Ok(mut mix) = callback_state.lock() {
                        mix.render_into(data, channels, |s| {
                            ((s * 0.5 + 0.5) * u16::MAX as f32) as u16
                        });
                    }
                },
                err_fn,
                None,
            )?,
            other => return Err(anyhow!("unsupported sample format: {other:?}")),
        };
        stream.play()?;

        Ok(Self {
            state,
            sample_rate,
            device_name,
            _stream: stream,
        })
    }

    pub fn device_name(&self) -> &str {
        &self.device_name
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}

impl AudioOutput for Mixer {
    fn load(&mut self, source: &Path) -> ClipId {
        let clip = match load_clip(source, self.sample_rate) {
            Ok(samples) => {
                log_debug(&format!(
                    "loaded clip {} ({} samples)",
                    source.display(),
                    samples.len()
                ));
                ClipSource::Ready(samples.into())
            }
            Err(err) => {
                log_debug(&format!("clip unavailable: {err:#}"));
                ClipSource::Unavailable(format!("{err:#}"))
            }
        };
        lock_or_recover(&self.state, "mixer load").push(clip)
    }

    fn play(&mut self, clip: ClipId) -> Result<(), PlaybackError> {
        lock_or_recover(&self.state, "mixer play").play(clip)
    }

    fn pause(&mut self, clip: ClipId) {
        if let Some(voice) = lock_or_recover(&self.state, "mixer pause").voice_mut(clip) {
            voice.playing = false;
        }
    }

    fn rewind(&mut self, clip: ClipId) {
        if let Some(voice) = lock_or_recover(&self.state, "mixer rewind").voice_mut(clip) {
            voice.position = 0;
        }
    }

    fn set_volume(&mut self, clip: ClipId, volume: f32) {
        if let Some(voice) = lock_or_recover(&self.state, "mixer volume").voice_mut(clip) {
            voice.volume = volume.clamp(0.0, 1.0);
        }
    }
}
