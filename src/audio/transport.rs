//! Hover-driven fade transport.
//!
//! Every clip moves through `Idle -> FadingIn -> Playing -> FadingOut -> Idle`.
//! Only one clip is *active* (fade-in eligible) at a time; entering another
//! clip pushes the previous active clip into its own fade-out. Each clip owns
//! at most one fade timer, and starting a fade on a clip always cancels that
//! clip's previous timer first. Fades on different clips never cancel each
//! other.

use super::output::{AudioOutput, ClipId};
use crate::log_debug;
use crate::scheduler::{Scheduler, TimerId};
use std::collections::BTreeMap;
use std::path::Path;
use std::time::{Duration, Instant};

/// Ceiling volume for a fully faded-in clip (not full scale).
pub const TARGET_VOLUME: f32 = 0.7;
pub const FADE_STEPS: u32 = 20;
pub const FADE_DURATION: Duration = Duration::from_millis(400);
pub const FADE_STEP_INTERVAL: Duration = Duration::from_millis(400 / FADE_STEPS as u64);
/// Volume added per fade-in step (0.035).
pub const FADE_IN_STEP: f32 = TARGET_VOLUME / FADE_STEPS as f32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportPhase {
    Idle,
    FadingIn,
    Playing,
    FadingOut,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Fade {
    In {
        start: f32,
        steps_done: u32,
        steps_total: u32,
    },
    Out {
        start: f32,
        steps_done: u32,
    },
}

#[derive(Debug)]
struct Voice {
    phase: TransportPhase,
    volume: f32,
    fade: Option<(Fade, TimerId)>,
}

impl Default for Voice {
    fn default() -> Self {
        Self {
            phase: TransportPhase::Idle,
            volume: 0.0,
            fade: None,
        }
    }
}

/// Steps needed to climb from `start` to the ceiling at `FADE_IN_STEP` per step.
fn fade_in_steps(start: f32) -> u32 {
    let gap = (TARGET_VOLUME - start).max(0.0);
    // Tolerate float error so a full fade from silence is exactly FADE_STEPS.
    let steps = (gap / FADE_IN_STEP - 1e-3).ceil();
    (steps.max(0.0) as u32).min(FADE_STEPS)
}

pub struct AudioTransport<O: AudioOutput> {
    output: O,
    voices: BTreeMap<ClipId, Voice>,
    active: Option<ClipId>,
    timers: Scheduler<ClipId>,
}

impl<O: AudioOutput> AudioTransport<O> {
    pub fn new(output: O) -> Self {
        Self {
            output,
            voices: BTreeMap::new(),
            active: None,
            timers: Scheduler::new(),
        }
    }

    /// Register a looping clip, primed silent and paused.
    pub fn load_clip(&mut self, source: &Path) -> ClipId {
        let clip = self.output.load(source);
        self.output.set_volume(clip, 0.0);
        self.voices.insert(clip, Voice::default());
        clip
    }

    pub fn output(&self) -> &O {
        &self.output
    }

    /// The clip currently eligible for fade-in, if any.
    pub fn active(&self) -> Option<ClipId> {
        self.active
    }

    pub fn phase(&self, clip: ClipId) -> TransportPhase {
        self.voices
            .get(&clip)
            .map(|voice| voice.phase)
            .unwrap_or(TransportPhase::Idle)
    }

    pub fn volume(&self, clip: ClipId) -> f32 {
        self.voices.get(&clip).map(|voice| voice.volume).unwrap_or(0.0)
    }

    pub fn has_fade_pending(&self, clip: ClipId) -> bool {
        self.voices
            .get(&clip)
            .and_then(|voice| voice.fade)
            .is_some_and(|(_, timer)| self.timers.is_pending(timer))
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.next_deadline()
    }

    pub fn on_hover_enter(&mut self, clip: ClipId, now: Instant) {
        if let Some(previous) = self.active.filter(|active| *active != clip) {
            if self.phase(previous) != TransportPhase::Idle {
                self.start_fade_out(previous, now);
            }
        }

        self.cancel_fade(clip);
        self.active = Some(clip);
        let voice = self.voices.entry(clip).or_default();
        if voice.phase == TransportPhase::Idle {
            voice.volume = 0.0;
            self.output.set_volume(clip, 0.0);
        }

        match self.output.play(clip) {
            Ok(()) => self.start_fade_in(clip, now),
            Err(err) => {
                log_debug(&format!("play request rejected for {clip}: {err}"));
                tracing::debug!(clip = clip.index(), error = %err, "play rejected");
                let voice = self.voices.entry(clip).or_default();
                voice.phase = TransportPhase::Idle;
                voice.volume = 0.0;
                self.output.set_volume(clip, 0.0);
                if self.active == Some(clip) {
                    self.active = None;
                }
            }
        }
    }

    pub fn on_hover_leave(&mut self, clip: ClipId, now: Instant) {
        self.cancel_fade(clip);
        if self.phase(clip) == TransportPhase::Idle {
            return;
        }
        self.start_fade_out(clip, now);
    }

    /// Run every fade step due at or before `now`.
    pub fn tick(&mut self, now: Instant) {
        while let Some(fired) = self.timers.pop_due(now) {
            self.on_fade_step(fired.payload, fired.id);
        }
    }

    fn cancel_fade(&mut self, clip: ClipId) {
        if let Some(voice) = self.voices.get_mut(&clip) {
            if let Some((_, timer)) = voice.fade.take() {
                self.timers.cancel(timer);
            }
        }
    }

    fn start_fade_in(&mut self, clip: ClipId, now: Instant) {
        self.cancel_fade(clip);
        let voice = self.voices.entry(clip).or_default();
        let start = voice.volume;
        let steps_total = fade_in_steps(start);
        if steps_total == 0 {
            voice.phase = TransportPhase::Playing;
            voice.volume = TARGET_VOLUME;
            self.output.set_volume(clip, TARGET_VOLUME);
            return;
        }
        let timer = self
            .timers
            .schedule_repeating(now + FADE_STEP_INTERVAL, FADE_STEP_INTERVAL, clip);
        voice.phase = TransportPhase::FadingIn;
        voice.fade = Some((
            Fade::In {
                start,
                steps_done: 0,
                steps_total,
            },
            timer,
        ));
        tracing::debug!(clip = clip.index(), start, steps_total, "fade in");
    }

    fn start_fade_out(&mut self, clip: ClipId, now: Instant) {
        self.cancel_fade(clip);
        let timer = self
            .timers
            .schedule_repeating(now + FADE_STEP_INTERVAL, FADE_STEP_INTERVAL, clip);
        let voice = self.voices.entry(clip).or_default();
        voice.phase = TransportPhase::FadingOut;
        voice.fade = Some((
            Fade::Out {
                start: voice.volume,
                steps_done: 0,
            },
            timer,
        ));
        tracing::debug!(clip = clip.index(), start = voice.volume, "fade out");
    }

    fn on_fade_step(&mut self, clip: ClipId, timer: TimerId) {
        let Some(voice) = self.voices.get_mut(&clip) else {
            self.timers.cancel(timer);
            return;
        };
        let Some((fade, current)) = voice.fade else {
            self.timers.cancel(timer);
            return;
        };
        if current != timer {
            // Stale tick from a fade that was replaced.
            self.timers.cancel(timer);
            return;
        }

        match fade {
            Fade::In {
                start,
                steps_done,
                steps_total,
            } => {
                let steps_done = steps_done + 1;
                if steps_done >= steps_total {
                    voice.volume = TARGET_VOLUME;
                    voice.phase = TransportPhase::Playing;
                    voice.fade = None;
                    self.timers.cancel(timer);
                } else {
                    voice.volume = (start + FADE_IN_STEP * steps_done as f32).min(TARGET_VOLUME);
                    voice.fade = Some((
                        Fade::In {
                            start,
                            steps_done,
                            steps_total,
                        },
                        timer,
                    ));
                }
                self.output.set_volume(clip, voice.volume);
            }
            Fade::Out { start, steps_done } => {
                let steps_done = steps_done + 1;
                if steps_done >= FADE_STEPS {
                    voice.volume = 0.0;
                    voice.phase = TransportPhase::Idle;
                    voice.fade = None;
                    self.timers.cancel(timer);
                    self.output.set_volume(clip, 0.0);
                    self.output.pause(clip);
                    self.output.rewind(clip);
                    if self.active == Some(clip) {
                        self.active = None;
                    }
                    tracing::debug!(clip = clip.index(), "faded out");
                } else {
                    let step = start / FADE_STEPS as f32;
                    voice.volume = (start - step * steps_done as f32).max(0.0);
                    voice.fade = Some((Fade::Out { start, steps_done }, timer));
                    self.output.set_volume(clip, voice.volume);
                }
            }
        }
    }
}
