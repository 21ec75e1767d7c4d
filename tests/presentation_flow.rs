//! Drives a full presentation: reveals, hover crossfades and the closing
//! section, with a recording output and synthetic time.

use sonicterm::audio::{
    AudioOutput, ClipId, NullOutput, PlaybackError, TransportPhase, FADE_DURATION,
    FADE_STEP_INTERVAL, TARGET_VOLUME,
};
use sonicterm::catalog::catalog;
use sonicterm::reveal::{AdvanceOutcome, CLOSING_DELAY, TERMINAL_LABEL};
use sonicterm::view::ViewBuilder;
use sonicterm::{Effect, Presentation};
use std::path::Path;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Call {
    Play(ClipId),
    Pause(ClipId),
    Rewind(ClipId),
}

/// Accepts every play request and remembers what it was asked to do.
#[derive(Default)]
struct RecordingOutput {
    ids: NullOutput,
    calls: Vec<Call>,
}

impl AudioOutput for RecordingOutput {
    fn load(&mut self, source: &Path) -> ClipId {
        self.ids.load(source)
    }

    fn play(&mut self, clip: ClipId) -> Result<(), PlaybackError> {
        self.calls.push(Call::Play(clip));
        Ok(())
    }

    fn pause(&mut self, clip: ClipId) {
        self.calls.push(Call::Pause(clip));
    }

    fn rewind(&mut self, clip: ClipId) {
        self.calls.push(Call::Rewind(clip));
    }

    fn set_volume(&mut self, _clip: ClipId, _volume: f32) {}
}

fn presentation() -> Presentation<RecordingOutput> {
    Presentation::new(
        catalog(),
        ViewBuilder::new("/nonexistent-media").without_visuals(),
        RecordingOutput::default(),
    )
}

fn ms(value: u64) -> Duration {
    Duration::from_millis(value)
}

#[test]
fn reveal_hover_and_close() {
    let mut show = presentation();
    let t0 = Instant::now();

    for expected in 0..3 {
        assert_eq!(show.advance(t0), AdvanceOutcome::Revealed { index: expected });
    }
    assert_eq!(show.views().len(), 3);
    assert_eq!(show.control().label(), "reveal term 4");
    assert!(!show.control().is_disabled());

    let scrolls = show.tick(t0 + ms(100));
    assert_eq!(
        scrolls,
        vec![Effect::ScrollTo(0), Effect::ScrollTo(1), Effect::ScrollTo(2)]
    );

    // Hover circle 2; halfway through its fade-in, move to circle 1.
    let hover = t0 + ms(200);
    show.pointer_enter(1, hover);
    assert_eq!(show.phase(1), TransportPhase::FadingIn);
    let switch = hover + ms(200);
    show.tick(switch);
    let partial = show.volume(1);
    assert!(partial > 0.2 && partial < TARGET_VOLUME, "partial volume {partial}");

    show.pointer_leave(1, switch);
    show.pointer_enter(0, switch);
    assert_eq!(show.phase(1), TransportPhase::FadingOut);
    assert_eq!(show.phase(0), TransportPhase::FadingIn);
    assert_eq!(show.volume(0), 0.0);

    show.tick(switch + FADE_STEP_INTERVAL);
    assert!(show.volume(1) < partial);
    assert!(show.volume(0) > 0.0);

    show.tick(switch + FADE_DURATION);
    assert_eq!(show.phase(1), TransportPhase::Idle);
    assert_eq!(show.volume(1), 0.0);
    assert_eq!(show.phase(0), TransportPhase::Playing);
    assert!((show.volume(0) - TARGET_VOLUME).abs() < 1e-6);

    let first = show.views()[0].clip;
    let second = show.views()[1].clip;
    assert_eq!(show.transport().active(), Some(first));
    let calls = &show.transport().output().calls;
    assert_eq!(calls.first(), Some(&Call::Play(second)));
    assert!(calls.contains(&Call::Play(first)));
    assert!(calls.contains(&Call::Pause(second)));
    assert!(calls.contains(&Call::Rewind(second)));
    assert!(!calls.contains(&Call::Pause(first)));

    // Reveal the remaining seven terms.
    let last = switch + FADE_DURATION;
    for _ in 0..6 {
        assert!(matches!(show.advance(last), AdvanceOutcome::Revealed { .. }));
    }
    assert_eq!(show.advance(last), AdvanceOutcome::Completed { index: 9 });
    assert_eq!(show.views().len(), 10);
    assert!(show.control().is_disabled());
    assert_eq!(show.control().label(), TERMINAL_LABEL);
    assert!(!show.closing_visible());

    show.tick(last + CLOSING_DELAY - ms(1));
    assert!(!show.closing_visible());
    let effects = show.tick(last + CLOSING_DELAY);
    assert!(effects.contains(&Effect::ClosingShown));
    assert!(show.closing_visible());

    assert_eq!(show.advance(last + ms(1000)), AdvanceOutcome::Ignored);
    assert_eq!(show.views().len(), 10);
    assert!(show.tick(last + ms(5000)).is_empty());
}

#[test]
fn leaving_mid_fade_in_fades_out_from_partial_volume() {
    let mut show = presentation();
    let t0 = Instant::now();
    show.advance(t0);

    show.pointer_enter(0, t0);
    show.tick(t0 + ms(100));
    let partial = show.volume(0);
    assert!(partial > 0.0);

    show.pointer_leave(0, t0 + ms(100));
    assert_eq!(show.phase(0), TransportPhase::FadingOut);
    show.tick(t0 + ms(100) + FADE_STEP_INTERVAL);
    assert!(show.volume(0) < partial);

    show.tick(t0 + ms(100) + FADE_DURATION);
    assert_eq!(show.phase(0), TransportPhase::Idle);
    assert_eq!(show.transport().active(), None);
}

#[test]
fn muted_output_keeps_every_clip_idle() {
    let mut show = Presentation::new(
        catalog(),
        ViewBuilder::new("/nonexistent-media").without_visuals(),
        NullOutput::new(),
    );
    let t0 = Instant::now();
    show.advance(t0);
    show.pointer_enter(0, t0);
    assert_eq!(show.phase(0), TransportPhase::Idle);
    assert_eq!(show.volume(0), 0.0);
    show.pointer_leave(0, t0);
    assert_eq!(show.transport().next_deadline(), None);
}

#[test]
fn hover_on_unrevealed_index_is_ignored() {
    let mut show = presentation();
    let t0 = Instant::now();
    show.pointer_enter(4, t0);
    show.pointer_leave(4, t0);
    assert!(show.transport().output().calls.is_empty());
    assert_eq!(show.next_deadline(), None);
}
