//! Composition root: owns the reveal controller, the audio transport and the
//! view builder, and is the only thing the front end talks to.

use crate::audio::{AudioOutput, AudioTransport, TransportPhase};
use crate::catalog::TermRecord;
use crate::hover::HoverController;
use crate::reveal::{AdvanceControl, AdvanceOutcome, RevealController, RevealEffect};
use crate::view::{TermView, ViewBuilder};
use std::time::Instant;

/// Something the front end has to act on after a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    ScrollTo(usize),
    ClosingShown,
}

pub struct Presentation<O: AudioOutput> {
    reveal: RevealController,
    transport: AudioTransport<O>,
    builder: ViewBuilder,
}

impl<O: AudioOutput> Presentation<O> {
    pub fn new(catalog: &'static [TermRecord], builder: ViewBuilder, output: O) -> Self {
        Self {
            reveal: RevealController::new(catalog),
            transport: AudioTransport::new(output),
            builder,
        }
    }

    pub fn advance(&mut self, now: Instant) -> AdvanceOutcome {
        self.reveal.advance(now, &self.builder, &mut self.transport)
    }

    /// Pointer entered the circle of the view at `view`. Unknown indexes are ignored.
    pub fn pointer_enter(&mut self, view: usize, now: Instant) {
        if let Some(clip) = self.views().get(view).map(|v| v.clip) {
            HoverController::enter(&mut self.transport, clip, now);
        }
    }

    pub fn pointer_leave(&mut self, view: usize, now: Instant) {
        if let Some(clip) = self.views().get(view).map(|v| v.clip) {
            HoverController::leave(&mut self.transport, clip, now);
        }
    }

    /// Fire every timer due at `now`. Fades run first so volumes are current
    /// when the caller redraws.
    pub fn tick(&mut self, now: Instant) -> Vec<Effect> {
        self.transport.tick(now);
        self.reveal
            .tick(now)
            .into_iter()
            .map(|effect| match effect {
                RevealEffect::ScrollIntoView(index) => Effect::ScrollTo(index),
                RevealEffect::ClosingShown => Effect::ClosingShown,
            })
            .collect()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.transport.next_deadline(), self.reveal.next_deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    pub fn views(&self) -> &[TermView] {
        self.reveal.surface().views()
    }

    pub fn control(&self) -> &AdvanceControl {
        self.reveal.control()
    }

    pub fn closing_visible(&self) -> bool {
        self.reveal.closing_visible()
    }

    pub fn revealed(&self) -> usize {
        self.reveal.next_index()
    }

    pub fn total(&self) -> usize {
        self.reveal.total()
    }

    pub fn volume(&self, view: usize) -> f32 {
        self.views()
            .get(view)
            .map(|v| self.transport.volume(v.clip))
            .unwrap_or(0.0)
    }

    pub fn phase(&self, view: usize) -> TransportPhase {
        self.views()
            .get(view)
            .map(|v| self.transport.phase(v.clip))
            .unwrap_or(TransportPhase::Idle)
    }

    pub fn transport(&self) -> &AudioTransport<O> {
        &self.transport
    }
}
