//! Sequential reveal of catalog terms.
//!
//! Each `advance` materializes the next term into the display surface,
//! schedules a scroll to it, and relabels the advance control. After the last
//! term the control is disabled for good and the closing surface is shown
//! once, a short delay later.

use crate::audio::{AudioOutput, AudioTransport};
use crate::catalog::TermRecord;
use crate::log_debug;
use crate::scheduler::Scheduler;
use crate::view::{TermView, ViewBuilder};
use std::time::{Duration, Instant};

/// Delay before scrolling to a freshly revealed view, so layout can settle.
pub const SCROLL_DELAY: Duration = Duration::from_millis(100);
/// Delay between the final reveal and the closing section appearing.
pub const CLOSING_DELAY: Duration = Duration::from_millis(600);
pub const TERMINAL_LABEL: &str = "all terms revealed";

pub fn advance_label(next_number: usize) -> String {
    format!("reveal term {next_number}")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealPhase {
    Revealing,
    Complete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvanceOutcome {
    Revealed { index: usize },
    /// The last term was revealed by this call.
    Completed { index: usize },
    /// Everything is already revealed; nothing changed.
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RevealTimer {
    ScrollIntoView(usize),
    ShowClosing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealEffect {
    /// Bring the view at this index to the vertical centre of the viewport.
    ScrollIntoView(usize),
    ClosingShown,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdvanceControl {
    label: String,
    disabled: bool,
}

impl AdvanceControl {
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }
}

/// Append-only container of revealed views.
#[derive(Debug, Default)]
pub struct DisplaySurface {
    views: Vec<TermView>,
}

impl DisplaySurface {
    pub fn views(&self) -> &[TermView] {
        &self.views
    }

    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }

    fn append(&mut self, view: TermView) {
        self.views.push(view);
    }
}

pub struct RevealController {
    catalog: &'static [TermRecord],
    next_index: usize,
    surface: DisplaySurface,
    control: AdvanceControl,
    closing_visible: bool,
    timers: Scheduler<RevealTimer>,
}

impl RevealController {
    pub fn new(catalog: &'static [TermRecord]) -> Self {
        let empty = catalog.is_empty();
        Self {
            catalog,
            next_index: 0,
            surface: DisplaySurface::default(),
            control: AdvanceControl {
                label: if empty {
                    TERMINAL_LABEL.to_string()
                } else {
                    advance_label(1)
                },
                disabled: empty,
            },
            closing_visible: empty,
            timers: Scheduler::new(),
        }
    }

    pub fn phase(&self) -> RevealPhase {
        if self.next_index >= self.catalog.len() {
            RevealPhase::Complete
        } else {
            RevealPhase::Revealing
        }
    }

    pub fn next_index(&self) -> usize {
        self.next_index
    }

    pub fn total(&self) -> usize {
        self.catalog.len()
    }

    pub fn surface(&self) -> &DisplaySurface {
        &self.surface
    }

    pub fn control(&self) -> &AdvanceControl {
        &self.control
    }

    pub fn closing_visible(&self) -> bool {
        self.closing_visible
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.next_deadline()
    }

    pub fn advance<O: AudioOutput>(
        &mut self,
        now: Instant,
        builder: &ViewBuilder,
        transport: &mut AudioTransport<O>,
    ) -> AdvanceOutcome {
        let Some(record) = self.catalog.get(self.next_index) else {
            log_debug("advance ignored: all terms already revealed");
            return AdvanceOutcome::Ignored;
        };

        let index = self.next_index;
        self.surface.append(builder.build(record, transport));
        self.timers
            .schedule_once(now + SCROLL_DELAY, RevealTimer::ScrollIntoView(index));
        self.next_index += 1;
        tracing::info!(term = record.number, "term revealed");

        if self.next_index < self.catalog.len() {
            self.control.label = advance_label(self.next_index + 1);
            AdvanceOutcome::Revealed { index }
        } else {
            self.control.disabled = true;
            self.control.label = TERMINAL_LABEL.to_string();
            self.timers
                .schedule_once(now + CLOSING_DELAY, RevealTimer::ShowClosing);
            log_debug("all terms revealed; closing section scheduled");
            AdvanceOutcome::Completed { index }
        }
    }

    /// Apply due timers and report what the front end should do.
    pub fn tick(&mut self, now: Instant) -> Vec<RevealEffect> {
        let mut effects = Vec::new();
        while let Some(fired) = self.timers.pop_due(now) {
            match fired.payload {
                RevealTimer::ScrollIntoView(index) => {
                    effects.push(RevealEffect::ScrollIntoView(index));
                }
                RevealTimer::ShowClosing => {
                    if !self.closing_visible {
                        self.closing_visible = true;
                        effects.push(RevealEffect::ClosingShown);
                    }
                }
            }
        }
        effects
    }
}
