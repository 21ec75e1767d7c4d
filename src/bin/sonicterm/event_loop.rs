//! Main loop: waits for input, the next presentation deadline or the next
//! animation frame, whichever comes first, then ticks and redraws.

use std::io;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossbeam_channel::{Receiver, RecvTimeoutError};
use ratatui::{backend::CrosstermBackend, layout::Rect, Terminal};
use sonicterm::audio::AudioOutput;
use sonicterm::hover::{HoverEvent, PointerTracker};
use sonicterm::visual::VisualState;
use sonicterm::{log_debug, Effect, Presentation};

use crate::input::InputEvent;
use crate::layout::{compute_layout, DocLayout, ViewSpec};
use crate::render::{self, Scene};
use crate::scroll::ScrollState;

/// Longest sleep when nothing is animating or scheduled.
const IDLE_WAIT: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Flow {
    Continue,
    Quit,
}

pub(crate) struct EventLoopState<O: AudioOutput> {
    pub(crate) presentation: Presentation<O>,
    tracker: PointerTracker,
    scroll: ScrollState,
    pointer: Option<(u16, u16)>,
    layout: DocLayout,
    area: Rect,
    started: Instant,
    frame_interval: Duration,
    audio_note: String,
}

impl<O: AudioOutput> EventLoopState<O> {
    pub(crate) fn new(
        presentation: Presentation<O>,
        area: Rect,
        frame_interval: Duration,
        audio_note: String,
        now: Instant,
    ) -> Self {
        let mut state = Self {
            presentation,
            tracker: PointerTracker::new(),
            scroll: ScrollState::new(),
            pointer: None,
            layout: compute_layout(area.width, &[], "", false),
            area,
            started: now,
            frame_interval,
            audio_note,
        };
        state.relayout(now);
        state
    }

    fn viewport_height(&self) -> u16 {
        render::viewport(self.area).height
    }

    fn relayout(&mut self, now: Instant) {
        let specs: Vec<ViewSpec<'_>> = self
            .presentation
            .views()
            .iter()
            .map(ViewSpec::from)
            .collect();
        self.layout = compute_layout(
            self.area.width,
            &specs,
            self.presentation.control().label(),
            self.presentation.closing_visible(),
        );
        let max = self.layout.max_scroll(self.viewport_height());
        self.scroll.clamp(max, now);
    }

    /// Hit-test the last known pointer position and forward enter/leave.
    fn refresh_hover(&mut self, now: Instant) {
        let viewport = self.viewport_height();
        let hit = self.pointer.and_then(|(column, row)| {
            if row >= viewport {
                return None;
            }
            let doc_row = row.saturating_add(self.scroll.offset(now));
            self.layout.circle_at(column, doc_row)
        });
        let events = self.tracker.update(hit);
        self.dispatch_hover(events, now);
    }

    fn drop_pointer(&mut self, now: Instant) {
        self.pointer = None;
        let events = self.tracker.clear();
        self.dispatch_hover(events, now);
    }

    fn dispatch_hover(&mut self, events: Vec<HoverEvent>, now: Instant) {
        for event in events {
            match event {
                HoverEvent::Enter(view) => self.presentation.pointer_enter(view, now),
                HoverEvent::Leave(view) => self.presentation.pointer_leave(view, now),
            }
        }
    }

    fn advance(&mut self, now: Instant) {
        let outcome = self.presentation.advance(now);
        log_debug(&format!("advance: {outcome:?}"));
        self.relayout(now);
        self.refresh_hover(now);
    }

    fn scroll_by(&mut self, delta: i32, now: Instant) {
        let max = self.layout.max_scroll(self.viewport_height());
        self.scroll.scroll_by(delta, max, now);
        self.refresh_hover(now);
    }

    pub(crate) fn handle_input(&mut self, event: InputEvent, now: Instant) -> Flow {
        let page = i32::from(self.viewport_height().saturating_sub(1).max(1));
        match event {
            InputEvent::Quit => return Flow::Quit,
            InputEvent::Advance => self.advance(now),
            InputEvent::ScrollLines(lines) => self.scroll_by(lines, now),
            InputEvent::ScrollPages(pages) => self.scroll_by(pages * page, now),
            InputEvent::ScrollHome => self.scroll_by(-i32::from(u16::MAX), now),
            InputEvent::ScrollEnd => self.scroll_by(i32::from(u16::MAX), now),
            InputEvent::PointerMoved { column, row } => {
                self.pointer = Some((column, row));
                self.refresh_hover(now);
            }
            InputEvent::Click { column, row } => {
                self.pointer = Some((column, row));
                let doc_row = row.saturating_add(self.scroll.offset(now));
                if row < self.viewport_height()
                    && self.layout.button_contains(column, doc_row)
                    && !self.presentation.control().is_disabled()
                {
                    self.advance(now);
                } else {
                    self.refresh_hover(now);
                }
            }
            InputEvent::Resize { cols, rows } => {
                self.area = Rect::new(0, 0, cols, rows);
                self.drop_pointer(now);
                self.relayout(now);
            }
            InputEvent::PointerLost => self.drop_pointer(now),
        }
        Flow::Continue
    }

    /// Run due timers and apply their effects to the viewport.
    pub(crate) fn tick(&mut self, now: Instant) {
        for effect in self.presentation.tick(now) {
            match effect {
                Effect::ScrollTo(view) => {
                    if let Some(target) =
                        self.layout.centered_offset(view, self.viewport_height())
                    {
                        self.scroll.scroll_to(target, now);
                    }
                }
                Effect::ClosingShown => {
                    log_debug("closing section shown");
                    self.relayout(now);
                }
            }
        }
        if self.scroll.is_animating(now) {
            self.refresh_hover(now);
        }
    }

    fn animating(&self, now: Instant) -> bool {
        self.scroll.is_animating(now)
            || self
                .presentation
                .views()
                .iter()
                .any(|view| matches!(&view.visual, VisualState::Animated(v) if v.frame_count() > 1))
    }

    /// When the loop should wake up next if no input arrives.
    pub(crate) fn next_wake(&self, now: Instant) -> Instant {
        let frame = if self.animating(now) {
            now + self.frame_interval
        } else {
            now + IDLE_WAIT
        };
        self.presentation
            .next_deadline()
            .map_or(frame, |deadline| deadline.min(frame))
    }

    pub(crate) fn draw(&self, frame: &mut ratatui::Frame<'_>, now: Instant) {
        let scene = Scene {
            layout: &self.layout,
            hovered: self.tracker.hovered(),
            elapsed: now.saturating_duration_since(self.started),
            scroll: self.scroll.offset(now),
            audio_note: &self.audio_note,
        };
        render::draw(frame, &self.presentation, &scene);
    }

    pub(crate) fn scroll_offset(&self, now: Instant) -> u16 {
        self.scroll.offset(now)
    }

    pub(crate) fn hovered(&self) -> Option<usize> {
        self.tracker.hovered()
    }

    pub(crate) fn layout(&self) -> &DocLayout {
        &self.layout
    }
}

pub(crate) fn run_event_loop<O: AudioOutput>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    state: &mut EventLoopState<O>,
    input_rx: &Receiver<InputEvent>,
) -> Result<()> {
    terminal.draw(|frame| state.draw(frame, Instant::now()))?;

    loop {
        let now = Instant::now();
        let timeout = state.next_wake(now).saturating_duration_since(now);
        match input_rx.recv_timeout(timeout) {
            Ok(event) => {
                if state.handle_input(event, Instant::now()) == Flow::Quit {
                    break;
                }
                let mut quit = false;
                while let Ok(event) = input_rx.try_recv() {
                    if state.handle_input(event, Instant::now()) == Flow::Quit {
                        quit = true;
                        break;
                    }
                }
                if quit {
                    break;
                }
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => {
                log_debug("input channel closed");
                break;
            }
        }

        let now = Instant::now();
        state.tick(now);
        terminal.draw(|frame| state.draw(frame, now))?;
    }

    state.drop_pointer(Instant::now());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sonicterm::audio::{NullOutput, TransportPhase};
    use sonicterm::catalog::catalog;
    use sonicterm::reveal::{CLOSING_DELAY, SCROLL_DELAY};
    use sonicterm::view::ViewBuilder;

    fn state(now: Instant) -> EventLoopState<NullOutput> {
        let presentation = Presentation::new(
            catalog(),
            ViewBuilder::new("/nonexistent-media").without_visuals(),
            NullOutput::new(),
        );
        EventLoopState::new(
            presentation,
            Rect::new(0, 0, 100, 30),
            Duration::from_millis(50),
            "muted".to_string(),
            now,
        )
    }

    fn circle_centre(state: &EventLoopState<NullOutput>, view: usize, now: Instant) -> (u16, u16) {
        let circle = state.layout().views[view].circle;
        let row = (circle.y + circle.height / 2) - state.scroll_offset(now);
        (circle.x + circle.width / 2, row)
    }

    #[test]
    fn quit_key_stops_the_loop() {
        let now = Instant::now();
        let mut state = state(now);
        assert_eq!(state.handle_input(InputEvent::Quit, now), Flow::Quit);
        assert_eq!(state.handle_input(InputEvent::Advance, now), Flow::Continue);
    }

    #[test]
    fn clicking_the_button_reveals_next_term() {
        let now = Instant::now();
        let mut state = state(now);
        let button = state.layout().button;
        state.handle_input(
            InputEvent::Click {
                column: button.x + 1,
                row: button.y + 1,
            },
            now,
        );
        assert_eq!(state.presentation.revealed(), 1);
        assert_eq!(state.presentation.control().label(), "reveal term 2");
    }

    #[test]
    fn pointer_over_circle_enters_and_leaves() {
        let now = Instant::now();
        let mut state = state(now);
        state.handle_input(InputEvent::Advance, now);
        let (column, row) = circle_centre(&state, 0, now);
        state.handle_input(InputEvent::PointerMoved { column, row }, now);
        assert_eq!(state.hovered(), Some(0));
        // Muted output rejects playback, so the clip stays idle.
        assert_eq!(state.presentation.phase(0), TransportPhase::Idle);

        state.handle_input(InputEvent::PointerLost, now);
        assert_eq!(state.hovered(), None);
    }

    #[test]
    fn resize_drops_hover() {
        let now = Instant::now();
        let mut state = state(now);
        state.handle_input(InputEvent::Advance, now);
        let (column, row) = circle_centre(&state, 0, now);
        state.handle_input(InputEvent::PointerMoved { column, row }, now);
        state.handle_input(InputEvent::Resize { cols: 60, rows: 20 }, now);
        assert_eq!(state.hovered(), None);
        assert_eq!(state.layout().width, 60);
    }

    #[test]
    fn reveal_scrolls_after_delay_and_closing_extends_layout() {
        let t0 = Instant::now();
        let mut state = state(t0);
        for _ in 0..catalog().len() {
            state.handle_input(InputEvent::Advance, t0);
        }
        assert!(state.next_wake(t0) <= t0 + SCROLL_DELAY);
        assert_eq!(state.scroll_offset(t0), 0);

        state.tick(t0 + SCROLL_DELAY);
        let settled = t0 + SCROLL_DELAY + Duration::from_secs(1);
        assert!(state.scroll_offset(settled) > 0);

        let before = state.layout().height;
        state.tick(t0 + CLOSING_DELAY);
        assert!(state.presentation.closing_visible());
        assert!(state.layout().height > before);
    }

    #[test]
    fn manual_scroll_is_clamped() {
        let now = Instant::now();
        let mut state = state(now);
        state.handle_input(InputEvent::ScrollEnd, now);
        assert_eq!(
            state.scroll_offset(now),
            state.layout().max_scroll(29)
        );
        state.handle_input(InputEvent::ScrollHome, now);
        assert_eq!(state.scroll_offset(now), 0);
    }
}
