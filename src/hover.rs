//! Pointer hover plumbing between circles and the audio transport.

use crate::audio::{AudioOutput, AudioTransport, ClipId};
use crate::log_debug;
use std::time::Instant;

/// Forwards circle enter/leave to the transport. Holds no state.
pub struct HoverController;

impl HoverController {
    pub fn enter<O: AudioOutput>(transport: &mut AudioTransport<O>, clip: ClipId, now: Instant) {
        log_debug(&format!("hover enter {clip}"));
        transport.on_hover_enter(clip, now);
    }

    pub fn leave<O: AudioOutput>(transport: &mut AudioTransport<O>, clip: ClipId, now: Instant) {
        log_debug(&format!("hover leave {clip}"));
        transport.on_hover_leave(clip, now);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoverEvent {
    Enter(usize),
    Leave(usize),
}

/// Turns a stream of "which circle is under the pointer" samples into
/// enter/leave pairs, the way a browser fires `mouseenter`/`mouseleave`.
///
/// A leave for the old circle is always emitted before the enter for the
/// new one.
#[derive(Debug, Default)]
pub struct PointerTracker {
    hovered: Option<usize>,
}

impl PointerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hovered(&self) -> Option<usize> {
        self.hovered
    }

    pub fn update(&mut self, hit: Option<usize>) -> Vec<HoverEvent> {
        if hit == self.hovered {
            return Vec::new();
        }
        let mut events = Vec::with_capacity(2);
        if let Some(previous) = self.hovered {
            events.push(HoverEvent::Leave(previous));
        }
        if let Some(next) = hit {
            events.push(HoverEvent::Enter(next));
        }
        self.hovered = hit;
        events
    }

    /// Pointer left the surface entirely (focus lost, resize, exit).
    pub fn clear(&mut self) -> Vec<HoverEvent> {
        self.update(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn moving_within_a_circle_emits_nothing() {
        let mut tracker = PointerTracker::new();
        assert_eq!(tracker.update(Some(1)), vec![HoverEvent::Enter(1)]);
        assert!(tracker.update(Some(1)).is_empty());
        assert_eq!(tracker.hovered(), Some(1));
    }

    #[test]
    fn switching_circles_leaves_before_entering() {
        let mut tracker = PointerTracker::new();
        tracker.update(Some(1));
        assert_eq!(
            tracker.update(Some(0)),
            vec![HoverEvent::Leave(1), HoverEvent::Enter(0)]
        );
    }

    #[test]
    fn clear_emits_leave_once() {
        let mut tracker = PointerTracker::new();
        tracker.update(Some(2));
        assert_eq!(tracker.clear(), vec![HoverEvent::Leave(2)]);
        assert!(tracker.clear().is_empty());
        assert_eq!(tracker.hovered(), None);
    }
}
