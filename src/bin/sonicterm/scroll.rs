//! Animated vertical scrolling of the document viewport.

use std::time::{Duration, Instant};

/// How long a smooth scroll to a newly revealed term takes.
pub(crate) const SCROLL_DURATION: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, Copy)]
struct Animation {
    from: f32,
    started: Instant,
}

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct ScrollState {
    target: u16,
    animation: Option<Animation>,
}

fn ease_in_out(t: f32) -> f32 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

impl ScrollState {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Rows scrolled off the top at `now`.
    pub(crate) fn offset(&self, now: Instant) -> u16 {
        let Some(animation) = self.animation else {
            return self.target;
        };
        let elapsed = now.saturating_duration_since(animation.started);
        if elapsed >= SCROLL_DURATION {
            return self.target;
        }
        let t = elapsed.as_secs_f32() / SCROLL_DURATION.as_secs_f32();
        let eased = ease_in_out(t);
        let value = animation.from + (f32::from(self.target) - animation.from) * eased;
        value.round().max(0.0) as u16
    }

    pub(crate) fn target(&self) -> u16 {
        self.target
    }

    pub(crate) fn is_animating(&self, now: Instant) -> bool {
        self.animation
            .map(|a| now.saturating_duration_since(a.started) < SCROLL_DURATION)
            .unwrap_or(false)
    }

    /// Ease from wherever the viewport is now toward `target`.
    pub(crate) fn scroll_to(&mut self, target: u16, now: Instant) {
        let from = f32::from(self.offset(now));
        self.target = target;
        self.animation = Some(Animation { from, started: now });
    }

    pub(crate) fn jump_to(&mut self, target: u16) {
        self.target = target;
        self.animation = None;
    }

    /// Manual scrolling stops any animation and moves immediately.
    pub(crate) fn scroll_by(&mut self, delta: i32, max: u16, now: Instant) {
        let current = i32::from(self.offset(now));
        let next = (current + delta).clamp(0, i32::from(max));
        self.jump_to(next as u16);
    }

    /// Keep the offset valid after the document or viewport shrinks.
    pub(crate) fn clamp(&mut self, max: u16, now: Instant) {
        if self.target > max {
            self.target = max;
        }
        if self.offset(now) > max {
            self.jump_to(max);
        }
    }
}
