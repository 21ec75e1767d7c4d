//! Document layout in document coordinates (row 0 is the top of the page,
//! not of the screen). The viewport scrolls over this.

use ratatui::layout::Rect;
use sonicterm::catalog::{CirclePosition, Offset};
use sonicterm::view::{TermView, CIRCLE_COLS, CIRCLE_ROWS};
use sonicterm::visual::circle_mask;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub(crate) const HEADER_TITLE: &str = "SonicTerm";
pub(crate) const HEADER_SUBTITLE: &str = "ten terms for a sonic archive. hover a circle to listen";
pub(crate) const CLOSING_TITLE: &str = "thank you for listening";
pub(crate) const CLOSING_BODY: &str =
    "Every term is on the page now. Hover any circle to hear it again.";

const MARGIN: u16 = 2;
const MAX_CONTENT_WIDTH: u16 = 88;
const HEADER_HEIGHT: u16 = 4;
const GUTTER: u16 = 3;
const VIEW_GAP: u16 = 2;
const BUTTON_HEIGHT: u16 = 3;
const BUTTON_PADDING: u16 = 6;
// Below this the circle and text no longer fit side by side.
const MIN_SIDE_TEXT_WIDTH: u16 = 16;

/// What layout needs to know about one revealed term.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ViewSpec<'a> {
    pub(crate) position: CirclePosition,
    pub(crate) offset: Offset,
    pub(crate) label: &'a str,
}

impl<'a> From<&'a TermView> for ViewSpec<'a> {
    fn from(view: &'a TermView) -> Self {
        Self {
            position: view.circle_position,
            offset: view.offset,
            label: &view.label,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ViewBox {
    /// Whole area the view occupies; scroll targets centre this.
    pub(crate) block: Rect,
    pub(crate) circle: Rect,
    /// Wrapped label lines start at `text`; the volume meter sits on the row after them.
    pub(crate) text: Rect,
    pub(crate) lines: Vec<String>,
}

impl ViewBox {
    pub(crate) fn meter_row(&self) -> u16 {
        self.text.y + self.lines.len() as u16
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DocLayout {
    pub(crate) width: u16,
    pub(crate) height: u16,
    pub(crate) content: Rect,
    pub(crate) views: Vec<ViewBox>,
    pub(crate) button: Rect,
    pub(crate) closing: Option<(Rect, Vec<String>)>,
}

/// Greedy word wrap by display width. Words wider than `width` are split.
pub(crate) fn wrap_words(text: &str, width: u16) -> Vec<String> {
    let width = usize::from(width.max(1));
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let needed = if current.is_empty() {
            word.width()
        } else {
            current.width() + 1 + word.width()
        };
        if needed <= width {
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
            continue;
        }
        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        for ch in word.chars() {
            let ch_width = ch.width().unwrap_or(0);
            if current.width() + ch_width > width && !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            current.push(ch);
        }
    }
    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

fn place_view(spec: &ViewSpec<'_>, content: Rect, y: u16) -> ViewBox {
    let indent = spec.offset.indent().min(content.width.saturating_sub(CIRCLE_COLS));
    let side_text_width = content
        .width
        .saturating_sub(indent + CIRCLE_COLS + GUTTER);
    let position = match spec.position {
        CirclePosition::Left | CirclePosition::Right if side_text_width < MIN_SIDE_TEXT_WIDTH => {
            CirclePosition::Top
        }
        other => other,
    };

    match position {
        CirclePosition::Left | CirclePosition::Right => {
            let lines = wrap_words(spec.label, side_text_width);
            let text_height = lines.len() as u16 + 1;
            let height = text_height.max(CIRCLE_ROWS);
            let (circle_x, text_x) = if position == CirclePosition::Left {
                let circle_x = content.x + indent;
                (circle_x, circle_x + CIRCLE_COLS + GUTTER)
            } else {
                let circle_x = content.right().saturating_sub(CIRCLE_COLS + indent);
                (circle_x, content.x)
            };
            ViewBox {
                block: Rect::new(content.x, y, content.width, height),
                circle: Rect::new(
                    circle_x,
                    y + (height - CIRCLE_ROWS) / 2,
                    CIRCLE_COLS,
                    CIRCLE_ROWS,
                ),
                text: Rect::new(
                    text_x,
                    y + (height - text_height) / 2,
                    side_text_width,
                    text_height,
                ),
                lines,
            }
        }
        CirclePosition::Top | CirclePosition::Bottom => {
            let x = content.x + indent;
            let text_width = content.width.saturating_sub(indent);
            let lines = wrap_words(spec.label, text_width);
            let text_height = lines.len() as u16 + 1;
            let height = CIRCLE_ROWS + 1 + text_height;
            let (circle_y, text_y) = if position == CirclePosition::Top {
                (y, y + CIRCLE_ROWS + 1)
            } else {
                (y + text_height + 1, y)
            };
            ViewBox {
                block: Rect::new(content.x, y, content.width, height),
                circle: Rect::new(x, circle_y, CIRCLE_COLS, CIRCLE_ROWS),
                text: Rect::new(x, text_y, text_width, text_height),
                lines,
            }
        }
    }
}

/// Lay out the header, every revealed view, the advance button and (once
/// shown) the closing section for a terminal `width` columns wide.
pub(crate) fn compute_layout(
    width: u16,
    views: &[ViewSpec<'_>],
    button_label: &str,
    closing_visible: bool,
) -> DocLayout {
    let content_width = width.saturating_sub(MARGIN * 2).min(MAX_CONTENT_WIDTH);
    let content = Rect::new(
        width.saturating_sub(content_width) / 2,
        0,
        content_width,
        0,
    );

    let mut y = HEADER_HEIGHT;
    let mut boxes = Vec::with_capacity(views.len());
    for spec in views {
        let placed = place_view(spec, content, y);
        y = placed.block.bottom().saturating_add(VIEW_GAP);
        boxes.push(placed);
    }

    let button_width = (button_label.width() as u16 + BUTTON_PADDING).min(content.width);
    let button = Rect::new(
        content.x + content.width.saturating_sub(button_width) / 2,
        y,
        button_width,
        BUTTON_HEIGHT,
    );
    y = button.bottom().saturating_add(2);

    let closing = closing_visible.then(|| {
        let body = wrap_words(CLOSING_BODY, content.width);
        let rect = Rect::new(content.x, y, content.width, 2 + body.len() as u16);
        (rect, body)
    });
    if let Some((rect, _)) = &closing {
        y = rect.bottom().saturating_add(2);
    }

    DocLayout {
        width,
        height: y,
        content,
        views: boxes,
        button,
        closing,
    }
}

fn contains(rect: Rect, column: u16, row: u16) -> bool {
    column >= rect.x && column < rect.right() && row >= rect.y && row < rect.bottom()
}

impl DocLayout {
    /// Index of the view whose circle covers the cell, using the same
    /// ellipse the circle is drawn with.
    pub(crate) fn circle_at(&self, column: u16, row: u16) -> Option<usize> {
        self.views.iter().position(|view| {
            let circle = view.circle;
            if !contains(circle, column, row) {
                return false;
            }
            let dx = column - circle.x;
            let dy = row - circle.y;
            let pixel_rows = circle.height * 2;
            circle_mask(circle.width, pixel_rows, dx, dy * 2)
                || circle_mask(circle.width, pixel_rows, dx, dy * 2 + 1)
        })
    }

    pub(crate) fn button_contains(&self, column: u16, row: u16) -> bool {
        contains(self.button, column, row)
    }

    pub(crate) fn max_scroll(&self, viewport_height: u16) -> u16 {
        self.height.saturating_sub(viewport_height)
    }

    /// Scroll offset that puts the view's vertical centre in the middle of
    /// the viewport, clamped to the document.
    pub(crate) fn centered_offset(&self, view: usize, viewport_height: u16) -> Option<u16> {
        let block = self.views.get(view)?.block;
        let centre = block.y + block.height / 2;
        Some(
            centre
                .saturating_sub(viewport_height / 2)
                .min(self.max_scroll(viewport_height)),
        )
    }
}
