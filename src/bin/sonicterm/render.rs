//! Drawing. The whole document is rendered into an off-screen buffer and
//! the rows under the viewport are copied into the frame.

use crate::layout::{DocLayout, ViewBox, CLOSING_TITLE, HEADER_SUBTITLE, HEADER_TITLE};
use crate::theme;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    text::Line,
    widgets::{Block, BorderType, Borders, Paragraph, Widget},
    Frame,
};
use sonicterm::audio::{AudioOutput, TransportPhase, TARGET_VOLUME};
use sonicterm::view::TermView;
use sonicterm::visual::{circle_mask, VisualState, FALLBACK_FILL};
use sonicterm::Presentation;
use std::time::Duration;

const METER_WIDTH: u16 = 12;

/// Per-frame inputs that do not live in the presentation itself.
pub(crate) struct Scene<'a> {
    pub(crate) layout: &'a DocLayout,
    pub(crate) hovered: Option<usize>,
    pub(crate) elapsed: Duration,
    pub(crate) scroll: u16,
    pub(crate) audio_note: &'a str,
}

/// Rows available to the document; the last terminal row is the status bar.
pub(crate) fn viewport(area: Rect) -> Rect {
    Rect::new(area.x, area.y, area.width, area.height.saturating_sub(1))
}

pub(crate) fn draw<O: AudioOutput>(
    frame: &mut Frame<'_>,
    presentation: &Presentation<O>,
    scene: &Scene<'_>,
) {
    let area = frame.size();
    let view_area = viewport(area);
    frame.buffer_mut().set_style(view_area, theme::base());

    let doc = render_document(presentation, scene);
    let target = frame.buffer_mut();
    for row in 0..view_area.height {
        let doc_row = scene.scroll.saturating_add(row);
        if doc_row >= doc.area.bottom() {
            break;
        }
        for x in doc.area.x..doc.area.right().min(view_area.right()) {
            *target.get_mut(x, view_area.y + row) = doc.get(x, doc_row).clone();
        }
    }

    if area.height > view_area.height {
        let status_area = Rect::new(area.x, view_area.bottom(), area.width, 1);
        frame.render_widget(status_line(presentation, scene), status_area);
    }
}

fn status_line<'a, O: AudioOutput>(
    presentation: &Presentation<O>,
    scene: &Scene<'a>,
) -> Paragraph<'a> {
    let text = format!(
        " {}/{} revealed  \u{b7}  enter reveal  \u{b7}  \u{2191}\u{2193} scroll  \u{b7}  q quit  \u{b7}  {}",
        presentation.revealed(),
        presentation.total(),
        scene.audio_note
    );
    Paragraph::new(Line::from(text)).style(theme::status())
}

fn render_document<O: AudioOutput>(presentation: &Presentation<O>, scene: &Scene<'_>) -> Buffer {
    let layout = scene.layout;
    let content = layout.content;
    let area = Rect::new(content.x, 0, content.width.max(1), layout.height.max(1));
    let mut doc = Buffer::empty(area);
    doc.set_style(area, theme::base());

    doc.set_stringn(content.x, 1, HEADER_TITLE, usize::from(content.width), theme::title());
    doc.set_stringn(
        content.x,
        2,
        HEADER_SUBTITLE,
        usize::from(content.width),
        theme::dim(),
    );

    for (index, (view, placed)) in presentation.views().iter().zip(&layout.views).enumerate() {
        let hovered = scene.hovered == Some(index);
        draw_circle(&mut doc, view, placed.circle, scene.elapsed);
        draw_label(&mut doc, view, placed, hovered);
        draw_meter(
            &mut doc,
            placed,
            presentation.volume(index),
            presentation.phase(index),
        );
    }

    let control = presentation.control();
    let style = theme::button(control.is_disabled());
    Paragraph::new(Line::from(control.label()))
        .alignment(Alignment::Center)
        .style(style)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(style),
        )
        .render(layout.button.intersection(doc.area), &mut doc);

    if let Some((closing, body)) = &layout.closing {
        let width = usize::from(closing.width);
        doc.set_stringn(closing.x, closing.y, CLOSING_TITLE, width, theme::title());
        for (row, line) in body.iter().enumerate() {
            doc.set_stringn(closing.x, closing.y + 2 + row as u16, line, width, theme::base());
        }
    }

    doc
}

fn draw_circle(doc: &mut Buffer, view: &TermView, circle: Rect, elapsed: Duration) {
    let pixel_rows = circle.height * 2;
    let frame = match &view.visual {
        VisualState::Animated(visual) => visual.frame_at(elapsed),
        VisualState::Fallback => 0,
    };
    let pixel = |x: u16, y: u16| match &view.visual {
        VisualState::Animated(visual) => visual.pixel(frame, x, y),
        VisualState::Fallback => circle_mask(circle.width, pixel_rows, x, y).then_some(FALLBACK_FILL),
    };

    for dy in 0..circle.height {
        for dx in 0..circle.width {
            let (symbol, fg, bg) = match (pixel(dx, dy * 2), pixel(dx, dy * 2 + 1)) {
                (Some(top), Some(bottom)) => ("\u{2580}", theme::rgb(top), theme::rgb(bottom)),
                (Some(top), None) => ("\u{2580}", theme::rgb(top), theme::BACKGROUND),
                (None, Some(bottom)) => ("\u{2584}", theme::rgb(bottom), theme::BACKGROUND),
                (None, None) => continue,
            };
            let (x, y) = (circle.x + dx, circle.y + dy);
            if x >= doc.area.right() || y >= doc.area.bottom() {
                continue;
            }
            doc.get_mut(x, y).set_symbol(symbol).set_fg(fg).set_bg(bg);
        }
    }
}

fn draw_label(doc: &mut Buffer, view: &TermView, placed: &ViewBox, hovered: bool) {
    let width = usize::from(placed.text.width);
    for (row, line) in placed.lines.iter().enumerate() {
        doc.set_stringn(
            placed.text.x,
            placed.text.y + row as u16,
            line,
            width,
            theme::base(),
        );
    }
    let number = format!("{}.", view.number);
    doc.set_stringn(
        placed.text.x,
        placed.text.y,
        number,
        width,
        theme::term_number(hovered),
    );
}

fn phase_note(phase: TransportPhase) -> &'static str {
    match phase {
        TransportPhase::Idle => "",
        TransportPhase::FadingIn => "fading in",
        TransportPhase::Playing => "playing",
        TransportPhase::FadingOut => "fading out",
    }
}

fn meter_cells(volume: f32, width: u16) -> u16 {
    let ratio = (volume / TARGET_VOLUME).clamp(0.0, 1.0);
    (ratio * f32::from(width)).round() as u16
}

fn draw_meter(doc: &mut Buffer, placed: &ViewBox, volume: f32, phase: TransportPhase) {
    let width = METER_WIDTH.min(placed.text.width);
    let filled = meter_cells(volume, width);
    let row = placed.meter_row();
    let x = placed.text.x;
    let filled_bar = "\u{2501}".repeat(usize::from(filled));
    let empty_bar = "\u{2500}".repeat(usize::from(width - filled));
    doc.set_string(x, row, &filled_bar, theme::accent());
    doc.set_string(x + filled, row, &empty_bar, theme::dim());
    let note = phase_note(phase);
    if !note.is_empty() {
        let remaining = usize::from(placed.text.width.saturating_sub(width + 1));
        doc.set_stringn(x + width + 1, row, note, remaining, theme::dim());
    }
}
