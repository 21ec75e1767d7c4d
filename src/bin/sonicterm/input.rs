//! Terminal input, read on its own thread and forwarded over a channel.

use crossbeam_channel::Sender;
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use sonicterm::log_debug;
use std::thread;

const WHEEL_LINES: i32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InputEvent {
    Advance,
    Quit,
    ScrollLines(i32),
    ScrollPages(i32),
    ScrollHome,
    ScrollEnd,
    PointerMoved { column: u16, row: u16 },
    Click { column: u16, row: u16 },
    Resize { cols: u16, rows: u16 },
    /// The pointer can no longer be tracked (focus moved elsewhere).
    PointerLost,
}

fn translate_key(key: KeyEvent) -> Option<InputEvent> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(InputEvent::Quit),
            _ => None,
        };
    }
    match key.code {
        KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Char('n') => Some(InputEvent::Advance),
        KeyCode::Char('q') | KeyCode::Esc => Some(InputEvent::Quit),
        KeyCode::Up | KeyCode::Char('k') => Some(InputEvent::ScrollLines(-1)),
        KeyCode::Down | KeyCode::Char('j') => Some(InputEvent::ScrollLines(1)),
        KeyCode::PageUp => Some(InputEvent::ScrollPages(-1)),
        KeyCode::PageDown => Some(InputEvent::ScrollPages(1)),
        KeyCode::Home => Some(InputEvent::ScrollHome),
        KeyCode::End => Some(InputEvent::ScrollEnd),
        _ => None,
    }
}

fn translate_mouse(mouse: MouseEvent) -> Option<InputEvent> {
    let (column, row) = (mouse.column, mouse.row);
    match mouse.kind {
        MouseEventKind::Moved | MouseEventKind::Drag(_) => {
            Some(InputEvent::PointerMoved { column, row })
        }
        MouseEventKind::Down(MouseButton::Left) => Some(InputEvent::Click { column, row }),
        MouseEventKind::ScrollUp => Some(InputEvent::ScrollLines(-WHEEL_LINES)),
        MouseEventKind::ScrollDown => Some(InputEvent::ScrollLines(WHEEL_LINES)),
        _ => None,
    }
}

pub(crate) fn translate(event: Event) -> Option<InputEvent> {
    match event {
        Event::Key(key) => translate_key(key),
        Event::Mouse(mouse) => translate_mouse(mouse),
        Event::Resize(cols, rows) => Some(InputEvent::Resize { cols, rows }),
        Event::FocusLost => Some(InputEvent::PointerLost),
        _ => None,
    }
}

pub(crate) fn spawn_input_thread(tx: Sender<InputEvent>) -> thread::JoinHandle<()> {
    thread::spawn(move || loop {
        let event = match event::read() {
            Ok(event) => event,
            Err(err) => {
                log_debug(&format!("terminal read error: {err}"));
                break;
            }
        };
        if let Some(input) = translate(event) {
            if tx.send(input).is_err() {
                break;
            }
        }
    })
}
