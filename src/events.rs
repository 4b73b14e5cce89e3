use crossterm::event::Event as CrossTermEvent;
use crossterm::event::KeyCode;
use crossterm::event::KeyEvent;
use crossterm::event::KeyModifiers;

use crate::ScreenSize;

/// Events the tree viewer reacts to.
pub enum Event {
    /// Exit the viewer
    Exit,

    /// The terminal was resized
    Resize {
        cols: ScreenSize,
        rows: ScreenSize,
    },
}

/// Converts a crossterm event into a viewer event
pub fn convert_event(event: CrossTermEvent) -> Option<Event> {
    match event {
        CrossTermEvent::Key(key_event) => match key_event {
            KeyEvent {
                code: KeyCode::Char('q'),
                ..
            }
            | KeyEvent {
                code: KeyCode::Char('c'),
                modifiers: KeyModifiers::CONTROL,
                ..
            } => Some(Event::Exit),
            _ => None,
        },
        CrossTermEvent::Resize(cols, rows) => Some(Event::Resize { cols, rows }),
        _ => None,
    }
}
