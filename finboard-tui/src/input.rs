//! Keyboard input dispatch — global keys, then cursor keys for the active tab.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::App;

pub fn handle_key(app: &mut App, key: KeyEvent) {
    // Only handle key press events (Windows sends both Press and Release).
    if key.kind != KeyEventKind::Press {
        return;
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.running = false,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.running = false;
        }
        KeyCode::Tab => {
            if key.modifiers.contains(KeyModifiers::SHIFT) {
                app.prev_tab();
            } else {
                app.next_tab();
            }
        }
        KeyCode::BackTab => app.prev_tab(),
        KeyCode::Char('j') | KeyCode::Down => app.active_mut().move_down(),
        KeyCode::Char('k') | KeyCode::Up => app.active_mut().move_up(),
        KeyCode::Char('g') | KeyCode::Home => app.active_mut().move_to_top(),
        KeyCode::Char('G') | KeyCode::End => app.active_mut().move_to_bottom(),
        KeyCode::Enter => app.activate_selected(),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;
    use finboard_core::config::DashboardConfig;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn app() -> App {
        App::new(Vec::new(), &DashboardConfig::default()).unwrap()
    }

    #[test]
    fn test_quit() {
        let mut app = app();
        handle_key(&mut app, press(KeyCode::Char('q')));
        assert!(!app.running);
    }

    #[test]
    fn test_release_events_ignored() {
        let mut app = app();
        let release = KeyEvent {
            code: KeyCode::Char('q'),
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        };
        handle_key(&mut app, release);
        assert!(app.running);
    }

    #[test]
    fn test_cursor_keys() {
        let mut app = app();
        handle_key(&mut app, press(KeyCode::Char('j')));
        handle_key(&mut app, press(KeyCode::Down));
        assert_eq!(app.active().cursor, 2);
        handle_key(&mut app, press(KeyCode::Char('k')));
        assert_eq!(app.active().cursor, 1);
        handle_key(&mut app, press(KeyCode::Char('G')));
        assert_eq!(app.active().cursor, 4);
        handle_key(&mut app, press(KeyCode::Home));
        assert_eq!(app.active().cursor, 0);
    }
}
