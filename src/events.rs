use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::App;

/// Rows skipped by PgUp/PgDn.
const PAGE: usize = 10;

/// Poll for events with a timeout
pub fn poll_event(timeout: Duration) -> Result<Option<Event>> {
    if event::poll(timeout)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}

/// Handle a key event
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    if key.kind == KeyEventKind::Release {
        return;
    }

    // If help is shown, any key closes it
    if app.show_help {
        app.show_help = false;
        return;
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.quit(),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => app.quit(),

        KeyCode::Up | KeyCode::Char('k') => app.select_prev(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        KeyCode::PageUp => app.select_prev_n(PAGE),
        KeyCode::PageDown => app.select_next_n(PAGE),
        KeyCode::Home => app.select_first(),
        KeyCode::End => app.select_last(),

        KeyCode::Char('?') => app.toggle_help(),

        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Reading, ReadingValue, Snapshot};
    use crate::source::SnapshotSource;

    #[derive(Debug)]
    struct Fixed(Option<Snapshot>);

    impl SnapshotSource for Fixed {
        fn poll(&mut self) -> Option<Snapshot> {
            self.0.take()
        }

        fn description(&self) -> &str {
            "fixed"
        }

        fn error(&self) -> Option<String> {
            None
        }
    }

    fn app_with_rows(n: usize) -> App {
        let snapshot = (0..n)
            .map(|i| Reading::new(format!("r{}", i), ReadingValue::Int(i as i32)))
            .collect();
        let mut app = App::new(Box::new(Fixed(Some(snapshot))));
        app.reload_data().unwrap();
        app
    }

    fn press(app: &mut App, code: KeyCode) {
        handle_key_event(app, KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[test]
    fn test_navigation_keys() {
        let mut app = app_with_rows(25);
        press(&mut app, KeyCode::Char('j'));
        press(&mut app, KeyCode::Down);
        assert_eq!(app.selected_index, 2);
        press(&mut app, KeyCode::Char('k'));
        assert_eq!(app.selected_index, 1);
        press(&mut app, KeyCode::PageDown);
        assert_eq!(app.selected_index, 11);
        press(&mut app, KeyCode::End);
        assert_eq!(app.selected_index, 24);
        press(&mut app, KeyCode::PageUp);
        assert_eq!(app.selected_index, 14);
        press(&mut app, KeyCode::Home);
        assert_eq!(app.selected_index, 0);
    }

    #[test]
    fn test_help_swallows_next_key() {
        let mut app = app_with_rows(3);
        press(&mut app, KeyCode::Char('?'));
        assert!(app.show_help);
        press(&mut app, KeyCode::Char('q'));
        assert!(!app.show_help);
        assert!(app.running);
    }

    #[test]
    fn test_quit_keys() {
        let mut app = app_with_rows(1);
        press(&mut app, KeyCode::Esc);
        assert!(!app.running);

        let mut app = app_with_rows(1);
        handle_key_event(
            &mut app,
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
        );
        assert!(!app.running);
    }
}
