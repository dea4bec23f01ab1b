//! Keyboard input dispatch — edit mode → overlays → global keys → panel keys.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::{AppState, ErrorCategory, Overlay, Panel};

/// Handle a key event.
pub fn handle_key(app: &mut AppState, key: KeyEvent) {
    // Only handle key press events (Windows sends both Press and Release).
    if key.kind != KeyEventKind::Press {
        return;
    }

    // 1. Text entry consumes everything, digits included.
    if app.form.is_editing() {
        handle_edit_key(app, key);
        return;
    }

    // 2. Overlays consume input next.
    if app.overlay == Overlay::ErrorHistory {
        handle_error_overlay(app, key);
        return;
    }

    // 3. Global keys (always available).
    match key.code {
        KeyCode::Char('q') => {
            app.running = false;
            return;
        }
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.running = false;
            return;
        }
        KeyCode::Char('1') => { app.active_panel = Panel::Calculator; return; }
        KeyCode::Char('2') => { app.active_panel = Panel::Chart; return; }
        KeyCode::Char('3') => { app.active_panel = Panel::Compare; return; }
        KeyCode::Char('4') => { app.active_panel = Panel::Help; return; }
        KeyCode::Tab => {
            if key.modifiers.contains(KeyModifiers::SHIFT) {
                app.active_panel = app.active_panel.prev();
            } else {
                app.active_panel = app.active_panel.next();
            }
            return;
        }
        KeyCode::BackTab => {
            app.active_panel = app.active_panel.prev();
            return;
        }
        KeyCode::Char('f') => {
            app.cycle_format();
            return;
        }
        KeyCode::Esc => {
            app.cancel_calculation();
            return;
        }
        _ => {}
    }

    // 4. Panel-specific keys.
    match app.active_panel {
        Panel::Calculator => handle_calculator_key(app, key),
        Panel::Chart | Panel::Compare => {
            // Recalculate from anywhere the result is on screen.
            if key.code == KeyCode::Enter {
                app.trigger_calculation();
            }
        }
        Panel::Help => handle_help_key(app, key),
    }
}

fn handle_edit_key(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.form.cancel_edit(),
        KeyCode::Enter => {
            if let Err(e) = app.form.commit_edit() {
                app.push_error(ErrorCategory::Input, e.to_string());
            }
        }
        KeyCode::Backspace => {
            if let Some(buf) = app.form.edit_buffer.as_mut() {
                buf.pop();
            }
        }
        KeyCode::Char(c) if c.is_ascii_digit() || matches!(c, '.' | '-' | '%' | 'e' | 'E') => {
            if let Some(buf) = app.form.edit_buffer.as_mut() {
                buf.push(c);
            }
        }
        _ => {}
    }
}

fn handle_error_overlay(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('e') => {
            app.overlay = Overlay::None;
        }
        KeyCode::Char('j') | KeyCode::Down => {
            if app.error_scroll + 1 < app.error_history.len() {
                app.error_scroll += 1;
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.error_scroll = app.error_scroll.saturating_sub(1);
        }
        _ => {}
    }
}

fn handle_calculator_key(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => {
            app.form.active = app.form.active.next();
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.form.active = app.form.active.prev();
        }
        KeyCode::Char('h') | KeyCode::Left | KeyCode::Char('-') => {
            app.form.step_active(-1);
        }
        KeyCode::Char('l') | KeyCode::Right | KeyCode::Char('+') | KeyCode::Char('=') => {
            app.form.step_active(1);
        }
        KeyCode::Char('i') | KeyCode::Char('e') => {
            app.form.begin_edit();
        }
        KeyCode::Char('r') => {
            app.reset_inputs();
        }
        KeyCode::Enter => {
            app.trigger_calculation();
        }
        _ => {}
    }
}

fn handle_help_key(app: &mut AppState, key: KeyEvent) {
    if let KeyCode::Char('e') = key.code {
        app.overlay = Overlay::ErrorHistory;
        app.error_scroll = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicBool;
    use std::sync::mpsc::{self, Receiver};
    use std::sync::Arc;

    use capmlab_core::Settings;

    use crate::app::InputField;
    use crate::worker::WorkerCommand;

    fn test_app() -> (AppState, Receiver<WorkerCommand>) {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (_resp_tx, resp_rx) = mpsc::channel();
        let cancel = Arc::new(AtomicBool::new(false));
        (AppState::new(Settings::default(), cmd_tx, resp_rx, cancel), cmd_rx)
    }

    fn press(app: &mut AppState, code: KeyCode) {
        handle_key(app, KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn type_str(app: &mut AppState, s: &str) {
        for c in s.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    #[test]
    fn quit_key() {
        let (mut app, _rx) = test_app();
        press(&mut app, KeyCode::Char('q'));
        assert!(!app.running);
    }

    #[test]
    fn number_keys_switch_panels() {
        let (mut app, _rx) = test_app();
        press(&mut app, KeyCode::Char('3'));
        assert_eq!(app.active_panel, Panel::Compare);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.active_panel, Panel::Help);
        press(&mut app, KeyCode::BackTab);
        assert_eq!(app.active_panel, Panel::Compare);
    }

    #[test]
    fn typing_a_value_replaces_field() {
        let (mut app, _rx) = test_app();
        press(&mut app, KeyCode::Char('j'));
        assert_eq!(app.form.active, InputField::Beta);

        press(&mut app, KeyCode::Char('i'));
        type_str(&mut app, "1.25");
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.form.beta, 1.25);
        assert!(!app.form.is_editing());
        // Digits went into the buffer, not to the panel switcher.
        assert_eq!(app.active_panel, Panel::Calculator);
    }

    #[test]
    fn bad_text_reports_error() {
        let (mut app, _rx) = test_app();
        press(&mut app, KeyCode::Char('i'));
        type_str(&mut app, "1..2");
        press(&mut app, KeyCode::Enter);
        assert!(app.form.is_editing());
        assert_eq!(app.error_history.len(), 1);

        press(&mut app, KeyCode::Esc);
        assert!(!app.form.is_editing());
        assert_eq!(app.form.risk_free_pct, 2.0);
    }

    #[test]
    fn arrows_step_active_field() {
        let (mut app, _rx) = test_app();
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Right);
        assert_eq!(app.form.risk_free_pct, 2.2);
        press(&mut app, KeyCode::Left);
        assert_eq!(app.form.risk_free_pct, 2.1);
    }

    #[test]
    fn enter_triggers_calculation() {
        let (mut app, rx) = test_app();
        press(&mut app, KeyCode::Enter);
        assert!(matches!(rx.try_recv(), Ok(WorkerCommand::Calculate { .. })));
        assert!(app.calc.is_pending());

        press(&mut app, KeyCode::Esc);
        assert!(!app.calc.is_pending());
    }

    #[test]
    fn release_events_ignored() {
        let (mut app, _rx) = test_app();
        let mut key = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
        key.kind = KeyEventKind::Release;
        handle_key(&mut app, key);
        assert!(app.running);
    }

    #[test]
    fn error_overlay_opens_from_help() {
        let (mut app, _rx) = test_app();
        press(&mut app, KeyCode::Char('4'));
        press(&mut app, KeyCode::Char('e'));
        assert_eq!(app.overlay, Overlay::ErrorHistory);
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.overlay, Overlay::None);
    }
}
