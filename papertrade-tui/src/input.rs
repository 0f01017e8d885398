//! Keyboard input dispatch — overlays → global keys → trading keys.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};

use papertrade_core::StepSize;

use crate::app::{AppState, FormAction, Overlay};

pub fn handle_key(app: &mut AppState, key: KeyEvent) {
    // Only handle key press events (Windows sends both Press and Release).
    if key.kind != KeyEventKind::Press {
        return;
    }

    // 1. Overlays consume input first.
    match app.overlay {
        Overlay::Picker => {
            handle_picker_overlay(app, key);
            return;
        }
        Overlay::Settings => {
            handle_settings_overlay(app, key);
            return;
        }
        Overlay::Help => {
            app.overlay = Overlay::None;
            return;
        }
        Overlay::ErrorHistory => {
            handle_error_overlay(app, key);
            return;
        }
        Overlay::None => {}
    }

    // 2. Global keys.
    match key.code {
        KeyCode::Char('q') => {
            app.running = false;
            return;
        }
        KeyCode::Char('?') => {
            app.overlay = Overlay::Help;
            return;
        }
        KeyCode::Char('e') => {
            app.overlay = Overlay::ErrorHistory;
            app.error_scroll = 0;
            return;
        }
        KeyCode::Char('o') => {
            app.open_picker();
            return;
        }
        KeyCode::Char('c') => {
            app.open_settings();
            return;
        }
        _ => {}
    }

    // 3. Trading keys.
    match key.code {
        KeyCode::Char('d') => app.step(StepSize::Day),
        KeyCode::Char('w') => app.step(StepSize::Week),
        KeyCode::Char('m') => app.step(StepSize::Month),
        KeyCode::Char('b') => app.form.select(FormAction::Buy),
        KeyCode::Char('s') => app.form.select(FormAction::Sell),
        KeyCode::Char('h') => app.form.select(FormAction::Hold),
        KeyCode::Char('x') => app.fill_max(),
        KeyCode::Char(c) if c.is_ascii_digit() => {
            if app.form.action == FormAction::Hold {
                app.set_warning("Choose Buy (b) or Sell (s) before typing a quantity");
            } else {
                app.form.push_digit(c);
            }
        }
        KeyCode::Backspace => {
            app.form.quantity.pop();
        }
        KeyCode::Enter => app.submit_trade(),
        KeyCode::Char('R') => app.reset_session(),
        _ => {}
    }
}

fn handle_picker_overlay(app: &mut AppState, key: KeyEvent) {
    let count = app.picker.entries.len();
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => {
            if count > 0 && app.picker.cursor + 1 < count {
                app.picker.cursor += 1;
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.picker.cursor = app.picker.cursor.saturating_sub(1);
        }
        KeyCode::Enter => app.load_selected(),
        KeyCode::Char('r') => app.load_random(),
        KeyCode::Esc => {
            if app.session.is_some() {
                app.overlay = Overlay::None;
            } else {
                app.set_warning("Pick a stock to start, or q to quit");
            }
        }
        KeyCode::Char('q') if app.session.is_none() => app.running = false,
        _ => {}
    }
}

fn handle_settings_overlay(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.overlay = Overlay::None,
        KeyCode::Char('j') | KeyCode::Down | KeyCode::Char('k') | KeyCode::Up | KeyCode::Tab => {
            app.settings.toggle_field();
        }
        KeyCode::Char('h') | KeyCode::Left => app.settings.adjust(-1),
        KeyCode::Char('l') | KeyCode::Right => app.settings.adjust(1),
        KeyCode::Enter => app.apply_settings(),
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

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use papertrade_core::data::StockLibrary;
    use papertrade_core::SimConfig;

    fn press(app: &mut AppState, code: KeyCode) {
        handle_key(app, KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn type_str(app: &mut AppState, s: &str) {
        for c in s.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn app() -> (tempfile::TempDir, AppState) {
        let dir = tempfile::tempdir().unwrap();
        let mut csv = String::from("trade_date,open,high,low,close\n");
        let base = chrono::NaiveDate::from_ymd_opt(2022, 1, 3).unwrap();
        for i in 0..30 {
            let date = base + chrono::Duration::days(i);
            csv.push_str(&format!("{},10,10.5,9.5,10\n", date.format("%Y%m%d")));
        }
        std::fs::write(dir.path().join("600000.csv"), csv).unwrap();
        let lib = StockLibrary::open(dir.path()).unwrap();
        let mut config = SimConfig::default();
        config.view.window_size = 10;
        (dir, AppState::new(lib, config))
    }

    #[test]
    fn picker_enter_loads_and_closes() {
        let (_dir, mut app) = app();
        assert_eq!(app.overlay, Overlay::Picker);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.overlay, Overlay::None);
        assert!(app.session.is_some());
    }

    #[test]
    fn picker_escape_needs_a_session() {
        let (_dir, mut app) = app();
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.overlay, Overlay::Picker);
        press(&mut app, KeyCode::Char('q'));
        assert!(!app.running);
    }

    #[test]
    fn buy_keys_execute_trade() {
        let (_dir, mut app) = app();
        press(&mut app, KeyCode::Enter);
        type_str(&mut app, "b250");
        press(&mut app, KeyCode::Backspace);
        assert_eq!(app.form.quantity, "25");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.session.as_ref().unwrap().ledger().shares(), 25);
    }

    #[test]
    fn digits_ignored_while_holding() {
        let (_dir, mut app) = app();
        press(&mut app, KeyCode::Enter);
        type_str(&mut app, "h7");
        assert!(app.form.quantity.is_empty());
    }

    #[test]
    fn step_keys_move_cursor() {
        let (_dir, mut app) = app();
        press(&mut app, KeyCode::Enter);
        type_str(&mut app, "dw");
        assert_eq!(app.session.as_ref().unwrap().cursor().current_index(), 17);
        type_str(&mut app, "m");
        assert!(app.session.as_ref().unwrap().is_exhausted());
    }

    #[test]
    fn settings_overlay_adjusts_and_applies() {
        let (_dir, mut app) = app();
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Char('c'));
        assert_eq!(app.overlay, Overlay::Settings);
        press(&mut app, KeyCode::Char('l'));
        press(&mut app, KeyCode::Char('l'));
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.overlay, Overlay::None);
        assert_eq!(app.session.as_ref().unwrap().ledger().cash(), 102_000.0);
    }

    #[test]
    fn help_closes_on_any_key() {
        let (_dir, mut app) = app();
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Char('?'));
        assert_eq!(app.overlay, Overlay::Help);
        press(&mut app, KeyCode::Char('d'));
        assert_eq!(app.overlay, Overlay::None);
        assert_eq!(app.session.as_ref().unwrap().cursor().current_index(), 9);
    }

    #[test]
    fn shift_r_resets() {
        let (_dir, mut app) = app();
        press(&mut app, KeyCode::Enter);
        type_str(&mut app, "b5");
        press(&mut app, KeyCode::Enter);
        type_str(&mut app, "wR");
        let session = app.session.as_ref().unwrap();
        assert!(session.ledger().trades().is_empty());
        assert_eq!(session.cursor().current_index(), 9);
    }
}
