use crate::application::{App, Screen};
use crossterm::event::{KeyCode, KeyModifiers};

pub struct InputHandler;

impl InputHandler {
    pub fn handle_key_event(app: &mut App, key: KeyCode, modifiers: KeyModifiers) {
        if modifiers.contains(KeyModifiers::CONTROL) {
            if let KeyCode::Char('c') = key {
                app.quit();
            }
            return;
        }

        match app.screen {
            Screen::List => Self::handle_list_screen(app, key),
            Screen::Detail => Self::handle_detail_screen(app, key),
        }
    }

    fn handle_list_screen(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Char('q') => app.quit(),
            KeyCode::Char('r') | KeyCode::F(5) => app.retry(),
            KeyCode::Up | KeyCode::Char('k') => app.select_previous(),
            KeyCode::Down | KeyCode::Char('j') => app.select_next(),
            KeyCode::Home | KeyCode::Char('g') => app.select_first(),
            KeyCode::End | KeyCode::Char('G') => app.select_last(),
            KeyCode::Enter | KeyCode::Right | KeyCode::Char('l') => app.open_detail(),
            _ => {}
        }
    }

    fn handle_detail_screen(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Char('q') => app.quit(),
            KeyCode::Char('r') | KeyCode::F(5) => app.retry(),
            KeyCode::Esc | KeyCode::Backspace | KeyCode::Left | KeyCode::Char('h') => {
                app.close_detail()
            }
            _ => {}
        }
    }
}
