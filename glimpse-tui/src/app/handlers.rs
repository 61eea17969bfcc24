use anyhow::Result;
use crossterm::event::{Event, KeyCode, KeyEvent};
use tui_textarea::Input;

use super::{App, InputMode};

impl App {
    /// Handle the synchronous key events. Async operations (feed load,
    /// like persistence) are dispatched from the main loop.
    pub fn handle_key_event(&mut self, key: KeyEvent) -> Result<()> {
        if self.input_mode == InputMode::Typing {
            return self.handle_typing_keys(key);
        }

        match key.code {
            KeyCode::Char('q') => self.quit(),
            KeyCode::Esc => {
                if self.composer.is_open() {
                    self.close_comment_modal();
                } else {
                    self.quit();
                }
            }
            KeyCode::Down | KeyCode::Char('j') => self.select_next(),
            KeyCode::Up | KeyCode::Char('k') => self.select_previous(),
            KeyCode::Char('c') => self.open_comment_modal(),
            KeyCode::Char('r') => self.request_reload(),
            _ => {}
        }
        Ok(())
    }

    fn handle_typing_keys(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Esc => self.close_comment_modal(),
            KeyCode::Enter => self.submit_comment(),
            _ => {
                let input = Input::from(Event::Key(key));
                self.composer.textarea.input(input);
            }
        }
        Ok(())
    }
}
