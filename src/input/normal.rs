//! Key handling for normal panel browsing

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::ops::Operation;
use crate::state::app::App;

pub fn handle_normal_mode(app: &mut App, key: KeyEvent) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let shift = key.modifiers.contains(KeyModifiers::SHIFT);

    match key.code {
        KeyCode::Tab => app.toggle_panel(),

        KeyCode::Up => app.active_panel_mut().move_up(),
        KeyCode::Down => app.active_panel_mut().move_down(),
        KeyCode::PageUp => app.active_panel_mut().page_up(),
        KeyCode::PageDown => app.active_panel_mut().page_down(),
        KeyCode::Home => app.active_panel_mut().go_home(),
        KeyCode::End => app.active_panel_mut().go_end(),

        KeyCode::Enter => app.enter(),
        KeyCode::Backspace => app.go_parent(),

        KeyCode::Insert => app.active_panel_mut().toggle_select(),
        KeyCode::Char('a' | 'A') if ctrl => app.active_panel_mut().select_all(),

        KeyCode::F(5) => app.show(Operation::Copy, None),
        KeyCode::F(6) => app.show(Operation::Move, None),
        KeyCode::F(8) => app.show(Operation::Delete, None),
        KeyCode::Delete if shift => app.show(Operation::DeleteSilent, None),
        KeyCode::Delete => app.show(Operation::Delete, None),

        KeyCode::F(2) => app.prompt_run_command(),
        KeyCode::F(9) => app.show_menu(),

        KeyCode::Char('r' | 'R') if ctrl => app.refresh_panels(),
        KeyCode::Char('o' | 'O') if ctrl => app.open_terminal(),

        KeyCode::F(10) => app.should_quit = true,
        KeyCode::Char('c' | 'C') if ctrl => app.should_quit = true,

        _ => {}
    }
}
