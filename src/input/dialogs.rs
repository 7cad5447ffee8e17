//! Key handling for dialogs

use crossterm::event::{KeyCode, KeyEvent};

use crate::state::app::App;
use crate::state::mode::Mode;

pub fn handle_transfer_mode(app: &mut App, key: KeyEvent) {
    let Mode::Transfer {
        kind,
        from,
        names,
        dest_input,
        focus,
    } = &mut app.mode
    else {
        return;
    };

    match key.code {
        KeyCode::Esc => {
            app.mode = Mode::Normal;
        }

        KeyCode::Tab => {
            *focus = (*focus + 1) % 3;
        }

        KeyCode::BackTab => {
            *focus = if *focus == 0 { 2 } else { *focus - 1 };
        }

        KeyCode::Enter => {
            match *focus {
                0 | 1 => {
                    let kind = *kind;
                    let from = from.clone();
                    let names = names.clone();
                    let to = dest_input.text.clone();
                    app.mode = Mode::Normal;
                    app.submit_transfer(kind, from, names, to);
                }
                _ => {
                    app.mode = Mode::Normal;
                }
            }
        }

        KeyCode::Backspace if *focus == 0 => dest_input.backspace(),
        KeyCode::Delete if *focus == 0 => dest_input.delete(),
        KeyCode::Left if *focus == 0 => dest_input.left(),
        KeyCode::Right if *focus == 0 => dest_input.right(),
        KeyCode::Home if *focus == 0 => dest_input.home(),
        KeyCode::End if *focus == 0 => dest_input.end(),
        KeyCode::Char(c) if *focus == 0 => dest_input.insert(c),

        KeyCode::Left if *focus > 1 => *focus -= 1,
        KeyCode::Right if *focus == 1 => *focus += 1,

        _ => {}
    }
}

pub fn handle_overwrite_confirm_mode(app: &mut App, key: KeyEvent) {
    let Mode::OverwriteConfirm {
        kind,
        descriptor,
        focus,
        ..
    } = &mut app.mode
    else {
        return;
    };

    match key.code {
        KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {
            app.mode = Mode::Normal;
        }

        KeyCode::Char('y') | KeyCode::Char('Y') => {
            let kind = *kind;
            let descriptor = descriptor.clone();
            app.mode = Mode::Normal;
            app.run_transfer(kind, descriptor);
        }

        KeyCode::Enter => {
            if *focus == 0 {
                let kind = *kind;
                let descriptor = descriptor.clone();
                app.mode = Mode::Normal;
                app.run_transfer(kind, descriptor);
            } else {
                app.mode = Mode::Normal;
            }
        }

        KeyCode::Tab | KeyCode::BackTab | KeyCode::Left | KeyCode::Right => {
            *focus = if *focus == 0 { 1 } else { 0 };
        }

        _ => {}
    }
}

pub fn handle_confirm_delete_mode(app: &mut App, key: KeyEvent) {
    let Mode::ConfirmDelete { focus, .. } = &mut app.mode else {
        return;
    };

    match key.code {
        KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {
            app.mode = Mode::Normal;
        }

        KeyCode::Char('y') | KeyCode::Char('Y') => {
            app.mode = Mode::Normal;
            app.delete_silent();
        }

        KeyCode::Enter => {
            let confirmed = *focus == 0;
            app.mode = Mode::Normal;
            if confirmed {
                app.delete_silent();
            }
        }

        KeyCode::Tab | KeyCode::BackTab | KeyCode::Left | KeyCode::Right => {
            *focus = if *focus == 0 { 1 } else { 0 };
        }

        _ => {}
    }
}

pub fn handle_alert_mode(app: &mut App, _key: KeyEvent) {
    app.mode = Mode::Normal;
}

pub fn handle_run_command_mode(app: &mut App, key: KeyEvent) {
    let Mode::RunCommand { input } = &mut app.mode else {
        return;
    };

    match key.code {
        KeyCode::Esc => {
            app.mode = Mode::Normal;
        }

        KeyCode::Enter => {
            let command = input.text.clone();
            app.run_in_terminal(command);
        }

        KeyCode::Backspace => input.backspace(),
        KeyCode::Delete => input.delete(),
        KeyCode::Left => input.left(),
        KeyCode::Right => input.right(),
        KeyCode::Home => input.home(),
        KeyCode::End => input.end(),
        KeyCode::Char(c) => input.insert(c),

        _ => {}
    }
}

pub fn handle_menu_mode(app: &mut App, key: KeyEvent) {
    let Mode::Menu { items, selected } = &mut app.mode else {
        return;
    };

    match key.code {
        KeyCode::Esc | KeyCode::F(9) => {
            app.mode = Mode::Normal;
        }

        KeyCode::Up => {
            *selected = if *selected == 0 {
                items.len() - 1
            } else {
                *selected - 1
            };
        }

        KeyCode::Down => {
            *selected = (*selected + 1) % items.len();
        }

        KeyCode::Enter => {
            let action = items[*selected].action;
            app.run_menu_action(action);
        }

        _ => {}
    }
}
