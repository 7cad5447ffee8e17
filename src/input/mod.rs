//! Input handling
//!
//! Keyboard input dispatches on the current application mode.

mod dialogs;
mod normal;
mod text_field;

pub use text_field::InputLine;

use crossterm::event::KeyEvent;

use crate::state::app::App;
use crate::state::mode::Mode;

/// Handle a key event based on current mode
pub fn handle_key(app: &mut App, key: KeyEvent) {
    match &app.mode {
        Mode::Normal => normal::handle_normal_mode(app, key),
        Mode::Transfer { .. } => dialogs::handle_transfer_mode(app, key),
        Mode::OverwriteConfirm { .. } => dialogs::handle_overwrite_confirm_mode(app, key),
        Mode::ConfirmDelete { .. } => dialogs::handle_confirm_delete_mode(app, key),
        Mode::Alert { .. } => dialogs::handle_alert_mode(app, key),
        Mode::RunCommand { .. } => dialogs::handle_run_command_mode(app, key),
        Mode::Menu { .. } => dialogs::handle_menu_mode(app, key),
        // No cancellation: a transport call that went out runs to
        // completion or failure, so keys are ignored meanwhile.
        Mode::Progress { .. } => {}
        // Handled in the main loop
        Mode::Terminal { .. } => {}
    }
}
