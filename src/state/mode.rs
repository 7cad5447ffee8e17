use crate::input::InputLine;
use crate::menu::MenuItem;
use crate::ops::TransferKind;
use crate::remote::OpDescriptor;

/// Application mode
#[derive(Debug, Clone)]
pub enum Mode {
    /// Normal panel browsing
    Normal,
    /// Copy/move destination prompt
    Transfer {
        kind: TransferKind,
        from: String,
        names: Vec<String>,
        dest_input: InputLine,
        /// Focused element: 0 = input field, 1 = OK, 2 = Cancel
        focus: usize,
    },
    /// "<name> already exists. Overwrite?" before a copy/move
    OverwriteConfirm {
        kind: TransferKind,
        descriptor: OpDescriptor,
        name: String,
        /// Focused button: 0 = Yes, 1 = No
        focus: usize,
    },
    /// Delete confirmation
    ConfirmDelete {
        message: String,
        /// Focused button: 0 = Delete, 1 = Cancel
        focus: usize,
    },
    /// Modal alert; any key dismisses it
    Alert { title: String, message: String },
    /// Prompt for a command to run in the terminal panel
    RunCommand { input: InputLine },
    /// Context menu (F9)
    Menu {
        items: Vec<MenuItem>,
        selected: usize,
    },
    /// A file operation is in flight
    Progress { title: String, frame: usize },
    /// Signals the main loop to run the terminal panel.
    /// With a command set the shell runs it and, unless `auto_close`,
    /// waits for a key after it exits; without one it is interactive.
    Terminal {
        command: Option<String>,
        auto_close: bool,
    },
}
