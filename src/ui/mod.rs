//! UI components

pub mod dialog;
pub mod menu;
pub mod panel;
pub mod status;

pub use dialog::{AlertDialog, ConfirmDialog, ProgressDialog, PromptDialog, TransferDialog};
pub use menu::MenuWidget;
pub use panel::PanelWidget;
pub use status::StatusBar;

use ratatui::style::Color;

/// Fixed color palette, Norton-Commander dark
pub struct Theme {
    pub panel_border_active: Color,
    pub panel_border_inactive: Color,
    pub panel_header: Color,
    pub panel_background: Color,
    pub file_normal: Color,
    pub file_directory: Color,
    pub file_selected: Color,
    pub cursor_bg: Color,
    pub cursor_fg: Color,
    pub status_bg: Color,
    pub status_fg: Color,
    pub status_error_fg: Color,
    pub dialog_bg: Color,
    pub dialog_border: Color,
    pub dialog_title: Color,
    pub dialog_text: Color,
    pub dialog_input_bg: Color,
    pub dialog_input_fg: Color,
    pub dialog_button_focused_bg: Color,
    pub dialog_button_focused_fg: Color,
    pub dialog_button_unfocused: Color,
    pub link_live: Color,
    pub link_rest: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            panel_border_active: Color::Cyan,
            panel_border_inactive: Color::DarkGray,
            panel_header: Color::Yellow,
            panel_background: Color::Rgb(0x2d, 0x2d, 0x2d),
            file_normal: Color::Rgb(0xdc, 0xdc, 0xdc),
            file_directory: Color::Rgb(0xab, 0xaf, 0x87),
            file_selected: Color::Yellow,
            cursor_bg: Color::Rgb(0x00, 0x5f, 0x5f),
            cursor_fg: Color::Rgb(0xdc, 0xdc, 0xdc),
            status_bg: Color::Rgb(0x23, 0x23, 0x23),
            status_fg: Color::Rgb(0xab, 0xb2, 0xbf),
            status_error_fg: Color::Rgb(0xe0, 0x6c, 0x75),
            dialog_bg: Color::Rgb(0x1e, 0x28, 0x37),
            dialog_border: Color::Rgb(0x61, 0xaf, 0xef),
            dialog_title: Color::White,
            dialog_text: Color::Rgb(0xab, 0xb2, 0xbf),
            dialog_input_bg: Color::Rgb(0x4c, 0x52, 0x63),
            dialog_input_fg: Color::White,
            dialog_button_focused_bg: Color::Cyan,
            dialog_button_focused_fg: Color::Black,
            dialog_button_unfocused: Color::Gray,
            link_live: Color::Rgb(0x98, 0xc3, 0x79),
            link_rest: Color::Rgb(0xd2, 0x8c, 0x3c),
        }
    }
}
