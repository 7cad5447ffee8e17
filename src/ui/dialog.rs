//! Modal dialog widgets

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    widgets::Widget,
};

use super::Theme;
use crate::ops::TransferKind;

/// Center a dialog of the given size in `area`
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width.saturating_sub(2));
    let height = height.min(area.height.saturating_sub(2));
    Rect {
        x: area.x + (area.width.saturating_sub(width)) / 2,
        y: area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height,
    }
}

/// Fill the dialog area and draw its border
fn draw_box(buf: &mut Buffer, area: Rect, theme: &Theme) {
    let bg_style = Style::default().bg(theme.dialog_bg);
    for row in area.y..area.y + area.height {
        for col in area.x..area.x + area.width {
            buf[(col, row)].set_char(' ').set_style(bg_style);
        }
    }

    let border_style = Style::default().fg(theme.dialog_border).bg(theme.dialog_bg);
    let right = area.x + area.width - 1;
    let bottom = area.y + area.height - 1;
    buf[(area.x, area.y)].set_char('┌').set_style(border_style);
    buf[(right, area.y)].set_char('┐').set_style(border_style);
    buf[(area.x, bottom)].set_char('└').set_style(border_style);
    buf[(right, bottom)].set_char('┘').set_style(border_style);
    for col in area.x + 1..right {
        buf[(col, area.y)].set_char('─').set_style(border_style);
        buf[(col, bottom)].set_char('─').set_style(border_style);
    }
    for row in area.y + 1..bottom {
        buf[(area.x, row)].set_char('│').set_style(border_style);
        buf[(right, row)].set_char('│').set_style(border_style);
    }
}

fn draw_title(buf: &mut Buffer, area: Rect, title: &str, theme: &Theme) {
    let style = Style::default()
        .bg(theme.dialog_bg)
        .fg(theme.dialog_title)
        .add_modifier(Modifier::BOLD);
    buf.set_string(area.x + 2, area.y, format!(" {} ", title), style);
}

/// Render a row of buttons, highlighting the focused one.
/// `focus_base` is the focus index of the first button.
fn draw_buttons(
    buf: &mut Buffer,
    area: Rect,
    y: u16,
    labels: &[&str],
    focus: usize,
    focus_base: usize,
    theme: &Theme,
) {
    let total: u16 = labels
        .iter()
        .map(|label| label.len() as u16 + 6)
        .sum::<u16>()
        .saturating_sub(2);
    let mut x = area.x + (area.width.saturating_sub(total)) / 2;

    for (i, label) in labels.iter().enumerate() {
        let focused = focus == focus_base + i;
        let style = if focused {
            Style::default()
                .bg(theme.dialog_button_focused_bg)
                .fg(theme.dialog_button_focused_fg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
                .bg(theme.dialog_bg)
                .fg(theme.dialog_button_unfocused)
        };
        buf.set_string(x, y, format!("[ {} ]", label), style);
        x += label.len() as u16 + 6;
    }
}

fn clip(text: &str, width: usize) -> String {
    text.chars().take(width).collect()
}

const TRANSFER_WIDTH: u16 = 60;
const TRANSFER_HEIGHT: u16 = 8;

/// Destination prompt for copy/move
pub struct TransferDialog<'a> {
    kind: TransferKind,
    names: &'a [String],
    dest_input: &'a str,
    focus: usize,
    theme: &'a Theme,
}

impl<'a> TransferDialog<'a> {
    pub fn new(
        kind: TransferKind,
        names: &'a [String],
        dest_input: &'a str,
        focus: usize,
        theme: &'a Theme,
    ) -> Self {
        Self {
            kind,
            names,
            dest_input,
            focus,
            theme,
        }
    }

    /// The prompt line: one name is quoted, several become a count
    fn message(&self) -> String {
        if self.names.len() > 1 {
            format!("{} {} file(s) to", self.kind.title(), self.names.len())
        } else {
            let name = self.names.first().map(String::as_str).unwrap_or("");
            format!("{} \"{}\" to", self.kind.title(), name)
        }
    }
}

impl Widget for TransferDialog<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 20 || area.height < TRANSFER_HEIGHT {
            return;
        }
        let dialog = centered(area, TRANSFER_WIDTH, TRANSFER_HEIGHT);
        draw_box(buf, dialog, self.theme);
        draw_title(buf, dialog, self.kind.title(), self.theme);

        let text_style = Style::default()
            .bg(self.theme.dialog_bg)
            .fg(self.theme.dialog_text);
        let inner = dialog.width.saturating_sub(4) as usize;
        buf.set_string(
            dialog.x + 2,
            dialog.y + 2,
            clip(&self.message(), inner),
            text_style,
        );

        // Input line
        let input_style = if self.focus == 0 {
            Style::default()
                .bg(self.theme.dialog_input_bg)
                .fg(self.theme.dialog_input_fg)
        } else {
            Style::default()
                .bg(self.theme.dialog_bg)
                .fg(self.theme.dialog_button_unfocused)
        };
        let input_y = dialog.y + 4;
        for col in dialog.x + 2..dialog.x + dialog.width - 2 {
            buf[(col, input_y)].set_char(' ').set_style(input_style);
        }
        buf.set_string(
            dialog.x + 2,
            input_y,
            clip(self.dest_input, inner),
            input_style,
        );

        draw_buttons(
            buf,
            dialog,
            dialog.y + 6,
            &["OK", "Cancel"],
            self.focus,
            1,
            self.theme,
        );
    }
}

/// Cursor position inside an input dialog's field. The transfer and
/// run-command dialogs share the same geometry.
pub fn input_cursor_position(area: Rect, input: &crate::input::InputLine) -> (u16, u16) {
    let dialog = centered(area, TRANSFER_WIDTH, TRANSFER_HEIGHT);
    let max = dialog.width.saturating_sub(5) as usize;
    let x = dialog.x + 2 + input.cursor_chars().min(max) as u16;
    (x, dialog.y + 4)
}

/// One-line input prompt: Enter submits, Esc cancels
pub struct PromptDialog<'a> {
    title: &'a str,
    message: &'a str,
    input: &'a str,
    theme: &'a Theme,
}

impl<'a> PromptDialog<'a> {
    pub fn new(title: &'a str, message: &'a str, input: &'a str, theme: &'a Theme) -> Self {
        Self {
            title,
            message,
            input,
            theme,
        }
    }
}

impl Widget for PromptDialog<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 20 || area.height < TRANSFER_HEIGHT {
            return;
        }
        let dialog = centered(area, TRANSFER_WIDTH, TRANSFER_HEIGHT);
        draw_box(buf, dialog, self.theme);
        draw_title(buf, dialog, self.title, self.theme);

        let text_style = Style::default()
            .bg(self.theme.dialog_bg)
            .fg(self.theme.dialog_text);
        let inner = dialog.width.saturating_sub(4) as usize;
        buf.set_string(
            dialog.x + 2,
            dialog.y + 2,
            clip(self.message, inner),
            text_style,
        );

        let input_style = Style::default()
            .bg(self.theme.dialog_input_bg)
            .fg(self.theme.dialog_input_fg);
        let input_y = dialog.y + 4;
        for col in dialog.x + 2..dialog.x + dialog.width - 2 {
            buf[(col, input_y)].set_char(' ').set_style(input_style);
        }
        buf.set_string(
            dialog.x + 2,
            input_y,
            clip(self.input, inner),
            input_style,
        );

        buf.set_string(
            dialog.x + 2,
            dialog.y + 6,
            "Enter to run, Esc to cancel",
            Style::default()
                .bg(self.theme.dialog_bg)
                .fg(self.theme.dialog_button_unfocused),
        );
    }
}

/// Yes/no confirmation with a multi-line message
pub struct ConfirmDialog<'a> {
    title: &'a str,
    message: &'a str,
    buttons: [&'a str; 2],
    focus: usize,
    theme: &'a Theme,
}

impl<'a> ConfirmDialog<'a> {
    pub fn new(
        title: &'a str,
        message: &'a str,
        buttons: [&'a str; 2],
        focus: usize,
        theme: &'a Theme,
    ) -> Self {
        Self {
            title,
            message,
            buttons,
            focus,
            theme,
        }
    }
}

impl Widget for ConfirmDialog<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let lines: Vec<&str> = self.message.lines().collect();
        let height = (lines.len() as u16 + 5).min(area.height.saturating_sub(2));
        if area.width < 20 || area.height < 7 {
            return;
        }
        let dialog = centered(area, 60, height);
        draw_box(buf, dialog, self.theme);
        draw_title(buf, dialog, self.title, self.theme);

        let text_style = Style::default()
            .bg(self.theme.dialog_bg)
            .fg(self.theme.dialog_text);
        let inner = dialog.width.saturating_sub(4) as usize;
        let max_lines = dialog.height.saturating_sub(5) as usize;
        for (i, line) in lines.iter().take(max_lines).enumerate() {
            buf.set_string(
                dialog.x + 2,
                dialog.y + 2 + i as u16,
                clip(line, inner),
                text_style,
            );
        }

        draw_buttons(
            buf,
            dialog,
            dialog.y + dialog.height - 2,
            &self.buttons,
            self.focus,
            0,
            self.theme,
        );
    }
}

/// Alert: a message and one OK button, any key dismisses
pub struct AlertDialog<'a> {
    title: &'a str,
    message: &'a str,
    theme: &'a Theme,
}

impl<'a> AlertDialog<'a> {
    pub fn new(title: &'a str, message: &'a str, theme: &'a Theme) -> Self {
        Self {
            title,
            message,
            theme,
        }
    }
}

impl Widget for AlertDialog<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 20 || area.height < 7 {
            return;
        }
        let width = (self.message.chars().count() as u16 + 6).clamp(30, 70);
        let dialog = centered(area, width, 7);
        draw_box(buf, dialog, self.theme);
        draw_title(buf, dialog, self.title, self.theme);

        let text_style = Style::default()
            .bg(self.theme.dialog_bg)
            .fg(self.theme.dialog_text);
        let inner = dialog.width.saturating_sub(4) as usize;
        buf.set_string(
            dialog.x + 2,
            dialog.y + 2,
            clip(self.message, inner),
            text_style,
        );

        draw_buttons(buf, dialog, dialog.y + 4, &["OK"], 0, 0, self.theme);
    }
}

const SPINNER: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

/// Spinner shown while an operation is in flight
pub struct ProgressDialog<'a> {
    title: &'a str,
    frame: usize,
    theme: &'a Theme,
}

impl<'a> ProgressDialog<'a> {
    pub fn new(title: &'a str, frame: usize, theme: &'a Theme) -> Self {
        Self {
            title,
            frame,
            theme,
        }
    }
}

impl Widget for ProgressDialog<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 20 || area.height < 5 {
            return;
        }
        let dialog = centered(area, 40, 5);
        draw_box(buf, dialog, self.theme);
        draw_title(buf, dialog, self.title, self.theme);

        let spinner = SPINNER[self.frame % SPINNER.len()];
        let text_style = Style::default()
            .bg(self.theme.dialog_bg)
            .fg(self.theme.dialog_text);
        buf.set_string(
            dialog.x + 2,
            dialog.y + 2,
            format!("{} {}...", spinner, self.title),
            text_style,
        );
    }
}
