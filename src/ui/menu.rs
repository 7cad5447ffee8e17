//! Context menu popup

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    widgets::Widget,
};

use super::Theme;
use crate::menu::MenuItem;

pub struct MenuWidget<'a> {
    items: &'a [MenuItem],
    selected: usize,
    theme: &'a Theme,
}

impl<'a> MenuWidget<'a> {
    pub fn new(items: &'a [MenuItem], selected: usize, theme: &'a Theme) -> Self {
        Self {
            items,
            selected,
            theme,
        }
    }
}

impl Widget for MenuWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let width = self
            .items
            .iter()
            .map(|item| item.label.len())
            .max()
            .unwrap_or(0) as u16
            + 6;
        let height = self.items.len() as u16 + 2;
        if area.width < width || area.height < height {
            return;
        }

        let menu = Rect {
            x: area.x + (area.width - width) / 2,
            y: area.y + (area.height - height) / 2,
            width,
            height,
        };

        let bg_style = Style::default().bg(self.theme.dialog_bg);
        for row in menu.y..menu.y + menu.height {
            for col in menu.x..menu.x + menu.width {
                buf[(col, row)].set_char(' ').set_style(bg_style);
            }
        }

        let border_style = Style::default()
            .fg(self.theme.dialog_border)
            .bg(self.theme.dialog_bg);
        let right = menu.x + menu.width - 1;
        let bottom = menu.y + menu.height - 1;
        buf[(menu.x, menu.y)].set_char('┌').set_style(border_style);
        buf[(right, menu.y)].set_char('┐').set_style(border_style);
        buf[(menu.x, bottom)].set_char('└').set_style(border_style);
        buf[(right, bottom)].set_char('┘').set_style(border_style);
        for col in menu.x + 1..right {
            buf[(col, menu.y)].set_char('─').set_style(border_style);
            buf[(col, bottom)].set_char('─').set_style(border_style);
        }
        for row in menu.y + 1..bottom {
            buf[(menu.x, row)].set_char('│').set_style(border_style);
            buf[(right, row)].set_char('│').set_style(border_style);
        }

        for (i, item) in self.items.iter().enumerate() {
            let style = if i == self.selected {
                Style::default()
                    .bg(self.theme.cursor_bg)
                    .fg(self.theme.cursor_fg)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
                    .bg(self.theme.dialog_bg)
                    .fg(self.theme.dialog_text)
            };
            let line = format!(" {:<width$} ", item.label, width = width as usize - 4);
            buf.set_string(menu.x + 1, menu.y + 1 + i as u16, line, style);
        }
    }
}
