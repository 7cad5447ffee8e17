//! File panel widget

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    widgets::StatefulWidget,
};

use super::Theme;
use crate::state::panel::Panel;

/// Renders one panel: bordered box, path in the title, entry list inside
pub struct PanelWidget<'a> {
    active: bool,
    theme: &'a Theme,
}

impl<'a> PanelWidget<'a> {
    pub fn new(active: bool, theme: &'a Theme) -> Self {
        Self { active, theme }
    }
}

impl StatefulWidget for PanelWidget<'_> {
    type State = Panel;

    fn render(self, area: Rect, buf: &mut Buffer, panel: &mut Panel) {
        if area.width < 4 || area.height < 3 {
            return;
        }

        let border_color = if self.active {
            self.theme.panel_border_active
        } else {
            self.theme.panel_border_inactive
        };
        let border_style = Style::default().fg(border_color);
        let bg_style = Style::default().bg(self.theme.panel_background);

        for row in area.y..area.y + area.height {
            for col in area.x..area.x + area.width {
                buf[(col, row)].set_char(' ').set_style(bg_style);
            }
        }

        // Border
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

        // Path in the top border
        let header_style = Style::default()
            .bg(self.theme.panel_background)
            .fg(self.theme.panel_header)
            .add_modifier(if self.active {
                Modifier::BOLD
            } else {
                Modifier::empty()
            });
        let max_title = area.width.saturating_sub(4) as usize;
        let mut title = panel.path.clone();
        let title_chars = title.chars().count();
        if title_chars > max_title && max_title > 0 {
            let skip = title_chars - max_title + 1;
            title = format!("…{}", title.chars().skip(skip).collect::<String>());
        }
        buf.set_string(area.x + 2, area.y, format!(" {} ", title), header_style);

        // Entry rows
        let inner_width = area.width.saturating_sub(2) as usize;
        let height = area.height.saturating_sub(2) as usize;
        panel.visible_height = height;

        // Keep the cursor in view now that the height is known
        if panel.cursor < panel.scroll_offset {
            panel.scroll_offset = panel.cursor;
        } else if height > 0 && panel.cursor >= panel.scroll_offset + height {
            panel.scroll_offset = panel.cursor + 1 - height;
        }

        for row in 0..height {
            let idx = panel.scroll_offset + row;
            let Some(entry) = panel.entries.get(idx) else {
                break;
            };

            let is_cursor = idx == panel.cursor && self.active;
            let is_selected = panel.selected.contains(&entry.name);

            let mut style = Style::default().bg(self.theme.panel_background);
            style = if is_selected {
                style.fg(self.theme.file_selected).add_modifier(Modifier::BOLD)
            } else if entry.is_dir() {
                style.fg(self.theme.file_directory)
            } else {
                style.fg(self.theme.file_normal)
            };
            if is_cursor {
                style = style.bg(self.theme.cursor_bg);
                if !is_selected {
                    style = style.fg(self.theme.cursor_fg);
                }
            }

            let marker = if is_selected { '*' } else { ' ' };
            let name = if entry.is_dir() {
                format!("{}{}/", marker, entry.name)
            } else {
                format!("{}{}", marker, entry.name)
            };
            let line: String = name.chars().take(inner_width).collect();
            let line = format!("{:<width$}", line, width = inner_width);

            buf.set_string(area.x + 1, area.y + 1 + row as u16, line, style);
        }

        // Bottom border doubles as a notice line
        if panel.loading {
            buf.set_string(
                area.x + 2,
                bottom,
                " loading... ",
                Style::default()
                    .bg(self.theme.panel_background)
                    .fg(self.theme.panel_header),
            );
        } else if let Some(error) = &panel.error {
            let notice: String = format!(" {} ", error)
                .chars()
                .take(area.width.saturating_sub(4) as usize)
                .collect();
            buf.set_string(
                area.x + 2,
                bottom,
                notice,
                Style::default()
                    .bg(self.theme.panel_background)
                    .fg(self.theme.status_error_fg),
            );
        }
    }
}
