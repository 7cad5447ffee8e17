//! Status bar widget

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    widgets::Widget,
};

use super::Theme;
use crate::state::panel::Panel;
use crate::transport::LinkState;

const HINTS: &str = "F5 Copy  F6 Move  F8 Delete  F9 Menu  F10 Quit";

/// One-line status bar: focused entry on the left, transport state and
/// key hints on the right.
pub struct StatusBar<'a> {
    panel: &'a Panel,
    link_state: LinkState,
    theme: &'a Theme,
}

impl<'a> StatusBar<'a> {
    pub fn new(panel: &'a Panel, link_state: LinkState, theme: &'a Theme) -> Self {
        Self {
            panel,
            link_state,
            theme,
        }
    }
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height < 1 {
            return;
        }

        let style = Style::default()
            .bg(self.theme.status_bg)
            .fg(self.theme.status_fg);
        for x in area.x..area.x + area.width {
            buf[(x, area.y)].set_char(' ').set_style(style);
        }

        // Focused entry info
        let info = match self.panel.current_entry() {
            Some(entry) if entry.name == ".." => " ..".to_string(),
            Some(entry) if entry.is_dir() => format!(" {}/", entry.name),
            Some(entry) => format!(" {}  {} B", entry.name, entry.size),
            None => String::new(),
        };
        let info: String = info
            .chars()
            .take(area.width.saturating_sub(2) as usize)
            .collect();
        buf.set_string(area.x, area.y, info, style);

        // Transport state + hints, right-aligned
        let (label, color) = match self.link_state {
            LinkState::Connected => ("live", self.theme.link_live),
            LinkState::Authenticating => ("auth", self.theme.link_rest),
            LinkState::Disconnected => ("rest", self.theme.link_rest),
        };
        let tail = format!("{}  [{}] ", HINTS, label);
        if (tail.len() as u16) < area.width {
            let x = area.x + area.width - tail.len() as u16;
            buf.set_string(x, area.y, HINTS, style);
            let link_style = Style::default()
                .bg(self.theme.status_bg)
                .fg(color)
                .add_modifier(Modifier::BOLD);
            buf.set_string(
                x + HINTS.len() as u16 + 2,
                area.y,
                format!("[{}]", label),
                link_style,
            );
        }
    }
}
