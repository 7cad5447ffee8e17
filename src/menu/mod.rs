//! Context menu model
//!
//! Two menu variants exist: the file menu, shown when a real entry is
//! focused, and the panel menu, shown on the parent entry or in an empty
//! panel. The file menu is the panel menu plus the file operations.

/// One selectable menu row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuItem {
    pub label: &'static str,
    pub action: MenuAction,
}

/// What a menu row does when picked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    Copy,
    Move,
    Delete,
    Pack,
    Extract,
    Refresh,
    ToggleSelectAll,
    Terminal,
    RunCommand,
    Quit,
}

/// Build the menu for the focused position.
///
/// `on_entry` is false on the parent entry and in empty panels.
pub fn build_menu(on_entry: bool, terminal_enabled: bool) -> Vec<MenuItem> {
    let mut items = Vec::new();

    if on_entry {
        items.push(MenuItem { label: "Copy", action: MenuAction::Copy });
        items.push(MenuItem { label: "Move", action: MenuAction::Move });
        items.push(MenuItem { label: "Delete", action: MenuAction::Delete });
        items.push(MenuItem { label: "Pack", action: MenuAction::Pack });
        items.push(MenuItem { label: "Extract", action: MenuAction::Extract });
    }

    items.push(MenuItem { label: "Refresh", action: MenuAction::Refresh });
    items.push(MenuItem {
        label: "(Un)Select All",
        action: MenuAction::ToggleSelectAll,
    });
    if terminal_enabled {
        items.push(MenuItem {
            label: "Terminal",
            action: MenuAction::Terminal,
        });
        items.push(MenuItem {
            label: "Run Command...",
            action: MenuAction::RunCommand,
        });
    }
    items.push(MenuItem { label: "Quit", action: MenuAction::Quit });

    items
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panel_menu_has_no_file_operations() {
        let items = build_menu(false, true);
        assert!(!items.iter().any(|i| i.action == MenuAction::Copy));
        assert!(items.iter().any(|i| i.action == MenuAction::Refresh));
        assert!(items.iter().any(|i| i.action == MenuAction::Terminal));
    }

    #[test]
    fn test_file_menu_includes_operations() {
        let items = build_menu(true, true);
        let actions: Vec<_> = items.iter().map(|i| i.action).collect();
        for action in [
            MenuAction::Copy,
            MenuAction::Move,
            MenuAction::Delete,
            MenuAction::Pack,
            MenuAction::Extract,
        ] {
            assert!(actions.contains(&action));
        }
    }

    #[test]
    fn test_terminal_entry_follows_config() {
        let items = build_menu(true, false);
        assert!(!items.iter().any(|i| i.action == MenuAction::Terminal));
    }
}
