//! Panel data structures and logic

use std::collections::HashSet;

use crate::ops::PanelSnapshot;
use crate::remote::{EntryKind, Listing, RemoteEntry, base_name, parent_remote};

/// What to focus once the next listing arrives
#[derive(Debug, Clone)]
pub enum PendingSelect {
    /// Focus this name
    Name(String),
    /// Keep the old focus when it survived, otherwise the fallback
    /// (used after a delete)
    CurrentOr {
        current: Option<String>,
        fallback: Option<String>,
    },
}

/// A single file panel over a remote directory
pub struct Panel {
    /// Current directory (remote path)
    pub path: String,
    /// Entries in display order; index 0 is the parent entry off-root
    pub entries: Vec<RemoteEntry>,
    /// Cursor position (index into entries)
    pub cursor: usize,
    /// Scroll offset for display
    pub scroll_offset: usize,
    /// Selected names
    pub selected: HashSet<String>,
    /// Error message if the listing couldn't be fetched
    pub error: Option<String>,
    /// Last known visible height, updated during rendering
    pub visible_height: usize,
    /// A listing fetch is in flight
    pub loading: bool,
    /// At least one listing has been applied
    pub loaded_once: bool,
    /// Show hidden files (starting with .)
    pub show_hidden: bool,
    /// Focus to restore when the in-flight listing lands
    pub pending_select: Option<PendingSelect>,
}

impl std::fmt::Debug for Panel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Panel")
            .field("path", &self.path)
            .field("entries", &self.entries.len())
            .field("cursor", &self.cursor)
            .finish()
    }
}

impl Panel {
    /// Create a panel for the given directory. The first listing is
    /// requested by the app once the I/O worker is up.
    pub fn new(path: impl Into<String>, show_hidden: bool) -> Self {
        Self {
            path: path.into(),
            entries: Vec::new(),
            cursor: 0,
            scroll_offset: 0,
            selected: HashSet::new(),
            error: None,
            visible_height: 20,
            loading: false,
            loaded_once: false,
            show_hidden,
            pending_select: None,
        }
    }

    pub fn is_root(&self) -> bool {
        parent_remote(&self.path).is_none()
    }

    /// Apply a fetched listing: rebuild entries, restore focus.
    pub fn apply_listing(&mut self, listing: Listing) {
        let old_current = self.current_name().map(|s| s.to_string());

        self.path = listing.path;
        self.error = None;
        self.loading = false;
        self.loaded_once = true;

        let mut files: Vec<RemoteEntry> = listing
            .files
            .into_iter()
            .filter(|entry| self.show_hidden || !entry.name.starts_with('.'))
            .collect();
        files.sort_by(|a, b| {
            b.is_dir()
                .cmp(&a.is_dir())
                .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        });

        self.entries.clear();
        if !self.is_root() {
            self.entries.push(RemoteEntry {
                name: "..".to_string(),
                kind: EntryKind::Directory,
                size: 0,
                modified: None,
            });
        }
        self.entries.extend(files);

        // Drop selections that no longer exist
        let existing: HashSet<String> = self.entries.iter().map(|e| e.name.clone()).collect();
        self.selected.retain(|name| existing.contains(name));

        let target = match self.pending_select.take() {
            Some(PendingSelect::Name(name)) => Some(name),
            Some(PendingSelect::CurrentOr { current, fallback }) => {
                let names = self.names();
                crate::ops::reselect_after_delete(
                    current.as_deref(),
                    &names,
                    fallback.as_deref(),
                )
            }
            None => old_current,
        };

        self.cursor = target
            .and_then(|name| self.entries.iter().position(|e| e.name == name))
            .unwrap_or(0);
        self.clamp_cursor();
    }

    /// Record a failed listing fetch
    pub fn apply_error(&mut self, message: String) {
        self.loading = false;
        self.error = Some(message);
        self.pending_select = None;
    }

    /// The focused entry, if any
    pub fn current_entry(&self) -> Option<&RemoteEntry> {
        self.entries.get(self.cursor)
    }

    /// The focused name, excluding the parent entry
    pub fn current_name(&self) -> Option<&str> {
        self.current_entry()
            .map(|e| e.name.as_str())
            .filter(|name| *name != "..")
    }

    /// Listed names in display order, without the parent entry
    pub fn names(&self) -> Vec<String> {
        self.entries
            .iter()
            .filter(|e| e.name != "..")
            .map(|e| e.name.clone())
            .collect()
    }

    /// Toggle selection of the focused entry and advance the cursor
    pub fn toggle_select(&mut self) {
        if let Some(name) = self.current_name().map(|s| s.to_string()) {
            if !self.selected.remove(&name) {
                self.selected.insert(name);
            }
        }
        self.move_down();
    }

    pub fn select_all(&mut self) {
        if self.selected.len() == self.names().len() {
            self.selected.clear();
        } else {
            self.selected = self.names().into_iter().collect();
        }
    }

    pub fn move_up(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
        }
        self.adjust_scroll();
    }

    pub fn move_down(&mut self) {
        if self.cursor + 1 < self.entries.len() {
            self.cursor += 1;
        }
        self.adjust_scroll();
    }

    pub fn page_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(self.visible_height.max(1));
        self.adjust_scroll();
    }

    pub fn page_down(&mut self) {
        self.cursor = (self.cursor + self.visible_height.max(1))
            .min(self.entries.len().saturating_sub(1));
        self.adjust_scroll();
    }

    pub fn go_home(&mut self) {
        self.cursor = 0;
        self.adjust_scroll();
    }

    pub fn go_end(&mut self) {
        self.cursor = self.entries.len().saturating_sub(1);
        self.adjust_scroll();
    }

    fn clamp_cursor(&mut self) {
        if self.cursor >= self.entries.len() {
            self.cursor = self.entries.len().saturating_sub(1);
        }
        self.adjust_scroll();
    }

    fn adjust_scroll(&mut self) {
        let height = self.visible_height.max(1);
        if self.cursor < self.scroll_offset {
            self.scroll_offset = self.cursor;
        } else if self.cursor >= self.scroll_offset + height {
            self.scroll_offset = self.cursor + 1 - height;
        }
    }

    /// Snapshot for the operation dispatcher
    pub fn snapshot(&self) -> PanelSnapshot {
        let names = self.names();
        // Selection in display order, not set order
        let selected_names: Vec<String> = self
            .entries
            .iter()
            .filter(|e| e.name != ".." && self.selected.contains(&e.name))
            .map(|e| e.name.clone())
            .collect();

        PanelSnapshot {
            dir: self.path.clone(),
            dir_name: base_name(&self.path).to_string(),
            current_name: self.current_name().map(|s| s.to_string()),
            current_is_dir: self.current_entry().is_some_and(|e| e.is_dir()),
            selected_names,
            names,
        }
    }
}
