//! Operation dispatch planning
//!
//! The functions here turn panel state into operation descriptors and
//! decide what confirmation, if any, stands between the user gesture and
//! the transport call. They are pure: the app layer owns the dialogs,
//! the background execution, and the refresh that follows.

pub mod naming;

use crate::config::PackFormat;
use crate::remote::{OpDescriptor, join_remote};

/// The operations exposed through the uniform dispatch entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Copy,
    Move,
    Delete,
    DeleteSilent,
    Pack,
    Extract,
}

/// Copy and move share their whole flow; this picks the variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferKind {
    Copy,
    Move,
}

impl TransferKind {
    pub fn title(&self) -> &'static str {
        match self {
            TransferKind::Copy => "Copy",
            TransferKind::Move => "Rename/Move",
        }
    }
}

/// What the dispatcher needs to know about one panel
#[derive(Debug, Clone, Default)]
pub struct PanelSnapshot {
    /// Panel directory (remote path)
    pub dir: String,
    /// Last component of the directory path
    pub dir_name: String,
    /// Focused entry, if any (never the parent entry)
    pub current_name: Option<String>,
    /// Whether the focused entry is a directory
    pub current_is_dir: bool,
    /// Multi-selection in display order
    pub selected_names: Vec<String>,
    /// Every listed name in display order (without the parent entry)
    pub names: Vec<String>,
}

impl PanelSnapshot {
    /// The active files: the selection, or the focused entry when nothing
    /// is selected. Empty means there is nothing to operate on.
    pub fn active_names(&self) -> Vec<String> {
        if !self.selected_names.is_empty() {
            return self.selected_names.clone();
        }
        self.current_name.iter().cloned().collect()
    }
}

/// Outcome of submitting a copy/move for execution
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferDecision {
    /// Nothing to do: no names, no destination, or source == destination
    Reject,
    /// Ask before overwriting `name` at the destination, then run
    Confirm { descriptor: OpDescriptor, name: String },
    /// Run immediately
    Run { descriptor: OpDescriptor },
}

/// Decide how a copy/move proceeds once the destination is known.
///
/// Empty `names` falls back to the focused entry. Overwrite confirmation
/// is requested only when the confirm flag is on AND the first name
/// already exists in the destination listing.
pub fn decide_transfer(
    from: &str,
    to: &str,
    mut names: Vec<String>,
    current_name: Option<&str>,
    destination_names: &[String],
    confirm: bool,
) -> TransferDecision {
    if names.is_empty() {
        match current_name {
            Some(name) => names.push(name.to_string()),
            None => return TransferDecision::Reject,
        }
    }

    if to.is_empty() || from == to {
        return TransferDecision::Reject;
    }

    let first = names[0].clone();
    let collides = destination_names.iter().any(|name| *name == first);
    let descriptor = OpDescriptor::new(from, to, names);

    if confirm && collides {
        TransferDecision::Confirm {
            descriptor,
            name: first,
        }
    } else {
        TransferDecision::Run { descriptor }
    }
}

/// Confirmation text for a delete, listing at most five names.
/// Returns None when there is nothing to delete.
pub fn delete_prompt_message(snapshot: &PanelSnapshot) -> Option<String> {
    const SHOWN: usize = 5;

    if !snapshot.selected_names.is_empty() {
        let names = &snapshot.selected_names;
        let mut listed = String::new();
        for name in names.iter().take(SHOWN) {
            listed.push('\n');
            listed.push_str(name);
        }
        if names.len() >= SHOWN {
            listed.push_str("\n...");
        }
        return Some(format!(
            "Do you really want to delete the selected {} files/directories?{}",
            names.len(),
            listed
        ));
    }

    let name = snapshot.current_name.as_deref()?;
    let kind = if snapshot.current_is_dir {
        "directory"
    } else {
        "file"
    };
    Some(format!(
        "Do you really want to delete the selected {} {}?",
        kind, name
    ))
}

/// A delete ready to run, with the focus fallback precomputed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletePlan {
    pub descriptor: OpDescriptor,
    /// Focused name before the delete (kept if it survives)
    pub current_name: Option<String>,
    /// Neighbour of the removed set, selected when the focus does not survive
    pub next_current: Option<String>,
}

/// Plan a silent delete of the active files. None when nothing is active.
pub fn delete_plan(snapshot: &PanelSnapshot) -> Option<DeletePlan> {
    let removed = snapshot.active_names();
    if removed.is_empty() {
        return None;
    }

    let next_current = snapshot
        .current_name
        .as_deref()
        .and_then(|current| naming::next_current_name(current, &snapshot.names, &removed));

    Some(DeletePlan {
        descriptor: OpDescriptor::new(snapshot.dir.clone(), String::new(), removed),
        current_name: snapshot.current_name.clone(),
        next_current,
    })
}

/// After the post-delete refresh: keep the old focus when it survived,
/// otherwise fall back to the precomputed neighbour.
pub fn reselect_after_delete(
    current: Option<&str>,
    listing: &[String],
    fallback: Option<&str>,
) -> Option<String> {
    if let Some(current) = current
        && listing.iter().any(|name| name == current) {
            return Some(current.to_string());
        }
    fallback.map(|name| name.to_string())
}

/// A pack ready to run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackPlan {
    pub descriptor: OpDescriptor,
    pub format: PackFormat,
    /// Archive name, selected after the refresh
    pub reselect: String,
}

/// Plan packing the active files. A single entry names the archive after
/// itself, several entries name it after the containing directory.
pub fn pack_plan(snapshot: &PanelSnapshot, format: PackFormat) -> Option<PackPlan> {
    let names = snapshot.active_names();
    if names.is_empty() {
        return None;
    }

    let stem = if names.len() > 1 {
        snapshot.dir_name.as_str()
    } else {
        names[0].as_str()
    };
    let archive = format!("{}{}", stem, format.extension());

    Some(PackPlan {
        descriptor: OpDescriptor::new(
            snapshot.dir.clone(),
            join_remote(&snapshot.dir, &archive),
            names,
        ),
        format,
        reselect: archive,
    })
}

/// An extract ready to run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractPlan {
    pub descriptor: OpDescriptor,
    /// Archive name without its extension, selected after the refresh
    pub reselect: String,
}

/// Plan extracting the focused archive into its containing directory
pub fn extract_plan(snapshot: &PanelSnapshot) -> Option<ExtractPlan> {
    let current = snapshot.current_name.as_deref()?;

    Some(ExtractPlan {
        descriptor: OpDescriptor::new(
            join_remote(&snapshot.dir, current),
            snapshot.dir.clone(),
            Vec::new(),
        ),
        reselect: naming::remove_extension(current).to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn snapshot() -> PanelSnapshot {
        PanelSnapshot {
            dir: "/home/docs".to_string(),
            dir_name: "docs".to_string(),
            current_name: Some("b.txt".to_string()),
            current_is_dir: false,
            selected_names: Vec::new(),
            names: names(&["a.txt", "b.txt", "c.txt"]),
        }
    }

    #[test]
    fn test_empty_names_substitutes_focused_entry() {
        let decision = decide_transfer(
            "/home/docs",
            "/backup",
            Vec::new(),
            Some("b.txt"),
            &[],
            true,
        );
        match decision {
            TransferDecision::Run { descriptor } => {
                assert_eq!(descriptor.names, names(&["b.txt"]));
            }
            other => panic!("unexpected decision: {:?}", other),
        }
    }

    #[test]
    fn test_no_names_and_no_focus_rejects() {
        let decision = decide_transfer("/a", "/b", Vec::new(), None, &[], true);
        assert_eq!(decision, TransferDecision::Reject);
    }

    #[test]
    fn test_same_source_and_destination_rejects() {
        let decision =
            decide_transfer("/a", "/a", names(&["x"]), None, &[], true);
        assert_eq!(decision, TransferDecision::Reject);
        let decision = decide_transfer("/a", "", names(&["x"]), None, &[], true);
        assert_eq!(decision, TransferDecision::Reject);
    }

    #[test]
    fn test_confirm_only_on_flag_and_collision() {
        let dest = names(&["x", "y"]);

        // Flag on, collision: confirm
        let decision = decide_transfer("/a", "/b", names(&["x"]), None, &dest, true);
        assert!(matches!(
            decision,
            TransferDecision::Confirm { ref name, .. } if name == "x"
        ));

        // Flag on, no collision: run
        let decision = decide_transfer("/a", "/b", names(&["z"]), None, &dest, true);
        assert!(matches!(decision, TransferDecision::Run { .. }));

        // Flag off, collision: run
        let decision = decide_transfer("/a", "/b", names(&["x"]), None, &dest, false);
        assert!(matches!(decision, TransferDecision::Run { .. }));
    }

    #[test]
    fn test_delete_prompt_single_current() {
        let mut snap = snapshot();
        snap.current_is_dir = true;
        let message = delete_prompt_message(&snap).unwrap();
        assert_eq!(
            message,
            "Do you really want to delete the selected directory b.txt?"
        );
    }

    #[test]
    fn test_delete_prompt_lists_at_most_five() {
        let mut snap = snapshot();
        snap.selected_names = names(&["n1", "n2", "n3", "n4", "n5", "n6", "n7"]);
        let message = delete_prompt_message(&snap).unwrap();
        assert!(message.starts_with(
            "Do you really want to delete the selected 7 files/directories?"
        ));
        assert!(message.contains("n5"));
        assert!(!message.contains("n6"));
        assert!(message.ends_with("..."));
    }

    #[test]
    fn test_delete_prompt_none_without_files() {
        let mut snap = snapshot();
        snap.current_name = None;
        assert_eq!(delete_prompt_message(&snap), None);
    }

    #[test]
    fn test_delete_plan_computes_fallback() {
        let mut snap = snapshot();
        snap.selected_names = names(&["b.txt", "c.txt"]);
        let plan = delete_plan(&snap).unwrap();
        assert_eq!(plan.descriptor.from, "/home/docs");
        assert_eq!(plan.descriptor.names, names(&["b.txt", "c.txt"]));
        // Everything after the focus goes, so the fallback is before it
        assert_eq!(plan.next_current, Some("a.txt".to_string()));
    }

    #[test]
    fn test_delete_plan_none_when_idle() {
        let mut snap = snapshot();
        snap.current_name = None;
        assert_eq!(delete_plan(&snap), None);
    }

    #[test]
    fn test_reselect_keeps_survivor() {
        let listing = names(&["a.txt", "b.txt"]);
        let picked = reselect_after_delete(Some("b.txt"), &listing, Some("a.txt"));
        assert_eq!(picked, Some("b.txt".to_string()));
    }

    #[test]
    fn test_reselect_falls_back_when_focus_deleted() {
        let listing = names(&["a.txt"]);
        let picked = reselect_after_delete(Some("b.txt"), &listing, Some("a.txt"));
        assert_eq!(picked, Some("a.txt".to_string()));
    }

    #[test]
    fn test_pack_single_entry_named_after_entry() {
        let snap = snapshot();
        let plan = pack_plan(&snap, PackFormat::Zip).unwrap();
        assert_eq!(plan.reselect, "b.txt.zip");
        assert_eq!(plan.descriptor.to, "/home/docs/b.txt.zip");
        assert_eq!(plan.descriptor.names, names(&["b.txt"]));
    }

    #[test]
    fn test_pack_multiple_entries_named_after_directory() {
        let mut snap = snapshot();
        snap.selected_names = names(&["a.txt", "b.txt"]);
        let plan = pack_plan(&snap, PackFormat::Tar).unwrap();
        assert_eq!(plan.reselect, "docs.tar");
        assert_eq!(plan.descriptor.to, "/home/docs/docs.tar");
    }

    #[test]
    fn test_pack_none_without_files() {
        let mut snap = snapshot();
        snap.current_name = None;
        assert_eq!(pack_plan(&snap, PackFormat::Zip), None);
    }

    #[test]
    fn test_extract_selects_stem() {
        let mut snap = snapshot();
        snap.current_name = Some("archive.zip".to_string());
        let plan = extract_plan(&snap).unwrap();
        assert_eq!(plan.descriptor.from, "/home/docs/archive.zip");
        assert_eq!(plan.descriptor.to, "/home/docs");
        assert_eq!(plan.reselect, "archive");
    }
}
