//! Name derivation helpers for the operation dispatcher

/// Strip the outermost extension: "archive.zip" -> "archive".
/// A leading dot is not an extension, so ".profile" stays as is.
pub fn remove_extension(name: &str) -> &str {
    match name.rfind('.') {
        Some(0) | None => name,
        Some(idx) => &name[..idx],
    }
}

/// Pick the entry to focus after `removed` disappears from `names`.
///
/// Walks forward from `current` to the first survivor, then backward if
/// nothing survives after it. Returns None when the listing empties out
/// or `current` is not listed.
pub fn next_current_name(current: &str, names: &[String], removed: &[String]) -> Option<String> {
    let position = names.iter().position(|name| name == current)?;

    let survives = |name: &String| !removed.iter().any(|r| r == name);

    if let Some(name) = names[position + 1..].iter().find(|n| survives(n)) {
        return Some(name.clone());
    }
    names[..position]
        .iter()
        .rev()
        .find(|n| survives(n))
        .cloned()
}
