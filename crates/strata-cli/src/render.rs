//! Presentation-layer rendering of decoded trees.
//!
//! Stored tree payloads keep producer order; ordering and mode
//! canonicalization happen only here, as pure functions over the decoded
//! entry sequence.

use strata_store::TreeEntry;

/// Entries sorted for display: case-insensitive over trimmed names.
pub fn sort_for_display(entries: &[TreeEntry]) -> Vec<&TreeEntry> {
    let mut sorted: Vec<&TreeEntry> = entries.iter().collect();
    sorted.sort_by_key(|e| e.name.trim().to_lowercase());
    sorted
}

/// One display line: `<mode> <type> <hex-digest>\t<name>`.
///
/// Directory mode renders canonicalized (`040000`), type as `tree`/`blob`.
pub fn render_entry(entry: &TreeEntry) -> String {
    format!(
        "{} {} {}\t{}",
        entry.mode.display_str(),
        entry.mode.object_kind(),
        entry.object_id,
        entry.name
    )
}

/// Render a full listing, sorted for display.
pub fn render_tree(entries: &[TreeEntry], name_only: bool) -> String {
    sort_for_display(entries)
        .into_iter()
        .map(|e| {
            if name_only {
                e.name.clone()
            } else {
                render_entry(e)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
