//! Client-side style filtering over an owner's note list.

use super::Note;

/// Keep the notes whose title or content contains `term`, ignoring case.
///
/// A missing or blank term returns every note in the original order.
///
/// # Examples
/// ```
/// use notes_backend::domain::search::filter_notes;
///
/// assert!(filter_notes(Vec::new(), Some("x")).is_empty());
/// ```
pub fn filter_notes(notes: Vec<Note>, term: Option<&str>) -> Vec<Note> {
    let Some(needle) = term.map(str::trim).filter(|t| !t.is_empty()) else {
        return notes;
    };
    let needle = needle.to_lowercase();
    notes.into_iter().filter(|note| note.matches(&needle)).collect()
}
