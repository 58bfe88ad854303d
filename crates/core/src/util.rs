// Small helpers shared by tests and callers

/// Elements not present in `source`, in the order they appear in `elements`
///
/// Duplicates in `elements` are kept. Works for anything comparable,
/// byte vectors included.
pub fn not_in<T: PartialEq + Clone>(source: &[T], elements: &[T]) -> Vec<T> {
    elements
        .iter()
        .filter(|element| !source.contains(element))
        .cloned()
        .collect()
}
