//! Element names for index-addressed children.

/// Returns the tag of the element at `index` inside `parent_tag`.
///
/// Used for the members of lists, tuples, numeric arrays, and sets. The name
/// only distinguishes siblings; it is not globally unique.
///
/// # Examples
///
/// ```
/// use objxml::child_tag;
///
/// assert_eq!(child_tag("points", 0), "points_e0");
/// assert_eq!(child_tag("points_e0", 12), "points_e0_e12");
/// ```
#[must_use]
pub fn child_tag(parent_tag: &str, index: usize) -> String {
    format!("{parent_tag}_e{index}")
}
