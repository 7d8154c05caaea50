//! XML element-name checks.
//!
//! Element names produced by the engine come from record field names,
//! encoded mapping keys, and type names. Each one is checked against the
//! namespace-aware `NCName` production (an XML 1.0 `Name` without colons)
//! before an element is created, so the rendered document always parses.
//!
//! See <https://www.w3.org/TR/xml-names/#NT-NCName>

/// Returns `true` if `c` is a valid `NameStartChar` per XML 1.0 §2.3 `[4]`.
pub(crate) fn is_name_start_char(c: char) -> bool {
    matches!(c,
        ':' | 'A'..='Z' | '_' | 'a'..='z' |
        '\u{C0}'..='\u{D6}' | '\u{D8}'..='\u{F6}' | '\u{F8}'..='\u{2FF}' |
        '\u{370}'..='\u{37D}' | '\u{37F}'..='\u{1FFF}' |
        '\u{200C}'..='\u{200D}' | '\u{2070}'..='\u{218F}' |
        '\u{2C00}'..='\u{2FEF}' | '\u{3001}'..='\u{D7FF}' |
        '\u{F900}'..='\u{FDCF}' | '\u{FDF0}'..='\u{FFFD}' |
        '\u{10000}'..='\u{EFFFF}'
    )
}

/// Returns `true` if `c` is a valid `NameChar` per XML 1.0 §2.3 `[4a]`.
pub(crate) fn is_name_char(c: char) -> bool {
    is_name_start_char(c)
        || matches!(c,
            '-' | '.' | '0'..='9' | '\u{B7}' |
            '\u{300}'..='\u{36F}' | '\u{203F}'..='\u{2040}'
        )
}

/// Returns `true` if `name` can be used as an element name.
///
/// # Examples
///
/// ```
/// use objxml::util::name::is_valid_element_name;
///
/// assert!(is_valid_element_name("key_1_-INT32"));
/// assert!(!is_valid_element_name("1st"));
/// assert!(!is_valid_element_name("ns:tag"));
/// ```
#[must_use]
pub fn is_valid_element_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first != ':' && is_name_start_char(first) => {}
        _ => return false,
    }
    chars.all(|c| c != ':' && is_name_char(c))
}
