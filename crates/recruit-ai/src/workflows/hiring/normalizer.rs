/// Canonical form used when comparing free-form names (skills, majors, universities,
/// companies, enum labels).
pub(crate) fn normalize_name(value: &str) -> String {
    let cleaned = value.replace(['\u{feff}', '\u{200b}'], "");
    let spaced = cleaned.replace(['_', '-'], " ");
    let collapsed = spaced.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.to_lowercase()
}

/// Case-insensitive membership test over normalized names.
pub(crate) fn contains_name<'a, I>(haystack: I, needle: &str) -> bool
where
    I: IntoIterator<Item = &'a String>,
{
    let needle = normalize_name(needle);
    if needle.is_empty() {
        return false;
    }
    haystack
        .into_iter()
        .any(|candidate| normalize_name(candidate) == needle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_name_folds_separators_and_case() {
        let source = "\u{feff}Software_Engineering  -  Backend";
        assert_eq!(normalize_name(source), "software engineering backend");
    }

    #[test]
    fn contains_name_ignores_blank_needles() {
        let names = vec!["Rust".to_string(), "".to_string()];
        assert!(contains_name(&names, " rust "));
        assert!(!contains_name(&names, "   "));
    }
}
