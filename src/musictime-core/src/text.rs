/// Case-insensitive substring test over possibly-absent strings.
///
/// Two absent values match; one absent value never matches a present one;
/// two present values compare lowercased.
pub fn contains_case_insensitive(haystack: Option<&str>, needle: Option<&str>) -> bool {
    match (haystack, needle) {
        (None, None) => true,
        (Some(h), Some(n)) => h.to_lowercase().contains(&n.to_lowercase()),
        _ => false,
    }
}
