/// Canonical, order-independent representation of two participant
/// identifiers. A conversation between A and B is the same record regardless
/// of who opened the chat, because both orderings normalize to the same pair.
///
/// Pure function: lexicographic comparison over the opaque identifier
/// strings, `first <= second` in the result.
pub fn normalize_pair<'a>(a: &'a str, b: &'a str) -> (&'a str, &'a str) {
    if a <= b { (a, b) } else { (b, a) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symmetric() {
        let pairs = [
            ("user-1", "user-2"),
            ("zz", "aa"),
            ("same", "same"),
            ("", "x"),
        ];
        for (a, b) in pairs {
            assert_eq!(normalize_pair(a, b), normalize_pair(b, a));
        }
    }

    #[test]
    fn ordered() {
        let (first, second) = normalize_pair("user-9", "user-10");
        assert!(first <= second);
        // string order, not numeric
        assert_eq!((first, second), ("user-10", "user-9"));
    }
}
