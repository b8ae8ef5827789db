//! Card editor helpers: turning free-text form input into card fields.

/// Splits comma-separated tag input: entries are trimmed, empties dropped,
/// order preserved. Duplicates are deliberately kept.
pub fn parse_tags(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tags_trims_and_drops_empties() {
        assert_eq!(
            parse_tags(" http , security,,  ,web "),
            vec!["http", "security", "web"]
        );
    }

    #[test]
    fn test_parse_tags_keeps_order_and_duplicates() {
        assert_eq!(parse_tags("b,a,b"), vec!["b", "a", "b"]);
    }

    #[test]
    fn test_parse_tags_empty_input() {
        assert!(parse_tags("").is_empty());
        assert!(parse_tags(" , ,").is_empty());
    }
}
