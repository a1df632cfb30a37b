use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Regex for category slugs
    /// Lowercase alphanumeric segments joined by single hyphens
    /// - Valid: "mens-clothing", "shoes", "size-42"
    /// - Invalid: "-shoes", "shoes-", "mens--clothing", "Shoes", "mens_clothing"
    pub static ref SLUG_REGEX: Regex = Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_regex_valid() {
        assert!(SLUG_REGEX.is_match("mens-clothing"));
        assert!(SLUG_REGEX.is_match("shoes"));
        assert!(SLUG_REGEX.is_match("size-42"));
        assert!(SLUG_REGEX.is_match("a"));
        assert!(SLUG_REGEX.is_match("2024-new-arrivals"));
    }

    #[test]
    fn test_slug_regex_invalid() {
        assert!(!SLUG_REGEX.is_match("-shoes"));
        assert!(!SLUG_REGEX.is_match("shoes-"));
        assert!(!SLUG_REGEX.is_match("mens--clothing"));
        assert!(!SLUG_REGEX.is_match("Shoes"));
        assert!(!SLUG_REGEX.is_match("mens_clothing"));
        assert!(!SLUG_REGEX.is_match(""));
        assert!(!SLUG_REGEX.is_match("mens clothing"));
    }
}
