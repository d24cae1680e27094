use regex::Regex;

fn remote_reference_pattern() -> &'static Regex {
    use std::sync::OnceLock;

    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?i)^https?://").expect("invalid http(s) regex"))
}

/// Determine whether an image location points at a remote resource.
///
/// Remote images are never fetched; references to them are left exactly as written.
pub fn is_remote_reference(value: &str) -> bool {
    remote_reference_pattern().is_match(value)
}

#[cfg(test)]
mod tests {
    use super::is_remote_reference;

    #[test]
    fn detects_http_urls_in_any_case() {
        assert!(is_remote_reference("https://example.com/a.png"));
        assert!(is_remote_reference("HTTP://example.com/a.png"));
        assert!(is_remote_reference("Https://example.com"));
    }

    #[test]
    fn keeps_local_and_other_schemes() {
        assert!(!is_remote_reference("images/photo.png"));
        assert!(!is_remote_reference("./http/photo.png"));
        assert!(!is_remote_reference("ftp://example.com/a.png"));
        assert!(!is_remote_reference(" https://example.com"));
    }
}
