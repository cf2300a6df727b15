use sha2::{Digest, Sha256};

/// Length of every fingerprint, in hex characters.
pub const FINGERPRINT_LEN: usize = 64;

/// Reduces a URL to the part that identifies the story: scheme removed,
/// query string dropped.
pub fn canonical_path(url: &str) -> &str {
    let url = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(url);
    url.split('?').next().unwrap_or_default()
}

/// Stable grouping key for re-publications of the same URL path.
pub fn fingerprint(url: &str) -> String {
    let digest = Sha256::digest(canonical_path(url).as_bytes());
    format!("{:x}", digest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scheme_and_query_insensitive() {
        assert_eq!(
            fingerprint("https://x.com/a?utm=1"),
            fingerprint("http://x.com/a?utm=2")
        );
        assert_eq!(fingerprint("x.com/a"), fingerprint("https://x.com/a"));
    }

    #[test]
    fn test_different_paths_differ() {
        assert_ne!(fingerprint("https://x.com/a"), fingerprint("https://x.com/b"));
        assert_ne!(fingerprint("https://x.com/a"), fingerprint("https://y.com/a"));
    }

    #[test]
    fn test_fixed_length_and_deterministic() {
        for url in ["", "?", "https://", "http://a.com/story?x=1", "ftp://odd/path"] {
            let fp = fingerprint(url);
            assert_eq!(fp.len(), FINGERPRINT_LEN);
            assert_eq!(fp, fingerprint(url));
        }
        assert_eq!(fingerprint(""), fingerprint("https://?q=1"));
    }

    #[test]
    fn test_canonical_path() {
        assert_eq!(canonical_path("https://a.com/story?x=1&y=2"), "a.com/story");
        assert_eq!(canonical_path("a.com/story"), "a.com/story");
        assert_eq!(canonical_path(""), "");
    }
}
