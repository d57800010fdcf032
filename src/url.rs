//! URL normalization for spoken site names
//!
//! Speech gives us "github", "docs.rs/regex" or "https://example.com"; the
//! executor wants a well-formed URL. Bare names of a handful of common sites
//! resolve to their canonical address.

/// Well-known sites, keyed by bare lowercase host
const SITE_ALIASES: &[(&str, &str)] = &[
    ("google", "https://www.google.com"),
    ("youtube", "https://www.youtube.com"),
    ("facebook", "https://www.facebook.com"),
    ("twitter", "https://www.twitter.com"),
    ("github", "https://www.github.com"),
    ("gmail", "https://mail.google.com"),
];

const DEFAULT_SCHEME: &str = "https://";

/// Look up the canonical URL for a bare host name
pub fn site_alias(host: &str) -> Option<&'static str> {
    SITE_ALIASES
        .iter()
        .find(|(name, _)| *name == host)
        .map(|(_, url)| *url)
}

/// Turn a spoken fragment into a scheme-qualified URL
///
/// An alias match replaces the whole URL, so any path spoken after a known
/// site name ("youtube/feed") is dropped.
pub fn normalize_url(fragment: &str) -> String {
    let fragment = fragment.trim();

    let url = if strip_scheme(fragment).is_some() {
        fragment.to_string()
    } else {
        format!("{}{}", DEFAULT_SCHEME, fragment)
    };

    match site_alias(&bare_host(&url)) {
        Some(canonical) => canonical.to_string(),
        None => url,
    }
}

/// Host of a URL without scheme or leading `www.`, after scheme defaulting
pub fn extract_domain(url: &str) -> String {
    let url = url.trim();
    let rest = strip_scheme(url).unwrap_or(url);
    let host = rest
        .split(['/', '?', '#'])
        .next()
        .unwrap_or_default()
        .to_lowercase();
    match host.strip_prefix("www.") {
        Some(bare) => bare.to_string(),
        None => host,
    }
}

fn bare_host(url: &str) -> String {
    let rest = strip_scheme(url).unwrap_or(url);
    let rest = strip_prefix_ignore_case(rest, "www.").unwrap_or(rest);
    rest.split('/').next().unwrap_or_default().to_lowercase()
}

fn strip_scheme(url: &str) -> Option<&str> {
    strip_prefix_ignore_case(url, "https://").or_else(|| strip_prefix_ignore_case(url, "http://"))
}

fn strip_prefix_ignore_case<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    let head = s.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix).then(|| &s[prefix.len()..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prepends_https() {
        assert_eq!(normalize_url("example.com"), "https://example.com");
        assert_eq!(normalize_url("  docs.rs/regex "), "https://docs.rs/regex");
    }

    #[test]
    fn test_keeps_existing_scheme() {
        assert_eq!(normalize_url("http://example.com"), "http://example.com");
        assert_eq!(normalize_url("HTTPS://Example.com/a"), "HTTPS://Example.com/a");
    }

    #[test]
    fn test_alias_resolution() {
        assert_eq!(normalize_url("youtube"), "https://www.youtube.com");
        assert_eq!(normalize_url("gmail"), "https://mail.google.com");
        assert_eq!(normalize_url("www.github"), "https://www.github.com");
        assert_eq!(normalize_url("http://GitHub"), "https://www.github.com");
    }

    #[test]
    fn test_alias_overrides_path() {
        assert_eq!(normalize_url("youtube/feed/trending"), "https://www.youtube.com");
    }

    #[test]
    fn test_alias_requires_exact_host() {
        assert_eq!(normalize_url("youtube.com"), "https://youtube.com");
        assert_eq!(normalize_url("google maps"), "https://google maps");
    }

    #[test]
    fn test_fixed_point() {
        for input in ["example.com", "http://a.b/c", "rust lang", "www.rust-lang.org/learn"] {
            let once = normalize_url(input);
            assert_eq!(normalize_url(&once), once, "not a fixed point for {:?}", input);
        }
    }

    #[test]
    fn test_extract_domain() {
        assert_eq!(extract_domain("https://www.Example.com/path?q=1"), "example.com");
        assert_eq!(extract_domain("docs.rs/regex"), "docs.rs");
    }

    #[test]
    fn test_site_alias_lookup() {
        assert_eq!(site_alias("twitter"), Some("https://www.twitter.com"));
        assert_eq!(site_alias("Twitter"), None);
    }
}
