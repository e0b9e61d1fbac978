use url::Url;

use crate::request::strip_port;

/// Parse `target` and keep it only if it is a safe post-login redirect
///
/// Only absolute `http`/`https` URLs whose host is the root domain or one of
/// its subdomains are accepted. Ports are ignored on both sides. The returned
/// URL is the normalized, percent-encoded form and is what gets sent as
/// `Location`, never the raw input.
pub fn validate_redirect_target(target: &str, root_domain: &str) -> Option<Url> {
    let url = Url::parse(target).ok()?;
    if !matches!(url.scheme(), "http" | "https") {
        return None;
    }

    let host = url.host_str()?.trim_end_matches('.').to_ascii_lowercase();
    let root = strip_port(root_domain);
    if root.is_empty() {
        return None;
    }

    let allowed = host == root
        || host
            .strip_suffix(root.as_str())
            .is_some_and(|prefix| prefix.ends_with('.') && prefix.len() > 1);
    allowed.then_some(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn accepted(target: &str, root_domain: &str) -> bool {
        validate_redirect_target(target, root_domain).is_some()
    }

    #[test]
    fn test_accepts_root_and_subdomains() {
        assert!(accepted("https://example.com/", "example.com"));
        assert!(accepted("https://wallet.example.com/tx?id=1", "example.com"));
        assert!(accepted("http://skills.localhost:3000/a", "localhost:3000"));
        assert!(accepted("https://EXAMPLE.com:8443", "example.com"));
    }

    #[test]
    fn test_rejects_lookalikes() {
        assert!(!accepted("https://evilexample.com/", "example.com"));
        assert!(!accepted("https://example.com.attacker.net/", "example.com"));
        assert!(!accepted("https://attacker.net/?next=example.com", "example.com"));
    }

    #[test]
    fn test_rejects_non_http_and_garbage() {
        assert!(!accepted("javascript:alert(1)//example.com", "example.com"));
        assert!(!accepted("ftp://example.com/file", "example.com"));
        assert!(!accepted("/relative/path", "example.com"));
        assert!(!accepted("not a url", "example.com"));
        assert!(!accepted("", "example.com"));
    }

    #[test]
    fn test_returns_normalized_url() {
        // control characters are dropped by the parser
        let url = validate_redirect_target("https://myaccount.example.com/\nx", "example.com");
        assert_eq!(url.as_ref().map(Url::as_str), Some("https://myaccount.example.com/x"));

        let url = validate_redirect_target("https://myaccount.example.com/\u{e9}", "example.com");
        assert_eq!(url.as_ref().map(Url::as_str), Some("https://myaccount.example.com/%C3%A9"));
    }
}
