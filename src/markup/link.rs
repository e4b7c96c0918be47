//! Explicit `[url=...]` links and link host resolution.

use regex::Captures;
use url::Url;

use super::RenderOptions;

/// Wrap `text` in the anchor used for every rendered link.
///
/// The href is left empty on purpose; the page hosting the fragment
/// handles navigation.
pub fn anchor(text: &str) -> String {
    format!(r#"<a class="steam__link" href="" target="_blank" rel="noopener">{text}</a>"#)
}

/// Resolve the host shown next to an explicit link.
///
/// Tries a strict parse, then a parse with `http://` prefixed, and finally
/// falls back to the raw destination.
pub fn resolve_host(destination: &str) -> String {
    parsed_host(destination)
        .or_else(|| parsed_host(&format!("http://{destination}")))
        .unwrap_or_else(|| destination.to_owned())
}

/// Whether a host lies outside the platform domain.
pub fn is_external(host: &str, platform_domain: &str) -> bool {
    !host.contains(platform_domain)
}

fn parsed_host(candidate: &str) -> Option<String> {
    let url = Url::parse(candidate).ok()?;
    url.host_str()
        .filter(|host| !host.is_empty())
        .map(str::to_owned)
}

pub(super) fn render_link(caps: &Captures<'_>, options: &RenderOptions) -> String {
    let mut out = anchor(&caps[2]);
    let host = resolve_host(&caps[1]);
    if is_external(&host, &options.platform_domain) {
        out.push_str(&format!(r#" <span class="steam__link-host">[{host}]</span>"#));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_host_from_full_url() {
        assert_eq!(resolve_host("https://example.com/some/path?q=1"), "example.com");
    }

    #[test]
    fn test_resolve_host_without_scheme_retries_with_http() {
        assert_eq!(resolve_host("store.steampowered.com/app/10"), "store.steampowered.com");
    }

    #[test]
    fn test_resolve_host_ignores_scheme_only_parse() {
        // "localhost" parses as a scheme with no host on the first attempt.
        assert_eq!(resolve_host("localhost:8080"), "localhost");
    }

    #[test]
    fn test_resolve_host_falls_back_to_raw_destination() {
        assert_eq!(resolve_host("a:b:c"), "a:b:c");
    }

    #[test]
    fn test_resolve_host_lowercases_parsed_host() {
        assert_eq!(resolve_host("http://Example.COM"), "example.com");
    }

    #[test]
    fn test_is_external_uses_substring_match() {
        assert!(is_external("example.com", "steam"));
        assert!(!is_external("steamcommunity.com", "steam"));
        assert!(!is_external("store.steampowered.com", "steam"));
    }
}
