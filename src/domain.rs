/// Hostname extraction and same-domain checks for Storage Inspector
use url::Url;

/// Extract the hostname of a tab URL
///
/// Returns `None` for URLs without a host (`chrome://newtab` still has one,
/// `file:///` and `about:blank` do not) and for strings that don't parse.
///
/// Examples:
/// - https://www.google.com/search → www.google.com
/// - http://localhost:3000/app → localhost
/// - http://[::1]:8080 → [::1]
pub fn extract_hostname(url: &str) -> Option<String> {
    let parsed = Url::parse(url.trim()).ok()?;
    let host = parsed.host_str()?;

    if host.is_empty() {
        None
    } else {
        Some(host.to_lowercase())
    }
}

/// Whether `domain` may be served by a page whose hostname is `page_host`
///
/// Matches exactly, or by substring containment in either direction.
/// This is permissive: `example.com` also matches `notexample.com`.
pub fn is_same_domain(page_host: &str, domain: &str) -> bool {
    page_host == domain || page_host.contains(domain) || domain.contains(page_host)
}
