//! Outbound-link redirect unwrapping (`gate.sc`, `exit.sc`)

use url::Url;

pub const REDIRECT_HOSTS: [&str; 2] = ["gate.sc", "exit.sc"];

/// Recover the destination of a platform redirect link.
///
/// Anything that is not a well-formed redirect link comes back unchanged.
pub fn resolve(href: &str) -> String {
    let Ok(parsed) = Url::parse(href) else {
        return href.to_string();
    };

    if !parsed.host_str().is_some_and(is_redirect_host) {
        return href.to_string();
    }

    // query_pairs percent-decodes the value
    parsed
        .query_pairs()
        .find(|(k, _)| k == "url")
        .map(|(_, v)| v.into_owned())
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| href.to_string())
}

/// `gate.sc`, `exit.sc` or one of their subdomains
pub fn is_redirect_host(host: &str) -> bool {
    let host = host.to_ascii_lowercase();
    REDIRECT_HOSTS
        .iter()
        .any(|r| host == *r || host.ends_with(&format!(".{}", r)))
}
