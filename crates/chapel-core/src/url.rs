//! URL inspection helpers.
//!
//! Only the pieces the router needs: scheme check, path extraction and
//! the extension of the last path segment. Absolute URLs are expected,
//! as delivered by fetch events.

/// Check whether the URL uses the http or https scheme.
pub fn is_http(url: &str) -> bool {
    matches!(scheme(url).as_deref(), Some("http") | Some("https"))
}

/// Lowercased scheme, if the URL has one.
pub fn scheme(url: &str) -> Option<String> {
    let (scheme, _) = url.trim().split_once(':')?;

    let mut chars = scheme.chars();
    let first = chars.next()?;
    if !first.is_ascii_alphabetic() {
        return None;
    }
    if !chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.')) {
        return None;
    }

    Some(scheme.to_ascii_lowercase())
}

/// Extract the path of a URL, without query or fragment.
///
/// An absolute URL with no path yields `/`. Root-relative input
/// (`/index.html`) is accepted as-is.
pub fn path(url: &str) -> &str {
    let url = url.trim();

    let after_authority = match url.find("://") {
        Some(idx) => {
            let rest = &url[idx + 3..];
            match rest.find(['/', '?', '#']) {
                Some(end) => &rest[end..],
                None => "",
            }
        }
        None => url,
    };

    let end = after_authority
        .find(['?', '#'])
        .unwrap_or(after_authority.len());
    let path = &after_authority[..end];

    if path.is_empty() { "/" } else { path }
}

/// Origin (`scheme://host[:port]`) of an absolute URL.
pub fn origin(url: &str) -> Option<&str> {
    let url = url.trim();
    let idx = url.find("://")?;
    let rest = &url[idx + 3..];
    let host_len = rest.find(['/', '?', '#']).unwrap_or(rest.len());
    if host_len == 0 {
        return None;
    }
    Some(&url[..idx + 3 + host_len])
}

/// Extension of the last path segment, lowercased, without the dot.
///
/// `/main.abc123.js` yields `js`; `/events` and `/` yield `None`.
pub fn extension(path: &str) -> Option<String> {
    let segment = path.rsplit('/').next()?;
    let (_, ext) = segment.rsplit_once('.')?;
    if ext.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

/// Strip the fragment; caches ignore it when matching.
pub fn without_fragment(url: &str) -> &str {
    match url.find('#') {
        Some(idx) => &url[..idx],
        None => url,
    }
}
