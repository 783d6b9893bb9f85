//! Small pure utilities shared across the scraper:
//! - Domain identifier derivation for output file naming
//! - JavaScript string literal escaping for selector embedding

/// Derive the filesystem-safe domain identifier for a site URL.
///
/// The host component keeps its original casing; the `www.` prefix is
/// stripped and `:` (port separator) becomes `_`. Used verbatim as the
/// output file's base name.
pub fn derive_domain(site_url: &str) -> String {
    let without_scheme = site_url
        .strip_prefix("https://")
        .or_else(|| site_url.strip_prefix("http://"))
        .unwrap_or(site_url);

    let host = without_scheme.split('/').next().unwrap_or(without_scheme);
    let host = host.strip_prefix("www.").unwrap_or(host);

    if !host.is_empty() {
        return host.replace(':', "_");
    }

    // Fallback when the URL has no recognizable host component
    without_scheme
        .strip_prefix("www.")
        .unwrap_or(without_scheme)
        .replace('/', "_")
        .replace(':', "_")
}

/// Render a string as a double-quoted JavaScript string literal.
///
/// Selector patterns contain single quotes, so they cannot be spliced into
/// single-quoted JS strings; escaping into a double-quoted literal keeps any
/// pattern valid inside an evaluated snippet.
pub fn js_string_literal(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}
