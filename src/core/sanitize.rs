// src/core/sanitize.rs

/// Collapse runs of whitespace to a single space and trim.
pub fn normalize_ws(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !prev_space { out.push(' '); prev_space = true; }
        } else { out.push(ch); prev_space = false; }
    }
    out.trim().to_string()
}

/// Display name → stable company key.
///
/// Lowercase, every char outside `[a-z0-9]` becomes `-`, runs of `-` collapse
/// to one, and leading/trailing `-` are stripped. Total and deterministic.
///
/// Returns an empty string for names with no ASCII alphanumerics; callers must
/// treat that as "no key" rather than insert it.
pub fn slugify(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut last_dash = true; // suppresses a leading dash
    for ch in name.chars().flat_map(char::to_lowercase) {
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            out.push(ch);
            last_dash = false;
        } else if !last_dash {
            out.push('-');
            last_dash = true;
        }
    }
    if out.ends_with('-') { out.pop(); }
    out
}

/// `"sun-finance"` → `"Sun Finance"`. Used when a listing link carries no usable name.
pub fn title_from_slug(slug: &str) -> String {
    slug.split(['-', '_'])
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut cs = w.chars();
            match cs.next() {
                Some(first) => first.to_uppercase().chain(cs).collect::<String>(),
                None => s!(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
