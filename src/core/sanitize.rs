// src/core/sanitize.rs

/// Collapse runs of whitespace to one space and trim the ends.
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

/// Heading key used for case-insensitive section matching.
/// "  Ports   and Links " → "ports and links"
pub fn fold_heading(s: &str) -> String {
    normalize_ws(s).to_lowercase()
}

/// Make a search term safe to embed in a debug file name.
/// ASCII alphanumerics, '-' and '_' survive; everything else becomes '_'.
pub fn sanitize_term_filename(term: &str) -> String {
    let out: String = term
        .trim()
        .chars()
        .map(|ch| if ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' { ch } else { '_' })
        .collect();
    if out.is_empty() { "term".to_string() } else { out }
}
