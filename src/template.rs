//! Template substitution for fragment content
//!
//! Fragments may carry `{{key}}` placeholders that get filled from a string
//! map at swap time. No page ships placeholders today, so the router calls
//! this with an empty map, but the swap path keeps the hook so fragments can
//! start injecting values without touching any other code.

use regex::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;

/// Matches `{{key}}` with optional whitespace inside the braces
fn placeholder_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{\{\s*(\w+)\s*\}\}").expect("placeholder pattern is valid"))
}

/// Replace every `{{key}}` in `template` with the mapped value.
///
/// Keys absent from `data` render as the empty string rather than leaving
/// the placeholder behind.
pub fn render(template: &str, data: &HashMap<String, String>) -> String {
    placeholder_re()
        .replace_all(template, |caps: &regex::Captures| {
            data.get(&caps[1]).cloned().unwrap_or_default()
        })
        .into_owned()
}
