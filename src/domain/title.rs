use std::sync::LazyLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

const MAX_TITLE_CHARS: usize = 50;

static UNSAFE_CHARS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^A-Za-z0-9 \-]").unwrap());

/// Reduce a source-provided title to a filesystem-and-display-safe form:
/// NFKC-normalize, cap length, strip everything outside the safe
/// alphanumeric/space/hyphen set, then collapse whitespace runs.
pub fn sanitize_title(raw: &str) -> String {
    let normalized: String = raw.nfkc().collect();
    let capped: String = normalized.chars().take(MAX_TITLE_CHARS).collect();
    let stripped = UNSAFE_CHARS.replace_all(&capped, "");

    let mut result = String::with_capacity(stripped.len());
    let mut prev_was_space = false;

    for ch in stripped.chars() {
        if ch == ' ' {
            if !prev_was_space && !result.is_empty() {
                result.push(' ');
                prev_was_space = true;
            }
        } else {
            result.push(ch);
            prev_was_space = false;
        }
    }

    result.trim_end().to_string()
}
