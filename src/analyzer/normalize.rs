//! Vocabulary normalizer: raw tag string -> canonical form, or
//! rejection.
//!
//! The pipeline is fixed and idempotent: normalizing an already
//! canonical tag returns it unchanged. Steps, in order:
//!
//! 1. trim a leading `#` marker, lowercase
//! 2. full-string lookup in the special-replacement table
//! 3. runs of whitespace / hyphen / period become one underscore
//! 4. every character outside `[a-z0-9_]` is stripped
//! 5. repeated underscores collapse, leading/trailing underscores trim
//! 6. reject when shorter than 3, purely numeric, or in the stop-set
//!
//! Author tags (trailing underscore) are a reserved subtype: they are
//! recognized on the raw string *before* this pipeline, because step 5
//! would strip the trailing underscore that marks them.

use crate::analyzer::config::AnalyzerConfig;

/// Minimum canonical tag length.
const MIN_TAG_LEN: usize = 3;

/// Normalize a raw tag string to canonical form.
///
/// Returns `None` when the tag is rejected (too short, purely
/// numeric, or a stop-set member). The result, when present, always
/// satisfies [`is_canonical_form`] except for a possible leading
/// digit, which the index builder screens separately.
pub fn normalize(raw: &str, config: &AnalyzerConfig) -> Option<String> {
    let trimmed = raw.trim();
    let trimmed = trimmed.strip_prefix('#').unwrap_or(trimmed);
    let lowered = trimmed.to_lowercase();

    let replaced = match config.special_replacements.get(lowered.as_str()) {
        Some(standard) => standard.clone(),
        None => lowered,
    };

    let mut out = String::with_capacity(replaced.len());
    let mut pending_separator = false;
    for ch in replaced.chars() {
        match ch {
            c if c.is_whitespace() || c == '-' || c == '.' || c == '_' => {
                pending_separator = true;
            }
            c @ ('a'..='z' | '0'..='9') => {
                if pending_separator && !out.is_empty() {
                    out.push('_');
                }
                pending_separator = false;
                out.push(c);
            }
            // anything else is stripped without acting as a separator
            _ => {}
        }
    }

    if out.chars().count() < MIN_TAG_LEN {
        return None;
    }
    if out.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    if config.stop_tags.contains(out.as_str()) {
        return None;
    }
    Some(out)
}

/// Whether a string already satisfies the canonical tag invariant:
/// `[a-z][a-z0-9_]{2,}`, i.e. lowercase, first char alphabetic,
/// length at least 3, only `[a-z0-9_]` throughout.
pub fn is_canonical_form(tag: &str) -> bool {
    let mut chars = tag.chars();
    matches!(chars.next(), Some('a'..='z'))
        && tag.len() >= MIN_TAG_LEN
        && chars.all(|c| matches!(c, 'a'..='z' | '0'..='9' | '_'))
}

/// Whether a raw tag is the reserved author subtype (trailing
/// underscore). Checked before normalization.
pub fn is_author_tag(raw: &str) -> bool {
    let trimmed = raw.trim().trim_start_matches('#');
    trimmed.len() > 1 && trimmed.ends_with('_')
}

/// Canonical form for an author tag: lowercased, marker preserved.
pub fn author_tag_form(raw: &str) -> String {
    raw.trim().trim_start_matches('#').to_lowercase()
}
