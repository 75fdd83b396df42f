//! Tag syntax extraction: raw tag strings out of note text.
//!
//! Notes mix several tag syntaxes that accumulated over the life of a
//! collection: a front-matter `tags:` list, inline `#hashtag`
//! markers, and markdown headings that merely look like hashtags.
//! This module fixes the precedence rules in one place instead of
//! re-deriving regexes per call:
//!
//! 1. A front-matter block (`---` fence starting at offset 0) is
//!    scanned for a `tags:` list; its entries come first.
//! 2. The remaining text is scanned for inline hashtags. A `#` at
//!    line start followed by whitespace is a markdown heading, not a
//!    tag; a `#` must also not be glued to preceding word characters
//!    (URL fragments).
//!
//! Output preserves source order; the first occurrence of a duplicate
//! wins. Strings are returned raw — normalization is a separate step.

use std::sync::OnceLock;

use indexmap::IndexSet;
use regex::Regex;

fn list_item_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?m)^\s*-\s*(.+?)\s*$").expect("literal pattern"))
}

fn hashtag_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"#([A-Za-z0-9_][A-Za-z0-9_-]*)").expect("literal pattern"))
}

/// Extract raw tag strings from note text, front-matter entries
/// first, then inline hashtags, deduplicated in source order.
pub fn extract_raw_tags(text: &str) -> Vec<String> {
    let mut tags: IndexSet<String> = IndexSet::new();

    let body_start = match front_matter(text) {
        Some((front, rest_offset)) => {
            for tag in front_matter_tags(front) {
                tags.insert(tag);
            }
            rest_offset
        }
        None => 0,
    };

    for tag in inline_hashtags(&text[body_start..]) {
        tags.insert(tag);
    }

    tags.into_iter().collect()
}

/// Split off a leading front-matter block. Returns the block content
/// and the byte offset where the remaining document starts.
fn front_matter(text: &str) -> Option<(&str, usize)> {
    let after_open = text.strip_prefix("---")?;
    let close = after_open.find("\n---")?;
    let block = &after_open[..close];
    // skip past "---\n---" plus the rest of the closing fence line
    let mut rest = 3 + close + 4;
    if let Some(newline) = text[rest.min(text.len())..].find('\n') {
        rest += newline + 1;
    } else {
        rest = text.len();
    }
    Some((block, rest.min(text.len())))
}

/// Entries of a `tags:` list inside a front-matter block.
fn front_matter_tags(front: &str) -> Vec<String> {
    let Some(tags_at) = front.find("tags:") else {
        return Vec::new();
    };
    let section = &front[tags_at + "tags:".len()..];
    let mut found = Vec::new();
    for line in section.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if let Some(capture) = list_item_pattern().captures(line) {
            let entry = capture[1].trim_matches(|c| c == '"' || c == '\'').trim();
            if !entry.is_empty() {
                found.push(entry.to_string());
            }
        } else {
            // first non-list line ends the tags section
            break;
        }
    }
    found
}

/// Inline hashtag occurrences, headings and glued fragments excluded.
fn inline_hashtags(text: &str) -> Vec<String> {
    let mut found = Vec::new();
    for capture in hashtag_pattern().captures_iter(text) {
        let whole = capture.get(0).expect("group 0 always present");
        let start = whole.start();
        // reject when glued to a preceding word character or '#'
        // (URL fragments, "##" heading runs)
        if let Some(prev) = text[..start].chars().next_back() {
            if prev.is_alphanumeric() || prev == '#' || prev == '/' {
                continue;
            }
        }
        found.push(capture[1].to_string());
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn front_matter_tags_come_first() {
        let text = "---\ntitle: Note\ntags:\n  - online_learning\n  - pedagogy\n---\n\nBody #chatgpt here.\n";
        assert_eq!(
            extract_raw_tags(text),
            vec!["online_learning", "pedagogy", "chatgpt"]
        );
    }

    #[test]
    fn headings_are_not_tags() {
        let text = "# Title\n\n## Abstract\n\nSome text #assessment and #feedback.\n";
        assert_eq!(extract_raw_tags(text), vec!["assessment", "feedback"]);
    }

    #[test]
    fn hashtag_at_line_start_without_space_is_a_tag() {
        let text = "#pedagogy\n# Heading\ntext\n";
        assert_eq!(extract_raw_tags(text), vec!["pedagogy"]);
    }

    #[test]
    fn url_fragments_are_ignored() {
        let text = "See https://example.org/page#section and #real_tag.\n";
        assert_eq!(extract_raw_tags(text), vec!["real_tag"]);
    }

    #[test]
    fn duplicates_keep_first_occurrence() {
        let text = "#ai something #pedagogy then #ai again\n";
        assert_eq!(extract_raw_tags(text), vec!["ai", "pedagogy"]);
    }

    #[test]
    fn quoted_front_matter_entries_are_unquoted() {
        let text = "---\ntags:\n  - \"higher education\"\n  - 'k-12'\n---\n";
        assert_eq!(extract_raw_tags(text), vec!["higher education", "k-12"]);
    }

    #[test]
    fn tags_section_ends_at_next_yaml_key() {
        let text = "---\ntags:\n  - pedagogy\nauthor: someone\n---\n#inline\n";
        assert_eq!(extract_raw_tags(text), vec!["pedagogy", "inline"]);
    }

    #[test]
    fn no_front_matter_means_inline_only() {
        let text = "Plain note with #one_tag only.\n";
        assert_eq!(extract_raw_tags(text), vec!["one_tag"]);
    }
}
