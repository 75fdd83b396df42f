//! Semantic duplicate detection: three independent grouping methods
//! layered on the index, plus curated rename suggestions.
//!
//! Each method labels its own groups and a tag may surface under more
//! than one method — the point is to give a reviewer overlapping
//! evidence, not a partition. Nothing here merges anything.

use indexmap::IndexMap;
use serde::Serialize;

use crate::analyzer::config::AnalyzerConfig;
use crate::analyzer::index::TagIndex;

/// Minimum members for stem and synonym evidence.
const MIN_GROUP: usize = 2;
/// Pattern evidence (shared prefix/suffix) is weaker; require more.
const MIN_PATTERN_GROUP: usize = 3;
/// Pattern grouping only considers tags longer than this.
const PATTERN_MIN_TAG_LEN: usize = 8;
/// Length of the shared prefix/suffix.
const PATTERN_LEN: usize = 6;

/// How a duplicate group was detected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "method", content = "key", rename_all = "snake_case")]
pub enum DetectionMethod {
    /// Tags sharing their longest separator-split component.
    Stem(String),
    /// Tags containing a curated concept or one of its variants.
    Synonym(String),
    /// Tags sharing a 6-character prefix.
    Prefix(String),
    /// Tags sharing a 6-character suffix.
    Suffix(String),
}

/// A reviewable group of likely-duplicate tags.
#[derive(Debug, Clone, Serialize)]
pub struct DuplicateGroup {
    pub method: DetectionMethod,
    pub tags: Vec<String>,
    pub total_uses: usize,
}

/// A curated-table rename proposal. Advisory: the merge itself is a
/// human decision applied outside this engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenameSuggestion {
    pub current: String,
    pub suggested: String,
    /// Whether the preferred tag already exists in the vocabulary
    /// (merge) or would be created by the rename.
    pub target_exists: bool,
    pub current_uses: usize,
    pub suggested_uses: usize,
}

/// Run all three grouping methods over the subject vocabulary.
pub fn find_duplicate_groups(index: &TagIndex, config: &AnalyzerConfig) -> Vec<DuplicateGroup> {
    let mut groups = Vec::new();
    groups.extend(stem_groups(index));
    groups.extend(synonym_groups(index, config));
    groups.extend(pattern_groups(index));
    groups
}

/// Naive stem: the longest `_`-separated component (first wins on
/// ties). Tags sharing a stem are grouped.
fn stem_groups(index: &TagIndex) -> Vec<DuplicateGroup> {
    let mut by_stem: IndexMap<&str, Vec<&str>> = IndexMap::new();
    for tag in index.vocabulary() {
        let mut stem = "";
        for component in tag.split('_') {
            if component.len() > stem.len() {
                stem = component;
            }
        }
        if stem.len() > 2 {
            by_stem.entry(stem).or_default().push(tag);
        }
    }
    by_stem
        .into_iter()
        .filter(|(_, tags)| tags.len() >= MIN_GROUP)
        .map(|(stem, tags)| group(DetectionMethod::Stem(stem.to_string()), tags, index))
        .collect()
}

/// A tag joins a concept group when it contains the concept name or
/// any of its curated variant substrings.
fn synonym_groups(index: &TagIndex, config: &AnalyzerConfig) -> Vec<DuplicateGroup> {
    let mut groups = Vec::new();
    for (concept, variants) in &config.synonyms {
        let members: Vec<&str> = index
            .vocabulary()
            .filter(|tag| {
                tag.contains(concept.as_str())
                    || variants.iter().any(|variant| tag.contains(variant.as_str()))
            })
            .collect();
        if members.len() >= MIN_GROUP {
            groups.push(group(DetectionMethod::Synonym(concept.clone()), members, index));
        }
    }
    groups
}

/// Shared 6-character prefixes and, separately, suffixes among tags
/// longer than 8 characters.
fn pattern_groups(index: &TagIndex) -> Vec<DuplicateGroup> {
    let mut by_prefix: IndexMap<&str, Vec<&str>> = IndexMap::new();
    let mut by_suffix: IndexMap<&str, Vec<&str>> = IndexMap::new();
    for tag in index.vocabulary() {
        if tag.len() > PATTERN_MIN_TAG_LEN {
            by_prefix.entry(&tag[..PATTERN_LEN]).or_default().push(tag);
            by_suffix
                .entry(&tag[tag.len() - PATTERN_LEN..])
                .or_default()
                .push(tag);
        }
    }

    let prefixes = by_prefix
        .into_iter()
        .filter(|(_, tags)| tags.len() >= MIN_PATTERN_GROUP)
        .map(|(prefix, tags)| group(DetectionMethod::Prefix(prefix.to_string()), tags, index));
    let suffixes = by_suffix
        .into_iter()
        .filter(|(_, tags)| tags.len() >= MIN_PATTERN_GROUP)
        .map(|(suffix, tags)| group(DetectionMethod::Suffix(suffix.to_string()), tags, index));
    prefixes.chain(suffixes).collect()
}

fn group(method: DetectionMethod, tags: Vec<&str>, index: &TagIndex) -> DuplicateGroup {
    let total_uses = tags.iter().map(|tag| index.usage(tag)).sum();
    DuplicateGroup {
        method,
        tags: tags.into_iter().map(|t| t.to_string()).collect(),
        total_uses,
    }
}

/// Rename proposals for vocabulary tags present in the curated merge
/// table.
pub fn merge_suggestions(index: &TagIndex, config: &AnalyzerConfig) -> Vec<RenameSuggestion> {
    let mut suggestions = Vec::new();
    for tag in index.vocabulary() {
        if let Some(preferred) = config.curated_merges.get(tag) {
            if preferred == tag {
                continue;
            }
            suggestions.push(RenameSuggestion {
                current: tag.to_string(),
                suggested: preferred.clone(),
                target_exists: index.usage(preferred) > 0,
                current_uses: index.usage(tag),
                suggested_uses: index.usage(preferred),
            });
        }
    }
    suggestions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::document::DocumentRecord;

    fn index_of(tags: &[&str]) -> TagIndex {
        let records = tags.iter().enumerate().map(|(i, tag)| {
            Ok(DocumentRecord::new(
                format!("doc_{i}.md"),
                vec![tag.to_string()],
            ))
        });
        TagIndex::build(records, &AnalyzerConfig::default())
    }

    fn groups_with(groups: &[DuplicateGroup], tag: &str) -> Vec<DetectionMethod> {
        groups
            .iter()
            .filter(|g| g.tags.iter().any(|t| t == tag))
            .map(|g| g.method.clone())
            .collect()
    }

    #[test]
    fn stem_grouping_uses_longest_component() {
        let index = index_of(&["collaborative_learning", "collaborative_tools", "pedagogy"]);
        let groups = find_duplicate_groups(&index, &AnalyzerConfig::default());
        let stem = groups
            .iter()
            .find(|g| g.method == DetectionMethod::Stem("collaborative".to_string()))
            .expect("stem group");
        assert_eq!(stem.tags.len(), 2);
        assert_eq!(stem.total_uses, 2);
    }

    #[test]
    fn synonym_grouping_matches_concept_variants() {
        let index = index_of(&["peer_evaluation", "formative_testing", "pedagogy"]);
        let groups = find_duplicate_groups(&index, &AnalyzerConfig::default());
        let assessment = groups
            .iter()
            .find(|g| g.method == DetectionMethod::Synonym("assessment".to_string()))
            .expect("synonym group");
        assert!(assessment.tags.contains(&"peer_evaluation".to_string()));
        assert!(assessment.tags.contains(&"formative_testing".to_string()));
    }

    #[test]
    fn pattern_grouping_needs_three_members_and_long_tags() {
        let index = index_of(&[
            "learning_analytics",
            "learning_design",
            "learning_sciences",
            "learner",
        ]);
        let groups = find_duplicate_groups(&index, &AnalyzerConfig::default());
        let prefix = groups
            .iter()
            .find(|g| g.method == DetectionMethod::Prefix("learni".to_string()))
            .expect("prefix group");
        assert_eq!(prefix.tags.len(), 3);
        // all suffixes here are distinct, so no suffix evidence forms
        assert!(groups
            .iter()
            .all(|g| !matches!(&g.method, DetectionMethod::Suffix(_))));
    }

    #[test]
    fn a_tag_may_appear_under_several_methods() {
        let index = index_of(&[
            "learning_analytics",
            "learning_design",
            "learning_sciences",
        ]);
        let groups = find_duplicate_groups(&index, &AnalyzerConfig::default());
        let methods = groups_with(&groups, "learning_analytics");
        assert!(methods.len() >= 2, "expected stem + prefix evidence, got {methods:?}");
    }

    #[test]
    fn merge_suggestions_fire_only_on_table_hits() {
        let index = index_of(&["higher_ed", "higher_education", "pedagogy"]);
        let suggestions = merge_suggestions(&index, &AnalyzerConfig::default());
        assert_eq!(suggestions.len(), 1);
        let suggestion = &suggestions[0];
        assert_eq!(suggestion.current, "higher_ed");
        assert_eq!(suggestion.suggested, "higher_education");
        assert!(suggestion.target_exists);
        assert_eq!(suggestion.current_uses, 1);
        assert_eq!(suggestion.suggested_uses, 1);
    }
}
