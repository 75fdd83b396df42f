//! Tag and document quality scoring.
//!
//! Two separate composites, both pure functions of the index and both
//! bounded to [0, 100]:
//!
//! - per tag: vocabulary health — usage against the corpus reference,
//!   co-occurrence diversity, string clarity, temporal consistency;
//! - per document: tagging completeness — tag count, facet coverage,
//!   and the clarity of the document's own tags.
//!
//! A third pass ranks documents by retagging urgency, the signal the
//! curation workflow uses to decide what to fix first.

use serde::Serialize;

use crate::analyzer::config::AnalyzerConfig;
use crate::analyzer::index::TagIndex;
use crate::utils::stats::{percentile, variance};

/// Facet coverage saturates once a document touches this many
/// distinct domains.
const FACET_SATURATION: usize = 4;

/// Per-tag composite with its sub-scores (each in [0, 1]).
#[derive(Debug, Clone, Serialize)]
pub struct TagQuality {
    pub tag: String,
    pub score: f64,
    pub usage: f64,
    pub diversity: f64,
    pub clarity: f64,
    pub temporal: f64,
    pub uses: usize,
    pub partners: usize,
}

/// Per-document tagging completeness.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentQuality {
    pub id: String,
    pub score: f64,
    pub tag_count: usize,
    pub facet_coverage: usize,
    pub mean_clarity: f64,
}

/// Per-document retagging urgency (higher = more urgent).
#[derive(Debug, Clone, Serialize)]
pub struct RetaggingPriority {
    pub id: String,
    pub score: u32,
    pub no_tags: bool,
    pub few_tags: bool,
    pub author_tags_only: bool,
    pub generic_tags_only: bool,
    pub missing_abstract: bool,
}

/// Score every subject tag, best first.
pub fn score_tags(index: &TagIndex, config: &AnalyzerConfig) -> Vec<TagQuality> {
    let counts: Vec<usize> = index.tag_docs().values().map(Vec::len).collect();
    let usage_reference = percentile(&counts, config.usage_percentile).max(1.0);
    let weights = &config.quality_weights;

    let mut scores: Vec<TagQuality> = index
        .vocabulary()
        .map(|tag| {
            let uses = index.usage(tag);
            let partners = index.cooccurrence().partner_count(tag);

            let usage = (uses as f64 / usage_reference).min(1.0);
            let diversity =
                (partners as f64 / config.diversity_reference.max(1) as f64).min(1.0);
            let clarity = clarity_score(tag);
            let temporal = temporal_consistency(index, tag);

            let score = 100.0
                * (weights.usage * usage
                    + weights.diversity * diversity
                    + weights.clarity * clarity
                    + weights.temporal * temporal);
            TagQuality {
                tag: tag.to_string(),
                score: score.clamp(0.0, 100.0),
                usage,
                diversity,
                clarity,
                temporal,
                uses,
                partners,
            }
        })
        .collect();

    scores.sort_by(|a, b| b.score.total_cmp(&a.score).then_with(|| a.tag.cmp(&b.tag)));
    scores
}

/// Deterministic clarity of a tag string in [0, 1]: favors 2-4 token
/// tags of moderate length, penalizes the very short and very long.
pub fn clarity_score(tag: &str) -> f64 {
    let len = tag.chars().count();
    let tokens = tag.split('_').filter(|t| !t.is_empty()).count();

    let length_component = if (5..=30).contains(&len) {
        0.5
    } else if len < 3 || len > 40 {
        0.0
    } else {
        0.25
    };
    let token_component = match tokens {
        2..=4 => 0.5,
        1 => 0.3,
        _ => 0.2,
    };
    length_component + token_component
}

/// 1 − variance of the per-year usage proportions over the observed
/// span (silent years count as zero). Tags without year data score a
/// neutral 1.0.
fn temporal_consistency(index: &TagIndex, tag: &str) -> f64 {
    let Some(years) = index.years(tag) else {
        return 1.0;
    };
    let (Some(&min), Some(&max)) = (years.keys().next(), years.keys().next_back()) else {
        return 1.0;
    };
    let total: u32 = years.values().sum();
    if total == 0 {
        return 1.0;
    }
    let proportions: Vec<f64> = (min..=max)
        .map(|year| years.get(&year).copied().unwrap_or(0) as f64 / total as f64)
        .collect();
    (1.0 - variance(&proportions)).clamp(0.0, 1.0)
}

/// Score every document's tagging completeness, in corpus order.
pub fn score_documents(index: &TagIndex, config: &AnalyzerConfig) -> Vec<DocumentQuality> {
    index
        .documents()
        .iter()
        .map(|(id, doc)| {
            let tag_count = doc.tags.len();
            let facet_coverage = facet_coverage(&doc.tags, config);
            let mean_clarity = if doc.tags.is_empty() {
                0.0
            } else {
                doc.tags.iter().map(|tag| clarity_score(tag)).sum::<f64>() / tag_count as f64
            };

            let tag_points = ((tag_count * 10) as f64).min(50.0);
            let facet_points =
                20.0 * facet_coverage.min(FACET_SATURATION) as f64 / FACET_SATURATION as f64;
            let clarity_points = 30.0 * mean_clarity;

            DocumentQuality {
                id: id.clone(),
                score: (tag_points + facet_points + clarity_points).clamp(0.0, 100.0),
                tag_count,
                facet_coverage,
                mean_clarity,
            }
        })
        .collect()
}

/// Distinct domains touched by a tag set.
fn facet_coverage(tags: &[String], config: &AnalyzerConfig) -> usize {
    config
        .domains
        .iter()
        .filter(|rule| tags.iter().any(|tag| rule.matches(tag)))
        .count()
}

/// Rank documents by retagging urgency, most urgent first.
pub fn retagging_priorities(index: &TagIndex, config: &AnalyzerConfig) -> Vec<RetaggingPriority> {
    let quality: std::collections::HashMap<String, f64> = score_documents(index, config)
        .into_iter()
        .map(|doc| (doc.id, doc.score))
        .collect();

    let mut priorities: Vec<RetaggingPriority> = index
        .documents()
        .iter()
        .map(|(id, doc)| {
            let total_tags = doc.tags.len() + doc.author_tags.len();
            let no_tags = total_tags == 0;
            let few_tags = !no_tags && total_tags <= 2;
            let author_tags_only = doc.tags.is_empty() && !doc.author_tags.is_empty();
            let generic_tags_only = !doc.tags.is_empty()
                && doc.tags.iter().all(|tag| config.generic_tags.contains(tag.as_str()));
            let missing_abstract = !doc.has_abstract;

            let mut score: i64 = 0;
            if no_tags {
                score += 100;
            } else if few_tags {
                score += 80;
            }
            if author_tags_only {
                score += 60;
            }
            if generic_tags_only {
                score += 50;
            }
            if missing_abstract {
                score += 30;
            }
            if quality.get(id).copied().unwrap_or(0.0) > 75.0 {
                score -= 50;
            }

            RetaggingPriority {
                id: id.clone(),
                score: score.max(0) as u32,
                no_tags,
                few_tags,
                author_tags_only,
                generic_tags_only,
                missing_abstract,
            }
        })
        .collect();

    priorities.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.id.cmp(&b.id)));
    priorities
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::document::{DocumentError, DocumentRecord};

    fn doc(id: &str, tags: &[&str]) -> Result<DocumentRecord, DocumentError> {
        Ok(DocumentRecord::new(
            id,
            tags.iter().map(|t| t.to_string()).collect(),
        ))
    }

    fn sample_index() -> TagIndex {
        let mut records = Vec::new();
        // a well-connected, well-used tag
        for i in 0..10 {
            records.push(doc(
                &format!("good_{i}.md"),
                &["online_learning", "formative_assessment", "machine_learning"],
            ));
        }
        // a one-off tag
        records.push(doc("rare.md", &["obscure_framework_variant"]));
        TagIndex::build(records, &AnalyzerConfig::default())
    }

    #[test]
    fn tag_scores_stay_in_bounds() {
        let scores = score_tags(&sample_index(), &AnalyzerConfig::default());
        assert!(!scores.is_empty());
        for quality in &scores {
            assert!((0.0..=100.0).contains(&quality.score), "{quality:?}");
            for sub in [quality.usage, quality.diversity, quality.clarity, quality.temporal] {
                assert!((0.0..=1.0).contains(&sub), "{quality:?}");
            }
        }
    }

    #[test]
    fn heavy_use_beats_one_off_use() {
        let scores = score_tags(&sample_index(), &AnalyzerConfig::default());
        let position = |tag: &str| {
            scores
                .iter()
                .position(|quality| quality.tag == tag)
                .expect("scored")
        };
        assert!(position("online_learning") < position("obscure_framework_variant"));
    }

    #[test]
    fn clarity_favors_moderate_multiword_tags() {
        assert_eq!(clarity_score("online_learning"), 1.0);
        assert!(clarity_score("ai") < 0.5);
        assert!(clarity_score("a_very_long_overly_specific_tag_nobody_reuses") < 0.5);
        assert!(clarity_score("pedagogy") < 1.0); // single token
    }

    #[test]
    fn spike_usage_scores_lower_temporal_consistency_than_steady() {
        let steady = TagIndex::build(
            (0..4).map(|i| {
                Ok(DocumentRecord::new(format!("s_{i}.md"), vec!["steady".to_string()])
                    .with_year(2021 + i))
            }),
            &AnalyzerConfig::default(),
        );
        let spiky = TagIndex::build(
            (0..4).map(|i| {
                let year = if i == 0 { 2021 } else { 2024 };
                Ok(DocumentRecord::new(format!("p_{i}.md"), vec!["spiky".to_string()])
                    .with_year(year))
            }),
            &AnalyzerConfig::default(),
        );
        assert!(temporal_consistency(&steady, "steady") > temporal_consistency(&spiky, "spiky"));
    }

    #[test]
    fn document_scores_stay_in_bounds() {
        let scores = score_documents(&sample_index(), &AnalyzerConfig::default());
        for doc_quality in &scores {
            assert!((0.0..=100.0).contains(&doc_quality.score), "{doc_quality:?}");
        }
    }

    #[test]
    fn untagged_documents_rank_most_urgent() {
        let records = vec![
            doc("untagged.md", &[]),
            doc("thin.md", &["pedagogy"]),
            doc(
                "rich.md",
                &["online_learning", "formative_assessment", "machine_learning", "chatgpt", "digital_pedagogy"],
            ),
        ];
        let index = TagIndex::build(records, &AnalyzerConfig::default());
        let priorities = retagging_priorities(&index, &AnalyzerConfig::default());
        assert_eq!(priorities[0].id, "untagged.md");
        assert!(priorities[0].no_tags);
        let rich = priorities.iter().find(|p| p.id == "rich.md").expect("rich doc");
        assert!(rich.score < priorities[0].score);
    }

    #[test]
    fn author_only_documents_are_flagged() {
        let records = vec![doc("author_only.md", &["vygotsky_", "dewey_", "piaget_"])];
        let index = TagIndex::build(records, &AnalyzerConfig::default());
        let priorities = retagging_priorities(&index, &AnalyzerConfig::default());
        assert!(priorities[0].author_tags_only);
        assert!(!priorities[0].no_tags);
    }

    #[test]
    fn generic_only_documents_are_flagged() {
        let records = vec![doc("generic.md", &["education", "technology", "research"])];
        let index = TagIndex::build(records, &AnalyzerConfig::default());
        let priorities = retagging_priorities(&index, &AnalyzerConfig::default());
        assert!(priorities[0].generic_tags_only);
    }

    #[test]
    fn good_quality_earns_the_rebate() {
        let body = "## Abstract\n\nA study of tagging practice.\n";
        let records = vec![
            Ok(DocumentRecord::new(
                "covered.md",
                vec![
                    "online_learning".to_string(),
                    "formative_assessment".to_string(),
                    "machine_learning".to_string(),
                    "teacher_training".to_string(),
                    "digital_pedagogy".to_string(),
                ],
            )
            .with_body(body)),
        ];
        let index = TagIndex::build(records, &AnalyzerConfig::default());
        let config = AnalyzerConfig::default();
        let quality = score_documents(&index, &config);
        assert!(quality[0].score > 75.0, "{:?}", quality[0]);
        let priorities = retagging_priorities(&index, &config);
        assert_eq!(priorities[0].score, 0);
    }
}
