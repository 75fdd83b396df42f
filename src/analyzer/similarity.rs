//! Lexical near-duplicate detection over the vocabulary.
//!
//! Every unordered pair of distinct subject tags is scored with the
//! Ratcliff/Obershelp alignment ratio; pairs at or above the
//! configured threshold are candidates for human review. Quadratic in
//! vocabulary size, which is fine: vocabularies are hundreds of tags,
//! not millions, and the pair scan runs on the rayon pool. Output is
//! advisory — the engine never merges tags on its own.

use rayon::prelude::*;
use serde::Serialize;

use crate::analyzer::config::AnalyzerConfig;
use crate::analyzer::index::TagIndex;
use crate::utils::matcher::sequence_ratio;

/// Two tags whose alignment ratio reached the threshold.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimilarityPair {
    pub a: String,
    pub b: String,
    pub score: f64,
}

/// All vocabulary pairs with alignment similarity at or above the
/// configured threshold, sorted by score descending, then pair.
pub fn find_similar_pairs(index: &TagIndex, config: &AnalyzerConfig) -> Vec<SimilarityPair> {
    let vocabulary: Vec<&str> = index.vocabulary().collect();
    let n = vocabulary.len();

    let threshold = config.similarity_threshold;

    let mut pairs: Vec<SimilarityPair> = (0..n)
        .into_par_iter()
        .flat_map_iter(|i| {
            let vocabulary = &vocabulary;
            (i + 1..n).filter_map(move |j| {
                let (a, b) = (vocabulary[i], vocabulary[j]);
                let score = sequence_ratio(a, b);
                if score < threshold {
                    return None;
                }
                // store each pair with its members in lexical order
                let (a, b) = if a <= b { (a, b) } else { (b, a) };
                Some(SimilarityPair {
                    a: a.to_string(),
                    b: b.to_string(),
                    score,
                })
            })
        })
        .collect();

    pairs.sort_by(|x, y| {
        y.score
            .total_cmp(&x.score)
            .then_with(|| x.a.cmp(&y.a))
            .then_with(|| x.b.cmp(&y.b))
    });
    pairs
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

    #[test]
    fn typo_pair_is_flagged() {
        let index = index_of(&["online_learning", "online_learing", "chatgpt", "pedagogy"]);
        let pairs = find_similar_pairs(&index, &AnalyzerConfig::default());
        assert!(pairs
            .iter()
            .any(|p| p.a == "online_learing" && p.b == "online_learning" && p.score >= 0.85));
        assert!(!pairs
            .iter()
            .any(|p| (p.a == "chatgpt" && p.b == "pedagogy")));
    }

    #[test]
    fn containment_pairs_are_not_skipped() {
        // singular/plural drift is exactly what the matcher hunts
        let index = index_of(&["assessments", "assessment"]);
        let pairs = find_similar_pairs(&index, &AnalyzerConfig::default());
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].a, "assessment");
        assert_eq!(pairs[0].b, "assessments");
    }

    #[test]
    fn scores_are_symmetric_and_ordered() {
        let index = index_of(&["collaborative_learning", "colaborative_learning", "moocs", "mooc_platforms"]);
        let config = AnalyzerConfig::default();
        let pairs = find_similar_pairs(&index, &config);
        for pair in &pairs {
            assert_eq!(
                sequence_ratio(&pair.a, &pair.b),
                sequence_ratio(&pair.b, &pair.a)
            );
            assert!(pair.score >= config.similarity_threshold);
            assert!(pair.a < pair.b);
        }
        // descending by score
        for window in pairs.windows(2) {
            assert!(window[0].score >= window[1].score);
        }
    }

    #[test]
    fn author_tags_never_enter_the_scan() {
        let records = [Ok(DocumentRecord::new(
            "a.md",
            vec!["vygotsky_".to_string(), "vygotsky_theory".to_string()],
        ))];
        let index = TagIndex::build(records, &AnalyzerConfig::default());
        let pairs = find_similar_pairs(&index, &AnalyzerConfig::default());
        assert!(pairs.iter().all(|p| p.a != "vygotsky_" && p.b != "vygotsky_"));
    }
}
