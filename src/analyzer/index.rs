//! Tag index builder: the inverted index everything else reads.
//!
//! One pass over the document records produces tag -> document
//! buckets, the symmetric co-occurrence matrix, per-tag year
//! histograms, and per-document normalized tag sets. All analyzers
//! are pure functions of the result; the index is rebuilt wholesale
//! per analysis run, never updated incrementally.
//!
//! Unreadable documents are recorded and skipped, invalid tags are
//! dropped and tallied — only configuration problems abort a run.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use indexmap::{IndexMap, IndexSet};
use rayon::prelude::*;
use regex::Regex;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::analyzer::config::AnalyzerConfig;
use crate::analyzer::cooccur::CooccurrenceMatrix;
use crate::analyzer::document::{DocId, DocumentError, DocumentRecord};
use crate::analyzer::normalize::{author_tag_form, is_author_tag, is_canonical_form, normalize};
use crate::utils::stats::UsageDistribution;

/// Documents per shard in the parallel build.
const PARALLEL_CHUNK: usize = 256;

/// Per-document view kept by the index: normalized subject tags,
/// author tags, and the body signals the document scorer consumes.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DocumentTags {
    pub tags: Vec<String>,
    pub author_tags: Vec<String>,
    pub has_abstract: bool,
    pub body_words: usize,
}

/// A skipped document, kept for the run summary.
#[derive(Debug, Clone, Serialize)]
pub struct ScanWarning {
    pub id: DocId,
    pub reason: String,
}

/// Build statistics: what was scanned, skipped, and dropped.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ScanStats {
    pub documents_scanned: u64,
    pub documents_skipped: u64,
    /// Raw tags that failed normalization or the canonical invariant.
    pub rejected_tags: u64,
    /// Author-tag occurrences diverted to the author buckets.
    pub author_tag_uses: u64,
    pub warnings: Vec<ScanWarning>,
}

impl ScanStats {
    fn absorb(&mut self, other: ScanStats) {
        self.documents_scanned += other.documents_scanned;
        self.documents_skipped += other.documents_skipped;
        self.rejected_tags += other.rejected_tags;
        self.author_tag_uses += other.author_tag_uses;
        self.warnings.extend(other.warnings);
    }
}

/// Vocabulary-level usage summary.
#[derive(Debug, Clone, Serialize)]
pub struct VocabularyStats {
    pub unique_tags: usize,
    pub total_uses: usize,
    pub distribution: UsageDistribution,
    pub most_common: Vec<(String, usize)>,
    pub least_common: Vec<(String, usize)>,
}

/// The inverted tag index and its companion structures.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TagIndex {
    tag_docs: IndexMap<String, Vec<DocId>>,
    author_docs: IndexMap<String, Vec<DocId>>,
    cooccurrence: CooccurrenceMatrix,
    tag_years: IndexMap<String, BTreeMap<i32, u32>>,
    documents: IndexMap<DocId, DocumentTags>,
    stats: ScanStats,
}

impl TagIndex {
    /// Build the index from a record stream in one sequential pass.
    pub fn build<I>(records: I, config: &AnalyzerConfig) -> TagIndex
    where
        I: IntoIterator<Item = Result<DocumentRecord, DocumentError>>,
    {
        let mut index = TagIndex::default();
        for record in records {
            match record {
                Ok(record) => index.ingest(record, config),
                Err(err) => index.skip(err),
            }
        }
        index.log_summary();
        index
    }

    /// Parallel variant: shard the records into fixed chunks, build a
    /// partial index per chunk on the rayon pool, then merge the
    /// partials in chunk order. Chunk-ordered merging keeps every
    /// bucket's insertion order identical to the sequential build, so
    /// both paths produce byte-identical reports.
    pub fn build_parallel(
        records: Vec<Result<DocumentRecord, DocumentError>>,
        config: &AnalyzerConfig,
    ) -> TagIndex {
        let partials: Vec<TagIndex> = records
            .par_chunks(PARALLEL_CHUNK)
            .map(|chunk| {
                let mut partial = TagIndex::default();
                for record in chunk {
                    match record.clone() {
                        Ok(record) => partial.ingest(record, config),
                        Err(err) => partial.skip(err),
                    }
                }
                partial
            })
            .collect();

        let mut index = TagIndex::default();
        for partial in partials {
            index.merge(partial);
        }
        index.log_summary();
        index
    }

    fn ingest(&mut self, record: DocumentRecord, config: &AnalyzerConfig) {
        self.stats.documents_scanned += 1;

        let mut subject: IndexSet<String> = IndexSet::new();
        let mut authors: IndexSet<String> = IndexSet::new();
        for raw in &record.raw_tags {
            if is_author_tag(raw) {
                self.stats.author_tag_uses += 1;
                authors.insert(author_tag_form(raw));
                continue;
            }
            match normalize(raw, config) {
                Some(tag) if is_canonical_form(&tag) => {
                    subject.insert(tag);
                }
                _ => {
                    debug!(document = %record.id, tag = %raw, "rejected invalid tag");
                    self.stats.rejected_tags += 1;
                }
            }
        }

        for tag in &subject {
            self.tag_docs
                .entry(tag.clone())
                .or_default()
                .push(record.id.clone());
        }
        for tag in &authors {
            self.author_docs
                .entry(tag.clone())
                .or_default()
                .push(record.id.clone());
        }

        for (i, a) in subject.iter().enumerate() {
            for b in subject.iter().skip(i + 1) {
                self.cooccurrence.bump(a, b);
            }
        }

        if let Some(year) = record.year {
            for tag in &subject {
                *self
                    .tag_years
                    .entry(tag.clone())
                    .or_default()
                    .entry(year)
                    .or_insert(0) += 1;
            }
        }

        let (has_abstract, body_words) = match record.body.as_deref() {
            Some(body) => (body_has_abstract(body), body.split_whitespace().count()),
            None => (false, 0),
        };
        self.documents.insert(
            record.id,
            DocumentTags {
                tags: subject.into_iter().collect(),
                author_tags: authors.into_iter().collect(),
                has_abstract,
                body_words,
            },
        );
    }

    fn skip(&mut self, err: DocumentError) {
        warn!(document = %err.id(), error = %err, "skipping unreadable document");
        self.stats.documents_skipped += 1;
        self.stats.warnings.push(ScanWarning {
            id: err.id().to_string(),
            reason: err.to_string(),
        });
    }

    fn merge(&mut self, other: TagIndex) {
        for (tag, docs) in other.tag_docs {
            self.tag_docs.entry(tag).or_default().extend(docs);
        }
        for (tag, docs) in other.author_docs {
            self.author_docs.entry(tag).or_default().extend(docs);
        }
        self.cooccurrence.merge(other.cooccurrence);
        for (tag, years) in other.tag_years {
            let target = self.tag_years.entry(tag).or_default();
            for (year, count) in years {
                *target.entry(year).or_insert(0) += count;
            }
        }
        self.documents.extend(other.documents);
        self.stats.absorb(other.stats);
    }

    fn log_summary(&self) {
        info!(
            documents = self.stats.documents_scanned,
            skipped = self.stats.documents_skipped,
            tags = self.tag_docs.len(),
            rejected = self.stats.rejected_tags,
            "tag index built"
        );
    }
}

/// Read-only accessors.
impl TagIndex {
    /// The subject vocabulary (author tags excluded), first-seen order.
    pub fn vocabulary(&self) -> impl Iterator<Item = &str> {
        self.tag_docs.keys().map(|t| t.as_str())
    }

    /// Documents containing a tag. Empty slice for unknown tags.
    pub fn documents_for(&self, tag: &str) -> &[DocId] {
        self.tag_docs.get(tag).map_or(&[], |docs| docs.as_slice())
    }

    /// Usage count (number of documents) for a tag.
    pub fn usage(&self, tag: &str) -> usize {
        self.tag_docs.get(tag).map_or(0, |docs| docs.len())
    }

    pub fn tag_docs(&self) -> &IndexMap<String, Vec<DocId>> {
        &self.tag_docs
    }

    pub fn author_docs(&self) -> &IndexMap<String, Vec<DocId>> {
        &self.author_docs
    }

    pub fn cooccurrence(&self) -> &CooccurrenceMatrix {
        &self.cooccurrence
    }

    /// Year histogram for a tag, when any document carried a year.
    pub fn years(&self, tag: &str) -> Option<&BTreeMap<i32, u32>> {
        self.tag_years.get(tag)
    }

    pub fn tag_years(&self) -> &IndexMap<String, BTreeMap<i32, u32>> {
        &self.tag_years
    }

    pub fn documents(&self) -> &IndexMap<DocId, DocumentTags> {
        &self.documents
    }

    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    pub fn stats(&self) -> &ScanStats {
        &self.stats
    }

    /// Latest year observed anywhere in the index.
    pub fn max_year(&self) -> Option<i32> {
        self.tag_years
            .values()
            .filter_map(|years| years.keys().next_back())
            .max()
            .copied()
    }

    /// Usage summary over the subject vocabulary.
    pub fn vocabulary_stats(&self) -> VocabularyStats {
        let mut by_usage: Vec<(String, usize)> = self
            .tag_docs
            .iter()
            .map(|(tag, docs)| (tag.clone(), docs.len()))
            .collect();
        by_usage.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        let total_uses = by_usage.iter().map(|(_, n)| n).sum();
        let distribution = UsageDistribution::from_counts(by_usage.iter().map(|(_, n)| *n));
        let most_common = by_usage.iter().take(20).cloned().collect();
        let least_common = by_usage.iter().rev().take(20).cloned().collect();
        VocabularyStats {
            unique_tags: by_usage.len(),
            total_uses,
            distribution,
            most_common,
            least_common,
        }
    }
}

/// Whether the body carries a non-empty abstract section.
fn body_has_abstract(body: &str) -> bool {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    let pattern =
        PATTERN.get_or_init(|| Regex::new(r"## Abstract\s*\n\s*\n\s*[A-Z]").expect("literal pattern"));
    pattern.is_match(body)
}
