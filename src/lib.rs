/// This crate is a Tag Corpus Analytics Engine for document collections.
pub mod analyzer;
pub mod utils;

/// Tag Index
/// The central data structure of this crate: the inverted tag index
/// built in one pass over a document snapshot.
///
/// Internally, it holds:
/// - Tag -> document buckets (subject and author vocabularies apart)
/// - The symmetric co-occurrence matrix
/// - Per-tag year histograms
/// - Per-document normalized tag sets and body signals
/// - Build statistics (skipped documents, rejected tags)
///
/// Every analyzer is a pure function of this index; rebuild it
/// wholesale per run. `build_parallel` shards the scan over the rayon
/// pool and produces output identical to the sequential build.
///
/// # Serialization
/// Supported, for downstream reporting. No format is prescribed.
pub use analyzer::index::TagIndex;

/// Analyzer Configuration
/// Thresholds, quality weights, and the curated vocabulary tables
/// (stop set, special replacements, curated merges, synonym concepts,
/// domain rules). Externally loaded data, not computed state; a JSON
/// convenience constructor is provided. `validate` runs before any
/// analysis and configuration problems are the only fatal errors in
/// the engine.
pub use analyzer::config::{AnalyzerConfig, ConfigError, DomainRule, QualityWeights};

/// Document Record
/// The ingestion view of one document: identifier, optional creation
/// year, raw tag strings, optional body text. Supplied by a
/// collaborator iterator as `Result<DocumentRecord, DocumentError>`
/// so unreadable documents are skippable, not fatal.
pub use analyzer::document::{DocId, DocumentError, DocumentRecord};

/// Vocabulary Normalizer
/// Deterministic, idempotent rewriting of a raw tag string into
/// canonical form (or rejection). Usable standalone by an ingestion
/// pipeline; the index builder applies it to every raw tag.
pub use analyzer::normalize::{is_author_tag, is_canonical_form, normalize};

/// Tag Syntax Extraction
/// Raw tag strings out of note text: front-matter `tags:` lists
/// first, then inline hashtags, markdown headings excluded.
pub use analyzer::extract::extract_raw_tags;

/// Analysis Report
/// The combined result of every analyzer over one index snapshot:
/// similarity pairs, duplicate groups, clusters, bridge tags, trend
/// records, quality scores, and the scan statistics. `run_analysis`
/// composes the independent analyzers; each is equally callable on
/// its own.
pub use analyzer::{run_analysis, AnalysisReport};

/// Analyzer result types
/// Plain serializable values returned by the individual analyzers.
pub use analyzer::bridge::{Association, BridgeTag, DomainDistribution};
pub use analyzer::cluster::Cluster;
pub use analyzer::duplicates::{DetectionMethod, DuplicateGroup, RenameSuggestion};
pub use analyzer::index::{ScanStats, VocabularyStats};
pub use analyzer::quality::{DocumentQuality, RetaggingPriority, TagQuality};
pub use analyzer::similarity::SimilarityPair;
pub use analyzer::trend::{TrendClass, TrendRecord, TrendReport};
