//! Analysis configuration: thresholds, score weights, and the curated
//! vocabulary tables.
//!
//! Everything here is externally loadable data, not computed state.
//! The defaults carry the curation tables the engine ships with; a
//! collaborator can deserialize a replacement from JSON (or any serde
//! format) and swap any table wholesale. `validate` runs before any
//! analysis: a malformed configuration aborts the run, since results
//! computed against bad thresholds would be meaningless.

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fatal configuration problems. Detected before analysis starts.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("similarity threshold {0} is outside (0, 1]")]
    SimilarityThreshold(f64),

    #[error("cluster threshold {0} is outside (0, 1)")]
    ClusterThreshold(f64),

    #[error("usage percentile {0} is outside (0, 1]")]
    UsagePercentile(f64),

    #[error("recent window must cover at least 1 year, got {0}")]
    RecentWindow(i32),

    #[error("quality weights sum to {0:.4}, expected 1.0")]
    WeightSum(f64),

    #[error("domain rule '{0}' has no keywords, prefixes, or suffixes")]
    EmptyDomainRule(String),

    #[error("required table '{0}' is empty")]
    EmptyTable(&'static str),

    #[error("configuration could not be parsed: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Weights for the per-tag quality composite. Must sum to 1.0.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct QualityWeights {
    pub usage: f64,
    pub diversity: f64,
    pub clarity: f64,
    pub temporal: f64,
}

impl Default for QualityWeights {
    fn default() -> Self {
        QualityWeights {
            usage: 0.25,
            diversity: 0.25,
            clarity: 0.25,
            temporal: 0.25,
        }
    }
}

impl QualityWeights {
    pub fn sum(&self) -> f64 {
        self.usage + self.diversity + self.clarity + self.temporal
    }
}

/// One named subject domain, matched against tag names by substring
/// keywords and by prefix/suffix patterns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainRule {
    pub name: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub prefixes: Vec<String>,
    #[serde(default)]
    pub suffixes: Vec<String>,
}

impl DomainRule {
    /// Whether a tag name belongs to this domain.
    pub fn matches(&self, tag: &str) -> bool {
        self.keywords.iter().any(|k| tag.contains(k.as_str()))
            || self.prefixes.iter().any(|p| tag.starts_with(p.as_str()))
            || self.suffixes.iter().any(|s| tag.ends_with(s.as_str()))
    }
}

/// Full engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Minimum alignment ratio for a similarity pair to be retained.
    pub similarity_threshold: f64,
    /// Minimum co-occurrence strength (co-count / seed usage) for
    /// cluster membership; strictly exceeded.
    pub cluster_threshold: f64,
    /// A cluster seed needs strictly more than this many distinct
    /// co-occurring partners.
    pub min_seed_partners: usize,
    /// Minimum usage for bridge candidacy.
    pub bridge_min_usage: usize,
    /// Distinct domains a bridge tag must touch.
    pub bridge_min_domains: usize,
    /// Width of the "recent" window in calendar years for trend
    /// classification.
    pub recent_window_years: i32,
    /// Reference year for the recent window. When absent the maximum
    /// parseable year in the index is used.
    pub reference_year: Option<i32>,
    /// Per-tag quality composite weights.
    pub quality_weights: QualityWeights,
    /// Partner count at which the diversity sub-score saturates.
    pub diversity_reference: usize,
    /// Corpus percentile used as the usage sub-score reference.
    pub usage_percentile: f64,
    /// Rejected outright by the normalizer: pronouns, articles,
    /// single digits, and known junk.
    pub stop_tags: IndexSet<String>,
    /// Full-string rewrites applied by the normalizer (abbreviation
    /// expansions and mechanical spelling fixes).
    pub special_replacements: IndexMap<String, String>,
    /// Curated variant -> preferred merges. Advisory only: drives
    /// rename suggestions, never applied automatically.
    pub curated_merges: IndexMap<String, String>,
    /// Concept -> variant substrings for synonym duplicate grouping.
    pub synonyms: IndexMap<String, Vec<String>>,
    /// Subject domain rules for bridge detection, domain
    /// distribution, and document facet coverage.
    pub domains: Vec<DomainRule>,
    /// Tags considered too generic to count as real subject tagging.
    pub generic_tags: IndexSet<String>,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        AnalyzerConfig {
            similarity_threshold: 0.85,
            cluster_threshold: 0.40,
            min_seed_partners: 5,
            bridge_min_usage: 5,
            bridge_min_domains: 3,
            recent_window_years: 2,
            reference_year: None,
            quality_weights: QualityWeights::default(),
            diversity_reference: 20,
            usage_percentile: 0.90,
            stop_tags: default_stop_tags(),
            special_replacements: default_special_replacements(),
            curated_merges: default_curated_merges(),
            synonyms: default_synonyms(),
            domains: default_domains(),
            generic_tags: default_generic_tags(),
        }
    }
}

impl AnalyzerConfig {
    /// Parse and validate a JSON configuration.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: AnalyzerConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Pre-flight check. Any error here is fatal to the run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.similarity_threshold > 0.0 && self.similarity_threshold <= 1.0) {
            return Err(ConfigError::SimilarityThreshold(self.similarity_threshold));
        }
        if !(self.cluster_threshold > 0.0 && self.cluster_threshold < 1.0) {
            return Err(ConfigError::ClusterThreshold(self.cluster_threshold));
        }
        if !(self.usage_percentile > 0.0 && self.usage_percentile <= 1.0) {
            return Err(ConfigError::UsagePercentile(self.usage_percentile));
        }
        if self.recent_window_years < 1 {
            return Err(ConfigError::RecentWindow(self.recent_window_years));
        }
        let weight_sum = self.quality_weights.sum();
        if (weight_sum - 1.0).abs() > 1e-6 {
            return Err(ConfigError::WeightSum(weight_sum));
        }
        if self.domains.is_empty() {
            return Err(ConfigError::EmptyTable("domains"));
        }
        for rule in &self.domains {
            if rule.keywords.is_empty() && rule.prefixes.is_empty() && rule.suffixes.is_empty() {
                return Err(ConfigError::EmptyDomainRule(rule.name.clone()));
            }
        }
        if self.synonyms.is_empty() {
            return Err(ConfigError::EmptyTable("synonyms"));
        }
        Ok(())
    }
}

fn default_stop_tags() -> IndexSet<String> {
    [
        "you", "we", "they", "it", "the", "and", "for", "hfootnote", "mathematical",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_special_replacements() -> IndexMap<String, String> {
    [
        ("k-12", "k_12"),
        ("k12", "k_12"),
        ("e-learning", "online_learning"),
        ("elearning", "online_learning"),
        ("mooc", "moocs"),
        ("ai", "artificial_intelligence"),
        ("ml", "machine_learning"),
        ("dl", "deep_learning"),
        ("ict", "information_communication_technology"),
        ("hci", "human_computer_interaction"),
        ("ux", "user_experience"),
        ("ui", "user_interface"),
        ("pd", "professional_development"),
        ("cpd", "continuing_professional_development"),
        ("vr", "virtual_reality"),
        ("ar", "augmented_reality"),
        ("llm", "large_language_models"),
        ("llms", "large_language_models"),
        ("genai", "generative_ai"),
        ("gen-ai", "generative_ai"),
        ("gen_ai", "generative_ai"),
    ]
    .iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

fn default_curated_merges() -> IndexMap<String, String> {
    [
        ("higher_ed", "higher_education"),
        ("university", "higher_education"),
        ("distance_learning", "online_learning"),
        ("massive_open_online_courses", "moocs"),
        ("lit_review", "literature_review"),
        ("systematic_literature_review", "systematic_review"),
    ]
    .iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

fn default_synonyms() -> IndexMap<String, Vec<String>> {
    fn entry(concept: &str, variants: &[&str]) -> (String, Vec<String>) {
        (
            concept.to_string(),
            variants.iter().map(|v| v.to_string()).collect(),
        )
    }
    IndexMap::from_iter([
        entry(
            "education",
            &["teaching", "learning", "pedagogy", "instruction", "didactic", "schooling"],
        ),
        entry(
            "assessment",
            &["evaluation", "testing", "grading", "examination", "appraisal", "measurement"],
        ),
        entry(
            "technology",
            &["tech", "digital", "computer", "computational", "software", "electronic"],
        ),
        entry(
            "research",
            &["study", "investigation", "analysis", "inquiry", "survey", "experiment"],
        ),
        entry(
            "professional",
            &["teacher", "educator", "faculty", "instructor", "practitioner", "mentor"],
        ),
        entry(
            "development",
            &["training", "growth", "improvement", "advancement", "enhancement"],
        ),
        entry(
            "online",
            &["virtual", "remote", "distance", "web", "internet", "networked"],
        ),
        entry(
            "student",
            &["learner", "pupil", "scholar", "trainee", "mentee", "participant"],
        ),
        entry(
            "artificial",
            &["machine", "automated", "algorithmic", "robotic", "intelligent"],
        ),
        entry(
            "collaborative",
            &["cooperative", "joint", "shared", "collective", "participatory"],
        ),
        entry(
            "cognitive",
            &["thinking", "mental", "intellectual", "reasoning", "metacognition"],
        ),
        entry(
            "knowledge",
            &["understanding", "comprehension", "awareness", "expertise", "insight"],
        ),
    ])
}

fn default_domains() -> Vec<DomainRule> {
    fn rule(name: &str, keywords: &[&str], prefixes: &[&str], suffixes: &[&str]) -> DomainRule {
        DomainRule {
            name: name.to_string(),
            keywords: keywords.iter().map(|s| s.to_string()).collect(),
            prefixes: prefixes.iter().map(|s| s.to_string()).collect(),
            suffixes: suffixes.iter().map(|s| s.to_string()).collect(),
        }
    }
    vec![
        rule(
            "education",
            &["learning", "education", "pedagogy", "teaching", "student", "classroom", "curriculum", "instruction", "school", "academic"],
            &["edu_", "teach_"],
            &["_education", "_learning"],
        ),
        rule(
            "ai",
            &["ai", "artificial", "machine", "intelligence", "algorithm", "automated", "computational", "neural", "generative"],
            &["ai_", "ml_", "intelligent_"],
            &["_ai"],
        ),
        rule(
            "research",
            &["research", "method", "study", "analysis", "theory", "framework", "empirical", "qualitative", "quantitative"],
            &["research_"],
            &["_research", "_method", "_analysis", "_study"],
        ),
        rule(
            "professional",
            &["teacher", "professional", "development", "training", "practice", "competency", "faculty", "educator"],
            &["professional_", "teacher_"],
            &["_development", "_training"],
        ),
        rule(
            "social",
            &["social", "online", "community", "collaborative", "network", "interaction", "communication", "virtual", "media"],
            &["social_", "online_"],
            &["_community", "_network"],
        ),
        rule(
            "technology",
            &["technology", "tech", "digital", "computer", "software", "platform", "tool", "system", "interface"],
            &["tech_", "digital_", "computer_"],
            &["_technology", "_system"],
        ),
        rule(
            "assessment",
            &["assessment", "evaluation", "testing", "measurement", "feedback", "grading", "performance", "rubric"],
            &["assess_", "evaluat_"],
            &["_assessment", "_evaluation"],
        ),
        rule(
            "cognitive",
            &["cognit", "thinking", "metacognition", "knowledge", "understanding", "reasoning", "critical", "creative"],
            &["meta_"],
            &["_thinking", "_knowledge"],
        ),
    ]
}

fn default_generic_tags() -> IndexSet<String> {
    [
        "education", "technology", "learning", "study", "research", "article", "paper",
        "analysis", "review", "method", "data",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}
