//! Bridge tag detection and subject-domain analysis.
//!
//! Domains are named keyword/prefix/suffix rules supplied as
//! configuration data — a transparent, auditable heuristic, not a
//! learned classifier. A bridge tag is one whose co-occurring
//! partners collectively touch several distinct domains: it connects
//! otherwise separate research neighborhoods.

use indexmap::{IndexMap, IndexSet};
use serde::Serialize;

use crate::analyzer::config::AnalyzerConfig;
use crate::analyzer::index::TagIndex;

/// Association thresholds, matched to the curation workflow: a pair
/// is "strong" when it co-occurs in more than 3 documents and covers
/// more than 30% of the seed tag's usage.
const ASSOCIATION_MIN_STRENGTH: f64 = 0.3;
const ASSOCIATION_MIN_CO: u32 = 3;
/// Isolation screening: tags used more than this are expected to
/// co-occur somewhere.
const ISOLATION_MIN_USAGE: usize = 3;

/// A tag whose neighborhood spans several subject domains.
#[derive(Debug, Clone, Serialize)]
pub struct BridgeTag {
    pub tag: String,
    pub domains: Vec<String>,
    pub partner_count: usize,
    pub uses: usize,
    /// Co-occurrence mass per touched domain, averaged over the
    /// touched domains.
    pub strength: f64,
}

/// Per-domain vocabulary summary.
#[derive(Debug, Clone, Serialize)]
pub struct DomainSummary {
    pub name: String,
    pub unique_tags: usize,
    pub total_uses: usize,
    /// Share of all categorized uses, in percent.
    pub share: f64,
    pub top_tags: Vec<(String, usize)>,
}

/// A tag matching more than one domain rule.
#[derive(Debug, Clone, Serialize)]
pub struct CrossDomainTag {
    pub tag: String,
    pub domains: Vec<String>,
    pub uses: usize,
}

/// Vocabulary-wide domain categorization.
#[derive(Debug, Clone, Serialize)]
pub struct DomainDistribution {
    pub domains: Vec<DomainSummary>,
    pub cross_domain: Vec<CrossDomainTag>,
    pub uncategorized: Vec<(String, usize)>,
    /// Share of the vocabulary matched by at least one rule, percent.
    pub categorization_rate: f64,
}

/// A strongly associated unordered tag pair.
#[derive(Debug, Clone, Serialize)]
pub struct Association {
    pub a: String,
    pub b: String,
    pub strength: f64,
    pub co_count: u32,
}

/// Tags whose co-occurring partners touch at least
/// `bridge_min_domains` distinct domains, sorted by (domain count,
/// strength, usage) descending.
pub fn find_bridge_tags(index: &TagIndex, config: &AnalyzerConfig) -> Vec<BridgeTag> {
    let matrix = index.cooccurrence();
    let mut bridges = Vec::new();

    for tag in index.vocabulary() {
        let uses = index.usage(tag);
        if uses < config.bridge_min_usage {
            continue;
        }

        // co-occurrence mass per domain touched by the partners
        let mut domain_mass: IndexMap<&str, u64> = IndexMap::new();
        let mut partner_count = 0usize;
        for (partner, co_count) in matrix.partners(tag) {
            partner_count += 1;
            for rule in &config.domains {
                if rule.matches(partner) {
                    *domain_mass.entry(rule.name.as_str()).or_insert(0) += co_count as u64;
                }
            }
        }

        if domain_mass.len() >= config.bridge_min_domains {
            let strength =
                domain_mass.values().sum::<u64>() as f64 / domain_mass.len() as f64;
            bridges.push(BridgeTag {
                tag: tag.to_string(),
                domains: domain_mass.keys().map(|d| d.to_string()).collect(),
                partner_count,
                uses,
                strength,
            });
        }
    }

    bridges.sort_by(|x, y| {
        y.domains
            .len()
            .cmp(&x.domains.len())
            .then_with(|| y.strength.total_cmp(&x.strength))
            .then_with(|| y.uses.cmp(&x.uses))
            .then_with(|| x.tag.cmp(&y.tag))
    });
    bridges
}

/// Categorize the whole vocabulary against the domain rules.
pub fn domain_distribution(index: &TagIndex, config: &AnalyzerConfig) -> DomainDistribution {
    let mut per_domain: IndexMap<&str, Vec<(String, usize)>> = config
        .domains
        .iter()
        .map(|rule| (rule.name.as_str(), Vec::new()))
        .collect();
    let mut tag_domains: IndexMap<&str, IndexSet<&str>> = IndexMap::new();
    let mut uncategorized = Vec::new();

    for tag in index.vocabulary() {
        let uses = index.usage(tag);
        let mut matched = false;
        for rule in &config.domains {
            if rule.matches(tag) {
                matched = true;
                per_domain
                    .entry(rule.name.as_str())
                    .or_default()
                    .push((tag.to_string(), uses));
                tag_domains.entry(tag).or_default().insert(rule.name.as_str());
            }
        }
        if !matched {
            uncategorized.push((tag.to_string(), uses));
        }
    }

    let categorized_uses: usize = per_domain
        .values()
        .flat_map(|tags| tags.iter().map(|(_, uses)| uses))
        .sum();

    let domains = per_domain
        .into_iter()
        .map(|(name, mut tags)| {
            tags.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
            let total_uses: usize = tags.iter().map(|(_, uses)| uses).sum();
            let share = if categorized_uses > 0 {
                total_uses as f64 / categorized_uses as f64 * 100.0
            } else {
                0.0
            };
            DomainSummary {
                name: name.to_string(),
                unique_tags: tags.len(),
                total_uses,
                share,
                top_tags: tags.into_iter().take(8).collect(),
            }
        })
        .collect();

    let mut cross_domain: Vec<CrossDomainTag> = tag_domains
        .into_iter()
        .filter(|(_, domains)| domains.len() > 1)
        .map(|(tag, domains)| CrossDomainTag {
            tag: tag.to_string(),
            domains: domains.into_iter().map(|d| d.to_string()).collect(),
            uses: index.usage(tag),
        })
        .collect();
    cross_domain.sort_by(|x, y| {
        y.domains
            .len()
            .cmp(&x.domains.len())
            .then_with(|| y.uses.cmp(&x.uses))
            .then_with(|| x.tag.cmp(&y.tag))
    });

    let vocabulary_size = index.tag_docs().len();
    let categorization_rate = if vocabulary_size > 0 {
        (vocabulary_size - uncategorized.len()) as f64 / vocabulary_size as f64 * 100.0
    } else {
        0.0
    };
    uncategorized.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    DomainDistribution {
        domains,
        cross_domain,
        uncategorized,
        categorization_rate,
    }
}

/// Strongly associated tag pairs, deduplicated per unordered pair,
/// sorted by strength descending.
pub fn strong_associations(index: &TagIndex) -> Vec<Association> {
    let matrix = index.cooccurrence();
    let mut seen: IndexSet<(String, String)> = IndexSet::new();
    let mut associations = Vec::new();

    for tag in index.vocabulary() {
        let uses = index.usage(tag);
        if uses <= 5 {
            continue;
        }
        for (partner, co_count) in matrix.partners(tag) {
            let strength = co_count as f64 / uses as f64;
            if strength > ASSOCIATION_MIN_STRENGTH && co_count > ASSOCIATION_MIN_CO {
                let key = if tag <= partner {
                    (tag.to_string(), partner.to_string())
                } else {
                    (partner.to_string(), tag.to_string())
                };
                if seen.insert(key) {
                    associations.push(Association {
                        a: tag.to_string(),
                        b: partner.to_string(),
                        strength,
                        co_count,
                    });
                }
            }
        }
    }

    associations.sort_by(|x, y| {
        y.strength
            .total_cmp(&x.strength)
            .then_with(|| x.a.cmp(&y.a))
            .then_with(|| x.b.cmp(&y.b))
    });
    associations
}

/// Tags with real usage but almost no co-occurrence neighborhood.
pub fn isolated_tags(index: &TagIndex) -> Vec<String> {
    let matrix = index.cooccurrence();
    index
        .vocabulary()
        .filter(|tag| {
            index.usage(tag) > ISOLATION_MIN_USAGE
                && matrix.partners(tag).filter(|(_, co)| *co > 1).count() < 2
        })
        .map(|tag| tag.to_string())
        .collect()
}
