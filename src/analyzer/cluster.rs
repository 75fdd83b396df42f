//! Greedy co-occurrence clustering: human-reviewable tag
//! neighborhoods grown around high-connectivity seeds.
//!
//! Deliberately simple and deterministic rather than globally
//! optimal. Seeds are tags with more than `min_seed_partners`
//! distinct co-occurring partners, processed in usage order (ties
//! break lexically). A partner joins the current cluster when its
//! co-occurrence count divided by the seed's usage strictly exceeds
//! the cluster threshold and it has not been claimed yet — first
//! claim wins, so no tag ever belongs to two clusters.

use serde::Serialize;
use std::collections::HashSet;
use tracing::debug;

use crate::analyzer::config::AnalyzerConfig;
use crate::analyzer::index::TagIndex;

/// One seed-grown neighborhood. `tags` always starts with the seed.
#[derive(Debug, Clone, Serialize)]
pub struct Cluster {
    pub seed: String,
    pub tags: Vec<String>,
    pub total_uses: usize,
}

/// Partition high-connectivity regions of the co-occurrence graph
/// into clusters. Clusters come back in seed processing order.
pub fn find_clusters(index: &TagIndex, config: &AnalyzerConfig) -> Vec<Cluster> {
    let matrix = index.cooccurrence();

    let mut seeds: Vec<&str> = index
        .vocabulary()
        .filter(|tag| matrix.partner_count(tag) > config.min_seed_partners)
        .collect();
    seeds.sort_by(|a, b| {
        index
            .usage(b)
            .cmp(&index.usage(a))
            .then_with(|| a.cmp(b))
    });
    debug!(candidates = seeds.len(), "cluster seed candidates");

    let mut assigned: HashSet<&str> = HashSet::new();
    let mut clusters = Vec::new();

    for seed in seeds {
        if assigned.contains(seed) {
            continue;
        }
        assigned.insert(seed);
        let seed_usage = index.usage(seed);

        let mut members = vec![seed];
        // sorted partner walk keeps the reported member order stable;
        // membership itself is order-independent (all tests are
        // against the seed)
        let mut partners: Vec<(&str, u32)> = matrix.partners(seed).collect();
        partners.sort_by(|a, b| a.0.cmp(b.0));
        for (partner, co_count) in partners {
            if assigned.contains(partner) {
                continue;
            }
            let strength = co_count as f64 / seed_usage as f64;
            if strength > config.cluster_threshold {
                members.push(partner);
                assigned.insert(partner);
            }
        }

        let total_uses = members.iter().map(|tag| index.usage(tag)).sum();
        clusters.push(Cluster {
            seed: seed.to_string(),
            tags: members.into_iter().map(|t| t.to_string()).collect(),
            total_uses,
        });
    }
    clusters
}
