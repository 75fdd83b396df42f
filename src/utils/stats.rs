//! Small statistics helpers shared by the scorers and vocabulary
//! summaries.

use serde::Serialize;

/// Usage distribution buckets for a tag vocabulary.
///
/// The bucket boundaries (1 / 2-5 / 6-20 / >20 uses) are the ones the
/// curation workflow reviews against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct UsageDistribution {
    pub single_use: usize,
    pub rare_use: usize,
    pub moderate_use: usize,
    pub common_use: usize,
}

impl UsageDistribution {
    pub fn from_counts<I>(counts: I) -> Self
    where
        I: IntoIterator<Item = usize>,
    {
        let mut dist = UsageDistribution::default();
        for count in counts {
            match count {
                0 => {}
                1 => dist.single_use += 1,
                2..=5 => dist.rare_use += 1,
                6..=20 => dist.moderate_use += 1,
                _ => dist.common_use += 1,
            }
        }
        dist
    }
}

/// Percentile of a sample by the nearest-rank method.
///
/// `q` is a fraction in `(0, 1]`. Returns 0.0 for an empty sample.
pub fn percentile(values: &[usize], q: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_unstable();
    let q = q.clamp(0.0, 1.0);
    let rank = (q * sorted.len() as f64).ceil() as usize;
    sorted[rank.saturating_sub(1).min(sorted.len() - 1)] as f64
}

/// Population variance of a sample. Returns 0.0 for fewer than two
/// values.
pub fn variance(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n
}
