//! Temporal trend classification over per-tag year histograms.
//!
//! The "recent" window is the most recent two calendar years relative
//! to a reference year — by default the latest year observed anywhere
//! in the index, so a frozen corpus snapshot classifies the same way
//! on every run. Tags with fewer than two distinct observed years
//! carry too little signal and are reported separately instead of
//! being forced into a class.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::analyzer::config::AnalyzerConfig;
use crate::analyzer::index::TagIndex;

/// Emerging above this share of recent usage, declining below the
/// complementary bound.
const EMERGING_RATIO: f64 = 0.70;
const DECLINING_RATIO: f64 = 0.30;

/// Trend class with its class-specific metrics.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "class", rename_all = "snake_case")]
pub enum TrendClass {
    Emerging { strength: f64, first_seen: i32 },
    Declining { decline_rate: f64, peak_year: i32 },
    Periodic,
    Stable,
}

/// One classified tag.
#[derive(Debug, Clone, Serialize)]
pub struct TrendRecord {
    pub tag: String,
    pub total_uses: u32,
    pub years_active: usize,
    pub recent_ratio: f64,
    pub trend: TrendClass,
}

/// A tag excluded from classification for lack of history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InsufficientHistory {
    pub tag: String,
    pub total_uses: u32,
}

/// Full trend report for one index snapshot.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TrendReport {
    pub reference_year: Option<i32>,
    pub records: Vec<TrendRecord>,
    pub insufficient: Vec<InsufficientHistory>,
}

/// Classify every tag that has a year histogram.
pub fn classify_trends(index: &TagIndex, config: &AnalyzerConfig) -> TrendReport {
    let reference_year = config.reference_year.or_else(|| index.max_year());
    let Some(reference) = reference_year else {
        // no dated document anywhere: nothing is classifiable
        return TrendReport::default();
    };
    let window_start = reference - (config.recent_window_years - 1);

    let mut report = TrendReport {
        reference_year: Some(reference),
        ..TrendReport::default()
    };

    for (tag, years) in index.tag_years() {
        let total: u32 = years.values().sum();
        if years.len() < 2 {
            report.insufficient.push(InsufficientHistory {
                tag: tag.clone(),
                total_uses: total,
            });
            continue;
        }

        let recent: u32 = years
            .range(window_start..=reference)
            .map(|(_, count)| count)
            .sum();
        let recent_ratio = recent as f64 / total as f64;

        let trend = if recent_ratio > EMERGING_RATIO {
            TrendClass::Emerging {
                strength: recent_ratio,
                first_seen: first_year(years),
            }
        } else if recent_ratio < DECLINING_RATIO {
            TrendClass::Declining {
                decline_rate: 1.0 - recent_ratio,
                peak_year: peak_year(years),
            }
        } else if has_gap(years) {
            TrendClass::Periodic
        } else {
            TrendClass::Stable
        };

        report.records.push(TrendRecord {
            tag: tag.clone(),
            total_uses: total,
            years_active: years.len(),
            recent_ratio,
            trend,
        });
    }
    report
}

fn first_year(years: &BTreeMap<i32, u32>) -> i32 {
    years.keys().next().copied().unwrap_or_default()
}

/// Year with the highest count; earliest year wins ties.
fn peak_year(years: &BTreeMap<i32, u32>) -> i32 {
    let mut best_year = first_year(years);
    let mut best_count = 0;
    for (&year, &count) in years {
        if count > best_count {
            best_year = year;
            best_count = count;
        }
    }
    best_year
}

/// Whether some year with zero uses lies strictly between two years
/// with uses. The histogram stores only non-zero years, so a gap
/// exists exactly when the span exceeds the number of active years.
fn has_gap(years: &BTreeMap<i32, u32>) -> bool {
    let (Some(&min), Some(&max)) = (years.keys().next(), years.keys().next_back()) else {
        return false;
    };
    (max - min + 1) as usize > years.len()
}
