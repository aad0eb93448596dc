//! Market summary aggregation

use std::collections::HashMap;

use marketlens_core::{Competitor, MarketDensity, MarketSummary, QualityLevel};

/// Aggregate one scored competitor set into a market summary
pub fn summarize(competitors: &[Competitor]) -> MarketSummary {
    if competitors.is_empty() {
        return MarketSummary::empty();
    }

    let ratings: Vec<f64> = competitors
        .iter()
        .filter(|c| c.record.rating > 0.0)
        .map(|c| c.record.rating)
        .collect();

    let avg_review_count = mean(competitors.iter().map(|c| c.record.review_count as f64));
    let avg_success_score = mean(competitors.iter().map(|c| c.success_score));
    let avg_distance_km = mean(competitors.iter().map(|c| c.distance_km));

    let mut position_distribution: HashMap<String, usize> = HashMap::new();
    for c in competitors {
        *position_distribution
            .entry(c.market_position.to_string())
            .or_insert(0) += 1;
    }

    let mut threat_distribution: HashMap<String, usize> = HashMap::new();
    for c in competitors {
        *threat_distribution
            .entry(c.threat_level.to_string())
            .or_insert(0) += 1;
    }

    MarketSummary {
        total_competitors: competitors.len(),
        avg_rating: round2(mean(ratings.iter().copied())),
        median_rating: round2(median(&ratings)),
        avg_review_count: avg_review_count.round(),
        avg_success_score: round1(avg_success_score),
        avg_distance_km: round2(avg_distance_km),
        market_density: assess_density(competitors.len()),
        quality_level: assess_quality(&ratings),
        position_distribution,
        threat_distribution,
    }
}

/// Density classification from competitor count
pub fn assess_density(count: usize) -> MarketDensity {
    match count {
        0 => MarketDensity::Empty,
        1..=3 => MarketDensity::Low,
        4..=8 => MarketDensity::Moderate,
        9..=15 => MarketDensity::High,
        _ => MarketDensity::Saturated,
    }
}

/// Quality classification from the rated competitors' average
pub fn assess_quality(ratings: &[f64]) -> QualityLevel {
    if ratings.is_empty() {
        return QualityLevel::Unknown;
    }

    let avg = ratings.iter().sum::<f64>() / ratings.len() as f64;
    if avg >= 4.2 {
        QualityLevel::VeryHigh
    } else if avg >= 3.8 {
        QualityLevel::High
    } else if avg >= 3.2 {
        QualityLevel::Adequate
    } else {
        QualityLevel::Low
    }
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let collected: Vec<f64> = values.collect();
    if collected.is_empty() {
        return 0.0;
    }
    collected.iter().sum::<f64>() / collected.len() as f64
}

fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::score_candidate;
    use marketlens_core::BusinessRecord;
    use marketlens_geo::Candidate;
    use serde_json::json;

    fn competitor(rating: f64, reviews: u32, distance: f64) -> Competitor {
        let record: BusinessRecord = serde_json::from_value(json!({
            "name": "Concurrent",
            "type": "Restaurant",
            "note_moyenne": rating,
            "nombre_avis": reviews
        }))
        .unwrap();
        score_candidate(
            Candidate {
                record,
                distance_km: distance,
            },
            "Restaurant",
        )
    }

    #[test]
    fn test_empty_summary() {
        let summary = summarize(&[]);
        assert_eq!(summary.total_competitors, 0);
        assert_eq!(summary.market_density, MarketDensity::Empty);
        assert_eq!(summary.quality_level, QualityLevel::Unknown);
    }

    #[test]
    fn test_unrated_competitors_excluded_from_rating_stats() {
        let competitors = vec![competitor(0.0, 0, 1.0), competitor(4.0, 10, 2.0)];
        let summary = summarize(&competitors);
        assert_eq!(summary.avg_rating, 4.0);
        assert_eq!(summary.median_rating, 4.0);
        assert_eq!(summary.total_competitors, 2);
    }

    #[test]
    fn test_median_even_count() {
        let competitors = vec![competitor(3.0, 0, 1.0), competitor(4.0, 0, 1.0)];
        let summary = summarize(&competitors);
        assert_eq!(summary.median_rating, 3.5);
    }

    #[test]
    fn test_density_bands() {
        assert_eq!(assess_density(0), MarketDensity::Empty);
        assert_eq!(assess_density(3), MarketDensity::Low);
        assert_eq!(assess_density(8), MarketDensity::Moderate);
        assert_eq!(assess_density(15), MarketDensity::High);
        assert_eq!(assess_density(16), MarketDensity::Saturated);
    }

    #[test]
    fn test_quality_bands() {
        assert_eq!(assess_quality(&[]), QualityLevel::Unknown);
        assert_eq!(assess_quality(&[4.5, 4.2]), QualityLevel::VeryHigh);
        assert_eq!(assess_quality(&[3.9]), QualityLevel::High);
        assert_eq!(assess_quality(&[3.3]), QualityLevel::Adequate);
        assert_eq!(assess_quality(&[2.0]), QualityLevel::Low);
    }

    #[test]
    fn test_distributions_count_labels() {
        let competitors = vec![competitor(4.8, 50, 0.3), competitor(1.5, 0, 4.0)];
        let summary = summarize(&competitors);
        let total: usize = summary.position_distribution.values().sum();
        assert_eq!(total, 2);
        let total: usize = summary.threat_distribution.values().sum();
        assert_eq!(total, 2);
    }
}
