//! Per-competitor scoring rules
//!
//! Success is an absolute health estimate of the competitor; similarity
//! measures how directly it competes with the requested project. Both
//! feed the position and threat classifications.

use marketlens_core::{BusinessRecord, Competitor, MarketPosition, ThreatLevel};
use marketlens_geo::Candidate;

/// Success score in [0, 10]
///
/// Base 5, rating contributes up to 4 points, review popularity up to 3,
/// profile completeness up to 2. Clamped at both ends.
pub fn success_score(record: &BusinessRecord) -> f64 {
    let mut score = 5.0;

    if record.rating > 0.0 {
        score += (record.rating - 2.5) * 1.6;
    }

    if record.review_count > 0 {
        score += (record.review_count as f64 / 20.0).min(1.0) * 3.0;
    }

    if record.is_professional() {
        score += 0.5;
    }
    if record.has_address() {
        score += 0.5;
    }
    if record.has_hours() {
        score += 0.5;
    }
    if record.name.chars().count() > 5 {
        score += 0.5;
    }

    score.clamp(0.0, 10.0)
}

/// Similarity score in [0, 100]
///
/// Type match contributes up to 60 points, geographic proximity up to
/// 40. Comparison is case-insensitive.
pub fn similarity_score(target_type: &str, competitor_type: &str, distance_km: f64) -> f64 {
    let target = target_type.to_lowercase();
    let competitor = competitor_type.to_lowercase();

    let mut score: f64 = 0.0;

    if target == competitor {
        score += 60.0;
    } else if competitor.contains(&target) {
        score += 40.0;
    } else if target.contains(&competitor) {
        score += 30.0;
    }

    if distance_km <= 0.5 {
        score += 40.0;
    } else if distance_km <= 1.0 {
        score += 30.0;
    } else if distance_km <= 2.0 {
        score += 20.0;
    } else if distance_km <= 5.0 {
        score += 10.0;
    }

    score.min(100.0)
}

/// Classify a competitor's market position
pub fn market_position(success_score: f64, rating: f64) -> MarketPosition {
    if success_score >= 8.0 && rating >= 4.5 {
        MarketPosition::Leader
    } else if success_score >= 6.0 && rating >= 4.0 {
        MarketPosition::Established
    } else if success_score >= 4.0 {
        MarketPosition::Moderate
    } else {
        MarketPosition::Weak
    }
}

/// Classify the competitive threat toward the requested project
pub fn threat_level(similarity_score: f64, distance_km: f64) -> ThreatLevel {
    if similarity_score >= 80.0 && distance_km <= 1.0 {
        ThreatLevel::VeryHigh
    } else if similarity_score >= 60.0 && distance_km <= 2.0 {
        ThreatLevel::High
    } else if similarity_score >= 40.0 {
        ThreatLevel::Moderate
    } else {
        ThreatLevel::Low
    }
}

/// Score a located candidate into a full competitor
pub fn score_candidate(candidate: Candidate, target_type: &str) -> Competitor {
    let success = success_score(&candidate.record);
    let similarity = similarity_score(
        target_type,
        &candidate.record.business_type,
        candidate.distance_km,
    );
    let position = market_position(success, candidate.record.rating);
    let threat = threat_level(similarity, candidate.distance_km);

    Competitor {
        record: candidate.record,
        distance_km: candidate.distance_km,
        success_score: success,
        similarity_score: similarity,
        market_position: position,
        threat_level: threat,
    }
}

/// Opportunity score in [0, 100]
///
/// Base 50, adjusted by market density, average rating of the rated
/// competitors, and the weak/strong performer counts.
pub fn opportunity_score(competitors: &[Competitor]) -> u8 {
    let mut score: f64 = 50.0;

    let density = competitors.len();
    if density == 0 {
        score += 30.0;
    } else if density <= 3 {
        score += 20.0;
    } else if density <= 7 {
        score += 10.0;
    } else if density > 15 {
        score -= 20.0;
    }

    let ratings: Vec<f64> = competitors
        .iter()
        .filter(|c| c.record.rating > 0.0)
        .map(|c| c.record.rating)
        .collect();
    if !ratings.is_empty() {
        let avg = ratings.iter().sum::<f64>() / ratings.len() as f64;
        if avg < 3.5 {
            score += 15.0;
        } else if avg > 4.3 {
            score -= 10.0;
        }
    }

    let weak = competitors.iter().filter(|c| c.success_score <= 4.0).count() as f64;
    let strong = competitors.iter().filter(|c| c.success_score >= 8.0).count() as f64;

    score += (weak * 5.0).min(20.0);
    score -= (strong * 3.0).min(15.0);

    score.round().clamp(0.0, 100.0) as u8
}
