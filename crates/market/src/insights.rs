//! Opportunity metrics and strategic insights
//!
//! Rule-based derivations over the scored competitor set. The advice
//! and insight strings are French: they flow into the generative prompt
//! and the operator-facing report unchanged.

use marketlens_core::{
    Competitor, EntryDifficulty, GeographicAdvantage, MarketSummary, OpportunityMetrics,
    QualityGap, QualityLevel, SaturationLevel, StrategicInsights,
};

use crate::metrics::opportunity_score;

/// Derive the opportunity metrics for one competitor set
pub fn opportunity_metrics(competitors: &[Competitor]) -> OpportunityMetrics {
    let high_performers = competitors.iter().filter(|c| c.success_score >= 7.0).count();
    let weak_performers = competitors.iter().filter(|c| c.success_score <= 4.0).count();
    let close_competitors = competitors.iter().filter(|c| c.distance_km <= 1.0).count();

    OpportunityMetrics {
        opportunity_score: opportunity_score(competitors),
        market_saturation: assess_saturation(competitors),
        quality_gap: identify_quality_gap(competitors),
        geographic_advantage: assess_geographic_advantage(competitors),
        entry_difficulty: assess_entry_difficulty(competitors),
        high_performers_count: high_performers,
        weak_performers_count: weak_performers,
        close_competitors_count: close_competitors,
        positioning_advice: positioning_advice(competitors),
    }
}

/// Saturation from density and immediate proximity
pub fn assess_saturation(competitors: &[Competitor]) -> SaturationLevel {
    let density = competitors.len();
    let close = competitors.iter().filter(|c| c.distance_km <= 1.0).count();

    if density > 15 && close > 5 {
        SaturationLevel::VeryHigh
    } else if density > 10 {
        SaturationLevel::High
    } else if density > 5 {
        SaturationLevel::Moderate
    } else {
        SaturationLevel::Low
    }
}

/// Room left for a higher-quality entrant
pub fn identify_quality_gap(competitors: &[Competitor]) -> QualityGap {
    if competitors.is_empty() {
        return QualityGap::NotAssessable;
    }

    let ratings: Vec<f64> = competitors
        .iter()
        .filter(|c| c.record.rating > 0.0)
        .map(|c| c.record.rating)
        .collect();
    if ratings.is_empty() {
        return QualityGap::InsufficientData;
    }

    let avg = ratings.iter().sum::<f64>() / ratings.len() as f64;
    let weak = ratings.iter().filter(|&&r| r < 3.5).count();

    if avg < 3.5 && weak >= 3 {
        QualityGap::Significant
    } else if avg < 4.0 {
        QualityGap::Moderate
    } else {
        QualityGap::Low
    }
}

/// Geographic advantage from immediate and nearby competitor counts
pub fn assess_geographic_advantage(competitors: &[Competitor]) -> GeographicAdvantage {
    if competitors.is_empty() {
        return GeographicAdvantage::VeryHigh;
    }

    let close = competitors.iter().filter(|c| c.distance_km <= 0.5).count();
    let nearby = competitors.iter().filter(|c| c.distance_km <= 1.5).count();

    if close == 0 {
        GeographicAdvantage::High
    } else if nearby <= 2 {
        GeographicAdvantage::Moderate
    } else {
        GeographicAdvantage::Low
    }
}

/// Entry difficulty from density and the strong performer count
pub fn assess_entry_difficulty(competitors: &[Competitor]) -> EntryDifficulty {
    let strong = competitors.iter().filter(|c| c.success_score >= 7.0).count();
    let total = competitors.len();

    if total > 15 && strong >= 5 {
        EntryDifficulty::VeryHigh
    } else if total > 10 || strong >= 3 {
        EntryDifficulty::High
    } else if total > 5 {
        EntryDifficulty::Moderate
    } else {
        EntryDifficulty::Low
    }
}

/// Rule-based positioning advice
pub fn positioning_advice(competitors: &[Competitor]) -> Vec<String> {
    if competitors.is_empty() {
        return vec!["Marché vierge - Positionnement libre".to_string()];
    }

    let mut advice = Vec::new();

    let ratings: Vec<f64> = competitors
        .iter()
        .filter(|c| c.record.rating > 0.0)
        .map(|c| c.record.rating)
        .collect();
    if !ratings.is_empty() {
        let avg = ratings.iter().sum::<f64>() / ratings.len() as f64;
        if avg < 3.8 {
            advice.push("Miser sur la qualité supérieure".to_string());
        }
    }

    let weak = competitors.iter().filter(|c| c.success_score <= 4.0).count();
    if weak >= 3 {
        advice.push("Opportunité de rachat/remplacement".to_string());
    }

    let professional = competitors
        .iter()
        .filter(|c| c.record.is_professional())
        .count();
    if (professional as f64) < competitors.len() as f64 * 0.5 {
        advice.push("Certification professionnelle comme avantage".to_string());
    }

    if advice.is_empty() {
        advice.push("Différenciation par le service".to_string());
    }
    advice
}

/// Derive the qualitative strategic insights
pub fn strategic_insights(
    competitors: &[Competitor],
    summary: &MarketSummary,
    metrics: &OpportunityMetrics,
) -> StrategicInsights {
    let mut insights = StrategicInsights::default();

    if metrics.weak_performers_count >= 3 {
        insights
            .main_opportunities
            .push("Marché avec plusieurs acteurs faibles à challenger".to_string());
    }
    if summary.avg_rating > 0.0 && summary.avg_rating < 3.5 {
        insights
            .main_opportunities
            .push("Qualité générale faible - opportunité d'excellence".to_string());
    }
    if metrics.geographic_advantage == GeographicAdvantage::High {
        insights
            .main_opportunities
            .push("Zone géographique sous-desservie".to_string());
    }

    if summary.total_competitors > 10 {
        insights.key_risks.push("Marché très concurrentiel".to_string());
    }
    if metrics.high_performers_count >= 5 {
        insights.key_risks.push("Plusieurs leaders établis".to_string());
    }
    if metrics.close_competitors_count >= 3 {
        insights
            .key_risks
            .push("Forte densité concurrentielle immédiate".to_string());
    }

    let mut by_success: Vec<&Competitor> = competitors.iter().collect();
    by_success.sort_by(|a, b| {
        b.success_score
            .partial_cmp(&a.success_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    let top_ratings: Vec<f64> = by_success
        .iter()
        .take(3)
        .filter(|c| c.record.rating > 0.0)
        .map(|c| c.record.rating)
        .collect();
    if !top_ratings.is_empty() {
        let avg_top = top_ratings.iter().sum::<f64>() / top_ratings.len() as f64;
        insights.success_factors.push(format!(
            "Excellence qualité requise (top performers: {avg_top:.1}/5)"
        ));
    }

    if summary.quality_level == QualityLevel::Adequate {
        insights
            .differentiation_potential
            .push("Différenciation par la qualité de service".to_string());
    }

    insights
}

/// Insights for a market with no competitors
pub fn pioneer_insights() -> StrategicInsights {
    StrategicInsights {
        main_opportunities: vec!["Marché pionnier sans concurrence".to_string()],
        key_risks: vec![
            "Demande à valider".to_string(),
            "Investissement en visibilité".to_string(),
        ],
        success_factors: vec![
            "Qualité de service".to_string(),
            "Marketing local".to_string(),
        ],
        differentiation_potential: vec!["Premier entrant sur le marché".to_string()],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::score_candidate;
    use crate::summary::summarize;
    use marketlens_core::BusinessRecord;
    use marketlens_geo::Candidate;
    use serde_json::json;

    fn competitor(rating: f64, reviews: u32, distance: f64, professional: bool) -> Competitor {
        let record: BusinessRecord = serde_json::from_value(json!({
            "name": "Concurrent",
            "type": "Restaurant",
            "note_moyenne": rating,
            "nombre_avis": reviews,
            "professional": if professional { "true" } else { "false" }
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
    fn test_saturation_bands() {
        let sparse = vec![competitor(4.0, 10, 2.0, true); 3];
        assert_eq!(assess_saturation(&sparse), SaturationLevel::Low);

        let crowded = vec![competitor(4.0, 10, 0.5, true); 16];
        assert_eq!(assess_saturation(&crowded), SaturationLevel::VeryHigh);

        let dense_but_spread = vec![competitor(4.0, 10, 3.0, true); 12];
        assert_eq!(assess_saturation(&dense_but_spread), SaturationLevel::High);
    }

    #[test]
    fn test_quality_gap_cases() {
        assert_eq!(identify_quality_gap(&[]), QualityGap::NotAssessable);

        let unrated = vec![competitor(0.0, 0, 1.0, false); 2];
        assert_eq!(identify_quality_gap(&unrated), QualityGap::InsufficientData);

        let poor = vec![competitor(2.5, 5, 1.0, false); 3];
        assert_eq!(identify_quality_gap(&poor), QualityGap::Significant);

        let strong = vec![competitor(4.5, 50, 1.0, true); 3];
        assert_eq!(identify_quality_gap(&strong), QualityGap::Low);
    }

    #[test]
    fn test_geographic_advantage_cases() {
        assert_eq!(assess_geographic_advantage(&[]), GeographicAdvantage::VeryHigh);

        let distant = vec![competitor(4.0, 10, 3.0, true); 4];
        assert_eq!(assess_geographic_advantage(&distant), GeographicAdvantage::High);

        let packed = vec![competitor(4.0, 10, 0.3, true); 4];
        assert_eq!(assess_geographic_advantage(&packed), GeographicAdvantage::Low);
    }

    #[test]
    fn test_entry_difficulty_cases() {
        assert_eq!(assess_entry_difficulty(&[]), EntryDifficulty::Low);

        let strong = vec![competitor(4.9, 60, 1.0, true); 3];
        assert_eq!(assess_entry_difficulty(&strong), EntryDifficulty::High);

        let wall = vec![competitor(4.9, 60, 1.0, true); 16];
        assert_eq!(assess_entry_difficulty(&wall), EntryDifficulty::VeryHigh);
    }

    #[test]
    fn test_positioning_advice_rules() {
        assert_eq!(
            positioning_advice(&[]),
            vec!["Marché vierge - Positionnement libre".to_string()]
        );

        // Low ratings, mostly uncertified
        let weak_market = vec![
            competitor(1.5, 0, 1.0, false),
            competitor(1.4, 0, 1.0, false),
            competitor(1.6, 0, 1.0, false),
        ];
        let advice = positioning_advice(&weak_market);
        assert!(advice.contains(&"Miser sur la qualité supérieure".to_string()));
        assert!(advice.contains(&"Opportunité de rachat/remplacement".to_string()));
        assert!(advice.contains(&"Certification professionnelle comme avantage".to_string()));

        // Healthy certified market gets the default line
        let healthy = vec![competitor(4.5, 50, 2.0, true); 4];
        assert_eq!(
            positioning_advice(&healthy),
            vec!["Différenciation par le service".to_string()]
        );
    }

    #[test]
    fn test_strategic_insights_risks_on_dense_market() {
        let competitors: Vec<_> = (0..12).map(|_| competitor(4.8, 60, 0.4, true)).collect();
        let summary = summarize(&competitors);
        let metrics = opportunity_metrics(&competitors);
        let insights = strategic_insights(&competitors, &summary, &metrics);

        assert!(insights.key_risks.contains(&"Marché très concurrentiel".to_string()));
        assert!(insights.key_risks.contains(&"Plusieurs leaders établis".to_string()));
        assert!(insights
            .key_risks
            .contains(&"Forte densité concurrentielle immédiate".to_string()));
        assert!(!insights.success_factors.is_empty());
    }
}
