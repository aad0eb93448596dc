//! Recommendation merging
//!
//! Blends the generative analysis with market-rule recommendations.
//! The generative lines lead each bucket when present; the rule-based
//! lines always follow so a failed generative pass still yields
//! actionable output.

use marketlens_core::{GenerativeOutcome, MarketAnalysis, Recommendations};

/// Fixed follow-up checklist appended to every analysis
const NEXT_STEPS: [&str; 4] = [
    "Valider les hypothèses par une étude terrain",
    "Analyser les réglementations locales",
    "Estimer l'investissement initial requis",
    "Définir le business plan détaillé",
];

/// Merge market rules and the generative analysis into recommendations
pub fn generate_recommendations(
    market: &MarketAnalysis,
    generative: &GenerativeOutcome,
) -> Recommendations {
    let mut recommendations = Recommendations::default();

    if let Some(analysis) = generative.analysis.as_ref().filter(|_| generative.success) {
        if !analysis.action_prioritaire.is_empty() {
            recommendations
                .priority_actions
                .push(analysis.action_prioritaire.clone());
        }
        if !analysis.positionnement_conseille.is_empty() {
            recommendations
                .strategic_advice
                .push(analysis.positionnement_conseille.clone());
        }
    }

    let summary = &market.market_summary;
    let metrics = &market.opportunity_metrics;

    if summary.total_competitors == 0 {
        recommendations
            .priority_actions
            .push("Valider la demande locale avant l'investissement".to_string());
        recommendations
            .strategic_advice
            .push("Positionnement pionnier - miser sur la visibilité".to_string());
    } else if summary.total_competitors > 10 {
        recommendations
            .risk_mitigation
            .push("Étudier la différenciation forte nécessaire".to_string());
    }

    if summary.avg_rating > 0.0 && summary.avg_rating < 3.5 {
        recommendations
            .strategic_advice
            .push("Opportunité de qualité supérieure identifiée".to_string());
    } else if summary.avg_rating >= 4.2 {
        recommendations
            .risk_mitigation
            .push("Niveau d'excellence élevé requis".to_string());
    }

    if metrics.opportunity_score >= 70 {
        recommendations
            .success_factors
            .push("Marché favorable - exécution qualitative essentielle".to_string());
    } else if metrics.opportunity_score <= 40 {
        recommendations
            .risk_mitigation
            .push("Marché difficile - validation approfondie recommandée".to_string());
    }

    for opportunity in market.strategic_insights.main_opportunities.iter().take(2) {
        recommendations.strategic_advice.push(opportunity.clone());
    }
    for risk in market.strategic_insights.key_risks.iter().take(2) {
        recommendations.risk_mitigation.push(risk.clone());
    }

    recommendations.next_steps = NEXT_STEPS.iter().map(|s| s.to_string()).collect();

    recommendations
}

#[cfg(test)]
mod tests {
    use super::*;
    use marketlens_core::{
        ConfidenceLevel, EntryDifficulty, GenerativeAnalysis, GenerativePerformance,
        GeographicAdvantage, MarketSummary, OpportunityMetrics, QualityGap, SaturationLevel,
        StrategicInsights,
    };

    fn market(total: usize, avg_rating: f64, opportunity_score: u8) -> MarketAnalysis {
        MarketAnalysis {
            competitors: Vec::new(),
            market_summary: MarketSummary {
                total_competitors: total,
                avg_rating,
                ..MarketSummary::empty()
            },
            opportunity_metrics: OpportunityMetrics {
                opportunity_score,
                market_saturation: SaturationLevel::Low,
                quality_gap: QualityGap::Moderate,
                geographic_advantage: GeographicAdvantage::Moderate,
                entry_difficulty: EntryDifficulty::Moderate,
                high_performers_count: 0,
                weak_performers_count: 0,
                close_competitors_count: 0,
                positioning_advice: Vec::new(),
            },
            strategic_insights: StrategicInsights {
                main_opportunities: vec!["Opp A".to_string(), "Opp B".to_string(), "Opp C".to_string()],
                key_risks: vec!["Risque A".to_string()],
                success_factors: Vec::new(),
                differentiation_potential: Vec::new(),
            },
        }
    }

    fn successful_outcome() -> GenerativeOutcome {
        GenerativeOutcome {
            success: true,
            analysis: Some(GenerativeAnalysis {
                score_succes: 70,
                niveau_confiance: ConfidenceLevel::Moyen,
                atout_principal: "Atout".to_string(),
                risque_principal: "Risque".to_string(),
                action_prioritaire: "Visiter le quartier".to_string(),
                positionnement_conseille: "Milieu de gamme".to_string(),
            }),
            raw_response: String::new(),
            validation_errors: Vec::new(),
            performance: GenerativePerformance::default(),
        }
    }

    #[test]
    fn test_generative_lines_lead_the_buckets() {
        let recs = generate_recommendations(&market(5, 4.0, 60), &successful_outcome());
        assert_eq!(recs.priority_actions[0], "Visiter le quartier");
        assert_eq!(recs.strategic_advice[0], "Milieu de gamme");
    }

    #[test]
    fn test_failed_generative_still_yields_recommendations() {
        let outcome = GenerativeOutcome::failure("Erreur système: timeout", 1.0);
        let recs = generate_recommendations(&market(0, 0.0, 90), &outcome);

        assert_eq!(
            recs.priority_actions,
            vec!["Valider la demande locale avant l'investissement".to_string()]
        );
        assert!(recs
            .success_factors
            .contains(&"Marché favorable - exécution qualitative essentielle".to_string()));
        assert_eq!(recs.next_steps.len(), 4);
    }

    #[test]
    fn test_dense_low_quality_market_rules() {
        let recs = generate_recommendations(&market(12, 3.0, 35), &successful_outcome());
        assert!(recs
            .risk_mitigation
            .contains(&"Étudier la différenciation forte nécessaire".to_string()));
        assert!(recs
            .strategic_advice
            .contains(&"Opportunité de qualité supérieure identifiée".to_string()));
        assert!(recs
            .risk_mitigation
            .contains(&"Marché difficile - validation approfondie recommandée".to_string()));
    }

    #[test]
    fn test_insights_capped_at_two_each() {
        let recs = generate_recommendations(&market(5, 4.0, 60), &successful_outcome());
        assert!(recs.strategic_advice.contains(&"Opp A".to_string()));
        assert!(recs.strategic_advice.contains(&"Opp B".to_string()));
        assert!(!recs.strategic_advice.contains(&"Opp C".to_string()));
    }
}
