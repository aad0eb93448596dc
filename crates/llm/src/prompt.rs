//! Prompt construction
//!
//! French consultant prompts over the market analysis bundle. One
//! template per analysis depth; all three demand the same strict JSON
//! output contract. Only the top 3 competitors appear in the prompt,
//! names truncated, to keep the context small for local models.

use marketlens_core::{
    AnalysisDepth, BusinessRequest, Competitor, MarketAnalysis, StrategicInsights,
};

use crate::backend::ChatMessage;

/// System message sent with every analysis request
const SYSTEM_MESSAGE: &str = "Tu es un consultant business expert. Réponds uniquement en JSON \
valide, de manière factuelle et concise. N'utilise jamais de balises <think> ou autres \
métadonnées.";

/// The JSON contract block shared by all templates
const OUTPUT_CONTRACT: &str = r#"{
  "score_succes": [entier entre 0 et 100],
  "niveau_confiance": "[Faible/Moyen/Élevé]",
  "atout_principal": "[phrase de 15 mots max]",
  "risque_principal": "[phrase de 15 mots max]",
  "action_prioritaire": "[action concrète en 20 mots max]",
  "positionnement_conseille": "[stratégie en 25 mots max]"
}"#;

/// Builds chat messages for the generative analysis
#[derive(Debug, Clone, Default)]
pub struct PromptBuilder;

impl PromptBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Build the message pair for one analysis request
    pub fn build(
        &self,
        analysis: &MarketAnalysis,
        request: &BusinessRequest,
    ) -> Vec<ChatMessage> {
        let prompt = match request.analysis_depth {
            AnalysisDepth::Quick => self.quick_evaluation(analysis, request),
            AnalysisDepth::Standard => self.business_analysis(analysis, request),
            AnalysisDepth::Detailed => self.market_comparison(analysis, request),
        };

        vec![ChatMessage::system(SYSTEM_MESSAGE), ChatMessage::user(prompt)]
    }

    /// The connectivity self-test prompt
    pub fn self_test(&self) -> Vec<ChatMessage> {
        vec![ChatMessage::user(
            "Réponds exactement: {\"test\": \"ok\"}".to_string(),
        )]
    }

    fn business_analysis(&self, analysis: &MarketAnalysis, request: &BusinessRequest) -> String {
        format!(
            "Tu es un consultant business expert spécialisé en analyse de marché local. \
Analyse cette opportunité commerciale de manière factuelle et stratégique.\n\n\
DEMANDE CLIENT:\n\
Type d'activité: {business_type}\n\
Localisation ciblée: {location}\n\n\
ANALYSE MARCHÉ LOCAL:\n{market_statistics}\n\n\
TOP 3 CONCURRENTS DIRECTS:\n{top_competitors}\n\n\
INSIGHTS STRATÉGIQUES:\n{insights}\n\n\
MÉTRIQUES CLÉS: {key_metrics}\n\n\
TÂCHE: Fournis une analyse experte sous forme JSON strictement respectant ce format:\n\n\
{contract}\n\n\
CONTRAINTES STRICTES:\n\
- JSON valide uniquement (pas de texte avant/après)\n\
- Scores basés sur les données marché fournies\n\
- Phrases courtes et orientées action\n\
- Factuel, pas d'opinions générales",
            business_type = request.business_type,
            location = request.address,
            market_statistics = format_market_statistics(analysis),
            top_competitors = format_top_competitors(&analysis.competitors),
            insights = format_strategic_insights(&analysis.strategic_insights),
            key_metrics = format_key_metrics(analysis),
            contract = OUTPUT_CONTRACT,
        )
    }

    fn market_comparison(&self, analysis: &MarketAnalysis, request: &BusinessRequest) -> String {
        format!(
            "Analyse comparative de marché. Type: {business_type} à {location}\n\n\
CONCURRENCE ({count} acteurs):\n{top_competitors}\n\n\
BENCHMARKS MARCHÉ:\n{market_statistics}\n\n\
Analyse la position concurrentielle et réponds en JSON:\n\n{contract}",
            business_type = request.business_type,
            location = request.address,
            count = analysis.market_summary.total_competitors,
            top_competitors = format_top_competitors(&analysis.competitors),
            market_statistics = format_market_statistics(analysis),
            contract = OUTPUT_CONTRACT,
        )
    }

    fn quick_evaluation(&self, analysis: &MarketAnalysis, request: &BusinessRequest) -> String {
        format!(
            "Évaluation rapide: {business_type} - {location}\n\n\
Marché: {density}, Qualité: {quality}, Opportunité: {score}/100\n\n\
Principaux concurrents:\n{top_competitors}\n\n\
Analyse express en JSON:\n\n{contract}",
            business_type = request.business_type,
            location = request.address,
            density = analysis.market_summary.market_density,
            quality = analysis.market_summary.quality_level,
            score = analysis.opportunity_metrics.opportunity_score,
            top_competitors = format_top_competitors(&analysis.competitors),
            contract = OUTPUT_CONTRACT,
        )
    }
}

/// Format the top 3 competitors, one line each
fn format_top_competitors(competitors: &[Competitor]) -> String {
    if competitors.is_empty() {
        return "Aucun concurrent direct identifié dans la zone".to_string();
    }

    competitors
        .iter()
        .take(3)
        .enumerate()
        .map(|(i, c)| {
            let name: String = c.record.name.chars().take(40).collect();
            format!(
                "{}. {} | Note: {}/5 ({} avis) | Distance: {}km | Position: {} | Menace: {}",
                i + 1,
                name,
                c.record.rating,
                c.record.review_count,
                c.distance_km,
                c.market_position,
                c.threat_level,
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_market_statistics(analysis: &MarketAnalysis) -> String {
    let summary = &analysis.market_summary;
    let metrics = &analysis.opportunity_metrics;

    [
        format!("• Concurrents totaux: {}", summary.total_competitors),
        format!("• Note moyenne marché: {}/5", summary.avg_rating),
        format!("• Densité concurrentielle: {}", summary.market_density),
        format!("• Niveau qualité général: {}", summary.quality_level),
        format!("• Score d'opportunité: {}/100", metrics.opportunity_score),
        format!("• Saturation marché: {}", metrics.market_saturation),
        format!("• Gap qualité: {}", metrics.quality_gap),
        format!("• Avantage géographique: {}", metrics.geographic_advantage),
    ]
    .join("\n")
}

/// Top 2 opportunities and risks; anything more dilutes the prompt
fn format_strategic_insights(insights: &StrategicInsights) -> String {
    let mut lines = Vec::new();

    if !insights.main_opportunities.is_empty() {
        lines.push("OPPORTUNITÉS:".to_string());
        for opportunity in insights.main_opportunities.iter().take(2) {
            lines.push(format!("  • {opportunity}"));
        }
    }

    if !insights.key_risks.is_empty() {
        lines.push("RISQUES PRINCIPAUX:".to_string());
        for risk in insights.key_risks.iter().take(2) {
            lines.push(format!("  • {risk}"));
        }
    }

    if lines.is_empty() {
        return "Analyse stratégique en cours...".to_string();
    }
    lines.join("\n")
}

fn format_key_metrics(analysis: &MarketAnalysis) -> String {
    let summary = &analysis.market_summary;
    let metrics = &analysis.opportunity_metrics;

    format!(
        "Concurrence: {} total ({} forts, {} faibles) | Qualité: {}/5 moyenne, gap {} | \
Opportunité: {}/100, difficulté {}",
        summary.total_competitors,
        metrics.high_performers_count,
        metrics.weak_performers_count,
        summary.avg_rating,
        metrics.quality_gap.to_string().to_lowercase(),
        metrics.opportunity_score,
        metrics.entry_difficulty.to_string().to_lowercase(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use marketlens_core::{
        BusinessRecord, EntryDifficulty, GeographicAdvantage, MarketPosition, MarketSummary,
        OpportunityMetrics, QualityGap, SaturationLevel, ThreatLevel,
    };
    use serde_json::json;

    fn competitor(name: &str, rating: f64, distance: f64) -> Competitor {
        let record: BusinessRecord = serde_json::from_value(json!({
            "name": name,
            "type": "Restaurant",
            "note_moyenne": rating,
            "nombre_avis": 30
        }))
        .unwrap();
        Competitor {
            record,
            distance_km: distance,
            success_score: 7.0,
            similarity_score: 80.0,
            market_position: MarketPosition::Established,
            threat_level: ThreatLevel::High,
        }
    }

    fn analysis(competitors: Vec<Competitor>) -> MarketAnalysis {
        MarketAnalysis {
            market_summary: MarketSummary {
                total_competitors: competitors.len(),
                ..MarketSummary::empty()
            },
            opportunity_metrics: OpportunityMetrics {
                opportunity_score: 60,
                market_saturation: SaturationLevel::Moderate,
                quality_gap: QualityGap::Moderate,
                geographic_advantage: GeographicAdvantage::Moderate,
                entry_difficulty: EntryDifficulty::Moderate,
                high_performers_count: 1,
                weak_performers_count: 0,
                close_competitors_count: 1,
                positioning_advice: Vec::new(),
            },
            strategic_insights: StrategicInsights::default(),
            competitors,
        }
    }

    fn request(depth: AnalysisDepth) -> BusinessRequest {
        BusinessRequest::new("Restaurant", "Paris 75001", 5.0, depth)
    }

    #[test]
    fn test_prompt_has_system_and_user_messages() {
        let messages = PromptBuilder::new().build(
            &analysis(vec![competitor("Chez Marcel", 4.2, 0.8)]),
            &request(AnalysisDepth::Standard),
        );
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, "system");
        assert!(messages[1].content.contains("score_succes"));
        assert!(messages[1].content.contains("Chez Marcel"));
    }

    #[test]
    fn test_only_top_three_competitors_in_prompt() {
        let competitors: Vec<_> = (0..6)
            .map(|i| competitor(&format!("Concurrent{i}"), 4.0, 1.0))
            .collect();
        let messages =
            PromptBuilder::new().build(&analysis(competitors), &request(AnalysisDepth::Standard));
        assert!(messages[1].content.contains("Concurrent2"));
        assert!(!messages[1].content.contains("Concurrent3"));
    }

    #[test]
    fn test_long_names_truncated() {
        let long_name = "L".repeat(60);
        let messages = PromptBuilder::new().build(
            &analysis(vec![competitor(&long_name, 4.0, 1.0)]),
            &request(AnalysisDepth::Standard),
        );
        assert!(messages[1].content.contains(&"L".repeat(40)));
        assert!(!messages[1].content.contains(&"L".repeat(41)));
    }

    #[test]
    fn test_empty_market_line() {
        let messages =
            PromptBuilder::new().build(&analysis(Vec::new()), &request(AnalysisDepth::Standard));
        assert!(messages[1]
            .content
            .contains("Aucun concurrent direct identifié dans la zone"));
    }

    #[test]
    fn test_depth_selects_template() {
        let market = analysis(vec![competitor("X", 4.0, 1.0)]);
        let quick = PromptBuilder::new().build(&market, &request(AnalysisDepth::Quick));
        assert!(quick[1].content.starts_with("Évaluation rapide"));

        let detailed = PromptBuilder::new().build(&market, &request(AnalysisDepth::Detailed));
        assert!(detailed[1].content.starts_with("Analyse comparative"));

        let standard = PromptBuilder::new().build(&market, &request(AnalysisDepth::Standard));
        assert!(standard[1].content.contains("CONTRAINTES STRICTES"));
    }

    #[test]
    fn test_self_test_prompt() {
        let messages = PromptBuilder::new().self_test();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].content.contains("{\"test\": \"ok\"}"));
    }
}
