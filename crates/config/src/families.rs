//! Business-type family table
//!
//! Searching the store for "restaurant" alone would miss brasseries and
//! bistrots that compete for the same customers, so each known type
//! expands into a family of related directory labels.

use serde::{Deserialize, Serialize};

/// Static table mapping a business type to its related directory labels
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeFamilies {
    families: Vec<TypeFamily>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct TypeFamily {
    name: String,
    members: Vec<String>,
}

impl Default for TypeFamilies {
    fn default() -> Self {
        let families = vec![
            family(
                "restaurant",
                &["restaurant", "brasserie", "bistrot", "taverne", "café", "bar"],
            ),
            family(
                "coiffeur",
                &["coiffeur", "salon de coiffure", "barbier", "esthétique"],
            ),
            family("boulangerie", &["boulangerie", "pâtisserie", "viennoiserie"]),
            family("pharmacie", &["pharmacie", "parapharmacie"]),
            family("médecin", &["médecin", "docteur", "cabinet médical"]),
            family("dentiste", &["dentiste", "orthodontiste", "stomatologie"]),
            family("avocat", &["avocat", "cabinet d'avocat", "juriste"]),
            family("garage", &["garage", "mécanicien", "carrosserie", "auto"]),
            family(
                "immobilier",
                &["immobilier", "agence immobilière", "transaction"],
            ),
            family("banque", &["banque", "crédit", "assurance"]),
            family("hotel", &["hôtel", "hébergement", "auberge"]),
            family("magasin", &["magasin", "boutique", "commerce"]),
        ];
        Self { families }
    }
}

fn family(name: &str, members: &[&str]) -> TypeFamily {
    TypeFamily {
        name: name.to_string(),
        members: members.iter().map(|m| m.to_string()).collect(),
    }
}

impl TypeFamilies {
    /// Expand a business type into store query patterns
    ///
    /// A family matches when any of its members appears as a substring
    /// of the lowercased target. Unknown types fall back to the exact
    /// spelling plus lowercase and capitalized variants.
    pub fn patterns_for(&self, business_type: &str) -> Vec<String> {
        let target = business_type.to_lowercase();

        for family in &self.families {
            if family.members.iter().any(|member| target.contains(member.as_str())) {
                return family.members.clone();
            }
        }

        vec![
            business_type.to_string(),
            target.clone(),
            capitalize(&target),
        ]
    }
}

fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_family_expands() {
        let families = TypeFamilies::default();
        let patterns = families.patterns_for("Restaurant italien");
        assert!(patterns.contains(&"brasserie".to_string()));
        assert!(patterns.contains(&"bistrot".to_string()));
        assert_eq!(patterns.len(), 6);
    }

    #[test]
    fn test_family_member_matches_too() {
        let families = TypeFamilies::default();
        let patterns = families.patterns_for("salon de coiffure");
        assert!(patterns.contains(&"coiffeur".to_string()));
    }

    #[test]
    fn test_first_matching_family_wins() {
        let families = TypeFamilies::default();
        // "barbier" contains "bar", and restaurant is checked first
        let patterns = families.patterns_for("barbier moderne");
        assert!(patterns.contains(&"brasserie".to_string()));
    }

    #[test]
    fn test_unknown_type_falls_back_to_variants() {
        let families = TypeFamilies::default();
        let patterns = families.patterns_for("fleuriste");
        assert_eq!(
            patterns,
            vec![
                "fleuriste".to_string(),
                "fleuriste".to_string(),
                "Fleuriste".to_string()
            ]
        );
    }

    #[test]
    fn test_accented_family_lookup() {
        let families = TypeFamilies::default();
        let patterns = families.patterns_for("Médecin généraliste");
        assert!(patterns.contains(&"docteur".to_string()));
    }
}
