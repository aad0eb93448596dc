//! Response validation and normalization
//!
//! Validation reports every violated rule; normalization produces the
//! typed analysis with documented defaults for anything recoverable.
//! Success requires zero validation errors, but the normalized analysis
//! is still well-formed when some rules fail.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use marketlens_core::{ConfidenceLevel, GenerativeAnalysis};

const REQUIRED_FIELDS: [&str; 6] = [
    "score_succes",
    "niveau_confiance",
    "atout_principal",
    "risque_principal",
    "action_prioritaire",
    "positionnement_conseille",
];

const TEXT_LIMITS: [(&str, usize); 4] = [
    ("atout_principal", 100),
    ("risque_principal", 100),
    ("action_prioritaire", 150),
    ("positionnement_conseille", 200),
];

const DEFAULT_SCORE: u8 = 50;

static REPEATED_DOTS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.{2,}").unwrap());
static REPEATED_BANGS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"!{2,}").unwrap());
static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Check a parsed response against every contract rule
pub fn validate(data: &Value) -> Vec<String> {
    let mut errors = Vec::new();

    for field in REQUIRED_FIELDS {
        match data.get(field) {
            None => errors.push(format!("Champ requis manquant: {field}")),
            Some(Value::Null) => errors.push(format!("Champ vide: {field}")),
            Some(Value::String(s)) if s.trim().is_empty() => {
                errors.push(format!("Champ vide: {field}"));
            }
            Some(_) => {}
        }
    }

    if let Some(score) = data.get("score_succes") {
        match as_number(score) {
            Some(n) if (0.0..=100.0).contains(&n) => {}
            Some(_) => errors.push("score_succes doit être entre 0 et 100".to_string()),
            None => errors.push("score_succes doit être un nombre".to_string()),
        }
    }

    match data.get("niveau_confiance") {
        None | Some(Value::Null) => {}
        Some(Value::String(confidence)) => {
            if !confidence.trim().is_empty() && ConfidenceLevel::parse(confidence).is_none() {
                errors.push("niveau_confiance doit être: Faible, Moyen ou Élevé".to_string());
            }
        }
        // Any non-string value is invalid, never coerced
        Some(_) => {
            errors.push("niveau_confiance doit être: Faible, Moyen ou Élevé".to_string());
        }
    }

    for (field, max_length) in TEXT_LIMITS {
        if let Some(Value::String(text)) = data.get(field) {
            let length = text.chars().count();
            if length > max_length {
                errors.push(format!("{field} trop long ({length}>{max_length} caractères)"));
            }
        }
    }

    errors
}

/// Produce the typed analysis with defaults for recoverable fields
pub fn normalize(data: &Value) -> GenerativeAnalysis {
    let score = data
        .get("score_succes")
        .and_then(as_number)
        .map(|n| n.clamp(0.0, 100.0) as u8)
        .unwrap_or(DEFAULT_SCORE);

    let confidence = data
        .get("niveau_confiance")
        .and_then(Value::as_str)
        .and_then(ConfidenceLevel::parse)
        .unwrap_or_default();

    GenerativeAnalysis {
        score_succes: score,
        niveau_confiance: confidence,
        atout_principal: clean_text(data, "atout_principal"),
        risque_principal: clean_text(data, "risque_principal"),
        action_prioritaire: clean_text(data, "action_prioritaire"),
        positionnement_conseille: clean_text(data, "positionnement_conseille"),
    }
}

/// Numbers arrive as JSON numbers or as quoted strings depending on the
/// model's mood
fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn clean_text(data: &Value, field: &str) -> String {
    let raw = data.get(field).and_then(Value::as_str).unwrap_or("").trim();
    let cleaned = REPEATED_DOTS_RE.replace_all(raw, ".");
    let cleaned = REPEATED_BANGS_RE.replace_all(&cleaned, "!");
    WHITESPACE_RE.replace_all(&cleaned, " ").to_string()
}
