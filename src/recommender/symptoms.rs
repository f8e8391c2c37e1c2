//! Symptom-based disease and nutrient deficiency recommendations
//!
//! Free-text symptoms are normalised and matched against known symptom
//! phrases. Each matched phrase counts as one piece of evidence for the
//! condition it points to.

use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

static NON_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9\s\-]").expect("non-word pattern is valid"));
static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

const DISEASE_TREATMENTS: [(&str, &str); 10] = [
    ("powdery mildew", "Apply Sulphur-based fungicide or Azoxystrobin."),
    ("late blight", "Use copper fungicide; remove infected material."),
    ("early blight", "Apply chlorothalonil/mancozeb and rotate crops."),
    ("leaf spot", "Fungicide + remove debris; improve air circulation."),
    ("rust", "Systemic fungicides (triazoles) + resistant cultivars."),
    ("stem rot", "Improve drainage; fungicide drench where needed."),
    ("aphid", "Neem oil, insecticidal soap, or natural predators."),
    ("whitefly", "Sticky traps, reflective mulch, insecticides."),
    ("borer", "Bt spray, pheromone traps, targeted insecticides."),
    ("nematode", "Crop rotation, organic amendments, nematicides."),
];

const DEFICIENCY_FERTILIZERS: [(&str, &str); 8] = [
    ("nitrogen deficiency", "Apply Urea (46% N) or Ammonium Nitrate."),
    ("phosphorus deficiency", "Apply SSP or DAP near roots."),
    ("potassium deficiency", "Use MOP or SOP."),
    ("iron deficiency", "Spray Fe-EDDHA chelate or apply soil iron."),
    ("zinc deficiency", "Apply Zinc sulfate or foliar Zn sprays."),
    ("magnesium deficiency", "Epsom salt foliar spray or soil mix."),
    ("sulfur deficiency", "Ammonium sulfate or gypsum."),
    ("calcium deficiency", "Gypsum, lime or foliar calcium spray."),
];

const SYMPTOM_CONDITIONS: [(&str, &str); 9] = [
    ("white powder on leaves", "powdery mildew"),
    ("brown lesions", "leaf spot"),
    ("dark wet lesions on tubers", "late blight"),
    ("yellowing of leaves starting from bottom", "nitrogen deficiency"),
    ("interveinal chlorosis", "iron deficiency"),
    ("yellowing at leaf margins", "potassium deficiency"),
    ("holes in leaves", "borer"),
    ("sticky honeydew on leaves", "aphid"),
    ("white cottony patches", "whitefly"),
];

/// Lowercase, replace punctuation with spaces and collapse whitespace
#[must_use]
pub fn normalize_text(text: &str) -> String {
    let lowered = text.to_lowercase();
    let cleaned = NON_WORD.replace_all(&lowered, " ");
    WHITESPACE.replace_all(&cleaned, " ").trim().to_string()
}

/// Conditions suggested by the symptoms with their evidence count, in first-match order
#[must_use]
pub fn infer_conditions<S: AsRef<str>>(symptoms: &[S]) -> Vec<(&'static str, u32)> {
    let joined: Vec<&str> = symptoms.iter().map(AsRef::as_ref).collect();
    let text = normalize_text(&joined.join(" "));

    let mut found: Vec<(&'static str, u32)> = Vec::new();
    for (phrase, condition) in SYMPTOM_CONDITIONS {
        if !text.contains(&normalize_text(phrase)) {
            continue;
        }
        match found.iter_mut().find(|(name, _)| *name == condition) {
            Some((_, count)) => *count += 1,
            None => found.push((condition, 1)),
        }
    }
    found
}

/// A diagnosed condition with its recommended treatment
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Finding {
    pub name: &'static str,
    pub evidence: u32,
    pub recommendation: &'static str,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SymptomRecommendations {
    pub diseases: Vec<Finding>,
    pub deficiencies: Vec<Finding>,
}

fn lookup(table: &[(&'static str, &'static str)], name: &str) -> Option<&'static str> {
    table
        .iter()
        .find(|(entry, _)| *entry == name)
        .map(|(_, advice)| *advice)
}

/// Treatment and fertilizer advice for a list of observed symptoms
#[must_use]
pub fn generate_recommendations<S: AsRef<str>>(symptoms: &[S]) -> SymptomRecommendations {
    let mut recommendations = SymptomRecommendations::default();

    for (name, evidence) in infer_conditions(symptoms) {
        if let Some(recommendation) = lookup(&DISEASE_TREATMENTS, name) {
            recommendations.diseases.push(Finding {
                name,
                evidence,
                recommendation,
            });
        } else if let Some(recommendation) = lookup(&DEFICIENCY_FERTILIZERS, name) {
            recommendations.deficiencies.push(Finding {
                name,
                evidence,
                recommendation,
            });
        }
    }
    recommendations
}

/// Split a comma-separated symptom field into trimmed, non-empty entries
#[must_use]
pub fn split_symptoms(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
