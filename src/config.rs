use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    pub urgency: f64,
    pub impact: f64,
    pub recency: f64,
    pub votes: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            urgency: 0.4,
            impact: 0.3,
            recency: 0.2,
            votes: 0.1,
        }
    }
}

/// Tunables for the priority scorer.
///
/// Every field has a default, so a TOML file only needs the keys it changes:
///
/// ```toml
/// default_impact = 2
/// vote_markers = ["👍", "+1"]
///
/// [impact]
/// "Data Platform" = 5
/// ```
///
/// An `[impact]` table replaces the built-in section table entirely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    #[serde(default)]
    pub weights: ScoringWeights,
    #[serde(default = "default_impact_table")]
    pub impact: HashMap<String, u32>,
    #[serde(default = "default_impact")]
    pub default_impact: u32,
    #[serde(default = "default_vote_markers")]
    pub vote_markers: Vec<String>,
}

fn default_impact_table() -> HashMap<String, u32> {
    [
        ("Sprint velocity", 5),
        ("Hiring pipeline", 4),
        ("Marketing campaigns", 3),
        ("Design progress", 3),
        ("Tech Debt", 4),
        ("Product Launches", 5),
        ("Customer Feedback", 4),
        ("Support Issues", 4),
        ("Internal Operations", 3),
        ("Sales Performance", 5),
        ("Security", 5),
    ]
    .into_iter()
    .map(|(section, impact)| (section.to_string(), impact))
    .collect()
}

fn default_impact() -> u32 {
    3
}

fn default_vote_markers() -> Vec<String> {
    vec!["\u{1F44D}".to_string()]
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            weights: ScoringWeights::default(),
            impact: default_impact_table(),
            default_impact: default_impact(),
            vote_markers: default_vote_markers(),
        }
    }
}

impl ScoringConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }

    /// Exact, case-sensitive lookup; unknown sections get `default_impact`.
    pub fn impact_for(&self, section: &str) -> u32 {
        self.impact
            .get(section)
            .copied()
            .unwrap_or(self.default_impact)
    }

    pub fn has_vote(&self, feedback: &str) -> bool {
        self.vote_markers
            .iter()
            .any(|marker| !marker.is_empty() && feedback.contains(marker.as_str()))
    }
}

/// Settings for the OpenAI-compatible tone rewriter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewriterConfig {
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for RewriterConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o".to_string(),
            temperature: 0.3,
            max_tokens: 200,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_built_in_table() {
        let config = ScoringConfig::default();
        assert_eq!(config.impact_for("Security"), 5);
        assert_eq!(config.impact_for("Hiring pipeline"), 4);
        assert_eq!(config.impact_for("security"), 3);
        assert_eq!(config.impact_for("Text Input"), 3);
        assert!(config.has_vote("great work \u{1F44D}"));
        assert!(!config.has_vote("great work"));
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let config = ScoringConfig::from_toml_str(
            r#"
            default_impact = 2
            vote_markers = ["+1"]
            "#,
        )
        .unwrap();

        assert_eq!(config.weights, ScoringWeights::default());
        assert_eq!(config.impact_for("Security"), 5);
        assert_eq!(config.impact_for("Mystery"), 2);
        assert!(config.has_vote("+1 from me"));
        assert!(!config.has_vote("\u{1F44D}"));
    }

    #[test]
    fn invalid_toml_is_reported() {
        assert!(ScoringConfig::from_toml_str("weights = 3").is_err());
    }
}
