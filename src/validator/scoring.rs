//! Requirement-to-code confidence scoring

use crate::models::{CodeItem, MatchingConfig, SpecRequirement};

/// Scores how likely a code item satisfies a requirement, in `[0, 1]`
pub trait ConfidenceScorer {
    fn score(&self, requirement: &SpecRequirement, candidate: &CodeItem) -> f64;
}

/// Weighted sum of name, kind and visibility agreement
#[derive(Debug, Clone, Copy, Default)]
pub struct WeightedScorer {
    weights: MatchingConfig,
}

impl WeightedScorer {
    pub fn new(weights: MatchingConfig) -> Self {
        Self { weights }
    }
}

impl ConfidenceScorer for WeightedScorer {
    fn score(&self, requirement: &SpecRequirement, candidate: &CodeItem) -> f64 {
        let wanted = requirement.name.to_lowercase();
        let found = candidate.name.to_lowercase();
        let mut score = 0.0;

        if wanted == found {
            score += self.weights.exact_name;
        } else if found.contains(&wanted) {
            score += self.weights.code_contains_req;
        } else if wanted.contains(&found) {
            score += self.weights.req_contains_code;
        }

        if requirement.kind == Some(candidate.kind) {
            score += self.weights.kind;
        }
        if candidate.public {
            score += self.weights.public;
        }

        round_confidence(score)
    }
}

/// Round to three decimals so summed weights compare exactly, then clamp
pub fn round_confidence(score: f64) -> f64 {
    ((score * 1000.0).round() / 1000.0).clamp(0.0, 1.0)
}
