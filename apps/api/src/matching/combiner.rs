//! Weighted fusion of text similarity and skill overlap into the 0-100 match score.

use serde::Serialize;

pub const SEMANTIC_WEIGHT: f64 = 0.7;
pub const SKILL_WEIGHT: f64 = 0.3;

const COMPONENT_DECIMALS: i32 = 3;
const MATCH_DECIMALS: i32 = 1;

/// Rounded scores ready to be stored and shown.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CombinedScore {
    /// 0.0 – 100.0, one decimal.
    pub match_score: f64,
    /// 0.0 – 1.0, three decimals.
    pub semantic_score: f64,
    /// 0.0 – 1.0, three decimals.
    pub skill_score: f64,
}

/// Rounds half away from zero at `decimals` places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10_f64.powi(decimals);
    (value * factor).round() / factor
}

/// `match = round(100 * (0.7 * semantic + 0.3 * skill), 1)`.
///
/// Components are clamped to `[0, 1]` first so the result stays in `[0, 100]`.
pub fn combine(semantic_score: f64, skill_score: f64) -> CombinedScore {
    let semantic = semantic_score.clamp(0.0, 1.0);
    let skill = skill_score.clamp(0.0, 1.0);

    let raw = SEMANTIC_WEIGHT * semantic + SKILL_WEIGHT * skill;

    CombinedScore {
        match_score: round_to(raw * 100.0, MATCH_DECIMALS).clamp(0.0, 100.0),
        semantic_score: round_to(semantic, COMPONENT_DECIMALS),
        skill_score: round_to(skill, COMPONENT_DECIMALS),
    }
}
