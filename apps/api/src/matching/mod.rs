//! Match engine: CV + JD → bounded, explainable compatibility score.
//!
//! Pure and synchronous. Nothing in here touches the network, the database or any
//! shared state, so handlers call `compute_match` inline and concurrent requests
//! never need coordination.
//!
//! Flow: normalize skills → (overlap ‖ TF-IDF similarity) → weighted combine.

pub mod combiner;
pub mod semantic;
pub mod skills;
mod stop_words;

use serde::Serialize;

use crate::matching::combiner::combine;
use crate::matching::semantic::compute_semantic_score;
use crate::matching::skills::{compute_overlap, normalize};

/// Everything the engine needs for one match. Built per request by the caller.
#[derive(Debug, Clone)]
pub struct MatchInput {
    pub cv_text: String,
    pub cv_skills: Vec<String>,
    pub job_text: String,
    pub job_skills: Vec<String>,
}

/// Final engine output. Never mutated after `compute_match` returns it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchResult {
    pub match_score: f64,
    pub semantic_score: f64,
    pub skill_score: f64,
    /// Normalized job skills the overlap was computed against, sorted.
    pub job_skills: Vec<String>,
    pub overlapping_skills: Vec<String>,
    pub missing_skills: Vec<String>,
}

/// Runs the full scoring pipeline for one CV/job pair.
pub fn compute_match(input: &MatchInput) -> MatchResult {
    let cv_skills = normalize(&input.cv_skills);
    let job_skills = normalize(&input.job_skills);

    let overlap = compute_overlap(&cv_skills, &job_skills);
    let semantic = compute_semantic_score(&input.cv_text, &input.job_text);

    let scores = combine(semantic, overlap.skill_score);

    MatchResult {
        match_score: scores.match_score,
        semantic_score: scores.semantic_score,
        skill_score: scores.skill_score,
        job_skills: job_skills.to_sorted_vec(),
        overlapping_skills: overlap.overlapping,
        missing_skills: overlap.missing,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(cv_text: &str, cv_skills: &[&str], job_text: &str, job_skills: &[&str]) -> MatchInput {
        MatchInput {
            cv_text: cv_text.to_string(),
            cv_skills: cv_skills.iter().map(|s| s.to_string()).collect(),
            job_text: job_text.to_string(),
            job_skills: job_skills.iter().map(|s| s.to_string()).collect(),
        }
    }

    const CV_TEXT: &str = "IT support engineer. Troubleshooting Linux servers, SQL reporting \
        in Excel and Power BI dashboards. Scripting with Python.";

    #[test]
    fn test_skill_gap_breakdown() {
        let result = compute_match(&input(CV_TEXT, &["Python", "SQL"], CV_TEXT, &["python", "excel"]));
        assert_eq!(result.overlapping_skills, vec!["python"]);
        assert_eq!(result.missing_skills, vec!["excel"]);
        assert_eq!(result.skill_score, 0.5);
    }

    #[test]
    fn test_no_job_skills() {
        let result = compute_match(&input(CV_TEXT, &["Python"], "Support role", &[]));
        assert_eq!(result.skill_score, 0.0);
        assert!(result.overlapping_skills.is_empty());
        assert!(result.missing_skills.is_empty());
        assert!(result.job_skills.is_empty());
    }

    #[test]
    fn test_identical_text_and_covered_skills_scores_high() {
        let result = compute_match(&input(
            CV_TEXT,
            &["Python", "SQL", "Linux", "Excel"],
            CV_TEXT,
            &["python", "linux"],
        ));
        assert!(result.match_score >= 90.0, "Match was {}", result.match_score);
        assert_eq!(result.semantic_score, 1.0);
    }

    #[test]
    fn test_disjoint_text_and_skills_scores_zero() {
        let result = compute_match(&input(
            "kubernetes terraform golang",
            &["Docker"],
            "watercolor pottery knitting",
            &["excel"],
        ));
        assert!(result.match_score.abs() < 0.05, "Match was {}", result.match_score);
        assert_eq!(result.missing_skills, vec!["excel"]);
    }

    #[test]
    fn test_repeated_calls_are_identical() {
        let i = input(CV_TEXT, &["Python"], "Python developer with SQL", &["python", "sql"]);
        assert_eq!(compute_match(&i), compute_match(&i));
    }

    #[test]
    fn test_job_skills_echoed_normalized() {
        let result = compute_match(&input(CV_TEXT, &[], "x", &[" AWS", "aws", "Docker "]));
        assert_eq!(result.job_skills, vec!["aws", "docker"]);
    }
}
