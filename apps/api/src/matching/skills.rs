//! Skill list normalization and CV/job skill coverage.
//!
//! Raw skill lists arrive from two different places (the CV keyword scan and the
//! JD keyword scan) with mixed casing, stray whitespace and duplicates. Everything
//! is folded into a `NormalizedSkillSet` before any set algebra happens.

use std::collections::BTreeSet;

use serde::Serialize;

/// Skill score used when the job advertises no recognisable skills.
/// There is no denominator, so the overlap contributes nothing.
pub const EMPTY_JOB_SKILL_SCORE: f64 = 0.0;

/// Canonical skill set: every entry is trimmed, lowercase and non-empty.
///
/// The only way to build one is `normalize`, so the invariant holds for every
/// value of this type. `BTreeSet` keeps iteration sorted, which makes the
/// overlap output deterministic without a separate sort step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedSkillSet(BTreeSet<String>);

impl NormalizedSkillSet {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, skill: &str) -> bool {
        self.0.contains(skill)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Sorted copy of the skills, ready for serialization.
    pub fn to_sorted_vec(&self) -> Vec<String> {
        self.0.iter().cloned().collect()
    }
}

/// Trims, lowercases and de-duplicates a raw skill list. Blank entries are dropped.
pub fn normalize<I, S>(raw_skills: I) -> NormalizedSkillSet
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    NormalizedSkillSet(
        raw_skills
            .into_iter()
            .map(|s| s.as_ref().trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect(),
    )
}

/// Result of comparing CV skills against job skills.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverlapResult {
    /// CV ∩ job, sorted ascending.
    pub overlapping: Vec<String>,
    /// job − CV, sorted ascending.
    pub missing: Vec<String>,
    /// |overlapping| / |job|, or `EMPTY_JOB_SKILL_SCORE` for an empty job set.
    pub skill_score: f64,
}

/// Computes which job skills the CV covers and which it lacks.
pub fn compute_overlap(cv: &NormalizedSkillSet, job: &NormalizedSkillSet) -> OverlapResult {
    if job.is_empty() {
        return OverlapResult {
            overlapping: vec![],
            missing: vec![],
            skill_score: EMPTY_JOB_SKILL_SCORE,
        };
    }

    let (overlapping, missing): (Vec<String>, Vec<String>) = job
        .iter()
        .map(str::to_string)
        .partition(|skill| cv.contains(skill));

    let skill_score = overlapping.len() as f64 / job.len() as f64;

    OverlapResult {
        overlapping,
        missing,
        skill_score,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_normalize_folds_case_and_whitespace() {
        let set = normalize(["  Python ", "python", "PYTHON", "Sql"]);
        assert_eq!(set.to_sorted_vec(), vec!["python", "sql"]);
    }

    #[test]
    fn test_normalize_drops_blank_entries() {
        let set = normalize(["", "   ", "\t\n", "Docker"]);
        assert_eq!(set.to_sorted_vec(), vec!["docker"]);
    }

    #[test]
    fn test_normalize_empty_input() {
        let empty: Vec<String> = vec![];
        assert!(normalize(empty).is_empty());
    }

    #[test]
    fn test_overlap_partial_match() {
        let cv = normalize(["Python", "SQL"]);
        let job = normalize(["python", "excel"]);

        let result = compute_overlap(&cv, &job);
        assert_eq!(result.overlapping, vec!["python"]);
        assert_eq!(result.missing, vec!["excel"]);
        assert!((result.skill_score - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_overlap_empty_job_skills_scores_zero() {
        let cv = normalize(["Python", "SQL", "Docker"]);
        let job = normalize(Vec::<String>::new());

        let result = compute_overlap(&cv, &job);
        assert_eq!(result.skill_score, 0.0);
        assert!(result.overlapping.is_empty());
        assert!(result.missing.is_empty());
    }

    #[test]
    fn test_overlap_full_coverage() {
        let cv = normalize(["aws", "docker", "git", "linux"]);
        let job = normalize(["Docker", "AWS"]);

        let result = compute_overlap(&cv, &job);
        assert_eq!(result.overlapping, vec!["aws", "docker"]);
        assert!(result.missing.is_empty());
        assert_eq!(result.skill_score, 1.0);
    }

    #[test]
    fn test_overlap_output_sorted() {
        let cv = normalize(["zsh"]);
        let job = normalize(["typescript", "css", "react", "azure"]);

        let result = compute_overlap(&cv, &job);
        assert_eq!(result.missing, vec!["azure", "css", "react", "typescript"]);
    }

    fn skill_list() -> impl Strategy<Value = Vec<String>> {
        prop::collection::vec("[ ]{0,2}[a-zA-Z]{0,6}[ ]{0,2}", 0..12)
    }

    proptest! {
        #[test]
        fn prop_normalize_is_idempotent(raw in skill_list()) {
            let once = normalize(&raw);
            let twice = normalize(once.iter());
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn prop_skill_score_bounded(cv in skill_list(), job in skill_list()) {
            let result = compute_overlap(&normalize(&cv), &normalize(&job));
            prop_assert!((0.0..=1.0).contains(&result.skill_score));
        }

        #[test]
        fn prop_overlap_and_missing_partition_job(cv in skill_list(), job in skill_list()) {
            let cv = normalize(&cv);
            let job = normalize(&job);
            let result = compute_overlap(&cv, &job);

            let overlapping: BTreeSet<&str> = result.overlapping.iter().map(String::as_str).collect();
            let missing: BTreeSet<&str> = result.missing.iter().map(String::as_str).collect();

            prop_assert!(overlapping.is_disjoint(&missing));
            let union: BTreeSet<&str> = overlapping.union(&missing).copied().collect();
            let job_set: BTreeSet<&str> = job.iter().collect();
            prop_assert_eq!(union, job_set);
        }

        #[test]
        fn prop_empty_job_always_zero(cv in skill_list()) {
            let result = compute_overlap(&normalize(&cv), &NormalizedSkillSet::default());
            prop_assert_eq!(result.skill_score, 0.0);
        }
    }
}
