//! TF-IDF cosine similarity between a CV and a job description.
//!
//! The corpus is always exactly the pair `{cv_text, job_text}`. A `PairVectorizer`
//! is fitted on that pair, used once and dropped, so vocabulary from one request
//! can never influence another.
//!
//! Weighting:
//! - tokens: lowercase word runs of two or more characters, stop words removed
//! - tf: raw count
//! - idf: `ln((1 + n) / (1 + df)) + 1` (smoothed, n = 2)
//! - each document vector is L2-normalized before the dot product
//!
//! Term maps are ordered so every sum runs in the same order and repeated calls
//! return bit-identical scores.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::matching::stop_words::is_stop_word;

/// Similarity used whenever the pair has no usable vocabulary or a zero-norm vector.
pub const SPARSE_VOCABULARY_SCORE: f64 = 0.0;

const CORPUS_SIZE: f64 = 2.0;

static TOKEN_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b\w\w+\b").expect("token pattern is a valid regex")
});

type TermVector = BTreeMap<String, f64>;

/// Splits text into lowercase, stop-word-free terms.
fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    TOKEN_PATTERN
        .find_iter(&lowered)
        .map(|m| m.as_str())
        .filter(|t| !is_stop_word(t))
        .map(str::to_string)
        .collect()
}

fn term_counts(tokens: Vec<String>) -> BTreeMap<String, u32> {
    let mut counts = BTreeMap::new();
    for token in tokens {
        *counts.entry(token).or_insert(0) += 1;
    }
    counts
}

/// TF-IDF weights fitted on one CV/job pair.
struct PairVectorizer {
    cv_counts: BTreeMap<String, u32>,
    job_counts: BTreeMap<String, u32>,
}

impl PairVectorizer {
    /// Returns `None` when neither document contributes a single term.
    fn fit(cv_text: &str, job_text: &str) -> Option<Self> {
        let cv_counts = term_counts(tokenize(cv_text));
        let job_counts = term_counts(tokenize(job_text));
        if cv_counts.is_empty() && job_counts.is_empty() {
            return None;
        }
        Some(Self {
            cv_counts,
            job_counts,
        })
    }

    fn idf(&self, term: &str) -> f64 {
        let df = u8::from(self.cv_counts.contains_key(term))
            + u8::from(self.job_counts.contains_key(term));
        ((1.0 + CORPUS_SIZE) / (1.0 + f64::from(df))).ln() + 1.0
    }

    fn weigh(&self, counts: &BTreeMap<String, u32>) -> Option<TermVector> {
        let mut vector: TermVector = counts
            .iter()
            .map(|(term, &tf)| (term.clone(), f64::from(tf) * self.idf(term)))
            .collect();

        let norm = vector.values().map(|w| w * w).sum::<f64>().sqrt();
        if norm == 0.0 || !norm.is_finite() {
            return None;
        }
        vector.values_mut().for_each(|w| *w /= norm);
        Some(vector)
    }

    fn transform(&self) -> Option<(TermVector, TermVector)> {
        Some((self.weigh(&self.cv_counts)?, self.weigh(&self.job_counts)?))
    }
}

/// Dot product of two unit vectors, iterating the smaller one.
fn cosine(a: &TermVector, b: &TermVector) -> f64 {
    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    small
        .iter()
        .filter_map(|(term, w)| large.get(term).map(|v| w * v))
        .sum()
}

/// Returns the TF-IDF cosine similarity of the two texts, always in `[0.0, 1.0]`.
///
/// Empty texts, stop-word-only texts and any non-finite intermediate produce
/// `SPARSE_VOCABULARY_SCORE` rather than an error.
pub fn compute_semantic_score(cv_text: &str, job_text: &str) -> f64 {
    let Some(vectorizer) = PairVectorizer::fit(cv_text, job_text) else {
        debug!("Empty vocabulary for CV/job pair, similarity defaults to 0");
        return SPARSE_VOCABULARY_SCORE;
    };

    let Some((cv_vector, job_vector)) = vectorizer.transform() else {
        debug!("Zero-norm document vector, similarity defaults to 0");
        return SPARSE_VOCABULARY_SCORE;
    };

    let score = cosine(&cv_vector, &job_vector);
    if score.is_finite() {
        score.clamp(0.0, 1.0)
    } else {
        SPARSE_VOCABULARY_SCORE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const CV: &str = "Backend developer with five years of Python, FastAPI and PostgreSQL. \
        Built data pipelines on AWS and containerised services with Docker.";
    const JOB: &str = "We are hiring a backend developer to build Python services. \
        Experience with Docker and AWS is required; FastAPI is a plus.";

    #[test]
    fn test_tokenize_drops_stop_words_and_short_tokens() {
        let tokens = tokenize("The a I Python is GREAT for you");
        assert_eq!(tokens, vec!["python", "great"]);
    }

    #[test]
    fn test_identical_texts_score_one() {
        let score = compute_semantic_score(CV, CV);
        assert!((score - 1.0).abs() < 1e-9, "Score was {score}");
    }

    #[test]
    fn test_disjoint_vocabularies_score_zero() {
        let score = compute_semantic_score("kubernetes terraform golang", "watercolor pottery knitting");
        assert_eq!(score, 0.0);
    }

    #[test]
    fn test_related_texts_score_between_bounds() {
        let score = compute_semantic_score(CV, JOB);
        assert!(score > 0.2 && score < 1.0, "Score was {score}");
    }

    #[test]
    fn test_both_empty_scores_zero() {
        assert_eq!(compute_semantic_score("", ""), 0.0);
    }

    #[test]
    fn test_one_empty_scores_zero() {
        assert_eq!(compute_semantic_score(CV, ""), 0.0);
        assert_eq!(compute_semantic_score("", JOB), 0.0);
    }

    #[test]
    fn test_stop_words_only_scores_zero() {
        assert_eq!(compute_semantic_score("the and of to", "it is what it is"), 0.0);
    }

    #[test]
    fn test_shared_term_weighting_matches_smoothed_idf() {
        // cv = {python:1, sql:1}, job = {python:1}
        // idf(python) = 1, idf(sql) = ln(1.5) + 1
        let idf_sql = 1.5_f64.ln() + 1.0;
        let expected = 1.0 / (1.0 + idf_sql * idf_sql).sqrt();
        let score = compute_semantic_score("python sql", "python");
        assert!((score - expected).abs() < 1e-12, "Score was {score}");
    }

    #[test]
    fn test_repeated_calls_are_bit_identical() {
        let first = compute_semantic_score(CV, JOB);
        for _ in 0..50 {
            assert_eq!(compute_semantic_score(CV, JOB).to_bits(), first.to_bits());
        }
    }

    #[test]
    fn test_no_vocabulary_leak_between_calls() {
        let first = compute_semantic_score(CV, JOB);
        let _ = compute_semantic_score("completely unrelated gardening text", "tomatoes basil");
        let second = compute_semantic_score(CV, JOB);
        assert_eq!(first, second);
    }

    proptest! {
        #[test]
        fn prop_semantic_score_bounded(a in "[a-z ]{0,80}", b in "[a-z ]{0,80}") {
            let score = compute_semantic_score(&a, &b);
            prop_assert!((0.0..=1.0).contains(&score));
        }

        #[test]
        fn prop_semantic_score_symmetric(a in "[a-z ]{0,80}", b in "[a-z ]{0,80}") {
            let ab = compute_semantic_score(&a, &b);
            let ba = compute_semantic_score(&b, &a);
            prop_assert!((ab - ba).abs() < 1e-12);
        }
    }
}
