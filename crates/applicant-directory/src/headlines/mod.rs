//! Contract of the headline ranking batch job's output document.
//!
//! The job itself (article fetching and headline generation) lives outside
//! this crate. What is kept here is the JSON shape it emits, a validator for
//! that shape, and the deterministic scoring helpers the job relies on.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Status value a successful batch writes.
pub const STATUS_OK: &str = "ok";

const SCORE_DECIMALS: i32 = 4;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeadlineReport {
    pub status: String,
    /// Number of articles fetched; articles without text are dropped, so this
    /// may exceed `articles.len()`.
    #[serde(rename = "totalResults")]
    pub total_results: usize,
    pub articles: Vec<ScoredArticle>,
}

/// Source article metadata plus its ranked headline candidates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredArticle {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub content: String,
    pub headlines: Vec<ScoredHeadline>,
    /// Any further metadata carried over from the source article.
    #[serde(flatten)]
    pub metadata: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredHeadline {
    pub score: f64,
    pub text: String,
}

impl HeadlineReport {
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, HeadlineContractError> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, HeadlineContractError> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Collects every contract violation in the document.
    pub fn violations(&self) -> Vec<ContractViolation> {
        let mut violations = Vec::new();

        if self.status != STATUS_OK {
            violations.push(ContractViolation::Status(self.status.clone()));
        }
        if self.total_results < self.articles.len() {
            violations.push(ContractViolation::TotalResults {
                total: self.total_results,
                articles: self.articles.len(),
            });
        }

        for (article, entry) in self.articles.iter().enumerate() {
            if entry.headlines.is_empty() {
                violations.push(ContractViolation::NoHeadlines { article });
                continue;
            }

            for (headline, scored) in entry.headlines.iter().enumerate() {
                if !scored.score.is_finite() || !(-1.0..=1.0).contains(&scored.score) {
                    violations.push(ContractViolation::ScoreOutOfRange {
                        article,
                        headline,
                        score: scored.score,
                    });
                }
            }

            if let Some(headline) = entry
                .headlines
                .windows(2)
                .position(|pair| pair[0].score < pair[1].score)
            {
                violations.push(ContractViolation::Unsorted {
                    article,
                    headline: headline + 1,
                });
            }
        }

        violations
    }

    pub fn validate(&self) -> Result<(), HeadlineContractError> {
        let violations = self.violations();
        if violations.is_empty() {
            Ok(())
        } else {
            Err(HeadlineContractError::Violations(violations))
        }
    }
}

/// Cosine similarity of two embeddings, `None` when undefined (length
/// mismatch, empty or zero vectors).
pub fn cosine_similarity(left: &[f32], right: &[f32]) -> Option<f64> {
    if left.len() != right.len() || left.is_empty() {
        return None;
    }

    let (mut dot, mut left_norm, mut right_norm) = (0.0_f64, 0.0_f64, 0.0_f64);
    for (&a, &b) in left.iter().zip(right) {
        let (a, b) = (f64::from(a), f64::from(b));
        dot += a * b;
        left_norm += a * a;
        right_norm += b * b;
    }

    if left_norm == 0.0 || right_norm == 0.0 {
        return None;
    }

    Some((dot / (left_norm.sqrt() * right_norm.sqrt())).clamp(-1.0, 1.0))
}

/// Orders candidates by descending score and rounds scores for output.
pub fn rank_headlines<I>(candidates: I) -> Vec<ScoredHeadline>
where
    I: IntoIterator<Item = (String, f64)>,
{
    let mut ranked: Vec<(String, f64)> = candidates.into_iter().collect();
    ranked.sort_by(|left, right| right.1.total_cmp(&left.1));

    let scale = 10_f64.powi(SCORE_DECIMALS);
    ranked
        .into_iter()
        .map(|(text, score)| ScoredHeadline {
            score: (score * scale).round() / scale,
            text,
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ContractViolation {
    #[error("status is '{0}', expected 'ok'")]
    Status(String),
    #[error("totalResults {total} is smaller than the {articles} articles present")]
    TotalResults { total: usize, articles: usize },
    #[error("article {article} has no headlines")]
    NoHeadlines { article: usize },
    #[error("article {article} headline {headline} has score {score} outside [-1, 1]")]
    ScoreOutOfRange {
        article: usize,
        headline: usize,
        score: f64,
    },
    #[error("article {article} headlines are not sorted by score (position {headline})")]
    Unsorted { article: usize, headline: usize },
}

#[derive(Debug, thiserror::Error)]
pub enum HeadlineContractError {
    #[error("failed to read headline report: {0}")]
    Io(#[from] std::io::Error),
    #[error("headline report is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("headline report breaks its contract ({} violations)", .0.len())]
    Violations(Vec<ContractViolation>),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn document() -> Value {
        json!({
            "status": "ok",
            "totalResults": 2,
            "articles": [{
                "title": "Bitcoin rallies",
                "description": "Prices climb",
                "content": "Bitcoin rose sharply on Monday.",
                "url": "https://example.com/bitcoin",
                "headlines": [
                    { "score": 0.9731, "text": "Bitcoin surges past record" },
                    { "score": 0.8812, "text": "Crypto markets climb" }
                ]
            }]
        })
    }

    #[test]
    fn well_formed_report_passes_validation() {
        let report: HeadlineReport =
            serde_json::from_value(document()).expect("report deserializes");
        assert!(report.validate().is_ok());
        assert_eq!(report.total_results, 2);
        assert_eq!(
            report.articles[0].metadata.get("url"),
            Some(&json!("https://example.com/bitcoin"))
        );
    }

    #[test]
    fn report_round_trips_with_camel_case_total() {
        let report: HeadlineReport =
            serde_json::from_value(document()).expect("report deserializes");
        let value = serde_json::to_value(&report).expect("report serializes");
        assert_eq!(value["totalResults"], json!(2));
        assert_eq!(value["articles"][0]["url"], json!("https://example.com/bitcoin"));
    }

    #[test]
    fn out_of_range_and_unsorted_scores_are_reported() {
        let mut value = document();
        value["status"] = json!("error");
        value["articles"][0]["headlines"] = json!([
            { "score": 0.2, "text": "low" },
            { "score": 1.5, "text": "too high" }
        ]);
        let report: HeadlineReport = serde_json::from_value(value).expect("report deserializes");

        let violations = report.violations();
        assert!(violations.contains(&ContractViolation::Status("error".to_string())));
        assert!(violations.contains(&ContractViolation::ScoreOutOfRange {
            article: 0,
            headline: 1,
            score: 1.5,
        }));
        assert!(violations.contains(&ContractViolation::Unsorted {
            article: 0,
            headline: 1,
        }));
        assert!(matches!(
            report.validate(),
            Err(HeadlineContractError::Violations(found)) if found.len() == 3
        ));
    }

    #[test]
    fn article_without_headlines_is_a_violation() {
        let mut value = document();
        value["articles"][0]["headlines"] = json!([]);
        let report: HeadlineReport = serde_json::from_value(value).expect("report deserializes");
        assert_eq!(
            report.violations(),
            vec![ContractViolation::NoHeadlines { article: 0 }]
        );
    }

    #[test]
    fn rank_sorts_descending_and_rounds() {
        let ranked = rank_headlines(vec![
            ("second".to_string(), 0.512_34),
            ("first".to_string(), 0.987_654),
            ("third".to_string(), -0.25),
        ]);

        let texts: Vec<&str> = ranked.iter().map(|h| h.text.as_str()).collect();
        assert_eq!(texts, vec!["first", "second", "third"]);
        assert_eq!(ranked[0].score, 0.9877);
        assert_eq!(ranked[1].score, 0.5123);
    }

    #[test]
    fn cosine_similarity_handles_edge_cases() {
        let same = cosine_similarity(&[1.0, 2.0, 3.0], &[1.0, 2.0, 3.0]).expect("defined");
        assert!((same - 1.0).abs() < 1e-9);

        let opposite = cosine_similarity(&[1.0, 0.0], &[-1.0, 0.0]).expect("defined");
        assert!((opposite + 1.0).abs() < 1e-9);

        let orthogonal = cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).expect("defined");
        assert!(orthogonal.abs() < 1e-9);

        assert_eq!(cosine_similarity(&[1.0], &[1.0, 2.0]), None);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 2.0]), None);
        assert_eq!(cosine_similarity(&[], &[]), None);
    }
}
