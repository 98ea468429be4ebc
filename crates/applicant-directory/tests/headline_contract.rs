//! Shape checks for the headline ranking job's output document.

use applicant_directory::headlines::{
    rank_headlines, HeadlineContractError, HeadlineReport, ScoredArticle,
};
use serde_json::{json, Map};

#[test]
fn report_written_by_the_job_validates_from_disk() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("news_output.json");
    let document = json!({
        "status": "ok",
        "totalResults": 1,
        "articles": [{
            "title": "Bitcoin rallies",
            "description": "Prices climb",
            "content": "Bitcoin rose sharply on Monday.",
            "headlines": [
                { "score": 0.91, "text": "Bitcoin surges" },
                { "score": -0.12, "text": "Markets mixed" }
            ]
        }]
    });
    std::fs::write(&path, document.to_string()).expect("fixture written");

    let report = HeadlineReport::from_path(&path).expect("report parses");
    report.validate().expect("report honours the contract");
}

#[test]
fn ranked_headlines_build_a_valid_report() {
    let headlines = rank_headlines(vec![
        ("Markets mixed".to_string(), 0.41),
        ("Bitcoin surges".to_string(), 0.93),
    ]);
    let report = HeadlineReport {
        status: "ok".to_string(),
        total_results: 3,
        articles: vec![ScoredArticle {
            title: "Bitcoin rallies".to_string(),
            description: String::new(),
            content: String::new(),
            headlines,
            metadata: Map::new(),
        }],
    };

    assert!(report.validate().is_ok());
    assert_eq!(report.articles[0].headlines[0].text, "Bitcoin surges");
}

#[test]
fn missing_headlines_field_is_a_parse_error() {
    let document = json!({
        "status": "ok",
        "totalResults": 1,
        "articles": [{ "title": "No candidates" }]
    });

    assert!(matches!(
        HeadlineReport::from_reader(document.to_string().as_bytes()),
        Err(HeadlineContractError::Json(_))
    ));
}
