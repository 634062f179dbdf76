//! End-to-end pipeline tests.

use std::fs::File;
use std::io::Write;
use tempfile::TempDir;

use survey_query::{
    ComplianceBand, Intent, QueryError, QueryExecutor, QueryResult, SurveyLoader, EXAMPLE_QUERIES,
};

const FLYER_FOUND: &str = "Where you able to find the flyer?";
const FLYER_COMMENT: &str =
    "Provide notes and what was discussed with the store staff if the flyer was not found.";

/// Write a ten-store extract in the layout the survey tool exports.
fn create_extract(dir: &TempDir) -> std::path::PathBuf {
    let rows = [
        ("S001", "Main St", "FreshCo", "Completed", "Yes", "", "2024-03-01"),
        ("S002", "Elm Ave", "FreshCo", "Not Completed", "", "", ""),
        ("S003", "Oak Rd", "ValueMart", "Completed", "No", "Flyer was not found due to broken display rack, rack was empty", "2024-03-02"),
        ("S004", "Pine Cres", "ValueMart", "not completed", "", "", ""),
        ("S005", "Birch Blvd", "FreshCo", "Completed", "No", "Staff said the delivery never arrived", "2024-03-03"),
        ("S006", "Cedar Way", "FreshCo", "Completed", "Yes", "  ", "2024-03-03"),
        ("S007", "Maple Dr", "ValueMart", "NOT COMPLETED", "Yes", "", "not a date"),
        ("S008", "Spruce Ln", "FreshCo", "Completed", "Yes", "", "03/05/2024"),
        ("S009", "Willow Ct", "ValueMart", "Completed", "No", "Display rack missing, delivery delayed", "2024-03-06"),
        ("S010", "Aspen Pl", "FreshCo", "Completed", "Yes", "", "2024-03-06"),
    ];

    let path = dir.path().join("SurveyResultsExtractShort.csv");
    let mut f = File::create(&path).unwrap();
    writeln!(
        f,
        "Site Code ,Site Name,Banner Name,Status,{} ,\"{}\",Activity Date",
        FLYER_FOUND, FLYER_COMMENT
    )
    .unwrap();
    for (code, name, banner, status, found, comment, date) in rows {
        writeln!(
            f,
            "{},{},{},{},{},\"{}\",{}",
            code, name, banner, status, found, comment, date
        )
        .unwrap();
    }
    path
}

fn load(dir: &TempDir) -> survey_query::RecordStore {
    SurveyLoader::default()
        .load_path(create_extract(dir))
        .unwrap()
}

#[test]
fn test_not_visited_round_trip() {
    let dir = TempDir::new().unwrap();
    let store = load(&dir);

    let response = QueryExecutor::default().run("How many stores have not been visited?", &store);
    assert_eq!(response.intent, Intent::NotVisited);

    let Some(QueryResult::NotVisited(report)) = response.result else {
        panic!("expected visit report, got {:?}", response.error);
    };
    assert_eq!(report.total, 10);
    assert_eq!(report.matched_count, 3);
    assert_eq!(report.rate, 70.0);
    let codes: Vec<&str> = report.stores.iter().map(|r| r.site_code.as_str()).collect();
    assert_eq!(codes, vec!["S002", "S004", "S007"]);
}

#[test]
fn test_no_flyer_round_trip() {
    let dir = TempDir::new().unwrap();
    let store = load(&dir);

    let response = QueryExecutor::default().run("Which stores didn't have a flyer?", &store);
    assert_eq!(response.intent, Intent::NoFlyer);

    let Some(QueryResult::NoFlyer(report)) = response.result else {
        panic!("expected flyer report, got {:?}", response.error);
    };
    assert_eq!(report.responses, 8);
    assert_eq!(report.matched_count, 3);
    assert_eq!(report.rate, 62.5);
    assert_eq!(report.band, ComplianceBand::Moderate);
}

#[test]
fn test_flyer_comment_round_trip() {
    let dir = TempDir::new().unwrap();
    let store = load(&dir);

    let response = QueryExecutor::default().run("Summarize the comments about the flyer", &store);
    assert_eq!(response.intent, Intent::SummarizeFlyerComments);

    let Some(QueryResult::FlyerComments(report)) = response.result else {
        panic!("expected comment report, got {:?}", response.error);
    };
    assert_eq!(report.total, 10);
    assert_eq!(report.matched_count, 3);

    let terms: Vec<(&str, usize)> = report
        .top_terms
        .iter()
        .map(|t| (t.term.as_str(), t.count))
        .collect();
    assert_eq!(
        terms,
        vec![
            ("rack", 3),
            ("display", 2),
            ("delivery", 2),
            ("broken", 1),
            ("empty", 1)
        ]
    );
}

#[test]
fn test_unrecognized_query() {
    let dir = TempDir::new().unwrap();
    let store = load(&dir);

    let response = QueryExecutor::default().run("what is the weather", &store);
    assert_eq!(response.intent, Intent::Unrecognized);
    assert!(response.error.is_none());

    let Some(QueryResult::Unrecognized(guidance)) = response.result else {
        panic!("expected guidance");
    };
    assert_eq!(guidance.examples, EXAMPLE_QUERIES.to_vec());
}

#[test]
fn test_missing_column_is_reported() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("partial.csv");
    std::fs::write(
        &path,
        "Site Code,Site Name,Banner Name,Status\nS1,Main St,FreshCo,Completed\n",
    )
    .unwrap();
    let store = SurveyLoader::default().load_path(&path).unwrap();

    let response = QueryExecutor::default().run("which stores had no flyer", &store);
    assert_eq!(response.intent, Intent::NoFlyer);
    assert!(response.result.is_none());
    assert_eq!(
        response.error,
        Some(QueryError::SchemaMissing {
            field: FLYER_FOUND.to_string()
        })
    );

    // Other intents still work against the same store.
    let response = QueryExecutor::default().run("stores not visited", &store);
    assert!(response.is_ok());
}

#[test]
fn test_empty_extract() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("empty.csv");
    std::fs::write(&path, "Site Code,Status\n").unwrap();
    let store = SurveyLoader::default().load_path(&path).unwrap();

    for query in ["unvisited stores", "What is the weather like?"] {
        let response = QueryExecutor::default().run(query, &store);
        assert_eq!(response.error, Some(QueryError::EmptyDataset));
        assert!(response.result.is_none());
    }
}

#[test]
fn test_na_answers_are_not_responses() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("na.csv");
    std::fs::write(
        &path,
        format!(
            "Site Code,Site Name,Banner Name,Status,{}\nS1,Main St,FreshCo,Completed,None\nS2,Elm Ave,FreshCo,Completed,N/A\nS3,Oak Rd,FreshCo,Completed,Yes\nS4,Pine Cres,FreshCo,Completed,No\n",
            FLYER_FOUND
        ),
    )
    .unwrap();
    let store = SurveyLoader::default().load_path(&path).unwrap();

    let response = QueryExecutor::default().run("Which stores didn't have a flyer?", &store);
    let Some(QueryResult::NoFlyer(report)) = response.result else {
        panic!("expected flyer report");
    };
    assert_eq!(report.responses, 2);
    assert_eq!(report.matched_count, 1);
    assert_eq!(report.stores[0].site_code, "S4");
    assert_eq!(report.rate, 50.0);
    assert_eq!(report.band, ComplianceBand::Moderate);
}

#[test]
fn test_activity_dates() {
    let dir = TempDir::new().unwrap();
    let store = load(&dir);

    let summary = store.summary();
    assert_eq!(summary.rows, 10);
    assert!(summary.missing_columns.is_empty());
    assert_eq!(summary.undated_rows, 3);
    assert_eq!(
        summary.first_activity.map(|d| d.to_string()),
        Some("2024-03-01".to_string())
    );
    assert_eq!(
        summary.last_activity.map(|d| d.to_string()),
        Some("2024-03-06".to_string())
    );
}
