//! Tests for configuration-driven loading.

use tempfile::TempDir;

use survey_query::{load_store, Column, Config, QueryExecutor, QueryResult, SurveyError};

#[test]
fn test_config_file_drives_loading() {
    let dir = TempDir::new().unwrap();
    let csv_path = dir.path().join("visits.csv");
    std::fs::write(
        &csv_path,
        b"Store,Name,Chain,Visit State,Flyer?,Notes\n\
          A1,Caf\xe9 Nord,FreshCo,Not Completed,No,Poster wall covered by promo banner\n\
          A2,Harbour,FreshCo,Completed,Yes,\n",
    )
    .unwrap();

    let config_path = dir.path().join("survey-query.toml");
    std::fs::write(
        &config_path,
        format!(
            r#"
            [data]
            path = "{}"
            encoding = "windows-1252"

            [columns]
            site_code = "Store"
            site_name = "Name"
            banner_name = "Chain"
            status = "Visit State"
            flyer_found = "Flyer?"
            flyer_comment = "Notes"

            [terms]
            top_n = 2
            stopwords = ["promo"]
            "#,
            csv_path.display()
        ),
    )
    .unwrap();

    let config = Config::from_file(&config_path).unwrap();
    let store = load_store(&config).unwrap();

    assert_eq!(store.len(), 2);
    assert!(!store.schema().contains(Column::ActivityDate));
    assert_eq!(
        store.get("A1").and_then(|r| r.site_name.as_deref()),
        Some("Caf\u{e9} Nord")
    );

    let executor = QueryExecutor::from_config(&config);
    let response = executor.run("summarize flyer comments", &store);
    let Some(QueryResult::FlyerComments(report)) = response.result else {
        panic!("expected comment report, got {:?}", response.error);
    };
    let terms: Vec<&str> = report.top_terms.iter().map(|t| t.term.as_str()).collect();
    assert_eq!(terms, vec!["poster", "wall"]);
}

#[test]
fn test_missing_extract_is_a_load_error() {
    let dir = TempDir::new().unwrap();
    let mut config = Config::default();
    config.data.path = dir.path().join("absent.csv").display().to_string();

    let err = load_store(&config).unwrap_err();
    assert!(matches!(err, SurveyError::Load(_)));
}

#[test]
fn test_invalid_config_file() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("bad.toml");
    std::fs::write(&config_path, "[terms]\ntop_n = \"five\"\n").unwrap();

    assert!(matches!(
        Config::from_file(&config_path),
        Err(SurveyError::Config(_))
    ));
}
