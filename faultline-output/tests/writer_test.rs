use chrono::{TimeZone, Utc};
use faultline_config::ReportConfig;
use faultline_core::{LoadStats, Report, RequestOutcome, Scenario, ScenarioResult};
use faultline_output::{OutputError, ReportWriter};
use tempfile::TempDir;

fn report() -> Report {
    let started = Utc.with_ymd_and_hms(2026, 5, 4, 9, 15, 0).unwrap();
    let stats = LoadStats::from_outcomes(
        3,
        vec![
            RequestOutcome::from_response(200, 8.0),
            RequestOutcome::from_response(200, 12.0),
            RequestOutcome::from_response(500, 4.0),
        ],
    );
    let result = ScenarioResult::from_stats(
        Scenario::baseline("Baseline", 10, 20.0),
        stats,
        started,
        started + chrono::Duration::seconds(10),
    );

    let mut report = Report::new("Chaos Test Report", vec![result]);
    report.generated_at = Utc.with_ymd_and_hms(2026, 5, 4, 9, 15, 42).unwrap();
    report
}

fn file_name(path: &std::path::Path) -> &str {
    path.file_name().and_then(|name| name.to_str()).unwrap()
}

#[tokio::test]
async fn test_write_markdown_with_timestamped_name() {
    let temp_dir = TempDir::new().unwrap();
    let output_dir = temp_dir.path().join("chaos-tests");
    let writer = ReportWriter::new(&output_dir, "report");

    let path = writer.write(&report()).await.unwrap();

    assert_eq!(path, output_dir.join("report_20260504_091542.md"));
    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.contains("| Baseline | 2 | 1 | 0 | 8.00 |"));
    assert!(!output_dir.join("report_20260504_091542.json").exists());
}

#[tokio::test]
async fn test_existing_report_is_not_overwritten() {
    let temp_dir = TempDir::new().unwrap();
    let writer = ReportWriter::new(temp_dir.path(), "report");

    let first = writer.write(&report()).await.unwrap();
    let second = writer.write(&report()).await.unwrap();
    let third = writer.write(&report()).await.unwrap();

    assert_ne!(first, second);
    assert_eq!(file_name(&second), "report_20260504_091542_1.md");
    assert_eq!(file_name(&third), "report_20260504_091542_2.md");
}

#[tokio::test]
async fn test_json_twin_from_config() {
    let temp_dir = TempDir::new().unwrap();
    let config = ReportConfig {
        output_dir: temp_dir.path().to_path_buf(),
        file_prefix: "chaos".to_string(),
        write_json: true,
        ..Default::default()
    };
    let writer = ReportWriter::from_config(&config);

    let path = writer.write(&report()).await.unwrap();
    assert_eq!(file_name(&path), "chaos_20260504_091542.md");

    let json_path = temp_dir.path().join("chaos_20260504_091542.json");
    let parsed: Report = serde_json::from_slice(&std::fs::read(json_path).unwrap()).unwrap();
    assert_eq!(parsed.title, "Chaos Test Report");
    assert_eq!(parsed.generated_at, report().generated_at);
    assert_eq!(parsed.results.len(), 1);
    assert_eq!(parsed.results[0].scenario.name, "Baseline");
    assert_eq!(parsed.results[0].error_count, 1);
    assert_eq!(parsed.results[0].status_codes.get(&500), Some(&1));
}

#[tokio::test]
async fn test_unwritable_directory_fails() {
    let temp_dir = TempDir::new().unwrap();
    let blocker = temp_dir.path().join("not-a-dir");
    std::fs::write(&blocker, "file").unwrap();

    let writer = ReportWriter::new(blocker.join("reports"), "report");
    let result = writer.write(&report()).await;
    assert!(matches!(result, Err(OutputError::Filesystem { .. })));
}
