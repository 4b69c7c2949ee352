//! Markdown rendering of a run report

use faultline_core::{Report, ScenarioResult};
use std::fmt::Write;

/// Render the report: the outcome table in execution order, then the
/// latency distribution table
pub fn render_markdown(report: &Report) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "# {}\n", report.title);
    let _ = writeln!(
        out,
        "Generated: {}\n",
        report.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    );

    if report.interrupted {
        let _ = writeln!(
            out,
            "> Run interrupted: only scenarios that ran are listed, and the last one may be cut short.\n"
        );
    }

    out.push_str("| Scenario | Success | Fail | Fallback | Avg Latency (ms) |\n");
    out.push_str("|---|---|---|---|---|\n");
    for result in &report.results {
        let _ = writeln!(
            out,
            "| {} | {} | {} | {} | {:.2} |",
            escape_cell(&result.scenario.name),
            result.success_count,
            result.error_count,
            result.fallback_count,
            result.avg_latency_ms
        );
    }

    if report.results.is_empty() {
        return out;
    }

    out.push_str("\n## Latency distribution\n\n");
    out.push_str(
        "| Scenario | Fault | Submitted | p50 (ms) | p95 (ms) | p99 (ms) | Max (ms) | Achieved rps | Status codes |\n",
    );
    out.push_str("|---|---|---|---|---|---|---|---|---|\n");
    for result in &report.results {
        let latency = &result.latency;
        let _ = writeln!(
            out,
            "| {} | {} | {} | {:.2} | {:.2} | {:.2} | {:.2} | {:.2} | {} |",
            escape_cell(&result.scenario.name),
            fault_label(result),
            result.submitted,
            latency.p50_ms,
            latency.p95_ms,
            latency.p99_ms,
            latency.max_ms,
            result.achieved_rps,
            status_codes(result)
        );
    }

    out
}

fn fault_label(result: &ScenarioResult) -> String {
    match &result.scenario.fault {
        Some(fault) => fault.to_string(),
        None => "none".to_string(),
    }
}

fn status_codes(result: &ScenarioResult) -> String {
    if result.status_codes.is_empty() {
        return "-".to_string();
    }
    result
        .status_codes
        .iter()
        .map(|(status, count)| format!("{}: {}", status, count))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Keep a value inside one table cell: pipes are escaped and line breaks
/// become spaces
fn escape_cell(value: &str) -> String {
    value.replace('|', "\\|").replace(['\r', '\n'], " ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use faultline_core::{FaultSpec, LoadStats, RequestOutcome, Scenario};

    fn result(scenario: Scenario, outcomes: Vec<RequestOutcome>) -> ScenarioResult {
        let started = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        let stats = LoadStats::from_outcomes(outcomes.len() as u64, outcomes);
        ScenarioResult::from_stats(scenario, stats, started, started + Duration::seconds(1))
    }

    fn sample_report() -> Report {
        let mut report = Report::new(
            "Chaos Test Report",
            vec![
                result(
                    Scenario::baseline("Baseline", 10, 20.0),
                    vec![
                        RequestOutcome::from_response(200, 10.0),
                        RequestOutcome::from_response(200, 20.0),
                    ],
                ),
                result(
                    Scenario::baseline("Dependency Down", 10, 20.0).with_fault(FaultSpec::Disable),
                    vec![
                        RequestOutcome::from_response(503, 3.0),
                        RequestOutcome::transport_failure(),
                    ],
                ),
            ],
        );
        report.generated_at = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 30).unwrap();
        report
    }

    #[test]
    fn test_outcome_table() {
        let markdown = render_markdown(&sample_report());
        let lines: Vec<&str> = markdown.lines().collect();

        assert_eq!(lines[0], "# Chaos Test Report");
        assert!(markdown.contains("Generated: 2026-03-01 12:00:30 UTC"));

        let header = lines
            .iter()
            .position(|l| *l == "| Scenario | Success | Fail | Fallback | Avg Latency (ms) |")
            .unwrap();
        assert_eq!(lines[header + 1], "|---|---|---|---|---|");
        assert_eq!(lines[header + 2], "| Baseline | 2 | 0 | 0 | 15.00 |");
        assert_eq!(lines[header + 3], "| Dependency Down | 0 | 1 | 1 | 3.00 |");
    }

    #[test]
    fn test_latency_table() {
        let markdown = render_markdown(&sample_report());
        assert!(markdown.contains("## Latency distribution"));
        assert!(markdown
            .contains("| Baseline | none | 2 | 10.00 | 20.00 | 20.00 | 20.00 | 2.00 | 200: 2 |"));
        assert!(markdown.contains(
            "| Dependency Down | route disabled | 2 | 3.00 | 3.00 | 3.00 | 3.00 | 2.00 | 503: 1 |"
        ));
        assert!(!markdown.contains("Run interrupted"));
    }

    #[test]
    fn test_interrupted_and_empty() {
        let report = Report::new("Partial", Vec::new()).interrupted(true);
        let markdown = render_markdown(&report);
        assert!(markdown.contains("Run interrupted"));
        assert!(markdown.ends_with("|---|---|---|---|---|\n"));
        assert!(!markdown.contains("Latency distribution"));
    }

    #[test]
    fn test_pipe_in_name_is_escaped() {
        assert_eq!(escape_cell("a|b"), "a\\|b");
    }

    #[test]
    fn test_multiline_name_stays_on_one_row() {
        let report = Report::new(
            "Chaos Test Report",
            vec![result(
                Scenario::baseline("Slow\r\ndependency\nretry", 10, 20.0),
                vec![RequestOutcome::from_response(200, 10.0)],
            )],
        );
        let markdown = render_markdown(&report);
        let lines: Vec<&str> = markdown.lines().collect();

        assert!(lines.contains(&"| Slow  dependency retry | 1 | 0 | 0 | 10.00 |"));
        assert!(lines
            .iter()
            .any(|l| l.starts_with("| Slow  dependency retry | none | 1 |")));
        assert!(!lines.iter().any(|l| l.starts_with("dependency")));
    }
}
