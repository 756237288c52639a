use crate::analysis::load_path::LoadImpactReport;
use crate::validation::issue::{Issue, Severity};
use crate::validation::ValidationReport;
use serde_json::Value;
use std::fmt::Write;

/// Renders a validation report as a plain-text audit listing.
///
/// Issues are grouped ERROR, WARNING, INFO; each carries its context values
/// and suggested fixes as a small tree.
pub fn format_report(report: &ValidationReport) -> String {
    let mut out = String::new();
    let verdict = if report.valid { "PASS" } else { "FAIL" };

    let _ = writeln!(out, "VALIDATION REPORT for project '{}':", report.project_id);
    let _ = writeln!(out, "--------------------------------------------------");
    let _ = writeln!(out, "Verdict: {}", verdict);
    let _ = writeln!(
        out,
        "Errors: {}  Warnings: {}  Info: {}",
        report.error_count, report.warning_count, report.info_count
    );
    let _ = writeln!(
        out,
        "Rules executed: {}{}  Duration: {}ms  At: {}",
        report.rules_executed,
        if report.halted_early { " (halted early)" } else { "" },
        report.duration_ms,
        report.timestamp
    );

    if report.issues.is_empty() {
        let _ = writeln!(out, "\nNo issues found.");
        return out;
    }

    let ranked = report.issues_by_severity();
    for severity in [Severity::Error, Severity::Warning, Severity::Info] {
        let group: Vec<&Issue> =
            ranked.iter().copied().filter(|i| i.severity == severity).collect();
        if group.is_empty() {
            continue;
        }
        let _ = writeln!(out, "\n{} ({})", severity.as_str(), group.len());
        for issue in group {
            write_issue(&mut out, issue, "");
        }
    }
    out
}

/// Renders a load impact assessment, path first, then its findings.
pub fn format_load_impact(report: &LoadImpactReport) -> String {
    let mut out = String::new();
    let subject = match &report.feature_id {
        Some(f) => format!("feature '{}'", f),
        None => format!("pin '{}'", report.load_pin_id),
    };
    let _ = writeln!(out, "LOAD IMPACT for {} in project '{}':", subject, report.project_id);
    let _ = writeln!(out, "--------------------------------------------------");
    let _ = writeln!(out, "Verdict: {}", if report.passed { "PASS" } else { "FAIL" });
    let _ = writeln!(out, "Load: {:.3}A at '{}'", report.current, report.load_pin_id);

    if let Some(source) = &report.source_pin_id {
        let capacity = report.source_capacity.map_or("?".to_string(), |c| format!("{:.3}A", c));
        let _ = writeln!(out, "Source: '{}' [{}]", source, capacity);
        let _ = writeln!(out, "Path: {}", report.pin_path.join(" -> "));
        let _ = writeln!(out, "Wires: {}", report.wire_path.join(", "));
        let _ = writeln!(
            out,
            "Resistance: {:.5} ohm  Drop: {:.4}V",
            report.total_resistance, report.voltage_drop
        );
        if !report.unrated_wires.is_empty() {
            let _ = writeln!(out, "Unrated wires: {}", report.unrated_wires.join(", "));
        }
    }

    for issue in &report.issues {
        write_issue(&mut out, issue, "");
    }
    out
}

fn write_issue(out: &mut String, issue: &Issue, prefix: &str) {
    let _ = writeln!(
        out,
        "{}[{}] {} {} '{}': {}",
        prefix,
        issue.code,
        issue.rule_id,
        issue.entity_type.as_str(),
        issue.entity_id,
        issue.message
    );

    let stem = format!("{}    ", prefix);
    let lines: Vec<String> = issue
        .context
        .iter()
        .map(|(k, v)| format!("{} = {}", k, format_value(v)))
        .chain(issue.suggested_fixes.iter().map(|fix| {
            let params: Vec<String> = fix
                .params
                .iter()
                .map(|(k, v)| format!("{}={}", k, format_value(v)))
                .collect();
            format!("Fix: {:?}({})", fix.action, params.join(", "))
        }))
        .collect();

    for (i, line) in lines.iter().enumerate() {
        let connector = if i == lines.len() - 1 { "`--" } else { "|--" };
        let _ = writeln!(out, "{}{} {}", stem, connector, line);
    }
}

fn format_value(v: &Value) -> String {
    match v {
        Value::Number(n) => match n.as_f64() {
            Some(f) if n.is_f64() => format!("{:.3}", f),
            _ => n.to_string(),
        },
        Value::String(s) => s.clone(),
        Value::Array(items) if items.len() > 4 => format!("[{} items]", items.len()),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::issue::{Category, EntityType, FixAction, IssueCode, SuggestedFix};

    fn sample() -> ValidationReport {
        let mut warning = Issue::new(
            IssueCode::WireHighUtilization,
            Severity::Warning,
            Category::Electrical,
            EntityType::Wire,
            "w2",
            "busy wire",
        );
        warning.rule_id = "elec-wire-ampacity".into();
        let mut error = Issue::new(
            IssueCode::WireOvercurrent,
            Severity::Error,
            Category::Electrical,
            EntityType::Wire,
            "w1",
            "too much current",
        )
        .with("current", 3.5)
        .with("gauge", 22)
        .with_fix(SuggestedFix::new(FixAction::IncreaseWireGauge).param("recommendedGauge", 20));
        error.rule_id = "elec-wire-ampacity".into();
        let at = "2024-05-01T10:00:00Z".to_string();
        ValidationReport::new("p1", vec![warning, error], 8, false, 4, at)
    }

    #[test]
    fn test_errors_listed_before_warnings() {
        let text = format_report(&sample());
        assert!(text.starts_with("VALIDATION REPORT for project 'p1':"));
        assert!(text.contains("Verdict: FAIL"));
        let err_at = text.find("ERROR (1)").unwrap();
        let warn_at = text.find("WARNING (1)").unwrap();
        assert!(err_at < warn_at);
        assert!(text.contains("[WIRE_OVERCURRENT] elec-wire-ampacity wire 'w1': too much current"));
        assert!(text.contains("|-- current = 3.500"));
        assert!(text.contains("|-- gauge = 22"));
        assert!(text.contains("`-- Fix: IncreaseWireGauge(recommendedGauge=20)"));
    }

    #[test]
    fn test_clean_report() {
        let report = ValidationReport::new("p1", Vec::new(), 8, false, 1, "t".into());
        let text = format_report(&report);
        assert!(text.contains("Verdict: PASS"));
        assert!(text.contains("No issues found."));
    }

    fn load_report() -> LoadImpactReport {
        LoadImpactReport {
            project_id: "p1".into(),
            feature_id: Some("fog".into()),
            load_pin_id: "l".into(),
            current: 6.0,
            source_pin_id: Some("s".into()),
            pin_path: vec!["l".into(), "j".into(), "s".into()],
            wire_path: vec!["w2".into(), "w1".into()],
            total_resistance: 0.0666,
            voltage_drop: 0.3996,
            source_capacity: Some(5.0),
            unrated_wires: vec!["w2".into()],
            passed: false,
            issues: vec![Issue::new(
                IssueCode::PinOvercurrent,
                Severity::Error,
                Category::Electrical,
                EntityType::Pin,
                "s",
                "source pin overloaded",
            )
            .with("maxCurrent", 5.0)],
        }
    }

    #[test]
    fn test_load_impact_with_source_path() {
        let text = format_load_impact(&load_report());
        assert!(text.starts_with("LOAD IMPACT for feature 'fog' in project 'p1':"));
        assert!(text.contains("Verdict: FAIL"));
        assert!(text.contains("Load: 6.000A at 'l'"));
        assert!(text.contains("Source: 's' [5.000A]"));
        assert!(text.contains("Path: l -> j -> s"));
        assert!(text.contains("Wires: w2, w1"));
        assert!(text.contains("Drop: 0.3996V"));
        assert!(text.contains("Unrated wires: w2"));
        assert!(text.contains("[PIN_OVERCURRENT]"));
        assert!(text.contains("`-- maxCurrent = 5.000"));
    }

    #[test]
    fn test_load_impact_without_source() {
        let mut report = load_report();
        report.feature_id = None;
        report.source_pin_id = None;
        report.source_capacity = None;
        report.pin_path.clear();
        report.wire_path.clear();
        report.issues = vec![Issue::new(
            IssueCode::NoPowerPath,
            Severity::Error,
            Category::Electrical,
            EntityType::Pin,
            "l",
            "no supply reaches the load",
        )];
        let text = format_load_impact(&report);
        assert!(text.starts_with("LOAD IMPACT for pin 'l' in project 'p1':"));
        assert!(!text.contains("Source:"));
        assert!(!text.contains("Unrated wires"));
        assert!(text.contains("[NO_POWER_PATH]"));
    }
}
