//! Human-readable rendering of synthesis results.

use crate::core::{RiskCategory, Severity, SynthesizedRiskOutput};
use crate::tracking::{TrackedSynthesis, TrendDirection};
use colored::*;
use comfy_table::{presets::UTF8_FULL, Cell, Table};
use serde::{Deserialize, Serialize};

/// Reduced projection for dashboard and board-sync consumers: status
/// label, percentage strings and the top mitigation items, without
/// exposing internal contribution math.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DashboardProjection {
    pub status_label: String,
    pub risk_percentage: String,
    pub confidence_percentage: String,
    pub primary_driver: String,
    pub top_mitigations: Vec<String>,
}

impl DashboardProjection {
    pub fn from_output(output: &SynthesizedRiskOutput) -> Self {
        Self {
            status_label: format!("{} RISK", output.severity),
            risk_percentage: format!("{:.0}%", output.overall_score * 100.0),
            confidence_percentage: format!("{:.0}%", output.confidence * 100.0),
            primary_driver: output.primary_driver.to_string(),
            top_mitigations: output
                .mitigation_suggestions
                .iter()
                .take(3)
                .cloned()
                .collect(),
        }
    }
}

fn severity_label(severity: Severity) -> ColoredString {
    match severity {
        Severity::Low => "LOW".green(),
        Severity::Medium => "MEDIUM".yellow(),
        Severity::High => "HIGH".truecolor(255, 140, 0),
        Severity::Critical => "CRITICAL".red().bold(),
    }
}

fn trend_glyph(direction: TrendDirection) -> &'static str {
    match direction {
        TrendDirection::Improving => "↓ improving",
        TrendDirection::Worsening => "↑ worsening",
        TrendDirection::Stable => "→ stable",
    }
}

/// Render one tracked synthesis for the terminal.
pub fn format_synthesis_terminal(tracked: &TrackedSynthesis) -> String {
    let output = &tracked.output;
    let mut text = String::new();

    text.push_str(&format!(
        "🎯 PROJECT RISK: {} — {} ({} strategy, {} phase)\n",
        output.project_id,
        severity_label(output.severity),
        output.strategy,
        output.phase,
    ));
    if let Some(task) = &output.task_id {
        text.push_str(&format!("   Task: {task}\n"));
    }
    text.push_str(&format!(
        "   Score: {:.0}%  Confidence: {:.0}%  Trend: {} (velocity {:+.3}/call)\n",
        output.overall_score * 100.0,
        output.confidence * 100.0,
        trend_glyph(tracked.trend.direction),
        tracked.trend.velocity,
    ));
    if output.interaction_uplift > 0.0 {
        text.push_str(&format!(
            "   Interaction uplift: +{:.0} pts\n",
            output.interaction_uplift * 100.0
        ));
    }
    text.push('\n');

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Domain", "Contribution"]);
    for category in RiskCategory::ALL {
        if let Some(share) = output.contributions.get(&category) {
            let marker = if category == output.primary_driver {
                " ◀ primary"
            } else if Some(category) == output.secondary_driver {
                " ◀ secondary"
            } else {
                ""
            };
            table.add_row(vec![
                Cell::new(format!("{category}{marker}")),
                Cell::new(format!("{:.0}%", share * 100.0)),
            ]);
        }
    }
    text.push_str(&table.to_string());
    text.push('\n');

    text.push_str(&format!("\n{}\n", output.narrative_explanation));

    if !output.mitigation_suggestions.is_empty() {
        text.push_str("\nSuggested mitigations:\n");
        for (i, item) in output.mitigation_suggestions.iter().enumerate() {
            text.push_str(&format!("  {}. {item}\n", i + 1));
        }
    }

    for alert in &tracked.alerts {
        text.push_str(&format!("\n⚠ ALERT [{}]: {}\n", alert.severity, alert.message));
    }

    text
}

/// Render one tracked synthesis as a markdown section.
pub fn format_synthesis_markdown(tracked: &TrackedSynthesis) -> String {
    let output = &tracked.output;
    let mut text = String::new();

    text.push_str(&format!(
        "## {} — {} risk\n\n",
        output.project_id, output.severity
    ));
    text.push_str(&format!(
        "Generated: {}\n\n",
        output.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    text.push_str("| Metric | Value |\n|--------|-------|\n");
    text.push_str(&format!(
        "| Overall score | {:.0}% |\n",
        output.overall_score * 100.0
    ));
    text.push_str(&format!("| Severity | {} |\n", output.severity));
    text.push_str(&format!(
        "| Confidence | {:.0}% |\n",
        output.confidence * 100.0
    ));
    text.push_str(&format!("| Strategy | {} |\n", output.strategy));
    text.push_str(&format!("| Phase | {} |\n", output.phase));
    text.push_str(&format!(
        "| Trend | {} |\n\n",
        trend_glyph(tracked.trend.direction)
    ));

    text.push_str("### Contributions\n\n| Domain | Share |\n|--------|-------|\n");
    for (category, share) in &output.contributions {
        text.push_str(&format!("| {category} | {:.0}% |\n", share * 100.0));
    }
    text.push('\n');

    text.push_str(&format!("{}\n", output.narrative_explanation));

    if !output.mitigation_suggestions.is_empty() {
        text.push_str("\n### Mitigations\n\n");
        for item in &output.mitigation_suggestions {
            text.push_str(&format!("- {item}\n"));
        }
    }

    for alert in &tracked.alerts {
        text.push_str(&format!("\n> **ALERT ({})**: {}\n", alert.severity, alert.message));
    }

    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RiskWeightConfig;
    use crate::core::{AggregationStrategy, MultiFactorRiskInput, ProjectPhase, RiskFactorInput};
    use crate::tracking::RiskTracker;

    fn tracked() -> TrackedSynthesis {
        let tracker = RiskTracker::new(RiskWeightConfig::default()).unwrap();
        let input = MultiFactorRiskInput::new("alpha", ProjectPhase::Execution)
            .add_factor(RiskFactorInput::new(RiskCategory::Cost, 0.8, 0.9))
            .add_factor(RiskFactorInput::new(RiskCategory::Schedule, 0.7, 0.85));
        tracker
            .record(&input, AggregationStrategy::WeightedAverage)
            .unwrap()
    }

    #[test]
    fn test_projection_reduces_output() {
        let tracked = tracked();
        let projection = DashboardProjection::from_output(&tracked.output);

        assert!(projection.status_label.contains("RISK"));
        assert!(projection.risk_percentage.ends_with('%'));
        assert!(projection.top_mitigations.len() <= 3);
        // The projection must not leak contribution math
        let json = serde_json::to_string(&projection).unwrap();
        assert!(!json.contains("contributions"));
    }

    #[test]
    fn test_terminal_format_names_project_and_drivers() {
        let tracked = tracked();
        let text = format_synthesis_terminal(&tracked);

        assert!(text.contains("alpha"));
        assert!(text.contains("primary"));
        assert!(text.contains("Suggested mitigations"));
    }

    #[test]
    fn test_markdown_format_has_tables() {
        let tracked = tracked();
        let text = format_synthesis_markdown(&tracked);

        assert!(text.contains("| Metric | Value |"));
        assert!(text.contains("### Contributions"));
    }
}
