use std::fmt::Write;

use process_insight::{utils::DurationUnit, AnalysisReport, DurationAttribution};

fn format_duration(value: f64, unit: DurationUnit) -> String {
    format!("{value:.2} {}", unit.suffix())
}

/// Human-readable rendering of an [`AnalysisReport`]
pub fn render_text(report: &AnalysisReport) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail
    let _ = write_report(&mut out, report);
    out
}

fn write_report(out: &mut String, report: &AnalysisReport) -> std::fmt::Result {
    writeln!(
        out,
        "{} events, {} cases, {} activities",
        report.num_events, report.num_cases, report.num_activities
    )?;

    writeln!(out, "\nDirectly-follows relations:")?;
    let mut edges = report.dfg.edges();
    edges.sort_by(|a, b| {
        b.weight
            .cmp(&a.weight)
            .then_with(|| (&a.source, &a.target).cmp(&(&b.source, &b.target)))
    });
    for edge in &edges {
        writeln!(out, "  {} -> {} ({})", edge.source, edge.target, edge.weight)?;
    }

    writeln!(out, "\nCase pathways:")?;
    for pathway in &report.pathways {
        writeln!(out, "  {pathway}")?;
    }

    let bottlenecks = &report.bottlenecks;
    let unit = bottlenecks.unit;
    writeln!(
        out,
        "\nMean duration per activity ({} attribution, in {unit}):",
        match bottlenecks.attribution {
            DurationAttribution::Incoming => "incoming",
            DurationAttribution::Outgoing => "outgoing",
        }
    )?;
    let width = bottlenecks
        .ranking
        .iter()
        .map(|s| s.activity.chars().count())
        .max()
        .unwrap_or(0)
        .max("Activity".len());
    writeln!(
        out,
        "  {:<width$}  {:>12}  {:>12}  {:>12}  {:>5}",
        "Activity", "Mean", "Min", "Max", "Count"
    )?;
    for row in &bottlenecks.ranking {
        writeln!(
            out,
            "  {:<width$}  {:>12}  {:>12}  {:>12}  {:>5}",
            row.activity,
            format_duration(row.stats.mean_in(unit), unit),
            format_duration(unit.convert(row.stats.min), unit),
            format_duration(unit.convert(row.stats.max), unit),
            row.stats.count
        )?;
    }
    if !bottlenecks.activities_without_samples.is_empty() {
        writeln!(
            out,
            "  No duration data: {}",
            bottlenecks.activities_without_samples.join(", ")
        )?;
    }
    if !bottlenecks.excluded_activities.is_empty() {
        writeln!(
            out,
            "  Excluded: {}",
            bottlenecks.excluded_activities.join(", ")
        )?;
    }

    if !report.short_gaps.is_empty() {
        writeln!(out, "\nShort gaps between consecutive events:")?;
        for gap in &report.short_gaps {
            writeln!(
                out,
                "  Case {}: {} -> {} (rows {}-{}): {}",
                gap.case_id,
                gap.from_activity,
                gap.to_activity,
                gap.from_row,
                gap.to_row,
                format_duration(DurationUnit::Seconds.convert(gap.gap), DurationUnit::Seconds)
            )?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use process_insight::{analyze, sample_event_table, AnalysisConfig};

    #[test]
    fn renders_sample_report() {
        let table = sample_event_table().unwrap();
        let text = render_text(&analyze(&table, &AnalysisConfig::default()));
        assert!(text.starts_with("30 events, 4 cases, 8 activities"));
        assert!(text.contains("  Start -> Receive Invoice (4)"));
        assert!(text.contains("  Case 4: Start -> Receive Invoice -> Validate Invoice"));
        assert!(text.contains("No duration data: Start"));
        assert!(!text.contains("Short gaps"));
    }

    #[test]
    fn strongest_relations_first() {
        let table = sample_event_table().unwrap();
        let text = render_text(&analyze(&table, &AnalysisConfig::default()));
        let strong = text.find("Start -> Receive Invoice (4)").unwrap();
        let weak = text.find("Validate Invoice -> Resolve Discrepancy (1)").unwrap();
        assert!(strong < weak);
    }
}
