use std::fmt::Write;

use crate::models::{Category, Report, ScoredItem, SignalAnalysis};

fn heading(category: Category) -> &'static str {
    match category {
        Category::Blocker => "Biggest Blocker",
        Category::Risk => "Top Risk",
        Category::Task => "Task Completed",
        Category::Win => "Major Win",
    }
}

fn percent(rate: f64) -> f64 {
    rate * 100.0
}

pub fn render_summary(report: &Report) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "# Executive Summary");
    let _ = writeln!(
        output,
        "Report {} generated {}",
        report.id,
        report.generated_at.format("%Y-%m-%d %H:%M UTC")
    );
    match report.acknowledged_at {
        Some(at) if report.acknowledged => {
            let _ = writeln!(output, "Acknowledged {}", at.format("%Y-%m-%d %H:%M UTC"));
        }
        _ => {
            let _ = writeln!(output, "Awaiting acknowledgement");
        }
    }
    let _ = writeln!(output);

    if report.items.is_empty() {
        let _ = writeln!(output, "No signals to summarize.");
    } else {
        for item in &report.items {
            let _ = writeln!(output, "- **{}:** {}", heading(item.category), item.content);
        }
    }

    output
}

/// Renders a report as markdown. The priority view is included only when
/// scored items are supplied.
pub fn render_markdown(
    report: &Report,
    scored: Option<&[ScoredItem]>,
    analysis: &SignalAnalysis,
) -> String {
    let mut output = render_summary(report);

    if let Some(scored) = scored {
        let _ = writeln!(output);
        let _ = writeln!(output, "## Priority View");
        if scored.is_empty() {
            let _ = writeln!(output, "No signals scored.");
        } else {
            for item in scored {
                let _ = writeln!(
                    output,
                    "- [{}] score {:.2}: {}",
                    item.category, item.score, item.text
                );
            }
        }
    }

    let _ = writeln!(output);
    output.push_str(&render_analysis(analysis));
    output
}

pub fn render_analysis(analysis: &SignalAnalysis) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "## Section Engagement");
    if analysis.engagement.is_empty() {
        let _ = writeln!(output, "No sections reported.");
    } else {
        for entry in &analysis.engagement {
            let _ = writeln!(
                output,
                "- {}: {:.0}% updated",
                entry.section,
                percent(entry.update_rate)
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Low-Quality Updates");
    if analysis.quality.is_empty() {
        let _ = writeln!(output, "No sections reported.");
    } else {
        for entry in &analysis.quality {
            let _ = writeln!(
                output,
                "- {}: {:.0}% low quality",
                entry.section,
                percent(entry.low_quality_rate)
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Rework Root Causes");
    let recurring: Vec<_> = analysis.root_causes.iter().filter(|c| c.count > 0).collect();
    if recurring.is_empty() {
        let _ = writeln!(output, "No recurring feedback phrases.");
    } else {
        for cause in recurring {
            let _ = writeln!(output, "- \"{}\": {}", cause.phrase, cause.count);
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(
        output,
        "Leadership viewed {:.0}% of updates.",
        percent(analysis.leadership_view_rate)
    );

    output
}
