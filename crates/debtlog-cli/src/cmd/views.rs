//! Renderers for entries, drafts, summaries, and the report.

use crate::output::{OutputMode, Renderable, pretty_kv, pretty_rule, pretty_section, render_mode};
use debtlog_core::model::{DebtEntry, Effort, EntryDraft, Impact};
use debtlog_core::{Category, Report, Summary};
use serde::Serialize;
use std::io::{self, Write};

const EMPTY_PLACEHOLDER: &str = "No debt items recorded yet. Use `add` or `set` + `submit`.";

fn or_unset(value: Option<impl ToString>) -> String {
    value.map_or_else(|| "unset".to_string(), |v| v.to_string())
}

/// One entry, rendered as a list row or a detail block.
pub struct EntryRow<'a>(pub &'a DebtEntry);

impl Renderable for EntryRow<'_> {
    fn render_human(&self, w: &mut dyn Write) -> io::Result<()> {
        let entry = self.0;
        writeln!(
            w,
            "[{}] {}  priority {}",
            entry.id(),
            entry.category().label(),
            entry.priority()
        )?;
        writeln!(w, "  {}", entry.description())?;
        writeln!(
            w,
            "  impact: {}  effort: {}  risk: {}",
            or_unset(entry.impact().map(Impact::label)),
            entry.effort().label(),
            or_unset(entry.business_risk())
        )
    }

    fn render_json(&self, w: &mut dyn Write) -> io::Result<()> {
        serde_json::to_writer(&mut *w, self.0)?;
        Ok(())
    }

    fn render_table(&self, w: &mut dyn Write) -> io::Result<()> {
        let entry = self.0;
        writeln!(
            w,
            "{}  {}  {}  {}  {}  {}  {}",
            entry.id(),
            entry.priority(),
            entry.category(),
            or_unset(entry.impact()),
            entry.effort(),
            or_unset(entry.business_risk()),
            entry.description()
        )
    }

    fn table_headers() -> &'static [&'static str] {
        &[
            "ID",
            "PRIORITY",
            "CATEGORY",
            "IMPACT",
            "EFFORT",
            "RISK",
            "DESCRIPTION",
        ]
    }
}

/// Write the placeholder shown for views over an empty store.
pub fn write_placeholder(w: &mut dyn Write) -> io::Result<()> {
    writeln!(w, "{EMPTY_PLACEHOLDER}")
}

#[derive(Debug, Serialize)]
struct DraftView<'a> {
    #[serde(flatten)]
    draft: &'a EntryDraft,
    can_submit: bool,
}

/// Render the in-progress draft.
///
/// # Errors
///
/// Returns an error if writing the output fails.
pub fn render_draft(w: &mut dyn Write, output: OutputMode, draft: &EntryDraft) -> anyhow::Result<()> {
    let view = DraftView {
        draft,
        can_submit: draft.has_required_fields(),
    };
    render_mode(
        w,
        output,
        &view,
        |v, w| {
            writeln!(
                w,
                "category={} impact={} effort={} risk={} ready={} description={}",
                or_unset(v.draft.category),
                or_unset(v.draft.impact),
                or_unset(v.draft.effort),
                or_unset(v.draft.business_risk),
                v.can_submit,
                v.draft.description
            )
        },
        |v, w| {
            pretty_section(w, "Draft")?;
            pretty_kv(w, "Category", or_unset(v.draft.category.map(Category::label)))?;
            pretty_kv(w, "Description", &v.draft.description)?;
            pretty_kv(w, "Impact", or_unset(v.draft.impact.map(Impact::label)))?;
            pretty_kv(w, "Effort", or_unset(v.draft.effort.map(Effort::label)))?;
            pretty_kv(w, "Business risk", or_unset(v.draft.business_risk))?;
            pretty_kv(w, "Ready", if v.can_submit { "yes" } else { "no" })
        },
    )
}

fn write_summary_text(summary: &Summary, w: &mut dyn Write) -> io::Result<()> {
    writeln!(w, "total {}", summary.total_count)?;
    writeln!(w, "high_priority {}", summary.high_priority_count)?;
    writeln!(w, "average_priority {}", summary.average_priority)?;
    writeln!(w, "categories_affected {}", summary.categories_affected)?;
    for (category, count) in &summary.per_category_count {
        writeln!(w, "{category} {count}")?;
    }
    Ok(())
}

fn write_summary_pretty(summary: &Summary, w: &mut dyn Write) -> io::Result<()> {
    pretty_section(w, "Executive Summary")?;
    pretty_kv(w, "Total Debt Items", summary.total_count.to_string())?;
    pretty_kv(w, "High Priority", summary.high_priority_count.to_string())?;
    pretty_kv(w, "Average Priority", summary.average_priority.to_string())?;
    writeln!(w)?;
    pretty_section(w, "Category Breakdown")?;
    for (category, count) in &summary.per_category_count {
        writeln!(w, "{:<26} {count}", category.label())?;
    }
    Ok(())
}

/// Render the summary statistics.
///
/// # Errors
///
/// Returns an error if writing the output fails.
pub fn render_summary(w: &mut dyn Write, output: OutputMode, summary: &Summary) -> anyhow::Result<()> {
    render_mode(w, output, summary, write_summary_text, write_summary_pretty)
}

fn write_report_text(report: &Report<'_>, w: &mut dyn Write) -> io::Result<()> {
    if report.is_empty() {
        return write_placeholder(w);
    }
    write_summary_text(&report.summary, w)?;
    for finding in &report.key_findings {
        writeln!(w, "finding {finding}")?;
    }
    for (rank, entry) in report.top.iter().enumerate() {
        writeln!(
            w,
            "top {} {} {} {}",
            rank + 1,
            entry.id(),
            entry.priority(),
            entry.description()
        )?;
    }
    for rec in report.recommendations {
        writeln!(w, "recommendation {}: {}", rec.horizon, rec.action)?;
    }
    Ok(())
}

fn write_report_pretty(report: &Report<'_>, w: &mut dyn Write) -> io::Result<()> {
    if report.is_empty() {
        return write_placeholder(w);
    }
    write_summary_pretty(&report.summary, w)?;
    writeln!(w)?;

    pretty_section(w, "Key Findings")?;
    for finding in &report.key_findings {
        writeln!(w, "  * {finding}")?;
    }
    writeln!(w)?;

    pretty_section(w, "Top Priority Items")?;
    for (rank, entry) in report.top.iter().enumerate() {
        writeln!(
            w,
            "#{} {} [{}] Priority: {}",
            rank + 1,
            entry.category().label(),
            or_unset(entry.impact().map(Impact::label)),
            entry.priority()
        )?;
        writeln!(w, "   {}", entry.description())?;
    }
    writeln!(w)?;

    pretty_section(w, "Recommendations")?;
    for rec in report.recommendations {
        writeln!(w, "{}", rec.horizon)?;
        writeln!(w, "  {}", rec.action)?;
    }
    pretty_rule(w)
}

/// Render the stakeholder report, or the placeholder when nothing is recorded.
///
/// # Errors
///
/// Returns an error if writing the output fails.
pub fn render_report(w: &mut dyn Write, output: OutputMode, report: &Report<'_>) -> anyhow::Result<()> {
    render_mode(w, output, report, write_report_text, write_report_pretty)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::render_list;
    use debtlog_core::model::BusinessRisk;
    use debtlog_core::{ItemStore, ReportSettings};

    fn store() -> ItemStore {
        let mut store = ItemStore::new();
        for (category, impact, effort, risk, description) in [
            (
                Category::Testing,
                Impact::High,
                Effort::Months,
                BusinessRisk::Medium,
                "flaky suite",
            ),
            (
                Category::Security,
                Impact::Critical,
                Effort::Weeks,
                BusinessRisk::High,
                "plaintext secrets",
            ),
        ] {
            store
                .add(&EntryDraft {
                    category: Some(category),
                    description: description.to_string(),
                    impact: Some(impact),
                    effort: Some(effort),
                    business_risk: Some(risk),
                })
                .unwrap();
        }
        store
    }

    fn utf8(buf: Vec<u8>) -> String {
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn entry_rows_in_text_mode_have_headers() {
        let store = store();
        let rows: Vec<EntryRow<'_>> = store
            .list_by_priority_descending()
            .into_iter()
            .map(EntryRow)
            .collect();
        let mut buf = Vec::new();
        render_list(&mut buf, &rows, OutputMode::Text).unwrap();
        let text = utf8(buf);
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[0].starts_with("ID  PRIORITY"));
        assert!(lines[1].contains("  7.5  security  critical  weeks  high  plaintext secrets"));
        assert!(lines[2].contains("  2.4  testing  high  months  medium  flaky suite"));
    }

    #[test]
    fn entry_json_uses_numeric_priority() {
        let store = store();
        let entry = store.top_n(1)[0];
        let mut buf = Vec::new();
        EntryRow(entry).render_json(&mut buf).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(json["priority"], 7.5);
        assert_eq!(json["category"], "security");
    }

    #[test]
    fn empty_report_renders_placeholder() {
        let store = ItemStore::new();
        let settings = ReportSettings::default();
        let report = store.report(settings.top_n, settings.high_priority_threshold);
        let mut buf = Vec::new();
        render_report(&mut buf, OutputMode::Pretty, &report).unwrap();
        assert_eq!(utf8(buf), format!("{EMPTY_PLACEHOLDER}\n"));
    }

    #[test]
    fn pretty_report_has_all_sections() {
        let store = store();
        let settings = ReportSettings::default();
        let report = store.report(settings.top_n, settings.high_priority_threshold);
        let mut buf = Vec::new();
        render_report(&mut buf, OutputMode::Pretty, &report).unwrap();
        let text = utf8(buf);
        for heading in [
            "Executive Summary",
            "Category Breakdown",
            "Key Findings",
            "Top Priority Items",
            "Recommendations",
        ] {
            assert!(text.contains(heading), "missing {heading}");
        }
        assert!(text.contains("#1 Security [Critical] Priority: 7.5"));
        assert!(text.contains("Immediate Actions (Next 30 days)"));
    }

    #[test]
    fn json_report_includes_summary_and_top() {
        let store = store();
        let report = store.report(1, ReportSettings::default().high_priority_threshold);
        let mut buf = Vec::new();
        render_report(&mut buf, OutputMode::Json, &report).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(json["summary"]["total_count"], 2);
        assert_eq!(json["summary"]["average_priority"], 5.0);
        assert_eq!(json["top"].as_array().map(Vec::len), Some(1));
        assert_eq!(json["recommendations"][2]["horizon"], "Long-term Strategy");
    }

    #[test]
    fn draft_text_shows_readiness() {
        let draft = EntryDraft {
            category: Some(Category::Tooling),
            description: "manual deploys".to_string(),
            ..EntryDraft::default()
        };
        let mut buf = Vec::new();
        render_draft(&mut buf, OutputMode::Text, &draft).unwrap();
        assert_eq!(
            utf8(buf),
            "category=tooling impact=unset effort=unset risk=unset ready=true description=manual deploys\n"
        );
    }

    #[test]
    fn or_unset_formats_present_values() {
        assert_eq!(or_unset(Some(Impact::High)), "high");
        assert_eq!(or_unset(Some("Weeks")), "Weeks");
        assert_eq!(or_unset(None::<Impact>), "unset");
    }
}
