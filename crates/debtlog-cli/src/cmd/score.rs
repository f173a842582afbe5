//! `dl score`: compute a priority without recording an entry.

use crate::output::{OutputMode, pretty_kv, pretty_section, render_mode};
use clap::Args;
use debtlog_core::model::{BusinessRisk, Effort, Impact};
use debtlog_core::score::risk_multiplier;
use debtlog_core::{Priority, compute_priority};
use serde::Serialize;
use std::io::Write;

/// Arguments for `dl score`.
#[derive(Args, Debug)]
pub struct ScoreArgs {
    /// Business impact: critical, high, medium, low, or minimal.
    #[arg(long)]
    pub impact: Impact,

    /// Remediation effort: weeks, months, quarters, or years.
    #[arg(long)]
    pub effort: Effort,

    /// Business risk: high, medium, or low. Unset is neutral.
    #[arg(long)]
    pub risk: Option<BusinessRisk>,
}

#[derive(Debug, Serialize)]
struct ScoreOutput {
    impact: Impact,
    impact_score: u8,
    effort: Effort,
    effort_score: u8,
    business_risk: Option<BusinessRisk>,
    risk_multiplier: f64,
    priority: Priority,
}

impl ScoreOutput {
    fn new(args: &ScoreArgs) -> Self {
        Self {
            impact: args.impact,
            impact_score: args.impact.score(),
            effort: args.effort,
            effort_score: args.effort.score(),
            business_risk: args.risk,
            risk_multiplier: risk_multiplier(args.risk),
            priority: compute_priority(Some(args.impact), args.effort, args.risk),
        }
    }
}

/// Execute `dl score`.
///
/// # Errors
///
/// Returns an error if writing the output fails.
pub fn run_score(args: &ScoreArgs, output: OutputMode, w: &mut dyn Write) -> anyhow::Result<()> {
    let result = ScoreOutput::new(args);
    tracing::debug!(priority = %result.priority, "computed priority");

    render_mode(
        w,
        output,
        &result,
        |r, w| writeln!(w, "{}", r.priority),
        |r, w| {
            pretty_section(w, "Priority score")?;
            pretty_kv(w, "Impact", format!("{} ({})", r.impact.label(), r.impact_score))?;
            pretty_kv(w, "Effort", format!("{} ({})", r.effort.label(), r.effort_score))?;
            let risk = r.business_risk.map_or_else(|| "unset".to_string(), |r| r.to_string());
            pretty_kv(w, "Business risk", format!("{risk} (x{})", r.risk_multiplier))?;
            pretty_kv(w, "Priority", r.priority.to_string())
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(args: &ScoreArgs, mode: OutputMode) -> String {
        let mut buf = Vec::new();
        run_score(args, mode, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn text_mode_prints_bare_priority() {
        let args = ScoreArgs {
            impact: Impact::High,
            effort: Effort::Months,
            risk: Some(BusinessRisk::Medium),
        };
        assert_eq!(run(&args, OutputMode::Text), "2.4\n");
    }

    #[test]
    fn json_mode_reports_inputs_and_priority() {
        let args = ScoreArgs {
            impact: Impact::Critical,
            effort: Effort::Weeks,
            risk: Some(BusinessRisk::High),
        };
        let json: serde_json::Value = serde_json::from_str(&run(&args, OutputMode::Json)).unwrap();
        assert_eq!(json["impact"], "critical");
        assert_eq!(json["effort_score"], 1);
        assert_eq!(json["risk_multiplier"], 1.5);
        assert_eq!(json["priority"], 7.5);
    }

    #[test]
    fn unset_risk_is_neutral() {
        let args = ScoreArgs {
            impact: Impact::Medium,
            effort: Effort::Quarters,
            risk: None,
        };
        let pretty = run(&args, OutputMode::Pretty);
        assert!(pretty.contains("unset (x1)"));
        assert!(pretty.contains("Priority:"));
        assert!(pretty.contains(" 1\n"));
    }
}
