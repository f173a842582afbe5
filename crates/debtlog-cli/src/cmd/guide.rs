//! `dl guide`: print the assessment guide.

use crate::output::{OutputMode, pretty_section, render};
use clap::Args;
use debtlog_core::model::{BusinessRisk, Category, Effort, Impact};
use debtlog_core::score::risk_multiplier;
use serde::Serialize;
use std::io::{self, Write};

/// Arguments for `dl guide`.
#[derive(Args, Debug, Default)]
pub struct GuideArgs {
    /// Show only this category.
    pub category: Option<Category>,
}

#[derive(Debug, Serialize)]
struct CategoryGuide {
    category: Category,
    label: &'static str,
    indicators: [&'static str; 4],
}

#[derive(Debug, Serialize)]
struct Level<T> {
    value: T,
    label: String,
    score: f64,
}

#[derive(Debug, Serialize)]
struct Scales {
    impact: Vec<Level<Impact>>,
    effort: Vec<Level<Effort>>,
    business_risk: Vec<Level<BusinessRisk>>,
}

#[derive(Debug, Serialize)]
pub struct Guide {
    categories: Vec<CategoryGuide>,
    #[serde(skip_serializing_if = "Option::is_none")]
    scales: Option<Scales>,
}

impl Guide {
    /// The full guide, or a single category without the scoring scales.
    pub fn new(category: Option<Category>) -> Self {
        let categories = Category::ALL
            .iter()
            .filter(|&&c| category.is_none_or(|wanted| wanted == c))
            .map(|&c| CategoryGuide {
                category: c,
                label: c.label(),
                indicators: c.indicators(),
            })
            .collect();
        let scales = category.is_none().then(Scales::new);
        Self { categories, scales }
    }
}

impl Scales {
    fn new() -> Self {
        Self {
            impact: Impact::ALL
                .iter()
                .map(|&value| Level {
                    value,
                    label: value.label().to_string(),
                    score: f64::from(value.score()),
                })
                .collect(),
            effort: Effort::ALL
                .iter()
                .map(|&value| Level {
                    value,
                    label: value.label().to_string(),
                    score: f64::from(value.score()),
                })
                .collect(),
            business_risk: BusinessRisk::ALL
                .iter()
                .map(|&value| Level {
                    value,
                    label: value.to_string(),
                    score: risk_multiplier(Some(value)),
                })
                .collect(),
        }
    }
}

fn write_guide(guide: &Guide, w: &mut dyn Write) -> io::Result<()> {
    for section in &guide.categories {
        pretty_section(w, &format!("{} ({})", section.label, section.category))?;
        for indicator in section.indicators {
            writeln!(w, "  - {indicator}")?;
        }
        writeln!(w)?;
    }

    if let Some(scales) = &guide.scales {
        pretty_section(w, "Scoring")?;
        let impact: Vec<String> = scales
            .impact
            .iter()
            .map(|l| format!("{}={}", l.value, l.score))
            .collect();
        let effort: Vec<String> = scales
            .effort
            .iter()
            .map(|l| format!("{}={}", l.value, l.score))
            .collect();
        let risk: Vec<String> = scales
            .business_risk
            .iter()
            .map(|l| format!("{}=x{}", l.value, l.score))
            .collect();
        writeln!(w, "impact:  {}", impact.join(" "))?;
        writeln!(w, "effort:  {}", effort.join(" "))?;
        writeln!(w, "risk:    {}", risk.join(" "))?;
        writeln!(w, "priority = impact / effort x risk, one decimal")?;
    }
    Ok(())
}

/// Write the guide to `w` in the given mode.
///
/// # Errors
///
/// Returns an error if writing the output fails.
pub fn render_guide(guide: &Guide, output: OutputMode, w: &mut dyn Write) -> anyhow::Result<()> {
    render(w, output, guide, write_guide)
}

/// Execute `dl guide`.
///
/// # Errors
///
/// Returns an error if writing the output fails.
pub fn run_guide(args: &GuideArgs, output: OutputMode, w: &mut dyn Write) -> anyhow::Result<()> {
    render_guide(&Guide::new(args.category), output, w)
}
