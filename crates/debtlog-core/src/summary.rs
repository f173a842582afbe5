//! Aggregate statistics and the stakeholder report.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::model::{Category, DebtEntry};
use crate::score::Priority;
use crate::store::StoreState;

/// Entries at or above this priority need immediate attention.
pub const DEFAULT_HIGH_PRIORITY_THRESHOLD: Priority = Priority::from_tenths(30);

/// Number of entries listed in the report's top-priority section.
pub const DEFAULT_TOP_N: usize = 5;

/// Knobs for the report view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReportSettings {
    pub top_n: usize,
    pub high_priority_threshold: Priority,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            high_priority_threshold: DEFAULT_HIGH_PRIORITY_THRESHOLD,
        }
    }
}

/// Derived statistics over every entry in a store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total_count: usize,
    pub high_priority_count: usize,
    /// Always contains all eight categories, zero counts included.
    pub per_category_count: BTreeMap<Category, usize>,
    pub average_priority: Priority,
    /// Number of categories with at least one entry.
    pub categories_affected: usize,
}

impl Summary {
    #[must_use]
    pub fn from_entries(entries: &[DebtEntry], high_priority_threshold: Priority) -> Self {
        let mut per_category_count: BTreeMap<Category, usize> =
            Category::ALL.iter().map(|&category| (category, 0)).collect();
        let mut high_priority_count = 0;
        let mut sum_tenths: u64 = 0;

        for entry in entries {
            *per_category_count.entry(entry.category()).or_insert(0) += 1;
            if entry.priority() >= high_priority_threshold {
                high_priority_count += 1;
            }
            sum_tenths += u64::from(entry.priority().tenths());
        }

        let categories_affected = per_category_count.values().filter(|&&n| n > 0).count();

        Self {
            total_count: entries.len(),
            high_priority_count,
            per_category_count,
            average_priority: average(sum_tenths, entries.len()),
            categories_affected,
        }
    }

    #[must_use]
    pub fn count_for(&self, category: Category) -> usize {
        self.per_category_count.get(&category).copied().unwrap_or(0)
    }
}

/// Mean of `count` priorities summing to `sum_tenths`, rounded half up to
/// one decimal. Zero when there are no entries.
fn average(sum_tenths: u64, count: usize) -> Priority {
    let Ok(count) = u64::try_from(count) else {
        return Priority::ZERO;
    };
    if count == 0 {
        return Priority::ZERO;
    }
    let rounded = (2 * sum_tenths + count) / (2 * count);
    Priority::from_tenths(u32::try_from(rounded).unwrap_or(u32::MAX))
}

/// One planning horizon in the report's recommendations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Recommendation {
    pub horizon: &'static str,
    pub action: &'static str,
}

pub const RECOMMENDATIONS: [Recommendation; 3] = [
    Recommendation {
        horizon: "Immediate Actions (Next 30 days)",
        action: "Address critical and high-impact items that can be resolved quickly",
    },
    Recommendation {
        horizon: "Short-term Planning (Next quarter)",
        action: "Include medium-priority items in sprint planning and allocate dedicated time",
    },
    Recommendation {
        horizon: "Long-term Strategy",
        action: "Establish processes to prevent future debt accumulation and regular assessment cycles",
    },
];

/// The stakeholder report: summary, top entries, and key findings.
#[derive(Debug, Clone, Serialize)]
pub struct Report<'a> {
    #[serde(skip)]
    pub state: StoreState,
    pub summary: Summary,
    pub high_priority_threshold: Priority,
    pub top: Vec<&'a DebtEntry>,
    pub key_findings: Vec<String>,
    pub recommendations: &'static [Recommendation],
}

impl<'a> Report<'a> {
    #[must_use]
    pub fn new(summary: Summary, top: Vec<&'a DebtEntry>, high_priority_threshold: Priority) -> Self {
        let state = if summary.total_count == 0 {
            StoreState::Empty
        } else {
            StoreState::NonEmpty
        };
        let key_findings = key_findings(&summary);
        Self {
            state,
            summary,
            high_priority_threshold,
            top,
            key_findings,
            recommendations: &RECOMMENDATIONS,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.state == StoreState::Empty
    }
}

fn key_findings(summary: &Summary) -> Vec<String> {
    vec![
        format!(
            "Our analysis identified {} technical debt items across {} categories",
            summary.total_count, summary.categories_affected
        ),
        format!(
            "{} items require immediate attention due to high business impact",
            summary.high_priority_count
        ),
        "Addressing top priority items could significantly improve development velocity and \
         system reliability"
            .to_string(),
    ]
}
