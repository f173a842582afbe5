use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::id::EntryId;
use crate::score::Priority;

/// The eight fixed debt categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    CodeQuality,
    Architecture,
    Testing,
    Documentation,
    Security,
    Performance,
    Dependencies,
    Tooling,
}

impl Category {
    /// Every category, in report order.
    pub const ALL: [Self; 8] = [
        Self::CodeQuality,
        Self::Architecture,
        Self::Testing,
        Self::Documentation,
        Self::Security,
        Self::Performance,
        Self::Dependencies,
        Self::Tooling,
    ];

    const fn as_str(self) -> &'static str {
        match self {
            Self::CodeQuality => "code_quality",
            Self::Architecture => "architecture",
            Self::Testing => "testing",
            Self::Documentation => "documentation",
            Self::Security => "security",
            Self::Performance => "performance",
            Self::Dependencies => "dependencies",
            Self::Tooling => "tooling",
        }
    }

    /// Display name used in guides and reports.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::CodeQuality => "Code Quality",
            Self::Architecture => "Architecture",
            Self::Testing => "Testing",
            Self::Documentation => "Documentation",
            Self::Security => "Security",
            Self::Performance => "Performance",
            Self::Dependencies => "Dependencies",
            Self::Tooling => "Tooling & Infrastructure",
        }
    }

    /// Typical symptoms that indicate debt in this category.
    #[must_use]
    pub const fn indicators(self) -> [&'static str; 4] {
        match self {
            Self::CodeQuality => [
                "Duplicated code blocks",
                "Complex, hard-to-maintain functions",
                "Inconsistent coding standards",
                "Missing error handling",
            ],
            Self::Architecture => [
                "Tight coupling between components",
                "Monolithic structures",
                "Inconsistent design patterns",
                "Scalability limitations",
            ],
            Self::Testing => [
                "Low test coverage",
                "Brittle or flaky tests",
                "Missing integration tests",
                "Manual testing processes",
            ],
            Self::Documentation => [
                "Outdated documentation",
                "Missing API documentation",
                "Lack of architectural diagrams",
                "No onboarding guides",
            ],
            Self::Security => [
                "Vulnerable dependencies",
                "Hardcoded credentials",
                "Missing security headers",
                "Unencrypted data transmission",
            ],
            Self::Performance => [
                "Slow database queries",
                "Memory leaks",
                "Inefficient algorithms",
                "Missing caching strategies",
            ],
            Self::Dependencies => [
                "Outdated libraries",
                "Unused dependencies",
                "Version conflicts",
                "Deprecated packages",
            ],
            Self::Tooling => [
                "Manual deployment processes",
                "Missing CI/CD pipelines",
                "Inadequate monitoring",
                "Development environment issues",
            ],
        }
    }
}

/// Business severity of a debt item, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Impact {
    Minimal,
    Low,
    Medium,
    High,
    Critical,
}

impl Impact {
    pub const ALL: [Self; 5] = [
        Self::Critical,
        Self::High,
        Self::Medium,
        Self::Low,
        Self::Minimal,
    ];

    const fn as_str(self) -> &'static str {
        match self {
            Self::Minimal => "minimal",
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }

    /// Ordinal score, `minimal = 1` through `critical = 5`.
    #[must_use]
    pub const fn score(self) -> u8 {
        match self {
            Self::Minimal => 1,
            Self::Low => 2,
            Self::Medium => 3,
            Self::High => 4,
            Self::Critical => 5,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Minimal => "Minimal",
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::Critical => "Critical",
        }
    }
}

/// Estimated remediation cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Effort {
    Weeks,
    Months,
    Quarters,
    Years,
}

impl Effort {
    pub const ALL: [Self; 4] = [Self::Weeks, Self::Months, Self::Quarters, Self::Years];

    const fn as_str(self) -> &'static str {
        match self {
            Self::Weeks => "weeks",
            Self::Months => "months",
            Self::Quarters => "quarters",
            Self::Years => "years",
        }
    }

    /// Ordinal score, `weeks = 1` through `years = 4`. Never zero.
    #[must_use]
    pub const fn score(self) -> u8 {
        match self {
            Self::Weeks => 1,
            Self::Months => 2,
            Self::Quarters => 3,
            Self::Years => 4,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Weeks => "Weeks",
            Self::Months => "Months",
            Self::Quarters => "Quarters",
            Self::Years => "Years",
        }
    }
}

/// Qualitative business risk applied as a priority multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BusinessRisk {
    Low,
    Medium,
    High,
}

impl BusinessRisk {
    pub const ALL: [Self; 3] = [Self::High, Self::Medium, Self::Low];

    const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

/// A recorded technical-debt entry.
///
/// Entries are only built by [`ItemStore::add`](crate::store::ItemStore::add),
/// which assigns the id and derives the priority. Fields are read-only
/// afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DebtEntry {
    id: EntryId,
    category: Category,
    description: String,
    impact: Option<Impact>,
    effort: Effort,
    business_risk: Option<BusinessRisk>,
    priority: Priority,
}

impl DebtEntry {
    pub(crate) const fn new(
        id: EntryId,
        category: Category,
        description: String,
        impact: Option<Impact>,
        effort: Effort,
        business_risk: Option<BusinessRisk>,
        priority: Priority,
    ) -> Self {
        Self {
            id,
            category,
            description,
            impact,
            effort,
            business_risk,
            priority,
        }
    }

    #[must_use]
    pub const fn id(&self) -> EntryId {
        self.id
    }

    #[must_use]
    pub const fn category(&self) -> Category {
        self.category
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub const fn impact(&self) -> Option<Impact> {
        self.impact
    }

    #[must_use]
    pub const fn effort(&self) -> Effort {
        self.effort
    }

    #[must_use]
    pub const fn business_risk(&self) -> Option<BusinessRisk> {
        self.business_risk
    }

    #[must_use]
    pub const fn priority(&self) -> Priority {
        self.priority
    }
}

/// A candidate entry as filled in by the user. Every field may be unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EntryDraft {
    pub category: Option<Category>,
    pub description: String,
    pub impact: Option<Impact>,
    pub effort: Option<Effort>,
    pub business_risk: Option<BusinessRisk>,
}

impl EntryDraft {
    /// Whether the draft carries the two fields required to be accepted.
    #[must_use]
    pub fn has_required_fields(&self) -> bool {
        self.category.is_some() && !self.description.trim().is_empty()
    }

    #[must_use]
    pub fn is_blank(&self) -> bool {
        *self == Self::default()
    }
}

/// The fields of an [`EntryDraft`] that can be set by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DraftField {
    Category,
    Description,
    Impact,
    Effort,
    BusinessRisk,
}

impl DraftField {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Category => "category",
            Self::Description => "description",
            Self::Impact => "impact",
            Self::Effort => "effort",
            Self::BusinessRisk => "risk",
        }
    }
}

/// Error returned when parsing an enum value from text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {expected}: '{got}'")]
pub struct ParseEnumError {
    pub expected: &'static str,
    pub got: String,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Impact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Effort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for BusinessRisk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for DraftField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn normalize(input: &str) -> String {
    input.trim().to_ascii_lowercase().replace(['-', ' '], "_")
}

impl FromStr for Category {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = normalize(s);
        match normalized.as_str() {
            "code_quality" => Ok(Self::CodeQuality),
            "architecture" => Ok(Self::Architecture),
            "testing" => Ok(Self::Testing),
            "documentation" => Ok(Self::Documentation),
            "security" => Ok(Self::Security),
            "performance" => Ok(Self::Performance),
            "dependencies" => Ok(Self::Dependencies),
            "tooling" => Ok(Self::Tooling),
            _ => Err(ParseEnumError {
                expected: "category",
                got: s.to_string(),
            }),
        }
    }
}

impl FromStr for Impact {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = normalize(s);
        match normalized.as_str() {
            "minimal" => Ok(Self::Minimal),
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "critical" => Ok(Self::Critical),
            _ => Err(ParseEnumError {
                expected: "impact",
                got: s.to_string(),
            }),
        }
    }
}

impl FromStr for Effort {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = normalize(s);
        match normalized.as_str() {
            "weeks" => Ok(Self::Weeks),
            "months" => Ok(Self::Months),
            "quarters" => Ok(Self::Quarters),
            "years" => Ok(Self::Years),
            _ => Err(ParseEnumError {
                expected: "effort",
                got: s.to_string(),
            }),
        }
    }
}

impl FromStr for BusinessRisk {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = normalize(s);
        match normalized.as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(ParseEnumError {
                expected: "business risk",
                got: s.to_string(),
            }),
        }
    }
}

impl FromStr for DraftField {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = normalize(s);
        match normalized.as_str() {
            "category" => Ok(Self::Category),
            "description" | "desc" => Ok(Self::Description),
            "impact" => Ok(Self::Impact),
            "effort" => Ok(Self::Effort),
            "risk" | "business_risk" => Ok(Self::BusinessRisk),
            _ => Err(ParseEnumError {
                expected: "field",
                got: s.to_string(),
            }),
        }
    }
}
