use std::fmt;

use crate::id::ParseIdError;
use crate::model::ParseEnumError;

/// Machine-readable error codes for scripted callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ConfigParseError,
    InvalidConfigValue,
    MissingCategory,
    MissingDescription,
    MissingEffort,
    InvalidEnumValue,
    InvalidEntryId,
    UnknownCommand,
    InternalUnexpected,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::ConfigParseError => "E1001",
            Self::InvalidConfigValue => "E1002",
            Self::MissingCategory => "E2001",
            Self::MissingDescription => "E2002",
            Self::MissingEffort => "E2003",
            Self::InvalidEnumValue => "E2004",
            Self::InvalidEntryId => "E2005",
            Self::UnknownCommand => "E3001",
            Self::InternalUnexpected => "E9001",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::ConfigParseError => "Config file parse error",
            Self::InvalidConfigValue => "Invalid config value",
            Self::MissingCategory => "Category is required",
            Self::MissingDescription => "Description is required",
            Self::MissingEffort => "Effort is required to compute priority",
            Self::InvalidEnumValue => "Invalid category/impact/effort/risk value",
            Self::InvalidEntryId => "Invalid entry ID",
            Self::UnknownCommand => "Unknown session command",
            Self::InternalUnexpected => "Internal unexpected error",
        }
    }

    /// Optional remediation hint for the user.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::ConfigParseError => Some("Fix syntax in .debtlog/config.toml and retry."),
            Self::InvalidConfigValue => {
                Some("report.high_priority_threshold must be a non-negative number.")
            }
            Self::MissingCategory => Some("Set a category, e.g. `set category testing`."),
            Self::MissingDescription => Some("Describe the debt, e.g. `set description \"...\"`."),
            Self::MissingEffort => Some("Set an effort: weeks, months, quarters, or years."),
            Self::InvalidEnumValue => Some("Run `dl guide` to list the accepted values."),
            Self::InvalidEntryId => Some("Use the numeric ID shown by `list`."),
            Self::UnknownCommand => Some("Type `help` to list session commands."),
            Self::InternalUnexpected => Some("Retry once. If persistent, report a bug with logs."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Reason an entry was not accepted into the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AddError {
    #[error("entry rejected: category is empty")]
    MissingCategory,
    #[error("entry rejected: description is empty")]
    MissingDescription,
    /// Without an effort the impact/effort ratio is undefined.
    #[error("entry rejected: effort is not set")]
    MissingEffort,
}

impl AddError {
    #[must_use]
    pub const fn code(self) -> ErrorCode {
        match self {
            Self::MissingCategory => ErrorCode::MissingCategory,
            Self::MissingDescription => ErrorCode::MissingDescription,
            Self::MissingEffort => ErrorCode::MissingEffort,
        }
    }
}

/// Top-level error for library operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DebtlogError {
    #[error(transparent)]
    Add(#[from] AddError),
    #[error(transparent)]
    InvalidValue(#[from] ParseEnumError),
    #[error(transparent)]
    InvalidId(#[from] ParseIdError),
}

impl DebtlogError {
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::Add(err) => err.code(),
            Self::InvalidValue(_) => ErrorCode::InvalidEnumValue,
            Self::InvalidId(_) => ErrorCode::InvalidEntryId,
        }
    }

    /// Remediation text, falling back to the code's summary.
    #[must_use]
    pub fn suggestion(&self) -> String {
        let code = self.error_code();
        code.hint().unwrap_or_else(|| code.message()).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::{AddError, DebtlogError, ErrorCode};
    use crate::model::ParseEnumError;
    use std::collections::HashSet;

    const ALL: [ErrorCode; 9] = [
        ErrorCode::ConfigParseError,
        ErrorCode::InvalidConfigValue,
        ErrorCode::MissingCategory,
        ErrorCode::MissingDescription,
        ErrorCode::MissingEffort,
        ErrorCode::InvalidEnumValue,
        ErrorCode::InvalidEntryId,
        ErrorCode::UnknownCommand,
        ErrorCode::InternalUnexpected,
    ];

    #[test]
    fn all_codes_are_unique() {
        let mut seen = HashSet::new();
        for code in ALL {
            assert!(seen.insert(code.code()), "duplicate code {}", code.code());
        }
    }

    #[test]
    fn code_format_is_machine_friendly() {
        for code in ALL {
            let code = code.code();
            assert_eq!(code.len(), 5);
            assert!(code.starts_with('E'));
            assert!(code.chars().skip(1).all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn add_errors_map_to_codes_and_hints() {
        let err = DebtlogError::from(AddError::MissingEffort);
        assert_eq!(err.error_code(), ErrorCode::MissingEffort);
        assert!(err.suggestion().contains("weeks"));
        assert_eq!(err.to_string(), "entry rejected: effort is not set");
    }

    #[test]
    fn parse_errors_are_wrapped_transparently() {
        let err = DebtlogError::from(ParseEnumError {
            expected: "impact",
            got: "severe".to_string(),
        });
        assert_eq!(err.error_code().code(), "E2004");
        assert_eq!(err.to_string(), "invalid impact: 'severe'");
    }
}
