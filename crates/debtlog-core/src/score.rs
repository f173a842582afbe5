//! Priority scoring for debt entries.
//!
//! `priority = round(impact / effort * risk_multiplier * 10) / 10`
//!
//! Effort is a required [`Effort`] value whose score is never zero, so the
//! ratio is always defined. Unset impact scores `0` and unset risk uses the
//! neutral multiplier.

use serde::{Serialize, Serializer};
use std::fmt;

use crate::model::{BusinessRisk, Effort, Impact};

pub const HIGH_RISK_MULTIPLIER: f64 = 1.5;
pub const MEDIUM_RISK_MULTIPLIER: f64 = 1.2;
pub const NEUTRAL_RISK_MULTIPLIER: f64 = 1.0;

/// A priority score rounded to one decimal place.
///
/// Stored as an integer count of tenths so ordering and equality are exact.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Priority {
    tenths: u32,
}

impl Priority {
    pub const ZERO: Self = Self { tenths: 0 };

    #[must_use]
    pub const fn from_tenths(tenths: u32) -> Self {
        Self { tenths }
    }

    /// Round a decimal score to the nearest tenth.
    ///
    /// Returns `None` for negative, non-finite, or out-of-range input.
    #[must_use]
    pub fn from_decimal(value: f64) -> Option<Self> {
        let scaled = (value * 10.0).round();
        if !scaled.is_finite() || scaled < 0.0 || scaled > f64::from(u32::MAX) {
            return None;
        }
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let tenths = scaled as u32;
        Some(Self { tenths })
    }

    #[must_use]
    pub const fn tenths(self) -> u32 {
        self.tenths
    }

    #[must_use]
    pub fn as_f64(self) -> f64 {
        f64::from(self.tenths) / 10.0
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_f64())
    }
}

impl Serialize for Priority {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_f64())
    }
}

/// Multiplier applied for a business risk level. Unset risk is neutral.
#[must_use]
pub const fn risk_multiplier(risk: Option<BusinessRisk>) -> f64 {
    match risk {
        Some(BusinessRisk::High) => HIGH_RISK_MULTIPLIER,
        Some(BusinessRisk::Medium) => MEDIUM_RISK_MULTIPLIER,
        Some(BusinessRisk::Low) | None => NEUTRAL_RISK_MULTIPLIER,
    }
}

/// Compute the priority of an entry from its scoring inputs.
#[must_use]
pub fn compute_priority(
    impact: Option<Impact>,
    effort: Effort,
    business_risk: Option<BusinessRisk>,
) -> Priority {
    let impact_score = f64::from(impact.map_or(0, Impact::score));
    let effort_score = f64::from(effort.score());
    let raw = (impact_score / effort_score) * risk_multiplier(business_risk) * 10.0;

    // Bounded by 5 / 1 * 1.5 * 10 = 75.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let tenths = raw.round() as u32;
    Priority::from_tenths(tenths)
}
