//! User-selected projection parameters

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ClimateLensError;

/// Severity path chosen with the scenario toggle
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Scenario {
    #[default]
    Low,
    High,
}

impl Scenario {
    #[must_use]
    pub fn is_high(self) -> bool {
        matches!(self, Scenario::High)
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Scenario::Low => "low",
            Scenario::High => "high",
        }
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scenario {
    type Err = ClimateLensError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Scenario::Low),
            "high" => Ok(Scenario::High),
            other => Err(ClimateLensError::validation(format!(
                "Unknown scenario '{other}'. Must be one of: low, high"
            ))),
        }
    }
}

/// Target year picked in the year selector.
///
/// Only [`TargetYear::FAR_FUTURE`] is treated as far future; every other year
/// projects as near term.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct TargetYear(pub u16);

impl TargetYear {
    pub const NEAR_TERM: TargetYear = TargetYear(2050);
    pub const FAR_FUTURE: TargetYear = TargetYear(2100);

    /// Years offered by the year selector
    pub const SELECTABLE: [TargetYear; 2] = [Self::NEAR_TERM, Self::FAR_FUTURE];

    #[must_use]
    pub fn is_far_future(self) -> bool {
        self == Self::FAR_FUTURE
    }

    #[must_use]
    pub fn value(self) -> u16 {
        self.0
    }
}

impl Default for TargetYear {
    fn default() -> Self {
        Self::NEAR_TERM
    }
}

impl fmt::Display for TargetYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u16> for TargetYear {
    fn from(year: u16) -> Self {
        TargetYear(year)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scenario_parsing() {
        assert_eq!("low".parse::<Scenario>().unwrap(), Scenario::Low);
        assert_eq!(" HIGH ".parse::<Scenario>().unwrap(), Scenario::High);
        assert!("medium".parse::<Scenario>().is_err());
    }

    #[test]
    fn test_scenario_serde() {
        assert_eq!(serde_json::to_string(&Scenario::High).unwrap(), "\"high\"");
        let parsed: Scenario = serde_json::from_str("\"low\"").unwrap();
        assert_eq!(parsed, Scenario::Low);
    }

    #[test]
    fn test_only_marker_year_is_far_future() {
        assert!(TargetYear::FAR_FUTURE.is_far_future());
        assert!(!TargetYear::NEAR_TERM.is_far_future());
        assert!(!TargetYear(2099).is_far_future());
        assert!(!TargetYear(2150).is_far_future());
    }

    #[test]
    fn test_target_year_serde_is_plain_number() {
        assert_eq!(serde_json::to_string(&TargetYear(2100)).unwrap(), "2100");
        let parsed: TargetYear = serde_json::from_str("2050").unwrap();
        assert_eq!(parsed, TargetYear::NEAR_TERM);
    }
}
