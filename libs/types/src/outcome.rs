//! The two complementary outcome tokens of a binary-option market.

use crate::errors::ExchangeError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome token side of a market. A matched YES/NO pair carries the full
/// face value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Yes,
    No,
}

impl Outcome {
    /// The complementary outcome.
    pub fn complement(self) -> Self {
        match self {
            Outcome::Yes => Outcome::No,
            Outcome::No => Outcome::Yes,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Outcome::Yes => "yes",
            Outcome::No => "no",
        }
    }

    /// Parse the wire representation; anything other than `yes | no` is
    /// invalid input.
    pub fn parse(s: &str) -> Result<Self, ExchangeError> {
        match s {
            "yes" => Ok(Outcome::Yes),
            "no" => Ok(Outcome::No),
            other => Err(ExchangeError::InvalidInput(format!(
                "unknown outcome: {}",
                other
            ))),
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_complement_is_involutive() {
        assert_eq!(Outcome::Yes.complement(), Outcome::No);
        assert_eq!(Outcome::No.complement(), Outcome::Yes);
        assert_eq!(Outcome::Yes.complement().complement(), Outcome::Yes);
    }

    #[test]
    fn test_parse_strict() {
        assert_eq!(Outcome::parse("yes").unwrap(), Outcome::Yes);
        assert_eq!(Outcome::parse("no").unwrap(), Outcome::No);
        assert!(Outcome::parse("YES").is_err());
        assert!(Outcome::parse("maybe").is_err());
    }

    #[test]
    fn test_serde_lowercase() {
        assert_eq!(serde_json::to_string(&Outcome::Yes).unwrap(), "\"yes\"");
        let back: Outcome = serde_json::from_str("\"no\"").unwrap();
        assert_eq!(back, Outcome::No);
    }
}
