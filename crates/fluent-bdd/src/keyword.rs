//! Step keyword type and parsing.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Keyword categorising a declared step.
///
/// The planner and executor never branch on the keyword; it is carried only
/// for display and reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepKeyword {
    /// Arrange the preconditions of a scenario.
    Given,
    /// Perform the action under test.
    When,
    /// Assert an expected outcome.
    Then,
    /// Continue the previous step's category.
    And,
    /// Continue the previous step's category with a contrasting condition.
    But,
}

impl StepKeyword {
    /// Every keyword in declaration-grammar order.
    pub const ALL: [Self; 5] = [Self::Given, Self::When, Self::Then, Self::And, Self::But];

    /// Return the keyword as a string slice.
    ///
    /// # Examples
    ///
    /// ```
    /// use fluent_bdd::StepKeyword;
    ///
    /// assert_eq!(StepKeyword::Given.as_str(), "Given");
    /// assert_eq!(StepKeyword::But.as_str(), "But");
    /// ```
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Given => "Given",
            Self::When => "When",
            Self::Then => "Then",
            Self::And => "And",
            Self::But => "But",
        }
    }
}

impl fmt::Display for StepKeyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing a [`StepKeyword`] from a string fails.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid step keyword: {0}")]
pub struct StepKeywordParseError(pub String);

impl FromStr for StepKeyword {
    type Err = StepKeywordParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        Self::ALL
            .into_iter()
            .find(|keyword| keyword.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| StepKeywordParseError(trimmed.to_string()))
    }
}

impl TryFrom<&str> for StepKeyword {
    type Error = StepKeywordParseError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Given", StepKeyword::Given)]
    #[case("given", StepKeyword::Given)]
    #[case(" WhEn ", StepKeyword::When)]
    #[case("THEN", StepKeyword::Then)]
    #[case("AND", StepKeyword::And)]
    #[case(" but ", StepKeyword::But)]
    fn parses_case_insensitively(#[case] input: &str, #[case] expected: StepKeyword) {
        assert_eq!(input.parse::<StepKeyword>(), Ok(expected));
    }

    #[test]
    fn rejects_unknown_keyword() {
        let Err(err) = StepKeyword::try_from(" Whenever ") else {
            panic!("unknown keyword should not parse");
        };
        assert_eq!(err.0, "Whenever");
        assert_eq!(err.to_string(), "invalid step keyword: Whenever");
    }

    #[test]
    fn display_matches_as_str() {
        for keyword in StepKeyword::ALL {
            assert_eq!(keyword.to_string(), keyword.as_str());
        }
    }
}
