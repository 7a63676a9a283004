//! Three-valued verdicts.
//!
//! Block outputs distinguish "not yet applicable" from "checked and negative":
//! the UI hides an affordance on [`Tristate::Unknown`] and shows a failure on
//! [`Tristate::No`]. On the wire this is `null | false | true`.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Unknown / No / Yes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "Option<bool>", into = "Option<bool>")]
pub enum Tristate {
    /// Cannot be determined yet.
    #[default]
    Unknown,
    /// Determined and negative.
    No,
    /// Determined and positive.
    Yes,
}

impl Tristate {
    /// Lifts a definite boolean.
    #[must_use]
    pub const fn from_bool(value: bool) -> Self {
        if value {
            Self::Yes
        } else {
            Self::No
        }
    }

    /// Returns the definite value, if any.
    #[must_use]
    pub const fn as_option(self) -> Option<bool> {
        match self {
            Self::Unknown => None,
            Self::No => Some(false),
            Self::Yes => Some(true),
        }
    }

    /// Returns true for [`Tristate::Yes`].
    #[must_use]
    pub const fn is_yes(self) -> bool {
        matches!(self, Self::Yes)
    }

    /// Returns true for [`Tristate::No`].
    #[must_use]
    pub const fn is_no(self) -> bool {
        matches!(self, Self::No)
    }

    /// Returns true for [`Tristate::Unknown`].
    #[must_use]
    pub const fn is_unknown(self) -> bool {
        matches!(self, Self::Unknown)
    }

    /// Kleene conjunction: `No` dominates, then `Unknown`.
    #[must_use]
    pub const fn and(self, other: Self) -> Self {
        match (self, other) {
            (Self::No, _) | (_, Self::No) => Self::No,
            (Self::Yes, Self::Yes) => Self::Yes,
            _ => Self::Unknown,
        }
    }

    /// Kleene disjunction: `Yes` dominates, then `Unknown`.
    #[must_use]
    pub const fn or(self, other: Self) -> Self {
        match (self, other) {
            (Self::Yes, _) | (_, Self::Yes) => Self::Yes,
            (Self::No, Self::No) => Self::No,
            _ => Self::Unknown,
        }
    }
}

impl From<bool> for Tristate {
    fn from(value: bool) -> Self {
        Self::from_bool(value)
    }
}

impl From<Option<bool>> for Tristate {
    fn from(value: Option<bool>) -> Self {
        value.map_or(Self::Unknown, Self::from_bool)
    }
}

impl From<Tristate> for Option<bool> {
    fn from(value: Tristate) -> Self {
        value.as_option()
    }
}

impl fmt::Display for Tristate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown => write!(f, "unknown"),
            Self::No => write!(f, "no"),
            Self::Yes => write!(f, "yes"),
        }
    }
}
