//! Sequence features required for paratope clustering.
//!
//! Paratope prediction needs the full variable domain, so every framework and
//! CDR region must be available as an amino-acid sequence column. The
//! terminal framework region is exported under two spellings depending on
//! the upstream aligner.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Canonical antibody / TCR region names.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Feature {
    #[serde(rename = "FR1")]
    Fr1,
    #[serde(rename = "CDR1")]
    Cdr1,
    #[serde(rename = "FR2")]
    Fr2,
    #[serde(rename = "CDR2")]
    Cdr2,
    #[serde(rename = "FR3")]
    Fr3,
    #[serde(rename = "CDR3")]
    Cdr3,
    #[serde(rename = "FR4")]
    Fr4,
    #[serde(rename = "FR4InFrame")]
    Fr4InFrame,
}

impl Feature {
    /// Domain tag value under [`crate::column::names::DOMAIN_FEATURE`].
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fr1 => "FR1",
            Self::Cdr1 => "CDR1",
            Self::Fr2 => "FR2",
            Self::Cdr2 => "CDR2",
            Self::Fr3 => "FR3",
            Self::Cdr3 => "CDR3",
            Self::Fr4 => "FR4",
            Self::Fr4InFrame => "FR4InFrame",
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Feature {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "FR1" => Ok(Self::Fr1),
            "CDR1" => Ok(Self::Cdr1),
            "FR2" => Ok(Self::Fr2),
            "CDR2" => Ok(Self::Cdr2),
            "FR3" => Ok(Self::Fr3),
            "CDR3" => Ok(Self::Cdr3),
            "FR4" => Ok(Self::Fr4),
            "FR4InFrame" => Ok(Self::Fr4InFrame),
            other => Err(format!("unknown feature '{other}'")),
        }
    }
}

/// One entry of the requirement table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequirementSlot {
    /// This exact feature must be present.
    Exactly(Feature),
    /// Any one of these spellings satisfies the slot; tried in order.
    AnyOf(&'static [Feature]),
}

impl RequirementSlot {
    /// Features probed for this slot, in probe order.
    #[must_use]
    pub fn candidates(&self) -> &[Feature] {
        match self {
            Self::Exactly(feature) => std::slice::from_ref(feature),
            Self::AnyOf(features) => features,
        }
    }
}

impl fmt::Display for RequirementSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exactly(feature) => write!(f, "{feature}"),
            Self::AnyOf(features) => {
                let names: Vec<&str> = features.iter().map(|x| x.as_str()).collect();
                write!(f, "{}", names.join("|"))
            }
        }
    }
}

/// Accepted spellings of the terminal framework region.
pub const TERMINAL_FRAMEWORK_VARIANTS: &[Feature] = &[Feature::Fr4, Feature::Fr4InFrame];

/// Required features in check order. Core regions first, terminal slot last.
pub const REQUIRED_FEATURES: &[RequirementSlot] = &[
    RequirementSlot::Exactly(Feature::Cdr1),
    RequirementSlot::Exactly(Feature::Cdr2),
    RequirementSlot::Exactly(Feature::Cdr3),
    RequirementSlot::Exactly(Feature::Fr1),
    RequirementSlot::Exactly(Feature::Fr2),
    RequirementSlot::Exactly(Feature::Fr3),
    RequirementSlot::AnyOf(TERMINAL_FRAMEWORK_VARIANTS),
];
