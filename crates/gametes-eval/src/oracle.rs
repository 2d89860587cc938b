//! Ground truth for GAMETES datasets and the shared recovery rule.
//!
//! Single-locus models (`m1`, `m2`) embed one predictive attribute named
//! `M0P0`. The two-locus models (`m1m2Additive`, `m1m2Heterogeneous`) embed
//! the pair `M0P0` / `M1P0`, and recovery requires both to be the two top
//! ranked features in either order.
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{EvalError, Result};

/// Name of the first simulated predictive attribute.
pub const PRIMARY_LOCUS: &str = "M0P0";
/// Name of the second predictive attribute in two-locus models.
pub const SECONDARY_LOCUS: &str = "M1P0";

const SINGLE_LOCUS: [&str; 1] = [PRIMARY_LOCUS];
const TWO_LOCUS: [&str; 2] = [PRIMARY_LOCUS, SECONDARY_LOCUS];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DatasetType {
    #[serde(rename = "m1")]
    M1,
    #[serde(rename = "m2")]
    M2,
    #[serde(rename = "m1m2Additive")]
    M1M2Additive,
    #[serde(rename = "m1m2Heterogeneous")]
    M1M2Heterogeneous,
}

impl DatasetType {
    pub const ALL: [DatasetType; 4] = [
        DatasetType::M1,
        DatasetType::M2,
        DatasetType::M1M2Additive,
        DatasetType::M1M2Heterogeneous,
    ];

    /// Literal tag used in directory names.
    pub fn tag(&self) -> &'static str {
        match self {
            DatasetType::M1 => "m1",
            DatasetType::M2 => "m2",
            DatasetType::M1M2Additive => "m1m2Additive",
            DatasetType::M1M2Heterogeneous => "m1m2Heterogeneous",
        }
    }

    /// Feature names carrying the simulated signal.
    pub fn ground_truth(&self) -> &'static [&'static str] {
        match self {
            DatasetType::M1 | DatasetType::M2 => &SINGLE_LOCUS,
            DatasetType::M1M2Additive | DatasetType::M1M2Heterogeneous => &TWO_LOCUS,
        }
    }

    pub fn is_two_locus(&self) -> bool {
        self.ground_truth().len() == 2
    }
}

impl fmt::Display for DatasetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for DatasetType {
    type Err = EvalError;

    fn from_str(s: &str) -> Result<Self> {
        DatasetType::ALL
            .iter()
            .copied()
            .find(|t| t.tag().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| EvalError::UnknownDatasetType(s.to_string()))
    }
}

/// Decide whether the best-first feature names `top` recover the ground truth.
///
/// Only the first `ground_truth().len()` entries are inspected. For the
/// two-locus types the order of the pair does not matter.
pub fn recovered<S: AsRef<str>>(top: &[S], dataset_type: DatasetType) -> Result<bool> {
    let truth = dataset_type.ground_truth();
    if top.len() < truth.len() {
        return Err(EvalError::InsufficientFeatures {
            required: truth.len(),
            available: top.len(),
        });
    }

    let head = &top[..truth.len()];
    Ok(truth
        .iter()
        .all(|name| head.iter().any(|candidate| candidate.as_ref() == *name)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_locus_requires_m0p0_first() {
        assert!(recovered(&["M0P0", "N1"], DatasetType::M1).unwrap());
        assert!(!recovered(&["N1", "M0P0"], DatasetType::M2).unwrap());
        assert!(!recovered(&["M1P0"], DatasetType::M1).unwrap());
    }

    #[test]
    fn two_locus_accepts_either_order() {
        assert!(recovered(&["M0P0", "M1P0", "N3"], DatasetType::M1M2Additive).unwrap());
        assert!(recovered(&["M1P0", "M0P0"], DatasetType::M1M2Heterogeneous).unwrap());
        assert!(!recovered(&["M0P0", "N0", "M1P0"], DatasetType::M1M2Additive).unwrap());
        assert!(!recovered(&["M0P0", "M0P0"], DatasetType::M1M2Additive).unwrap());
    }

    #[test]
    fn too_few_names_is_an_error() {
        let err = recovered(&["M0P0"], DatasetType::M1M2Additive).unwrap_err();
        assert!(matches!(
            err,
            EvalError::InsufficientFeatures {
                required: 2,
                available: 1
            }
        ));
    }

    #[test]
    fn parses_literal_tags() {
        assert_eq!("m1m2Additive".parse::<DatasetType>().unwrap(), DatasetType::M1M2Additive);
        assert_eq!("M2".parse::<DatasetType>().unwrap(), DatasetType::M2);
        assert!("m3".parse::<DatasetType>().is_err());
        let json = serde_json::to_string(&DatasetType::M1M2Heterogeneous).unwrap();
        assert_eq!(json, "\"m1m2Heterogeneous\"");
    }
}
