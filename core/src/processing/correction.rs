use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Sign correction applied to a capture before it is reduced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorrectionRule {
    #[default]
    None,
    /// Negative samples are negated, leaving every sample non-negative.
    NegateNegatives,
    /// Positive samples are negated, leaving every sample non-positive.
    NegatePositives,
}

impl CorrectionRule {
    pub fn apply(self, samples: &mut [f64]) {
        match self {
            CorrectionRule::None => {}
            CorrectionRule::NegateNegatives => {
                for value in samples.iter_mut().filter(|v| **v < 0.0) {
                    *value = -*value;
                }
            }
            CorrectionRule::NegatePositives => {
                for value in samples.iter_mut().filter(|v| **v > 0.0) {
                    *value = -*value;
                }
            }
        }
    }
}

/// Calibration table mapping a rotation index to its correction rule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CorrectionTable {
    rules: BTreeMap<u32, CorrectionRule>,
}

impl CorrectionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rule(mut self, index: u32, rule: CorrectionRule) -> Self {
        self.rules.insert(index, rule);
        self
    }

    pub fn insert(&mut self, index: u32, rule: CorrectionRule) -> Option<CorrectionRule> {
        self.rules.insert(index, rule)
    }

    pub fn rule_for(&self, index: u32) -> CorrectionRule {
        self.rules.get(&index).copied().unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Calibration used for the mean/error-bar sweep of the rotating receiver.
    pub fn error_bar_profile() -> Self {
        Self::new()
            .with_rule(3, CorrectionRule::NegateNegatives)
            .with_rule(6, CorrectionRule::NegateNegatives)
            .with_rule(11, CorrectionRule::NegateNegatives)
            .with_rule(12, CorrectionRule::NegatePositives)
    }

    /// Calibration used for the radiation-pattern sweep of the rotating transmitter.
    pub fn radiation_profile() -> Self {
        Self::new()
            .with_rule(6, CorrectionRule::NegatePositives)
            .with_rule(13, CorrectionRule::NegateNegatives)
            .with_rule(14, CorrectionRule::NegateNegatives)
    }
}

impl FromIterator<(u32, CorrectionRule)> for CorrectionTable {
    fn from_iter<T: IntoIterator<Item = (u32, CorrectionRule)>>(iter: T) -> Self {
        Self {
            rules: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::StatsHelper;

    #[test]
    fn negate_negatives_rectifies_sequence() {
        let mut samples = vec![-2.0, 3.0, -1.0];
        CorrectionRule::NegateNegatives.apply(&mut samples);
        assert_eq!(samples, vec![2.0, 3.0, 1.0]);
        assert_eq!(StatsHelper::mean(&samples), 2.0);
    }

    #[test]
    fn negate_positives_flips_sequence_below_zero() {
        let mut samples = vec![2.0, -3.0, 1.0];
        CorrectionRule::NegatePositives.apply(&mut samples);
        assert_eq!(samples, vec![-2.0, -3.0, -1.0]);
        assert_eq!(StatsHelper::mean(&samples), -2.0);
    }

    #[test]
    fn none_is_identity() {
        let mut samples = vec![-2.0, 0.0, 5.5];
        CorrectionRule::None.apply(&mut samples);
        assert_eq!(samples, vec![-2.0, 0.0, 5.5]);
    }

    #[test]
    fn unknown_index_falls_back_to_none() {
        let table = CorrectionTable::error_bar_profile();
        assert_eq!(table.rule_for(12), CorrectionRule::NegatePositives);
        assert_eq!(table.rule_for(3), CorrectionRule::NegateNegatives);
        assert_eq!(table.rule_for(4), CorrectionRule::None);
    }

    #[test]
    fn later_rule_replaces_earlier_one() {
        let mut table = CorrectionTable::radiation_profile();
        let previous = table.insert(6, CorrectionRule::None);
        assert_eq!(previous, Some(CorrectionRule::NegatePositives));
        assert_eq!(table.rule_for(6), CorrectionRule::None);
    }

    #[test]
    fn table_reads_from_yaml_mapping() {
        let table: CorrectionTable =
            serde_yaml::from_str("6: negate_positives\n13: negate_negatives\n14: negate_negatives\n")
                .unwrap();
        assert_eq!(table, CorrectionTable::radiation_profile());
    }
}
