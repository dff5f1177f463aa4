//! Rule definitions.
//!
//! The wire shape mirrors what the host sends when it seeds a picker:
//! `{"locations": {"mode": "allowed", "values": [10]}}`. Missing dimensions
//! default to an unrestricted rule.

use crate::model::RefId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleMode {
    #[default]
    Allowed,
    Denied,
}

/// Allow or deny list for one attribute dimension.
///
/// An empty `values` set imposes no restriction, whatever the mode.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rule {
    #[serde(default)]
    pub mode: RuleMode,
    #[serde(default)]
    pub values: BTreeSet<RefId>,
}

impl Rule {
    pub fn new(mode: RuleMode, values: impl IntoIterator<Item = RefId>) -> Self {
        Self {
            mode,
            values: values.into_iter().collect(),
        }
    }

    pub fn allowed(values: impl IntoIterator<Item = RefId>) -> Self {
        Self::new(RuleMode::Allowed, values)
    }

    pub fn denied(values: impl IntoIterator<Item = RefId>) -> Self {
        Self::new(RuleMode::Denied, values)
    }

    /// True when the rule actually constrains anything.
    pub fn is_restrictive(&self) -> bool {
        !self.values.is_empty()
    }

    /// Check whether an attribute value set passes this rule.
    pub fn admits(&self, attribute: &BTreeSet<RefId>) -> bool {
        if !self.is_restrictive() {
            return true;
        }
        let intersects = attribute.iter().any(|v| self.values.contains(v));
        match self.mode {
            RuleMode::Allowed => intersects,
            RuleMode::Denied => !intersects,
        }
    }
}

/// A classifiable attribute dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Dimension {
    Location,
    RestaurantType,
    MenuType,
    PriceSegment,
    Advertiser,
    Status,
}

impl Dimension {
    pub const ALL: [Dimension; 6] = [
        Dimension::Location,
        Dimension::RestaurantType,
        Dimension::MenuType,
        Dimension::PriceSegment,
        Dimension::Advertiser,
        Dimension::Status,
    ];
}

impl std::fmt::Display for Dimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Dimension::Location => "locations",
            Dimension::RestaurantType => "restaurant types",
            Dimension::MenuType => "menu types",
            Dimension::PriceSegment => "price segments",
            Dimension::Advertiser => "advertisers",
            Dimension::Status => "statuses",
        };
        f.write_str(name)
    }
}

/// One rule per dimension.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RuleSet {
    pub locations: Rule,
    pub restaurant_types: Rule,
    pub menu_types: Rule,
    pub price_segments: Rule,
    pub advertisers: Rule,
    pub statuses: Rule,
}

impl RuleSet {
    pub fn rule(&self, dimension: Dimension) -> &Rule {
        match dimension {
            Dimension::Location => &self.locations,
            Dimension::RestaurantType => &self.restaurant_types,
            Dimension::MenuType => &self.menu_types,
            Dimension::PriceSegment => &self.price_segments,
            Dimension::Advertiser => &self.advertisers,
            Dimension::Status => &self.statuses,
        }
    }

    pub fn rule_mut(&mut self, dimension: Dimension) -> &mut Rule {
        match dimension {
            Dimension::Location => &mut self.locations,
            Dimension::RestaurantType => &mut self.restaurant_types,
            Dimension::MenuType => &mut self.menu_types,
            Dimension::PriceSegment => &mut self.price_segments,
            Dimension::Advertiser => &mut self.advertisers,
            Dimension::Status => &mut self.statuses,
        }
    }

    /// Builder-style replacement of one dimension's rule.
    pub fn with(mut self, dimension: Dimension, rule: Rule) -> Self {
        *self.rule_mut(dimension) = rule;
        self
    }

    /// Iterate the dimensions that actually restrict something.
    pub fn restrictive(&self) -> impl Iterator<Item = (Dimension, &Rule)> {
        Dimension::ALL
            .into_iter()
            .map(|d| (d, self.rule(d)))
            .filter(|(_, rule)| rule.is_restrictive())
    }

    pub fn is_unrestricted(&self) -> bool {
        self.restrictive().next().is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_rule_admits_everything() {
        let empty = BTreeSet::new();
        let some = BTreeSet::from([1, 2]);
        for mode in [RuleMode::Allowed, RuleMode::Denied] {
            let rule = Rule::new(mode, []);
            assert!(rule.admits(&empty));
            assert!(rule.admits(&some));
        }
    }

    #[test]
    fn allowed_requires_intersection() {
        let rule = Rule::allowed([3, 4]);
        assert!(rule.admits(&BTreeSet::from([1, 4])));
        assert!(!rule.admits(&BTreeSet::from([1, 2])));
        assert!(!rule.admits(&BTreeSet::new()));
    }

    #[test]
    fn denied_rejects_intersection() {
        let rule = Rule::denied([3, 4]);
        assert!(!rule.admits(&BTreeSet::from([1, 4])));
        assert!(rule.admits(&BTreeSet::from([1, 2])));
        assert!(rule.admits(&BTreeSet::new()));
    }

    #[test]
    fn parses_partial_wire_shape() {
        let rules: RuleSet =
            serde_json::from_str(r#"{"locations":{"mode":"allowed","values":[10]}}"#).unwrap();
        assert_eq!(rules.locations, Rule::allowed([10]));
        assert_eq!(rules.menu_types, Rule::default());

        let rules: RuleSet =
            serde_json::from_str(r#"{"menuTypes":{"mode":"denied","values":[1,2]}}"#).unwrap();
        assert_eq!(rules.menu_types, Rule::denied([1, 2]));
    }

    #[test]
    fn restrictive_skips_empty_dimensions() {
        let rules = RuleSet::default()
            .with(Dimension::MenuType, Rule::denied([1]))
            .with(Dimension::Advertiser, Rule::denied([]));
        let dims: Vec<_> = rules.restrictive().map(|(d, _)| d).collect();
        assert_eq!(dims, vec![Dimension::MenuType]);
        assert!(!rules.is_unrestricted());
        assert!(RuleSet::default().is_unrestricted());
    }
}
