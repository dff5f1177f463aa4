//! Attribute filtering.
//!
//! [`matches`] is the single inclusion predicate used by the candidate
//! selector. It is pure and independent of dimension order.

use super::{Dimension, RuleSet};
use crate::model::{Campaign, RefId, Restaurant};
use std::collections::BTreeSet;

/// Status code of a campaign that is running.
pub const STATUS_ACTIVE: RefId = 1;
/// Status code of a campaign that has been blocked.
pub const STATUS_BLOCKED: RefId = 2;

/// An entity whose attributes can be checked against a [`RuleSet`].
///
/// A dimension the entity does not carry returns an empty set: an `allowed`
/// rule on it then excludes the entity, a `denied` rule admits it.
pub trait Classified {
    fn attribute(&self, dimension: Dimension) -> BTreeSet<RefId>;
}

impl Classified for Restaurant {
    fn attribute(&self, dimension: Dimension) -> BTreeSet<RefId> {
        match dimension {
            Dimension::Location => BTreeSet::from([self.district_id]),
            Dimension::RestaurantType => self.restaurant_type_ids.clone(),
            Dimension::MenuType => self.menu_type_ids.clone(),
            Dimension::PriceSegment => BTreeSet::from([self.price_segment_id]),
            Dimension::Advertiser | Dimension::Status => BTreeSet::new(),
        }
    }
}

impl Classified for Campaign {
    fn attribute(&self, dimension: Dimension) -> BTreeSet<RefId> {
        match dimension {
            Dimension::Advertiser => BTreeSet::from([self.advertiser_id]),
            Dimension::Status => {
                let status = if self.blocked {
                    STATUS_BLOCKED
                } else {
                    STATUS_ACTIVE
                };
                BTreeSet::from([status])
            }
            _ => BTreeSet::new(),
        }
    }
}

/// Check an entity against every restricted dimension of `rules`.
pub fn matches<E: Classified + ?Sized>(entity: &E, rules: &RuleSet) -> bool {
    rules
        .restrictive()
        .all(|(dimension, rule)| rule.admits(&entity.attribute(dimension)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::Rule;

    fn restaurant(district: RefId, types: &[RefId], menus: &[RefId], price: RefId) -> Restaurant {
        Restaurant {
            id: 1,
            name: "Test".into(),
            district_id: district,
            restaurant_type_ids: types.iter().copied().collect(),
            menu_type_ids: menus.iter().copied().collect(),
            price_segment_id: price,
        }
    }

    fn campaign(advertiser: RefId, blocked: bool) -> Campaign {
        Campaign {
            id: 1,
            name: "Test".into(),
            advertiser_id: advertiser,
            blocked,
            rules: RuleSet::default(),
        }
    }

    #[test]
    fn unrestricted_rules_match_everything() {
        let rules = RuleSet::default();
        assert!(matches(&restaurant(1, &[], &[], 1), &rules));
        assert!(matches(&campaign(1, true), &rules));
    }

    #[test]
    fn multi_valued_attribute_matches_on_any() {
        let rules = RuleSet::default().with(Dimension::RestaurantType, Rule::allowed([7]));
        assert!(matches(&restaurant(1, &[3, 7], &[], 1), &rules));
        assert!(!matches(&restaurant(1, &[3, 4], &[], 1), &rules));

        let rules = RuleSet::default().with(Dimension::RestaurantType, Rule::denied([7]));
        assert!(!matches(&restaurant(1, &[3, 7], &[], 1), &rules));
    }

    #[test]
    fn dimensions_combine_with_and() {
        let rules = RuleSet::default()
            .with(Dimension::Location, Rule::allowed([10]))
            .with(Dimension::PriceSegment, Rule::denied([3]));

        assert!(matches(&restaurant(10, &[], &[], 1), &rules));
        assert!(!matches(&restaurant(10, &[], &[], 3), &rules));
        assert!(!matches(&restaurant(20, &[], &[], 1), &rules));
    }

    #[test]
    fn campaign_status_dimension() {
        let active_only = RuleSet::default().with(Dimension::Status, Rule::allowed([STATUS_ACTIVE]));
        assert!(matches(&campaign(1, false), &active_only));
        assert!(!matches(&campaign(1, true), &active_only));
    }

    #[test]
    fn carried_dimension_missing_on_entity() {
        let rules = RuleSet::default().with(Dimension::Advertiser, Rule::allowed([5]));
        assert!(!matches(&restaurant(1, &[], &[], 1), &rules));

        let rules = RuleSet::default().with(Dimension::Advertiser, Rule::denied([5]));
        assert!(matches(&restaurant(1, &[], &[], 1), &rules));
    }

    #[test]
    fn unknown_identifiers_do_not_match() {
        let rules = RuleSet::default().with(Dimension::MenuType, Rule::allowed([999]));
        assert!(!matches(&restaurant(1, &[], &[1, 2], 1), &rules));
    }
}
