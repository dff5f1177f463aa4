//! # Attribute Rules
//!
//! Restaurants and campaigns carry a fixed set of classifiable attributes
//! (district, restaurant types, menu types, price segment, advertiser, status).
//! A [`RuleSet`] restricts each of those dimensions with an allow or deny list,
//! and [`matches`] evaluates an entity against it.
//!
//! ## Semantics
//!
//! | Rule values | Mode      | Entity passes when                          |
//! |-------------|-----------|---------------------------------------------|
//! | empty       | any       | always (dimension is unrestricted)          |
//! | non-empty   | `allowed` | any attribute value is in the list          |
//! | non-empty   | `denied`  | no attribute value is in the list           |
//!
//! Restricted dimensions are combined with AND. Every attribute is modelled as
//! a set, so single-valued attributes are simply singleton sets.
//!
//! ## Usage
//!
//! ```
//! use adtarget::attributes::{matches, Dimension, Rule, RuleSet};
//! use adtarget::model::Restaurant;
//! use std::collections::BTreeSet;
//!
//! let rules = RuleSet::default().with(Dimension::Location, Rule::allowed([10]));
//! let restaurant = Restaurant {
//!     id: 1,
//!     name: "A".into(),
//!     district_id: 10,
//!     restaurant_type_ids: BTreeSet::new(),
//!     menu_type_ids: BTreeSet::new(),
//!     price_segment_id: 1,
//! };
//! assert!(matches(&restaurant, &rules));
//! ```

mod filter;
mod rules;

pub use filter::{matches, Classified, STATUS_ACTIVE, STATUS_BLOCKED};
pub use rules::{Dimension, Rule, RuleMode, RuleSet};
