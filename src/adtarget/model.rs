//! Reference catalog types.
//!
//! Catalogs are supplied by the host application and are read-only for the
//! targeting core. Identifiers are opaque numbers; nothing here checks that an
//! identifier referenced by one catalog exists in another.

use crate::attributes::RuleSet;
use crate::error::TargetingError;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeSet;
use std::str::FromStr;

/// Identifier of a restaurant or a campaign.
pub type EntityId = u64;
/// Identifier of a placement (display slot).
pub type SlotId = u64;
/// Identifier of a schedule.
pub type ScheduleId = u64;
/// Identifier of any other reference-catalog row (district, type, advertiser, ...).
pub type RefId = u64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Restaurant {
    pub id: EntityId,
    pub name: String,
    pub district_id: RefId,
    /// Accepts a scalar or a list on the wire; always a set in memory.
    #[serde(default, deserialize_with = "one_or_many")]
    pub restaurant_type_ids: BTreeSet<RefId>,
    #[serde(default, deserialize_with = "one_or_many")]
    pub menu_type_ids: BTreeSet<RefId>,
    pub price_segment_id: RefId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Campaign {
    pub id: EntityId,
    pub name: String,
    pub advertiser_id: RefId,
    #[serde(default)]
    pub blocked: bool,
    /// The campaign's own restaurant rules, used to seed bulk-add pickers.
    #[serde(default)]
    pub rules: RuleSet,
}

/// A display slot that can be enabled per targeting edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub id: SlotId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    pub id: ScheduleId,
    pub name: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub blocked: bool,
}

/// Plain `{id, name}` catalog row (districts, restaurant types, menu types, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedRef {
    pub id: RefId,
    pub name: String,
}

/// All reference lists, in catalog order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Catalogs {
    pub restaurants: Vec<Restaurant>,
    pub campaigns: Vec<Campaign>,
    pub placements: Vec<Placement>,
    pub schedules: Vec<Schedule>,
    pub districts: Vec<NamedRef>,
    pub restaurant_types: Vec<NamedRef>,
    pub menu_types: Vec<NamedRef>,
    pub price_segments: Vec<NamedRef>,
    pub advertisers: Vec<NamedRef>,
}

impl Catalogs {
    pub fn restaurant(&self, id: EntityId) -> Option<&Restaurant> {
        self.restaurants.iter().find(|r| r.id == id)
    }

    pub fn campaign(&self, id: EntityId) -> Option<&Campaign> {
        self.campaigns.iter().find(|c| c.id == id)
    }

    pub fn placement(&self, id: SlotId) -> Option<&Placement> {
        self.placements.iter().find(|p| p.id == id)
    }

    pub fn schedule(&self, id: ScheduleId) -> Option<&Schedule> {
        self.schedules.iter().find(|s| s.id == id)
    }

    /// Look up the anchor entity itself, failing if the catalog lacks it.
    pub fn ensure_anchor(&self, anchor: Anchor) -> crate::error::Result<()> {
        let found = match anchor {
            Anchor::Restaurant(id) => self.restaurant(id).is_some(),
            Anchor::Campaign(id) => self.campaign(id).is_some(),
        };
        if found {
            Ok(())
        } else {
            Err(TargetingError::NotFound {
                kind: anchor.kind().label(),
                id: anchor.id(),
            })
        }
    }

    /// Display name of a counterpart of `anchor`.
    pub fn counterpart_name(&self, anchor: Anchor, id: EntityId) -> Option<&str> {
        match anchor.counterpart_kind() {
            EntityKind::Restaurant => self.restaurant(id).map(|r| r.name.as_str()),
            EntityKind::Campaign => self.campaign(id).map(|c| c.name.as_str()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Restaurant,
    Campaign,
}

impl EntityKind {
    pub fn label(self) -> &'static str {
        match self {
            EntityKind::Restaurant => "restaurant",
            EntityKind::Campaign => "campaign",
        }
    }
}

/// The fixed entity whose targeting relation is being edited.
///
/// Counterparts of a restaurant anchor are campaigns and vice versa.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Anchor {
    Restaurant(EntityId),
    Campaign(EntityId),
}

impl Anchor {
    pub fn id(self) -> EntityId {
        match self {
            Anchor::Restaurant(id) | Anchor::Campaign(id) => id,
        }
    }

    pub fn kind(self) -> EntityKind {
        match self {
            Anchor::Restaurant(_) => EntityKind::Restaurant,
            Anchor::Campaign(_) => EntityKind::Campaign,
        }
    }

    pub fn counterpart_kind(self) -> EntityKind {
        match self {
            Anchor::Restaurant(_) => EntityKind::Campaign,
            Anchor::Campaign(_) => EntityKind::Restaurant,
        }
    }
}

impl std::fmt::Display for Anchor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.kind().label(), self.id())
    }
}

impl FromStr for Anchor {
    type Err = TargetingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || TargetingError::InvalidAnchor(s.to_string());
        let (kind, id) = s.split_once(':').ok_or_else(invalid)?;
        let id: EntityId = id.trim().parse().map_err(|_| invalid())?;
        match kind.trim().to_ascii_lowercase().as_str() {
            "restaurant" | "r" => Ok(Anchor::Restaurant(id)),
            "campaign" | "c" => Ok(Anchor::Campaign(id)),
            _ => Err(invalid()),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(RefId),
    Many(Vec<RefId>),
}

fn one_or_many<'de, D>(deserializer: D) -> Result<BTreeSet<RefId>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<OneOrMany>::deserialize(deserializer)? {
        None => BTreeSet::new(),
        Some(OneOrMany::One(id)) => BTreeSet::from([id]),
        Some(OneOrMany::Many(ids)) => ids.into_iter().collect(),
    })
}
