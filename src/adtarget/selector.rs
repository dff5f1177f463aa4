//! # Candidate Selector
//!
//! Produces the restricted candidate list shown by bulk-add pickers and used
//! for table filtering. Three filters run in order, each preserving catalog
//! order:
//!
//! 1. drop entities whose id is in the exclude set (already targeted)
//! 2. drop entities whose name does not contain the search term
//!    (case-insensitive; an empty term matches everything)
//! 3. drop entities failing [`attributes::matches`](crate::attributes::matches)
//!
//! [`select`] is the pure function. [`CandidateSelector`] wraps it with owned
//! inputs and memoizes the result until one of them changes.
//! [`CounterpartSelector`] picks the catalog for an anchor's counterpart side.

use crate::attributes::{matches, Classified, RuleSet};
use crate::model::{Campaign, Catalogs, EntityId, EntityKind, Restaurant};
use std::collections::BTreeSet;

/// A counterpart row as shown in a picker or table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateRow {
    pub id: EntityId,
    pub name: String,
}

/// An entity that can appear in a picker.
pub trait Candidate: Classified {
    fn id(&self) -> EntityId;
    fn display_name(&self) -> &str;
}

impl Candidate for Restaurant {
    fn id(&self) -> EntityId {
        self.id
    }

    fn display_name(&self) -> &str {
        &self.name
    }
}

impl Candidate for Campaign {
    fn id(&self) -> EntityId {
        self.id
    }

    fn display_name(&self) -> &str {
        &self.name
    }
}

pub fn select<'a, E: Candidate>(
    entities: &'a [E],
    rules: &RuleSet,
    exclude_ids: &BTreeSet<EntityId>,
    search: &str,
) -> Vec<&'a E> {
    let term = search.to_lowercase();
    entities
        .iter()
        .filter(|e| admitted(*e, rules, exclude_ids, &term))
        .collect()
}

fn admitted<E: Candidate>(
    entity: &E,
    rules: &RuleSet,
    exclude_ids: &BTreeSet<EntityId>,
    term_lower: &str,
) -> bool {
    !exclude_ids.contains(&entity.id())
        && (term_lower.is_empty() || entity.display_name().to_lowercase().contains(term_lower))
        && matches(entity, rules)
}

/// Stateful picker over a fixed catalog slice.
///
/// The rule set is an explicit constructor argument: callers seed it from a
/// campaign's own rules or from configured defaults.
pub struct CandidateSelector<'a, E: Candidate> {
    entities: &'a [E],
    rules: RuleSet,
    search: String,
    exclude_ids: BTreeSet<EntityId>,
    memo: Option<Vec<usize>>,
}

impl<'a, E: Candidate> CandidateSelector<'a, E> {
    pub fn new(entities: &'a [E], seed: RuleSet) -> Self {
        Self {
            entities,
            rules: seed,
            search: String::new(),
            exclude_ids: BTreeSet::new(),
            memo: None,
        }
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn exclude_ids(&self) -> &BTreeSet<EntityId> {
        &self.exclude_ids
    }

    pub fn set_rules(&mut self, rules: RuleSet) {
        if self.rules != rules {
            self.rules = rules;
            self.memo = None;
        }
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        let search = search.into();
        if self.search != search {
            self.search = search;
            self.memo = None;
        }
    }

    pub fn set_exclude_ids(&mut self, exclude_ids: BTreeSet<EntityId>) {
        if self.exclude_ids != exclude_ids {
            self.exclude_ids = exclude_ids;
            self.memo = None;
        }
    }

    /// Current candidates, recomputed only when an input changed.
    pub fn candidates(&mut self) -> Vec<&'a E> {
        let entities = self.entities;
        let positions = self.memo.get_or_insert_with(|| {
            let term = self.search.to_lowercase();
            entities
                .iter()
                .enumerate()
                .filter(|(_, e)| admitted(*e, &self.rules, &self.exclude_ids, &term))
                .map(|(i, _)| i)
                .collect()
        });
        positions.iter().map(|&i| &entities[i]).collect()
    }

    pub fn candidate_ids(&mut self) -> Vec<EntityId> {
        self.candidates().into_iter().map(|e| e.id()).collect()
    }

    pub fn is_memoized(&self) -> bool {
        self.memo.is_some()
    }
}

impl<'a> CandidateSelector<'a, Restaurant> {
    /// Restaurant picker seeded with the campaign's own targeting rules.
    pub fn for_campaign(restaurants: &'a [Restaurant], campaign: &Campaign) -> Self {
        Self::new(restaurants, campaign.rules.clone())
    }
}

/// A [`CandidateSelector`] over restaurants or campaigns.
pub enum CounterpartSelector<'a> {
    Restaurants(CandidateSelector<'a, Restaurant>),
    Campaigns(CandidateSelector<'a, Campaign>),
}

impl<'a> CounterpartSelector<'a> {
    pub fn new(catalogs: &'a Catalogs, kind: EntityKind, seed: RuleSet) -> Self {
        match kind {
            EntityKind::Restaurant => {
                Self::Restaurants(CandidateSelector::new(&catalogs.restaurants, seed))
            }
            EntityKind::Campaign => Self::Campaigns(CandidateSelector::new(&catalogs.campaigns, seed)),
        }
    }

    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Restaurants(_) => EntityKind::Restaurant,
            Self::Campaigns(_) => EntityKind::Campaign,
        }
    }

    pub fn rules(&self) -> &RuleSet {
        match self {
            Self::Restaurants(s) => s.rules(),
            Self::Campaigns(s) => s.rules(),
        }
    }

    pub fn set_rules(&mut self, rules: RuleSet) {
        match self {
            Self::Restaurants(s) => s.set_rules(rules),
            Self::Campaigns(s) => s.set_rules(rules),
        }
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        match self {
            Self::Restaurants(s) => s.set_search(search),
            Self::Campaigns(s) => s.set_search(search),
        }
    }

    pub fn set_exclude_ids(&mut self, exclude_ids: BTreeSet<EntityId>) {
        match self {
            Self::Restaurants(s) => s.set_exclude_ids(exclude_ids),
            Self::Campaigns(s) => s.set_exclude_ids(exclude_ids),
        }
    }

    pub fn is_memoized(&self) -> bool {
        match self {
            Self::Restaurants(s) => s.is_memoized(),
            Self::Campaigns(s) => s.is_memoized(),
        }
    }

    pub fn rows(&mut self) -> Vec<CandidateRow> {
        match self {
            Self::Restaurants(s) => rows(s.candidates()),
            Self::Campaigns(s) => rows(s.candidates()),
        }
    }
}

fn rows<E: Candidate>(picked: Vec<&E>) -> Vec<CandidateRow> {
    picked
        .into_iter()
        .map(|e| CandidateRow {
            id: e.id(),
            name: e.display_name().to_string(),
        })
        .collect()
}
