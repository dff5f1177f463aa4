use super::RelationStore;
use crate::error::{Result, TargetingError};
use crate::model::{Anchor, Catalogs};
use crate::relation::PersistedEdge;
use std::collections::HashMap;

/// In-memory storage for testing and embedding.
/// Does NOT persist data.
#[derive(Default)]
pub struct InMemoryStore {
    catalogs: Catalogs,
    relations: HashMap<Anchor, Vec<PersistedEdge>>,
    fail_saves: bool,
    save_count: usize,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_catalogs(catalogs: Catalogs) -> Self {
        Self {
            catalogs,
            ..Self::default()
        }
    }

    /// Make every subsequent save fail, as a rejecting backend would.
    pub fn set_fail_saves(&mut self, fail: bool) {
        self.fail_saves = fail;
    }

    /// Number of successful saves.
    pub fn save_count(&self) -> usize {
        self.save_count
    }

    pub fn insert_relation(&mut self, anchor: Anchor, edges: Vec<PersistedEdge>) {
        self.relations.insert(anchor, edges);
    }
}

impl RelationStore for InMemoryStore {
    fn load_catalogs(&self) -> Result<Catalogs> {
        Ok(self.catalogs.clone())
    }

    fn load_relation(&self, anchor: Anchor) -> Result<Vec<PersistedEdge>> {
        Ok(self.relations.get(&anchor).cloned().unwrap_or_default())
    }

    fn save_relation(&mut self, anchor: Anchor, edges: &[PersistedEdge]) -> Result<()> {
        if self.fail_saves {
            return Err(TargetingError::Store(format!(
                "save rejected for {}",
                anchor
            )));
        }
        self.relations.insert(anchor, edges.to_vec());
        self.save_count += 1;
        Ok(())
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;
    use crate::attributes::RuleSet;
    use crate::model::{Campaign, NamedRef, Placement, Restaurant, Schedule};
    use crate::relation::PersistedSlot;
    use std::collections::BTreeSet;

    pub struct StoreFixture {
        pub store: InMemoryStore,
    }

    impl Default for StoreFixture {
        fn default() -> Self {
            Self::new()
        }
    }

    impl StoreFixture {
        pub fn new() -> Self {
            Self {
                store: InMemoryStore::new(),
            }
        }

        /// Restaurants 1..=count, alternating districts 10 and 20.
        pub fn with_restaurants(mut self, count: u64) -> Self {
            for i in 1..=count {
                self.store.catalogs.restaurants.push(Restaurant {
                    id: i,
                    name: format!("Restaurant {}", i),
                    district_id: if i % 2 == 1 { 10 } else { 20 },
                    restaurant_type_ids: BTreeSet::from([1]),
                    menu_type_ids: BTreeSet::from([1]),
                    price_segment_id: 1,
                });
            }
            self.store.catalogs.districts = vec![
                NamedRef {
                    id: 10,
                    name: "North".into(),
                },
                NamedRef {
                    id: 20,
                    name: "South".into(),
                },
            ];
            self
        }

        pub fn with_campaign(mut self, id: u64, name: &str, rules: RuleSet) -> Self {
            self.store.catalogs.campaigns.push(Campaign {
                id,
                name: name.to_string(),
                advertiser_id: 1,
                blocked: false,
                rules,
            });
            self
        }

        pub fn with_placements(mut self, ids: &[u64]) -> Self {
            for &id in ids {
                self.store.catalogs.placements.push(Placement {
                    id,
                    name: format!("Slot {}", id),
                });
            }
            self
        }

        pub fn with_schedule(mut self, id: u64, blocked: bool) -> Self {
            self.store.catalogs.schedules.push(Schedule {
                id,
                name: format!("Schedule {}", id),
                color: "#336699".into(),
                blocked,
            });
            self
        }

        /// Persist an edge `{counterpart, slots: [(slot, schedules)]}` for `anchor`.
        pub fn with_edge(mut self, anchor: Anchor, counterpart: u64, slots: &[(u64, &[u64])]) -> Self {
            let edge = PersistedEdge {
                counterpart_id: counterpart,
                slots: slots
                    .iter()
                    .map(|(id, schedules)| PersistedSlot {
                        id: *id,
                        schedules: schedules.to_vec(),
                    })
                    .collect(),
            };
            self.store.relations.entry(anchor).or_default().push(edge);
            self
        }
    }
}
