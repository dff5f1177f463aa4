//! # Targeting Relation
//!
//! The in-memory relation between one anchor entity and its counterparts.
//!
//! ```text
//! TargetingRelation
//! └── TargetEdge { counterpart_id }          edge present = targeted
//!     └── SlotAssignment { slot_id }          slot present = enabled
//!         └── schedule_ids: {ScheduleId}
//! ```
//!
//! Three states per counterpart: no edge (untargeted), an edge with no slots
//! (targeted, nothing enabled), an edge with slots. Invariants:
//!
//! - a counterpart has at most one edge
//! - a slot id appears at most once per edge
//!
//! Edges keep insertion order: hydrated edges in persisted order, newly
//! targeted counterparts appended. The Relation Editor operations in [`commands`](crate::commands) take a relation by reference and
//! return a new one, so before/after states can be compared directly.
//!
//! ## Persisted Shape
//!
//! The persistence collaborator exchanges a list of [`PersistedEdge`]:
//!
//! ```json
//! [{ "counterpartId": 5, "slots": [{ "id": 100, "schedules": [7, 8] }] }]
//! ```

use crate::model::{EntityId, ScheduleId, SlotId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotAssignment {
    pub slot_id: SlotId,
    pub schedule_ids: BTreeSet<ScheduleId>,
}

impl SlotAssignment {
    pub fn new(slot_id: SlotId) -> Self {
        Self {
            slot_id,
            schedule_ids: BTreeSet::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetEdge {
    pub counterpart_id: EntityId,
    pub slots: Vec<SlotAssignment>,
}

impl TargetEdge {
    /// A targeted counterpart with no slots enabled.
    pub fn new(counterpart_id: EntityId) -> Self {
        Self {
            counterpart_id,
            slots: Vec::new(),
        }
    }

    pub fn slot(&self, slot_id: SlotId) -> Option<&SlotAssignment> {
        self.slots.iter().find(|s| s.slot_id == slot_id)
    }

    pub fn slot_mut(&mut self, slot_id: SlotId) -> Option<&mut SlotAssignment> {
        self.slots.iter_mut().find(|s| s.slot_id == slot_id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetingRelation {
    edges: Vec<TargetEdge>,
}

impl TargetingRelation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a relation from persisted edges.
    ///
    /// A repeated counterpart id, or a repeated slot id within one edge, keeps
    /// its first occurrence. Returns the relation and the number of dropped
    /// duplicates.
    pub fn hydrate(persisted: Vec<PersistedEdge>) -> (Self, usize) {
        let mut relation = Self::new();
        let mut dropped = 0;

        for p in persisted {
            if relation.is_targeted(p.counterpart_id) {
                dropped += 1;
                continue;
            }
            let mut edge = TargetEdge::new(p.counterpart_id);
            for slot in p.slots {
                if edge.slot(slot.id).is_some() {
                    dropped += 1;
                    continue;
                }
                edge.slots.push(SlotAssignment {
                    slot_id: slot.id,
                    schedule_ids: slot.schedules.into_iter().collect(),
                });
            }
            relation.edges.push(edge);
        }

        (relation, dropped)
    }

    pub fn to_persisted(&self) -> Vec<PersistedEdge> {
        self.edges
            .iter()
            .map(|edge| PersistedEdge {
                counterpart_id: edge.counterpart_id,
                slots: edge
                    .slots
                    .iter()
                    .map(|s| PersistedSlot {
                        id: s.slot_id,
                        schedules: s.schedule_ids.iter().copied().collect(),
                    })
                    .collect(),
            })
            .collect()
    }

    /// Edges in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = &TargetEdge> {
        self.edges.iter()
    }

    pub fn edge(&self, counterpart_id: EntityId) -> Option<&TargetEdge> {
        self.edges.iter().find(|e| e.counterpart_id == counterpart_id)
    }

    pub(crate) fn edge_mut(&mut self, counterpart_id: EntityId) -> Option<&mut TargetEdge> {
        self.edges.iter_mut().find(|e| e.counterpart_id == counterpart_id)
    }

    pub fn is_targeted(&self, counterpart_id: EntityId) -> bool {
        self.edge(counterpart_id).is_some()
    }

    pub fn targeted_ids(&self) -> BTreeSet<EntityId> {
        self.edges.iter().map(|e| e.counterpart_id).collect()
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Insert an empty edge unless one exists. Returns whether it was added.
    pub(crate) fn insert_edge(&mut self, counterpart_id: EntityId) -> bool {
        if self.is_targeted(counterpart_id) {
            return false;
        }
        self.edges.push(TargetEdge::new(counterpart_id));
        true
    }

    /// Remove an edge with all its slots. Returns whether one was removed.
    pub(crate) fn remove_edge(&mut self, counterpart_id: EntityId) -> bool {
        let before = self.edges.len();
        self.edges.retain(|e| e.counterpart_id != counterpart_id);
        self.edges.len() != before
    }
}

/// One edge as exchanged with the persistence collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedEdge {
    pub counterpart_id: EntityId,
    #[serde(default)]
    pub slots: Vec<PersistedSlot>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedSlot {
    pub id: SlotId,
    #[serde(default)]
    pub schedules: Vec<ScheduleId>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn persisted(json: &str) -> Vec<PersistedEdge> {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn hydrates_wire_shape() {
        let (relation, dropped) = TargetingRelation::hydrate(persisted(
            r#"[{"counterpartId":5,"slots":[{"id":100,"schedules":[8,7]}]},{"counterpartId":6,"slots":[]}]"#,
        ));

        assert_eq!(dropped, 0);
        assert_eq!(relation.len(), 2);
        let edge = relation.edge(5).unwrap();
        assert_eq!(edge.slots.len(), 1);
        assert_eq!(
            edge.slot(100).unwrap().schedule_ids,
            BTreeSet::from([7, 8])
        );
        assert!(relation.is_targeted(6));
        assert!(relation.edge(6).unwrap().slots.is_empty());
    }

    #[test]
    fn hydrate_keeps_first_duplicate() {
        let (relation, dropped) = TargetingRelation::hydrate(persisted(
            r#"[
                {"counterpartId":5,"slots":[{"id":1,"schedules":[1]},{"id":1,"schedules":[2]}]},
                {"counterpartId":5,"slots":[{"id":9}]}
            ]"#,
        ));

        assert_eq!(dropped, 2);
        assert_eq!(relation.len(), 1);
        let edge = relation.edge(5).unwrap();
        assert_eq!(edge.slots.len(), 1);
        assert_eq!(edge.slots[0].schedule_ids, BTreeSet::from([1]));
    }

    #[test]
    fn persisted_output_matches_hydrated_input() {
        let input = persisted(
            r#"[{"counterpartId":9,"slots":[{"id":2,"schedules":[3]},{"id":1}]},{"counterpartId":1}]"#,
        );
        let (relation, _) = TargetingRelation::hydrate(input.clone());
        assert_eq!(relation.to_persisted(), input);
    }

    #[test]
    fn new_edges_are_appended() {
        let (mut relation, _) = TargetingRelation::hydrate(persisted(
            r#"[{"counterpartId":9},{"counterpartId":1}]"#,
        ));
        relation.insert_edge(5);
        relation.remove_edge(9);
        relation.insert_edge(9);

        let ids: Vec<_> = relation.edges().map(|e| e.counterpart_id).collect();
        assert_eq!(ids, vec![1, 5, 9]);
    }

    #[test]
    fn insert_and_remove_edges() {
        let mut relation = TargetingRelation::new();
        assert!(relation.insert_edge(3));
        assert!(!relation.insert_edge(3));
        assert_eq!(relation.targeted_ids(), BTreeSet::from([3]));
        assert!(relation.remove_edge(3));
        assert!(!relation.remove_edge(3));
        assert!(relation.is_empty());
    }
}
