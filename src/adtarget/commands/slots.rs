//! Slot-level edits: enabling placements and assigning schedules.

use crate::model::{EntityId, ScheduleId, SlotId};
use crate::relation::{SlotAssignment, TargetingRelation};
use std::collections::BTreeSet;

/// Enable or disable a slot on a counterpart's edge.
///
/// Enabling a slot on an untargeted counterpart targets it. Disabling removes
/// the assignment with its schedules; the edge itself stays, so the
/// counterpart remains targeted.
pub fn toggle_slot(
    relation: &TargetingRelation,
    id: EntityId,
    slot_id: SlotId,
    enabled: bool,
) -> TargetingRelation {
    let mut next = relation.clone();

    if enabled {
        next.insert_edge(id);
        if let Some(edge) = next.edge_mut(id) {
            if edge.slot(slot_id).is_none() {
                edge.slots.push(SlotAssignment::new(slot_id));
            }
        }
    } else if let Some(edge) = next.edge_mut(id) {
        edge.slots.retain(|s| s.slot_id != slot_id);
    }

    next
}

/// Replace the schedules of an enabled slot.
///
/// No-op when the counterpart is untargeted or the slot is not enabled. The
/// set is stored verbatim: which schedules may be chosen is decided by the
/// caller (see [`admissible_schedules`](super::projections::admissible_schedules)).
pub fn set_schedules(
    relation: &TargetingRelation,
    id: EntityId,
    slot_id: SlotId,
    schedule_ids: &BTreeSet<ScheduleId>,
) -> TargetingRelation {
    let mut next = relation.clone();
    if let Some(slot) = next.edge_mut(id).and_then(|e| e.slot_mut(slot_id)) {
        slot.schedule_ids = schedule_ids.clone();
    }
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::targeting::toggle_entity;
    use crate::relation::PersistedEdge;

    fn relation_from(json: &str) -> TargetingRelation {
        let edges: Vec<PersistedEdge> = serde_json::from_str(json).unwrap();
        TargetingRelation::hydrate(edges).0
    }

    #[test]
    fn enabling_slot_auto_targets() {
        let relation = toggle_slot(&TargetingRelation::new(), 5, 100, true);

        assert!(relation.is_targeted(5));
        let edge = relation.edge(5).unwrap();
        assert_eq!(edge.slots, vec![SlotAssignment::new(100)]);
    }

    #[test]
    fn enabling_twice_keeps_single_assignment() {
        let relation = toggle_slot(&TargetingRelation::new(), 5, 100, true);
        let relation = set_schedules(&relation, 5, 100, &BTreeSet::from([1]));
        let again = toggle_slot(&relation, 5, 100, true);

        assert_eq!(again, relation);
    }

    #[test]
    fn enabling_appends_after_existing_slots() {
        let relation = toggle_slot(&TargetingRelation::new(), 5, 200, true);
        let relation = toggle_slot(&relation, 5, 100, true);
        let order: Vec<_> = relation.edge(5).unwrap().slots.iter().map(|s| s.slot_id).collect();
        assert_eq!(order, vec![200, 100]);
    }

    #[test]
    fn disabling_drops_slot_and_schedules() {
        let relation = relation_from(r#"[{"counterpartId":5,"slots":[{"id":100,"schedules":[7,8]}]}]"#);
        let next = toggle_slot(&relation, 5, 100, false);

        assert!(next.is_targeted(5));
        assert!(next.edge(5).unwrap().slots.is_empty());
    }

    #[test]
    fn disabling_on_untargeted_is_noop() {
        let relation = TargetingRelation::new();
        assert_eq!(toggle_slot(&relation, 5, 100, false), relation);
    }

    #[test]
    fn slot_toggle_roundtrip_leaves_entity_targeted() {
        let relation = TargetingRelation::new();
        let roundtrip = toggle_slot(&toggle_slot(&relation, 5, 100, true), 5, 100, false);
        assert_eq!(roundtrip, toggle_entity(&relation, 5));
    }

    #[test]
    fn re_enabling_does_not_restore_schedules() {
        let relation = relation_from(r#"[{"counterpartId":5,"slots":[{"id":100,"schedules":[7]}]}]"#);
        let off = toggle_slot(&relation, 5, 100, false);
        let on = toggle_slot(&off, 5, 100, true);
        assert!(on.edge(5).unwrap().slot(100).unwrap().schedule_ids.is_empty());
    }

    #[test]
    fn set_schedules_replaces() {
        let relation = relation_from(r#"[{"counterpartId":5,"slots":[{"id":100,"schedules":[7,8]}]}]"#);
        let next = set_schedules(&relation, 5, 100, &BTreeSet::from([9]));
        assert_eq!(
            next.edge(5).unwrap().slot(100).unwrap().schedule_ids,
            BTreeSet::from([9])
        );
    }

    #[test]
    fn set_schedules_is_idempotent() {
        let relation = toggle_slot(&TargetingRelation::new(), 5, 100, true);
        let ids = BTreeSet::from([1, 2]);
        let once = set_schedules(&relation, 5, 100, &ids);
        assert_eq!(set_schedules(&once, 5, 100, &ids), once);
    }

    #[test]
    fn set_schedules_without_slot_is_noop() {
        let untargeted = TargetingRelation::new();
        assert_eq!(
            set_schedules(&untargeted, 5, 100, &BTreeSet::from([1])),
            untargeted
        );

        let targeted = toggle_entity(&untargeted, 5);
        assert_eq!(
            set_schedules(&targeted, 5, 100, &BTreeSet::from([1])),
            targeted
        );
    }
}
