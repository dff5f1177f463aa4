use adtarget::attributes::{matches, Dimension, Rule, RuleSet};
use adtarget::commands::projections::{selection_summary, slot_info, SelectionState};
use adtarget::commands::slots::{set_schedules, toggle_slot};
use adtarget::commands::targeting::{bulk_add, toggle_all, toggle_entity};
use adtarget::model::{EntityId, Restaurant};
use adtarget::relation::{PersistedEdge, PersistedSlot, TargetingRelation};
use adtarget::selector::select;
use proptest::prelude::*;
use std::collections::BTreeSet;

fn arb_relation() -> impl Strategy<Value = TargetingRelation> {
    let slot = (0u64..5, prop::collection::vec(0u64..6, 0..4))
        .prop_map(|(id, schedules)| PersistedSlot { id, schedules });
    let edge = (0u64..20, prop::collection::vec(slot, 0..4)).prop_map(|(counterpart_id, slots)| {
        PersistedEdge {
            counterpart_id,
            slots,
        }
    });
    prop::collection::vec(edge, 0..8).prop_map(|edges| TargetingRelation::hydrate(edges).0)
}

fn arb_restaurant() -> impl Strategy<Value = Restaurant> {
    (
        0u64..30,
        "[a-z]{1,8}",
        0u64..4,
        prop::collection::btree_set(0u64..4, 0..3),
        prop::collection::btree_set(0u64..4, 0..3),
        0u64..3,
    )
        .prop_map(
            |(id, name, district_id, restaurant_type_ids, menu_type_ids, price_segment_id)| {
                Restaurant {
                    id,
                    name,
                    district_id,
                    restaurant_type_ids,
                    menu_type_ids,
                    price_segment_id,
                }
            },
        )
}

fn arb_dimension() -> impl Strategy<Value = Dimension> {
    prop::sample::select(Dimension::ALL.to_vec())
}

proptest! {
    #[test]
    fn unrestricted_rules_admit_everything(restaurant in arb_restaurant()) {
        prop_assert!(matches(&restaurant, &RuleSet::default()));
    }

    #[test]
    fn denied_is_negation_of_allowed(
        restaurant in arb_restaurant(),
        dimension in arb_dimension(),
        values in prop::collection::btree_set(0u64..4, 1..3),
    ) {
        let allowed = RuleSet::default().with(dimension, Rule::allowed(values.clone()));
        let denied = RuleSet::default().with(dimension, Rule::denied(values));
        prop_assert_ne!(matches(&restaurant, &allowed), matches(&restaurant, &denied));
    }

    #[test]
    fn toggle_entity_twice_restores_targeting(relation in arb_relation(), id in 0u64..20) {
        let twice = toggle_entity(&toggle_entity(&relation, id), id);
        prop_assert_eq!(twice.targeted_ids(), relation.targeted_ids());
        if !relation.is_targeted(id) {
            prop_assert_eq!(twice, relation);
        }
    }

    #[test]
    fn toggle_entity_only_touches_its_id(relation in arb_relation(), id in 0u64..20) {
        let next = toggle_entity(&relation, id);
        for edge in relation.edges().filter(|e| e.counterpart_id != id) {
            prop_assert_eq!(next.edge(edge.counterpart_id), Some(edge));
        }
    }

    #[test]
    fn enabling_a_slot_targets_and_enables(
        relation in arb_relation(),
        id in 0u64..20,
        slot in 0u64..5,
    ) {
        let next = toggle_slot(&relation, id, slot, true);
        prop_assert!(next.is_targeted(id));
        prop_assert!(slot_info(&next, id, slot).enabled);

        let off = toggle_slot(&next, id, slot, false);
        prop_assert!(off.is_targeted(id));
        prop_assert!(!slot_info(&off, id, slot).enabled);
    }

    #[test]
    fn set_schedules_is_idempotent(
        relation in arb_relation(),
        id in 0u64..20,
        slot in 0u64..5,
        schedules in prop::collection::btree_set(0u64..6, 0..4),
    ) {
        let once = set_schedules(&relation, id, slot, &schedules);
        let twice = set_schedules(&once, id, slot, &schedules);
        prop_assert_eq!(&once, &twice);

        if slot_info(&relation, id, slot).enabled {
            prop_assert_eq!(slot_info(&once, id, slot).schedule_ids, schedules);
        } else {
            prop_assert_eq!(once, relation);
        }
    }

    #[test]
    fn bulk_add_keeps_existing_edges(
        relation in arb_relation(),
        ids in prop::collection::vec(0u64..20, 0..6),
    ) {
        let next = bulk_add(&relation, &ids);
        for edge in relation.edges() {
            prop_assert_eq!(next.edge(edge.counterpart_id), Some(edge));
        }
        for id in &ids {
            prop_assert!(next.is_targeted(*id));
        }
    }

    #[test]
    fn toggle_all_ends_all_or_none_and_spares_others(
        relation in arb_relation(),
        candidates in prop::collection::btree_set(0u64..20, 1..6),
    ) {
        let ids: Vec<EntityId> = candidates.iter().copied().collect();
        let next = toggle_all(&relation, &ids);

        let state = selection_summary(&next, &ids).state();
        prop_assert!(state == SelectionState::All || state == SelectionState::None);

        for edge in relation.edges().filter(|e| !candidates.contains(&e.counterpart_id)) {
            prop_assert_eq!(next.edge(edge.counterpart_id), Some(edge));
        }
    }

    #[test]
    fn toggle_all_twice_restores_from_none_or_all(
        relation in arb_relation(),
        candidates in prop::collection::btree_set(0u64..20, 1..6),
        start_all in any::<bool>(),
    ) {
        let ids: Vec<EntityId> = candidates.iter().copied().collect();
        // Normalize the start state: all candidates targeted with no slots, or none targeted.
        let mut start = relation;
        for id in &ids {
            if start.is_targeted(*id) {
                start = toggle_entity(&start, *id);
            }
        }
        if start_all {
            start = bulk_add(&start, &ids);
        }

        let twice = toggle_all(&toggle_all(&start, &ids), &ids);
        prop_assert_eq!(twice, start);
    }

    #[test]
    fn selector_never_returns_excluded(
        restaurants in prop::collection::vec(arb_restaurant(), 0..10),
        exclude in prop::collection::btree_set(0u64..30, 0..10),
        search in "[a-z]{0,2}",
    ) {
        let picked = select(&restaurants, &RuleSet::default(), &exclude, &search);
        for r in &picked {
            prop_assert!(!exclude.contains(&r.id));
            prop_assert!(r.name.contains(search.as_str()));
        }

        let unfiltered = select(&restaurants, &RuleSet::default(), &BTreeSet::new(), "");
        prop_assert_eq!(unfiltered.len(), restaurants.len());
    }
}
