//! Edge-level edits: target, untarget, bulk add, select-all.

use crate::model::EntityId;
use crate::relation::TargetingRelation;

/// Untargeted becomes targeted with no slots; targeted becomes untargeted
/// and its slots are discarded.
pub fn toggle_entity(relation: &TargetingRelation, id: EntityId) -> TargetingRelation {
    let mut next = relation.clone();
    if !next.remove_edge(id) {
        next.insert_edge(id);
    }
    next
}

/// Target every id not already targeted. Existing edges are left as they are.
pub fn bulk_add(relation: &TargetingRelation, ids: &[EntityId]) -> TargetingRelation {
    let mut next = relation.clone();
    for &id in ids {
        next.insert_edge(id);
    }
    next
}

/// Select-all over the currently visible candidates.
///
/// If every candidate is targeted, all of them are untargeted. Otherwise the
/// untargeted ones are added with no slots. Ids outside `candidate_ids` are
/// never touched.
pub fn toggle_all(relation: &TargetingRelation, candidate_ids: &[EntityId]) -> TargetingRelation {
    let mut next = relation.clone();
    if all_targeted(relation, candidate_ids) {
        for id in candidate_ids {
            next.remove_edge(*id);
        }
    } else {
        for &id in candidate_ids {
            next.insert_edge(id);
        }
    }
    next
}

pub(crate) fn all_targeted(relation: &TargetingRelation, ids: &[EntityId]) -> bool {
    !ids.is_empty() && ids.iter().all(|id| relation.is_targeted(*id))
}
