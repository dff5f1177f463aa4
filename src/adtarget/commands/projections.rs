//! Read projections for rendering. Nothing here mutates a relation.

use crate::model::{EntityId, Schedule, ScheduleId, SlotId};
use crate::relation::TargetingRelation;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlotInfo {
    pub enabled: bool,
    pub schedule_ids: BTreeSet<ScheduleId>,
}

pub fn slot_info(relation: &TargetingRelation, id: EntityId, slot_id: SlotId) -> SlotInfo {
    relation
        .edge(id)
        .and_then(|edge| edge.slot(slot_id))
        .map(|slot| SlotInfo {
            enabled: true,
            schedule_ids: slot.schedule_ids.clone(),
        })
        .unwrap_or_default()
}

pub fn is_targeted(relation: &TargetingRelation, id: EntityId) -> bool {
    relation.is_targeted(id)
}

/// Tri-state select-all indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionState {
    None,
    Some,
    All,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionSummary {
    pub all_selected: bool,
    pub some_selected: bool,
}

impl SelectionSummary {
    pub fn state(&self) -> SelectionState {
        if self.all_selected {
            SelectionState::All
        } else if self.some_selected {
            SelectionState::Some
        } else {
            SelectionState::None
        }
    }
}

pub fn selection_summary(relation: &TargetingRelation, candidate_ids: &[EntityId]) -> SelectionSummary {
    let all_selected = super::targeting::all_targeted(relation, candidate_ids);
    let any_selected = candidate_ids.iter().any(|id| relation.is_targeted(*id));
    SelectionSummary {
        all_selected,
        some_selected: any_selected && !all_selected,
    }
}

/// A schedule as offered in a slot's schedule picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleOption<'a> {
    pub schedule: &'a Schedule,
    pub selected: bool,
    /// Blocked schedules are never selectable; they only show because they
    /// were assigned before being blocked.
    pub selectable: bool,
}

/// Schedules to show for a slot, in catalog order.
///
/// Active schedules are always listed. Blocked ones are listed only when
/// already assigned.
pub fn schedule_options<'a>(
    schedules: &'a [Schedule],
    assigned: &BTreeSet<ScheduleId>,
) -> Vec<ScheduleOption<'a>> {
    schedules
        .iter()
        .filter(|s| !s.blocked || assigned.contains(&s.id))
        .map(|s| ScheduleOption {
            schedule: s,
            selected: assigned.contains(&s.id),
            selectable: !s.blocked,
        })
        .collect()
}

/// Restrict a requested schedule selection to what may be assigned.
///
/// A blocked schedule may stay if it is already assigned but cannot be newly
/// added. Ids missing from the catalog are passed through untouched.
pub fn admissible_schedules(
    schedules: &[Schedule],
    current: &BTreeSet<ScheduleId>,
    requested: &BTreeSet<ScheduleId>,
) -> BTreeSet<ScheduleId> {
    requested
        .iter()
        .copied()
        .filter(|id| {
            current.contains(id) || !schedules.iter().any(|s| s.id == *id && s.blocked)
        })
        .collect()
}
