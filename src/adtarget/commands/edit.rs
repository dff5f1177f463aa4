//! Edit events.
//!
//! [`RelationEdit`] names each Relation Editor operation so a host can queue,
//! log, or replay edits (the CLI reads them from JSON). [`run`] applies one
//! edit and reports what changed.

use super::slots::{set_schedules, toggle_slot};
use super::targeting::{all_targeted, bulk_add, toggle_all, toggle_entity};
use super::{CmdMessage, CmdResult};
use crate::model::{EntityId, EntityKind, ScheduleId, SlotId};
use crate::relation::TargetingRelation;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum RelationEdit {
    ToggleEntity {
        id: EntityId,
    },
    ToggleSlot {
        id: EntityId,
        slot: SlotId,
        enabled: bool,
    },
    SetSchedules {
        id: EntityId,
        slot: SlotId,
        #[serde(default)]
        schedules: BTreeSet<ScheduleId>,
    },
    BulkAdd {
        ids: Vec<EntityId>,
    },
    ToggleAll {
        ids: Vec<EntityId>,
    },
}

impl RelationEdit {
    pub fn apply(&self, relation: &TargetingRelation) -> TargetingRelation {
        match self {
            RelationEdit::ToggleEntity { id } => toggle_entity(relation, *id),
            RelationEdit::ToggleSlot { id, slot, enabled } => {
                toggle_slot(relation, *id, *slot, *enabled)
            }
            RelationEdit::SetSchedules {
                id,
                slot,
                schedules,
            } => set_schedules(relation, *id, *slot, schedules),
            RelationEdit::BulkAdd { ids } => bulk_add(relation, ids),
            RelationEdit::ToggleAll { ids } => toggle_all(relation, ids),
        }
    }
}

/// Apply `edit` and describe the result. `kind` is the counterpart side.
pub fn run(relation: &TargetingRelation, edit: &RelationEdit, kind: EntityKind) -> CmdResult {
    let next = edit.apply(relation);
    let label = kind.label();
    let mut result = CmdResult::default();

    match edit {
        RelationEdit::ToggleEntity { id } => {
            if next.is_targeted(*id) {
                result.add_message(CmdMessage::success(format!("Targeted {} {}", label, id)));
            } else {
                let discarded = relation.edge(*id).map_or(0, |e| e.slots.len());
                let mut msg = format!("Untargeted {} {}", label, id);
                if discarded > 0 {
                    let noun = if discarded == 1 { "slot" } else { "slots" };
                    msg.push_str(&format!(" ({} {} discarded)", discarded, noun));
                }
                result.add_message(CmdMessage::success(msg));
            }
        }
        RelationEdit::ToggleSlot { id, slot, enabled } => {
            if !relation.is_targeted(*id) && next.is_targeted(*id) {
                result.add_message(CmdMessage::success(format!("Targeted {} {}", label, id)));
            }
            let was_enabled = relation.edge(*id).and_then(|e| e.slot(*slot)).is_some();
            match (enabled, was_enabled) {
                (true, false) => result.add_message(CmdMessage::success(format!(
                    "Enabled slot {} on {} {}",
                    slot, label, id
                ))),
                (false, true) => result.add_message(CmdMessage::success(format!(
                    "Disabled slot {} on {} {}",
                    slot, label, id
                ))),
                (true, true) => result.add_message(CmdMessage::info(format!(
                    "Slot {} already enabled on {} {}",
                    slot, label, id
                ))),
                (false, false) => result.add_message(CmdMessage::info(format!(
                    "Slot {} is not enabled on {} {}",
                    slot, label, id
                ))),
            }
        }
        RelationEdit::SetSchedules {
            id,
            slot,
            schedules,
        } => {
            if relation.edge(*id).and_then(|e| e.slot(*slot)).is_some() {
                result.add_message(CmdMessage::success(format!(
                    "Set {} schedules on slot {} of {} {}",
                    schedules.len(),
                    slot,
                    label,
                    id
                )));
            } else {
                result.add_message(CmdMessage::warning(format!(
                    "Slot {} is not enabled on {} {}; schedules unchanged",
                    slot, label, id
                )));
            }
        }
        RelationEdit::BulkAdd { ids } => {
            let added = next.len() - relation.len();
            result.add_message(CmdMessage::success(format!(
                "Targeted {} {}(s)",
                added, label
            )));
            let skipped = ids
                .iter()
                .filter(|id| relation.is_targeted(**id))
                .collect::<BTreeSet<_>>()
                .len();
            if skipped > 0 {
                result.add_message(CmdMessage::info(format!(
                    "{} already targeted, left unchanged",
                    skipped
                )));
            }
        }
        RelationEdit::ToggleAll { ids } => {
            if ids.is_empty() {
                result.add_message(CmdMessage::info("No visible candidates"));
            } else if all_targeted(relation, ids) {
                result.add_message(CmdMessage::success(format!(
                    "Untargeted {} {}(s)",
                    relation.len() - next.len(),
                    label
                )));
            } else {
                result.add_message(CmdMessage::success(format!(
                    "Targeted {} {}(s)",
                    next.len() - relation.len(),
                    label
                )));
            }
        }
    }

    result.changed = next != *relation;
    result.with_relation(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::MessageLevel;

    #[test]
    fn parses_tagged_edits() {
        let edits: Vec<RelationEdit> = serde_json::from_str(
            r#"[
                {"op":"toggle_entity","id":1},
                {"op":"toggle_slot","id":1,"slot":100,"enabled":true},
                {"op":"set_schedules","id":1,"slot":100,"schedules":[7,8]},
                {"op":"bulk_add","ids":[2,3]},
                {"op":"toggle_all","ids":[2,3]}
            ]"#,
        )
        .unwrap();

        assert_eq!(edits.len(), 5);
        assert_eq!(
            edits[2],
            RelationEdit::SetSchedules {
                id: 1,
                slot: 100,
                schedules: BTreeSet::from([7, 8])
            }
        );
    }

    #[test]
    fn run_reports_auto_targeting() {
        let edit = RelationEdit::ToggleSlot {
            id: 5,
            slot: 100,
            enabled: true,
        };
        let result = run(&TargetingRelation::new(), &edit, EntityKind::Campaign);

        assert!(result.changed);
        assert!(result.relation.is_targeted(5));
        assert_eq!(result.messages.len(), 2);
        assert_eq!(result.messages[0].content, "Targeted campaign 5");
        assert_eq!(result.messages[1].content, "Enabled slot 100 on campaign 5");
    }

    #[test]
    fn run_warns_on_schedules_without_slot() {
        let edit = RelationEdit::SetSchedules {
            id: 5,
            slot: 100,
            schedules: BTreeSet::from([1]),
        };
        let result = run(&TargetingRelation::new(), &edit, EntityKind::Restaurant);

        assert!(!result.changed);
        assert!(matches!(result.messages[0].level, MessageLevel::Warning));
    }

    #[test]
    fn run_counts_bulk_add() {
        let relation = bulk_add(&TargetingRelation::new(), &[1]);
        let edit = RelationEdit::BulkAdd { ids: vec![1, 2, 3] };
        let result = run(&relation, &edit, EntityKind::Restaurant);

        assert_eq!(result.messages[0].content, "Targeted 2 restaurant(s)");
        assert_eq!(
            result.messages[1].content,
            "1 already targeted, left unchanged"
        );
    }

    #[test]
    fn run_reports_discarded_slots() {
        let relation = toggle_slot(&TargetingRelation::new(), 5, 100, true);
        let edit = RelationEdit::ToggleEntity { id: 5 };
        let result = run(&relation, &edit, EntityKind::Campaign);

        assert!(result.relation.is_empty());
        assert_eq!(
            result.messages[0].content,
            "Untargeted campaign 5 (1 slot discarded)"
        );

        let relation = toggle_slot(&relation, 5, 200, true);
        let result = run(&relation, &edit, EntityKind::Campaign);
        assert_eq!(
            result.messages[0].content,
            "Untargeted campaign 5 (2 slots discarded)"
        );
    }
}
