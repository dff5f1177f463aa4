//! # Relation Editor
//!
//! Pure operations over a [`TargetingRelation`]. Each one takes the current
//! relation by reference and returns the next one; none of them fail or touch
//! storage. Identifiers of slots and schedules are opaque here.
//!
//! | Operation | Module |
//! |-----------|--------|
//! | `toggle_entity`, `bulk_add`, `toggle_all` | [`targeting`] |
//! | `toggle_slot`, `set_schedules` | [`slots`] |
//! | `slot_info`, `is_targeted`, `selection_summary` | [`projections`] |
//!
//! [`edit::RelationEdit`] wraps the mutating operations as values, and
//! [`edit::run`] returns a [`CmdResult`] carrying the next relation plus
//! user-facing messages.

use crate::relation::TargetingRelation;

pub mod edit;
pub mod projections;
pub mod slots;
pub mod targeting;

pub use edit::RelationEdit;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
}

#[derive(Debug, Clone)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }
}

#[derive(Debug, Default)]
pub struct CmdResult {
    pub relation: TargetingRelation,
    pub changed: bool,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_relation(mut self, relation: TargetingRelation) -> Self {
        self.relation = relation;
        self
    }
}
