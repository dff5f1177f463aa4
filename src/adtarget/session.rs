//! # Editing Session
//!
//! [`EditorSession`] is the entry point for hosts. It owns the in-memory
//! [`TargetingRelation`] of one anchor for the duration of an edit:
//!
//! ```text
//! open ──► hydrated ──apply──► dirty ──save──► clean
//!             ▲                  │
//!             └──────cancel──────┘
//! ```
//!
//! - `open` hydrates once from the store.
//! - `apply` runs one edit to completion; edits never touch the store.
//! - `save` flushes the edge list. On failure the in-memory relation is left
//!   exactly as it was, so the caller can retry.
//! - `cancel` discards edits back to the last hydrated or saved snapshot.
//!
//! The session is generic over [`RelationStore`]: production hosts pass a
//! `FileStore` (or their own backend), tests pass an `InMemoryStore`.

use crate::attributes::RuleSet;
use crate::commands::projections::{selection_summary, SelectionSummary};
use crate::commands::{edit, CmdMessage, CmdResult, RelationEdit};
use crate::error::Result;
use crate::model::{Anchor, Catalogs, EntityId};
use crate::relation::TargetingRelation;
use crate::selector::{CandidateSelector, CounterpartSelector};
pub use crate::selector::CandidateRow;
use crate::store::RelationStore;
use chrono::{DateTime, Utc};
use std::collections::BTreeSet;

pub struct EditorSession<S: RelationStore> {
    store: S,
    anchor: Anchor,
    catalogs: Catalogs,
    snapshot: TargetingRelation,
    relation: TargetingRelation,
    hydrated_at: DateTime<Utc>,
    last_saved_at: Option<DateTime<Utc>>,
}

impl<S: RelationStore> EditorSession<S> {
    /// Load catalogs and hydrate the anchor's relation.
    pub fn open(store: S, anchor: Anchor) -> Result<Self> {
        let catalogs = store.load_catalogs()?;
        catalogs.ensure_anchor(anchor)?;
        let relation = hydrate(&store, anchor)?;

        Ok(Self {
            store,
            anchor,
            catalogs,
            snapshot: relation.clone(),
            relation,
            hydrated_at: Utc::now(),
            last_saved_at: None,
        })
    }

    pub fn anchor(&self) -> Anchor {
        self.anchor
    }

    pub fn catalogs(&self) -> &Catalogs {
        &self.catalogs
    }

    pub fn relation(&self) -> &TargetingRelation {
        &self.relation
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn hydrated_at(&self) -> DateTime<Utc> {
        self.hydrated_at
    }

    pub fn last_saved_at(&self) -> Option<DateTime<Utc>> {
        self.last_saved_at
    }

    /// True when the relation differs from the last hydrated or saved state.
    pub fn is_dirty(&self) -> bool {
        self.relation != self.snapshot
    }

    /// Apply one edit.
    pub fn apply(&mut self, change: &RelationEdit) -> CmdResult {
        let mut result = edit::run(&self.relation, change, self.anchor.counterpart_kind());
        tracing::debug!(anchor = %self.anchor, ?change, changed = result.changed, "applied edit");
        if result.changed {
            self.relation = result.relation.clone();
        }
        result.relation = self.relation.clone();
        result
    }

    /// Apply edits in order, collecting their messages.
    pub fn apply_all(&mut self, edits: &[RelationEdit]) -> Vec<CmdMessage> {
        edits
            .iter()
            .flat_map(|e| self.apply(e).messages)
            .collect()
    }

    /// Flush the relation to the store.
    pub fn save(&mut self) -> Result<Vec<CmdMessage>> {
        if !self.is_dirty() {
            return Ok(vec![CmdMessage::info("No changes to save")]);
        }

        let edges = self.relation.to_persisted();
        if let Err(e) = self.store.save_relation(self.anchor, &edges) {
            tracing::warn!(anchor = %self.anchor, error = %e, "save failed, keeping edits");
            return Err(e);
        }

        self.snapshot = self.relation.clone();
        self.last_saved_at = Some(Utc::now());
        tracing::info!(anchor = %self.anchor, edges = edges.len(), "saved relation");
        Ok(vec![CmdMessage::success(format!(
            "Saved {} targeted {}(s) for {}",
            edges.len(),
            self.anchor.counterpart_kind().label(),
            self.anchor
        ))])
    }

    /// Discard unsaved edits.
    pub fn cancel(&mut self) {
        if self.is_dirty() {
            tracing::info!(anchor = %self.anchor, "discarding unsaved edits");
        }
        self.relation = self.snapshot.clone();
    }

    /// Re-hydrate from the store, dropping unsaved edits.
    pub fn reload(&mut self) -> Result<()> {
        let relation = hydrate(&self.store, self.anchor)?;
        self.snapshot = relation.clone();
        self.relation = relation;
        self.hydrated_at = Utc::now();
        Ok(())
    }

    /// Picker over the counterpart catalog, seeded the way a bulk-add dialog is.
    ///
    /// A campaign anchor with rules of its own seeds from them; otherwise
    /// `fallback` is used.
    pub fn seeded_selector(&self, fallback: &RuleSet) -> CounterpartSelector<'_> {
        match self.anchor {
            Anchor::Campaign(id) => match self.catalogs.campaign(id) {
                Some(campaign) if !campaign.rules.is_unrestricted() => CounterpartSelector::Restaurants(
                    CandidateSelector::for_campaign(&self.catalogs.restaurants, campaign),
                ),
                _ => self.selector(fallback.clone()),
            },
            Anchor::Restaurant(_) => self.selector(fallback.clone()),
        }
    }

    /// Picker over the counterpart catalog with explicit rules.
    pub fn selector(&self, rules: RuleSet) -> CounterpartSelector<'_> {
        CounterpartSelector::new(&self.catalogs, self.anchor.counterpart_kind(), rules)
    }

    /// Rules a bulk-add picker starts with.
    pub fn seed_rules(&self, fallback: &RuleSet) -> RuleSet {
        self.seeded_selector(fallback).rules().clone()
    }

    /// Untargeted counterparts the selector admits (bulk-add picker).
    pub fn candidates(&self, selector: &mut CounterpartSelector<'_>) -> Vec<CandidateRow> {
        selector.set_exclude_ids(self.relation.targeted_ids());
        selector.rows()
    }

    /// All counterparts the selector admits, targeted or not (table view).
    pub fn visible(&self, selector: &mut CounterpartSelector<'_>) -> Vec<CandidateRow> {
        selector.set_exclude_ids(BTreeSet::new());
        selector.rows()
    }

    pub fn visible_summary(&self, selector: &mut CounterpartSelector<'_>) -> SelectionSummary {
        let ids = ids_of(&self.visible(selector));
        selection_summary(&self.relation, &ids)
    }

    /// Select-all over the counterparts visible under `rules` and `search`.
    pub fn toggle_all_visible(&mut self, rules: &RuleSet, search: &str) -> CmdResult {
        let ids = {
            let mut selector = self.selector(rules.clone());
            selector.set_search(search);
            ids_of(&self.visible(&mut selector))
        };
        self.apply(&RelationEdit::ToggleAll { ids })
    }

    /// Target every current bulk-add candidate.
    pub fn add_all_candidates(&mut self, rules: &RuleSet, search: &str) -> CmdResult {
        let ids = {
            let mut selector = self.selector(rules.clone());
            selector.set_search(search);
            ids_of(&self.candidates(&mut selector))
        };
        self.apply(&RelationEdit::BulkAdd { ids })
    }
}

fn hydrate<S: RelationStore>(store: &S, anchor: Anchor) -> Result<TargetingRelation> {
    let (relation, dropped) = TargetingRelation::hydrate(store.load_relation(anchor)?);
    if dropped > 0 {
        tracing::warn!(%anchor, dropped, "dropped duplicate entries while hydrating");
    }
    tracing::debug!(%anchor, edges = relation.len(), "hydrated relation");
    Ok(relation)
}

fn ids_of(rows: &[CandidateRow]) -> Vec<EntityId> {
    rows.iter().map(|r| r.id).collect()
}
