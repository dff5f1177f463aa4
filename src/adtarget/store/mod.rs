//! # Storage Layer
//!
//! The targeting core does not persist anything itself. The [`RelationStore`]
//! trait is the seam to the persistence collaborator: it supplies reference
//! catalogs and exchanges each anchor's relation in the persisted edge-list
//! shape ([`PersistedEdge`]).
//!
//! ## Implementations
//!
//! - [`fs::FileStore`]: JSON files under a data directory (used by the CLI)
//! - [`memory::InMemoryStore`]: no persistence, for tests and embedding
//!
//! ## Storage Format
//!
//! For `FileStore`:
//! ```text
//! <data-dir>/
//! ├── catalogs.json                 # reference catalogs
//! ├── config.json                   # TargetingConfig
//! └── relations/
//!     ├── campaign-7.json           # edge list for anchor campaign:7
//!     └── restaurant-12.json
//! ```
//!
//! Conflict detection between concurrent sessions is the collaborator's
//! business; neither implementation attempts it.

use crate::error::Result;
use crate::model::{Anchor, Catalogs};
use crate::relation::PersistedEdge;

pub mod fs;
pub mod memory;

/// Abstract interface to the persistence collaborator.
pub trait RelationStore {
    /// Load all reference catalogs.
    fn load_catalogs(&self) -> Result<Catalogs>;

    /// Load the persisted relation of an anchor. Unknown anchors yield an empty list.
    fn load_relation(&self, anchor: Anchor) -> Result<Vec<PersistedEdge>>;

    /// Replace the persisted relation of an anchor.
    fn save_relation(&mut self, anchor: Anchor, edges: &[PersistedEdge]) -> Result<()>;
}
