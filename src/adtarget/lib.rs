//! # Adtarget Architecture
//!
//! Adtarget is the **campaign targeting engine** of a restaurant advertising
//! console. It decides which restaurant/campaign pairs are targeted, which
//! placements (display slots) are enabled on each pair, and which schedules
//! apply to each enabled slot. It is a library first; the bundled CLI is one
//! host among many.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI (args.rs, wired by main.rs)                            │
//! │  - Parses arguments, prints relations and candidates        │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Session (session.rs)                                       │
//! │  - Owns one anchor's relation while it is being edited      │
//! │  - Hydrate, apply edits, save, cancel                       │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Relation Editor (commands/) and Selector (selector.rs)     │
//! │  - Pure functions over TargetingRelation and catalogs       │
//! │  - No I/O, no failure modes                                 │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage (store/)                                           │
//! │  - RelationStore trait: catalogs + persisted edge lists     │
//! │  - FileStore (CLI), InMemoryStore (testing)                 │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Data Flow
//!
//! Catalogs → attribute filter → candidate selector → relation editor →
//! targeting relation → persisted by the store.
//!
//! ## Key Principle: No I/O Assumptions in Core
//!
//! From `session.rs` inward, code returns regular Rust types, never writes to
//! stdout/stderr and never exits the process. Diagnostics go through
//! `tracing`; the host decides whether and where they are printed.
//!
//! ## Testing Strategy
//!
//! 1. **Commands and selector**: unit tests next to each operation. This is
//!    where most behavior is pinned down.
//! 2. **Session**: lifecycle tests against `InMemoryStore` (dirty tracking,
//!    failed saves, cancel).
//! 3. **Properties** (`tests/properties.rs`): self-inverse and idempotence
//!    laws of the editor, checked with `proptest`.
//! 4. **CLI** (`tests/cli.rs`): end-to-end runs of the binary on a temp data dir.
//!
//! ## Module Overview
//!
//! - [`model`]: Catalog types (`Restaurant`, `Campaign`, `Schedule`, ...) and `Anchor`
//! - [`attributes`]: `RuleSet` and the attribute filter
//! - [`selector`]: Candidate selection for pickers
//! - [`relation`]: `TargetingRelation`, `TargetEdge`, the persisted edge shape
//! - [`commands`]: Relation Editor operations and read projections
//! - [`session`]: Editing session lifecycle
//! - [`store`]: Storage abstraction and implementations
//! - [`config`]: Configuration management
//! - [`error`]: Error types

pub mod attributes;
pub mod commands;
pub mod config;
pub mod error;
pub mod model;
pub mod relation;
pub mod selector;
pub mod session;
pub mod store;
