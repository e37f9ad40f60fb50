//! # CampaignFlow
//!
//! Kanban board core for influencer marketing campaigns.
//!
//! This library provides:
//! - A task model with embedded influencer and assignee snapshots
//! - A pluggable task store (in-memory mock or Supabase)
//! - A pure filter engine for the board view
//! - A board reconciler that applies drag-and-drop moves optimistically and
//!   persists only the statuses that actually changed
//!
//! ## Architecture
//!
//! ```text
//!        ┌──────────────────────────────────┐
//!        │              Board               │
//!        │ (authoritative list, reconciler) │
//!        └───────┬──────────────────┬───────┘
//!                │                  │
//!                ▼                  ▼
//!       ┌─────────────────┐  ┌─────────────┐
//!       │  dyn TaskStore  │  │   filter    │
//!       │ memory/supabase │  │ (pure view) │
//!       └─────────────────┘  └─────────────┘
//! ```
//!
//! ## Move Flow
//! 1. Presentation layer reports a [`board::DropEvent`]
//! 2. The card's status changes locally right away
//! 3. Each task whose status differs from what the store knows gets one write
//! 4. Failures become notifications; the card stays where it was dropped
//!
//! ## Modules
//! - `task`: Task, Influencer, Assignee, Status and patch types
//! - `store`: TaskStore trait and its backends
//! - `filter`: FilterCriteria and assignee derivation
//! - `board`: Board reconciler, columns and notifications
//! - `format`: Due-date labels and initials for cards
//! - `config`: Backend selection and connection settings

pub mod board;
pub mod config;
pub mod filter;
pub mod format;
pub mod store;
pub mod task;

pub use board::{Board, BoardError, DropEvent, Location, Notification};
pub use config::Config;
pub use filter::FilterCriteria;
pub use store::{StoreError, TaskStore};
pub use task::{Status, Task, TaskId, TaskInput, TaskPatch};
