//! Task module - campaign task model shared by the store, filter and board.
//!
//! Influencers and assignees are embedded as value snapshots rather than
//! references, so a task never changes when the source record does.

mod types;

pub use types::{
    Assignee, Deliverable, Influencer, Platform, Priority, Status, Task, TaskId, TaskInput,
    TaskLinks, TaskPatch,
};
