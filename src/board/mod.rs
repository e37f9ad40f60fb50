//! Board module - the reconciler that owns the task list shown on the board.
//!
//! The board holds the canonical in-memory collection and mediates every
//! mutation:
//! - create/update/delete wait for the store and only then touch local state
//! - drag-and-drop moves are applied locally first, then persisted per task
//! - every status-affecting call carries a per-task sequence number, and only
//!   the response to the latest one is applied (last issued wins)
//!
//! Store failures never propagate as panics; they become [`Notification`]s
//! and leave the collection structurally intact.
//!
//! ```text
//!   TaskStore ──load──▶ Board (authoritative) ──filter──▶ view
//!       ▲                    │
//!       └──── persist ◀──────┘◀── drop / form intents
//! ```

mod columns;
mod error;
mod notify;

pub use columns::{BoardColumns, Column};
pub use error::{BoardError, BoardResult};
pub use notify::{BoardAction, Notification, NotificationLevel, NotificationReceiver};

use futures::future::join_all;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;

use crate::filter::{distinct_assignees, filter_tasks, FilterCriteria};
use crate::store::{validate_input, StoreError, StoreResult, TaskStore};
use crate::task::{Assignee, Status, Task, TaskId, TaskInput, TaskPatch};
use notify::Notifier;

/// Lifecycle of the board's task list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoardPhase {
    #[default]
    Loading,
    Ready,
}

/// A card position: column plus index within that column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub column: Status,
    pub index: usize,
}

impl Location {
    pub fn new(column: Status, index: usize) -> Self {
        Self { column, index }
    }
}

/// End of a drag gesture as reported by the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropEvent {
    pub task_id: TaskId,
    pub source: Location,
    /// `None` when the card was dropped outside any column
    pub destination: Option<Location>,
}

/// A status write the board decided to send to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusChange {
    pub task_id: TaskId,
    pub status: Status,
    seq: u64,
}

/// Outcome of persisting a batch of status changes.
#[derive(Debug, Default)]
pub struct SyncReport {
    /// Confirmed by the store and applied locally
    pub confirmed: Vec<TaskId>,
    /// Confirmed, but a newer write for the task had been issued meanwhile
    pub superseded: Vec<TaskId>,
    /// Rejected by the store; local state kept as moved
    pub failed: Vec<(TaskId, StoreError)>,
    /// Abandoned because the board was closed
    pub cancelled: Vec<TaskId>,
}

impl SyncReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty() && self.cancelled.is_empty()
    }
}

enum SyncOutcome {
    Confirmed,
    Superseded,
    Failed(StoreError),
    Cancelled,
}

#[derive(Debug, Default)]
struct BoardState {
    phase: BoardPhase,
    tasks: Vec<Task>,
    /// Last status the store confirmed, or that was already sent to it
    known_status: HashMap<TaskId, Status>,
    /// Sequence number of the newest status-affecting call per task
    latest_seq: HashMap<TaskId, u64>,
    /// Status-affecting calls still waiting for a response, by sequence
    pending: HashMap<u64, TaskId>,
    next_seq: u64,
}

impl BoardState {
    fn position(&self, id: &TaskId) -> Option<usize> {
        self.tasks.iter().position(|t| &t.id == id)
    }

    fn issue(&mut self, id: &TaskId) -> u64 {
        self.next_seq += 1;
        self.latest_seq.insert(id.clone(), self.next_seq);
        self.pending.insert(self.next_seq, id.clone());
        self.next_seq
    }

    /// Mark a status-affecting call as answered, whatever the outcome.
    fn settle(&mut self, seq: u64) {
        self.pending.remove(&seq);
    }

    fn has_pending(&self, id: &TaskId) -> bool {
        self.pending.values().any(|pending| pending == id)
    }

    fn is_latest(&self, id: &TaskId, seq: u64) -> bool {
        self.latest_seq.get(id) == Some(&seq)
    }

    /// Replace the whole collection, keeping the first task for any repeated id.
    fn replace(&mut self, tasks: Vec<Task>) -> usize {
        self.tasks.clear();
        self.known_status.clear();
        // Drops any in-flight response from before the snapshot
        self.latest_seq.clear();
        self.pending.clear();

        for task in tasks {
            if self.known_status.contains_key(&task.id) {
                tracing::warn!(task_id = %task.id, "Duplicate task id in load, keeping first");
                continue;
            }
            self.known_status.insert(task.id.clone(), task.status.clone());
            self.tasks.push(task);
        }
        self.tasks.len()
    }

    fn upsert(&mut self, task: Task) {
        self.known_status.insert(task.id.clone(), task.status.clone());
        match self.position(&task.id) {
            Some(index) => {
                tracing::warn!(task_id = %task.id, "Store returned an id already on the board");
                self.tasks[index] = task;
            }
            None => self.tasks.push(task),
        }
    }

    fn remove(&mut self, id: &TaskId) -> Option<Task> {
        self.known_status.remove(id);
        self.latest_seq.remove(id);
        self.pending.retain(|_, pending| pending != id);
        self.position(id).map(|index| self.tasks.remove(index))
    }

    /// Issue a status write for every task whose local status differs
    /// from the last status known to the store.
    fn diff_statuses(&mut self) -> Vec<StatusChange> {
        let deltas: Vec<(TaskId, Status)> = self
            .tasks
            .iter()
            .filter(|t| self.known_status.get(&t.id) != Some(&t.status))
            .map(|t| (t.id.clone(), t.status.clone()))
            .collect();

        deltas
            .into_iter()
            .map(|(task_id, status)| {
                let seq = self.issue(&task_id);
                self.known_status.insert(task_id.clone(), status.clone());
                StatusChange {
                    task_id,
                    status,
                    seq,
                }
            })
            .collect()
    }
}

/// Handle to a board. Clones share the same state.
#[derive(Clone)]
pub struct Board {
    store: Arc<dyn TaskStore>,
    state: Arc<RwLock<BoardState>>,
    notifier: Notifier,
    cancel: CancellationToken,
}

impl std::fmt::Debug for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Board")
            .field("closed", &self.cancel.is_cancelled())
            .finish_non_exhaustive()
    }
}

impl Board {
    /// Create a board over `store`, returning the notification stream.
    pub fn new(store: Arc<dyn TaskStore>) -> (Self, NotificationReceiver) {
        let (notifier, rx) = Notifier::channel();
        let board = Self {
            store,
            state: Arc::new(RwLock::new(BoardState::default())),
            notifier,
            cancel: CancellationToken::new(),
        };
        (board, rx)
    }

    // ==================== Lifecycle ====================

    /// Fetch the task list and enter `Ready`.
    ///
    /// A failed fetch still leaves the board `Ready`, empty, with an error
    /// notification; the error is returned for the caller's information.
    pub async fn load(&self) -> BoardResult<usize> {
        self.ensure_open()?;
        self.state.write().await.phase = BoardPhase::Loading;

        let result = self.until_closed(self.store.list_tasks()).await?;

        let mut state = self.state.write().await;
        self.ensure_open()?;
        state.phase = BoardPhase::Ready;
        match result {
            Ok(tasks) => {
                let count = state.replace(tasks);
                drop(state);
                tracing::info!(count, "Board loaded");
                Ok(count)
            }
            Err(err) => {
                state.replace(Vec::new());
                drop(state);
                tracing::warn!(error = %err, "Failed to load tasks, showing empty board");
                self.notifier
                    .error(BoardAction::Load, "Failed to load tasks", None);
                Err(BoardError::Store(err))
            }
        }
    }

    /// Abandon in-flight store calls. Late responses are never applied.
    pub fn close(&self) {
        self.cancel.cancel();
    }

    pub fn is_closed(&self) -> bool {
        self.cancel.is_cancelled()
    }

    // ==================== Views ====================

    pub async fn phase(&self) -> BoardPhase {
        self.state.read().await.phase
    }

    /// Snapshot of the full collection.
    pub async fn tasks(&self) -> Vec<Task> {
        self.state.read().await.tasks.clone()
    }

    /// Local record for one task, as used to pre-fill the edit form.
    pub async fn task(&self, id: &TaskId) -> Option<Task> {
        let state = self.state.read().await;
        state.position(id).map(|index| state.tasks[index].clone())
    }

    pub async fn visible(&self, criteria: &FilterCriteria) -> Vec<Task> {
        let state = self.state.read().await;
        filter_tasks(&state.tasks, criteria)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Visible tasks grouped into workflow columns.
    pub async fn columns(&self, criteria: &FilterCriteria) -> BoardColumns {
        let state = self.state.read().await;
        BoardColumns::group(filter_tasks(&state.tasks, criteria))
    }

    /// Assignee options for the filter bar.
    pub async fn assignees(&self) -> Vec<Assignee> {
        distinct_assignees(&self.state.read().await.tasks)
    }

    // ==================== Form mutations ====================

    /// Create a task from a submitted draft. Nothing is inserted until the
    /// store returns the stored record.
    pub async fn create(&self, input: TaskInput) -> BoardResult<Task> {
        self.ensure_ready().await?;
        if let Err(err) = validate_input(&input) {
            self.notifier.error(
                BoardAction::Create,
                "Please fill in all required fields",
                None,
            );
            return Err(BoardError::Invalid(err));
        }

        match self.until_closed(self.store.create_task(input)).await? {
            Ok(task) => {
                let mut state = self.state.write().await;
                self.ensure_open()?;
                state.upsert(task.clone());
                drop(state);
                tracing::info!(task_id = %task.id, "Task created");
                self.notifier.success(
                    BoardAction::Create,
                    "Task created successfully",
                    Some(&task.id),
                );
                Ok(task)
            }
            Err(err) => {
                tracing::warn!(error = %err, "Failed to create task");
                self.notifier
                    .error(BoardAction::Create, "Failed to create task", None);
                Err(BoardError::Store(err))
            }
        }
    }

    /// Apply an edit-form patch and replace the local record with the
    /// store's copy.
    ///
    /// Only a patch that sets `status` takes part in status ordering. Any
    /// other patch keeps the local column while a status write for the task
    /// is still in flight, and takes the store's column otherwise.
    pub async fn update(&self, id: &TaskId, patch: TaskPatch) -> BoardResult<Task> {
        self.ensure_ready().await?;
        let seq = match patch.status {
            Some(_) => Some(self.state.write().await.issue(id)),
            None => None,
        };

        let result = self.until_closed(self.store.update_task(id, patch)).await?;
        let mut state = self.state.write().await;
        if let Some(seq) = seq {
            state.settle(seq);
        }

        match result {
            Ok(task) => {
                self.ensure_open()?;
                let adopt = match seq {
                    Some(seq) => state.is_latest(id, seq),
                    None => !state.has_pending(id),
                };
                if let Some(index) = state.position(id) {
                    if adopt {
                        state.known_status.insert(id.clone(), task.status.clone());
                        state.tasks[index] = task.clone();
                    } else {
                        // Column is owned by the newest status write.
                        let status = state.tasks[index].status.clone();
                        state.tasks[index] = Task {
                            status,
                            ..task.clone()
                        };
                    }
                }
                drop(state);
                tracing::info!(task_id = %id, adopt, "Task updated");
                self.notifier.success(
                    BoardAction::Update,
                    "Task updated successfully",
                    Some(id),
                );
                Ok(task)
            }
            Err(err) => {
                drop(state);
                tracing::warn!(task_id = %id, error = %err, "Failed to update task");
                self.notifier
                    .error(BoardAction::Update, "Failed to update task", Some(id));
                Err(BoardError::Store(err))
            }
        }
    }

    pub async fn delete(&self, id: &TaskId) -> BoardResult<()> {
        self.ensure_ready().await?;

        match self.until_closed(self.store.delete_task(id)).await? {
            Ok(()) => {
                let mut state = self.state.write().await;
                self.ensure_open()?;
                state.remove(id);
                drop(state);
                tracing::info!(task_id = %id, "Task deleted");
                self.notifier
                    .success(BoardAction::Delete, "Task deleted successfully", Some(id));
                Ok(())
            }
            Err(err) => {
                tracing::warn!(task_id = %id, error = %err, "Failed to delete task");
                self.notifier
                    .error(BoardAction::Delete, "Failed to delete task", Some(id));
                Err(BoardError::Store(err))
            }
        }
    }

    // ==================== Drag and drop ====================

    /// Handle a drop: apply it locally, then persist every status delta.
    pub async fn move_task(&self, event: DropEvent) -> BoardResult<SyncReport> {
        let changes = self.apply_drop(&event).await?;
        Ok(self.persist_status_changes(changes).await)
    }

    /// Apply a drop to the local collection without waiting on the store.
    ///
    /// Returns the status writes to send; empty when the drop is a no-op.
    pub async fn apply_drop(&self, event: &DropEvent) -> BoardResult<Vec<StatusChange>> {
        self.ensure_ready().await?;

        let Some(destination) = &event.destination else {
            tracing::debug!(task_id = %event.task_id, "Dropped outside any column");
            return Ok(Vec::new());
        };
        if destination == &event.source {
            return Ok(Vec::new());
        }
        if !destination.column.is_known() {
            tracing::warn!(
                task_id = %event.task_id,
                column = %destination.column,
                "Ignoring drop onto unknown column"
            );
            return Ok(Vec::new());
        }

        let mut state = self.state.write().await;
        let Some(index) = state.position(&event.task_id) else {
            tracing::warn!(task_id = %event.task_id, "Dropped task is not on the board");
            return Ok(Vec::new());
        };
        if state.tasks[index].status != destination.column {
            state.tasks[index].status = destination.column.clone();
        }

        let changes = state.diff_statuses();
        tracing::debug!(
            task_id = %event.task_id,
            column = %destination.column,
            writes = changes.len(),
            "Applied drop"
        );
        Ok(changes)
    }

    /// Send status writes concurrently. Failures are reported per task and
    /// never roll back the local move.
    pub async fn persist_status_changes(&self, changes: Vec<StatusChange>) -> SyncReport {
        let outcomes = join_all(changes.into_iter().map(|change| async move {
            let outcome = self.persist_one(&change).await;
            (change.task_id, outcome)
        }))
        .await;

        let mut report = SyncReport::default();
        for (task_id, outcome) in outcomes {
            match outcome {
                SyncOutcome::Confirmed => report.confirmed.push(task_id),
                SyncOutcome::Superseded => report.superseded.push(task_id),
                SyncOutcome::Failed(err) => report.failed.push((task_id, err)),
                SyncOutcome::Cancelled => report.cancelled.push(task_id),
            }
        }
        report
    }

    async fn persist_one(&self, change: &StatusChange) -> SyncOutcome {
        let result = self
            .until_closed(
                self.store
                    .update_task_status(&change.task_id, change.status.clone()),
            )
            .await;

        let Ok(result) = result else {
            return SyncOutcome::Cancelled;
        };
        let mut state = self.state.write().await;
        state.settle(change.seq);

        let task = match result {
            Err(err) => {
                drop(state);
                tracing::warn!(
                    task_id = %change.task_id,
                    status = %change.status,
                    error = %err,
                    "Failed to persist status change"
                );
                self.notifier.error(
                    BoardAction::StatusChange,
                    "Failed to update task status",
                    Some(&change.task_id),
                );
                return SyncOutcome::Failed(err);
            }
            Ok(task) => task,
        };

        if self.is_closed() {
            return SyncOutcome::Cancelled;
        }
        if !state.is_latest(&change.task_id, change.seq) {
            tracing::debug!(
                task_id = %change.task_id,
                seq = change.seq,
                "Discarding superseded status response"
            );
            return SyncOutcome::Superseded;
        }
        if let Some(index) = state.position(&change.task_id) {
            state
                .known_status
                .insert(change.task_id.clone(), task.status.clone());
            state.tasks[index] = task;
        }
        SyncOutcome::Confirmed
    }

    // ==================== Helpers ====================

    fn ensure_open(&self) -> BoardResult<()> {
        if self.is_closed() {
            return Err(BoardError::Closed);
        }
        Ok(())
    }

    async fn ensure_ready(&self) -> BoardResult<()> {
        self.ensure_open()?;
        match self.phase().await {
            BoardPhase::Ready => Ok(()),
            BoardPhase::Loading => Err(BoardError::NotReady),
        }
    }

    /// Run a store call unless the board is closed first.
    async fn until_closed<T>(
        &self,
        call: impl Future<Output = StoreResult<T>>,
    ) -> BoardResult<StoreResult<T>> {
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(BoardError::Closed),
            result = call => Ok(result),
        }
    }
}
