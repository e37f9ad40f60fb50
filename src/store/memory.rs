//! Ephemeral in-memory task store.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{sample, validate_input, StoreError, StoreResult, TaskStore};
use crate::task::{Task, TaskId, TaskInput, TaskPatch};

/// Process-local store backed by an ordered list.
///
/// Clones share the same backing list.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskStore {
    tasks: Arc<RwLock<Vec<Task>>>,
    latency: Duration,
}

impl InMemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with the sample campaign.
    pub fn with_sample_data() -> Self {
        Self::with_tasks(sample::sample_tasks())
    }

    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        Self {
            tasks: Arc::new(RwLock::new(tasks)),
            latency: Duration::ZERO,
        }
    }

    /// Delay every call by `latency` to mimic a network round trip.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }

    fn fresh_id(tasks: &[Task]) -> TaskId {
        loop {
            let id = TaskId::new(format!("task-{}", Uuid::new_v4()));
            if !tasks.iter().any(|t| t.id == id) {
                return id;
            }
        }
    }
}

#[async_trait]
impl TaskStore for InMemoryTaskStore {
    async fn list_tasks(&self) -> StoreResult<Vec<Task>> {
        self.simulate_latency().await;
        Ok(self.tasks.read().await.clone())
    }

    async fn create_task(&self, input: TaskInput) -> StoreResult<Task> {
        self.simulate_latency().await;
        validate_input(&input)?;

        let mut tasks = self.tasks.write().await;
        let task = Task::from_input(Self::fresh_id(&tasks), input);
        tasks.push(task.clone());
        tracing::debug!(task_id = %task.id, "Created task in memory");
        Ok(task)
    }

    async fn update_task(&self, id: &TaskId, patch: TaskPatch) -> StoreResult<Task> {
        self.simulate_latency().await;
        if matches!(patch.title.as_deref(), Some(title) if title.trim().is_empty()) {
            return Err(StoreError::validation("title", "must not be empty"));
        }

        let mut tasks = self.tasks.write().await;
        let task = tasks
            .iter_mut()
            .find(|t| &t.id == id)
            .ok_or_else(|| StoreError::not_found(id.as_str()))?;
        task.apply_patch(patch);
        Ok(task.clone())
    }

    async fn delete_task(&self, id: &TaskId) -> StoreResult<()> {
        self.simulate_latency().await;
        let mut tasks = self.tasks.write().await;
        let index = tasks
            .iter()
            .position(|t| &t.id == id)
            .ok_or_else(|| StoreError::not_found(id.as_str()))?;
        tasks.remove(index);
        tracing::debug!(task_id = %id, "Deleted task from memory");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::{Influencer, Platform, Status};

    fn draft(title: &str) -> TaskInput {
        TaskInput::new(
            title,
            Influencer {
                id: "inf-1".to_string(),
                handle: "@maya".to_string(),
                name: "Maya".to_string(),
                platform: Platform::Instagram,
                avatar_url: None,
            },
        )
    }

    #[tokio::test]
    async fn test_crud_lifecycle() {
        let store = InMemoryTaskStore::new();

        let created = store.create_task(draft("Spring reel")).await.unwrap();
        assert!(created.id.as_str().starts_with("task-"));
        assert_eq!(store.list_tasks().await.unwrap().len(), 1);

        let updated = store
            .update_task_status(&created.id, Status::Done)
            .await
            .unwrap();
        assert_eq!(updated.status, Status::Done);
        assert_eq!(updated.title, "Spring reel");

        store.delete_task(&created.id).await.unwrap();
        assert!(store.list_tasks().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_ids_are_unique() {
        let store = InMemoryTaskStore::new();
        let a = store.create_task(draft("one")).await.unwrap();
        let b = store.create_task(draft("two")).await.unwrap();
        assert_ne!(a.id, b.id);
    }

    #[tokio::test]
    async fn test_missing_ids_are_not_found() {
        let store = InMemoryTaskStore::new();
        let missing = TaskId::from("nope");

        let err = store
            .update_task(&missing, TaskPatch::status(Status::Done))
            .await
            .unwrap_err();
        assert_eq!(err, StoreError::not_found("nope"));

        let err = store.delete_task(&missing).await.unwrap_err();
        assert_eq!(err, StoreError::not_found("nope"));
    }

    #[tokio::test]
    async fn test_create_validates_payload() {
        let store = InMemoryTaskStore::new();
        let err = store.create_task(draft("")).await.unwrap_err();
        assert!(matches!(err, StoreError::Validation { .. }));
        assert!(store.list_tasks().await.unwrap().is_empty());
    }

    #[test]
    fn test_update_rejects_blank_title() {
        let store = InMemoryTaskStore::new();
        let created = tokio_test::block_on(store.create_task(draft("Unboxing"))).unwrap();

        let patch = TaskPatch {
            title: Some("   ".to_string()),
            ..TaskPatch::default()
        };
        tokio_test::assert_err!(tokio_test::block_on(store.update_task(&created.id, patch)));
        tokio_test::assert_ok!(tokio_test::block_on(
            store.update_task(&created.id, TaskPatch::default())
        ));
    }

    #[tokio::test]
    async fn test_listed_tasks_are_copies() {
        let store = InMemoryTaskStore::new();
        store.create_task(draft("original")).await.unwrap();

        let mut listed = store.list_tasks().await.unwrap();
        listed[0].title = "mutated".to_string();

        assert_eq!(store.list_tasks().await.unwrap()[0].title, "original");
    }

    #[tokio::test(start_paused = true)]
    async fn test_latency_is_applied() {
        let store = InMemoryTaskStore::new().with_latency(Duration::from_millis(300));
        let started = tokio::time::Instant::now();
        store.list_tasks().await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(300));
    }
}
