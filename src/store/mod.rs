//! Task store module - the CRUD boundary between the board and persistence.
//!
//! Two interchangeable backends implement [`TaskStore`]:
//! - [`InMemoryTaskStore`]: ephemeral, process-local, optional simulated latency
//! - [`SupabaseTaskStore`]: PostgREST tables scoped to the signed-in user
//!
//! The backend is picked once at startup by [`build_store`] and handed to the
//! board as an `Arc<dyn TaskStore>`.

mod error;
mod memory;
pub mod sample;
mod supabase;

pub use error::StoreError;
pub use memory::InMemoryTaskStore;
pub use supabase::{SupabaseSession, SupabaseTaskStore};

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use crate::config::{Config, DataBackend};
use crate::task::{Status, Task, TaskId, TaskInput, TaskPatch};

/// Result type for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Trait for task persistence backends.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// List every task visible to the current principal, oldest first.
    async fn list_tasks(&self) -> StoreResult<Vec<Task>>;

    /// Persist a new task and return the stored record with its assigned id.
    async fn create_task(&self, input: TaskInput) -> StoreResult<Task>;

    /// Apply a sparse patch. Fields absent from the patch are not written.
    async fn update_task(&self, id: &TaskId, patch: TaskPatch) -> StoreResult<Task>;

    /// Remove a task. Deleting an id that does not exist is `NotFound`.
    async fn delete_task(&self, id: &TaskId) -> StoreResult<()>;

    /// Move a task to another column.
    ///
    /// Default implementation sends a status-only patch via `update_task`.
    async fn update_task_status(&self, id: &TaskId, status: Status) -> StoreResult<Task> {
        self.update_task(id, TaskPatch::status(status)).await
    }
}

/// Check the fields a create payload must carry.
pub fn validate_input(input: &TaskInput) -> StoreResult<()> {
    if input.title.trim().is_empty() {
        return Err(StoreError::validation("title", "must not be empty"));
    }
    if input.influencer.id.trim().is_empty() || input.influencer.handle.trim().is_empty() {
        return Err(StoreError::validation("influencer", "an influencer must be selected"));
    }
    Ok(())
}

/// Construct the backend selected by `config`.
pub async fn build_store(config: &Config) -> anyhow::Result<Arc<dyn TaskStore>> {
    match config.backend {
        DataBackend::Mock => {
            let store = if config.seed_sample_data {
                InMemoryTaskStore::with_sample_data()
            } else {
                InMemoryTaskStore::new()
            };
            let store = store.with_latency(Duration::from_millis(config.mock_latency_ms));
            tracing::info!(
                latency_ms = config.mock_latency_ms,
                seeded = config.seed_sample_data,
                "Using in-memory task store"
            );
            Ok(Arc::new(store))
        }
        DataBackend::Supabase => {
            let supabase = config
                .supabase
                .as_ref()
                .ok_or_else(|| anyhow::anyhow!("DATA_BACKEND=supabase requires Supabase settings"))?;

            let session = match (&supabase.access_token, &supabase.email, &supabase.password) {
                (Some(token), _, _) => Some(SupabaseSession::new(token.clone())),
                (None, Some(email), Some(password)) => Some(
                    SupabaseTaskStore::sign_in(&supabase.url, &supabase.anon_key, email, password)
                        .await?,
                ),
                _ => {
                    tracing::warn!("No Supabase session configured; remote calls will be rejected");
                    None
                }
            };

            tracing::info!(url = %supabase.url, "Using Supabase task store");
            Ok(Arc::new(SupabaseTaskStore::new(
                &supabase.url,
                &supabase.anon_key,
                session,
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::{Influencer, Platform};

    fn input(title: &str, handle: &str) -> TaskInput {
        TaskInput::new(
            title,
            Influencer {
                id: "inf-9".to_string(),
                handle: handle.to_string(),
                name: "Nine".to_string(),
                platform: Platform::YouTube,
                avatar_url: None,
            },
        )
    }

    #[test]
    fn test_validate_rejects_blank_title() {
        let err = validate_input(&input("   ", "@nine")).unwrap_err();
        assert!(matches!(err, StoreError::Validation { ref field, .. } if field == "title"));
    }

    #[test]
    fn test_validate_rejects_missing_influencer() {
        let err = validate_input(&input("Unboxing", "")).unwrap_err();
        assert!(matches!(err, StoreError::Validation { ref field, .. } if field == "influencer"));
    }

    #[test]
    fn test_validate_accepts_complete_input() {
        assert!(validate_input(&input("Unboxing", "@nine")).is_ok());
    }

    #[tokio::test]
    async fn test_build_store_mock_backend() {
        let config = Config {
            seed_sample_data: false,
            ..Config::default()
        };
        let store = build_store(&config).await.unwrap();
        assert!(store.list_tasks().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_build_store_supabase_requires_settings() {
        let config = Config {
            backend: DataBackend::Supabase,
            supabase: None,
            ..Config::default()
        };
        assert!(build_store(&config).await.is_err());
    }
}
