//! Supabase-backed task store (PostgREST for rows, GoTrue for the session).

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use super::{validate_input, StoreError, StoreResult, TaskStore};
use crate::task::{Task, TaskId, TaskInput, TaskPatch};

const TASKS_TABLE: &str = "tasks";

/// Access token of the signed-in user, plus the user id once resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupabaseSession {
    pub access_token: String,
    pub user_id: Option<String>,
}

impl SupabaseSession {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            user_id: None,
        }
    }

    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }
}

#[derive(Debug, Deserialize)]
struct AuthUser {
    id: String,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    user: AuthUser,
}

/// Row written on insert: the owning user plus the task payload.
#[derive(Serialize)]
struct InsertRow<'a> {
    user_id: &'a str,
    #[serde(flatten)]
    task: &'a TaskInput,
}

/// Task store over the `tasks` table, scoped to the session's user.
///
/// Every call fails closed with `Unauthenticated` when no session is attached.
pub struct SupabaseTaskStore {
    client: Client,
    url: String,
    anon_key: String,
    session: RwLock<Option<SupabaseSession>>,
}

impl SupabaseTaskStore {
    /// Create a new store for the project at `url`.
    pub fn new(url: &str, anon_key: &str, session: Option<SupabaseSession>) -> Self {
        Self {
            client: Client::new(),
            url: url.trim_end_matches('/').to_string(),
            anon_key: anon_key.to_string(),
            session: RwLock::new(session),
        }
    }

    /// Exchange email and password for a session.
    pub async fn sign_in(
        url: &str,
        anon_key: &str,
        email: &str,
        password: &str,
    ) -> StoreResult<SupabaseSession> {
        let url = url.trim_end_matches('/');
        let resp = Client::new()
            .post(format!("{}/auth/v1/token?grant_type=password", url))
            .header("apikey", anon_key)
            .header("Content-Type", "application/json")
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await?;

        let status = resp.status();
        let text = resp.text().await?;
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "Supabase sign-in rejected");
            // Bad credentials come back as 400
            return Err(match status.as_u16() {
                400 | 401 | 403 => StoreError::Unauthenticated,
                code => StoreError::from_http_status(code, &text, None),
            });
        }

        let token: TokenResponse = serde_json::from_str(&text)?;
        tracing::info!(user_id = %token.user.id, "Signed in to Supabase");
        Ok(SupabaseSession::new(token.access_token).with_user_id(token.user.id))
    }

    /// Attach a session, replacing any previous one.
    pub async fn set_session(&self, session: SupabaseSession) {
        *self.session.write().await = Some(session);
    }

    /// Drop the session; subsequent calls are rejected.
    pub async fn sign_out(&self) {
        *self.session.write().await = None;
    }

    /// Get the PostgREST URL.
    fn rest_url(&self) -> String {
        format!("{}/rest/v1", self.url)
    }

    /// Get the auth URL.
    fn auth_url(&self) -> String {
        format!("{}/auth/v1", self.url)
    }

    fn authorize(&self, req: RequestBuilder, token: &str) -> RequestBuilder {
        req.header("apikey", &self.anon_key)
            .header("Authorization", format!("Bearer {}", token))
    }

    /// Current access token and user id, resolving the id on first use.
    async fn principal(&self) -> StoreResult<(String, String)> {
        let session = self
            .session
            .read()
            .await
            .clone()
            .ok_or(StoreError::Unauthenticated)?;

        if let Some(user_id) = session.user_id {
            return Ok((session.access_token, user_id));
        }

        let user: AuthUser = self
            .send_json(
                self.authorize(
                    self.client.get(format!("{}/user", self.auth_url())),
                    &session.access_token,
                ),
                None,
            )
            .await?;
        tracing::debug!(user_id = %user.id, "Resolved Supabase user");

        let mut guard = self.session.write().await;
        if let Some(current) = guard.as_mut() {
            if current.access_token == session.access_token {
                current.user_id = Some(user.id.clone());
            }
        }
        Ok((session.access_token, user.id))
    }

    fn row_filter(id: &TaskId, user_id: &str) -> String {
        format!(
            "id=eq.{}&user_id=eq.{}",
            urlencoding::encode(id.as_str()),
            urlencoding::encode(user_id)
        )
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        req: RequestBuilder,
        id: Option<&TaskId>,
    ) -> StoreResult<T> {
        let resp = req.send().await?;
        let status = resp.status();
        let text = resp.text().await?;

        if !status.is_success() {
            let err = StoreError::from_http_status(status.as_u16(), &text, id.map(|i| i.as_str()));
            tracing::warn!(status = status.as_u16(), error = %err, "Supabase request failed");
            return Err(err);
        }

        Ok(serde_json::from_str(&text)?)
    }

    async fn fetch_task(&self, id: &TaskId) -> StoreResult<Task> {
        let (token, user_id) = self.principal().await?;
        let req = self.authorize(
            self.client.get(format!(
                "{}/{}?{}",
                self.rest_url(),
                TASKS_TABLE,
                Self::row_filter(id, &user_id)
            )),
            &token,
        );
        let rows: Vec<Task> = self.send_json(req, Some(id)).await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| StoreError::not_found(id.as_str()))
    }
}

#[async_trait]
impl TaskStore for SupabaseTaskStore {
    async fn list_tasks(&self) -> StoreResult<Vec<Task>> {
        let (token, user_id) = self.principal().await?;
        let req = self.authorize(
            self.client.get(format!(
                "{}/{}?user_id=eq.{}&order=created_at.asc",
                self.rest_url(),
                TASKS_TABLE,
                urlencoding::encode(&user_id)
            )),
            &token,
        );
        let tasks: Vec<Task> = self.send_json(req, None).await?;
        tracing::debug!(count = tasks.len(), "Listed tasks from Supabase");
        Ok(tasks)
    }

    async fn create_task(&self, input: TaskInput) -> StoreResult<Task> {
        validate_input(&input)?;
        let (token, user_id) = self.principal().await?;

        let row = InsertRow {
            user_id: &user_id,
            task: &input,
        };
        let req = self.authorize(
            self.client
                .post(format!("{}/{}", self.rest_url(), TASKS_TABLE))
                .header("Content-Type", "application/json")
                .header("Prefer", "return=representation")
                .json(&row),
            &token,
        );

        let rows: Vec<Task> = self.send_json(req, None).await?;
        let task = rows
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::Decode("no task returned".to_string()))?;
        tracing::info!(task_id = %task.id, "Created task in Supabase");
        Ok(task)
    }

    async fn update_task(&self, id: &TaskId, patch: TaskPatch) -> StoreResult<Task> {
        if patch.is_empty() {
            return self.fetch_task(id).await;
        }
        let (token, user_id) = self.principal().await?;

        let req = self.authorize(
            self.client
                .patch(format!(
                    "{}/{}?{}",
                    self.rest_url(),
                    TASKS_TABLE,
                    Self::row_filter(id, &user_id)
                ))
                .header("Content-Type", "application/json")
                .header("Prefer", "return=representation")
                .json(&patch),
            &token,
        );

        let rows: Vec<Task> = self.send_json(req, Some(id)).await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| StoreError::not_found(id.as_str()))
    }

    async fn delete_task(&self, id: &TaskId) -> StoreResult<()> {
        let (token, user_id) = self.principal().await?;

        let req = self.authorize(
            self.client
                .delete(format!(
                    "{}/{}?{}",
                    self.rest_url(),
                    TASKS_TABLE,
                    Self::row_filter(id, &user_id)
                ))
                .header("Prefer", "return=representation"),
            &token,
        );

        let deleted: Vec<serde_json::Value> = self.send_json(req, Some(id)).await?;
        if deleted.is_empty() {
            return Err(StoreError::not_found(id.as_str()));
        }
        tracing::info!(task_id = %id, "Deleted task from Supabase");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::Status;

    #[tokio::test]
    async fn test_calls_without_session_fail_closed() {
        let store = SupabaseTaskStore::new("http://127.0.0.1:9", "anon", None);
        assert_eq!(
            store.list_tasks().await.unwrap_err(),
            StoreError::Unauthenticated
        );
        assert_eq!(
            store
                .update_task_status(&TaskId::from("t1"), Status::Done)
                .await
                .unwrap_err(),
            StoreError::Unauthenticated
        );
        assert_eq!(
            store.delete_task(&TaskId::from("t1")).await.unwrap_err(),
            StoreError::Unauthenticated
        );
    }

    #[test]
    fn test_row_filter_escapes_values() {
        let filter = SupabaseTaskStore::row_filter(&TaskId::from("a&b"), "u 1");
        assert_eq!(filter, "id=eq.a%26b&user_id=eq.u%201");
    }

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let store = SupabaseTaskStore::new("https://proj.supabase.co/", "anon", None);
        assert_eq!(store.rest_url(), "https://proj.supabase.co/rest/v1");
    }
}
