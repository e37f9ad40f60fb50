//! User-facing notifications raised by the board.

use serde::Serialize;
use tokio::sync::mpsc;

use crate::task::TaskId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Success,
    Error,
}

/// The board action a notification reports on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BoardAction {
    Load,
    Create,
    Update,
    Delete,
    StatusChange,
}

impl std::fmt::Display for BoardAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Load => "load",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::StatusChange => "status_change",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub action: BoardAction,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_id: Option<TaskId>,
}

impl Notification {
    pub fn is_error(&self) -> bool {
        self.level == NotificationLevel::Error
    }
}

pub type NotificationReceiver = mpsc::UnboundedReceiver<Notification>;

/// Sending half held by the board. A dropped receiver is not an error.
#[derive(Debug, Clone)]
pub(crate) struct Notifier {
    tx: mpsc::UnboundedSender<Notification>,
}

impl Notifier {
    pub(crate) fn channel() -> (Self, NotificationReceiver) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    pub(crate) fn success(&self, action: BoardAction, message: &str, task_id: Option<&TaskId>) {
        self.send(NotificationLevel::Success, action, message, task_id);
    }

    pub(crate) fn error(&self, action: BoardAction, message: &str, task_id: Option<&TaskId>) {
        self.send(NotificationLevel::Error, action, message, task_id);
    }

    fn send(
        &self,
        level: NotificationLevel,
        action: BoardAction,
        message: &str,
        task_id: Option<&TaskId>,
    ) {
        let notification = Notification {
            level,
            action,
            message: message.to_string(),
            task_id: task_id.cloned(),
        };
        if self.tx.send(notification).is_err() {
            tracing::trace!(%action, "Notification receiver dropped");
        }
    }
}
