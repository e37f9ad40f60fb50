//! Value types for campaign tasks.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque task identifier assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TaskId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for TaskId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Social platform an influencer publishes on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Platform {
    Instagram,
    TikTok,
    YouTube,
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Instagram => write!(f, "Instagram"),
            Self::TikTok => write!(f, "TikTok"),
            Self::YouTube => write!(f, "YouTube"),
        }
    }
}

impl std::str::FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "instagram" => Ok(Self::Instagram),
            "tiktok" => Ok(Self::TikTok),
            "youtube" => Ok(Self::YouTube),
            other => Err(format!(
                "unknown platform '{}', expected Instagram, TikTok or YouTube",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => write!(f, "Low"),
            Self::Medium => write!(f, "Medium"),
            Self::High => write!(f, "High"),
        }
    }
}

impl std::str::FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => Err(format!(
                "unknown priority '{}', expected Low, Medium or High",
                other
            )),
        }
    }
}

/// Kind of content the influencer delivers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Deliverable {
    Post,
    Story,
    Reel,
    Short,
}

/// Workflow column a task sits in.
///
/// Values outside the four known columns are kept verbatim as `Unknown`
/// so that a task carrying one still shows up on the board.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Status {
    Backlog,
    InProgress,
    AwaitingApproval,
    Done,
    Unknown(String),
}

impl Status {
    /// The known columns in workflow order.
    pub const COLUMNS: [Status; 4] = [
        Status::Backlog,
        Status::InProgress,
        Status::AwaitingApproval,
        Status::Done,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            Self::Backlog => "Backlog",
            Self::InProgress => "In Progress",
            Self::AwaitingApproval => "Awaiting Approval",
            Self::Done => "Done",
            Self::Unknown(raw) => raw,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown(_))
    }
}

impl From<String> for Status {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "Backlog" => Self::Backlog,
            "In Progress" => Self::InProgress,
            "Awaiting Approval" => Self::AwaitingApproval,
            "Done" => Self::Done,
            _ => Self::Unknown(raw),
        }
    }
}

impl From<&str> for Status {
    fn from(raw: &str) -> Self {
        Self::from(raw.to_string())
    }
}

impl From<Status> for String {
    fn from(status: Status) -> Self {
        match status {
            Status::Unknown(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot of an influencer copied into a task at assignment time.
///
/// Embedded objects are stored as JSON with camelCase keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Influencer {
    pub id: String,
    pub handle: String,
    pub name: String,
    pub platform: Platform,
    #[serde(default, alias = "avatar_url", skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

/// Team member working on a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignee {
    pub id: String,
    pub name: String,
    #[serde(default, alias = "avatar_url", skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskLinks {
    #[serde(default, alias = "brief_url", skip_serializing_if = "Option::is_none")]
    pub brief_url: Option<String>,
    #[serde(default, alias = "assets_url", skip_serializing_if = "Option::is_none")]
    pub assets_url: Option<String>,
}

/// A unit of campaign work shown as a card on the board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub influencer: Influencer,
    pub priority: Priority,
    pub status: Status,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub assignees: Option<Vec<Assignee>>,
    #[serde(default)]
    pub budget: Option<u64>,
    #[serde(default)]
    pub deliverable: Option<Deliverable>,
    #[serde(default)]
    pub links: Option<TaskLinks>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl Task {
    /// Build a stored task from a create payload and the id the store assigned.
    pub fn from_input(id: TaskId, input: TaskInput) -> Self {
        Self {
            id,
            title: input.title,
            influencer: input.influencer,
            priority: input.priority,
            status: input.status,
            due_date: input.due_date,
            assignees: input.assignees,
            budget: input.budget,
            deliverable: input.deliverable,
            links: input.links,
            notes: input.notes,
        }
    }

    pub fn has_assignee(&self, assignee_id: &str) -> bool {
        self.assignees
            .as_ref()
            .is_some_and(|list| list.iter().any(|a| a.id == assignee_id))
    }

    /// Write every field present in `patch` onto this task.
    pub fn apply_patch(&mut self, patch: TaskPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(influencer) = patch.influencer {
            self.influencer = influencer;
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(due_date) = patch.due_date {
            self.due_date = due_date;
        }
        if let Some(assignees) = patch.assignees {
            self.assignees = assignees;
        }
        if let Some(budget) = patch.budget {
            self.budget = budget;
        }
        if let Some(deliverable) = patch.deliverable {
            self.deliverable = deliverable;
        }
        if let Some(links) = patch.links {
            self.links = links;
        }
        if let Some(notes) = patch.notes {
            self.notes = notes;
        }
    }
}

/// Task payload submitted by the create form (everything but the id).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskInput {
    pub title: String,
    pub influencer: Influencer,
    pub priority: Priority,
    pub status: Status,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub assignees: Option<Vec<Assignee>>,
    #[serde(default)]
    pub budget: Option<u64>,
    #[serde(default)]
    pub deliverable: Option<Deliverable>,
    #[serde(default)]
    pub links: Option<TaskLinks>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl TaskInput {
    /// New backlog task with medium priority, the defaults of the create form.
    pub fn new(title: impl Into<String>, influencer: Influencer) -> Self {
        Self {
            title: title.into(),
            influencer,
            priority: Priority::Medium,
            status: Status::Backlog,
            due_date: None,
            assignees: None,
            budget: None,
            deliverable: Some(Deliverable::Post),
            links: None,
            notes: None,
        }
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_status(mut self, status: Status) -> Self {
        self.status = status;
        self
    }

    pub fn with_due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }

    pub fn with_assignees(mut self, assignees: Vec<Assignee>) -> Self {
        self.assignees = Some(assignees);
        self
    }

    pub fn with_budget(mut self, budget: u64) -> Self {
        self.budget = Some(budget);
        self
    }
}

/// Sparse update for a task.
///
/// Outer `None` means the field is absent and left untouched. For nullable
/// fields, `Some(None)` clears the stored value. Serializes to exactly the
/// present fields, cleared ones as `null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TaskPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub influencer: Option<Influencer>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<Option<NaiveDate>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignees: Option<Option<Vec<Assignee>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget: Option<Option<u64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deliverable: Option<Option<Deliverable>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub links: Option<Option<TaskLinks>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<Option<String>>,
}

impl TaskPatch {
    pub fn status(status: Status) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
