//! Filter engine - derives the visible subset of the board.
//!
//! Everything here is pure: inputs are borrowed, outputs preserve input order.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::task::{Assignee, Platform, Priority, Task};

/// A filter dimension that either matches everything or one value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Criterion<T> {
    All,
    Only(T),
}

impl<T> Default for Criterion<T> {
    fn default() -> Self {
        Self::All
    }
}

impl<T> From<Option<T>> for Criterion<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::All, Self::Only)
    }
}

impl<T: PartialEq> Criterion<T> {
    pub fn accepts(&self, value: &T) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => wanted == value,
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }
}

/// Current filter bar state.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub search: String,
    pub priority: Criterion<Priority>,
    pub platform: Criterion<Platform>,
    /// Assignee id
    pub assignee: Criterion<String>,
}

impl FilterCriteria {
    pub fn search(query: impl Into<String>) -> Self {
        Self {
            search: query.into(),
            ..Self::default()
        }
    }

    /// Whether any dimension narrows the board.
    pub fn is_active(&self) -> bool {
        !self.search.trim().is_empty()
            || !self.priority.is_all()
            || !self.platform.is_all()
            || !self.assignee.is_all()
    }

    /// Reset every dimension.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn matches(&self, task: &Task) -> bool {
        self.matcher().matches(task)
    }

    fn matcher(&self) -> Matcher<'_> {
        Matcher {
            needle: self.search.trim().to_lowercase(),
            criteria: self,
        }
    }
}

/// Criteria with the search needle normalized once per pass.
struct Matcher<'a> {
    needle: String,
    criteria: &'a FilterCriteria,
}

impl Matcher<'_> {
    fn matches(&self, task: &Task) -> bool {
        self.matches_search(task)
            && self.criteria.priority.accepts(&task.priority)
            && self.criteria.platform.accepts(&task.influencer.platform)
            && match &self.criteria.assignee {
                Criterion::All => true,
                Criterion::Only(id) => task.has_assignee(id),
            }
    }

    fn matches_search(&self, task: &Task) -> bool {
        self.needle.is_empty()
            || task.title.to_lowercase().contains(&self.needle)
            || task.influencer.handle.to_lowercase().contains(&self.needle)
    }
}

/// Tasks passing `criteria`, in input order.
pub fn filter_tasks<'a>(tasks: &'a [Task], criteria: &FilterCriteria) -> Vec<&'a Task> {
    let matcher = criteria.matcher();
    tasks.iter().filter(|t| matcher.matches(t)).collect()
}

/// Every assignee across `tasks`, deduplicated by id in first-seen order.
pub fn distinct_assignees(tasks: &[Task]) -> Vec<Assignee> {
    let mut seen = HashSet::new();
    tasks
        .iter()
        .filter_map(|t| t.assignees.as_ref())
        .flatten()
        .filter(|a| seen.insert(a.id.clone()))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::{Influencer, Status, TaskId, TaskInput};

    fn person(id: &str, name: &str) -> Assignee {
        Assignee {
            id: id.to_string(),
            name: name.to_string(),
            avatar_url: None,
        }
    }

    fn task(id: &str, title: &str, handle: &str, platform: Platform, priority: Priority) -> Task {
        let influencer = Influencer {
            id: format!("inf-{id}"),
            handle: handle.to_string(),
            name: handle.trim_start_matches('@').to_string(),
            platform,
            avatar_url: None,
        };
        Task::from_input(
            TaskId::from(id),
            TaskInput::new(title, influencer).with_priority(priority),
        )
    }

    fn board() -> Vec<Task> {
        let mut a = task("a", "Skincare launch", "@glow", Platform::Instagram, Priority::High);
        a.assignees = Some(vec![person("u1", "Sam")]);
        let mut b = task("b", "Gym short", "@danny", Platform::TikTok, Priority::Low);
        b.assignees = Some(vec![person("u2", "Jo"), person("u1", "Sam again")]);
        b.status = Status::InProgress;
        let c = task("c", "Unboxing", "@techglow", Platform::YouTube, Priority::High);
        vec![a, b, c]
    }

    fn ids(tasks: &[&Task]) -> Vec<String> {
        tasks.iter().map(|t| t.id.to_string()).collect()
    }

    #[test]
    fn test_default_criteria_is_identity() {
        let tasks = board();
        let visible = filter_tasks(&tasks, &FilterCriteria::default());
        assert_eq!(ids(&visible), vec!["a", "b", "c"]);
        assert!(!FilterCriteria::default().is_active());
    }

    #[test]
    fn test_search_matches_title_or_handle() {
        let tasks = board();
        let visible = filter_tasks(&tasks, &FilterCriteria::search("GLOW"));
        assert_eq!(ids(&visible), vec!["a", "c"]);

        let visible = filter_tasks(&tasks, &FilterCriteria::search("  gym "));
        assert_eq!(ids(&visible), vec!["b"]);

        let visible = filter_tasks(&tasks, &FilterCriteria::search("nothing"));
        assert!(visible.is_empty());
    }

    #[test]
    fn test_whitespace_search_passes_everything() {
        let tasks = board();
        assert_eq!(filter_tasks(&tasks, &FilterCriteria::search("   ")).len(), 3);
    }

    #[test]
    fn test_dimensions_combine() {
        let tasks = board();
        let criteria = FilterCriteria {
            search: "glow".to_string(),
            priority: Criterion::Only(Priority::High),
            platform: Criterion::Only(Platform::YouTube),
            assignee: Criterion::All,
        };
        assert_eq!(ids(&filter_tasks(&tasks, &criteria)), vec!["c"]);
    }

    #[test]
    fn test_assignee_filter_skips_unassigned() {
        let tasks = board();
        let criteria = FilterCriteria {
            assignee: Criterion::Only("u1".to_string()),
            ..FilterCriteria::default()
        };
        assert_eq!(ids(&filter_tasks(&tasks, &criteria)), vec!["a", "b"]);
    }

    #[test]
    fn test_distinct_assignees_first_occurrence() {
        let assignees = distinct_assignees(&board());
        let names: Vec<_> = assignees.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["Sam", "Jo"]);
    }

    #[test]
    fn test_clear_resets_criteria() {
        let mut criteria = FilterCriteria {
            search: "x".to_string(),
            platform: Criterion::Only(Platform::TikTok),
            ..FilterCriteria::default()
        };
        assert!(criteria.is_active());
        criteria.clear();
        assert_eq!(criteria, FilterCriteria::default());
    }
}
