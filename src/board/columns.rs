//! Grouping of tasks into workflow columns.

use serde::Serialize;

use crate::task::{Status, Task};

/// One workflow column and its cards, in collection order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Column {
    pub status: Status,
    pub tasks: Vec<Task>,
}

impl Column {
    pub fn title(&self) -> &str {
        self.status.as_str()
    }
}

/// The four workflow columns plus a bucket for unrecognized statuses.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoardColumns {
    pub columns: Vec<Column>,
    pub unknown: Vec<Task>,
}

impl BoardColumns {
    pub fn group<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> Self {
        let mut columns: Vec<Column> = Status::COLUMNS
            .iter()
            .map(|status| Column {
                status: status.clone(),
                tasks: Vec::new(),
            })
            .collect();
        let mut unknown = Vec::new();

        for task in tasks {
            match columns.iter_mut().find(|c| c.status == task.status) {
                Some(column) => column.tasks.push(task.clone()),
                None => unknown.push(task.clone()),
            }
        }

        Self { columns, unknown }
    }

    pub fn column(&self, status: &Status) -> Option<&Column> {
        self.columns.iter().find(|c| &c.status == status)
    }

    pub fn total(&self) -> usize {
        self.columns.iter().map(|c| c.tasks.len()).sum::<usize>() + self.unknown.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::sample::sample_tasks;

    #[test]
    fn test_group_keeps_workflow_order() {
        let tasks = sample_tasks();
        let grouped = BoardColumns::group(&tasks);
        let titles: Vec<_> = grouped.columns.iter().map(|c| c.title()).collect();
        assert_eq!(
            titles,
            vec!["Backlog", "In Progress", "Awaiting Approval", "Done"]
        );
        assert_eq!(grouped.total(), tasks.len());
        assert!(grouped.unknown.is_empty());
    }

    #[test]
    fn test_unknown_status_lands_in_unknown_bucket() {
        let mut tasks = sample_tasks();
        tasks[0].status = Status::from("Archived");
        let grouped = BoardColumns::group(&tasks);
        assert_eq!(grouped.unknown.len(), 1);
        assert_eq!(grouped.unknown[0].id, tasks[0].id);
        assert_eq!(grouped.total(), tasks.len());
    }

    #[test]
    fn test_column_preserves_collection_order() {
        let tasks = sample_tasks();
        let grouped = BoardColumns::group(&tasks);
        let backlog = grouped.column(&Status::Backlog).unwrap();
        let ids: Vec<_> = backlog.tasks.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["task-1", "task-5"]);
    }
}
