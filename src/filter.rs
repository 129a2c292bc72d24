//! Filter engine over task lists.
//!
//! Two independent predicates (status, priority) combined by AND; "all"
//! disables a predicate. Counts are always computed over the unfiltered
//! list so the filter bar can show totals regardless of the active view.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::task::{Priority, Status, Task};

/// Status predicate: everything, or one status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(Status),
}

impl StatusFilter {
    pub fn matches(self, task: &Task) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(status) => task.status == status,
        }
    }

    /// Next selection in the cycle all -> pending -> in_progress -> completed
    pub fn cycled(self) -> StatusFilter {
        match self {
            StatusFilter::All => StatusFilter::Only(Status::Pending),
            StatusFilter::Only(Status::Pending) => StatusFilter::Only(Status::InProgress),
            StatusFilter::Only(Status::InProgress) => StatusFilter::Only(Status::Completed),
            StatusFilter::Only(Status::Completed) => StatusFilter::All,
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusFilter::All => write!(f, "all"),
            StatusFilter::Only(status) => write!(f, "{status}"),
        }
    }
}

impl FromStr for StatusFilter {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        let trimmed = value.trim();
        if trimmed == "all" {
            return Ok(StatusFilter::All);
        }
        trimmed
            .parse::<Status>()
            .map(StatusFilter::Only)
            .map_err(|_| {
                Error::InvalidArgument(format!(
                    "invalid status filter '{trimmed}' (expected all|pending|in_progress|completed)"
                ))
            })
    }
}

/// Priority predicate: everything, or one priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PriorityFilter {
    #[default]
    All,
    Only(Priority),
}

impl PriorityFilter {
    pub fn matches(self, task: &Task) -> bool {
        match self {
            PriorityFilter::All => true,
            PriorityFilter::Only(priority) => task.priority == priority,
        }
    }

    /// Next selection in the cycle all -> low -> medium -> high
    pub fn cycled(self) -> PriorityFilter {
        match self {
            PriorityFilter::All => PriorityFilter::Only(Priority::Low),
            PriorityFilter::Only(Priority::Low) => PriorityFilter::Only(Priority::Medium),
            PriorityFilter::Only(Priority::Medium) => PriorityFilter::Only(Priority::High),
            PriorityFilter::Only(Priority::High) => PriorityFilter::All,
        }
    }
}

impl fmt::Display for PriorityFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PriorityFilter::All => write!(f, "all"),
            PriorityFilter::Only(priority) => write!(f, "{priority}"),
        }
    }
}

impl FromStr for PriorityFilter {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        let trimmed = value.trim();
        if trimmed == "all" {
            return Ok(PriorityFilter::All);
        }
        trimmed
            .parse::<Priority>()
            .map(PriorityFilter::Only)
            .map_err(|_| {
                Error::InvalidArgument(format!(
                    "invalid priority filter '{trimmed}' (expected all|low|medium|high)"
                ))
            })
    }
}

/// Apply both predicates, preserving input order
pub fn filter_tasks<'a>(
    tasks: &'a [Task],
    status: StatusFilter,
    priority: PriorityFilter,
) -> Vec<&'a Task> {
    tasks
        .iter()
        .filter(|task| status.matches(task) && priority.matches(task))
        .collect()
}

/// Per-status counts over the unfiltered list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub total: usize,
    pub pending: usize,
    pub in_progress: usize,
    pub completed: usize,
}

pub fn status_counts(tasks: &[Task]) -> StatusCounts {
    let mut counts = StatusCounts {
        total: tasks.len(),
        pending: 0,
        in_progress: 0,
        completed: 0,
    };
    for task in tasks {
        match task.status {
            Status::Pending => counts.pending += 1,
            Status::InProgress => counts.in_progress += 1,
            Status::Completed => counts.completed += 1,
        }
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn task(title: &str, status: Status, priority: Priority) -> Task {
        Task {
            id: title.to_lowercase().replace(' ', "-"),
            title: title.to_string(),
            description: "desc".to_string(),
            status,
            priority,
            created_at: Utc::now(),
            owner: "alice".to_string(),
        }
    }

    #[test]
    fn all_all_returns_full_list_in_order() {
        let tasks = vec![
            task("one", Status::Pending, Priority::Low),
            task("two", Status::Completed, Priority::High),
            task("three", Status::InProgress, Priority::Medium),
        ];

        let filtered = filter_tasks(&tasks, StatusFilter::All, PriorityFilter::All);
        let ids: Vec<_> = filtered.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["one", "two", "three"]);
    }

    #[test]
    fn filters_compose_as_and_conjunction() {
        let tasks = vec![
            task("a", Status::Completed, Priority::High),
            task("b", Status::Completed, Priority::Low),
            task("c", Status::Pending, Priority::High),
            task("d", Status::Completed, Priority::High),
        ];

        let filtered = filter_tasks(
            &tasks,
            StatusFilter::Only(Status::Completed),
            PriorityFilter::Only(Priority::High),
        );
        let ids: Vec<_> = filtered.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "d"]);
    }

    #[test]
    fn single_predicate_leaves_other_dimension_alone() {
        let tasks = vec![
            task("a", Status::Pending, Priority::High),
            task("b", Status::Completed, Priority::High),
            task("c", Status::Pending, Priority::Low),
        ];

        let by_status = filter_tasks(
            &tasks,
            StatusFilter::Only(Status::Pending),
            PriorityFilter::All,
        );
        assert_eq!(by_status.len(), 2);

        let by_priority = filter_tasks(
            &tasks,
            StatusFilter::All,
            PriorityFilter::Only(Priority::High),
        );
        assert_eq!(by_priority.len(), 2);
    }

    #[test]
    fn counts_sum_to_total() {
        let tasks = vec![
            task("a", Status::Pending, Priority::Low),
            task("b", Status::InProgress, Priority::High),
            task("c", Status::Completed, Priority::Medium),
            task("d", Status::Pending, Priority::High),
        ];

        let counts = status_counts(&tasks);
        assert_eq!(counts.total, 4);
        assert_eq!(
            counts.pending + counts.in_progress + counts.completed,
            counts.total
        );

        let empty = status_counts(&[]);
        assert_eq!(empty.total, 0);
        assert_eq!(empty.pending + empty.in_progress + empty.completed, 0);
    }

    #[test]
    fn counts_ignore_active_filters() {
        // Example from the store contract: two tasks, second one started.
        let tasks = vec![
            task("Ship release", Status::InProgress, Priority::High),
            task("Buy milk", Status::Pending, Priority::Low),
        ];

        let counts = status_counts(&tasks);
        assert_eq!(counts.total, 2);
        assert_eq!(counts.pending, 1);
        assert_eq!(counts.in_progress, 1);
        assert_eq!(counts.completed, 0);

        let high_only = filter_tasks(
            &tasks,
            StatusFilter::All,
            PriorityFilter::Only(Priority::High),
        );
        assert_eq!(high_only.len(), 1);
        assert_eq!(high_only[0].title, "Ship release");

        // Counts over the unfiltered list are unaffected by the view
        assert_eq!(status_counts(&tasks), counts);
    }

    #[test]
    fn filter_tokens_parse() {
        assert_eq!("all".parse::<StatusFilter>().unwrap(), StatusFilter::All);
        assert_eq!(
            "completed".parse::<StatusFilter>().unwrap(),
            StatusFilter::Only(Status::Completed)
        );
        assert!("closed".parse::<StatusFilter>().is_err());

        assert_eq!("all".parse::<PriorityFilter>().unwrap(), PriorityFilter::All);
        assert_eq!(
            "high".parse::<PriorityFilter>().unwrap(),
            PriorityFilter::Only(Priority::High)
        );
        assert!("urgent".parse::<PriorityFilter>().is_err());
    }

    #[test]
    fn filter_cycles_cover_every_option() {
        let mut status = StatusFilter::All;
        for _ in 0..4 {
            status = status.cycled();
        }
        assert_eq!(status, StatusFilter::All);

        let mut priority = PriorityFilter::All;
        for _ in 0..4 {
            priority = priority.cycled();
        }
        assert_eq!(priority, PriorityFilter::All);
    }
}
