//! View model for the task viewer.
//!
//! Holds the in-memory mirror of one account's task list plus the two
//! filter selections. Mutations are applied from store return values only
//! (create prepends, update replaces in place, delete removes), so the
//! mirror never runs ahead of durable state.

use crate::filter::{filter_tasks, status_counts, PriorityFilter, StatusCounts, StatusFilter};
use crate::task::Task;

#[derive(Debug)]
pub struct ViewModel {
    tasks: Vec<Task>,
    pub status_filter: StatusFilter,
    pub priority_filter: PriorityFilter,
    selected: usize,
}

impl ViewModel {
    pub fn new(tasks: Vec<Task>) -> Self {
        Self {
            tasks,
            status_filter: StatusFilter::All,
            priority_filter: PriorityFilter::All,
            selected: 0,
        }
    }

    /// Replace the mirror wholesale (reload from disk)
    pub fn replace(&mut self, tasks: Vec<Task>) {
        self.tasks = tasks;
        self.clamp_selection();
    }

    /// The unfiltered mirror
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Counts over the unfiltered mirror, independent of active filters
    pub fn counts(&self) -> StatusCounts {
        status_counts(&self.tasks)
    }

    /// The filtered subset, in mirror order
    pub fn visible(&self) -> Vec<&Task> {
        filter_tasks(&self.tasks, self.status_filter, self.priority_filter)
    }

    pub fn visible_len(&self) -> usize {
        self.visible().len()
    }

    /// Cursor position within the visible subset
    pub fn selected_index(&self) -> Option<usize> {
        if self.visible_len() == 0 {
            None
        } else {
            Some(self.selected)
        }
    }

    pub fn selected_task(&self) -> Option<&Task> {
        let index = self.selected_index()?;
        self.visible().get(index).copied()
    }

    pub fn select_next(&mut self) {
        let len = self.visible_len();
        if len > 0 && self.selected + 1 < len {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
        }
    }

    pub fn cycle_status_filter(&mut self) {
        self.status_filter = self.status_filter.cycled();
        self.clamp_selection();
    }

    pub fn cycle_priority_filter(&mut self) {
        self.priority_filter = self.priority_filter.cycled();
        self.clamp_selection();
    }

    /// Mirror a freshly created record (newest first)
    pub fn apply_created(&mut self, task: Task) {
        self.tasks.insert(0, task);
    }

    /// Mirror an updated record, preserving position
    pub fn apply_updated(&mut self, task: Task) {
        if let Some(slot) = self.tasks.iter_mut().find(|t| t.id == task.id) {
            *slot = task;
        }
    }

    /// Mirror a deletion
    pub fn apply_deleted(&mut self, id: &str) {
        self.tasks.retain(|task| task.id != id);
        self.clamp_selection();
    }

    fn clamp_selection(&mut self) {
        let len = self.visible_len();
        if len == 0 {
            self.selected = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
    }
}
