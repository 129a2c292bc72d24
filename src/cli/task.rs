//! td task command implementations.

use std::path::PathBuf;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::filter::{filter_tasks, status_counts, PriorityFilter, StatusCounts, StatusFilter};
use crate::output::{emit_success, HumanOutput, OutputOptions};
use crate::session;
use crate::storage::Storage;
use crate::task::{Priority, Status, Task, TaskDraft, TaskPatch, TaskStore};
use crate::ui;

pub struct NewOptions {
    pub title: String,
    pub description: String,
    pub priority: Option<String>,
    pub account: Option<String>,
    pub data_dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub struct ListOptions {
    pub status: String,
    pub priority: String,
    pub limit: Option<usize>,
    pub account: Option<String>,
    pub data_dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub struct ShowOptions {
    pub id: String,
    pub account: Option<String>,
    pub data_dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub struct EditOptions {
    pub id: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub account: Option<String>,
    pub data_dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub struct StatusOptions {
    pub id: String,
    pub status: String,
    pub account: Option<String>,
    pub data_dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub struct PriorityOptions {
    pub id: String,
    pub priority: String,
    pub account: Option<String>,
    pub data_dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub struct RmOptions {
    pub id: String,
    pub account: Option<String>,
    pub data_dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub struct CountsOptions {
    pub account: Option<String>,
    pub data_dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub struct TuiOptions {
    pub account: Option<String>,
    pub data_dir: Option<PathBuf>,
}

struct TaskContext {
    store: TaskStore,
    storage: Storage,
    config: Config,
}

fn load_context(data_dir: Option<PathBuf>, account: Option<String>) -> Result<TaskContext> {
    let storage = Storage::resolve(data_dir)?;
    storage.require_initialized()?;
    let config = Config::load_from_dir(storage.data_dir());
    let account = session::resolve_account(&storage, account.as_deref())?;
    Ok(TaskContext {
        store: TaskStore::open(storage.clone(), account),
        storage,
        config,
    })
}

pub fn run_new(options: NewOptions) -> Result<()> {
    let ctx = load_context(options.data_dir, options.account)?;

    let priority = match options.priority.as_deref() {
        Some(value) => value.parse::<Priority>()?,
        None => ctx.config.default_priority(),
    };

    let task = ctx.store.create(TaskDraft {
        title: options.title,
        description: options.description,
        priority,
    })?;

    let mut human = HumanOutput::new("Task created");
    human.push_summary("ID", task.id.clone());
    human.push_summary("Title", task.title.clone());
    human.push_summary("Status", task.status.to_string());
    human.push_summary("Priority", task.priority.to_string());

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "task new",
        &TaskOutput { task },
        Some(&human),
    )
}

pub fn run_list(options: ListOptions) -> Result<()> {
    let ctx = load_context(options.data_dir, options.account)?;

    let status_filter = options.status.parse::<StatusFilter>()?;
    let priority_filter = options.priority.parse::<PriorityFilter>()?;

    let all = ctx.store.get_all()?;
    // Counts always cover the unfiltered list
    let counts = status_counts(&all);

    let mut tasks: Vec<Task> = filter_tasks(&all, status_filter, priority_filter)
        .into_iter()
        .cloned()
        .collect();
    if let Some(limit) = options.limit {
        tasks.truncate(limit);
    }

    let mut human = HumanOutput::new("Tasks");
    human.push_summary("Account", ctx.store.account().to_string());
    human.push_summary("Matched", tasks.len().to_string());
    human.push_summary(
        "Counts",
        format!(
            "{} total, {} pending, {} in progress, {} completed",
            counts.total, counts.pending, counts.in_progress, counts.completed
        ),
    );
    if status_filter != StatusFilter::All {
        human.push_summary("Status filter", status_filter.to_string());
    }
    if priority_filter != PriorityFilter::All {
        human.push_summary("Priority filter", priority_filter.to_string());
    }
    for task in &tasks {
        human.push_detail(format_task_line(task));
    }

    let output = TaskListOutput {
        matched: tasks.len(),
        counts,
        tasks,
    };

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "task list",
        &output,
        Some(&human),
    )
}

pub fn run_show(options: ShowOptions) -> Result<()> {
    let ctx = load_context(options.data_dir, options.account)?;
    let task = ctx.store.get(&options.id)?;

    let mut human = HumanOutput::new(format!("Task {}", task.id));
    human.push_summary("Title", task.title.clone());
    human.push_summary("Description", task.description.clone());
    human.push_summary("Status", task.status.label().to_string());
    human.push_summary("Priority", task.priority.to_string());
    human.push_summary("Created", task.created_at.format("%Y-%m-%d %H:%M UTC").to_string());
    human.push_summary("Owner", task.owner.clone());

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "task show",
        &TaskOutput { task },
        Some(&human),
    )
}

pub fn run_edit(options: EditOptions) -> Result<()> {
    let ctx = load_context(options.data_dir, options.account)?;

    let patch = TaskPatch {
        title: options.title,
        description: options.description,
        ..TaskPatch::default()
    };
    if patch.is_empty() {
        return Err(Error::InvalidArgument(
            "nothing to edit: pass --title and/or --description".to_string(),
        ));
    }

    let task = ctx.store.update(&options.id, patch)?;

    let mut human = HumanOutput::new("Task updated");
    human.push_summary("ID", task.id.clone());
    human.push_summary("Title", task.title.clone());

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "task edit",
        &TaskOutput { task },
        Some(&human),
    )
}

pub fn run_status(options: StatusOptions) -> Result<()> {
    let ctx = load_context(options.data_dir, options.account)?;
    let status = options.status.parse::<Status>()?;

    let task = ctx.store.update(
        &options.id,
        TaskPatch {
            status: Some(status),
            ..TaskPatch::default()
        },
    )?;

    let mut human = HumanOutput::new("Status changed");
    human.push_summary("ID", task.id.clone());
    human.push_summary("Status", task.status.to_string());

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "task status",
        &TaskOutput { task },
        Some(&human),
    )
}

pub fn run_priority(options: PriorityOptions) -> Result<()> {
    let ctx = load_context(options.data_dir, options.account)?;
    let priority = options.priority.parse::<Priority>()?;

    let task = ctx.store.update(
        &options.id,
        TaskPatch {
            priority: Some(priority),
            ..TaskPatch::default()
        },
    )?;

    let mut human = HumanOutput::new("Priority changed");
    human.push_summary("ID", task.id.clone());
    human.push_summary("Priority", task.priority.to_string());

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "task priority",
        &TaskOutput { task },
        Some(&human),
    )
}

pub fn run_rm(options: RmOptions) -> Result<()> {
    let ctx = load_context(options.data_dir, options.account)?;

    if !ctx.store.delete(&options.id)? {
        return Err(Error::TaskNotFound(options.id));
    }

    let mut human = HumanOutput::new("Task deleted");
    human.push_summary("ID", options.id.clone());

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "task rm",
        &TaskDeletedOutput {
            id: options.id,
            deleted: true,
        },
        Some(&human),
    )
}

pub fn run_counts(options: CountsOptions) -> Result<()> {
    let ctx = load_context(options.data_dir, options.account)?;

    let all = ctx.store.get_all()?;
    let counts = status_counts(&all);

    let mut human = HumanOutput::new("Task counts");
    human.push_summary("Total", counts.total.to_string());
    human.push_summary("Pending", counts.pending.to_string());
    human.push_summary("In progress", counts.in_progress.to_string());
    human.push_summary("Completed", counts.completed.to_string());

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "task counts",
        &counts,
        Some(&human),
    )
}

pub fn run_tui(options: TuiOptions) -> Result<()> {
    let ctx = load_context(options.data_dir, options.account)?;
    ui::run(ctx.storage, ctx.store)
}

fn format_task_line(task: &Task) -> String {
    format!(
        "[{}] {} {} - {} ({})",
        task.status,
        task.priority,
        task.id,
        task.title,
        task.created_at.format("%Y-%m-%d")
    )
}

#[derive(serde::Serialize)]
struct TaskOutput {
    task: Task,
}

#[derive(serde::Serialize)]
struct TaskListOutput {
    matched: usize,
    counts: StatusCounts,
    tasks: Vec<Task>,
}

#[derive(serde::Serialize)]
struct TaskDeletedOutput {
    id: String,
    deleted: bool,
}
