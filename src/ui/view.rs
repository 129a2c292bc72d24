//! Rendering for the interactive task viewer.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};
use ratatui::Frame;

use crate::filter::{PriorityFilter, StatusFilter};
use crate::storage::Theme;
use crate::task::{Priority, Status, Task};

use super::app::{App, NoticeKind};

const STATUS_WIDTH: usize = 11;

struct Palette {
    text: Color,
    muted: Color,
    accent: Color,
    pending: Color,
    in_progress: Color,
    completed: Color,
    low: Color,
    medium: Color,
    high: Color,
    error: Color,
    info: Color,
}

fn palette(theme: Theme) -> Palette {
    match theme {
        Theme::Dark => Palette {
            text: Color::Rgb(234, 236, 239),
            muted: Color::Rgb(140, 146, 152),
            accent: Color::Rgb(122, 170, 255),
            pending: Color::Rgb(160, 165, 172),
            in_progress: Color::Rgb(116, 198, 219),
            completed: Color::Rgb(126, 210, 146),
            low: Color::Rgb(126, 210, 146),
            medium: Color::Rgb(244, 200, 98),
            high: Color::Rgb(255, 107, 107),
            error: Color::Rgb(255, 107, 107),
            info: Color::Rgb(116, 198, 219),
        },
        Theme::Light => Palette {
            text: Color::Black,
            muted: Color::DarkGray,
            accent: Color::Blue,
            pending: Color::DarkGray,
            in_progress: Color::Blue,
            completed: Color::Green,
            low: Color::Green,
            medium: Color::Yellow,
            high: Color::Red,
            error: Color::Red,
            info: Color::Blue,
        },
    }
}

pub(crate) fn render(frame: &mut Frame, app: &mut App) {
    let palette = palette(app.theme);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(4),
                Constraint::Min(0),
                Constraint::Length(2),
            ]
            .as_ref(),
        )
        .split(frame.size());

    render_header(frame, app, &palette, chunks[0]);
    render_list(frame, app, &palette, chunks[1]);
    render_footer(frame, app, &palette, chunks[2]);
}

fn render_header(frame: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let counts = app.model.counts();

    let title = Line::from(vec![
        Span::styled(
            "Task Deck",
            Style::default()
                .fg(palette.accent)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!("  {}", app.account()), Style::default().fg(palette.muted)),
    ]);

    let status_options = [
        (StatusFilter::All, format!("All {}", counts.total)),
        (
            StatusFilter::Only(Status::Pending),
            format!("Pending {}", counts.pending),
        ),
        (
            StatusFilter::Only(Status::InProgress),
            format!("In Progress {}", counts.in_progress),
        ),
        (
            StatusFilter::Only(Status::Completed),
            format!("Completed {}", counts.completed),
        ),
    ];

    let mut status_spans = vec![Span::styled("Status  ", Style::default().fg(palette.muted))];
    for (filter, label) in status_options {
        let style = if filter == app.model.status_filter {
            Style::default()
                .fg(palette.accent)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(palette.text)
        };
        status_spans.push(Span::styled(format!("[{label}] "), style));
    }

    let priority_options = [
        (PriorityFilter::All, "all"),
        (PriorityFilter::Only(Priority::Low), "low"),
        (PriorityFilter::Only(Priority::Medium), "medium"),
        (PriorityFilter::Only(Priority::High), "high"),
    ];

    let mut priority_spans = vec![Span::styled("Priority", Style::default().fg(palette.muted))];
    for (filter, label) in priority_options {
        let style = if filter == app.model.priority_filter {
            Style::default()
                .fg(palette.accent)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(palette.text)
        };
        priority_spans.push(Span::styled(format!(" [{label}]"), style));
    }

    let header = Paragraph::new(vec![
        title,
        Line::from(status_spans),
        Line::from(priority_spans),
    ])
    .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, area);
}

fn render_list(frame: &mut Frame, app: &mut App, palette: &Palette, area: Rect) {
    let visible = app.model.visible();

    if visible.is_empty() {
        let message = if app.model.tasks().is_empty() {
            "No tasks yet - create one with `td task new <title> --description <text>`"
        } else {
            "No tasks match your filters"
        };
        let empty = Paragraph::new(Line::from(Span::styled(
            message,
            Style::default().fg(palette.muted),
        )));
        frame.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = visible
        .iter()
        .map(|task| ListItem::new(task_line(task, palette)))
        .collect();

    let list = List::new(items)
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");

    let mut state = ListState::default();
    state.select(app.model.selected_index());

    frame.render_stateful_widget(list, area, &mut state);
}

fn task_line<'a>(task: &'a Task, palette: &Palette) -> Line<'a> {
    let status_color = match task.status {
        Status::Pending => palette.pending,
        Status::InProgress => palette.in_progress,
        Status::Completed => palette.completed,
    };
    let priority_color = match task.priority {
        Priority::Low => palette.low,
        Priority::Medium => palette.medium,
        Priority::High => palette.high,
    };

    Line::from(vec![
        Span::styled(
            format!("{:<width$}", task.status.label(), width = STATUS_WIDTH),
            Style::default().fg(status_color),
        ),
        Span::styled(
            format!(" {:<6} ", task.priority.to_string()),
            Style::default().fg(priority_color),
        ),
        Span::styled(task.title.as_str(), Style::default().fg(palette.text)),
        Span::styled(
            format!("  {}", task.created_at.format("%Y-%m-%d")),
            Style::default().fg(palette.muted),
        ),
    ])
}

fn render_footer(frame: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let prompt = if let Some(id) = &app.pending_delete {
        let title = app
            .model
            .tasks()
            .iter()
            .find(|task| &task.id == id)
            .map(|task| task.title.as_str())
            .unwrap_or(id.as_str());
        Line::from(Span::styled(
            format!("Delete '{title}'? y to confirm, any other key to cancel"),
            Style::default()
                .fg(palette.error)
                .add_modifier(Modifier::BOLD),
        ))
    } else {
        Line::from(Span::styled(
            "j/k move  s status filter  p priority filter  space advance  x delete  r reload  t theme  q quit",
            Style::default().fg(palette.muted),
        ))
    };

    let notice = match &app.notice {
        Some((NoticeKind::Error, message)) => Line::from(Span::styled(
            message.as_str(),
            Style::default().fg(palette.error),
        )),
        Some((NoticeKind::Info, message)) => Line::from(Span::styled(
            message.as_str(),
            Style::default().fg(palette.info),
        )),
        None => Line::from(""),
    };

    let footer = Paragraph::new(vec![prompt, notice]);
    frame.render_widget(footer, area);
}
