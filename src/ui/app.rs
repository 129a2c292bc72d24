//! Event loop for the interactive task viewer.

use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use crate::config::Config;
use crate::error::Result;
use crate::storage::{Prefs, Storage, Theme};
use crate::task::{TaskPatch, TaskStore};

use super::model::ViewModel;
use super::view;

const EVENT_POLL_MS: u64 = 120;

#[derive(Clone, Copy, PartialEq, Eq)]
pub(crate) enum NoticeKind {
    Error,
    Info,
}

pub(crate) struct App {
    store: TaskStore,
    storage: Storage,
    pub(crate) model: ViewModel,
    pub(crate) theme: Theme,
    /// Task id awaiting delete confirmation
    pub(crate) pending_delete: Option<String>,
    pub(crate) notice: Option<(NoticeKind, String)>,
    should_quit: bool,
}

impl App {
    fn new(storage: Storage, store: TaskStore) -> Result<Self> {
        let theme = match storage.read_prefs()? {
            Some(prefs) => prefs.theme,
            None => Config::load_from_dir(storage.data_dir()).default_theme(),
        };
        let tasks = store.get_all()?;

        Ok(Self {
            store,
            storage,
            model: ViewModel::new(tasks),
            theme,
            pending_delete: None,
            notice: None,
            should_quit: false,
        })
    }

    pub(crate) fn account(&self) -> &str {
        self.store.account()
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        // Delete confirmation intercepts everything else
        if let Some(id) = self.pending_delete.clone() {
            match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') => self.confirm_delete(&id),
                _ => {
                    self.pending_delete = None;
                    self.set_notice(NoticeKind::Info, "delete cancelled");
                }
            }
            return;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('j') | KeyCode::Down => self.model.select_next(),
            KeyCode::Char('k') | KeyCode::Up => self.model.select_prev(),
            KeyCode::Char('s') => self.model.cycle_status_filter(),
            KeyCode::Char('p') => self.model.cycle_priority_filter(),
            KeyCode::Char(' ') | KeyCode::Enter => self.advance_selected(),
            KeyCode::Char('x') => self.request_delete(),
            KeyCode::Char('r') => self.reload(),
            KeyCode::Char('t') => self.toggle_theme(),
            _ => {}
        }
    }

    /// Advance the selected task's status one step in the lifecycle cycle
    fn advance_selected(&mut self) {
        let Some(task) = self.model.selected_task() else {
            return;
        };
        let id = task.id.clone();
        let next = task.status.advanced();

        // Store first; mirror only what came back
        match self.store.update(
            &id,
            TaskPatch {
                status: Some(next),
                ..TaskPatch::default()
            },
        ) {
            Ok(updated) => {
                let label = updated.status.label();
                self.model.apply_updated(updated);
                self.set_notice(NoticeKind::Info, format!("status: {label}"));
            }
            Err(err) => self.set_notice(NoticeKind::Error, err.to_string()),
        }
    }

    fn request_delete(&mut self) {
        if let Some(task) = self.model.selected_task() {
            self.pending_delete = Some(task.id.clone());
        }
    }

    fn confirm_delete(&mut self, id: &str) {
        self.pending_delete = None;
        match self.store.delete(id) {
            Ok(true) => {
                self.model.apply_deleted(id);
                self.set_notice(NoticeKind::Info, "task deleted");
            }
            Ok(false) => self.set_notice(NoticeKind::Error, format!("task not found: {id}")),
            Err(err) => self.set_notice(NoticeKind::Error, err.to_string()),
        }
    }

    fn reload(&mut self) {
        match self.store.get_all() {
            Ok(tasks) => {
                self.model.replace(tasks);
                self.set_notice(NoticeKind::Info, "reloaded");
            }
            Err(err) => self.set_notice(NoticeKind::Error, err.to_string()),
        }
    }

    fn toggle_theme(&mut self) {
        let next = self.theme.toggled();
        match self.storage.write_prefs(&Prefs { theme: next }) {
            Ok(()) => {
                self.theme = next;
                self.set_notice(NoticeKind::Info, format!("theme: {next}"));
            }
            Err(err) => self.set_notice(NoticeKind::Error, err.to_string()),
        }
    }

    fn set_notice(&mut self, kind: NoticeKind, message: impl Into<String>) {
        self.notice = Some((kind, message.into()));
    }
}

/// Run the viewer until the user quits
pub fn run(storage: Storage, store: TaskStore) -> Result<()> {
    let mut app = App::new(storage, store)?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, &mut app);

    // Always restore the terminal, even when the loop errored
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    loop {
        terminal.draw(|frame| view::render(frame, app))?;

        if event::poll(Duration::from_millis(EVENT_POLL_MS))? {
            if let Event::Key(key) = event::read()? {
                app.handle_key(key);
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}
