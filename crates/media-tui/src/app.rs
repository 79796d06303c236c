//! App: component-based event loop.
//!
//! - `App` owns the components and `AppState` (which owns the `FileManager`).
//! - A `tokio::mpsc` channel carries `AppMessage` events in from the terminal
//!   reader and from background load/delete tasks.
//! - The event loop draws each frame, then awaits the next message.
//! - Components return `Vec<Action>`; App applies each Action.
//! - Remote work runs in spawned tasks on clones of the loader and the
//!   deletion coordinator; results are applied to the session here, so the
//!   session only ever changes on this task.

use std::io;
use std::time::Duration;

use media_core::{BatchOutcome, Record, RecordId, RecordStore, StoreError};
use ratatui::crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Clear, Paragraph, Wrap},
    Terminal,
};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::{
    action::{Action, View},
    app_state::{AppState, Busy, DetailState},
    component::Component,
    components::{
        distribution_panel::DistributionPanel, file_detail::FileDetail, file_table::FileTable,
    },
    theme::{C_ACCENT, C_BG, C_PRIMARY},
    widgets::{
        pane_chrome::{centered, pane_chrome},
        status_bar::{self, InputMode},
        toast::{Severity, ToastManager},
    },
};

// ── Internal event bus ────────────────────────────────────────────────────────

pub enum AppMessage {
    Event(Event),
    Loaded(Result<Vec<Record>, StoreError>),
    DetailLoaded(RecordId, Result<Record, StoreError>),
    BatchDeleted(BatchOutcome),
    AllDeleted(Result<BatchOutcome, StoreError>),
    RecordDeleted(RecordId, Result<(), StoreError>),
}

pub struct App {
    state: AppState,
    file_table: FileTable,
    distributions: DistributionPanel,
    file_detail: FileDetail,
    toast: ToastManager,
    tx: mpsc::Sender<AppMessage>,
    /// Taken by `run`.
    rx: Option<mpsc::Receiver<AppMessage>>,
    should_quit: bool,
}

impl App {
    pub fn new(state: AppState) -> Self {
        let (tx, rx) = mpsc::channel::<AppMessage>(256);
        Self {
            state,
            file_table: FileTable::new(),
            distributions: DistributionPanel::new(),
            file_detail: FileDetail::new(),
            toast: ToastManager::new(),
            tx,
            rx: Some(rx),
            should_quit: false,
        }
    }

    // ── Main run loop ─────────────────────────────────────────────────────────

    pub async fn run(mut self) -> anyhow::Result<()> {
        let Some(mut rx) = self.rx.take() else {
            anyhow::bail!("event loop already ran");
        };

        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        debug!("terminal ready, size={:?}", terminal.size());

        // ── Background task: keyboard events ──────────────────────────────────
        let event_tx = self.tx.clone();
        tokio::task::spawn_blocking(move || loop {
            match event::read() {
                Ok(ev) => {
                    if event_tx.blocking_send(AppMessage::Event(ev)).is_err() {
                        break;
                    }
                }
                Err(_) => break,
            }
        });

        self.initialize();

        // Toast expiry + spinner animation.
        let mut toast_tick = tokio::time::interval(Duration::from_millis(100));
        toast_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        // ── Main loop ─────────────────────────────────────────────────────────
        let mut needs_redraw = true;
        while !self.should_quit {
            if needs_redraw {
                terminal.draw(|f| self.draw(f))?;
            }

            needs_redraw = tokio::select! {
                Some(msg) = rx.recv() => {
                    let mut redraw = self.handle_message(msg);
                    while let Ok(next) = rx.try_recv() {
                        redraw |= self.handle_message(next);
                    }
                    redraw
                }
                _ = toast_tick.tick() => {
                    self.toast.tick();
                    !self.toast.is_empty()
                }
            };
        }

        // ── Teardown ──────────────────────────────────────────────────────────
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;
        info!("mediadex exiting");
        Ok(())
    }

    fn handle_message(&mut self, msg: AppMessage) -> bool {
        match msg {
            AppMessage::Event(Event::Key(key)) => {
                if key.kind == KeyEventKind::Release {
                    return false;
                }
                for action in self.handle_key(key) {
                    self.dispatch(action);
                }
            }
            AppMessage::Event(Event::Resize(w, h)) => self.dispatch(Action::Resize(w, h)),
            AppMessage::Event(_) => return false,
            AppMessage::Loaded(result) => self.on_loaded(result),
            AppMessage::DetailLoaded(id, result) => self.on_detail_loaded(id, result),
            AppMessage::BatchDeleted(outcome) => self.on_batch_deleted(outcome),
            AppMessage::AllDeleted(result) => self.on_all_deleted(result),
            AppMessage::RecordDeleted(id, result) => self.on_record_deleted(id, result),
        }
        true
    }

    // ── Keys ──────────────────────────────────────────────────────────────────

    fn handle_key(&mut self, key: KeyEvent) -> Vec<Action> {
        if key.code == KeyCode::Char('c') && key.modifiers == KeyModifiers::CONTROL {
            return vec![Action::Quit];
        }

        if self.state.input_mode == InputMode::Confirm {
            return match key.code {
                KeyCode::Char('y') => vec![Action::ConfirmDeleteAll],
                _ => vec![Action::CancelConfirm],
            };
        }

        match self.state.view {
            View::List => match key.code {
                KeyCode::Char('q') => vec![Action::Quit],
                KeyCode::Char('r') => vec![Action::Reload],
                _ => self.file_table.handle_key(key, &self.state),
            },
            View::Detail(_) => self.file_detail.handle_key(key, &self.state),
        }
    }

    // ── Actions ───────────────────────────────────────────────────────────────

    fn dispatch(&mut self, action: Action) {
        debug!("dispatch: {:?}", action);
        self.apply_action(action.clone());

        let follow_up: Vec<Action> = {
            let s = &self.state;
            let mut out = Vec::new();
            out.extend(self.file_table.on_action(&action, s));
            out.extend(self.distributions.on_action(&action, s));
            out.extend(self.file_detail.on_action(&action, s));
            out
        };
        for a in follow_up {
            self.apply_action(a);
        }
    }

    fn apply_action(&mut self, action: Action) {
        match action {
            Action::ToggleRecord(id) => self.state.files.toggle(id),
            Action::ToggleAll => self.state.files.toggle_all(),
            Action::ClearSelection => self.state.files.clear_selection(),

            Action::OpenDetail(id) => self.open_detail(id),
            Action::CloseDetail => {
                self.state.view = View::List;
                self.state.detail = None;
            }

            Action::DeleteSelected => self.delete_selected(),
            Action::RequestDeleteAll => {
                if self.ensure_idle() {
                    self.state.input_mode = InputMode::Confirm;
                }
            }
            Action::ConfirmDeleteAll => {
                self.state.input_mode = InputMode::Normal;
                self.delete_all();
            }
            Action::CancelConfirm => {
                self.state.input_mode = InputMode::Normal;
                self.toast.info("delete all cancelled");
            }
            Action::DeleteRecord(id) => self.delete_record(id),

            Action::Reload => self.reload(),
            Action::Quit => self.should_quit = true,
            Action::CollectionChanged | Action::Resize(..) => {}
        }
    }

    // ── Remote work ───────────────────────────────────────────────────────────

    fn initialize(&mut self) {
        if self.state.files.session_mut().mark_initialized() {
            self.reload();
        }
    }

    fn reload(&mut self) {
        if let Some(busy) = self.state.busy {
            self.toast.warning(format!("still {}", busy.describe()));
            return;
        }
        if !self.state.files.session_mut().begin_load() {
            self.toast.info("already loading");
            return;
        }
        self.toast.working("loading files…");
        let loader = self.state.files.loader().clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = loader.load_all().await;
            let _ = tx.send(AppMessage::Loaded(result)).await;
        });
    }

    /// Deletes never overlap each other or a load; a request while either
    /// is running is refused.
    fn ensure_idle(&mut self) -> bool {
        if let Some(busy) = self.state.busy {
            self.toast.warning(format!("still {}", busy.describe()));
            return false;
        }
        if self.state.files.session().is_loading() {
            self.toast.warning("still loading files");
            return false;
        }
        true
    }

    fn delete_selected(&mut self) {
        let ids = self.state.files.session().selection().ids();
        if ids.is_empty() {
            self.toast.info("nothing checked");
            return;
        }
        if !self.ensure_idle() {
            return;
        }
        let busy = Busy::Deleting(ids.len());
        self.toast.working(busy.describe());
        self.state.busy = Some(busy);

        let deleter = self.state.files.deleter().clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let outcome = deleter.delete_many(&ids).await;
            let _ = tx.send(AppMessage::BatchDeleted(outcome)).await;
        });
    }

    fn delete_all(&mut self) {
        if !self.ensure_idle() {
            return;
        }
        self.toast.working(Busy::DeletingAll.describe());
        self.state.busy = Some(Busy::DeletingAll);

        let deleter = self.state.files.deleter().clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = deleter.delete_all().await;
            let _ = tx.send(AppMessage::AllDeleted(result)).await;
        });
    }

    fn delete_record(&mut self, id: RecordId) {
        if !self.ensure_idle() {
            return;
        }
        let busy = Busy::DeletingRecord(id);
        self.toast.working(busy.describe());
        self.state.busy = Some(busy);

        let deleter = self.state.files.deleter().clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = deleter.delete_single(id).await;
            let _ = tx.send(AppMessage::RecordDeleted(id, result)).await;
        });
    }

    fn open_detail(&mut self, id: RecordId) {
        let cached = self.state.files.session().record(id).cloned();
        self.state.detail = Some(DetailState::new(id, cached));
        self.state.view = View::Detail(id);

        let store = std::sync::Arc::clone(self.state.files.loader().store());
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = store.get_one(id).await;
            let _ = tx.send(AppMessage::DetailLoaded(id, result)).await;
        });
    }

    // ── Results ───────────────────────────────────────────────────────────────

    fn on_loaded(&mut self, result: Result<Vec<Record>, StoreError>) {
        match &result {
            Ok(records) => self
                .toast
                .settle(Severity::Success, format!("loaded {} files", records.len())),
            Err(e) => self
                .toast
                .settle(Severity::Error, format!("could not load files: {}", e)),
        }
        self.state.files.session_mut().finish_load(result);
        self.dispatch(Action::CollectionChanged);
    }

    fn on_detail_loaded(&mut self, id: RecordId, result: Result<Record, StoreError>) {
        let Some(detail) = self.state.detail.as_mut().filter(|d| d.id == id) else {
            debug!("dropping detail for {}: view moved on", id);
            return;
        };
        detail.fetching = false;
        match result {
            Ok(record) => {
                detail.record = Some(record);
                detail.error = None;
            }
            Err(StoreError::NotFound(_)) => {
                detail.error = Some(format!("file #{} no longer exists", id));
            }
            Err(e) => {
                warn!("fetch {} failed: {}", id, e);
                detail.error = Some(format!("could not fetch file: {}", e));
            }
        }
    }

    fn on_batch_deleted(&mut self, outcome: BatchOutcome) {
        self.state.busy = None;
        self.state.files.session_mut().apply_batch(&outcome);
        self.dispatch(Action::CollectionChanged);

        let removed = outcome.deleted.len() + outcome.already_gone.len();
        match outcome.into_result() {
            Ok(_) => self
                .toast
                .settle(Severity::Success, format!("deleted {} files", removed)),
            Err(e) => {
                error!("{}", e);
                self.toast.settle(Severity::Warning, e.to_string());
                self.toast.warning("press r to reload and see what remains");
            }
        }
    }

    fn on_all_deleted(&mut self, result: Result<BatchOutcome, StoreError>) {
        self.state.busy = None;
        let outcome = match result {
            Ok(outcome) => outcome,
            Err(e) => {
                // Listing failed before any delete was sent; the view stays.
                self.toast
                    .settle(Severity::Error, format!("delete all aborted: {}", e));
                return;
            }
        };

        self.state.files.session_mut().apply_delete_all();
        self.dispatch(Action::CollectionChanged);
        let total = outcome.requested.len();
        match outcome.into_result() {
            Ok(_) => self
                .toast
                .settle(Severity::Success, format!("deleted all {} files", total)),
            Err(e) => {
                error!("{}", e);
                self.toast.settle(Severity::Warning, e.to_string());
            }
        }
    }

    fn on_record_deleted(&mut self, id: RecordId, result: Result<(), StoreError>) {
        self.state.busy = None;
        match result {
            Ok(()) => self
                .toast
                .settle(Severity::Success, format!("deleted file #{}", id)),
            Err(StoreError::NotFound(_)) => self
                .toast
                .settle(Severity::Info, format!("file #{} was already gone", id)),
            Err(e) => {
                self.toast
                    .settle(Severity::Error, format!("could not delete #{}: {}", id, e));
                return;
            }
        }
        // Back to a freshly loaded list.
        self.dispatch(Action::CloseDetail);
        self.reload();
    }

    // ── Drawing ───────────────────────────────────────────────────────────────

    fn draw(&mut self, frame: &mut ratatui::Frame) {
        let area = frame.area();
        frame.render_widget(Block::default().style(Style::default().bg(C_BG)), area);

        let outer = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1), Constraint::Length(1)])
            .split(area);
        let (body, summary, keys) = (outer[0], outer[1], outer[2]);

        match self.state.view {
            View::List => {
                let chart_h = if body.height >= 24 { body.height / 3 } else { 0 };
                let rows = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([Constraint::Min(0), Constraint::Length(chart_h)])
                    .split(body);
                self.file_table.draw(frame, rows[0], true, &self.state);
                if chart_h > 0 {
                    self.distributions.draw(frame, rows[1], false, &self.state);
                }
            }
            View::Detail(_) => self.file_detail.draw(frame, body, true, &self.state),
        }

        status_bar::draw_summary_bar(frame, summary, &self.state);
        status_bar::draw_keys_bar(frame, keys, self.state.input_mode, self.state.view);

        if self.state.input_mode == InputMode::Confirm {
            self.draw_confirm(frame, area);
        }

        self.toast.draw(frame, area);
    }

    fn draw_confirm(&self, frame: &mut ratatui::Frame, area: Rect) {
        let popup = centered(area, 52, 6);
        frame.render_widget(Clear, popup);
        let block = pane_chrome("delete all", true, None);
        let inner = block.inner(popup);
        frame.render_widget(block, popup);

        let text = vec![
            Line::from(Span::styled(
                "Delete every file record on the server?",
                Style::default().fg(C_PRIMARY).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                "Records not shown here are deleted too.",
                Style::default().fg(C_ACCENT),
            )),
            Line::from(""),
            Line::from(Span::raw("y to confirm, any other key to cancel")),
        ];
        frame.render_widget(Paragraph::new(text).wrap(Wrap { trim: true }), inner);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app_state::fixtures::state_with;
    use media_core::{CollectionError, FailedDeletion};

    fn app(ids: &[RecordId]) -> App {
        let mut app = App::new(state_with(ids));
        app.dispatch(Action::CollectionChanged);
        app
    }

    fn key(app: &mut App, code: KeyCode) {
        let ev = Event::Key(KeyEvent::new(code, KeyModifiers::NONE));
        app.handle_message(AppMessage::Event(ev));
    }

    fn visible(app: &App) -> Vec<RecordId> {
        app.state.files.session().visible_ids()
    }

    #[test]
    fn batch_result_reconciles_collection_and_selection() {
        let mut app = app(&[1, 2, 3, 4]);
        app.dispatch(Action::ToggleRecord(2));
        app.dispatch(Action::ToggleRecord(4));
        app.state.busy = Some(Busy::Deleting(2));

        app.handle_message(AppMessage::BatchDeleted(BatchOutcome {
            requested: vec![2, 3],
            deleted: vec![2, 3],
            ..BatchOutcome::default()
        }));

        assert_eq!(visible(&app), vec![1, 4]);
        assert_eq!(app.state.files.session().selection().ids(), vec![4]);
        assert!(app.state.busy.is_none());
        assert_eq!(app.file_table.cursor_id(), Some(1));
    }

    #[test]
    fn partial_batch_failure_still_purges() {
        let mut app = app(&[1, 2, 3]);
        let outcome = BatchOutcome {
            requested: vec![1, 2],
            deleted: vec![1],
            failed: vec![FailedDeletion {
                id: 2,
                reason: StoreError::NetworkFailure("timed out".into()),
            }],
            ..BatchOutcome::default()
        };
        assert!(matches!(
            outcome.clone().into_result(),
            Err(CollectionError::PartialBatchFailure { .. })
        ));

        app.handle_message(AppMessage::BatchDeleted(outcome));
        assert_eq!(visible(&app), vec![3]);
    }

    #[test]
    fn delete_all_waits_for_confirmation() {
        let mut app = app(&[1, 2]);
        key(&mut app, KeyCode::Char('D'));
        assert_eq!(app.state.input_mode, InputMode::Confirm);

        key(&mut app, KeyCode::Char('n'));
        assert_eq!(app.state.input_mode, InputMode::Normal);
        assert!(app.state.busy.is_none());
    }

    #[test]
    fn failed_delete_all_listing_keeps_the_view() {
        let mut app = app(&[1, 2]);
        app.state.busy = Some(Busy::DeletingAll);

        app.handle_message(AppMessage::AllDeleted(Err(StoreError::NetworkFailure(
            "refused".into(),
        ))));
        assert_eq!(visible(&app), vec![1, 2]);

        app.handle_message(AppMessage::AllDeleted(Ok(BatchOutcome {
            requested: vec![1, 2, 9],
            deleted: vec![1, 2, 9],
            ..BatchOutcome::default()
        })));
        assert!(visible(&app).is_empty());
    }

    #[test]
    fn busy_app_refuses_another_delete() {
        let mut app = app(&[1, 2]);
        app.dispatch(Action::ToggleRecord(1));
        app.state.busy = Some(Busy::DeletingRecord(7));

        app.dispatch(Action::DeleteSelected);
        app.dispatch(Action::RequestDeleteAll);

        assert_eq!(app.state.busy, Some(Busy::DeletingRecord(7)));
        assert_eq!(app.state.input_mode, InputMode::Normal);
    }

    #[test]
    fn reload_waits_for_a_running_delete() {
        let mut app = app(&[1, 2]);
        app.state.busy = Some(Busy::DeletingAll);

        key(&mut app, KeyCode::Char('r'));
        assert!(!app.state.files.session().is_loading());

        app.handle_message(AppMessage::AllDeleted(Ok(BatchOutcome {
            requested: vec![1, 2],
            deleted: vec![1, 2],
            ..BatchOutcome::default()
        })));
        assert!(app.state.busy.is_none());
        assert!(visible(&app).is_empty());
        assert!(!app.state.files.session().is_loading());
    }

    #[test]
    fn deletes_wait_for_a_running_load() {
        let mut app = app(&[1, 2]);
        app.dispatch(Action::ToggleRecord(1));
        assert!(app.state.files.session_mut().begin_load());

        key(&mut app, KeyCode::Char('D'));
        assert_eq!(app.state.input_mode, InputMode::Normal);
        key(&mut app, KeyCode::Char('d'));
        app.dispatch(Action::DeleteRecord(2));
        assert!(app.state.busy.is_none());

        app.handle_message(AppMessage::Loaded(Ok(Vec::new())));
        assert!(!app.state.files.session().is_loading());
        assert!(visible(&app).is_empty());
    }

    #[test]
    fn stale_detail_results_are_dropped() {
        let mut app = app(&[1, 2]);
        app.state.detail = Some(DetailState::new(2, None));
        app.state.view = View::Detail(2);

        app.handle_message(AppMessage::DetailLoaded(1, Err(StoreError::NotFound(1))));
        let detail = app.state.detail.as_ref().unwrap();
        assert!(detail.fetching);
        assert!(detail.error.is_none());

        app.handle_message(AppMessage::DetailLoaded(2, Err(StoreError::NotFound(2))));
        let detail = app.state.detail.as_ref().unwrap();
        assert!(!detail.fetching);
        assert_eq!(detail.error.as_deref(), Some("file #2 no longer exists"));
    }

    #[test]
    fn keys_reach_the_table_in_list_view() {
        let mut app = app(&[5, 6]);
        key(&mut app, KeyCode::Char('j'));
        key(&mut app, KeyCode::Char(' '));
        assert_eq!(app.state.files.session().selection().ids(), vec![6]);

        key(&mut app, KeyCode::Char('a'));
        assert_eq!(app.state.selected_count(), 2);
        key(&mut app, KeyCode::Esc);
        assert_eq!(app.state.selected_count(), 0);

        key(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
    }
}
