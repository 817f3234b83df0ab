//! Main TUI application state machine.
//!
//! Handles:
//! - Screen navigation
//! - Input event handling
//! - Form submission and statistics loading via the background worker

use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    Terminal,
};
use tokio::runtime::Handle;

use crate::adapters::HttpScoringClient;
use crate::application::{FormController, FormStatus, PredictionGateway, StatsFetcher, SubmitOutcome};
use crate::config::AppConfig;
use crate::domain::{FieldKind, FieldValue, RawFormInput, RiskLevel};
use crate::ports::{ScoringService, StatsSource};

use super::ui::{
    dashboard::{render_dashboard, DashboardView},
    form::{cycle_option, render_form, typed, FormScreenState, FormView},
    insights::{render_insights, InsightsState},
    model::render_model,
    render_disclaimer,
};
use super::worker::{Worker, WorkerEvent};

/// Current screen/view in the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Dashboard,
    Form,
    Insights,
    Model,
}

/// Main application state
pub struct App<P = HttpScoringClient, T = HttpScoringClient>
where
    P: ScoringService + 'static,
    T: StatsSource + 'static,
{
    screen: Screen,
    should_quit: bool,

    /// Shown on the dashboard
    endpoint: String,

    form: FormController<P>,
    form_screen: FormScreenState,

    /// When the in-flight prediction was sent
    submitted_at: Option<Instant>,

    last_risk: Option<RiskLevel>,

    stats: Arc<StatsFetcher<T>>,
    insights: InsightsState,

    worker: Worker,
}

impl App {
    /// Create the application with HTTP adapters for `config`.
    #[must_use]
    pub fn new(config: &AppConfig, runtime: Handle) -> Self {
        let client = Arc::new(HttpScoringClient::new(config));
        Self::with_dependencies(
            Arc::new(PredictionGateway::new(client.clone())),
            Arc::new(StatsFetcher::new(client)),
            runtime,
            config.api_base_url(),
        )
    }
}

impl<P, T> App<P, T>
where
    P: ScoringService + 'static,
    T: StatsSource + 'static,
{
    /// Create application with injected services.
    pub fn with_dependencies(
        gateway: Arc<PredictionGateway<P>>,
        stats: Arc<StatsFetcher<T>>,
        runtime: Handle,
        endpoint: &str,
    ) -> Self {
        Self {
            screen: Screen::Dashboard,
            should_quit: false,
            endpoint: endpoint.to_string(),
            form: FormController::new(gateway),
            form_screen: FormScreenState::default(),
            submitted_at: None,
            last_risk: None,
            stats,
            insights: InsightsState::default(),
            worker: Worker::new(runtime),
        }
    }

    #[must_use]
    pub fn screen(&self) -> Screen {
        self.screen
    }

    #[must_use]
    pub fn form(&self) -> &FormController<P> {
        &self.form
    }

    #[must_use]
    pub fn insights(&self) -> &InsightsState {
        &self.insights
    }

    /// Run the main application loop.
    ///
    /// # Errors
    /// Returns error if terminal operations fail.
    pub fn run(&mut self) -> Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        // Dashboard shows the active model.
        self.load_insights();

        let result = self.main_loop(&mut terminal);

        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    fn main_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
        loop {
            self.poll_worker();

            terminal.draw(|f| {
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([Constraint::Min(0), Constraint::Length(3)])
                    .split(f.area());

                let content_area = chunks[0];

                match self.screen {
                    Screen::Dashboard => render_dashboard(
                        f,
                        content_area,
                        &DashboardView {
                            endpoint: &self.endpoint,
                            insights: &self.insights,
                            last_risk: self.last_risk,
                        },
                    ),
                    Screen::Form => render_form(
                        f,
                        content_area,
                        &FormView {
                            input: self.form.input(),
                            status: self.form.status(),
                            bmi: self.form.bmi(),
                            screen: &self.form_screen,
                            waiting_secs: self.submitted_at.map(|t| t.elapsed().as_secs()),
                        },
                    ),
                    Screen::Insights => render_insights(f, content_area, &self.insights),
                    Screen::Model => render_model(f, content_area, &self.insights),
                }

                render_disclaimer(f, chunks[1]);
            })?;

            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code, key.modifiers);
                    }
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    /// Apply every finished background result.
    pub fn poll_worker(&mut self) {
        while let Some(event) = self.worker.try_recv() {
            match event {
                WorkerEvent::Prediction(completion) => {
                    if self.form.complete(completion) {
                        self.submitted_at = None;
                        if let FormStatus::ResultReady(assessment) = self.form.status() {
                            self.last_risk = Some(assessment.result.risk);
                        }
                    }
                }
                WorkerEvent::Insights(Ok(insights)) => {
                    self.insights = InsightsState::Ready(Box::new(insights));
                }
                WorkerEvent::Insights(Err(e)) => {
                    self.insights = InsightsState::Unavailable(e.to_string());
                }
            }
        }
    }

    pub fn handle_key(&mut self, key: KeyCode, modifiers: KeyModifiers) {
        if matches!(key, KeyCode::Char('c') | KeyCode::Char('q'))
            && modifiers.contains(KeyModifiers::CONTROL)
        {
            self.should_quit = true;
            return;
        }

        match self.screen {
            Screen::Dashboard => self.handle_dashboard_key(key),
            Screen::Form => self.handle_form_key(key),
            Screen::Insights | Screen::Model => self.handle_insights_key(key),
        }
    }

    fn handle_dashboard_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('p') | KeyCode::Char('P') => {
                self.form_screen = FormScreenState::default();
                self.screen = Screen::Form;
            }
            KeyCode::Char('i') | KeyCode::Char('I') => self.open_insights(Screen::Insights),
            KeyCode::Char('m') | KeyCode::Char('M') => self.open_insights(Screen::Model),
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
            }
            _ => {}
        }
    }

    fn handle_form_key(&mut self, key: KeyCode) {
        let field = self.form_screen.selected_field();
        let kind = field.kind();

        match key {
            KeyCode::Esc => {
                // Leaving discards the input and any in-flight response.
                self.form.leave();
                self.submitted_at = None;
                self.screen = Screen::Dashboard;
            }
            KeyCode::Up | KeyCode::BackTab => self.form_screen.prev_field(),
            KeyCode::Down | KeyCode::Tab => self.form_screen.next_field(),
            KeyCode::Enter => self.submit_form(),
            KeyCode::Char('r') | KeyCode::Char('R') => {
                self.form.reset();
                self.submitted_at = None;
            }
            KeyCode::Char('s') | KeyCode::Char('S') => {
                for (f, value) in sample_fields() {
                    self.form.update_field(f, value);
                }
            }
            KeyCode::Left | KeyCode::Right => {
                if let (FieldKind::Select(options), FieldValue::Text(current)) =
                    (kind, self.form.input().get(field))
                {
                    let next = cycle_option(options, &current, key == KeyCode::Right);
                    self.form.update_field(field, next);
                }
            }
            KeyCode::Char(' ') if kind == FieldKind::Toggle => {
                let on = matches!(self.form.input().get(field), FieldValue::Flag(true));
                self.form.update_field(field, !on);
            }
            KeyCode::Char(c) if kind == FieldKind::Numeric => {
                if let FieldValue::Text(current) = self.form.input().get(field) {
                    if let Some(next) = typed(&current, c) {
                        self.form.update_field(field, next);
                    }
                }
            }
            KeyCode::Backspace | KeyCode::Delete if kind == FieldKind::Numeric => {
                if let FieldValue::Text(mut current) = self.form.input().get(field) {
                    if key == KeyCode::Delete {
                        current.clear();
                    } else {
                        current.pop();
                    }
                    self.form.update_field(field, current);
                }
            }
            _ => {}
        }
    }

    fn handle_insights_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Esc => self.screen = Screen::Dashboard,
            KeyCode::Char('r') | KeyCode::Char('R') => self.load_insights(),
            KeyCode::Char('i') | KeyCode::Char('I') => self.screen = Screen::Insights,
            KeyCode::Char('m') | KeyCode::Char('M') => self.screen = Screen::Model,
            _ => {}
        }
    }

    fn open_insights(&mut self, screen: Screen) {
        if matches!(
            self.insights,
            InsightsState::NotLoaded | InsightsState::Unavailable(_)
        ) {
            self.load_insights();
        }
        self.screen = screen;
    }

    fn submit_form(&mut self) {
        match self.form.begin_submit() {
            SubmitOutcome::Ready(ticket) => {
                self.submitted_at = Some(Instant::now());
                self.worker.submit(ticket);
            }
            SubmitOutcome::AlreadySubmitting | SubmitOutcome::Rejected(_) => {}
        }
    }

    /// Start a statistics fetch unless one is already running.
    pub fn load_insights(&mut self) {
        if matches!(self.insights, InsightsState::Loading) {
            return;
        }
        self.insights = InsightsState::Loading;
        self.worker.fetch_insights(self.stats.clone());
    }
}

/// The demo patient as individual field updates.
fn sample_fields() -> impl Iterator<Item = (crate::domain::FormField, FieldValue)> {
    let sample = RawFormInput::sample();
    crate::domain::FormField::ALL
        .into_iter()
        .map(move |field| (field, sample.get(field)))
}
