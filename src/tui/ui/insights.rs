//! Model insights view: dataset overview, leaderboard and feature importance.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};

use crate::application::ModelInsights;
use crate::domain::metrics::{format_one_decimal, to_percent, FEATURE_IMPORTANCE};
use crate::tui::styles::MedicalTheme;

/// Load state of the statistics snapshot, shared by the insights and model
/// screens.
#[derive(Debug, Clone, Default)]
pub enum InsightsState {
    #[default]
    NotLoaded,
    Loading,
    Ready(Box<ModelInsights>),
    Unavailable(String),
}

impl InsightsState {
    #[must_use]
    pub fn insights(&self) -> Option<&ModelInsights> {
        match self {
            Self::Ready(insights) => Some(insights),
            _ => None,
        }
    }
}

/// Render the insights view
pub fn render_insights(f: &mut Frame, area: Rect, state: &InsightsState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Content
            Constraint::Length(3), // Footer
        ])
        .split(area);

    render_header(f, chunks[0], "Model Insights", " │ Training data and model comparison");
    match state {
        InsightsState::Ready(insights) => render_content(f, chunks[1], insights),
        other => render_status(f, chunks[1], other),
    }
    render_footer(f, chunks[2], "[M] ", "Model details ");
}

pub(super) fn render_header(f: &mut Frame, area: Rect, title: &str, subtitle: &str) {
    let header = Paragraph::new(Line::from(vec![
        Span::styled(" ", MedicalTheme::text()),
        Span::styled(title.to_string(), MedicalTheme::title()),
        Span::styled(subtitle.to_string(), MedicalTheme::text_secondary()),
    ]))
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(MedicalTheme::border()),
    );

    f.render_widget(header, area);
}

/// Loading, not-loaded and unavailable states.
pub(super) fn render_status(f: &mut Frame, area: Rect, state: &InsightsState) {
    let (lines, border) = match state {
        InsightsState::Unavailable(message) => (
            vec![
                Line::from(""),
                Line::from(Span::styled("! Metrics Unavailable", MedicalTheme::danger())),
                Line::from(""),
                Line::from(Span::styled(message.clone(), MedicalTheme::text())),
                Line::from(""),
                Line::from(Span::styled("Press [R] to retry", MedicalTheme::text_secondary())),
            ],
            MedicalTheme::danger(),
        ),
        InsightsState::Loading => (
            vec![
                Line::from(""),
                Line::from(Span::styled("Loading statistics...", MedicalTheme::text_muted())),
            ],
            MedicalTheme::border(),
        ),
        _ => (
            vec![
                Line::from(""),
                Line::from(Span::styled("No statistics loaded", MedicalTheme::text_muted())),
                Line::from(""),
                Line::from(Span::styled("Press [R] to load", MedicalTheme::text_secondary())),
            ],
            MedicalTheme::border(),
        ),
    };

    let content = Paragraph::new(lines).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border),
    );

    f.render_widget(content, area);
}

fn render_content(f: &mut Frame, area: Rect, insights: &ModelInsights) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .margin(1)
        .split(area);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(7), Constraint::Min(0)])
        .split(columns[0]);

    render_overview(f, left[0], insights);
    render_leaderboard(f, left[1], insights);
    render_feature_importance(f, columns[1]);
}

fn render_overview(f: &mut Frame, area: Rect, insights: &ModelInsights) {
    let overview = &insights.snapshot.data_overview;
    let derived = &insights.derived;

    let lines = vec![
        Line::from(vec![
            Span::styled("Records: ", MedicalTheme::text_secondary()),
            Span::styled(overview.total_rows.to_string(), MedicalTheme::text()),
            Span::styled("  cleaned ", MedicalTheme::text_secondary()),
            Span::styled(overview.cleaned_rows.to_string(), MedicalTheme::text()),
            Span::styled("  removed ", MedicalTheme::text_secondary()),
            Span::styled(overview.removed_rows.to_string(), MedicalTheme::text_muted()),
        ]),
        Line::from(vec![
            Span::styled("Best model: ", MedicalTheme::text_secondary()),
            Span::styled(derived.model_name.clone(), MedicalTheme::focused()),
        ]),
        Line::from(vec![
            Span::styled("Accuracy: ", MedicalTheme::text_secondary()),
            Span::styled(
                format!("{}%", format_one_decimal(derived.accuracy_pct)),
                MedicalTheme::score(derived.accuracy_pct),
            ),
            Span::styled("  F1: ", MedicalTheme::text_secondary()),
            Span::styled(
                format!("{}%", format_one_decimal(derived.f1_pct)),
                MedicalTheme::score(derived.f1_pct),
            ),
        ]),
        Line::from(vec![
            Span::styled("Test cases: ", MedicalTheme::text_secondary()),
            Span::styled(derived.total_cases.to_string(), MedicalTheme::text()),
        ]),
    ];

    let block = Block::default()
        .title(Span::styled(" Overview ", MedicalTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(MedicalTheme::border());

    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_leaderboard(f: &mut Frame, area: Rect, insights: &ModelInsights) {
    let mut lines = Vec::with_capacity(insights.snapshot.best_models.len());
    for (rank, model) in insights.snapshot.best_models.iter().enumerate() {
        let acc = to_percent(model.accuracy);
        let f1 = to_percent(model.f1_score);
        lines.push(Line::from(vec![
            Span::styled(format!("{:>2}. ", rank + 1), MedicalTheme::text_muted()),
            Span::styled(format!("{:<24}", model.name), MedicalTheme::text()),
            Span::styled("acc ", MedicalTheme::text_secondary()),
            Span::styled(
                format!("{:>5}%", format_one_decimal(acc)),
                MedicalTheme::score(acc),
            ),
            Span::styled("  f1 ", MedicalTheme::text_secondary()),
            Span::styled(
                format!("{:>5}%", format_one_decimal(f1)),
                MedicalTheme::score(f1),
            ),
        ]));
    }
    if lines.is_empty() {
        lines.push(Line::from(Span::styled(
            "No models reported",
            MedicalTheme::text_muted(),
        )));
    }

    let block = Block::default()
        .title(Span::styled(" Model Comparison ", MedicalTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(MedicalTheme::border());

    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_feature_importance(f: &mut Frame, area: Rect) {
    let block = Block::default()
        .title(Span::styled(" Feature Importance ", MedicalTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(MedicalTheme::border());

    let inner = block.inner(area);
    f.render_widget(block, area);

    let constraints: Vec<Constraint> = FEATURE_IMPORTANCE
        .iter()
        .map(|_| Constraint::Length(2))
        .chain(std::iter::once(Constraint::Min(0)))
        .collect();
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .margin(1)
        .split(inner);

    for (i, (name, weight)) in FEATURE_IMPORTANCE.iter().enumerate() {
        let gauge = Gauge::default()
            .gauge_style(MedicalTheme::info())
            .percent(u16::from(*weight))
            .label(format!("{name} {weight}%"));
        f.render_widget(gauge, rows[i]);
    }
}

pub(super) fn render_footer(f: &mut Frame, area: Rect, other_key: &str, other_desc: &str) {
    let content = Line::from(vec![
        Span::styled("[R] ", MedicalTheme::key_hint()),
        Span::styled("Refresh ", MedicalTheme::key_desc()),
        Span::styled(other_key.to_string(), MedicalTheme::key_hint()),
        Span::styled(other_desc.to_string(), MedicalTheme::key_desc()),
        Span::styled("[Esc] ", MedicalTheme::key_hint()),
        Span::styled("Back", MedicalTheme::key_desc()),
    ]);

    let footer = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(MedicalTheme::border()),
    );

    f.render_widget(footer, area);
}
