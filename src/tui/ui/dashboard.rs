//! Dashboard view: Home screen.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::domain::metrics::format_one_decimal;
use crate::domain::RiskLevel;
use crate::tui::styles::{MedicalTheme, LOGO_SMALL};

use super::insights::InsightsState;

/// Dashboard state for rendering.
pub struct DashboardView<'a> {
    pub endpoint: &'a str,
    pub insights: &'a InsightsState,
    /// Risk of the last result shown in this session
    pub last_risk: Option<RiskLevel>,
}

/// Render the main dashboard view.
pub fn render_dashboard(f: &mut Frame, area: Rect, view: &DashboardView<'_>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    render_header(f, chunks[0]);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(chunks[1]);

    render_status_panels(f, columns[0], view);
    render_about(f, columns[1]);
}

fn render_header(f: &mut Frame, area: Rect) {
    let header = Paragraph::new(Line::from(vec![
        Span::styled(" ", MedicalTheme::text()),
        Span::styled(LOGO_SMALL, MedicalTheme::title()),
        Span::styled(" │ ", MedicalTheme::text_muted()),
        Span::styled(
            "Cardiovascular Risk Assessment",
            MedicalTheme::text_secondary(),
        ),
    ]))
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(MedicalTheme::border()),
    );

    f.render_widget(header, area);
}

fn render_status_panels(f: &mut Frame, area: Rect, view: &DashboardView<'_>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(6), Constraint::Min(0)])
        .margin(1)
        .split(area);

    let model_line = match view.insights {
        InsightsState::Ready(insights) => Line::from(vec![
            Span::styled("  Model: ", MedicalTheme::text_secondary()),
            Span::styled(insights.derived.model_name.clone(), MedicalTheme::text()),
            Span::styled(
                format!(" ({}% acc)", format_one_decimal(insights.derived.accuracy_pct)),
                MedicalTheme::text_muted(),
            ),
        ]),
        InsightsState::Loading => Line::from(vec![
            Span::styled("  Model: ", MedicalTheme::text_secondary()),
            Span::styled("loading...", MedicalTheme::text_muted()),
        ]),
        InsightsState::Unavailable(_) => Line::from(vec![
            Span::styled("  Model: ", MedicalTheme::text_secondary()),
            Span::styled("unavailable", MedicalTheme::danger()),
        ]),
        InsightsState::NotLoaded => Line::from(vec![
            Span::styled("  Model: ", MedicalTheme::text_secondary()),
            Span::styled("not loaded", MedicalTheme::text_muted()),
        ]),
    };

    let last = match view.last_risk {
        Some(level) => Span::styled(level.to_string(), MedicalTheme::risk_level(level)),
        None => Span::styled("none yet", MedicalTheme::text_muted()),
    };

    let status_items = vec![
        Line::from(vec![
            Span::styled("  Service: ", MedicalTheme::text_secondary()),
            Span::styled(view.endpoint.to_string(), MedicalTheme::text()),
        ]),
        model_line,
        Line::from(vec![
            Span::styled("  Last result: ", MedicalTheme::text_secondary()),
            last,
        ]),
    ];

    let status_block = Block::default()
        .title(Span::styled(" Status ", MedicalTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(MedicalTheme::border());

    f.render_widget(Paragraph::new(status_items).block(status_block), chunks[0]);

    let actions = vec![
        Line::from(vec![
            Span::styled("[P] ", MedicalTheme::key_hint()),
            Span::styled("Check your risk", MedicalTheme::key_desc()),
        ]),
        Line::from(vec![
            Span::styled("[I] ", MedicalTheme::key_hint()),
            Span::styled("Model insights", MedicalTheme::key_desc()),
        ]),
        Line::from(vec![
            Span::styled("[M] ", MedicalTheme::key_hint()),
            Span::styled("Model details", MedicalTheme::key_desc()),
        ]),
        Line::from(vec![
            Span::styled("[Q] ", MedicalTheme::key_hint()),
            Span::styled("Quit", MedicalTheme::key_desc()),
        ]),
    ];

    let actions_block = Block::default()
        .title(Span::styled(" Quick Actions ", MedicalTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(MedicalTheme::border());

    f.render_widget(Paragraph::new(actions).block(actions_block), chunks[1]);
}

fn render_about(f: &mut Frame, area: Rect) {
    let block = Block::default()
        .title(Span::styled(" Why Early Detection Matters ", MedicalTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(MedicalTheme::border());

    let lines = vec![
        Line::from(Span::styled(
            "Cardiovascular disease is the leading cause of death worldwide.",
            MedicalTheme::text(),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Most risk factors (blood pressure, cholesterol, glucose, weight, smoking) can be managed once they are known.",
            MedicalTheme::text_secondary(),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Enter a few routine measurements to get an estimate from a model trained on 70,000 patient records.",
            MedicalTheme::text_secondary(),
        )),
    ];

    f.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: true }),
        area,
    );
}
