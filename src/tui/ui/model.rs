//! Active model details: confusion matrix, derived rates, hyperparameters.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::application::ModelInsights;
use crate::domain::metrics::format_one_decimal;
use crate::tui::styles::MedicalTheme;

use super::insights::{render_footer, render_header, render_status, InsightsState};

pub fn render_model(f: &mut Frame, area: Rect, state: &InsightsState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(area);

    render_header(f, chunks[0], "Model Details", " │ How the active model performs");
    match state {
        InsightsState::Ready(insights) => render_content(f, chunks[1], insights),
        other => render_status(f, chunks[1], other),
    }
    render_footer(f, chunks[2], "[I] ", "Insights ");
}

fn render_content(f: &mut Frame, area: Rect, insights: &ModelInsights) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .margin(1)
        .split(area);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(8), Constraint::Min(0)])
        .split(columns[0]);

    render_confusion_matrix(f, left[0], insights);
    render_rates(f, left[1], insights);
    render_hyperparameters(f, columns[1], insights);
}

fn render_confusion_matrix(f: &mut Frame, area: Rect, insights: &ModelInsights) {
    let m = &insights.snapshot.active_model_details.confusion_matrix;
    let cell = |label: &'static str, value: u64, good: bool| {
        vec![
            Span::styled(format!("{label:<16}"), MedicalTheme::text_secondary()),
            Span::styled(
                format!("{value:>8}"),
                if good {
                    MedicalTheme::success()
                } else {
                    MedicalTheme::danger()
                },
            ),
        ]
    };

    let header = Line::from(vec![
        Span::styled(format!("{:<18}", ""), MedicalTheme::text_muted()),
        Span::styled("predicted no       predicted yes", MedicalTheme::text_muted()),
    ]);
    let mut actual_no = vec![Span::styled("actual no   ", MedicalTheme::text_muted())];
    actual_no.extend(cell("true negative", m.true_negatives(), true));
    actual_no.extend(cell("  false positive", m.false_positives(), false));
    let mut actual_yes = vec![Span::styled("actual yes  ", MedicalTheme::text_muted())];
    actual_yes.extend(cell("false negative", m.false_negatives(), false));
    actual_yes.extend(cell("  true positive", m.true_positives(), true));

    let lines = vec![
        header,
        Line::from(actual_no),
        Line::from(actual_yes),
        Line::from(""),
        Line::from(vec![
            Span::styled("Total cases: ", MedicalTheme::text_secondary()),
            Span::styled(m.total().to_string(), MedicalTheme::text()),
        ]),
    ];

    let block = Block::default()
        .title(Span::styled(" Confusion Matrix ", MedicalTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(MedicalTheme::border());

    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn rate_line(label: &str, value: f64, note: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{label:<10}"), MedicalTheme::text_secondary()),
        Span::styled(
            format!("{:>6}%", format_one_decimal(value)),
            MedicalTheme::score(value),
        ),
        Span::styled(format!("  {note}"), MedicalTheme::text_muted()),
    ])
}

fn render_rates(f: &mut Frame, area: Rect, insights: &ModelInsights) {
    let d = &insights.derived;
    let details = &insights.snapshot.active_model_details;

    let lines = vec![
        Line::from(vec![
            Span::styled("Active model: ", MedicalTheme::text_secondary()),
            Span::styled(details.name.clone(), MedicalTheme::focused()),
        ]),
        Line::from(""),
        rate_line("Precision", d.precision_pct, "flagged patients who were at risk"),
        rate_line("Recall", d.recall_pct, "at-risk patients who were flagged"),
        rate_line("F1", d.matrix_f1_pct, "from the matrix above"),
        rate_line("ROC AUC", d.roc_auc_pct, "ranking quality"),
        Line::from(""),
        Line::from(vec![
            Span::styled("Features analyzed: ", MedicalTheme::text_secondary()),
            Span::styled(details.metrics_analyzed.to_string(), MedicalTheme::text()),
        ]),
    ];

    let block = Block::default()
        .title(Span::styled(" Performance ", MedicalTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(MedicalTheme::border());

    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_hyperparameters(f: &mut Frame, area: Rect, insights: &ModelInsights) {
    let details = &insights.snapshot.active_model_details;
    let params = details.resolved_hyperparameters();
    let reported = details.hyperparameters.unwrap_or_default();

    let param_line = |name: &'static str, value: String, from_service: bool| {
        Line::from(vec![
            Span::styled(format!("{name:<15}"), MedicalTheme::text_secondary()),
            Span::styled(value, MedicalTheme::text()),
            if from_service {
                Span::raw("")
            } else {
                Span::styled("  (default)", MedicalTheme::text_muted())
            },
        ])
    };

    let lines = vec![
        param_line(
            "learning_rate",
            params.learning_rate.to_string(),
            reported.learning_rate.is_some(),
        ),
        param_line(
            "n_estimators",
            params.n_estimators.to_string(),
            reported.n_estimators.is_some(),
        ),
        param_line(
            "max_depth",
            params.max_depth.to_string(),
            reported.max_depth.is_some(),
        ),
        Line::from(""),
        Line::from(Span::styled(
            "Gradient boosting builds shallow trees in sequence,",
            MedicalTheme::text_muted(),
        )),
        Line::from(Span::styled(
            "each correcting the errors of the ones before it.",
            MedicalTheme::text_muted(),
        )),
    ];

    let block = Block::default()
        .title(Span::styled(" Hyperparameters ", MedicalTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(MedicalTheme::border());

    f.render_widget(Paragraph::new(lines).block(block), area);
}
