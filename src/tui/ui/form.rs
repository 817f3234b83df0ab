//! Prediction form with inline result panel.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Wrap},
    Frame,
};

use crate::application::FormStatus;
use crate::domain::metrics::BmiReading;
use crate::domain::{Assessment, FieldKind, FieldValue, FormField, RawFormInput};
use crate::tui::styles::MedicalTheme;

/// After this many seconds of waiting the panel mentions cold starts.
const SLOW_RESPONSE_SECS: u64 = 5;

/// Cursor position on the form screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FormScreenState {
    pub selected: usize,
}

impl FormScreenState {
    #[must_use]
    pub fn selected_field(&self) -> FormField {
        FormField::ALL[self.selected % FormField::ALL.len()]
    }

    pub fn next_field(&mut self) {
        self.selected = (self.selected + 1) % FormField::ALL.len();
    }

    pub fn prev_field(&mut self) {
        if self.selected == 0 {
            self.selected = FormField::ALL.len() - 1;
        } else {
            self.selected -= 1;
        }
    }
}

/// Text after typing `c` into a numeric field, or `None` if `c` is not
/// accepted there.
#[must_use]
pub fn typed(current: &str, c: char) -> Option<String> {
    if c.is_ascii_digit() || c == '.' || c == '-' {
        let mut next = current.to_string();
        next.push(c);
        Some(next)
    } else {
        None
    }
}

/// Neighbouring option of `current` in `options`.
///
/// An unset or unknown value moves to the first (forward) or last option.
#[must_use]
pub fn cycle_option(options: &'static [&'static str], current: &str, forward: bool) -> &'static str {
    let Some(last) = options.len().checked_sub(1) else {
        return "";
    };
    let next = match options.iter().position(|o| *o == current) {
        Some(i) if forward => (i + 1) % options.len(),
        Some(0) => last,
        Some(i) => i - 1,
        None if forward => 0,
        None => last,
    };
    options[next]
}

/// Everything the form screen renders.
pub struct FormView<'a> {
    pub input: &'a RawFormInput,
    pub status: &'a FormStatus,
    pub bmi: Option<BmiReading>,
    pub screen: &'a FormScreenState,
    /// Seconds since the pending request was sent
    pub waiting_secs: Option<u64>,
}

/// Render the prediction form
pub fn render_form(f: &mut Frame, area: Rect, view: &FormView<'_>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Form + result
            Constraint::Length(3), // Footer/error
        ])
        .split(area);

    render_form_header(f, chunks[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(chunks[1]);

    render_form_fields(f, body[0], view);
    render_result_panel(f, body[1], view);
    render_form_footer(f, chunks[2], view.status);
}

fn render_form_header(f: &mut Frame, area: Rect) {
    let header = Paragraph::new(Line::from(vec![
        Span::styled(" ", MedicalTheme::text()),
        Span::styled("Risk Assessment", MedicalTheme::title()),
        Span::styled(
            " │ Cardiovascular disease screening",
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

fn render_form_fields(f: &mut Frame, area: Rect, view: &FormView<'_>) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .margin(1)
        .split(area);

    let mid = FormField::ALL.len().div_ceil(2);
    let selected = view.screen.selected;

    render_field_column(f, columns[0], &FormField::ALL[..mid], 0, selected, view.input);
    render_field_column(f, columns[1], &FormField::ALL[mid..], mid, selected, view.input);
}

fn render_field_column(
    f: &mut Frame,
    area: Rect,
    fields: &[FormField],
    offset: usize,
    selected: usize,
    input: &RawFormInput,
) {
    let constraints: Vec<Constraint> = fields
        .iter()
        .map(|_| Constraint::Length(3))
        .chain(std::iter::once(Constraint::Min(0)))
        .collect();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    for (i, field) in fields.iter().enumerate() {
        let is_selected = offset + i == selected;
        let (border_style, title_style) = if is_selected {
            (MedicalTheme::border_focused(), MedicalTheme::focused())
        } else {
            (MedicalTheme::border(), MedicalTheme::text_secondary())
        };

        let block = Block::default()
            .title(Span::styled(format!(" {} ", field.label()), title_style))
            .borders(Borders::ALL)
            .border_style(border_style);

        let mut spans = vec![Span::raw(" ")];
        spans.extend(field_spans(*field, input, is_selected));

        f.render_widget(Paragraph::new(Line::from(spans)).block(block), chunks[i]);
    }
}

fn field_spans(field: FormField, input: &RawFormInput, is_selected: bool) -> Vec<Span<'static>> {
    match (field.kind(), input.get(field)) {
        (FieldKind::Numeric, FieldValue::Text(value)) => {
            let mut spans = if value.is_empty() {
                vec![Span::styled(field.hint(), MedicalTheme::text_muted())]
            } else {
                vec![Span::styled(value, MedicalTheme::text())]
            };
            if is_selected {
                spans.push(Span::styled("▌", MedicalTheme::cursor()));
            }
            spans
        }
        (FieldKind::Select(options), FieldValue::Text(value)) => {
            let mut spans = Vec::with_capacity(options.len() * 2);
            for option in options {
                let style = if *option == value {
                    MedicalTheme::selected()
                } else {
                    MedicalTheme::text_muted()
                };
                spans.push(Span::styled(format!(" {option} "), style));
                spans.push(Span::raw(" "));
            }
            if is_selected {
                spans.push(Span::styled("◀ ▶", MedicalTheme::cursor()));
            }
            spans
        }
        (_, value) => {
            let on = matches!(value, FieldValue::Flag(true));
            let mut spans = vec![if on {
                Span::styled("[x] Yes", MedicalTheme::text())
            } else {
                Span::styled("[ ] No", MedicalTheme::text_secondary())
            }];
            if is_selected {
                spans.push(Span::styled("  [Space]", MedicalTheme::cursor()));
            }
            spans
        }
    }
}

fn render_result_panel(f: &mut Frame, area: Rect, view: &FormView<'_>) {
    let block = Block::default()
        .title(Span::styled(" Result ", MedicalTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(match view.status {
            FormStatus::ResultReady(_) => MedicalTheme::border_focused(),
            _ => MedicalTheme::border(),
        })
        .title_bottom(bmi_line(view.bmi));

    let inner = block.inner(area);
    f.render_widget(block, area);

    match view.status {
        FormStatus::ResultReady(assessment) => render_assessment(f, inner, assessment),
        FormStatus::Submitting => render_waiting(f, inner, view.waiting_secs.unwrap_or(0)),
        FormStatus::Idle | FormStatus::Failed(_) => render_prompt(f, inner),
    }
}

fn bmi_line(bmi: Option<BmiReading>) -> Line<'static> {
    match bmi {
        Some(reading) => Line::from(vec![
            Span::styled(" BMI: ", MedicalTheme::text_secondary()),
            Span::styled(format!("{} ", reading.display()), MedicalTheme::text()),
        ]),
        None => Line::from(Span::styled(" BMI: n/a ", MedicalTheme::text_muted())),
    }
}

fn render_prompt(f: &mut Frame, area: Rect) {
    let content = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            "Fill in the form and press [Enter]",
            MedicalTheme::text_secondary(),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Age in years, height in cm, weight in kg",
            MedicalTheme::text_muted(),
        )),
    ])
    .alignment(Alignment::Center);

    f.render_widget(content, area);
}

fn render_waiting(f: &mut Frame, area: Rect, waiting_secs: u64) {
    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled("Analyzing...", MedicalTheme::focused())),
        Line::from(Span::styled(
            format!("{waiting_secs}s"),
            MedicalTheme::text_muted(),
        )),
    ];
    if waiting_secs >= SLOW_RESPONSE_SECS {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "The service may be waking up; this can take up to a minute.",
            MedicalTheme::text_muted(),
        )));
    }

    let content = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    f.render_widget(content, area);
}

fn render_assessment(f: &mut Frame, area: Rect, assessment: &Assessment) {
    let result = &assessment.result;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Risk level
            Constraint::Length(3), // Probability
            Constraint::Min(0),    // Details
        ])
        .margin(1)
        .split(area);

    let risk_style = MedicalTheme::risk_level(result.risk);
    let risk_display = Paragraph::new(vec![
        Line::from(Span::styled(
            format!("{} RISK", result.risk),
            risk_style.add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            result.risk.recommendation(),
            MedicalTheme::text_secondary(),
        )),
    ])
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true });
    f.render_widget(risk_display, chunks[0]);

    let pct = result.probability_percent();
    let prob_gauge = Gauge::default()
        .block(
            Block::default()
                .title(Span::styled(" Probability ", MedicalTheme::text_secondary()))
                .borders(Borders::ALL)
                .border_style(MedicalTheme::border()),
        )
        .gauge_style(risk_style)
        .percent(pct.round() as u16)
        .label(format!("{pct:.1}%"));
    f.render_widget(prob_gauge, chunks[1]);

    let mut details = vec![Line::from("")];
    if let Some(metrics) = &result.model_metrics {
        details.push(Line::from(vec![
            Span::styled("Model: ", MedicalTheme::text_secondary()),
            Span::styled(metrics.model_name.clone(), MedicalTheme::text()),
            Span::styled(
                format!("  acc {:.1}%", metrics.accuracy * 100.0),
                MedicalTheme::text_muted(),
            ),
        ]));
    }
    details.push(Line::from(Span::styled(
        result.general_info.clone(),
        MedicalTheme::text_muted(),
    )));
    details.push(Line::from(""));
    details.push(Line::from(Span::styled(
        format!("Received {}", assessment.received_at.format("%H:%M:%S UTC")),
        MedicalTheme::text_muted(),
    )));

    f.render_widget(Paragraph::new(details).wrap(Wrap { trim: true }), chunks[2]);
}

fn render_form_footer(f: &mut Frame, area: Rect, status: &FormStatus) {
    let content = if let FormStatus::Failed(err) = status {
        Line::from(vec![
            Span::styled("! ", MedicalTheme::danger()),
            Span::styled(err.user_message(), MedicalTheme::danger()),
            Span::styled("  [Enter] ", MedicalTheme::key_hint()),
            Span::styled("Retry", MedicalTheme::key_desc()),
        ])
    } else {
        Line::from(vec![
            Span::styled("[↑↓] ", MedicalTheme::key_hint()),
            Span::styled("Navigate ", MedicalTheme::key_desc()),
            Span::styled("[←→/Space] ", MedicalTheme::key_hint()),
            Span::styled("Choose ", MedicalTheme::key_desc()),
            Span::styled("[Enter] ", MedicalTheme::key_hint()),
            Span::styled("Submit ", MedicalTheme::key_desc()),
            Span::styled("[R] ", MedicalTheme::key_hint()),
            Span::styled("Clear result ", MedicalTheme::key_desc()),
            Span::styled("[S] ", MedicalTheme::key_hint()),
            Span::styled("Sample ", MedicalTheme::key_desc()),
            Span::styled("[Esc] ", MedicalTheme::key_hint()),
            Span::styled("Back", MedicalTheme::key_desc()),
        ])
    };

    let footer = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(MedicalTheme::border()),
    );

    f.render_widget(footer, area);
}
