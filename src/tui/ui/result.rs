//! Input echo and prediction view.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};

use crate::domain::{FeatureVector, PredictionResult, RawInput};
use crate::tui::styles::MedicalTheme;

/// Prediction panel state
#[derive(Debug, Clone, Default)]
pub enum ResultState {
    /// Nothing submitted yet
    #[default]
    Idle,
    /// Last submission succeeded
    Complete { result: PredictionResult },
    /// Last submission failed
    Error { message: String },
}

/// Render the encoded input echo above the prediction panel.
///
/// `echo` is the current form content, or the reason it cannot be encoded.
pub fn render_result(
    f: &mut Frame,
    area: Rect,
    echo: &Result<RawInput, String>,
    state: &ResultState,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(15), // Encoded input
            Constraint::Min(0),     // Prediction
        ])
        .split(area);

    render_echo(f, chunks[0], echo);
    render_prediction(f, chunks[1], state);
}

/// Format one encoded column for display.
fn format_feature(name: &str, value: f64) -> String {
    if name == "oldpeak" {
        format!("{value:.1}")
    } else {
        format!("{value:.0}")
    }
}

fn render_echo(f: &mut Frame, area: Rect, echo: &Result<RawInput, String>) {
    let block = Block::default()
        .title(Span::styled(" User Input ", MedicalTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(MedicalTheme::border());

    let lines: Vec<Line> = match echo {
        Ok(raw) => FeatureVector::encode(raw)
            .named()
            .map(|(name, value)| {
                Line::from(vec![
                    Span::styled(format!(" {name:<9}"), MedicalTheme::text_secondary()),
                    Span::styled(format_feature(name, value), MedicalTheme::text()),
                ])
            })
            .collect(),
        Err(message) => vec![Line::from(Span::styled(
            format!(" {message}"),
            MedicalTheme::warning(),
        ))],
    };

    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_prediction(f: &mut Frame, area: Rect, state: &ResultState) {
    match state {
        ResultState::Idle => render_idle(f, area),
        ResultState::Complete { result } => render_complete(f, area, result),
        ResultState::Error { message } => render_error(f, area, message),
    }
}

fn render_idle(f: &mut Frame, area: Rect) {
    let content = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            "Press Enter to predict",
            MedicalTheme::text_secondary(),
        )),
    ])
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .title(Span::styled(" Prediction ", MedicalTheme::subtitle()))
            .borders(Borders::ALL)
            .border_style(MedicalTheme::border()),
    );

    f.render_widget(content, area);
}

fn render_complete(f: &mut Frame, area: Rect, result: &PredictionResult) {
    let block = Block::default()
        .title(Span::styled(" Prediction ", MedicalTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(MedicalTheme::border_focused());

    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Outcome
            Constraint::Length(3), // Probability bar
            Constraint::Length(2), // Probability lines
            Constraint::Min(0),
        ])
        .split(inner);

    let outcome = result.outcome();
    let outcome_style = MedicalTheme::outcome(outcome);

    let headline = Paragraph::new(Line::from(Span::styled(
        outcome.to_string(),
        outcome_style.add_modifier(Modifier::BOLD),
    )))
    .alignment(Alignment::Center);
    f.render_widget(headline, chunks[0]);

    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(MedicalTheme::border()),
        )
        .gauge_style(outcome_style)
        .ratio(result.p_disease.clamp(0.0, 1.0))
        .label(result.disease_percent());
    f.render_widget(gauge, chunks[1]);

    let probabilities = Paragraph::new(vec![
        Line::from(vec![
            Span::styled(
                "Probability of Heart Disease: ",
                MedicalTheme::text_secondary(),
            ),
            Span::styled(result.disease_percent(), MedicalTheme::text()),
        ]),
        Line::from(vec![
            Span::styled(
                "Probability of No Heart Disease: ",
                MedicalTheme::text_secondary(),
            ),
            Span::styled(result.no_disease_percent(), MedicalTheme::text()),
        ]),
    ])
    .alignment(Alignment::Center);
    f.render_widget(probabilities, chunks[2]);
}

fn render_error(f: &mut Frame, area: Rect, message: &str) {
    let content = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled("! Error", MedicalTheme::danger())),
        Line::from(""),
        Line::from(Span::styled(message, MedicalTheme::text())),
    ])
    .alignment(Alignment::Center)
    .wrap(ratatui::widgets::Wrap { trim: true })
    .block(
        Block::default()
            .title(Span::styled(" Prediction ", MedicalTheme::subtitle()))
            .borders(Borders::ALL)
            .border_style(MedicalTheme::danger()),
    );

    f.render_widget(content, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_formatting() {
        assert_eq!(format_feature("age", 63.0), "63");
        assert_eq!(format_feature("oldpeak", 2.3), "2.3");
        assert_eq!(format_feature("oldpeak", 1.0), "1.0");
    }
}
