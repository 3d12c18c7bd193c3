//! UI module: View components for the TUI.

pub mod form;
pub mod result;

use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::tui::styles::MedicalTheme;

pub fn render_header(f: &mut Frame, area: Rect, load_error: Option<&str>) {
    let mut spans = vec![
        Span::styled(" ", MedicalTheme::text()),
        Span::styled("Heart Disease Prediction App", MedicalTheme::title()),
    ];
    match load_error {
        Some(err) => {
            spans.push(Span::styled(" │ ", MedicalTheme::text_secondary()));
            spans.push(Span::styled(err.to_string(), MedicalTheme::danger()));
        }
        None => spans.push(Span::styled(
            " │ Decision tree classifier",
            MedicalTheme::text_secondary(),
        )),
    }

    let header = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(MedicalTheme::border()),
    );

    f.render_widget(header, area);
}

pub fn render_disclaimer(f: &mut Frame, area: Rect) {
    let text = vec![Line::from(vec![Span::styled(
        "DISCLAIMER: This tool provides indicative estimates and does not replace professional medical evaluation.",
        MedicalTheme::text_muted(),
    )])];

    let block = Block::default()
        .borders(Borders::TOP)
        .border_style(MedicalTheme::border());

    let p = Paragraph::new(text).block(block).wrap(Wrap { trim: true });

    f.render_widget(p, area);
}
