//! Clinical input form.
//!
//! Numeric fields are typed in; categorical fields cycle through their
//! closed option lists, so only listed categories can ever be submitted.

use std::ops::RangeInclusive;

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::domain::{
    Categorical, ChestPainType, ExerciseAngina, FastingBloodSugar, Gender, MajorVessels,
    RawInput, RestingEcg, Slope, Thalassemia, AGE_RANGE, CHOLESTEROL_RANGE, MAX_HEART_RATE_RANGE,
    RESTING_BP_RANGE, ST_DEPRESSION_RANGE,
};
use crate::tui::styles::MedicalTheme;

/// Identifies a form field independently of its position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldId {
    Age,
    Gender,
    ChestPainType,
    RestingBloodPressure,
    Cholesterol,
    FastingBloodSugar,
    RestingEcg,
    MaxHeartRate,
    ExerciseAngina,
    StDepression,
    Slope,
    MajorVessels,
    Thalassemia,
}

/// Widget behind a field.
#[derive(Debug, Clone)]
pub enum FieldKind {
    /// Free-text number constrained to `min..=max`.
    Number {
        value: String,
        min: f64,
        max: f64,
        integer: bool,
    },
    /// Closed choice list.
    Choice {
        options: Vec<&'static str>,
        selected: usize,
    },
}

/// Form field definition
#[derive(Debug, Clone)]
pub struct FormField {
    pub id: FieldId,
    pub label: &'static str,
    pub kind: FieldKind,
}

impl FormField {
    fn integer(id: FieldId, label: &'static str, range: &RangeInclusive<u32>, value: u32) -> Self {
        Self {
            id,
            label,
            kind: FieldKind::Number {
                value: value.to_string(),
                min: f64::from(*range.start()),
                max: f64::from(*range.end()),
                integer: true,
            },
        }
    }

    fn float(id: FieldId, label: &'static str, range: &RangeInclusive<f64>, value: f64) -> Self {
        Self {
            id,
            label,
            kind: FieldKind::Number {
                value: format!("{value:.1}"),
                min: *range.start(),
                max: *range.end(),
                integer: false,
            },
        }
    }

    fn choice<T: Categorical + PartialEq>(id: FieldId, label: &'static str, value: T) -> Self {
        Self {
            id,
            label,
            kind: FieldKind::Choice {
                options: T::OPTIONS.iter().map(|o| o.label()).collect(),
                selected: value.position(),
            },
        }
    }

    /// Text shown for the current value.
    #[must_use]
    pub fn display_value(&self) -> &str {
        match &self.kind {
            FieldKind::Number { value, .. } => value.as_str(),
            FieldKind::Choice { options, selected } => {
                options.get(*selected).copied().unwrap_or_default()
            }
        }
    }
}

/// Form state
pub struct FormState {
    pub fields: Vec<FormField>,
    pub selected_field: usize,
    pub error_message: Option<String>,
}

impl Default for FormState {
    fn default() -> Self {
        Self::from_raw(&RawInput::default())
    }
}

impl FormState {
    /// Build a form pre-filled with `raw`.
    #[must_use]
    pub fn from_raw(raw: &RawInput) -> Self {
        Self {
            fields: vec![
                FormField::integer(FieldId::Age, "Age", &AGE_RANGE, raw.age),
                FormField::choice(FieldId::Gender, "Gender", raw.gender),
                FormField::choice(
                    FieldId::ChestPainType,
                    "Chest Pain Type",
                    raw.chest_pain_type,
                ),
                FormField::integer(
                    FieldId::RestingBloodPressure,
                    "Resting Blood Pressure",
                    &RESTING_BP_RANGE,
                    raw.resting_blood_pressure,
                ),
                FormField::integer(
                    FieldId::Cholesterol,
                    "Cholesterol",
                    &CHOLESTEROL_RANGE,
                    raw.cholesterol,
                ),
                FormField::choice(
                    FieldId::FastingBloodSugar,
                    "Fasting Blood Sugar",
                    raw.fasting_blood_sugar,
                ),
                FormField::choice(FieldId::RestingEcg, "Resting ECG", raw.resting_ecg),
                FormField::integer(
                    FieldId::MaxHeartRate,
                    "Max Heart Rate",
                    &MAX_HEART_RATE_RANGE,
                    raw.max_heart_rate,
                ),
                FormField::choice(
                    FieldId::ExerciseAngina,
                    "Exercise Angina",
                    raw.exercise_angina,
                ),
                FormField::float(
                    FieldId::StDepression,
                    "ST Depression",
                    &ST_DEPRESSION_RANGE,
                    raw.st_depression,
                ),
                FormField::choice(FieldId::Slope, "Slope", raw.slope),
                FormField::choice(
                    FieldId::MajorVessels,
                    "Number of Major Vessels",
                    raw.number_of_major_vessels,
                ),
                FormField::choice(FieldId::Thalassemia, "Thalassemia", raw.thalassemia),
            ],
            selected_field: 0,
            error_message: None,
        }
    }

    /// Move to the next field
    pub fn next_field(&mut self) {
        self.selected_field = (self.selected_field + 1) % self.fields.len();
    }

    /// Move to the previous field
    pub fn prev_field(&mut self) {
        if self.selected_field == 0 {
            self.selected_field = self.fields.len() - 1;
        } else {
            self.selected_field -= 1;
        }
    }

    /// Cycle the current choice field forward (`step = 1`) or back (`step = -1`).
    ///
    /// Returns whether the field value changed.
    pub fn cycle_choice(&mut self, step: isize) -> bool {
        let FieldKind::Choice { options, selected } = &mut self.fields[self.selected_field].kind
        else {
            return false;
        };
        let len = options.len() as isize;
        let next = (*selected as isize + step).rem_euclid(len) as usize;
        if next == *selected {
            return false;
        }
        *selected = next;
        self.error_message = None;
        true
    }

    /// Add a character to the current numeric field.
    ///
    /// Returns whether the field value changed.
    pub fn input_char(&mut self, c: char) -> bool {
        let FieldKind::Number { value, integer, .. } = &mut self.fields[self.selected_field].kind
        else {
            return false;
        };
        if !(c.is_ascii_digit() || (c == '.' && !*integer && !value.contains('.'))) {
            return false;
        }
        value.push(c);
        self.error_message = None;
        true
    }

    /// Delete the last character.
    ///
    /// Returns whether the field value changed.
    pub fn delete_char(&mut self) -> bool {
        let FieldKind::Number { value, .. } = &mut self.fields[self.selected_field].kind else {
            return false;
        };
        if value.pop().is_none() {
            return false;
        }
        self.error_message = None;
        true
    }

    /// Clear the current field.
    ///
    /// Returns whether the field value changed.
    pub fn clear_field(&mut self) -> bool {
        let FieldKind::Number { value, .. } = &mut self.fields[self.selected_field].kind else {
            return false;
        };
        if value.is_empty() {
            return false;
        }
        value.clear();
        self.error_message = None;
        true
    }

    /// Validate and convert to a `RawInput`
    pub fn to_raw_input(&self) -> Result<RawInput, String> {
        Ok(RawInput {
            age: self.integer(FieldId::Age)?,
            gender: self.choice::<Gender>(FieldId::Gender)?,
            chest_pain_type: self.choice::<ChestPainType>(FieldId::ChestPainType)?,
            resting_blood_pressure: self.integer(FieldId::RestingBloodPressure)?,
            cholesterol: self.integer(FieldId::Cholesterol)?,
            fasting_blood_sugar: self.choice::<FastingBloodSugar>(FieldId::FastingBloodSugar)?,
            resting_ecg: self.choice::<RestingEcg>(FieldId::RestingEcg)?,
            max_heart_rate: self.integer(FieldId::MaxHeartRate)?,
            exercise_angina: self.choice::<ExerciseAngina>(FieldId::ExerciseAngina)?,
            st_depression: self.number(FieldId::StDepression)?,
            slope: self.choice::<Slope>(FieldId::Slope)?,
            number_of_major_vessels: self.choice::<MajorVessels>(FieldId::MajorVessels)?,
            thalassemia: self.choice::<Thalassemia>(FieldId::Thalassemia)?,
        })
    }

    /// Load sample data (Cleveland record #1)
    pub fn load_sample_data(&mut self) {
        let sample = RawInput {
            age: 63,
            gender: Gender::Male,
            chest_pain_type: ChestPainType::TypicalAngina,
            resting_blood_pressure: 145,
            cholesterol: 233,
            fasting_blood_sugar: FastingBloodSugar::Above120,
            resting_ecg: RestingEcg::Normal,
            max_heart_rate: 150,
            exercise_angina: ExerciseAngina::No,
            st_depression: 2.3,
            slope: Slope::Downsloping,
            number_of_major_vessels: MajorVessels::Zero,
            thalassemia: Thalassemia::FixedDefect,
        };
        let selected = self.selected_field;
        *self = Self::from_raw(&sample);
        self.selected_field = selected;
    }

    fn field(&self, id: FieldId) -> Result<&FormField, String> {
        self.fields
            .iter()
            .find(|f| f.id == id)
            .ok_or_else(|| format!("{id:?}: missing field"))
    }

    fn number(&self, id: FieldId) -> Result<f64, String> {
        let field = self.field(id)?;
        let FieldKind::Number { value, min, max, .. } = &field.kind else {
            return Err(format!("{}: not a numeric field", field.label));
        };

        let parsed: f64 = value
            .parse()
            .map_err(|_| format!("{}: Invalid number", field.label))?;
        if !(*min..=*max).contains(&parsed) {
            return Err(format!(
                "{}: Value must be between {} and {}",
                field.label, min, max
            ));
        }
        Ok(parsed)
    }

    fn integer(&self, id: FieldId) -> Result<u32, String> {
        let value = self.number(id)?;
        if value.fract() != 0.0 {
            let label = self.field(id)?.label;
            return Err(format!("{label}: Must be a whole number"));
        }
        Ok(value as u32)
    }

    fn choice<T: Categorical>(&self, id: FieldId) -> Result<T, String> {
        let field = self.field(id)?;
        match &field.kind {
            FieldKind::Choice { selected, .. } => T::OPTIONS
                .get(*selected)
                .copied()
                .ok_or_else(|| format!("{}: Invalid option", field.label)),
            FieldKind::Number { .. } => Err(format!("{}: not a choice field", field.label)),
        }
    }
}

/// Render the input form
pub fn render_form(f: &mut Frame, area: Rect, state: &FormState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Fields
            Constraint::Length(3), // Footer/error
        ])
        .split(area);

    render_form_fields(f, chunks[0], state);
    render_form_footer(f, chunks[1], state);
}

fn render_form_fields(f: &mut Frame, area: Rect, state: &FormState) {
    let label_width = state
        .fields
        .iter()
        .map(|field| field.label.len())
        .max()
        .unwrap_or(0);

    let lines: Vec<Line> = state
        .fields
        .iter()
        .enumerate()
        .map(|(i, field)| {
            let is_selected = i == state.selected_field;
            let marker = if is_selected { "▌ " } else { "  " };
            let label_style = if is_selected {
                MedicalTheme::focused()
            } else {
                MedicalTheme::text_secondary()
            };
            let value = match &field.kind {
                FieldKind::Choice { .. } if is_selected => {
                    format!("◀ {} ▶", field.display_value())
                }
                _ => field.display_value().to_string(),
            };

            Line::from(vec![
                Span::styled(marker, MedicalTheme::focused()),
                Span::styled(format!("{:<label_width$}  ", field.label), label_style),
                Span::styled(value, MedicalTheme::text()),
            ])
        })
        .collect();

    let form = Paragraph::new(lines).block(
        Block::default()
            .title(Span::styled(" User Input Features ", MedicalTheme::subtitle()))
            .borders(Borders::ALL)
            .border_style(MedicalTheme::border_focused()),
    );

    f.render_widget(form, area);
}

fn render_form_footer(f: &mut Frame, area: Rect, state: &FormState) {
    let content = if let Some(err) = &state.error_message {
        Line::from(vec![
            Span::styled("! ", MedicalTheme::danger()),
            Span::styled(err.clone(), MedicalTheme::danger()),
        ])
    } else {
        Line::from(vec![
            Span::styled("[↑↓] ", MedicalTheme::key_hint()),
            Span::styled("Navigate ", MedicalTheme::key_desc()),
            Span::styled("[←→] ", MedicalTheme::key_hint()),
            Span::styled("Choose ", MedicalTheme::key_desc()),
            Span::styled("[Enter] ", MedicalTheme::key_hint()),
            Span::styled("Predict ", MedicalTheme::key_desc()),
            Span::styled("[S] ", MedicalTheme::key_hint()),
            Span::styled("Sample ", MedicalTheme::key_desc()),
            Span::styled("[R] ", MedicalTheme::key_hint()),
            Span::styled("Reset ", MedicalTheme::key_desc()),
            Span::styled("[Esc] ", MedicalTheme::key_hint()),
            Span::styled("Quit", MedicalTheme::key_desc()),
        ])
    };

    let footer = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(MedicalTheme::border()),
    );

    f.render_widget(footer, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn select(state: &mut FormState, id: FieldId) {
        state.selected_field = state
            .fields
            .iter()
            .position(|f| f.id == id)
            .expect("field exists");
    }

    #[test]
    fn test_default_form_round_trips_defaults() {
        let state = FormState::default();
        assert_eq!(state.fields.len(), 13);
        assert_eq!(state.to_raw_input(), Ok(RawInput::default()));
    }

    #[test]
    fn test_choice_cycling_wraps() {
        let mut state = FormState::default();
        select(&mut state, FieldId::ChestPainType);

        state.cycle_choice(-1);
        let raw = state.to_raw_input().expect("valid");
        assert_eq!(raw.chest_pain_type, ChestPainType::Asymptomatic);

        state.cycle_choice(1);
        state.cycle_choice(1);
        let raw = state.to_raw_input().expect("valid");
        assert_eq!(raw.chest_pain_type, ChestPainType::AtypicalAngina);
    }

    #[test]
    fn test_numeric_entry() {
        let mut state = FormState::default();
        select(&mut state, FieldId::Age);
        state.clear_field();
        for c in "55".chars() {
            state.input_char(c);
        }
        // Letters and a decimal point are ignored on integer fields.
        state.input_char('x');
        state.input_char('.');
        assert_eq!(state.to_raw_input().expect("valid").age, 55);

        select(&mut state, FieldId::StDepression);
        state.clear_field();
        for c in "2.3.".chars() {
            state.input_char(c);
        }
        assert!((state.to_raw_input().expect("valid").st_depression - 2.3).abs() < f64::EPSILON);
    }

    #[test]
    fn test_out_of_range_and_empty_fields() {
        let mut state = FormState::default();
        select(&mut state, FieldId::MaxHeartRate);
        state.clear_field();
        state.input_char('5');
        let err = state.to_raw_input().expect_err("below 60");
        assert!(err.starts_with("Max Heart Rate"));

        state.clear_field();
        let err = state.to_raw_input().expect_err("empty");
        assert_eq!(err, "Max Heart Rate: Invalid number");
    }

    #[test]
    fn test_typing_on_choice_field_is_ignored() {
        let mut state = FormState::default();
        select(&mut state, FieldId::Gender);
        assert!(!state.input_char('1'));
        assert!(!state.delete_char());
        assert!(!state.clear_field());
        assert_eq!(state.fields[state.selected_field].display_value(), "Male");
    }

    #[test]
    fn test_edits_report_changes_and_clear_error() {
        let mut state = FormState::default();
        select(&mut state, FieldId::Age);

        state.error_message = Some("Age: Value must be between 0 and 120".into());
        assert!(state.delete_char());
        assert!(state.error_message.is_none());

        state.error_message = Some("stale".into());
        assert!(state.clear_field());
        assert!(state.error_message.is_none());
        assert!(!state.clear_field());
        assert!(!state.delete_char());

        assert!(!state.input_char('x'));
        assert!(state.input_char('4'));

        select(&mut state, FieldId::Gender);
        state.error_message = Some("stale".into());
        assert!(state.cycle_choice(1));
        assert!(state.error_message.is_none());

        // Numeric fields have no choices to cycle.
        select(&mut state, FieldId::Cholesterol);
        assert!(!state.cycle_choice(1));
    }

    #[test]
    fn test_sample_data_keeps_selection() {
        let mut state = FormState::default();
        select(&mut state, FieldId::Slope);
        let selected = state.selected_field;
        state.load_sample_data();

        assert_eq!(state.selected_field, selected);
        let raw = state.to_raw_input().expect("valid");
        assert_eq!(raw.age, 63);
        assert_eq!(raw.slope, Slope::Downsloping);
        assert_eq!(raw.thalassemia, Thalassemia::FixedDefect);
    }

    #[test]
    fn test_navigation_wraps() {
        let mut state = FormState::default();
        state.prev_field();
        assert_eq!(state.selected_field, 12);
        state.next_field();
        assert_eq!(state.selected_field, 0);
    }
}
