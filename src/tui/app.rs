//! Main TUI application.
//!
//! Handles:
//! - Input event handling
//! - Form submission through the prediction service
//! - Rendering of the single-page layout

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Once;
use std::time::Duration;

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

use crate::adapters::tree::DecisionTreeClassifier;
use crate::application::PredictionService;
use crate::config::AppConfig;
use crate::ports::Classifier;

use super::ui::{
    form::{render_form, FormState},
    render_disclaimer, render_header,
    result::{render_result, ResultState},
};

/// Main application state
pub struct App<C = DecisionTreeClassifier>
where
    C: Classifier,
{
    /// Whether the app should quit
    should_quit: bool,

    /// Prediction service (classifier loaded once at startup)
    service: PredictionService<C>,

    /// Form state
    form_state: FormState,

    /// Outcome of the last submission
    result_state: ResultState,
}

impl App<DecisionTreeClassifier> {
    /// Create a new application, loading the model from the configured path.
    ///
    /// A model that fails to load does not prevent startup: the error is shown
    /// in the header and every prediction reports it.
    #[must_use]
    pub fn new(config: &AppConfig) -> Self {
        tracing::info!("Loading model from {:?}", config.model_path);
        let service =
            PredictionService::from_load_result(DecisionTreeClassifier::load(&config.model_path));
        Self::with_service(service)
    }
}

impl<C> App<C>
where
    C: Classifier,
{
    /// Create application with an injected prediction service.
    pub fn with_service(service: PredictionService<C>) -> Self {
        Self {
            should_quit: false,
            service,
            form_state: FormState::default(),
            result_state: ResultState::default(),
        }
    }

    /// Run the main application loop.
    ///
    /// # Errors
    /// Returns error if terminal operations fail.
    pub fn run(&mut self) -> Result<()> {
        let mut session = TerminalSession::enter()?;
        self.main_loop(&mut session.terminal)
    }

    fn main_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
        loop {
            terminal.draw(|f| {
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([
                        Constraint::Length(2), // Header
                        Constraint::Min(0),    // Content
                        Constraint::Length(3), // Disclaimer
                    ])
                    .split(f.area());

                let columns = Layout::default()
                    .direction(Direction::Horizontal)
                    .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
                    .split(chunks[1]);

                render_header(f, chunks[0], self.service.load_error());
                render_form(f, columns[0], &self.form_state);
                render_result(
                    f,
                    columns[1],
                    &self.form_state.to_raw_input(),
                    &self.result_state,
                );
                render_disclaimer(f, chunks[2]);
            })?;

            if event::poll(Duration::from_millis(100))? {
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

    fn handle_key(&mut self, key: KeyCode, modifiers: KeyModifiers) {
        if key == KeyCode::Char('q') && modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        match key {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Up | KeyCode::BackTab => self.form_state.prev_field(),
            KeyCode::Down | KeyCode::Tab => self.form_state.next_field(),
            KeyCode::Left => {
                let changed = self.form_state.cycle_choice(-1);
                self.mark_edited(changed);
            }
            KeyCode::Right => {
                let changed = self.form_state.cycle_choice(1);
                self.mark_edited(changed);
            }
            KeyCode::Char('s') | KeyCode::Char('S') => {
                self.form_state.load_sample_data();
                self.mark_edited(true);
            }
            KeyCode::Char('r') | KeyCode::Char('R') => {
                self.form_state = FormState::default();
                self.mark_edited(true);
            }
            KeyCode::Char(c) => {
                let changed = self.form_state.input_char(c);
                self.mark_edited(changed);
            }
            KeyCode::Backspace => {
                let changed = self.form_state.delete_char();
                self.mark_edited(changed);
            }
            KeyCode::Delete => {
                let changed = self.form_state.clear_field();
                self.mark_edited(changed);
            }
            KeyCode::Enter => self.submit_form(),
            _ => {}
        }
    }

    /// A shown prediction belongs to the values it was made for.
    fn mark_edited(&mut self, changed: bool) {
        if changed {
            self.result_state = ResultState::Idle;
        }
    }

    /// Run one Encoder → Classifier round-trip for the current form content.
    fn submit_form(&mut self) {
        let raw = match self.form_state.to_raw_input() {
            Ok(raw) => raw,
            Err(e) => {
                self.form_state.error_message = Some(e);
                return;
            }
        };

        if let Err(errors) = raw.validate() {
            self.form_state.error_message = Some(errors.join(", "));
            return;
        }
        self.form_state.error_message = None;

        self.result_state = match self.service.predict(&raw) {
            Ok(result) => ResultState::Complete { result },
            Err(e) => ResultState::Error {
                message: e.to_string(),
            },
        };
    }
}

/// Set while the alternate screen is up; panic output then goes to the log.
static TUI_ACTIVE: AtomicBool = AtomicBool::new(false);
static PANIC_HOOK: Once = Once::new();

/// Route panic messages to `tracing` while the TUI owns the terminal.
///
/// Caught classifier panics would otherwise print over the alternate screen.
fn install_panic_hook() {
    PANIC_HOOK.call_once(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            if TUI_ACTIVE.load(Ordering::SeqCst) {
                tracing::error!("PANIC => {}", info);
            } else {
                previous(info);
            }
        }));
    });
}

/// Raw mode plus alternate screen, restored on drop (also while unwinding).
struct TerminalSession {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalSession {
    fn enter() -> Result<Self> {
        install_panic_hook();
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        if let Err(e) = execute!(stdout, EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(e.into());
        }
        let terminal = match Terminal::new(CrosstermBackend::new(stdout)) {
            Ok(terminal) => terminal,
            Err(e) => {
                let _ = disable_raw_mode();
                let _ = execute!(io::stdout(), LeaveAlternateScreen);
                return Err(e.into());
            }
        };
        TUI_ACTIVE.store(true, Ordering::SeqCst);
        Ok(Self { terminal })
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        TUI_ACTIVE.store(false, Ordering::SeqCst);
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
        if std::thread::panicking() {
            eprintln!("Cardiocheck stopped after an internal error; see the log for details.");
        }
    }
}
