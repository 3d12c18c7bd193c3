//! TUI module: Terminal User Interface using Ratatui.
//!
//! A single page holding the clinical input form, the encoded input echo and
//! the prediction panel.

mod app;
mod styles;
mod ui;

pub use app::App;
pub use styles::MedicalTheme;
