//! TUI module: Terminal User Interface using Ratatui.
//!
//! Screens:
//! - Dashboard with service and model status
//! - Prediction form with inline result
//! - Model insights and model details

mod app;
mod styles;
mod ui;
mod worker;

pub use app::{App, Screen};
pub use styles::MedicalTheme;
pub use worker::{Worker, WorkerEvent};
