//! Statemap Application
//!
//! The application shell: windowing, surface management, event wiring
//! between the windowing layer and the map widget.

mod app;
mod ui;

pub use app::{App, AppConfig};
pub use ui::{render_ui, UiAction, UiState};

#[cfg(target_arch = "wasm32")]
mod web;

#[cfg(target_arch = "wasm32")]
pub use web::run_wasm;
