//! Vending TUI - terminal interface for ownership tokens
//!
//! Renders the token list of one application and drives create and revoke
//! through the list controller, built with ratatui.

pub mod app;
pub mod events;
pub mod input;
pub mod state;
pub mod ui;

pub use app::{App, Command};
pub use state::{Mode, UiState};
