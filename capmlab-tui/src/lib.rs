//! CAPM Lab TUI — terminal front-end for the CAPM calculator.
//!
//! Provides:
//! - An input form for Rf, β and Rm with step and typed entry
//! - A calculate trigger served by a background worker with a cancellable
//!   simulated latency
//! - The Security Market Line with the user's asset overlaid
//! - A bar chart comparing the inputs with the expected return

pub mod app;
pub mod input;
pub mod theme;
pub mod ui;
pub mod worker;

pub use app::AppState;
pub use input::handle_key;
