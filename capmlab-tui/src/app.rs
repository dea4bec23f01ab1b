//! Application state — single-owner, main-thread only.
//!
//! All mutable session state lives here: the three input values, the last
//! report and any in-flight request. The core only ever sees immutable
//! `CapmInputs` snapshots taken from this state.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, Sender};
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::NaiveDateTime;

use capmlab_core::{parse_field, CapmError, CapmInputs, CapmReport, InputDefaults, Settings};

use crate::worker::{WorkerCommand, WorkerResponse};

const ERROR_HISTORY_CAP: usize = 50;
const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Which panel is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    Calculator,
    Chart,
    Compare,
    Help,
}

impl Panel {
    const COUNT: usize = 4;

    pub fn index(self) -> usize {
        match self {
            Panel::Calculator => 0,
            Panel::Chart => 1,
            Panel::Compare => 2,
            Panel::Help => 3,
        }
    }

    pub fn from_index(i: usize) -> Option<Self> {
        match i {
            0 => Some(Panel::Calculator),
            1 => Some(Panel::Chart),
            2 => Some(Panel::Compare),
            3 => Some(Panel::Help),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Panel::Calculator => "Calculator",
            Panel::Chart => "Security Market Line",
            Panel::Compare => "Input Comparison",
            Panel::Help => "Help",
        }
    }

    pub fn next(self) -> Panel {
        Panel::from_index((self.index() + 1) % Self::COUNT).unwrap_or(Panel::Calculator)
    }

    pub fn prev(self) -> Panel {
        Panel::from_index((self.index() + Self::COUNT - 1) % Self::COUNT)
            .unwrap_or(Panel::Calculator)
    }
}

/// One of the three form inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputField {
    RiskFree,
    Beta,
    MarketReturn,
}

impl InputField {
    pub const ALL: [InputField; 3] = [
        InputField::RiskFree,
        InputField::Beta,
        InputField::MarketReturn,
    ];

    pub fn label(self) -> &'static str {
        match self {
            InputField::RiskFree => "Risk-Free Rate (Rf) in %",
            InputField::Beta => "Beta (β)",
            InputField::MarketReturn => "Expected Market Return (Rm) in %",
        }
    }

    fn parse_name(self) -> &'static str {
        match self {
            InputField::RiskFree => "risk-free rate",
            InputField::Beta => "beta",
            InputField::MarketReturn => "market return",
        }
    }

    pub fn next(self) -> InputField {
        match self {
            InputField::RiskFree => InputField::Beta,
            InputField::Beta => InputField::MarketReturn,
            InputField::MarketReturn => InputField::MarketReturn,
        }
    }

    pub fn prev(self) -> InputField {
        match self {
            InputField::RiskFree => InputField::RiskFree,
            InputField::Beta => InputField::RiskFree,
            InputField::MarketReturn => InputField::Beta,
        }
    }
}

/// The input form. Rates are held in percent, as typed.
#[derive(Debug, Clone)]
pub struct FormState {
    pub risk_free_pct: f64,
    pub beta: f64,
    pub market_return_pct: f64,
    pub active: InputField,
    /// Text being typed into the active field, if editing.
    pub edit_buffer: Option<String>,
    pub step: f64,
}

impl FormState {
    pub fn new(defaults: &InputDefaults) -> Self {
        Self {
            risk_free_pct: defaults.risk_free_pct,
            beta: defaults.beta,
            market_return_pct: defaults.market_return_pct,
            active: InputField::RiskFree,
            edit_buffer: None,
            step: defaults.step,
        }
    }

    pub fn value(&self, field: InputField) -> f64 {
        match field {
            InputField::RiskFree => self.risk_free_pct,
            InputField::Beta => self.beta,
            InputField::MarketReturn => self.market_return_pct,
        }
    }

    fn slot(&mut self, field: InputField) -> &mut f64 {
        match field {
            InputField::RiskFree => &mut self.risk_free_pct,
            InputField::Beta => &mut self.beta,
            InputField::MarketReturn => &mut self.market_return_pct,
        }
    }

    /// Nudge the active field by one step, floored at zero.
    pub fn step_active(&mut self, direction: i32) {
        let step = self.step;
        let slot = self.slot(self.active);
        let raw = *slot + step * direction as f64;
        // Keep 0.1 + 0.2 style noise out of the displayed value.
        *slot = ((raw * 1e9).round() / 1e9).max(0.0);
    }

    pub fn is_editing(&self) -> bool {
        self.edit_buffer.is_some()
    }

    pub fn begin_edit(&mut self) {
        self.edit_buffer = Some(String::new());
    }

    pub fn cancel_edit(&mut self) {
        self.edit_buffer = None;
    }

    /// Parse the edit buffer into the active field. The buffer is kept on
    /// error so the user can fix it.
    pub fn commit_edit(&mut self) -> Result<(), CapmError> {
        let Some(text) = self.edit_buffer.as_deref() else {
            return Ok(());
        };
        let field = self.active;
        let value = parse_field(field.parse_name(), text)?;
        if !value.is_finite() {
            return Err(CapmError::NonFinite {
                field: field.parse_name(),
            });
        }
        if value < 0.0 {
            return Err(CapmError::Negative {
                field: field.parse_name(),
                value,
            });
        }
        *self.slot(field) = value;
        self.edit_buffer = None;
        Ok(())
    }

    pub fn reset(&mut self, defaults: &InputDefaults) {
        *self = Self::new(defaults);
    }

    /// Immutable snapshot handed to the core.
    pub fn to_inputs(&self) -> CapmInputs {
        CapmInputs::from_percent(self.risk_free_pct, self.beta, self.market_return_pct)
    }
}

/// A request the worker is currently processing.
#[derive(Debug, Clone, Copy)]
pub struct PendingCalc {
    pub request_id: u64,
    pub started: Instant,
}

/// Calculation lifecycle state.
#[derive(Debug, Default)]
pub struct CalcState {
    pub next_request_id: u64,
    pub pending: Option<PendingCalc>,
    pub report: Option<CapmReport>,
}

impl CalcState {
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn spinner_frame(&self, now: Instant) -> &'static str {
        let elapsed = self
            .pending
            .map(|p| now.saturating_duration_since(p.started))
            .unwrap_or(Duration::ZERO);
        let idx = (elapsed.as_millis() / 80) as usize % SPINNER_FRAMES.len();
        SPINNER_FRAMES[idx]
    }
}

/// Status message severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warning,
    Error,
}

/// Error category for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Worker,
}

impl ErrorCategory {
    pub fn label(self) -> &'static str {
        match self {
            ErrorCategory::Input => "INPUT",
            ErrorCategory::Worker => "WORKER",
        }
    }
}

/// An error record for the error history overlay.
#[derive(Debug, Clone)]
pub struct ErrorRecord {
    pub timestamp: NaiveDateTime,
    pub category: ErrorCategory,
    pub message: String,
}

/// Which overlay (if any) is shown on top.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay {
    None,
    ErrorHistory,
}

/// Top-level application state.
pub struct AppState {
    // Navigation
    pub active_panel: Panel,
    pub running: bool,

    pub settings: Settings,
    pub form: FormState,
    pub calc: CalcState,

    // Worker communication
    pub worker_tx: Sender<WorkerCommand>,
    pub worker_rx: Receiver<WorkerResponse>,
    pub cancel: Arc<AtomicBool>,

    // Cross-cutting
    pub status_message: Option<(String, StatusLevel)>,
    pub error_history: VecDeque<ErrorRecord>,
    pub error_scroll: usize,
    pub overlay: Overlay,
}

impl AppState {
    pub fn new(
        settings: Settings,
        worker_tx: Sender<WorkerCommand>,
        worker_rx: Receiver<WorkerResponse>,
        cancel: Arc<AtomicBool>,
    ) -> Self {
        let form = FormState::new(&settings.defaults);
        Self {
            active_panel: Panel::Calculator,
            running: true,
            settings,
            form,
            calc: CalcState::default(),
            worker_tx,
            worker_rx,
            cancel,
            status_message: None,
            error_history: VecDeque::with_capacity(ERROR_HISTORY_CAP),
            error_scroll: 0,
            overlay: Overlay::None,
        }
    }

    /// Validate the form and hand a snapshot to the worker. A request already
    /// in flight is superseded by the worker when this one reaches its queue.
    pub fn trigger_calculation(&mut self) {
        let inputs = self.form.to_inputs();
        if let Err(e) = inputs.validate() {
            self.push_error(ErrorCategory::Input, e.to_string());
            return;
        }

        let request_id = self.calc.next_request_id;
        self.calc.next_request_id += 1;

        let cmd = WorkerCommand::Calculate {
            request_id,
            inputs,
            settings: self.settings.clone(),
        };
        if self.worker_tx.send(cmd).is_err() {
            self.calc.pending = None;
            self.push_error(ErrorCategory::Worker, "worker is not running".into());
            return;
        }

        tracing::debug!(request_id, "calculation requested");
        self.calc.pending = Some(PendingCalc {
            request_id,
            started: Instant::now(),
        });
        self.set_status("Calculating...");
    }

    pub fn cancel_calculation(&mut self) {
        if self.calc.pending.take().is_some() {
            self.cancel.store(true, Ordering::Relaxed);
            self.set_warning("Calculation cancelled");
        }
    }

    /// Apply a worker response. Responses for anything other than the
    /// pending request are stale and dropped.
    pub fn apply_response(&mut self, resp: WorkerResponse) {
        match resp {
            WorkerResponse::Calculated { request_id, report } => {
                if !self.is_pending_request(request_id) {
                    tracing::debug!(request_id, "dropping stale result");
                    return;
                }
                self.calc.pending = None;
                let headline = format!(
                    "Expected Return: {}",
                    self.settings
                        .format
                        .format_percent(report.result.expected_return_pct())
                );
                self.calc.report = Some(*report);
                self.set_status(headline);
            }
            WorkerResponse::Cancelled { request_id } => {
                if self.is_pending_request(request_id) {
                    self.calc.pending = None;
                    self.set_warning("Calculation cancelled");
                }
            }
        }
    }

    fn is_pending_request(&self, request_id: u64) -> bool {
        self.calc
            .pending
            .map(|p| p.request_id == request_id)
            .unwrap_or(false)
    }

    pub fn cycle_format(&mut self) {
        self.settings.format = self.settings.format.next();
        self.set_status(format!("Format: {}", self.settings.format));
    }

    pub fn reset_inputs(&mut self) {
        self.form.reset(&self.settings.defaults);
        self.set_status("Inputs reset to defaults");
    }

    /// Push an error to the history, capping at 50.
    pub fn push_error(&mut self, category: ErrorCategory, message: String) {
        tracing::warn!(category = category.label(), %message, "tui error");
        let record = ErrorRecord {
            timestamp: chrono::Local::now().naive_local(),
            category,
            message: message.clone(),
        };
        self.error_history.push_front(record);
        if self.error_history.len() > ERROR_HISTORY_CAP {
            self.error_history.pop_back();
        }
        self.status_message = Some((message, StatusLevel::Error));
    }

    /// Set an info status message.
    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Info));
    }

    /// Set a warning status message.
    pub fn set_warning(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Warning));
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn stepping_never_goes_negative(
            field in 0usize..3,
            moves in proptest::collection::vec(prop_oneof![Just(-1i32), Just(1i32)], 0..200),
        ) {
            let mut form = FormState::new(&InputDefaults::default());
            form.active = InputField::ALL[field];
            for dir in moves {
                form.step_active(dir);
                prop_assert!(form.value(form.active) >= 0.0);
            }
            prop_assert!(form.to_inputs().validate().is_ok());
        }
    }
}
