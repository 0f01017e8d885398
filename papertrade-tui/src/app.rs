//! Application state — single-owner, main-thread only.
//!
//! The loaded `Session` is the only trading state; everything else here is
//! form input and presentation.

use std::collections::VecDeque;

use chrono::NaiveDateTime;

use papertrade_core::config::MIN_INITIAL_CAPITAL;
use papertrade_core::data::{StockEntry, StockLibrary};
use papertrade_core::{Session, SessionError, SimConfig, StepOutcome, StepSize, TradeAction};

const ERROR_HISTORY_CAP: usize = 50;
const MAX_QUANTITY_DIGITS: usize = 12;

pub const CAPITAL_STEP: f64 = 1_000.0;
pub const COMMISSION_STEP: f64 = 0.0001;
pub const COMMISSION_MIN: f64 = 0.0001;
pub const COMMISSION_MAX: f64 = 0.003;

/// Status message severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warning,
    Error,
}

/// An error record for the error history overlay.
#[derive(Debug, Clone)]
pub struct ErrorRecord {
    pub timestamp: NaiveDateTime,
    pub category: ErrorCategory,
    pub message: String,
    pub context: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Data,
    Trade,
    Settings,
}

impl ErrorCategory {
    pub fn label(self) -> &'static str {
        match self {
            ErrorCategory::Data => "DATA",
            ErrorCategory::Trade => "TRADE",
            ErrorCategory::Settings => "CFG",
        }
    }
}

/// Which decision the trade form will submit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormAction {
    Buy,
    Sell,
    Hold,
}

impl FormAction {
    pub fn label(self) -> &'static str {
        match self {
            FormAction::Buy => "Buy",
            FormAction::Sell => "Sell",
            FormAction::Hold => "Hold",
        }
    }
}

/// Trade form: chosen action plus the typed quantity.
#[derive(Debug, Clone)]
pub struct TradeForm {
    pub action: FormAction,
    pub quantity: String,
}

impl TradeForm {
    pub fn new() -> Self {
        Self {
            action: FormAction::Hold,
            quantity: String::new(),
        }
    }

    pub fn quantity_value(&self) -> Option<u64> {
        self.quantity.parse().ok()
    }

    pub fn push_digit(&mut self, c: char) {
        if c.is_ascii_digit() && self.quantity.len() < MAX_QUANTITY_DIGITS {
            self.quantity.push(c);
        }
    }

    pub fn select(&mut self, action: FormAction) {
        if self.action != action {
            self.quantity.clear();
        }
        self.action = action;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsField {
    Capital,
    Commission,
}

/// Settings overlay state: values being edited, applied on Enter.
#[derive(Debug, Clone)]
pub struct SettingsForm {
    pub capital: f64,
    pub commission_rate: f64,
    pub field: SettingsField,
}

impl SettingsForm {
    pub fn from_config(config: &SimConfig) -> Self {
        Self {
            capital: config.account.initial_capital,
            commission_rate: config.account.commission_rate,
            field: SettingsField::Capital,
        }
    }

    pub fn toggle_field(&mut self) {
        self.field = match self.field {
            SettingsField::Capital => SettingsField::Commission,
            SettingsField::Commission => SettingsField::Capital,
        };
    }

    /// Step the focused value up (`direction > 0`) or down.
    pub fn adjust(&mut self, direction: i32) {
        let d = direction.signum() as f64;
        match self.field {
            SettingsField::Capital => {
                self.capital = (self.capital + CAPITAL_STEP * d).max(MIN_INITIAL_CAPITAL);
            }
            SettingsField::Commission => {
                let next = self.commission_rate + COMMISSION_STEP * d;
                // Snap to the 0.01% grid so repeated steps don't drift.
                let snapped = (next / COMMISSION_STEP).round() * COMMISSION_STEP;
                self.commission_rate = snapped.clamp(COMMISSION_MIN, COMMISSION_MAX);
            }
        }
    }
}

/// Stock picker overlay state.
#[derive(Debug, Clone, Default)]
pub struct PickerState {
    pub entries: Vec<StockEntry>,
    pub cursor: usize,
}

impl PickerState {
    pub fn selected(&self) -> Option<&StockEntry> {
        self.entries.get(self.cursor)
    }
}

/// Which overlay (if any) is shown on top.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay {
    None,
    Picker,
    Settings,
    Help,
    ErrorHistory,
}

/// Top-level application state.
pub struct AppState {
    pub running: bool,

    pub library: StockLibrary,
    pub config: SimConfig,
    pub session: Option<Session>,

    pub form: TradeForm,
    pub settings: SettingsForm,
    pub picker: PickerState,

    pub status_message: Option<(String, StatusLevel)>,
    pub error_history: VecDeque<ErrorRecord>,
    pub error_scroll: usize,
    pub overlay: Overlay,
}

impl AppState {
    /// Start with no stock loaded and the picker open.
    pub fn new(library: StockLibrary, config: SimConfig) -> Self {
        let settings = SettingsForm::from_config(&config);
        let mut app = Self {
            running: true,
            library,
            config,
            session: None,
            form: TradeForm::new(),
            settings,
            picker: PickerState::default(),
            status_message: None,
            error_history: VecDeque::with_capacity(ERROR_HISTORY_CAP),
            error_scroll: 0,
            overlay: Overlay::None,
        };
        app.open_picker();
        app
    }

    // ─── Stock selection ──────────────────────────────────────────────

    pub fn open_picker(&mut self) {
        match self.library.list() {
            Ok(entries) => {
                if entries.is_empty() {
                    self.set_warning(format!(
                        "No stock files in {}",
                        self.library.dir().display()
                    ));
                }
                let current = self.session.as_ref().map(|s| s.stock_id().to_string());
                self.picker.cursor = current
                    .and_then(|id| entries.iter().position(|e| e.stock_id == id))
                    .unwrap_or(0);
                self.picker.entries = entries;
            }
            Err(e) => {
                self.picker.entries.clear();
                self.picker.cursor = 0;
                self.push_error(ErrorCategory::Data, e.to_string(), "list stocks".into());
            }
        }
        self.overlay = Overlay::Picker;
    }

    /// Load the picker's highlighted stock.
    pub fn load_selected(&mut self) {
        if let Some(id) = self.picker.selected().map(|e| e.stock_id.clone()) {
            self.load_stock(&id);
        }
    }

    pub fn load_random(&mut self) {
        match self.library.pick_random(&mut rand::thread_rng()) {
            Ok(Some(entry)) => self.load_stock(&entry.stock_id),
            Ok(None) => self.set_warning(format!(
                "No stock files in {}",
                self.library.dir().display()
            )),
            Err(e) => self.push_error(ErrorCategory::Data, e.to_string(), "random pick".into()),
        }
    }

    /// Replace the current session with a fresh one on `stock_id`.
    pub fn load_stock(&mut self, stock_id: &str) {
        let bars = match self.library.load(stock_id) {
            Ok(bars) => bars,
            Err(e) => {
                self.push_error(ErrorCategory::Data, e.to_string(), format!("load {stock_id}"));
                return;
            }
        };
        let count = bars.len();
        match Session::new(stock_id, bars, &self.config) {
            Ok(session) => {
                let start = session.current_bar().date;
                let exhausted = session.is_exhausted();
                self.session = Some(session);
                self.form = TradeForm::new();
                self.overlay = Overlay::None;
                if exhausted {
                    self.set_warning(format!(
                        "Loaded {stock_id}: {count} bars fit in one window, no days to step"
                    ));
                } else {
                    self.set_status(format!("Loaded {stock_id}: {count} bars, starting {start}"));
                }
            }
            Err(e) => {
                self.push_error(ErrorCategory::Data, e.to_string(), format!("start {stock_id}"))
            }
        }
    }

    // ─── Session commands ─────────────────────────────────────────────

    pub fn step(&mut self, size: StepSize) {
        let Some(session) = self.session.as_mut() else {
            self.set_warning("Open a stock first (o)");
            return;
        };
        match session.advance(size) {
            StepOutcome::Exhausted => self.set_warning("Already at the last day of the series"),
            StepOutcome::Moved { exhausted, .. } => {
                let date = session.current_bar().date;
                if exhausted {
                    self.set_warning(format!("{}: {date}, last day of the series", size.label()));
                } else {
                    self.set_status(format!("{}: {date}", size.label()));
                }
            }
        }
    }

    /// Submit the trade form at today's close.
    pub fn submit_trade(&mut self) {
        if self.session.is_none() {
            self.set_warning("Open a stock first (o)");
            return;
        }
        let quantity = self.form.quantity_value();
        let action = match (self.form.action, quantity) {
            (FormAction::Hold, _) => TradeAction::Hold,
            (FormAction::Buy, Some(qty)) => TradeAction::Buy(qty),
            (FormAction::Sell, Some(qty)) => TradeAction::Sell(qty),
            (_, None) => {
                self.set_warning("Type a quantity first");
                return;
            }
        };
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let date = session.current_bar().date;
        match session.execute(action) {
            Ok(Some(receipt)) => {
                self.form.quantity.clear();
                self.set_status(receipt.message());
            }
            Ok(None) => self.set_status(format!("Held on {date}")),
            Err(e) => self.push_error(ErrorCategory::Trade, e.to_string(), format!("{date}")),
        }
    }

    /// Fill the quantity with the most the current action allows.
    pub fn fill_max(&mut self) {
        let Some(session) = self.session.as_ref() else {
            return;
        };
        let max = match self.form.action {
            FormAction::Buy => session.max_buyable(),
            FormAction::Sell => session.max_sellable(),
            FormAction::Hold => return,
        };
        self.form.quantity = max.to_string();
    }

    pub fn reset_session(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.reset();
            self.form = TradeForm::new();
            self.set_status("Session reset");
        }
    }

    // ─── Settings ─────────────────────────────────────────────────────

    pub fn settings_locked(&self) -> bool {
        self.session.as_ref().is_some_and(|s| s.capital_locked())
    }

    pub fn open_settings(&mut self) {
        self.settings = match &self.session {
            Some(s) => SettingsForm {
                capital: s.initial_capital(),
                commission_rate: s.commission_rate(),
                field: SettingsField::Capital,
            },
            None => SettingsForm::from_config(&self.config),
        };
        self.overlay = Overlay::Settings;
    }

    /// Apply the settings form. Closes the overlay on success.
    pub fn apply_settings(&mut self) {
        let (capital, rate) = (self.settings.capital, self.settings.commission_rate);
        if let Some(session) = self.session.as_mut() {
            match session.reconfigure(capital, rate) {
                Ok(()) => {}
                Err(SessionError::CapitalLocked) => {
                    self.set_warning("Settings are locked after the first buy; reset (R) to change");
                    return;
                }
                Err(e) => {
                    self.push_error(ErrorCategory::Settings, e.to_string(), "apply settings".into());
                    return;
                }
            }
        } else if let Err(e) = papertrade_core::config::validate_account(capital, rate) {
            self.push_error(ErrorCategory::Settings, e.to_string(), "apply settings".into());
            return;
        }
        self.config.account.initial_capital = capital;
        self.config.account.commission_rate = rate;
        self.overlay = Overlay::None;
        self.set_status(format!(
            "Capital {capital:.0}, commission {:.2}%",
            rate * 100.0
        ));
    }

    // ─── Status ───────────────────────────────────────────────────────

    /// Push an error to the history, capping at 50.
    pub fn push_error(&mut self, category: ErrorCategory, message: String, context: String) {
        tracing::warn!(category = category.label(), %context, "{message}");
        let record = ErrorRecord {
            timestamp: chrono::Local::now().naive_local(),
            category,
            message: message.clone(),
            context,
        };
        self.error_history.push_front(record);
        if self.error_history.len() > ERROR_HISTORY_CAP {
            self.error_history.pop_back();
        }
        self.status_message = Some((message, StatusLevel::Error));
    }

    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Info));
    }

    pub fn set_warning(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Warning));
    }
}
