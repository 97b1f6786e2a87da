//! WebAssembly bindings for the salesched schedule engine
//!
//! This crate provides JavaScript-callable functions for converting a
//! pipeline workbook into a schedule workbook directly in the browser. Error
//! values are the engine's messages, ready to show to the user as-is.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use chrono::{Local, NaiveDate};
use serde::Serialize;
use wasm_bindgen::prelude::*;

use salesched::{Configuration, ScheduleError, Settings, Workbook};

/// Initialize panic hook for better error messages in console
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Convert workbook bytes into schedule xlsx bytes
#[wasm_bindgen]
pub fn process(bytes: &[u8]) -> Result<Vec<u8>, JsValue> {
    salesched::process(bytes).map_err(to_js)
}

/// Convert workbook bytes and return the schedule as base64, ready for a
/// `data:` download link
#[wasm_bindgen]
pub fn process_base64(bytes: &[u8]) -> Result<String, JsValue> {
    let xlsx = salesched::process(bytes).map_err(to_js)?;
    Ok(STANDARD.encode(xlsx))
}

/// Summarize the configuration sheets of a workbook as JSON
#[wasm_bindgen]
pub fn inspect(bytes: &[u8]) -> Result<String, JsValue> {
    inspect_workbook(bytes, &Settings::default()).map_err(to_js)
}

fn to_js(error: ScheduleError) -> JsValue {
    JsValue::from_str(&error.to_string())
}

// ============================================================================
// Configuration summary
// ============================================================================

#[derive(Debug, Serialize)]
struct ConfigSummary {
    default_type: String,
    types: Vec<TypeSummary>,
    sales_alias_count: usize,
}

#[derive(Debug, Serialize)]
struct TypeSummary {
    key: String,
    alias: String,
    milestones: Vec<MilestoneSummary>,
}

#[derive(Debug, Serialize)]
struct MilestoneSummary {
    name: String,
    workdays_before: u32,
    /// ISO weekday number, 1 = Monday
    weekday: Option<u32>,
}

impl ConfigSummary {
    fn from_config(config: &Configuration) -> Self {
        let types = config
            .types_in_order()
            .into_iter()
            .map(|rule| TypeSummary {
                key: rule.key.clone(),
                alias: rule.alias.clone(),
                milestones: rule
                    .milestones
                    .iter()
                    .map(|m| MilestoneSummary {
                        name: m.name.clone(),
                        workdays_before: m.workdays_before,
                        weekday: m.specific_weekday.map(|d| d.number_from_monday()),
                    })
                    .collect(),
            })
            .collect();

        Self {
            default_type: config.default_type_key.clone(),
            types,
            sales_alias_count: config.sales_aliases.len(),
        }
    }
}

fn inspect_workbook(bytes: &[u8], settings: &Settings) -> Result<String, ScheduleError> {
    let workbook = Workbook::from_bytes(bytes)?;
    let config = salesched_parser::parse_configuration(&workbook, settings)?;
    serde_json::to_string(&ConfigSummary::from_config(&config))
        .map_err(|e| ScheduleError::Workbook(e.to_string()))
}

// ============================================================================
// Converter
// ============================================================================

/// Stateful converter for UIs that let the user adjust settings
#[wasm_bindgen]
pub struct Converter {
    settings: Settings,
    today: Option<NaiveDate>,
    last_error: Option<String>,
}

impl Default for Converter {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl Converter {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            settings: Settings::default(),
            today: None,
            last_error: None,
        }
    }

    /// Set the output date format (strftime syntax, e.g. `%Y-%m-%d`)
    pub fn set_date_format(&mut self, format: &str) {
        self.settings.output_date_format = format.to_string();
    }

    /// Set the length of the scheduling window in years
    pub fn set_window_years(&mut self, years: u32) {
        self.settings.window_years = years;
    }

    /// Fix the reference date (`YYYY-MM-DD`); an empty string means today
    pub fn set_today(&mut self, iso: &str) -> bool {
        match Self::parse_today(iso) {
            Ok(today) => {
                self.today = today;
                true
            }
            Err(message) => {
                self.last_error = Some(message);
                false
            }
        }
    }

    /// Convert workbook bytes into schedule xlsx bytes
    pub fn convert(&mut self, bytes: &[u8]) -> Result<Vec<u8>, JsValue> {
        self.convert_internal(bytes).map_err(|e| {
            let message = e.to_string();
            self.last_error = Some(message.clone());
            JsValue::from_str(&message)
        })
    }

    /// Message of the last failed call
    pub fn get_last_error(&self) -> Option<String> {
        self.last_error.clone()
    }
}

impl Converter {
    fn parse_today(iso: &str) -> Result<Option<NaiveDate>, String> {
        let iso = iso.trim();
        if iso.is_empty() {
            return Ok(None);
        }
        NaiveDate::parse_from_str(iso, "%Y-%m-%d")
            .map(Some)
            .map_err(|e| format!("Invalid date \"{iso}\": {e}"))
    }

    fn convert_internal(&mut self, bytes: &[u8]) -> Result<Vec<u8>, ScheduleError> {
        self.last_error = None;
        let today = self.today.unwrap_or_else(|| Local::now().date_naive());
        salesched::process_with(bytes, &self.settings, today)
    }
}
