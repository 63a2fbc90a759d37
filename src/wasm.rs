//! WASM bindings for the gridboard-core library.
//!
//! All functions exposed to JavaScript via wasm-bindgen are defined here.
//! Inputs and outputs cross the boundary as JSON strings.

use log::{LevelFilter, Log, Metadata, Record};
use wasm_bindgen::prelude::*;

use crate::charts::ChartCommandQueue;
use crate::engine::{Dashboard, DashboardConfig, Direction};
use crate::error::{EngineError, StoreError};
use crate::gesture::{Outcome, PointerEvent};
use crate::grid::ContainerRect;
use crate::output::{ErrorInfo, EventOutput};
use crate::store::KeyValueStore;
use crate::widget::WidgetId;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console, js_name = log)]
    pub fn console_log(s: &str);

    #[wasm_bindgen(js_namespace = console, js_name = error)]
    pub fn console_error(s: &str);
}

struct ConsoleLogger;

static LOGGER: ConsoleLogger = ConsoleLogger;

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format!("[{}] {}: {}", record.level(), record.target(), record.args());
        if record.level() <= log::Level::Warn {
            console_error(&line);
        } else {
            console_log(&line);
        }
    }

    fn flush(&self) {}
}

/// Install the panic hook and console logger. Safe to call more than once.
#[wasm_bindgen]
pub fn init(verbose: bool) {
    console_error_panic_hook::set_once();
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(if verbose { LevelFilter::Debug } else { LevelFilter::Warn });
    }
}

/// `window.localStorage`, when the page has one.
pub struct BrowserStore {
    storage: Option<web_sys::Storage>,
}

impl BrowserStore {
    pub fn new() -> Self {
        let storage = web_sys::window().and_then(|window| window.local_storage().ok().flatten());
        if storage.is_none() {
            log::warn!("localStorage is unavailable; layout changes will not persist");
        }
        Self { storage }
    }
}

impl Default for BrowserStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyValueStore for BrowserStore {
    fn get(&self, key: &str) -> Option<String> {
        self.storage.as_ref()?.get_item(key).ok()?
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let storage = self.storage.as_ref().ok_or(StoreError::Unavailable)?;
        storage.set_item(key, value).map_err(|e| StoreError::Write(format!("{:?}", e)))
    }
}

fn to_json(output: &EventOutput) -> String {
    serde_json::to_string(output).unwrap_or_else(|e| {
        console_error(&format!("Error serializing output: {}", e));
        "{\"widgets\":[],\"error\":{\"message\":\"serialization error\"}}".to_string()
    })
}

#[wasm_bindgen]
pub struct DashboardHandle {
    inner: Dashboard<BrowserStore, ChartCommandQueue>,
}

impl DashboardHandle {
    fn respond(&mut self, result: Result<Outcome, EngineError>) -> String {
        if let Err(e) = &result {
            console_error(&e.to_string());
        }
        let charts = self.inner.charts_mut().drain();
        to_json(&EventOutput::from_result(self.inner.layout(), result, charts))
    }

    fn reject(&mut self, message: String) -> String {
        console_error(&message);
        let charts = self.inner.charts_mut().drain();
        to_json(&EventOutput::new(self.inner.layout(), None, charts).with_error(ErrorInfo { message }))
    }
}

#[wasm_bindgen]
impl DashboardHandle {
    /// Open the dashboard from `localStorage`. `config_json` may be a partial
    /// `DashboardConfig`; a missing or invalid one falls back to defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> DashboardHandle {
        let config = match config_json.as_deref().map(serde_json::from_str::<DashboardConfig>) {
            Some(Ok(config)) => config,
            Some(Err(e)) => {
                console_error(&format!("Error parsing config: {}", e));
                DashboardConfig::default()
            }
            None => DashboardConfig::default(),
        };
        DashboardHandle { inner: Dashboard::open(config, BrowserStore::new(), ChartCommandQueue::new()) }
    }

    /// Current widgets plus any pending chart commands.
    pub fn layout_json(&mut self) -> String {
        let charts = self.inner.charts_mut().drain();
        to_json(&EventOutput::new(self.inner.layout(), None, charts))
    }

    pub fn add_widget(&mut self, kind: &str) -> String {
        let result = self.inner.add_widget(kind);
        self.respond(result)
    }

    pub fn remove_widget(&mut self, id: &str) -> String {
        let result = self.inner.remove_widget(&WidgetId::new(id));
        self.respond(result)
    }

    /// `direction` is one of "left", "right", "up", "down".
    pub fn nudge(&mut self, id: &str, direction: &str) -> String {
        let direction: Direction = match direction.parse() {
            Ok(d) => d,
            Err(message) => return self.reject(message),
        };
        let result = self.inner.nudge(&WidgetId::new(id), direction);
        self.respond(result)
    }

    /// Feed one pointer event. `container_json` is the grid container's
    /// bounding rect as `{ left, top, width, height }`.
    pub fn dispatch(&mut self, event_json: &str, container_json: &str) -> String {
        let event: PointerEvent = match serde_json::from_str(event_json) {
            Ok(event) => event,
            Err(e) => return self.reject(format!("Error parsing event: {}", e)),
        };
        let container: ContainerRect = match serde_json::from_str(container_json) {
            Ok(container) => container,
            Err(e) => return self.reject(format!("Error parsing container: {}", e)),
        };
        let result = self.inner.dispatch(event, &container);
        self.respond(result)
    }
}
