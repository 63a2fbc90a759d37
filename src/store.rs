//! Layout persistence.
//!
//! The layout is stored as a JSON array of `{ id, kind, x, y, w, h }` records
//! under a single key of an external key-value collaborator. Loading is
//! forgiving: a missing or malformed blob yields an empty layout, and each
//! record is repaired before it is accepted.

use std::collections::{HashMap, HashSet};

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::grid::placement::resolve_overlaps;
use crate::grid::repair::repair_rect;
use crate::grid::{GridConfig, RectI, MAX_ROW};
use crate::widget::{Layout, Widget, WidgetId};

/// Key the dashboard layout is stored under.
pub const LAYOUT_KEY: &str = "dashboard-widgets";

/// The persistence collaborator.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// In-memory store, optionally with a per-value size quota.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
    quota: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject writes whose value is longer than `bytes`.
    pub fn with_quota(bytes: usize) -> Self {
        Self { entries: HashMap::new(), quota: Some(bytes) }
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        if let Some(quota) = self.quota {
            if value.len() > quota {
                return Err(StoreError::QuotaExceeded { key: key.to_string(), bytes: value.len() });
            }
        }
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// One persisted widget. Rendering-only state is never written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WidgetRecord {
    pub id: String,
    #[serde(alias = "chartType")]
    pub kind: String,
    pub x: i64,
    pub y: i64,
    pub w: i64,
    pub h: i64,
}

impl From<&Widget> for WidgetRecord {
    fn from(w: &Widget) -> Self {
        Self {
            id: w.id.0.clone(),
            kind: w.kind.clone(),
            x: w.x.into(),
            y: w.y.into(),
            w: w.w.into(),
            h: w.h.into(),
        }
    }
}

impl WidgetRecord {
    /// Stored geometry pulled into the grid's range. Repair does the rest.
    fn rect(&self, cfg: &GridConfig) -> RectI {
        let clamp = |v: i64, max: i32| v.clamp(0, i64::from(max)) as i32;
        RectI {
            x: clamp(self.x, cfg.columns),
            y: clamp(self.y, MAX_ROW),
            w: clamp(self.w, cfg.columns),
            h: clamp(self.h, cfg.max_height),
        }
    }
}

pub struct LayoutStore<S> {
    backend: S,
    key: String,
}

impl<S: KeyValueStore> LayoutStore<S> {
    pub fn new(backend: S, key: impl Into<String>) -> Self {
        Self { backend, key: key.into() }
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    /// Overwrite the stored layout.
    pub fn save(&mut self, layout: &Layout) -> Result<(), StoreError> {
        let records: Vec<WidgetRecord> = layout.iter().map(WidgetRecord::from).collect();
        let blob = serde_json::to_string(&records)?;
        self.backend.set(&self.key, &blob)?;
        debug!("saved {} widgets under {}", records.len(), self.key);
        Ok(())
    }

    /// Load and repair the stored layout. With `resolve_overlaps_on_load`,
    /// widgets overlapping an earlier one are relocated as well.
    pub fn load(&self, cfg: &GridConfig, resolve_overlaps_on_load: bool) -> Layout {
        let Some(blob) = self.backend.get(&self.key) else {
            return Layout::new();
        };
        let mut layout = decode_layout(&blob, cfg);
        if resolve_overlaps_on_load {
            let moved = resolve_overlaps(&mut layout, cfg);
            if !moved.is_empty() {
                warn!("relocated {} overlapping widgets after load", moved.len());
            }
        }
        layout
    }
}

/// Decode a stored blob, repairing each record. Records whose fields are
/// missing or non-numeric, or whose geometry cannot be repaired, are dropped.
pub fn decode_layout(blob: &str, cfg: &GridConfig) -> Layout {
    let values: Vec<serde_json::Value> = match serde_json::from_str(blob) {
        Ok(values) => values,
        Err(e) => {
            warn!("ignoring malformed layout blob: {}", e);
            return Layout::new();
        }
    };

    let mut seen: HashSet<String> = HashSet::new();
    let mut widgets = Vec::with_capacity(values.len());

    for (idx, value) in values.into_iter().enumerate() {
        let record: WidgetRecord = match serde_json::from_value(value) {
            Ok(r) => r,
            Err(e) => {
                warn!("dropping widget record {}: {}", idx, e);
                continue;
            }
        };
        if !seen.insert(record.id.clone()) {
            warn!("dropping duplicate widget id {}", record.id);
            continue;
        }
        let Some(rect) = repair_rect(record.rect(cfg), cfg) else {
            warn!("dropping widget {}: geometry cannot be repaired", record.id);
            continue;
        };
        widgets.push(Widget::new(WidgetId(record.id), record.kind, rect));
    }

    Layout::from_widgets(widgets)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn widget(id: &str, x: i32, y: i32, w: i32, h: i32) -> Widget {
        Widget::new(WidgetId::new(id), "line", RectI { x, y, w, h })
    }

    fn store_with(blob: &str) -> LayoutStore<MemoryStore> {
        let mut backend = MemoryStore::new();
        backend.insert(LAYOUT_KEY, blob);
        LayoutStore::new(backend, LAYOUT_KEY)
    }

    #[test]
    fn test_round_trip_preserves_valid_widgets() {
        let cfg = GridConfig::default();
        let layout = Layout::from_widgets(vec![
            widget("widget-1", 0, 0, 4, 2),
            Widget::new(WidgetId::new("widget-2"), "pie", RectI { x: 4, y: 0, w: 8, h: 5 }),
            widget("revenue-line", 0, 5, 12, 6),
        ]);
        let mut store = LayoutStore::new(MemoryStore::new(), LAYOUT_KEY);
        store.save(&layout).unwrap();
        let loaded = store.load(&cfg, true);
        assert_eq!(loaded.widgets(), layout.widgets());
    }

    #[test]
    fn test_saved_records_have_only_layout_fields() {
        let layout = Layout::from_widgets(vec![widget("widget-1", 1, 2, 3, 4)]);
        let mut store = LayoutStore::new(MemoryStore::new(), LAYOUT_KEY);
        store.save(&layout).unwrap();
        let blob = store.backend().get(LAYOUT_KEY).unwrap();
        assert_eq!(blob, r#"[{"id":"widget-1","kind":"line","x":1,"y":2,"w":3,"h":4}]"#);
    }

    #[test]
    fn test_missing_blob_loads_empty() {
        let store = LayoutStore::new(MemoryStore::new(), LAYOUT_KEY);
        assert!(store.load(&GridConfig::default(), true).is_empty());
    }

    #[test]
    fn test_malformed_blob_loads_empty() {
        let cfg = GridConfig::default();
        assert!(store_with("not json").load(&cfg, true).is_empty());
        assert!(store_with(r#"{"id":"widget-1"}"#).load(&cfg, true).is_empty());
    }

    #[test]
    fn test_load_repairs_out_of_bounds_record() {
        let store = store_with(r#"[{"id":"widget-1","kind":"bar","x":10,"y":0,"w":4,"h":1}]"#);
        let layout = store.load(&GridConfig::default(), true);
        let w = layout.get(&WidgetId::new("widget-1")).unwrap();
        assert_eq!(w.rect(), RectI { x: 8, y: 0, w: 4, h: 2 });
    }

    #[test]
    fn test_load_accepts_legacy_chart_type_field() {
        let store = store_with(
            r#"[{"id":"widget-3","type":"pie","title":"Pie","chartType":"pie","x":0,"y":0,"w":2,"h":2}]"#,
        );
        let layout = store.load(&GridConfig::default(), true);
        assert_eq!(layout.get(&WidgetId::new("widget-3")).unwrap().kind, "pie");
    }

    #[test]
    fn test_load_drops_unusable_records() {
        let store = store_with(
            r#"[
                {"id":"widget-1","kind":"line","x":0,"y":0,"w":2,"h":2},
                {"id":"widget-2","kind":"line","x":"left","y":0,"w":2,"h":2},
                {"id":"widget-1","kind":"bar","x":4,"y":0,"w":2,"h":2}
            ]"#,
        );
        let layout = store.load(&GridConfig::default(), true);
        let ids: Vec<&str> = layout.iter().map(|w| w.id.as_str()).collect();
        assert_eq!(ids, vec!["widget-1"]);
        assert_eq!(layout.get(&WidgetId::new("widget-1")).unwrap().kind, "line");
    }

    #[test]
    fn test_load_clamps_oversized_numbers() {
        let cfg = GridConfig::default();
        let layout = decode_layout(r#"[{"id":"widget-4","kind":"bar","x":0,"y":0,"w":2,"h":99999999999}]"#, &cfg);
        assert_eq!(layout.get(&WidgetId::new("widget-4")).unwrap().rect(), RectI { x: 0, y: 0, w: 2, h: 20 });

        let layout = decode_layout(r#"[{"id":"a","kind":"bar","x":2147483647,"y":0,"w":4,"h":2}]"#, &cfg);
        assert_eq!(layout.get(&WidgetId::new("a")).unwrap().rect(), RectI { x: 8, y: 0, w: 4, h: 2 });

        let layout = decode_layout(r#"[{"id":"a","kind":"bar","x":0,"y":0,"w":100000,"h":100000}]"#, &cfg);
        assert_eq!(layout.get(&WidgetId::new("a")).unwrap().rect(), RectI { x: 0, y: 0, w: 12, h: 20 });

        let layout = decode_layout(r#"[{"id":"a","kind":"bar","x":-7,"y":-9223372036854775808,"w":-3,"h":2}]"#, &cfg);
        assert_eq!(layout.get(&WidgetId::new("a")).unwrap().rect(), RectI { x: 0, y: 0, w: 2, h: 2 });
    }

    #[test]
    fn test_load_with_far_away_row_resolves_overlaps() {
        let cfg = GridConfig::default();
        let store = store_with(
            r#"[
                {"id":"a","kind":"line","x":0,"y":2147483640,"w":4,"h":20},
                {"id":"b","kind":"line","x":0,"y":2147483640,"w":4,"h":20}
            ]"#,
        );
        let layout = store.load(&cfg, true);
        assert_eq!(layout.get(&WidgetId::new("a")).unwrap().y, MAX_ROW);
        assert_eq!(layout.len(), 2);
        assert!(layout.is_valid(&cfg));
    }

    #[test]
    fn test_load_resolves_overlaps_when_enabled() {
        let blob = r#"[
            {"id":"widget-1","kind":"line","x":0,"y":0,"w":6,"h":2},
            {"id":"widget-2","kind":"bar","x":2,"y":0,"w":6,"h":2}
        ]"#;
        let cfg = GridConfig::default();
        assert!(store_with(blob).load(&cfg, true).is_valid(&cfg));
        assert!(!store_with(blob).load(&cfg, false).is_valid(&cfg));
    }

    #[test]
    fn test_load_resumes_id_counter() {
        let store = store_with(r#"[{"id":"widget-9","kind":"line","x":0,"y":0,"w":2,"h":2}]"#);
        let mut layout = store.load(&GridConfig::default(), true);
        assert_eq!(layout.allocate_id(), WidgetId::new("widget-10"));
    }

    #[test]
    fn test_save_propagates_quota_error() {
        let layout = Layout::from_widgets(vec![widget("widget-1", 0, 0, 2, 2)]);
        let mut store = LayoutStore::new(MemoryStore::with_quota(8), LAYOUT_KEY);
        let err = store.save(&layout).unwrap_err();
        assert!(matches!(err, StoreError::QuotaExceeded { .. }));
        assert!(store.backend().get(LAYOUT_KEY).is_none());
    }
}
