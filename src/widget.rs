//! Widgets and the ordered layout that owns them.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::grid::{Cell, GridConfig, RectI, SizeI};

/// Prefix of engine-allocated widget ids (`widget-1`, `widget-2`, ...).
pub const WIDGET_ID_PREFIX: &str = "widget-";

/// Chart kinds the dashboard knows how to render. Layout treats `kind` as opaque.
pub const CHART_KINDS: [&str; 4] = ["line", "bar", "column", "pie"];

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WidgetId(pub String);

impl WidgetId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Numeric suffix of an engine-allocated id, if this is one.
    fn sequence(&self) -> Option<u64> {
        self.0.strip_prefix(WIDGET_ID_PREFIX)?.parse().ok()
    }
}

impl fmt::Display for WidgetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Widget {
    pub id: WidgetId,
    /// Chart type rendered inside the widget.
    pub kind: String,
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Widget {
    pub fn new(id: WidgetId, kind: impl Into<String>, rect: RectI) -> Self {
        Self { id, kind: kind.into(), x: rect.x, y: rect.y, w: rect.w, h: rect.h }
    }

    pub fn rect(&self) -> RectI {
        RectI { x: self.x, y: self.y, w: self.w, h: self.h }
    }

    pub fn origin(&self) -> Cell {
        Cell { x: self.x, y: self.y }
    }

    pub fn size(&self) -> SizeI {
        SizeI { w: self.w, h: self.h }
    }

    pub fn set_rect(&mut self, rect: RectI) {
        self.x = rect.x;
        self.y = rect.y;
        self.w = rect.w;
        self.h = rect.h;
    }

    pub fn move_to(&mut self, origin: Cell) {
        self.x = origin.x;
        self.y = origin.y;
    }
}

/// A broken layout invariant, as reported by [`Layout::violations`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    OutOfBounds(WidgetId),
    BelowMinArea(WidgetId),
    Overlap(WidgetId, WidgetId),
}

/// Ordered widget list for one dashboard. Order is insertion order and has no
/// geometric meaning.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Layout {
    widgets: Vec<Widget>,
    next_id: u64,
}

impl Layout {
    pub fn new() -> Self {
        Self { widgets: Vec::new(), next_id: 1 }
    }

    /// Build a layout from existing widgets; id allocation resumes after the
    /// highest `widget-N` present.
    pub fn from_widgets(widgets: Vec<Widget>) -> Self {
        let next_id = widgets
            .iter()
            .filter_map(|w| w.id.sequence())
            .max()
            .map_or(1, |max| max + 1);
        Self { widgets, next_id }
    }

    pub fn widgets(&self) -> &[Widget] {
        &self.widgets
    }

    pub fn iter(&self) -> impl Iterator<Item = &Widget> {
        self.widgets.iter()
    }

    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }

    pub fn get(&self, id: &WidgetId) -> Option<&Widget> {
        self.widgets.iter().find(|w| &w.id == id)
    }

    pub fn get_mut(&mut self, id: &WidgetId) -> Option<&mut Widget> {
        self.widgets.iter_mut().find(|w| &w.id == id)
    }

    pub fn contains(&self, id: &WidgetId) -> bool {
        self.get(id).is_some()
    }

    /// Hand out a fresh `widget-N` id. Never returns an id already in the layout.
    pub fn allocate_id(&mut self) -> WidgetId {
        loop {
            let id = WidgetId(format!("{}{}", WIDGET_ID_PREFIX, self.next_id.max(1)));
            self.next_id = self.next_id.max(1) + 1;
            if !self.contains(&id) {
                return id;
            }
        }
    }

    pub fn push(&mut self, widget: Widget) {
        if let Some(seq) = widget.id.sequence() {
            self.next_id = self.next_id.max(seq + 1);
        }
        self.widgets.push(widget);
    }

    pub fn remove(&mut self, id: &WidgetId) -> Option<Widget> {
        let idx = self.widgets.iter().position(|w| &w.id == id)?;
        Some(self.widgets.remove(idx))
    }

    /// Every broken invariant in the layout. Empty means the layout is valid.
    pub fn violations(&self, cfg: &GridConfig) -> Vec<Violation> {
        let mut out = Vec::new();
        for (i, a) in self.widgets.iter().enumerate() {
            if !cfg.in_bounds(&a.rect()) {
                out.push(Violation::OutOfBounds(a.id.clone()));
            }
            if a.w * a.h < cfg.min_cells {
                out.push(Violation::BelowMinArea(a.id.clone()));
            }
            for b in &self.widgets[i + 1..] {
                if crate::grid::collision::overlaps(a, b) {
                    out.push(Violation::Overlap(a.id.clone(), b.id.clone()));
                }
            }
        }
        out
    }

    pub fn is_valid(&self, cfg: &GridConfig) -> bool {
        self.violations(cfg).is_empty()
    }
}
