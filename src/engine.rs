//! The dashboard engine.
//!
//! `Dashboard` owns the layout, the persistence collaborator, the chart
//! collaborator, and the current gesture. Pointer events enter through
//! [`Dashboard::dispatch`]; every committed change is saved before the call
//! returns.

use std::str::FromStr;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::charts::ChartHost;
use crate::error::EngineError;
use crate::gesture::{drag, resize, DragSession, Gesture, Outcome, PointerEvent, ResizeSession};
use crate::grid::collision::has_collision;
use crate::grid::placement::{search_free_position, stack_below};
use crate::grid::{Cell, ContainerRect, GridConfig, RectI};
use crate::store::{KeyValueStore, LayoutStore, LAYOUT_KEY};
use crate::widget::{Layout, Widget, WidgetId, CHART_KINDS};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DashboardConfig {
    pub grid: GridConfig,
    /// Key the layout is persisted under.
    pub storage_key: String,
    /// Relocate widgets that overlap after loading a saved layout.
    pub resolve_overlaps_on_load: bool,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            grid: GridConfig::default(),
            storage_key: LAYOUT_KEY.to_string(),
            resolve_overlaps_on_load: true,
        }
    }
}

/// Keyboard nudge direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "left" => Ok(Direction::Left),
            "right" => Ok(Direction::Right),
            "up" => Ok(Direction::Up),
            "down" => Ok(Direction::Down),
            other => Err(format!("unknown direction: {}", other)),
        }
    }
}

impl Direction {
    fn offset(self) -> (i32, i32) {
        match self {
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
        }
    }
}

pub struct Dashboard<S, C> {
    config: DashboardConfig,
    layout: Layout,
    store: LayoutStore<S>,
    charts: C,
    gesture: Gesture,
}

impl<S: KeyValueStore, C: ChartHost> Dashboard<S, C> {
    /// Load the saved layout (or start empty) and initialize every chart.
    pub fn open(config: DashboardConfig, backend: S, mut charts: C) -> Self {
        let store = LayoutStore::new(backend, config.storage_key.clone());
        let layout = store.load(&config.grid, config.resolve_overlaps_on_load);
        for w in layout.iter() {
            charts.init_chart(&w.id, &w.kind);
        }
        debug!("opened dashboard with {} widgets", layout.len());
        Self { config, layout, store, charts, gesture: Gesture::Idle }
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn gesture(&self) -> &Gesture {
        &self.gesture
    }

    pub fn charts(&self) -> &C {
        &self.charts
    }

    pub fn charts_mut(&mut self) -> &mut C {
        &mut self.charts
    }

    pub fn store(&self) -> &LayoutStore<S> {
        &self.store
    }

    fn ensure_idle(&self) -> Result<(), EngineError> {
        if self.gesture.is_idle() { Ok(()) } else { Err(EngineError::GestureInProgress) }
    }

    fn widget(&self, id: &WidgetId) -> Result<&Widget, EngineError> {
        self.layout.get(id).ok_or_else(|| EngineError::UnknownWidget(id.clone()))
    }

    /// Persist and notify charts for a committed outcome.
    fn commit(&mut self, outcome: Outcome) -> Result<Outcome, EngineError> {
        if outcome.is_commit() {
            for id in outcome.reshaped() {
                self.charts.resize_chart(id);
            }
            self.store.save(&self.layout)?;
        }
        Ok(outcome)
    }

    /// Add a minimum-size widget at the first free cell near the origin.
    pub fn add_widget(&mut self, kind: &str) -> Result<Outcome, EngineError> {
        self.ensure_idle()?;
        if !CHART_KINDS.contains(&kind) {
            warn!("adding widget with unknown chart kind {}", kind);
        }
        let cfg = &self.config.grid;
        let id = self.layout.allocate_id();
        let size = cfg.default_widget_size();
        let origin = search_free_position(&self.layout, cfg, size, Cell { x: 0, y: 0 }, &id)
            .unwrap_or_else(|| stack_below(&self.layout, &id));
        let rect = RectI::new(origin, size);

        self.layout.push(Widget::new(id.clone(), kind, rect));
        self.charts.init_chart(&id, kind);
        debug!("added {} ({}) at ({}, {})", id, kind, rect.x, rect.y);
        self.commit(Outcome::Added { widget: id, rect })
    }

    pub fn remove_widget(&mut self, id: &WidgetId) -> Result<Outcome, EngineError> {
        self.ensure_idle()?;
        let removed = self
            .layout
            .remove(id)
            .ok_or_else(|| EngineError::UnknownWidget(id.clone()))?;
        self.charts.destroy_chart(&removed.id);
        self.commit(Outcome::Removed { widget: removed.id })
    }

    /// Move a widget one cell, only if the new spot is in bounds and free.
    pub fn nudge(&mut self, id: &WidgetId, direction: Direction) -> Result<Outcome, EngineError> {
        self.ensure_idle()?;
        let widget = self.widget(id)?;
        let (dx, dy) = direction.offset();
        let from = widget.origin();
        let to = Cell { x: from.x + dx, y: from.y + dy };
        let rect = widget.rect().at(to);

        let cfg = &self.config.grid;
        if !cfg.in_bounds(&rect) || has_collision(&rect, &self.layout, id) {
            return Ok(Outcome::Unchanged);
        }
        if let Some(w) = self.layout.get_mut(id) {
            w.move_to(to);
        }
        self.commit(Outcome::Moved { widget: id.clone(), from, to })
    }

    /// Single entry point for pointer events.
    pub fn dispatch(&mut self, event: PointerEvent, container: &ContainerRect) -> Result<Outcome, EngineError> {
        let cfg = self.config.grid.clone();
        match event {
            PointerEvent::DragStart { widget_id } => {
                self.ensure_idle()?;
                let session = drag::start_drag(&self.layout, &widget_id)
                    .ok_or_else(|| EngineError::UnknownWidget(widget_id.clone()))?;
                self.gesture = Gesture::Dragging(session);
                Ok(Outcome::DragStarted { widget: widget_id })
            }
            PointerEvent::DragOver { widget_id, .. } => match &mut self.gesture {
                Gesture::Dragging(session) => Ok(drag::drag_over(session, widget_id.as_ref())),
                _ => Ok(Outcome::Unchanged),
            },
            PointerEvent::Drop { client_x, client_y, target_widget_id } => {
                let Some(session) = self.take_drag() else {
                    return Ok(Outcome::Unchanged);
                };
                let outcome = match target_widget_id {
                    Some(target) if target != session.widget => {
                        drag::drop_on_widget(&mut self.layout, &cfg, &session, &target)
                    }
                    _ => {
                        let cell = cfg.cell_origin(client_x, client_y, container);
                        drag::drop_on_cell(&mut self.layout, &cfg, &session, cell)
                    }
                };
                self.commit(outcome)
            }
            PointerEvent::DragEnd => match self.take_drag() {
                Some(session) => Ok(drag::cancel_drag(&mut self.layout, &session)),
                None => Ok(Outcome::Unchanged),
            },
            PointerEvent::ResizeStart { widget_id, handle, client_x, client_y } => {
                self.ensure_idle()?;
                let session = ResizeSession::begin(&self.layout, &widget_id, handle, (client_x, client_y))
                    .ok_or_else(|| EngineError::UnknownWidget(widget_id.clone()))?;
                self.gesture = Gesture::Resizing(session);
                Ok(Outcome::ResizeStarted { widget: widget_id, handle })
            }
            PointerEvent::ResizeMove { client_x, client_y } => match &self.gesture {
                Gesture::Resizing(session) => Ok(resize::resize_move(
                    &mut self.layout,
                    &cfg,
                    session,
                    (client_x, client_y),
                    container,
                )),
                _ => Ok(Outcome::Unchanged),
            },
            PointerEvent::ResizeEnd => match std::mem::take(&mut self.gesture) {
                Gesture::Resizing(session) => {
                    let outcome = resize::resize_end(&mut self.layout, &cfg, &session);
                    self.commit(outcome)
                }
                other => {
                    self.gesture = other;
                    Ok(Outcome::Unchanged)
                }
            },
        }
    }

    fn take_drag(&mut self) -> Option<DragSession> {
        match std::mem::take(&mut self.gesture) {
            Gesture::Dragging(session) => Some(session),
            other => {
                self.gesture = other;
                None
            }
        }
    }
}
