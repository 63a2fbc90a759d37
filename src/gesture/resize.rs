// Live resize from any of eight handles.
//
// A handle is an edge set: for each axis, either the start edge (left/top),
// the end edge (right/bottom), or neither moves. Edges that do not move stay
// fixed in absolute cells, so dragging the top handle up grows `h` by exactly
// as much as `y` shrinks. Every pointer-move frame recomputes the geometry
// from the gesture's start, so a frame can fail and a later one succeed.

use log::debug;
use serde::{Deserialize, Serialize};

use super::Outcome;
use crate::grid::collision::has_collision;
use crate::grid::repair::{grow_to_min_area, repair_rect};
use crate::grid::{ContainerRect, GridConfig, RectI, SizeI};
use crate::widget::{Layout, WidgetId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResizeHandle {
    Top,
    Bottom,
    Left,
    Right,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

/// Which edge of an axis follows the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    /// Left or top.
    Start,
    /// Right or bottom.
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeSet {
    pub horizontal: Option<Edge>,
    pub vertical: Option<Edge>,
}

impl ResizeHandle {
    pub const ALL: [ResizeHandle; 8] = [
        ResizeHandle::Top,
        ResizeHandle::Bottom,
        ResizeHandle::Left,
        ResizeHandle::Right,
        ResizeHandle::TopLeft,
        ResizeHandle::TopRight,
        ResizeHandle::BottomLeft,
        ResizeHandle::BottomRight,
    ];

    pub fn edges(self) -> EdgeSet {
        use Edge::{End, Start};
        let (horizontal, vertical) = match self {
            ResizeHandle::Top => (None, Some(Start)),
            ResizeHandle::Bottom => (None, Some(End)),
            ResizeHandle::Left => (Some(Start), None),
            ResizeHandle::Right => (Some(End), None),
            ResizeHandle::TopLeft => (Some(Start), Some(Start)),
            ResizeHandle::TopRight => (Some(End), Some(Start)),
            ResizeHandle::BottomLeft => (Some(Start), Some(End)),
            ResizeHandle::BottomRight => (Some(End), Some(End)),
        };
        EdgeSet { horizontal, vertical }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResizeSession {
    pub widget: WidgetId,
    pub handle: ResizeHandle,
    /// Geometry when the gesture began.
    pub start: RectI,
    /// Pointer position (client pixels) when the gesture began.
    pub pointer: (f64, f64),
}

/// One axis of a rect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Span {
    pos: i32,
    len: i32,
}

impl Span {
    fn end(&self) -> i32 {
        self.pos + self.len
    }

    /// Same span with a new length, keeping the edge opposite `edge` fixed.
    fn with_len(self, edge: Option<Edge>, len: i32) -> Span {
        match edge {
            Some(Edge::Start) => Span { pos: self.end() - len, len },
            _ => Span { pos: self.pos, len },
        }
    }
}

struct AxisLimits {
    min_len: i32,
    max_len: i32,
    /// Far boundary of the axis; the vertical axis has none.
    extent: Option<i32>,
}

/// Length of an axis after moving `edge` by `delta` cells, before any collision handling.
fn dragged_len(start: Span, edge: Option<Edge>, delta: i32, limits: &AxisLimits) -> i32 {
    let (len, room) = match edge {
        None => return start.len,
        Some(Edge::End) => (start.len.saturating_add(delta), limits.extent.map(|e| e - start.pos)),
        Some(Edge::Start) => (start.len.saturating_sub(delta), Some(start.end())),
    };
    let len = len.clamp(limits.min_len, limits.max_len);
    room.map_or(len, |room| len.min(room))
}

impl ResizeSession {
    pub fn begin(layout: &Layout, id: &WidgetId, handle: ResizeHandle, pointer: (f64, f64)) -> Option<Self> {
        let widget = layout.get(id)?;
        Some(Self { widget: id.clone(), handle, start: widget.rect(), pointer })
    }

    fn spans(&self) -> (Span, Span) {
        (
            Span { pos: self.start.x, len: self.start.w },
            Span { pos: self.start.y, len: self.start.h },
        )
    }

    fn rect_with(&self, w: i32, h: i32) -> RectI {
        let edges = self.handle.edges();
        let (sx, sy) = self.spans();
        let x = sx.with_len(edges.horizontal, w);
        let y = sy.with_len(edges.vertical, h);
        RectI { x: x.pos, y: y.pos, w: x.len, h: y.len }
    }

    /// Geometry for a pointer displacement of `(dc, dr)` cells, or `None`
    /// when no valid collision-free geometry exists for this frame.
    pub fn candidate(&self, layout: &Layout, cfg: &GridConfig, dc: i32, dr: i32) -> Option<RectI> {
        let edges = self.handle.edges();
        let (sx, sy) = self.spans();
        let horizontal = AxisLimits { min_len: cfg.min_span, max_len: cfg.columns, extent: Some(cfg.columns) };
        let vertical = AxisLimits { min_len: cfg.min_span, max_len: cfg.max_height, extent: None };

        let size = SizeI {
            w: dragged_len(sx, edges.horizontal, dc, &horizontal),
            h: dragged_len(sy, edges.vertical, dr, &vertical),
        };
        let SizeI { w, h } = grow_to_min_area(size, cfg);

        let fits = |rect: &RectI| cfg.in_bounds(rect) && cfg.size_allowed(rect.size());
        if !fits(&self.rect_with(w, h)) {
            return None;
        }

        // Shrink the dragged dimensions one cell at a time until clear.
        let widths: Vec<i32> = match edges.horizontal {
            Some(_) => (cfg.min_span..=w).rev().collect(),
            None => vec![w],
        };
        let heights: Vec<i32> = match edges.vertical {
            Some(_) => (cfg.min_span..=h).rev().collect(),
            None => vec![h],
        };
        for &w in &widths {
            for &h in &heights {
                let rect = self.rect_with(w, h);
                if fits(&rect) && !has_collision(&rect, layout, &self.widget) {
                    return Some(rect);
                }
            }
        }
        None
    }
}

/// Apply one pointer-move frame.
pub fn resize_move(
    layout: &mut Layout,
    cfg: &GridConfig,
    session: &ResizeSession,
    pointer: (f64, f64),
    container: &ContainerRect,
) -> Outcome {
    let Some(current) = layout.get(&session.widget).map(|w| w.rect()) else {
        return Outcome::Unchanged;
    };
    let (dc, dr) = cfg.cell_delta(pointer.0 - session.pointer.0, pointer.1 - session.pointer.1, container);

    match session.candidate(layout, cfg, dc, dr) {
        Some(rect) if rect == current => Outcome::Unchanged,
        Some(rect) => {
            if let Some(w) = layout.get_mut(&session.widget) {
                w.set_rect(rect);
            }
            Outcome::Resized { widget: session.widget.clone(), rect }
        }
        None => Outcome::FrameRejected { widget: session.widget.clone() },
    }
}

/// Finish the gesture with a last bounds / minimum-area snap.
pub fn resize_end(layout: &mut Layout, cfg: &GridConfig, session: &ResizeSession) -> Outcome {
    let Some(current) = layout.get(&session.widget).map(|w| w.rect()) else {
        return Outcome::Unchanged;
    };
    let rect = match repair_rect(current, cfg) {
        Some(snapped) if snapped != current && !has_collision(&snapped, layout, &session.widget) => {
            if let Some(w) = layout.get_mut(&session.widget) {
                w.set_rect(snapped);
            }
            snapped
        }
        _ => current,
    };
    let changed = rect != session.start;
    if changed {
        debug!(
            "resized {} from {}x{} to {}x{} at ({}, {})",
            session.widget, session.start.w, session.start.h, rect.w, rect.h, rect.x, rect.y
        );
    }
    Outcome::ResizeFinished { widget: session.widget.clone(), rect, changed }
}
