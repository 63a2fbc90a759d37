// Pointer gestures over the grid.
//
// At most one gesture is active: Idle -> Dragging | Resizing -> Idle.
// Controllers take the layout by reference and report what they did as an
// Outcome; they never persist anything themselves.
//
// Submodules:
// - drag: swap / relocate a widget on drop
// - resize: live resize from one of eight handles

use serde::{Deserialize, Serialize};

use crate::grid::{Cell, RectI};
use crate::widget::WidgetId;

pub mod drag;
pub mod resize;

pub use drag::DragSession;
pub use resize::{Edge, EdgeSet, ResizeHandle, ResizeSession};

#[derive(Debug, Clone, Default, PartialEq)]
pub enum Gesture {
    #[default]
    Idle,
    Dragging(DragSession),
    Resizing(ResizeSession),
}

impl Gesture {
    pub fn is_idle(&self) -> bool {
        matches!(self, Gesture::Idle)
    }
}

/// Normalized pointer events from the host UI.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum PointerEvent {
    DragStart {
        widget_id: WidgetId,
    },
    DragOver {
        #[serde(default)]
        widget_id: Option<WidgetId>,
        client_x: f64,
        client_y: f64,
    },
    Drop {
        client_x: f64,
        client_y: f64,
        #[serde(default)]
        target_widget_id: Option<WidgetId>,
    },
    DragEnd,
    ResizeStart {
        widget_id: WidgetId,
        handle: ResizeHandle,
        client_x: f64,
        client_y: f64,
    },
    ResizeMove {
        client_x: f64,
        client_y: f64,
    },
    ResizeEnd,
}

/// What an operation did to the layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Outcome {
    Unchanged,
    Added { widget: WidgetId, rect: RectI },
    Removed { widget: WidgetId },
    DragStarted { widget: WidgetId },
    Hovering { widget: WidgetId, target: Option<WidgetId> },
    Moved { widget: WidgetId, from: Cell, to: Cell },
    Swapped { dragged: WidgetId, target: WidgetId },
    /// Swap fallback: both widgets went to the nearest free cells instead.
    Relocated { dragged: WidgetId, dragged_to: Cell, target: WidgetId, target_to: Cell },
    DragCancelled { widget: WidgetId },
    ResizeStarted { widget: WidgetId, handle: ResizeHandle },
    Resized { widget: WidgetId, rect: RectI },
    /// This pointer-move frame had no valid geometry; the widget kept its last one.
    FrameRejected { widget: WidgetId },
    ResizeFinished { widget: WidgetId, rect: RectI, changed: bool },
}

impl Outcome {
    /// Whether the layout must be persisted after this outcome.
    pub fn is_commit(&self) -> bool {
        matches!(
            self,
            Outcome::Added { .. }
                | Outcome::Removed { .. }
                | Outcome::Moved { .. }
                | Outcome::Swapped { .. }
                | Outcome::Relocated { .. }
                | Outcome::ResizeFinished { .. }
        )
    }

    /// Widgets whose chart has to be resized after a commit.
    pub fn reshaped(&self) -> Vec<&WidgetId> {
        match self {
            Outcome::Moved { widget, .. } => vec![widget],
            Outcome::Swapped { dragged, target } | Outcome::Relocated { dragged, target, .. } => {
                vec![dragged, target]
            }
            Outcome::ResizeFinished { widget, changed: true, .. } => vec![widget],
            _ => Vec::new(),
        }
    }
}
