//! Gridboard core: the layout engine behind a drag-and-drop dashboard.
//!
//! Widgets live on a fixed-column grid. The engine keeps them in bounds and
//! free of overlaps while the user drags, swaps, and resizes them, and
//! persists the layout after every committed change.

pub mod charts;
pub mod engine;
pub mod error;
pub mod gesture;
pub mod grid;
pub mod output;
pub mod store;
pub mod wasm;
pub mod widget;

pub use charts::{ChartCommand, ChartCommandQueue, ChartHost};
pub use engine::{Dashboard, DashboardConfig, Direction};
pub use error::{EngineError, StoreError};
pub use gesture::{Gesture, Outcome, PointerEvent, ResizeHandle};
pub use grid::{Cell, ContainerRect, GridConfig, RectI, SizeI};
pub use output::{EventOutput, WidgetOutput};
pub use store::{KeyValueStore, LayoutStore, MemoryStore, LAYOUT_KEY};
pub use widget::{Layout, Widget, WidgetId, CHART_KINDS};
