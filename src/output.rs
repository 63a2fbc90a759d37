//! Output types for the host UI.
//!
//! Every call into the engine answers with one `EventOutput`, serialized to
//! JSON: what happened, the widgets to render, and the chart commands the
//! host has to run.

use serde::Serialize;

use crate::charts::ChartCommand;
use crate::error::EngineError;
use crate::gesture::Outcome;
use crate::grid::RectI;
use crate::widget::Layout;

/// A widget ready for the host to position
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WidgetOutput {
    pub id: String,
    /// Chart kind: "line", "bar", "column", "pie"
    pub kind: String,
    /// Grid cells, not pixels
    pub bounds: RectI,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorInfo {
    pub message: String,
}

impl From<&EngineError> for ErrorInfo {
    fn from(e: &EngineError) -> Self {
        Self { message: e.to_string() }
    }
}

/// The combined output sent to the host
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventOutput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<Outcome>,
    pub widgets: Vec<WidgetOutput>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub charts: Vec<ChartCommand>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorInfo>,
}

impl EventOutput {
    pub fn new(layout: &Layout, outcome: Option<Outcome>, charts: Vec<ChartCommand>) -> Self {
        let widgets = layout
            .iter()
            .map(|w| WidgetOutput { id: w.id.0.clone(), kind: w.kind.clone(), bounds: w.rect() })
            .collect();
        Self { outcome, widgets, charts, error: None }
    }

    /// Build the output for an engine call, successful or not. The layout is
    /// always included since a failed save still leaves the change applied.
    pub fn from_result(layout: &Layout, result: Result<Outcome, EngineError>, charts: Vec<ChartCommand>) -> Self {
        match result {
            Ok(outcome) => Self::new(layout, Some(outcome), charts),
            Err(e) => Self::new(layout, None, charts).with_error(ErrorInfo::from(&e)),
        }
    }

    pub fn with_error(mut self, error: ErrorInfo) -> Self {
        self.error = Some(error);
        self
    }
}
