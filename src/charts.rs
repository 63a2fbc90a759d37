//! Chart collaborator.
//!
//! The engine never touches chart data. It only tells the host when a chart
//! body has to be created, destroyed, or resized to a new widget geometry.

use serde::Serialize;

use crate::widget::WidgetId;

pub trait ChartHost {
    fn init_chart(&mut self, id: &WidgetId, kind: &str);
    fn destroy_chart(&mut self, id: &WidgetId);
    fn resize_chart(&mut self, id: &WidgetId);
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum ChartCommand {
    Init { id: WidgetId, kind: String },
    Destroy { id: WidgetId },
    Resize { id: WidgetId },
}

/// Collects chart commands so the host can run them after each call.
#[derive(Debug, Clone, Default)]
pub struct ChartCommandQueue {
    commands: Vec<ChartCommand>,
}

impl ChartCommandQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> &[ChartCommand] {
        &self.commands
    }

    pub fn drain(&mut self) -> Vec<ChartCommand> {
        std::mem::take(&mut self.commands)
    }
}

impl ChartHost for ChartCommandQueue {
    fn init_chart(&mut self, id: &WidgetId, kind: &str) {
        self.commands.push(ChartCommand::Init { id: id.clone(), kind: kind.to_string() });
    }

    fn destroy_chart(&mut self, id: &WidgetId) {
        self.commands.push(ChartCommand::Destroy { id: id.clone() });
    }

    fn resize_chart(&mut self, id: &WidgetId) {
        // Several resizes of one chart before the host drains are one resize.
        let cmd = ChartCommand::Resize { id: id.clone() };
        if !self.commands.contains(&cmd) {
            self.commands.push(cmd);
        }
    }
}
