//! Record of which components a cycle passed through.
//!
//! Diagram presentations animate these steps one after another; the core
//! only produces the sequence.

use core::fmt;

/// A participant in one of the two architectures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Component {
    Sensor,
    Controller,
    Model,
    View,
    Mediator,
    Heater,
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Component::Sensor => "Sensor",
            Component::Controller => "Controller",
            Component::Model => "Model",
            Component::View => "View",
            Component::Mediator => "Mediator",
            Component::Heater => "Heater",
        };
        f.write_str(name)
    }
}

/// One step of a cycle: a component doing work, or a message travelling
/// between two components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlowStep {
    Node(Component),
    Link { from: Component, to: Component },
}

impl fmt::Display for FlowStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlowStep::Node(component) => write!(f, "{component}"),
            FlowStep::Link { from, to } => write!(f, "{from}->{to}"),
        }
    }
}

/// Ordered steps taken during one cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleFlow {
    steps: Vec<FlowStep>,
}

impl CycleFlow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start the flow at `component`.
    pub fn starting_at(component: Component) -> Self {
        Self {
            steps: vec![FlowStep::Node(component)],
        }
    }

    /// Append a link from the last visited component to `next`, then `next`.
    pub fn then(mut self, next: Component) -> Self {
        self.push_hop(next);
        self
    }

    pub(crate) fn push_hop(&mut self, next: Component) {
        if let Some(from) = self.last_component() {
            self.steps.push(FlowStep::Link { from, to: next });
        }
        self.steps.push(FlowStep::Node(next));
    }

    fn last_component(&self) -> Option<Component> {
        self.steps.iter().rev().find_map(|step| match step {
            FlowStep::Node(component) => Some(*component),
            FlowStep::Link { .. } => None,
        })
    }

    pub fn steps(&self) -> &[FlowStep] {
        &self.steps
    }

    /// Whether `component` was active during the cycle.
    pub fn visits(&self, component: Component) -> bool {
        self.steps.contains(&FlowStep::Node(component))
    }

    /// Whether the cycle carried anything from `from` to `to`.
    pub fn crosses(&self, from: Component, to: Component) -> bool {
        self.steps.contains(&FlowStep::Link { from, to })
    }
}

impl fmt::Display for CycleFlow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, step) in self.steps.iter().enumerate() {
            if index > 0 {
                f.write_str(" | ")?;
            }
            write!(f, "{step}")?;
        }
        Ok(())
    }
}
