use std::sync::Arc;

use crate::bridge::{Command, UNCONNECTED};
use crate::surface::Element;

const DIMMED_OPACITY: f32 = 0.5;

struct Port {
    selector: String,
    element: Arc<dyn Element>,
    name: String,
}

/// Patch-cord jacks and their simulator names. Only used to dim jacks with
/// nothing plugged in.
#[derive(Default)]
pub struct PortMap {
    ports: Vec<Port>,
}

impl PortMap {
    pub fn bind(
        &mut self,
        selector: &str,
        element: Arc<dyn Element>,
        name: &str,
    ) {
        self.ports.push(Port {
            selector: selector.to_string(),
            element,
            name: name.to_string(),
        });
    }

    /// One connectivity query per port, in binding order
    pub fn queries(&self) -> Vec<Command> {
        self.ports
            .iter()
            .map(|port| Command::query_port(&port.name))
            .collect()
    }

    /// Applies query outputs aligned with [`Self::queries`]. Returns the
    /// selectors of the ports that were dimmed.
    pub fn apply_connectivity(&self, outputs: &[String]) -> Vec<String> {
        self.ports
            .iter()
            .zip(outputs)
            .filter(|(_, output)| output.trim() == UNCONNECTED)
            .map(|(port, _)| {
                port.element.set_opacity(DIMMED_OPACITY);
                port.selector.clone()
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.ports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ports.is_empty()
    }
}
