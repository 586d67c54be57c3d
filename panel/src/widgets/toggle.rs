use std::sync::Arc;

use parking_lot::Mutex;

use crate::surface::{Element, PointerEvent, Propagation};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToggleState {
    On,
    Off,
}

impl ToggleState {
    fn flipped(self) -> Self {
        match self {
            ToggleState::On => ToggleState::Off,
            ToggleState::Off => ToggleState::On,
        }
    }

    fn scale(self) -> (f32, f32) {
        match self {
            ToggleState::On => (1.0, 1.0),
            ToggleState::Off => (-1.0, 1.0),
        }
    }
}

/// Two-position lever. Presentation only: flipping it never reaches the
/// simulator, even when the document names a simulator switch.
pub struct ToggleSwitch {
    selector: String,
    element: Arc<dyn Element>,
    simulator_name: Option<String>,
    state: Mutex<ToggleState>,
}

impl ToggleSwitch {
    pub fn new(
        selector: &str,
        element: Arc<dyn Element>,
        simulator_name: Option<&str>,
    ) -> Self {
        let state = ToggleState::On;
        let (x, y) = state.scale();
        element.set_scale(x, y);

        Self {
            selector: selector.to_string(),
            element,
            simulator_name: simulator_name.map(str::to_string),
            state: Mutex::new(state),
        }
    }

    pub fn selector(&self) -> &str {
        &self.selector
    }

    pub fn simulator_name(&self) -> Option<&str> {
        self.simulator_name.as_deref()
    }

    pub fn state(&self) -> ToggleState {
        *self.state.lock()
    }

    pub fn handle(&self, event: PointerEvent) -> Propagation {
        match event {
            PointerEvent::Click { .. } => {
                self.flip();
                Propagation::Stop
            }
            PointerEvent::Press | PointerEvent::Release => Propagation::Stop,
            PointerEvent::ContextMenu => Propagation::Continue,
        }
    }

    pub fn flip(&self) -> ToggleState {
        let mut state = self.state.lock();
        *state = state.flipped();
        let (x, y) = state.scale();
        self.element.set_scale(x, y);
        *state
    }
}
