use std::sync::Arc;

use crate::surface::{PointerEvent, Propagation, Surface};

/// A panel area that frames itself when clicked. A context click returns to
/// the full machine view.
pub struct SelectableRegion {
    selector: String,
    surface: Arc<dyn Surface>,
}

impl SelectableRegion {
    pub fn new(selector: &str, surface: Arc<dyn Surface>) -> Self {
        Self {
            selector: selector.to_string(),
            surface,
        }
    }

    pub fn selector(&self) -> &str {
        &self.selector
    }

    /// The innermost region under the pointer wins; outer regions never see
    /// an event this region handled.
    pub fn handle(&self, event: PointerEvent) -> Propagation {
        match event {
            PointerEvent::Click { .. } => {
                self.surface.zoom_to(&self.selector);
                Propagation::Stop
            }
            PointerEvent::ContextMenu => {
                self.surface.reset_view();
                Propagation::Stop
            }
            PointerEvent::Press | PointerEvent::Release => {
                Propagation::Continue
            }
        }
    }
}
