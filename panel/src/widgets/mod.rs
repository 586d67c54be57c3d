pub mod button;
pub mod indicator;
pub mod port;
pub mod region;
pub mod rotary;
pub mod toggle;

use std::sync::Arc;

pub use button::Button;
pub use indicator::IndicatorBoard;
pub use port::PortMap;
pub use region::SelectableRegion;
pub use rotary::{Detent, RotarySwitch};
pub use toggle::{ToggleState, ToggleSwitch};

use crate::surface::{PointerEvent, Propagation};

/// An input widget bound from the switch document
pub enum Widget {
    Rotary(Arc<RotarySwitch>),
    Toggle(ToggleSwitch),
    Button(Button),
}

impl Widget {
    pub fn handle(&self, event: PointerEvent) -> Propagation {
        match self {
            Widget::Rotary(rotary) => rotary.handle(event),
            Widget::Toggle(toggle) => toggle.handle(event),
            Widget::Button(button) => button.handle(event),
        }
    }

    pub fn selector(&self) -> &str {
        match self {
            Widget::Rotary(rotary) => rotary.selector(),
            Widget::Toggle(toggle) => toggle.selector(),
            Widget::Button(button) => button.selector(),
        }
    }
}
