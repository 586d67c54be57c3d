use std::sync::Arc;

use parking_lot::Mutex;

use crate::bridge::{Command, CommandSender};
use crate::surface::{Element, PointerEvent, Propagation};

const PRESSED_SCALE: f32 = 0.8;

/// Momentary push button. Sinks while held; the simulator hears about it
/// once, on release.
pub struct Button {
    selector: String,
    element: Arc<dyn Element>,
    simulator_name: Option<String>,
    pressed: Mutex<bool>,
    commands: CommandSender,
}

impl Button {
    pub fn new(
        selector: &str,
        element: Arc<dyn Element>,
        simulator_name: Option<&str>,
        commands: CommandSender,
    ) -> Self {
        Self {
            selector: selector.to_string(),
            element,
            simulator_name: simulator_name.map(str::to_string),
            pressed: Mutex::new(false),
            commands,
        }
    }

    pub fn selector(&self) -> &str {
        &self.selector
    }

    pub fn simulator_name(&self) -> Option<&str> {
        self.simulator_name.as_deref()
    }

    pub fn is_pressed(&self) -> bool {
        *self.pressed.lock()
    }

    pub fn handle(&self, event: PointerEvent) -> Propagation {
        match event {
            PointerEvent::Press => self.press(),
            PointerEvent::Release => self.release(),
            PointerEvent::Click { .. } => {}
            PointerEvent::ContextMenu => return Propagation::Continue,
        }
        Propagation::Stop
    }

    pub fn press(&self) {
        *self.pressed.lock() = true;
        self.element.set_scale(PRESSED_SCALE, PRESSED_SCALE);
    }

    /// Pops the button back up. A release that was not preceded by a press
    /// (the pointer went down elsewhere) sends nothing.
    pub fn release(&self) {
        let was_pressed = std::mem::replace(&mut *self.pressed.lock(), false);
        self.element.set_scale(1.0, 1.0);

        if !was_pressed {
            return;
        }
        if let Some(name) = &self.simulator_name {
            self.commands.send(Command::press_button(name));
        }
    }
}
