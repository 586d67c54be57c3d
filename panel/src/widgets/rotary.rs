use std::sync::Arc;

use parking_lot::Mutex;

use crate::bridge::{Command, CommandSender};
use crate::context::CalibrationHook;
use crate::core::prelude::*;
use crate::surface::{Element, PointerEvent, Propagation};

/// One stop of a rotary switch
#[derive(Clone, Debug, PartialEq)]
pub struct Detent {
    pub value: String,
    pub degrees: f32,
}

impl Detent {
    pub fn new(value: &str, degrees: f32) -> Self {
        Self {
            value: value.to_string(),
            degrees,
        }
    }
}

/// A multi-position selector. Clicking steps to the next detent (or the
/// previous one with the modifier held), wrapping at both ends.
///
/// The switch starts at its 0 degree detent. Values confirmed by the simulator
/// arrive through [`Self::set_value`], which moves the dial without sending
/// anything back.
pub struct RotarySwitch {
    selector: String,
    element: Arc<dyn Element>,
    simulator_name: Option<String>,
    detents: Vec<Detent>,
    index: Mutex<usize>,
    commands: CommandSender,
    calibration: CalibrationHook,
}

impl RotarySwitch {
    pub fn new(
        selector: &str,
        element: Arc<dyn Element>,
        simulator_name: Option<&str>,
        detents: Vec<Detent>,
        commands: CommandSender,
        calibration: CalibrationHook,
    ) -> Result<Self, ConfigError> {
        if detents.is_empty() {
            return Err(ConfigError::EmptySettings {
                selector: selector.to_string(),
            });
        }

        let index = detents.iter().position(|d| d.degrees == 0.0).ok_or_else(
            || ConfigError::MissingDefaultDetent {
                selector: selector.to_string(),
            },
        )?;

        if let Some(value) = first_duplicate(&detents) {
            warn_once!(
                "{} lists `{}` more than once; the first occurrence wins",
                selector, value
            );
        }

        element.set_rotation(detents[index].degrees);

        Ok(Self {
            selector: selector.to_string(),
            element,
            simulator_name: simulator_name.map(str::to_string),
            detents,
            index: Mutex::new(index),
            commands,
            calibration,
        })
    }

    pub fn selector(&self) -> &str {
        &self.selector
    }

    pub fn simulator_name(&self) -> Option<&str> {
        self.simulator_name.as_deref()
    }

    pub fn detents(&self) -> &[Detent] {
        &self.detents
    }

    pub fn index(&self) -> usize {
        *self.index.lock()
    }

    pub fn detent(&self) -> &Detent {
        &self.detents[self.index()]
    }

    pub fn value(&self) -> &str {
        &self.detent().value
    }

    pub fn handle(&self, event: PointerEvent) -> Propagation {
        match event {
            PointerEvent::Click { reverse } => {
                self.click(reverse);
                Propagation::Stop
            }
            PointerEvent::Press | PointerEvent::Release => Propagation::Stop,
            PointerEvent::ContextMenu => Propagation::Continue,
        }
    }

    /// Steps one detent and tells the simulator. Returns the new value when
    /// the position changed.
    pub fn click(&self, reverse: bool) -> Option<String> {
        let current = self.index();
        let next = step(current, self.detents.len(), reverse);
        if next == current {
            return None;
        }

        self.update(next);
        let value = self.detents[next].value.clone();

        if let Some(name) = &self.simulator_name {
            self.commands.send(Command::set_switch(name, &value));
        }

        Some(value)
    }

    /// Moves to the first detent holding `value` without emitting a command.
    /// Returns `false` and leaves the switch alone when no detent matches.
    pub fn set_value(&self, value: &str) -> bool {
        match self.detents.iter().position(|d| d.value == value) {
            Some(index) => {
                self.update(index);
                true
            }
            None => false,
        }
    }

    fn update(&self, index: usize) {
        *self.index.lock() = index;
        self.element.set_rotation(self.detents[index].degrees);
        self.calibration.track(&self.selector, self.element.clone());
    }
}

fn step(index: usize, len: usize, reverse: bool) -> usize {
    if reverse {
        if index == 0 { len - 1 } else { index - 1 }
    } else if index + 1 >= len {
        0
    } else {
        index + 1
    }
}

fn first_duplicate(detents: &[Detent]) -> Option<&str> {
    detents.iter().enumerate().find_map(|(i, detent)| {
        detents[..i]
            .iter()
            .any(|earlier| earlier.value == detent.value)
            .then_some(detent.value.as_str())
    })
}
