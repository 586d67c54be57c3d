//! State shared by every widget of one panel. Constructed once per panel and
//! handed to the controllers that need it.

use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::Mutex;

use crate::bridge::CommandSender;
use crate::surface::Element;
use crate::widgets::RotarySwitch;

pub struct PanelContext {
    pub commands: CommandSender,
    pub switches: SwitchRegistry,
    pub calibration: CalibrationHook,
}

impl PanelContext {
    pub fn new(commands: CommandSender) -> Self {
        Self {
            commands,
            switches: SwitchRegistry::default(),
            calibration: CalibrationHook::default(),
        }
    }
}

/// Maps a simulator switch name to every rotary switch bound to it, in
/// registration order. Several dials on different panels can drive the same
/// simulator switch; a confirmed value fans out to all of them.
#[derive(Default)]
pub struct SwitchRegistry {
    switches: Mutex<IndexMap<String, Vec<Arc<RotarySwitch>>>>,
}

impl SwitchRegistry {
    pub fn register(&self, name: &str, switch: Arc<RotarySwitch>) {
        self.switches
            .lock()
            .entry(name.to_string())
            .or_default()
            .push(switch);
    }

    pub fn names(&self) -> Vec<String> {
        self.switches.lock().keys().cloned().collect()
    }

    pub fn get(&self, name: &str) -> Vec<Arc<RotarySwitch>> {
        self.switches.lock().get(name).cloned().unwrap_or_default()
    }

    /// Moves every switch bound to `name` to the detent holding `value`
    /// without emitting commands. Returns how many switches matched.
    pub fn apply(&self, name: &str, value: &str) -> usize {
        let mut matched = 0;
        for switch in self.get(name) {
            if switch.set_value(value) {
                matched += 1;
            }
        }
        matched
    }

    pub fn len(&self) -> usize {
        self.switches.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Remembers the rotary switch that moved last so its angle can be tuned by
/// hand while authoring detent angles.
#[derive(Clone, Default)]
pub struct CalibrationHook {
    last: Arc<Mutex<Option<(String, Arc<dyn Element>)>>>,
}

impl CalibrationHook {
    pub fn track(&self, selector: &str, element: Arc<dyn Element>) {
        *self.last.lock() = Some((selector.to_string(), element));
    }

    /// Rotates the tracked switch without changing its detent. Returns the
    /// selector that was adjusted.
    pub fn adjust(&self, degrees: f32) -> Option<String> {
        let last = self.last.lock();
        let (selector, element) = last.as_ref()?;
        element.set_rotation(degrees);
        Some(selector.clone())
    }

    pub fn selector(&self) -> Option<String> {
        self.last.lock().as_ref().map(|(selector, _)| selector.clone())
    }
}
