//! The seam between the binding engine and whatever draws the panel artwork.
//!
//! The engine never computes geometry. It asks an [`Element`] to rotate,
//! scale, recolor or fade and leaves pivots and transform composition to the
//! implementation. [`MemorySurface`] is a headless implementation that records
//! every change.

use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::Mutex;

use crate::core::prelude::*;

pub trait Element: Send + Sync {
    fn set_fill(&self, color: &str);

    /// Rotation in degrees about the element's own pivot. Replaces any
    /// previous rotation rather than accumulating.
    fn set_rotation(&self, degrees: f32);

    /// Scale about the element's center. `(-1.0, 1.0)` is a horizontal flip.
    fn set_scale(&self, x: f32, y: f32);

    fn set_opacity(&self, opacity: f32);
}

pub trait Surface: Send + Sync {
    fn element(&self, selector: &str) -> Option<Arc<dyn Element>>;

    /// Frames the view around the element matching `selector`
    fn zoom_to(&self, selector: &str);

    fn reset_view(&self);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerEvent {
    /// `reverse` is set while the modifier key is held
    Click { reverse: bool },
    Press,
    Release,
    ContextMenu,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Propagation {
    Continue,
    Stop,
}

//------------------------------------------------------------------------------
// Headless surface
//------------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq)]
pub struct ElementState {
    pub fill: Option<String>,
    pub rotation: f32,
    pub scale: (f32, f32),
    pub opacity: f32,
}

impl Default for ElementState {
    fn default() -> Self {
        Self {
            fill: None,
            rotation: 0.0,
            scale: (1.0, 1.0),
            opacity: 1.0,
        }
    }
}

pub struct MemoryElement {
    selector: String,
    state: Mutex<ElementState>,
}

impl MemoryElement {
    fn new(selector: &str) -> Self {
        Self {
            selector: selector.to_string(),
            state: Mutex::new(ElementState::default()),
        }
    }

    pub fn state(&self) -> ElementState {
        self.state.lock().clone()
    }
}

impl Element for MemoryElement {
    fn set_fill(&self, color: &str) {
        trace!("{} fill {}", self.selector, color);
        self.state.lock().fill = Some(color.to_string());
    }

    fn set_rotation(&self, degrees: f32) {
        trace!("{} rotate {}", self.selector, degrees);
        self.state.lock().rotation = degrees;
    }

    fn set_scale(&self, x: f32, y: f32) {
        trace!("{} scale {} {}", self.selector, x, y);
        self.state.lock().scale = (x, y);
    }

    fn set_opacity(&self, opacity: f32) {
        trace!("{} opacity {}", self.selector, opacity);
        self.state.lock().opacity = opacity;
    }
}

/// Keeps every element in memory, keyed by selector.
///
/// A strict surface only knows the selectors it was created with, like a
/// document that lacks some artwork. A lenient surface creates elements on
/// first lookup, which lets the viewer run against any configuration.
#[derive(Default)]
pub struct MemorySurface {
    elements: Mutex<IndexMap<String, Arc<MemoryElement>>>,
    lenient: bool,
    view: Mutex<Option<String>>,
}

impl MemorySurface {
    pub fn with_elements<S: AsRef<str>>(selectors: &[S]) -> Self {
        let surface = Self::default();
        {
            let mut elements = surface.elements.lock();
            for selector in selectors {
                let selector = selector.as_ref();
                elements.insert(
                    selector.to_string(),
                    Arc::new(MemoryElement::new(selector)),
                );
            }
        }
        surface
    }

    pub fn lenient() -> Self {
        Self {
            lenient: true,
            ..Self::default()
        }
    }

    pub fn state(&self, selector: &str) -> Option<ElementState> {
        self.elements.lock().get(selector).map(|e| e.state())
    }

    pub fn states(&self) -> Vec<(String, ElementState)> {
        self.elements
            .lock()
            .iter()
            .map(|(selector, e)| (selector.clone(), e.state()))
            .collect()
    }

    /// The selector currently framed, `None` for the default view
    pub fn view(&self) -> Option<String> {
        self.view.lock().clone()
    }
}

impl Surface for MemorySurface {
    fn element(&self, selector: &str) -> Option<Arc<dyn Element>> {
        let mut elements = self.elements.lock();
        if let Some(element) = elements.get(selector) {
            return Some(element.clone() as Arc<dyn Element>);
        }
        if !self.lenient {
            return None;
        }
        let element = Arc::new(MemoryElement::new(selector));
        elements.insert(selector.to_string(), element.clone());
        Some(element)
    }

    fn zoom_to(&self, selector: &str) {
        debug!("framing {}", selector);
        *self.view.lock() = Some(selector.to_string());
    }

    fn reset_view(&self) {
        debug!("default view");
        *self.view.lock() = None;
    }
}
