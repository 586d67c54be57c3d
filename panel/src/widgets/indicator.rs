//! Neon indicator lamps.
//!
//! Every lamp is re-evaluated against the latest snapshot once per frame, so a
//! lamp lags the machine by at most one frame. Lamps are not indexed by the
//! state they watch.

use std::sync::Arc;

use crate::state::{Predicate, Snapshot};
use crate::surface::Element;

pub const ON_COLOR: &str = "#ffd43a";
pub const OFF_COLOR: &str = "#574400";

struct Indicator {
    selector: String,
    element: Arc<dyn Element>,
    predicate: Predicate,
    lit: bool,
}

#[derive(Default)]
pub struct IndicatorBoard {
    indicators: Vec<Indicator>,
}

impl IndicatorBoard {
    /// Adds a lamp, initially dark.
    pub fn bind(
        &mut self,
        selector: &str,
        element: Arc<dyn Element>,
        predicate: Predicate,
    ) {
        element.set_fill(OFF_COLOR);
        self.indicators.push(Indicator {
            selector: selector.to_string(),
            element,
            predicate,
            lit: false,
        });
    }

    /// Evaluates every lamp against `snapshot` in binding order. Only lamps
    /// whose state changed are repainted. Returns the number repainted.
    pub fn sweep(&mut self, snapshot: &Snapshot) -> usize {
        let mut changed = 0;
        for indicator in &mut self.indicators {
            let lit = (indicator.predicate)(snapshot);
            if lit != indicator.lit {
                indicator.lit = lit;
                indicator
                    .element
                    .set_fill(if lit { ON_COLOR } else { OFF_COLOR });
                changed += 1;
            }
        }
        changed
    }

    pub fn is_lit(&self, selector: &str) -> Option<bool> {
        self.indicators
            .iter()
            .find(|i| i.selector == selector)
            .map(|i| i.lit)
    }

    pub fn lit(&self) -> Vec<String> {
        self.indicators
            .iter()
            .filter(|i| i.lit)
            .map(|i| i.selector.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.indicators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indicators.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::state::StatePath;
    use crate::surface::{MemorySurface, Surface};

    fn board(surface: &MemorySurface) -> IndicatorBoard {
        let mut board = IndicatorBoard::default();
        for pulse in 0..3 {
            let selector = format!("#pulse-{}", pulse);
            board.bind(
                &selector,
                surface.element(&selector).unwrap(),
                StatePath::new("cycling")
                    .field("pulse")
                    .equals(pulse)
                    .compile(),
            );
        }
        board
    }

    #[test]
    fn test_starts_dark_before_any_snapshot() {
        let surface = MemorySurface::lenient();
        let mut board = board(&surface);
        assert_eq!(board.sweep(&Snapshot::empty()), 0);
        for pulse in 0..3 {
            let state = surface.state(&format!("#pulse-{}", pulse)).unwrap();
            assert_eq!(state.fill.as_deref(), Some(OFF_COLOR));
        }
        assert!(board.lit().is_empty());
    }

    #[test]
    fn test_sweep_follows_snapshot() {
        let surface = MemorySurface::lenient();
        let mut board = board(&surface);

        let snapshot = Snapshot::from_value(json!({"cycling": "2"}));
        assert_eq!(board.sweep(&snapshot), 1);
        assert_eq!(board.is_lit("#pulse-1"), Some(true));
        assert_eq!(
            surface.state("#pulse-1").unwrap().fill.as_deref(),
            Some(ON_COLOR)
        );

        let snapshot = Snapshot::from_value(json!({"cycling": "4"}));
        assert_eq!(board.sweep(&snapshot), 2);
        assert_eq!(board.lit(), vec!["#pulse-2".to_string()]);
        assert_eq!(
            surface.state("#pulse-1").unwrap().fill.as_deref(),
            Some(OFF_COLOR)
        );
    }

    #[test]
    fn test_unchanged_lamps_are_not_repainted() {
        let surface = MemorySurface::lenient();
        let mut board = board(&surface);
        let snapshot = Snapshot::from_value(json!({"cycling": "0"}));
        assert_eq!(board.sweep(&snapshot), 1);
        assert_eq!(board.sweep(&snapshot), 0);
    }
}
