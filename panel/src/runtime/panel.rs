//! The bound front panel: every widget built from the configuration documents,
//! plus pointer-event routing and the per-frame indicator sweep.

use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::Mutex;

use crate::bridge::CommandSender;
use crate::config::{
    IndicatorsDocument, PanelConfig, PortsDocument, RegionsDocument,
    SwitchConfig, SwitchesDocument,
};
use crate::context::PanelContext;
use crate::core::prelude::*;
use crate::state::Snapshot;
use crate::surface::{Element, PointerEvent, Propagation, Surface};
use crate::widgets::{
    Button, Detent, IndicatorBoard, PortMap, RotarySwitch, SelectableRegion,
    ToggleSwitch, Widget,
};

pub struct Panel {
    surface: Arc<dyn Surface>,
    context: PanelContext,
    widgets: IndexMap<String, Widget>,
    regions: IndexMap<String, SelectableRegion>,
    indicators: Mutex<IndicatorBoard>,
    ports: PortMap,
}

impl Panel {
    pub fn new(surface: Arc<dyn Surface>, commands: CommandSender) -> Self {
        Self {
            surface,
            context: PanelContext::new(commands),
            widgets: IndexMap::new(),
            regions: IndexMap::new(),
            indicators: Mutex::new(IndicatorBoard::default()),
            ports: PortMap::default(),
        }
    }

    /// Binds whatever documents loaded. Missing documents contribute nothing.
    pub fn from_config(
        surface: Arc<dyn Surface>,
        commands: CommandSender,
        config: &PanelConfig,
    ) -> Self {
        let mut panel = Self::new(surface, commands);
        if let Some(document) = &config.switches {
            panel.configure_switches(document);
        }
        if let Some(document) = &config.indicators {
            panel.configure_indicators(document);
        }
        if let Some(document) = &config.regions {
            panel.configure_regions(document);
        }
        if let Some(document) = &config.ports {
            panel.configure_ports(document);
        }
        panel
    }

    //--------------------------------------------------------------------------
    // Binding
    //--------------------------------------------------------------------------

    /// Returns the number of widgets bound. A widget that cannot be built is
    /// logged and skipped.
    pub fn configure_switches(&mut self, document: &SwitchesDocument) -> usize {
        let mut bound = 0;
        for (selector, entry) in document {
            let widget = entry
                .parsed(selector)
                .and_then(|config| self.build_widget(selector, config));
            match widget {
                Ok(widget) => {
                    self.widgets.insert(selector.clone(), widget);
                    bound += 1;
                }
                Err(err) => error!("{}", err),
            }
        }
        info!("Bound {} of {} switches", bound, document.len());
        bound
    }

    fn build_widget(
        &self,
        selector: &str,
        config: &SwitchConfig,
    ) -> Result<Widget, ConfigError> {
        let element = self.element(selector)?;
        let name = config.simulator_name();

        let widget = match config {
            SwitchConfig::Rotary { settings, .. } => {
                let switch = Arc::new(RotarySwitch::new(
                    selector,
                    element,
                    name,
                    settings.iter().map(Detent::from).collect(),
                    self.context.commands.clone(),
                    self.context.calibration.clone(),
                )?);
                if let Some(name) = name {
                    self.context.switches.register(name, switch.clone());
                }
                Widget::Rotary(switch)
            }
            SwitchConfig::Toggle { .. } => {
                Widget::Toggle(ToggleSwitch::new(selector, element, name))
            }
            SwitchConfig::Button { .. } => Widget::Button(Button::new(
                selector,
                element,
                name,
                self.context.commands.clone(),
            )),
        };

        Ok(widget)
    }

    pub fn configure_indicators(
        &mut self,
        document: &IndicatorsDocument,
    ) -> usize {
        let mut board = self.indicators.lock();
        let before = board.len();
        for (selector, entry) in document {
            let bound = entry
                .parsed(selector)
                .and_then(|path| Ok((path, self.element(selector)?)));
            match bound {
                Ok((path, element)) => {
                    board.bind(selector, element, path.clone().compile());
                }
                Err(err) => error!("{}", err),
            }
        }
        let bound = board.len() - before;
        info!("Bound {} of {} indicators", bound, document.len());
        bound
    }

    pub fn configure_regions(&mut self, document: &RegionsDocument) -> usize {
        let mut bound = 0;
        for selector in document {
            if let Err(err) = self.element(selector) {
                error!("{}", err);
                continue;
            }
            let region = SelectableRegion::new(selector, self.surface.clone());
            self.regions.insert(selector.clone(), region);
            bound += 1;
        }
        debug!("Bound {} selectable regions", bound);
        bound
    }

    pub fn configure_ports(&mut self, document: &PortsDocument) -> usize {
        let before = self.ports.len();
        for (selector, entry) in document {
            let bound = entry
                .parsed(selector)
                .and_then(|port| Ok((port, self.element(selector)?)));
            match bound {
                Ok((port, element)) => {
                    self.ports.bind(selector, element, port.simulator_name())
                }
                Err(err) => error!("{}", err),
            }
        }
        let bound = self.ports.len() - before;
        debug!("Bound {} ports", bound);
        bound
    }

    fn element(&self, selector: &str) -> Result<Arc<dyn Element>, ConfigError> {
        self.surface
            .element(selector)
            .ok_or_else(|| ConfigError::MissingElement {
                selector: selector.to_string(),
            })
    }

    //--------------------------------------------------------------------------
    // Input and frames
    //--------------------------------------------------------------------------

    /// Delivers `event` along `path`, innermost selector first, until a
    /// handler stops it. Selectors with nothing bound are passed through.
    pub fn dispatch(&self, path: &[&str], event: PointerEvent) -> Propagation {
        for selector in path {
            if let Some(widget) = self.widgets.get(*selector) {
                if widget.handle(event) == Propagation::Stop {
                    return Propagation::Stop;
                }
            }
            if let Some(region) = self.regions.get(*selector) {
                if region.handle(event) == Propagation::Stop {
                    return Propagation::Stop;
                }
            }
        }
        Propagation::Continue
    }

    /// Re-evaluates every indicator against `snapshot`. Returns the number of
    /// lamps that changed.
    pub fn sweep(&self, snapshot: &Snapshot) -> usize {
        self.indicators.lock().sweep(snapshot)
    }

    //--------------------------------------------------------------------------
    // Accessors
    //--------------------------------------------------------------------------

    pub fn context(&self) -> &PanelContext {
        &self.context
    }

    pub fn widget(&self, selector: &str) -> Option<&Widget> {
        self.widgets.get(selector)
    }

    pub fn widgets(&self) -> impl Iterator<Item = &Widget> {
        self.widgets.values()
    }

    pub fn is_region(&self, selector: &str) -> bool {
        self.regions.contains_key(selector)
    }

    pub fn ports(&self) -> &PortMap {
        &self.ports
    }

    pub fn indicator_count(&self) -> usize {
        self.indicators.lock().len()
    }

    pub fn is_lit(&self, selector: &str) -> Option<bool> {
        self.indicators.lock().is_lit(selector)
    }

    pub fn lit(&self) -> Vec<String> {
        self.indicators.lock().lit()
    }
}
