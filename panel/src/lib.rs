pub mod bridge;
pub mod config;
pub mod context;
pub mod core;
pub mod reconcile;
pub mod runtime;
pub mod settings;
pub mod state;
pub mod surface;
pub mod widgets;

pub mod prelude {
    pub use crate::bridge::{
        Command, CommandSender, CommandTransport, HttpCommandClient,
        SnapshotReceiver, SnapshotSender, snapshot_channel,
    };
    pub use crate::config::{
        DirectorySource, DocumentSource, HttpDocumentSource, PanelConfig,
    };
    pub use crate::context::{CalibrationHook, PanelContext, SwitchRegistry};
    pub use crate::core::prelude::*;
    pub use crate::reconcile::{
        ReconcileReport, reconcile_ports, reconcile_switches,
    };
    pub use crate::runtime::{Panel, PanelRuntime};
    pub use crate::settings::PanelSettings;
    pub use crate::state::{Snapshot, StatePath};
    pub use crate::surface::{
        Element, MemorySurface, PointerEvent, Propagation, Surface,
    };
    pub use crate::widgets::Widget;
}
