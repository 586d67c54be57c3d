pub mod documents;
pub mod loader;
pub mod source;

pub use documents::{
    IndicatorsDocument, MaybeEntry, PortConfig, PortsDocument, RegionsDocument,
    SettingConfig, SwitchConfig, SwitchesDocument,
};
pub use loader::{PanelConfig, load_document};
pub use source::{DirectorySource, DocumentSource, HttpDocumentSource};
