use serde::de::DeserializeOwned;

use super::documents::{
    IndicatorsDocument, PortsDocument, RegionsDocument, SwitchesDocument,
};
use super::source::DocumentSource;
use crate::core::prelude::*;
use crate::settings::DocumentNames;

/// Everything that loaded. A document that failed to load is `None` and
/// contributes nothing; the others are unaffected.
#[derive(Debug, Default)]
pub struct PanelConfig {
    pub switches: Option<SwitchesDocument>,
    pub indicators: Option<IndicatorsDocument>,
    pub regions: Option<RegionsDocument>,
    pub ports: Option<PortsDocument>,
}

impl PanelConfig {
    /// Loads each document in turn. Failures are logged and skipped.
    pub async fn load(
        source: &dyn DocumentSource,
        names: &DocumentNames,
    ) -> Self {
        Self {
            switches: load_document(source, &names.switches).await,
            indicators: load_document(source, &names.indicators).await,
            regions: load_document(source, &names.regions).await,
            ports: load_document(source, &names.ports).await,
        }
    }
}

pub async fn load_document<T: DeserializeOwned>(
    source: &dyn DocumentSource,
    name: &str,
) -> Option<T> {
    match fetch_document(source, name).await {
        Ok(document) => {
            info!("Loaded {}", source.describe(name));
            Some(document)
        }
        Err(err) => {
            error!("Skipping {}: {}", source.describe(name), err);
            None
        }
    }
}

async fn fetch_document<T: DeserializeOwned>(
    source: &dyn DocumentSource,
    name: &str,
) -> Result<T, BridgeError> {
    let text = source.fetch(name).await?;
    Ok(serde_json::from_str(&text)?)
}
