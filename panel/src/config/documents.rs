//! Deserialization types for the declarative panel documents

use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::core::prelude::*;
use crate::state::StatePath;
use crate::widgets::Detent;

//------------------------------------------------------------------------------
// Top-level Types
//------------------------------------------------------------------------------

/// Uses [`IndexMap`] so widgets are bound in the order they are declared
pub type SwitchesDocument = IndexMap<String, MaybeEntry<SwitchConfig>>;

pub type IndicatorsDocument = IndexMap<String, MaybeEntry<StatePath>>;

/// Selectors of the panels that can be framed by clicking them
pub type RegionsDocument = Vec<String>;

pub type PortsDocument = IndexMap<String, MaybeEntry<PortConfig>>;

/// One entry of a document. Entries that do not parse are kept as raw JSON
/// and reported per selector when the document is bound.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum MaybeEntry<T> {
    Entry(T),
    Other(Value),
}

impl<T: DeserializeOwned> MaybeEntry<T> {
    pub fn parsed(&self, selector: &str) -> Result<&T, ConfigError> {
        match self {
            MaybeEntry::Entry(entry) => Ok(entry),
            MaybeEntry::Other(value) => Err(ConfigError::InvalidEntry {
                selector: selector.to_string(),
                reason: T::deserialize(value)
                    .err()
                    .map(|err| err.to_string())
                    .unwrap_or_else(|| "unrecognized entry".into()),
            }),
        }
    }
}

//------------------------------------------------------------------------------
// Switches
//------------------------------------------------------------------------------

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SwitchConfig {
    Rotary {
        #[serde(
            default,
            rename = "simulatorName",
            deserialize_with = "deserialize_name"
        )]
        simulator_name: Option<String>,
        #[serde(default)]
        settings: Vec<SettingConfig>,
    },
    Toggle {
        #[serde(
            default,
            rename = "simulatorName",
            deserialize_with = "deserialize_name"
        )]
        simulator_name: Option<String>,
    },
    Button {
        #[serde(
            default,
            rename = "simulatorName",
            deserialize_with = "deserialize_name"
        )]
        simulator_name: Option<String>,
    },
}

impl SwitchConfig {
    pub fn simulator_name(&self) -> Option<&str> {
        match self {
            SwitchConfig::Rotary { simulator_name, .. }
            | SwitchConfig::Toggle { simulator_name }
            | SwitchConfig::Button { simulator_name } => {
                simulator_name.as_deref()
            }
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct SettingConfig {
    #[serde(deserialize_with = "deserialize_setting_value")]
    pub value: String,
    pub degrees: f32,
}

impl From<&SettingConfig> for Detent {
    fn from(setting: &SettingConfig) -> Self {
        Detent::new(&setting.value, setting.degrees)
    }
}

//------------------------------------------------------------------------------
// Ports
//------------------------------------------------------------------------------

/// A port is written either as its bare simulator name or as
/// `{"simulatorName": ...}`
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum PortConfig {
    Name(String),
    Object {
        #[serde(rename = "simulatorName")]
        simulator_name: String,
    },
}

impl PortConfig {
    pub fn simulator_name(&self) -> &str {
        match self {
            PortConfig::Name(name) => name,
            PortConfig::Object { simulator_name } => simulator_name,
        }
    }
}

//------------------------------------------------------------------------------
// Helper Functions
//------------------------------------------------------------------------------

/// An empty name means the widget is not connected to the simulator
fn deserialize_name<'de, D>(
    deserializer: D,
) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let name = Option::<String>::deserialize(deserializer)?;
    Ok(name.filter(|name| !name.trim().is_empty()))
}

fn deserialize_setting_value<'de, D>(
    deserializer: D,
) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum SettingValue {
        String(String),
        Int(i64),
        Uint(u64),
        Float(f64),
    }

    match SettingValue::deserialize(deserializer)? {
        SettingValue::String(value) => Ok(value),
        SettingValue::Int(value) => Ok(value.to_string()),
        SettingValue::Uint(value) => Ok(value.to_string()),
        SettingValue::Float(value) => {
            if !value.is_finite() {
                return Err(serde::de::Error::custom(
                    "setting value must be finite",
                ));
            }

            if value.fract() == 0.0 {
                Ok(format!("{value:.0}"))
            } else {
                Ok(value.to_string())
            }
        }
    }
}
