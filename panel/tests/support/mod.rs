#![allow(dead_code)]

use std::time::Duration;

use async_trait::async_trait;
use eniac_panel::prelude::*;
use indexmap::IndexMap;
use parking_lot::Mutex;
use serde_json::Value;

/// Answers commands from a script keyed by wire text. Unscripted commands
/// produce empty output, like a set or press the simulator accepted.
#[derive(Default)]
pub struct ScriptedTransport {
    replies: IndexMap<String, String>,
    batches: Mutex<Vec<Vec<Command>>>,
}

impl ScriptedTransport {
    pub fn reply(mut self, command: &str, output: &str) -> Self {
        self.replies.insert(command.to_string(), output.to_string());
        self
    }

    pub fn sent(&self) -> Vec<Command> {
        self.batches.lock().iter().flatten().cloned().collect()
    }

    pub fn batches(&self) -> usize {
        self.batches.lock().len()
    }
}

#[async_trait]
impl CommandTransport for ScriptedTransport {
    async fn run(
        &self,
        commands: &[Command],
    ) -> Result<Vec<String>, BridgeError> {
        self.batches.lock().push(commands.to_vec());
        Ok(commands
            .iter()
            .map(|command| {
                self.replies
                    .get(&command.to_string())
                    .cloned()
                    .unwrap_or_default()
            })
            .collect())
    }
}

/// Serves documents from memory. Documents marked as failing answer with an
/// HTTP status instead; unknown documents are a 404.
#[derive(Default)]
pub struct MemoryDocuments {
    documents: IndexMap<String, Result<String, u16>>,
}

impl MemoryDocuments {
    /// Keys of `document` come out sorted. Use [`Self::with_text`] when the
    /// declaration order matters.
    pub fn with(self, name: &str, document: Value) -> Self {
        self.with_text(name, &document.to_string())
    }

    pub fn with_text(mut self, name: &str, text: &str) -> Self {
        self.documents.insert(name.to_string(), Ok(text.to_string()));
        self
    }

    pub fn failing(mut self, name: &str, status: u16) -> Self {
        self.documents.insert(name.to_string(), Err(status));
        self
    }
}

#[async_trait]
impl DocumentSource for MemoryDocuments {
    async fn fetch(&self, name: &str) -> Result<String, BridgeError> {
        match self.documents.get(name) {
            Some(Ok(text)) => Ok(text.clone()),
            Some(Err(status)) => Err(BridgeError::Status {
                url: name.to_string(),
                status: *status,
            }),
            None => Err(BridgeError::Status {
                url: name.to_string(),
                status: 404,
            }),
        }
    }

    fn describe(&self, name: &str) -> String {
        format!("memory://{}", name)
    }
}

/// Lets spawned tasks (dispatcher, frame loop) run. Intended for tests with
/// a paused clock, where this returns as soon as the runtime goes idle.
pub async fn settle() {
    tokio::time::sleep(Duration::from_millis(100)).await;
}

pub fn cycling_switches() -> Value {
    serde_json::json!({
        "#cycling .op": {
            "type": "rotary",
            "simulatorName": "cy.op",
            "settings": [
                {"value": "1a", "degrees": 0},
                {"value": "1p", "degrees": 90},
                {"value": "co", "degrees": 180}
            ]
        },
        "#initiate .clear": {"type": "button", "simulatorName": "c"},
        "#initiate .heaters": {"type": "toggle"}
    })
}

pub fn pulse_indicators() -> Value {
    let mut indicators = serde_json::Map::new();
    for pulse in 0..10 {
        indicators.insert(
            format!("#cycling .pulse-{}", pulse),
            serde_json::json!({
                "unit": "cycling",
                "field": "pulse",
                "eqValue": pulse
            }),
        );
    }
    Value::Object(indicators)
}
