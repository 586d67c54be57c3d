use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_FPS: f32 = 60.0;
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(3);
const DEFAULT_STREAM_IDLE_TIMEOUT: Duration = Duration::from_secs(10);

/// Names of the declarative documents, resolved relative to the document
/// source (the simulator's static file root or a local directory)
#[derive(Clone, Debug, PartialEq)]
pub struct DocumentNames {
    pub switches: String,
    pub indicators: String,
    pub regions: String,
    pub ports: String,
}

impl Default for DocumentNames {
    fn default() -> Self {
        Self {
            switches: "switches.json".into(),
            indicators: "neons.json".into(),
            regions: "panels.json".into(),
            ports: "ports.json".into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PanelSettings {
    pub base_url: String,
    pub fps: f32,
    pub request_timeout: Duration,

    /// How long the event stream waits before reconnecting. A `retry:` field
    /// sent by the server takes precedence.
    pub retry_delay: Duration,

    /// A connected event stream that delivers nothing for this long is
    /// dropped and reconnected. The simulator publishes every 100 ms.
    pub stream_idle_timeout: Duration,
    pub documents: DocumentNames,
}

impl PanelSettings {
    pub fn events_url(&self) -> String {
        self.url("events")
    }

    pub fn command_url(&self) -> String {
        self.url("command")
    }

    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

impl Default for PanelSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            fps: DEFAULT_FPS,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            retry_delay: DEFAULT_RETRY_DELAY,
            stream_idle_timeout: DEFAULT_STREAM_IDLE_TIMEOUT,
            documents: DocumentNames::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls_join_cleanly() {
        let settings = PanelSettings {
            base_url: "http://eniac:8000/".into(),
            ..PanelSettings::default()
        };
        assert_eq!(settings.events_url(), "http://eniac:8000/events");
        assert_eq!(settings.command_url(), "http://eniac:8000/command");
        assert_eq!(settings.url("/neons.json"), "http://eniac:8000/neons.json");
    }
}
