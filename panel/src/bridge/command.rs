use std::fmt;

/// Output of a port query for a jack with no cable attached
pub const UNCONNECTED: &str = "unconnected";

/// One line of the simulator's command language.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    SetSwitch { name: String, value: String },
    PressButton { name: String },
    QuerySwitch { name: String },
    QueryPort { name: String },
}

impl Command {
    pub fn set_switch(name: &str, value: &str) -> Self {
        Self::SetSwitch {
            name: name.to_string(),
            value: value.to_string(),
        }
    }

    pub fn press_button(name: &str) -> Self {
        Self::PressButton {
            name: name.to_string(),
        }
    }

    pub fn query_switch(name: &str) -> Self {
        Self::QuerySwitch {
            name: name.to_string(),
        }
    }

    pub fn query_port(name: &str) -> Self {
        Self::QueryPort {
            name: name.to_string(),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::SetSwitch { name, value } => {
                write!(f, "s {} {}", name, value)
            }
            Command::PressButton { name } => write!(f, "b {}", name),
            Command::QuerySwitch { name } => write!(f, "s? {}", name),
            Command::QueryPort { name } => write!(f, "p? {}", name),
        }
    }
}
