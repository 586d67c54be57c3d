pub use crate::core::error::{BridgeError, ConfigError};
pub use crate::core::logging::init_logger;
pub use crate::core::logging::{debug, error, info, trace, warn};
pub(crate) use crate::core::logging::warn_once;
