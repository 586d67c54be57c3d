pub mod path;
pub mod snapshot;

pub use path::{PathKey, Predicate, StatePath, UNWIRED_UNIT};
pub use snapshot::Snapshot;
