//! Two one-way channels to the simulator: an event stream carrying machine
//! state in, and a command endpoint carrying operations out.
//!
//! # Flow
//! ```md
//! simulator /events -> run_event_stream -> watch<Snapshot> -> frame sweep
//! widget input -> CommandSender -> dispatcher -> client -> simulator /command
//! ```
pub mod client;
pub mod command;
pub mod dispatcher;
pub mod stream;

pub use client::{CommandTransport, HttpCommandClient};
pub use command::{Command, UNCONNECTED};
pub use dispatcher::{
    CommandReceiver, CommandSender, command_channel, run_dispatcher,
};
pub use stream::{
    SnapshotReceiver, SnapshotSender, run_event_stream, snapshot_channel,
};
