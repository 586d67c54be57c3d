//! Fire-and-forget delivery of widget commands.
//!
//! Widgets push onto a [`CommandSender`] from their input handlers and move on;
//! the visual change has already happened. The dispatcher drains the queue in
//! order, sending everything queued so far as one batch.

use std::sync::Arc;

use tokio::sync::mpsc;

use super::client::CommandTransport;
use super::command::Command;
use crate::core::prelude::*;

#[derive(Clone, Debug)]
pub struct CommandSender {
    tx: mpsc::UnboundedSender<Command>,
}

pub type CommandReceiver = mpsc::UnboundedReceiver<Command>;

pub fn command_channel() -> (CommandSender, CommandReceiver) {
    let (tx, rx) = mpsc::unbounded_channel();
    (CommandSender { tx }, rx)
}

impl CommandSender {
    /// Never blocks. A command sent after the dispatcher has stopped is
    /// logged and dropped.
    pub fn send(&self, command: Command) {
        trace!("queue {}", command);
        if let Err(err) = self.tx.send(command) {
            warn!("Dropping `{}`: dispatcher stopped", err.0);
        }
    }
}

pub async fn run_dispatcher(
    mut rx: CommandReceiver,
    transport: Arc<dyn CommandTransport>,
) {
    while let Some(first) = rx.recv().await {
        let mut batch = vec![first];
        while let Ok(next) = rx.try_recv() {
            batch.push(next);
        }

        match transport.run(&batch).await {
            Ok(outputs) => {
                for (command, output) in batch.iter().zip(outputs) {
                    let output = output.trim();
                    if !output.is_empty() {
                        warn!("`{}`: {}", command, output);
                    }
                }
            }
            Err(err) => {
                let commands: Vec<String> =
                    batch.iter().map(Command::to_string).collect();
                error!("Failed to run {:?}: {}", commands, err);
            }
        }
    }
    debug!("Command dispatcher stopped");
}
