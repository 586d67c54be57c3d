//! Startup reconciliation: the simulator, not the artwork, decides where every
//! switch points.
//!
//! Queries go out as one batch after all widgets are bound. Confirmed values
//! are applied through `RotarySwitch::set_value`, which never emits a
//! command, so applying them cannot echo back to the simulator.

use crate::bridge::{Command, CommandTransport};
use crate::context::SwitchRegistry;
use crate::core::prelude::*;
use crate::widgets::PortMap;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ReconcileReport {
    /// Switch names whose confirmed value matched a detent
    pub applied: Vec<String>,

    /// `(name, value)` pairs the simulator reported that no bound switch has
    /// a detent for
    pub unmatched: Vec<(String, String)>,
}

pub async fn reconcile_switches(
    switches: &SwitchRegistry,
    transport: &dyn CommandTransport,
) -> Result<ReconcileReport, BridgeError> {
    let names = switches.names();
    if names.is_empty() {
        return Ok(ReconcileReport::default());
    }

    let queries: Vec<Command> =
        names.iter().map(|name| Command::query_switch(name)).collect();
    let outputs = transport.run(&queries).await?;

    let mut report = ReconcileReport::default();
    for (name, output) in names.into_iter().zip(outputs) {
        let value = output.trim();
        if switches.apply(&name, value) > 0 {
            debug!("{} = {}", name, value);
            report.applied.push(name);
        } else {
            warn!("No setting of `{}` matches `{}`", name, value);
            report.unmatched.push((name, value.to_string()));
        }
    }

    info!(
        "Reconciled {} switches ({} unmatched)",
        report.applied.len(),
        report.unmatched.len()
    );
    Ok(report)
}

/// Dims every port the simulator reports as unconnected. Returns the dimmed
/// selectors.
pub async fn reconcile_ports(
    ports: &PortMap,
    transport: &dyn CommandTransport,
) -> Result<Vec<String>, BridgeError> {
    if ports.is_empty() {
        return Ok(Vec::new());
    }

    let outputs = transport.run(&ports.queries()).await?;
    let dimmed = ports.apply_connectivity(&outputs);
    info!("{} of {} ports unconnected", dimmed.len(), ports.len());
    Ok(dimmed)
}
