use std::sync::Arc;

use tokio::task::JoinHandle;

use super::frame_clock::FrameClock;
use super::panel::Panel;
use crate::bridge::{
    CommandTransport, HttpCommandClient, SnapshotReceiver, command_channel,
    run_dispatcher, run_event_stream, snapshot_channel,
};
use crate::config::{DocumentSource, PanelConfig};
use crate::core::prelude::*;
use crate::reconcile::{reconcile_ports, reconcile_switches};
use crate::settings::PanelSettings;
use crate::surface::Surface;

/// Sweeps the indicators at `fps` against the latest snapshot until the
/// snapshot channel closes. The last published snapshot is always swept.
pub async fn run_frame_loop(
    panel: Arc<Panel>,
    snapshots: SnapshotReceiver,
    fps: f32,
) {
    let mut clock = FrameClock::new(fps);
    let mut reported_dropped = 0;

    loop {
        tokio::time::sleep_until(clock.next_deadline()).await;
        if snapshots.has_changed().is_err() {
            panel.sweep(&snapshots.borrow());
            break;
        }

        let tick = clock.tick(tokio::time::Instant::now());
        if !tick.should_sweep {
            continue;
        }

        let snapshot = snapshots.borrow().clone();
        let changed = panel.sweep(&snapshot);
        if changed > 0 {
            trace!("frame {}: {} lamps changed", clock.frame_count(), changed);
        }

        if clock.frame_count() % 600 == 0
            && clock.dropped_frames() > reported_dropped
        {
            debug!(
                "{} frames dropped so far, averaging {:.1} fps",
                clock.dropped_frames(),
                clock.average_fps()
            );
            reported_dropped = clock.dropped_frames();
        }
    }

    debug!("Frame loop stopped after {} frames", clock.frame_count());
}

/// A running panel: the dispatcher, event stream and frame loop tasks plus
/// the bound widgets they serve. Dropping it stops the tasks.
pub struct PanelRuntime {
    panel: Arc<Panel>,
    tasks: Vec<JoinHandle<()>>,
}

impl PanelRuntime {
    /// Connects to the simulator described by `settings`
    pub async fn start(
        settings: &PanelSettings,
        surface: Arc<dyn Surface>,
        source: &dyn DocumentSource,
    ) -> Result<Self, BridgeError> {
        let transport = Arc::new(HttpCommandClient::new(settings)?);
        let stream_client = reqwest::Client::builder()
            .connect_timeout(settings.request_timeout)
            .build()?;

        let (sender, snapshots) = snapshot_channel();
        let stream = tokio::spawn(run_event_stream(
            stream_client,
            settings.clone(),
            sender,
        ));

        let mut runtime =
            Self::start_with(settings, surface, source, transport, snapshots)
                .await;
        runtime.tasks.push(stream);
        Ok(runtime)
    }

    /// Loads the documents, binds the panel, starts the dispatcher and frame
    /// loop, then reconciles switches and ports with the simulator. Load and
    /// reconcile failures are logged; the panel stays usable either way.
    pub async fn start_with(
        settings: &PanelSettings,
        surface: Arc<dyn Surface>,
        source: &dyn DocumentSource,
        transport: Arc<dyn CommandTransport>,
        snapshots: SnapshotReceiver,
    ) -> Self {
        let (commands, queue) = command_channel();
        let mut tasks =
            vec![tokio::spawn(run_dispatcher(queue, transport.clone()))];

        let config = PanelConfig::load(source, &settings.documents).await;
        let panel = Arc::new(Panel::from_config(surface, commands, &config));

        tasks.push(tokio::spawn(run_frame_loop(
            panel.clone(),
            snapshots,
            settings.fps,
        )));

        let switches = &panel.context().switches;
        if let Err(err) = reconcile_switches(switches, &*transport).await {
            error!("Failed to read switch settings: {}", err);
        }
        if let Err(err) = reconcile_ports(panel.ports(), &*transport).await {
            error!("Failed to read port connectivity: {}", err);
        }

        Self { panel, tasks }
    }

    pub fn panel(&self) -> &Arc<Panel> {
        &self.panel
    }
}

impl Drop for PanelRuntime {
    fn drop(&mut self) {
        debug!("Stopping panel runtime");
        for task in &self.tasks {
            task.abort();
        }
    }
}
