use std::time::Duration;

use idx_common::broker::{keys, BrokerClient};
use idx_common::WorkerStatus;
use sysinfo::System;
use tokio::sync::watch;

/// Runs the heartbeat loop (§4.3) until `shutdown` fires. Writes
/// `worker_status:{worker_id}` with TTL `3 * interval` every `interval`;
/// losing this key is the sole liveness signal the rest of the system
/// relies on, so a crash here (not just a clean shutdown) makes the
/// worker disappear within `3 * interval` seconds regardless.
pub async fn run(
    broker: &dyn BrokerClient,
    worker_id: &str,
    interval: Duration,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut sys = System::new();
    let mut warmed_up = false;

    loop {
        let (cpu_percent, ram_percent) = sample(&mut sys, warmed_up);
        warmed_up = true;

        let status = WorkerStatus {
            cpu_percent,
            ram_percent,
        };
        let key = keys::worker_status_key(worker_id);
        match serde_json::to_string(&status) {
            Ok(payload) => {
                if let Err(e) = broker.set_with_ttl(&key, &payload, interval * 3).await {
                    tracing::warn!(error = %e, "heartbeat write failed");
                }
            }
            Err(e) => tracing::error!(error = %e, "failed to encode heartbeat payload"),
        }

        tokio::select! {
            _ = tokio::time::sleep(interval) => {}
            _ = shutdown.changed() => return,
        }
    }
}

/// The platform needs two CPU reads to compute a delta; the first
/// reading after process start is reported as 0 rather than a
/// meaningless instantaneous value.
fn sample(sys: &mut System, warmed_up: bool) -> (f32, f32) {
    sys.refresh_cpu_usage();
    sys.refresh_memory();

    let cpu = if warmed_up { sys.global_cpu_usage() } else { 0.0 };
    let ram = if sys.total_memory() == 0 {
        0.0
    } else {
        (sys.used_memory() as f64 / sys.total_memory() as f64 * 100.0) as f32
    };

    (cpu.clamp(0.0, 100.0), ram.clamp(0.0, 100.0))
}
