use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::Instant;

use tracing::{debug, info};

use crate::config::{clamp_refresh_minutes, refresh_interval};
use crate::source::{Source, fetch_tick};
use crate::state::{Delta, ProviderCommand};

/// Runs ticks on its own thread: one right away, then every `refresh_minutes`
/// or whenever a `Refresh` command arrives. Exits when either channel closes.
pub fn spawn_provider(
    source: Source,
    refresh_minutes: u32,
    tx: Sender<Delta>,
    cmd_rx: Receiver<ProviderCommand>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let mut interval = refresh_interval(clamp_refresh_minutes(i64::from(refresh_minutes)));
        let mut last_tick: Option<Instant> = None;
        let mut force = true;

        loop {
            let due = last_tick.map(|at| at + interval);
            if !force {
                let wait = due
                    .map(|due| due.saturating_duration_since(Instant::now()))
                    .unwrap_or_default();
                match cmd_rx.recv_timeout(wait) {
                    Ok(ProviderCommand::Refresh) => {
                        debug!("manual refresh");
                        force = true;
                    }
                    Ok(ProviderCommand::SetInterval { minutes }) => {
                        let minutes = clamp_refresh_minutes(i64::from(minutes));
                        interval = refresh_interval(minutes);
                        info!(minutes, "refresh interval changed");
                        if tx
                            .send(Delta::Log(format!(
                                "[INFO] Refresh interval set to {minutes} min"
                            )))
                            .is_err()
                        {
                            return;
                        }
                        continue;
                    }
                    Err(RecvTimeoutError::Timeout) => {}
                    Err(RecvTimeoutError::Disconnected) => return,
                }
            }

            let is_due = due.is_none_or(|due| Instant::now() >= due);
            if !force && !is_due {
                continue;
            }
            force = false;

            if tx.send(Delta::Loading).is_err() {
                return;
            }
            let outcome = fetch_tick(&source);
            last_tick = Some(Instant::now());
            if tx
                .send(Delta::Tick {
                    normalized: outcome.normalized,
                    fetched_at: outcome.fetched_at,
                    warning: outcome.warning,
                })
                .is_err()
            {
                return;
            }
        }
    })
}
