//! Broadcast loop: generate, serialize and send once per tick

use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use super::ClientRegistry;
use crate::error::ServerResult;
use crate::generator::periodic_snapshot;
use crate::registry::Registry;

/// Fixed period between broadcasts
pub const TICK_INTERVAL: Duration = Duration::from_millis(1000);

/// Lifecycle of the loop
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoopState {
    #[default]
    Stopped,
    Running,
}

/// Shared, cloneable view of a loop's [`LoopState`]
#[derive(Debug, Clone, Default)]
pub struct LoopStatus(Arc<RwLock<LoopState>>);

impl LoopStatus {
    pub fn get(&self) -> LoopState {
        *self.0.read()
    }

    fn set(&self, state: LoopState) {
        *self.0.write() = state;
    }
}

/// Outcome of delivering one message to the connection set
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Clients that accepted the message
    pub delivered: usize,
    /// Clients not in the open state
    pub skipped: usize,
    /// Open clients whose send failed
    pub failed: usize,
}

/// Send `text` to every open client in `clients`
///
/// Clients that are not open are skipped. A failed send is logged and
/// counted but never stops delivery to the remaining clients.
pub fn fan_out<C: ClientRegistry + ?Sized>(clients: &C, text: Arc<str>) -> TickReport {
    let mut report = TickReport::default();

    for client in clients.list_clients() {
        if !client.is_open() {
            report.skipped += 1;
            continue;
        }
        match client.send(Arc::clone(&text)) {
            Ok(()) => report.delivered += 1,
            Err(e) => {
                tracing::debug!(client_id = client.id(), error = %e, "broadcast send failed");
                report.failed += 1;
            }
        }
    }

    report
}

/// Drives the generate → serialize → send cycle on a fixed interval
pub struct BroadcastLoop<C: ClientRegistry + ?Sized, R = StdRng> {
    registry: Arc<Registry>,
    clients: Arc<C>,
    rng: R,
    status: LoopStatus,
    ticks: u64,
}

impl<C: ClientRegistry + ?Sized> BroadcastLoop<C, StdRng> {
    /// Create a loop seeded from the operating system's entropy source
    pub fn new(registry: Arc<Registry>, clients: Arc<C>) -> Self {
        Self::with_rng(registry, clients, StdRng::from_os_rng())
    }
}

impl<C: ClientRegistry + ?Sized, R: Rng> BroadcastLoop<C, R> {
    /// Create a loop with an explicit random source
    pub fn with_rng(registry: Arc<Registry>, clients: Arc<C>, rng: R) -> Self {
        Self {
            registry,
            clients,
            rng,
            status: LoopStatus::default(),
            ticks: 0,
        }
    }

    /// Handle for observing the loop's state after `run` takes ownership
    pub fn status(&self) -> LoopStatus {
        self.status.clone()
    }

    /// Number of ticks executed so far
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Run a single broadcast cycle
    pub fn tick(&mut self) -> ServerResult<TickReport> {
        let snapshot = periodic_snapshot(&self.registry, &mut self.rng);
        let text: Arc<str> = snapshot.to_json()?.into();
        self.ticks += 1;

        let report = fan_out(&*self.clients, text);
        tracing::debug!(
            tick = self.ticks,
            delivered = report.delivered,
            skipped = report.skipped,
            failed = report.failed,
            "broadcast tick"
        );
        Ok(report)
    }

    /// Tick until `shutdown` is cancelled
    ///
    /// The first broadcast happens one full interval after start. Ticks
    /// missed while the runtime was busy are dropped, not replayed.
    pub async fn run(mut self, shutdown: CancellationToken) {
        self.status.set(LoopState::Running);
        tracing::info!(interval_ms = TICK_INTERVAL.as_millis() as u64, "broadcast loop started");

        let mut timer = interval_at(Instant::now() + TICK_INTERVAL, TICK_INTERVAL);
        timer.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                _ = timer.tick() => {
                    if let Err(e) = self.tick() {
                        tracing::warn!(error = %e, "skipping broadcast tick");
                    }
                }
            }
        }

        self.status.set(LoopState::Stopped);
        tracing::info!(ticks = self.ticks, "broadcast loop stopped");
    }
}
