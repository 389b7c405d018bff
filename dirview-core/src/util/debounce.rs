//!  src/util/debounce.rs
//!  ===================================================================
//!  Cancellable delayed task used for search-as-you-type.
//!
//!  • Scheduling always aborts the pending sleeper; triggers are
//!    superseded, never queued.
//!  • Every schedule bumps a generation counter that travels with the
//!    emitted event, so a sleeper that fired just before being aborted
//!    can still be recognised as stale by the receiver.

use std::time::Duration;

use tokio::{sync::mpsc, task::JoinHandle, time::sleep};
use tracing::trace;

#[derive(Debug, Clone)]
pub struct DebounceConfig {
    pub delay: Duration,
}

impl Default for DebounceConfig {
    fn default() -> Self {
        Self::search_input()
    }
}

impl DebounceConfig {
    /// Quick config for search input debouncing
    #[must_use]
    pub const fn search_input() -> Self {
        Self {
            delay: Duration::from_millis(300),
        }
    }
}

#[derive(Debug)]
pub struct Debouncer {
    cfg: DebounceConfig,
    generation: u64,
    sleeper: Option<JoinHandle<()>>,
}

impl Debouncer {
    #[must_use]
    pub fn new(cfg: DebounceConfig) -> Self {
        Self {
            cfg,
            generation: 0,
            sleeper: None,
        }
    }

    /// Replace any pending trigger with a new one. `make_event` receives the
    /// generation of this trigger and builds the event sent after the delay.
    pub fn schedule<T, F>(&mut self, tx: &mpsc::UnboundedSender<T>, make_event: F) -> u64
    where
        T: Send + 'static,
        F: FnOnce(u64) -> T + Send + 'static,
    {
        self.cancel();
        self.generation += 1;

        let generation = self.generation;
        let delay = self.cfg.delay;
        let tx = tx.clone();
        trace!(generation, "Debounce trigger scheduled");

        self.sleeper = Some(tokio::spawn(async move {
            sleep(delay).await;
            let _ = tx.send(make_event(generation));
        }));

        generation
    }

    /// Abort the pending trigger, if any.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.sleeper.take() {
            handle.abort();
        }
    }

    /// Whether an event carrying `generation` is still the latest trigger.
    #[inline]
    pub fn is_current(&self, generation: u64) -> bool {
        generation == self.generation
    }

    #[inline]
    pub const fn delay(&self) -> Duration {
        self.cfg.delay
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
