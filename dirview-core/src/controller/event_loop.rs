//! ``src/controller/event_loop.rs``
//! ============================================================================
//! # Event loop
//!
//! Multiplexes terminal input, background completions and a periodic tick
//! into one ordered stream, and feeds each event to the controller.

use std::{
    io,
    time::{Duration, Instant},
};

use crossterm::event::{Event as TermEvent, KeyEventKind};
use futures::{Stream, StreamExt};
use tokio::{
    sync::mpsc,
    time::{Interval, MissedTickBehavior, interval},
};
use tracing::{debug, info, trace, warn};

use crate::controller::{
    actions::{Action, Effect, TaskResult},
    keymap::KeyMap,
    view_controller::ViewStateController,
};

/// One unit of work for the controller.
#[derive(Debug)]
pub enum LoopEvent {
    Terminal(TermEvent),
    Task(TaskResult),
    Tick,
}

/// Outcome of handling a [`LoopEvent`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub effect: Effect,
    pub redraw: bool,
}

pub struct EventLoop<S> {
    events: S,
    task_rx: mpsc::UnboundedReceiver<TaskResult>,
    keymap: KeyMap,
    ticker: Interval,
    // Performance monitoring
    event_count: u64,
    avg_response_ms: f64,
    last_report: Instant,
}

impl<S> EventLoop<S>
where
    S: Stream<Item = io::Result<TermEvent>> + Unpin,
{
    pub fn new(events: S, task_rx: mpsc::UnboundedReceiver<TaskResult>, tick_rate: Duration) -> Self {
        let mut ticker = interval(tick_rate);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        info!(tick_ms = tick_rate.as_millis() as u64, "Initializing event loop");
        Self {
            events,
            task_rx,
            keymap: KeyMap::new(),
            ticker,
            event_count: 0,
            avg_response_ms: 0.0,
            last_report: Instant::now(),
        }
    }

    /// Wait for the next event. Returns `None` once the terminal stream ends.
    pub async fn next_event(&mut self) -> Option<LoopEvent> {
        loop {
            tokio::select! {
                biased;

                Some(task) = self.task_rx.recv() => return Some(LoopEvent::Task(task)),

                maybe_event = self.events.next() => match maybe_event {
                    Some(Ok(event)) => return Some(LoopEvent::Terminal(event)),
                    Some(Err(e)) => warn!("Terminal event error: {e}"),
                    None => return None,
                },

                _ = self.ticker.tick() => return Some(LoopEvent::Tick),
            }
        }
    }

    /// Hand one event to the controller.
    pub fn dispatch(&mut self, controller: &mut ViewStateController, event: LoopEvent) -> Step {
        let started = Instant::now();

        let step = match event {
            LoopEvent::Tick => Step {
                effect: Effect::None,
                redraw: controller.tick(Instant::now()),
            },
            LoopEvent::Task(task) => {
                controller.apply(task);
                Step {
                    effect: Effect::None,
                    redraw: true,
                }
            }
            LoopEvent::Terminal(event) => {
                let action = self.map_terminal_event(event, controller.input_focused());
                if action == Action::NoOp {
                    return Step {
                        effect: Effect::None,
                        redraw: false,
                    };
                }
                debug!(?action, "Terminal event mapped to action");
                Step {
                    effect: controller.handle_action(action),
                    redraw: true,
                }
            }
        };

        self.update_performance_metrics(started.elapsed());
        step
    }

    fn map_terminal_event(&self, event: TermEvent, input_focused: bool) -> Action {
        trace!(?event, "Terminal event received");
        match event {
            TermEvent::Key(key) if key.kind != KeyEventKind::Release => {
                self.keymap.resolve(key, input_focused)
            }
            TermEvent::Resize(width, height) => Action::Resize(width, height),
            _ => Action::NoOp,
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn update_performance_metrics(&mut self, processing_time: Duration) {
        self.event_count += 1;
        let time_ms = processing_time.as_secs_f64() * 1000.0;

        self.avg_response_ms = if self.event_count == 1 {
            time_ms
        } else {
            self.avg_response_ms.mul_add(0.9, time_ms * 0.1)
        };

        if time_ms > 16.0 {
            info!(
                marker = "PERF_SLOW_EVENT",
                task_queue_len = self.task_rx.len(),
                "Slow event processing: {:.2}ms (avg: {:.2}ms)",
                time_ms,
                self.avg_response_ms
            );
        }

        if self.last_report.elapsed().as_secs() >= 30 {
            info!(
                "Performance: {} events processed, avg response time: {:.2}ms",
                self.event_count, self.avg_response_ms
            );
            self.last_report = Instant::now();
        }
    }

    pub fn event_count(&self) -> u64 {
        self.event_count
    }
}
