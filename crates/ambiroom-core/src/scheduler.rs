//! One-second tick source for the timer engine.
//!
//! A [`Ticker`] is a single tokio task with a repeating interval. It is
//! started when the timer starts running and cancelled explicitly when it
//! stops. If the engine stops on its own (a pomodoro phase ended without
//! `auto_start`) the ticker notices after that tick and exits.
//!
//! [`TimerDriver`] keeps at most one ticker alive per app and reconciles it
//! with the engine's running flag after every user command.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, error};

use crate::app::AmbientApp;
use crate::events::Event;

pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// The app shared between the ticker task and the command loop.
/// The lock is never held across an `.await`.
pub type SharedApp = Arc<Mutex<AmbientApp>>;

/// A running repeating tick task.
pub struct Ticker {
    cancel: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
    /// Cleared under the app lock when the task decides to exit.
    alive: Arc<AtomicBool>,
}

impl Ticker {
    /// Spawn the tick task. The first tick fires one `period` from now.
    /// Events produced by each tick are forwarded to `events`.
    pub fn spawn(app: SharedApp, period: Duration, events: mpsc::UnboundedSender<Event>) -> Self {
        let (cancel_tx, mut cancel_rx) = oneshot::channel::<()>();
        let alive = Arc::new(AtomicBool::new(true));
        let task_alive = Arc::clone(&alive);

        let task = tokio::spawn(async move {
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                // Cancel wins over a tick that is due at the same moment.
                tokio::select! {
                    biased;
                    _ = &mut cancel_rx => {
                        debug!("ticker cancelled");
                        break;
                    }
                    _ = interval.tick() => {
                        let (produced, keep_going) = match app.lock() {
                            Ok(mut app) => {
                                let produced = app.tick();
                                let keep_going = app.timer.wants_ticks();
                                if !keep_going {
                                    task_alive.store(false, Ordering::SeqCst);
                                }
                                (produced, keep_going)
                            }
                            Err(_) => {
                                error!("app state lock poisoned, ticker exits");
                                task_alive.store(false, Ordering::SeqCst);
                                break;
                            }
                        };

                        for event in produced {
                            if events.send(event).is_err() {
                                debug!("event receiver gone, ticker exits");
                                task_alive.store(false, Ordering::SeqCst);
                                return;
                            }
                        }

                        if !keep_going {
                            debug!("timer no longer running, ticker exits");
                            break;
                        }
                    }
                }
            }
        });

        Self {
            cancel: Some(cancel_tx),
            task: Some(task),
            alive,
        }
    }

    /// Ask the task to stop. The task checks for cancellation before every
    /// tick, so once it is next polled it exits without ticking again. A tick
    /// already in progress under the app lock still completes.
    pub fn cancel(&mut self) {
        self.alive.store(false, Ordering::SeqCst);
        if let Some(cancel) = self.cancel.take() {
            let _ = cancel.send(());
        }
    }

    /// False once the task has been cancelled or has decided to exit, even
    /// if it has not been polled to completion yet.
    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::SeqCst) && self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Cancel and wait for the task to end.
    pub async fn shutdown(mut self) {
        self.cancel();
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                error!("ticker task failed: {e}");
            }
        }
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Owns the app's ticker and keeps it in step with the engine.
pub struct TimerDriver {
    app: SharedApp,
    events: mpsc::UnboundedSender<Event>,
    period: Duration,
    ticker: Option<Ticker>,
}

impl TimerDriver {
    pub fn new(app: SharedApp, events: mpsc::UnboundedSender<Event>) -> Self {
        Self::with_period(app, events, TICK_PERIOD)
    }

    pub fn with_period(app: SharedApp, events: mpsc::UnboundedSender<Event>, period: Duration) -> Self {
        Self {
            app,
            events,
            period,
            ticker: None,
        }
    }

    pub fn app(&self) -> &SharedApp {
        &self.app
    }

    /// Whether a ticker task is currently alive.
    pub fn is_ticking(&self) -> bool {
        self.ticker.as_ref().is_some_and(Ticker::is_alive)
    }

    /// Start a ticker if the engine wants ticks and none is alive; cancel
    /// the ticker if the engine stopped.
    pub fn sync(&mut self) {
        // Read the engine and the ticker's liveness under the same lock the
        // ticker holds when it decides to exit.
        let (wants_ticks, ticking) = match self.app.lock() {
            Ok(app) => (app.timer.wants_ticks(), self.is_ticking()),
            Err(_) => {
                error!("app state lock poisoned");
                (false, self.is_ticking())
            }
        };

        if wants_ticks {
            if !ticking {
                debug!("starting ticker");
                self.ticker = Some(Ticker::spawn(
                    Arc::clone(&self.app),
                    self.period,
                    self.events.clone(),
                ));
            }
        } else if let Some(mut ticker) = self.ticker.take() {
            debug!("stopping ticker");
            ticker.cancel();
        }
    }

    /// Cancel the ticker, if any, and wait for it.
    pub async fn shutdown(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.shutdown().await;
        }
    }
}
