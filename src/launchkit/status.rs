//! # Background Status Fetches
//!
//! Some tile facts (the active network link, for one) are slow or blocking to
//! obtain. A [`StatusSource`] produces them; a [`StatusFetcher`] runs each
//! fetch on a worker thread and hands the result back to the consumer thread
//! through a channel. Workers never touch an [`Attribute`]: the consumer
//! applies results when it calls [`StatusFetcher::pump`], typically once per
//! main-loop iteration.
//!
//! ```text
//!  consumer thread                       worker threads
//!  ---------------                       --------------
//!  refresh() ── spawn ─────────────────▶ fetch_status()
//!  pump() ◀──── Completed { run, result } ─┘
//!    set_value(Some(v)) / set_value(None)
//! ```
//!
//! Runs may overlap. Nothing is cancelled, and results are applied in the
//! order they complete, so the last run to finish wins even when an earlier
//! refresh produced it. A failed fetch is logged and applied as "no data".

use crate::attribute::Attribute;
use crate::error::{LaunchError, Result};
use std::cell::Cell;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Called by a source to request a new fetch. Safe to call from any thread.
pub type Notify = Box<dyn Fn() + Send + Sync>;

pub trait StatusSource: Send + Sync + 'static {
    type Status: Clone + PartialEq + Send + 'static;

    /// Blocking; runs on a worker thread.
    fn fetch_status(&self) -> Result<Self::Status>;

    /// Sources that learn about changes on their own keep `notify` and call
    /// it. The default ignores it.
    fn on_status_changed(&self, _notify: Notify) {}
}

enum Message<T> {
    Completed { run: u64, result: Result<T> },
    Triggered,
}

pub struct StatusFetcher<S: StatusSource> {
    source: Arc<S>,
    attribute: Attribute<Option<S::Status>>,
    tx: Sender<Message<S::Status>>,
    rx: Receiver<Message<S::Status>>,
    next_run: Cell<u64>,
    in_flight: Cell<usize>,
    interval: Option<Duration>,
    last_started: Cell<Option<Instant>>,
}

impl<S: StatusSource> StatusFetcher<S> {
    /// Hook up `source` and kick off the first fetch.
    pub fn start(source: Arc<S>, attribute: Attribute<Option<S::Status>>) -> Result<Self> {
        Self::start_with_interval(source, attribute, None)
    }

    /// Like [`start`](Self::start), also refetching whenever `interval` has
    /// passed since the last run started.
    pub fn start_with_interval(
        source: Arc<S>,
        attribute: Attribute<Option<S::Status>>,
        interval: Option<Duration>,
    ) -> Result<Self> {
        let (tx, rx) = mpsc::channel();
        let trigger = tx.clone();
        source.on_status_changed(Box::new(move || {
            let _ = trigger.send(Message::Triggered);
        }));

        let fetcher = Self {
            source,
            attribute,
            tx,
            rx,
            next_run: Cell::new(0),
            in_flight: Cell::new(0),
            interval,
            last_started: Cell::new(None),
        };
        fetcher.refresh()?;
        Ok(fetcher)
    }

    pub fn attribute(&self) -> &Attribute<Option<S::Status>> {
        &self.attribute
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.get()
    }

    /// Start another fetch. Returns its run number.
    pub fn refresh(&self) -> Result<u64> {
        let run = self.next_run.get();
        self.next_run.set(run + 1);

        let source = Arc::clone(&self.source);
        let tx = self.tx.clone();
        thread::Builder::new()
            .name(format!("status-fetch-{run}"))
            .spawn(move || {
                let result = source.fetch_status();
                // The fetcher may be gone; nobody is left to care.
                let _ = tx.send(Message::Completed { run, result });
            })
            .map_err(LaunchError::Io)?;

        self.in_flight.set(self.in_flight.get() + 1);
        self.last_started.set(Some(Instant::now()));
        tracing::debug!(run, "status fetch started");
        Ok(run)
    }

    /// Apply everything that arrived since the last call. Returns the number
    /// of fetch results applied.
    pub fn pump(&self) -> usize {
        let mut applied = 0;
        loop {
            match self.rx.try_recv() {
                Ok(message) => applied += self.handle(message),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        if self.is_due() {
            if let Err(e) = self.refresh() {
                tracing::warn!(error = %e, "could not start periodic status fetch");
            }
        }
        applied
    }

    /// Block until one message arrives or `timeout` passes, then pump.
    pub fn wait_and_pump(&self, timeout: Duration) -> usize {
        let first = match self.rx.recv_timeout(timeout) {
            Ok(message) => self.handle(message),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => 0,
        };
        first + self.pump()
    }

    fn handle(&self, message: Message<S::Status>) -> usize {
        match message {
            Message::Completed { run, result } => {
                self.in_flight.set(self.in_flight.get().saturating_sub(1));
                match result {
                    Ok(status) => {
                        tracing::debug!(run, "status fetch completed");
                        self.attribute.set_value(Some(status));
                    }
                    Err(e) => {
                        tracing::warn!(run, error = %e, "status fetch failed");
                        self.attribute.set_value(None);
                    }
                }
                1
            }
            Message::Triggered => {
                tracing::debug!("status source requested a refresh");
                if let Err(e) = self.refresh() {
                    tracing::warn!(error = %e, "could not start status fetch");
                }
                0
            }
        }
    }

    fn is_due(&self) -> bool {
        match (self.interval, self.last_started.get()) {
            (Some(interval), Some(started)) => started.elapsed() >= interval,
            (Some(_), None) => true,
            (None, _) => false,
        }
    }
}
