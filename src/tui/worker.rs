//! Background worker for network calls.
//!
//! The TUI loop runs on the main thread and must never block on I/O. Requests
//! are spawned onto a tokio runtime and their results come back over a
//! `std::sync::mpsc` channel that the loop drains with [`Worker::try_recv`].

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;

use tokio::runtime::Handle;

use crate::application::{ModelInsights, StatsFetcher, SubmitCompletion, SubmitTicket};
use crate::ports::{ScoringService, StatsError, StatsSource};

/// Messages from spawned tasks back to the UI loop.
#[derive(Debug)]
pub enum WorkerEvent {
    /// A prediction request finished.
    Prediction(SubmitCompletion),
    /// A statistics fetch finished.
    Insights(Result<ModelInsights, StatsError>),
}

/// Spawns requests on a runtime and collects their results.
pub struct Worker {
    runtime: Handle,
    tx: Sender<WorkerEvent>,
    rx: Receiver<WorkerEvent>,
}

impl Worker {
    #[must_use]
    pub fn new(runtime: Handle) -> Self {
        let (tx, rx) = mpsc::channel();
        Self { runtime, tx, rx }
    }

    /// Send a prediction ticket in the background.
    pub fn submit<S>(&self, ticket: SubmitTicket<S>)
    where
        S: ScoringService + 'static,
    {
        let tx = self.tx.clone();
        self.runtime.spawn(async move {
            let completion = ticket.send().await;
            // The receiver is gone only when the app is shutting down.
            let _ = tx.send(WorkerEvent::Prediction(completion));
        });
    }

    /// Fetch model insights in the background.
    pub fn fetch_insights<S>(&self, fetcher: Arc<StatsFetcher<S>>)
    where
        S: StatsSource + 'static,
    {
        let tx = self.tx.clone();
        self.runtime.spawn(async move {
            let result = fetcher.fetch_insights().await;
            let _ = tx.send(WorkerEvent::Insights(result));
        });
    }

    /// Next finished result, if any (non-blocking).
    #[must_use]
    pub fn try_recv(&self) -> Option<WorkerEvent> {
        self.rx.try_recv().ok()
    }
}
