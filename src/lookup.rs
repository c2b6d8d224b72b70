// Copyright 2025 Chris Custine
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Background execution of weather lookups.
//!
//! The UI thread never waits on the network. Each [`LookupRequest`] runs as
//! a task on a runtime owned by the dispatcher, and its completion is posted
//! back through a channel that the UI drains once per frame. Submitting a new
//! lookup cancels the one still in flight.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use eframe::egui;
use log::{debug, info};
use owm_client::{LookupError, Units, WeatherReport};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::query::LookupRequest;

pub type LookupFuture = Pin<Box<dyn Future<Output = Result<WeatherReport, LookupError>> + Send>>;

/// Anything that can answer a current-weather lookup
pub trait WeatherService: Send + Sync + 'static {
    fn current_weather(&self, city: String, units: Units) -> LookupFuture;
}

impl WeatherService for owm_client::Client {
    fn current_weather(&self, city: String, units: Units) -> LookupFuture {
        let client = self.clone();
        Box::pin(async move { client.current_weather(&city, units).await })
    }
}

/// A finished lookup, carrying the ticket it was submitted with
#[derive(Debug, Clone, PartialEq)]
pub struct LookupCompletion {
    pub ticket: u64,
    pub outcome: Result<WeatherReport, LookupError>,
}

/// Runs lookups off the UI thread
pub struct LookupDispatcher {
    runtime: tokio::runtime::Runtime,
    service: Arc<dyn WeatherService>,
    completion_tx: mpsc::UnboundedSender<LookupCompletion>,
    completion_rx: mpsc::UnboundedReceiver<LookupCompletion>,
    in_flight: Option<(u64, CancellationToken)>,
    repaint: egui::Context,
}

impl std::fmt::Debug for LookupDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LookupDispatcher")
            .field("in_flight", &self.in_flight.as_ref().map(|(ticket, _)| ticket))
            .finish_non_exhaustive()
    }
}

impl LookupDispatcher {
    /// Create a dispatcher with its own runtime. `repaint` is woken whenever
    /// a completion is posted so the UI drains it without waiting for input.
    pub fn new(service: Arc<dyn WeatherService>, repaint: egui::Context) -> std::io::Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("weather-lookup")
            .enable_all()
            .build()?;
        let (completion_tx, completion_rx) = mpsc::unbounded_channel();

        Ok(Self {
            runtime,
            service,
            completion_tx,
            completion_rx,
            in_flight: None,
            repaint,
        })
    }

    /// Start `request`, cancelling whatever lookup was still running.
    pub fn dispatch(&mut self, request: LookupRequest) {
        if let Some((ticket, token)) = self.in_flight.take() {
            info!("Lookup #{} superseded by #{}, cancelling", ticket, request.ticket);
            token.cancel();
        }

        let token = CancellationToken::new();
        self.in_flight = Some((request.ticket, token.clone()));

        let service = Arc::clone(&self.service);
        let completion_tx = self.completion_tx.clone();
        let repaint = self.repaint.clone();
        let LookupRequest { ticket, city, units } = request;

        self.runtime.spawn(async move {
            let outcome = tokio::select! {
                outcome = service.current_weather(city, units) => outcome,
                () = token.cancelled() => {
                    debug!("Lookup #{} cancelled", ticket);
                    return;
                }
            };

            if completion_tx.send(LookupCompletion { ticket, outcome }).is_err() {
                debug!("Lookup #{} finished after the dispatcher was dropped", ticket);
                return;
            }
            repaint.request_repaint();
        });
    }

    /// Completions posted since the last call, oldest first
    pub fn drain(&mut self) -> Vec<LookupCompletion> {
        let mut completions = Vec::new();
        while let Ok(completion) = self.completion_rx.try_recv() {
            if matches!(&self.in_flight, Some((ticket, _)) if *ticket == completion.ticket) {
                self.in_flight = None;
            }
            completions.push(completion);
        }
        completions
    }

    #[cfg(test)]
    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }
}

impl Drop for LookupDispatcher {
    fn drop(&mut self) {
        if let Some((_, token)) = self.in_flight.take() {
            token.cancel();
        }
    }
}
