//! Drives [`ViewState`] against the real resolver and provider.

use std::sync::Arc;

use tokio::{sync::mpsc, task::JoinHandle};
use tracing::{info, warn};

use crate::{
    Config,
    error::WeatherError,
    location::{LocationSource, Resolver, geolocator_from_config},
    model::WeatherSnapshot,
    provider::{WeatherProvider, provider_from_config},
    view::{Command, Event, ViewState},
};

/// A finished load, tagged with the generation that started it.
#[derive(Debug)]
pub struct Completion {
    pub token: u64,
    pub outcome: Result<WeatherSnapshot, WeatherError>,
}

/// Resolve `source`, then fetch its weather. The fetch is skipped when the
/// location cannot be resolved.
pub async fn load(
    resolver: &Resolver,
    provider: &dyn WeatherProvider,
    source: &LocationSource,
) -> Result<WeatherSnapshot, WeatherError> {
    let coordinate = resolver.resolve(source).await?;
    provider
        .current(coordinate)
        .await
        .map_err(WeatherError::WeatherFetchFailed)
}

#[derive(Debug)]
pub struct Session {
    resolver: Arc<Resolver>,
    provider: Arc<dyn WeatherProvider>,
    state: ViewState,
    completions_tx: mpsc::UnboundedSender<Completion>,
    completions_rx: mpsc::UnboundedReceiver<Completion>,
    in_flight: Option<JoinHandle<()>>,
}

impl Session {
    pub fn new(resolver: Resolver, provider: Arc<dyn WeatherProvider>) -> Self {
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();
        Self {
            resolver: Arc::new(resolver),
            provider,
            state: ViewState::new(),
            completions_tx,
            completions_rx,
            in_flight: None,
        }
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let geolocator = geolocator_from_config(&config.geolocation, config.timeout())?;
        let provider = provider_from_config(config)?;
        Ok(Self::new(Resolver::new(geolocator), provider))
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    /// Start loading `source`. Any load still running is aborted and its
    /// result, if already queued, will be discarded. Must be called from
    /// within a tokio runtime.
    pub fn select(&mut self, source: LocationSource) {
        info!(source = ?source, "Location selected");
        if let Some(command) = self.state.apply(Event::Select(source)) {
            self.execute(command);
        }
    }

    /// Reload the current source, or the current location if nothing has been
    /// selected yet.
    pub fn refresh(&mut self) {
        let source = self
            .state
            .selected_source
            .unwrap_or(LocationSource::CurrentLocation);
        self.select(source);
    }

    fn execute(&mut self, command: Command) {
        match command {
            Command::Load { token, source } => {
                if let Some(previous) = self.in_flight.take() {
                    previous.abort();
                }

                let resolver = Arc::clone(&self.resolver);
                let provider = Arc::clone(&self.provider);
                let tx = self.completions_tx.clone();

                self.in_flight = Some(tokio::spawn(async move {
                    let outcome = load(&resolver, provider.as_ref(), &source).await;
                    // The receiver lives as long as the session.
                    let _ = tx.send(Completion { token, outcome });
                }));
            }
        }
    }

    /// Wait for the next finished load. Cancel safe.
    pub async fn next_completion(&mut self) -> Option<Completion> {
        self.completions_rx.recv().await
    }

    /// Apply a finished load to the view. Returns `false` when it was stale.
    pub fn complete(&mut self, completion: Completion) -> bool {
        let Completion { token, outcome } = completion;
        let current = token == self.state.generation() && self.state.is_loading;

        let outcome = match outcome {
            Ok(snapshot) => {
                if current {
                    info!(location = %snapshot.location_name, "Weather updated");
                }
                Ok(snapshot)
            }
            Err(err) => {
                let kind = err.kind();
                if current {
                    warn!(error = %format!("{:#}", anyhow::Error::from(err)), "Load failed");
                }
                Err(kind)
            }
        };

        self.state.apply(Event::Completed { token, outcome });
        current
    }

    /// Wait until the most recent selection has finished and return the view.
    pub async fn settle(&mut self) -> &ViewState {
        while self.state.is_loading {
            let Some(completion) = self.next_completion().await else {
                break;
            };
            self.complete(completion);
        }
        &self.state
    }
}
