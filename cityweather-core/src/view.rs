//! View state and the transitions allowed on it.
//!
//! ```text
//! Idle ──Select──▶ Loading ──Completed(ok)──▶ Success
//!                     ▲   └──Completed(err)─▶ Error
//!                     └────────Select─────────┘
//! ```
//!
//! Every selection bumps a generation counter. A completion only lands if it
//! carries the current generation, so the most recent selection always wins.

use tracing::debug;

use crate::{error::ErrorKind, location::LocationSource, model::WeatherSnapshot};

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// The user (or startup) picked a source.
    Select(LocationSource),
    /// A load started for generation `token` finished.
    Completed {
        token: u64,
        outcome: Result<WeatherSnapshot, ErrorKind>,
    },
}

/// Work the caller must perform after a transition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    Load { token: u64, source: LocationSource },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading,
    Success,
    Error,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewState {
    pub selected_source: Option<LocationSource>,
    /// Kept while a newer load is running; replaced only by a later success.
    pub snapshot: Option<WeatherSnapshot>,
    pub is_loading: bool,
    pub error: Option<ErrorKind>,
    generation: u64,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn phase(&self) -> Phase {
        if self.is_loading {
            Phase::Loading
        } else if self.error.is_some() {
            Phase::Error
        } else if self.snapshot.is_some() {
            Phase::Success
        } else {
            Phase::Idle
        }
    }

    pub fn apply(&mut self, event: Event) -> Option<Command> {
        match event {
            Event::Select(source) => {
                self.generation += 1;
                self.selected_source = Some(source);
                self.is_loading = true;
                self.error = None;
                Some(Command::Load {
                    token: self.generation,
                    source,
                })
            }
            Event::Completed { token, outcome } => {
                if token != self.generation || !self.is_loading {
                    debug!(
                        token,
                        current = self.generation,
                        "Discarding stale completion"
                    );
                    return None;
                }

                self.is_loading = false;
                match outcome {
                    Ok(snapshot) => {
                        self.snapshot = Some(snapshot);
                        self.error = None;
                    }
                    Err(kind) => self.error = Some(kind),
                }
                None
            }
        }
    }
}
