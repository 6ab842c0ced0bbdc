//! Command routing (dispatch table keyed by route).
//!
//! The dispatcher holds a closed table built once at startup. Overlapping
//! registrations are a configuration bug and are rejected when the table is
//! built, not discovered at dispatch time.

use std::collections::HashMap;

use thiserror::Error;

use syncforge_core::SyncError;

use crate::command::Command;
use crate::handler::{CommandHandler, Outcome, RouteKey};

/// Dispatch-table construction error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistrationError {
    /// Two handlers claimed the same route.
    #[error("duplicate handler registered for route {0}")]
    Duplicate(RouteKey),
}

/// Dispatch failure.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// No handler serves the command's route. A wiring bug: fatal to the
    /// run, never silently skipped.
    #[error("no handler registered for route {0}")]
    NoHandler(RouteKey),

    /// The selected handler failed. Local to this command; the run continues.
    #[error("handler for route {route} failed: {source}")]
    Handler {
        route: RouteKey,
        #[source]
        source: SyncError,
    },
}

impl DispatchError {
    /// Whether this failure must abort the whole run.
    pub fn is_fatal(&self) -> bool {
        matches!(self, DispatchError::NoHandler(_))
    }
}

/// Routes each command to the unique handler registered for its key.
#[derive(Default)]
pub struct Dispatcher {
    handlers: HashMap<RouteKey, Box<dyn CommandHandler>>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler under its route.
    ///
    /// Fails with [`RegistrationError::Duplicate`] if the route is taken -
    /// callers should treat that as a startup configuration error.
    pub fn register(&mut self, handler: Box<dyn CommandHandler>) -> Result<(), RegistrationError> {
        let route = handler.route();
        if self.handlers.contains_key(&route) {
            return Err(RegistrationError::Duplicate(route));
        }
        tracing::debug!(route = %route, "registered command handler");
        self.handlers.insert(route, handler);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Dispatch one command to its handler.
    ///
    /// Selection is deterministic: the table is keyed by the command's route,
    /// so the same command always reaches the same handler.
    pub fn dispatch(&self, command: &Command) -> Result<Outcome, DispatchError> {
        let route = command.route();
        let handler = self
            .handlers
            .get(&route)
            .ok_or_else(|| DispatchError::NoHandler(route.clone()))?;

        tracing::debug!(
            route = %route,
            object_identifier = %command.object_identifier(),
            "dispatching command"
        );

        handler
            .handle(command)
            .map_err(|source| DispatchError::Handler { route, source })
    }
}
