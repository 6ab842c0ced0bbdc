//! `syncforge-bus` — typed synchronization commands and their dispatch.
//!
//! A [`Command`] describes "apply operation O to the object of type T,
//! identified by I, on adapter A, with optional payload P". The
//! [`Dispatcher`] routes each command to the unique [`CommandHandler`]
//! registered for its (adapter, object type, command type) key, and the
//! [`SyncRunner`] wraps a whole batch so one command's failure never stops
//! the next.

pub mod command;
pub mod dispatcher;
pub mod handler;
pub mod runner;

pub use command::{Command, CommandType};
pub use dispatcher::{DispatchError, Dispatcher, RegistrationError};
pub use handler::{CommandHandler, Outcome, RouteKey};
pub use runner::{CommandFailure, RunReport, SyncRunner};
