//! Batch execution wrapper: failure containment and per-command reporting.

use syncforge_core::{ObjectIdentifier, SyncError};

use crate::command::Command;
use crate::dispatcher::{DispatchError, Dispatcher};
use crate::handler::{Outcome, RouteKey};

/// One command's failure, with enough context to diagnose and retry.
#[derive(Debug)]
pub struct CommandFailure {
    pub route: RouteKey,
    pub object_identifier: ObjectIdentifier,
    pub error: SyncError,
}

/// Aggregated result of a synchronization run.
#[derive(Debug, Default)]
pub struct RunReport {
    pub applied: usize,
    pub already_satisfied: usize,
    pub failures: Vec<CommandFailure>,
}

impl RunReport {
    pub fn succeeded(&self) -> usize {
        self.applied + self.already_satisfied
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Drives a batch of commands through the dispatcher.
///
/// Handler failures are recorded and the run continues with the next command;
/// the identity store is left in whatever consistent state the completed
/// commands produced, so the failed objects are simply retried on the next
/// pass. The one exception is [`DispatchError::NoHandler`], which signals a
/// wiring bug and aborts immediately.
pub struct SyncRunner<'a> {
    dispatcher: &'a Dispatcher,
}

impl<'a> SyncRunner<'a> {
    pub fn new(dispatcher: &'a Dispatcher) -> Self {
        Self { dispatcher }
    }

    pub fn run(&self, commands: &[Command]) -> Result<RunReport, DispatchError> {
        let mut report = RunReport::default();

        for command in commands {
            match self.dispatcher.dispatch(command) {
                Ok(Outcome::Applied) => report.applied += 1,
                Ok(Outcome::AlreadySatisfied) => report.already_satisfied += 1,
                Err(error) if error.is_fatal() => return Err(error),
                Err(DispatchError::Handler { route, source }) => {
                    tracing::warn!(
                        route = %route,
                        object_identifier = %command.object_identifier(),
                        error = %source,
                        "command failed; continuing with the rest of the run"
                    );
                    report.failures.push(CommandFailure {
                        route,
                        object_identifier: command.object_identifier(),
                        error: source,
                    });
                }
                Err(error) => return Err(error),
            }
        }

        tracing::info!(
            applied = report.applied,
            already_satisfied = report.already_satisfied,
            failed = report.failures.len(),
            "synchronization run finished"
        );

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::CommandType;
    use crate::handler::CommandHandler;
    use syncforge_core::{AdapterName, ObjectType, SyncResult};

    struct FlakyHandler {
        route: RouteKey,
        fail_on: ObjectIdentifier,
    }

    impl CommandHandler for FlakyHandler {
        fn route(&self) -> RouteKey {
            self.route.clone()
        }

        fn handle(&self, command: &Command) -> SyncResult<Outcome> {
            if command.object_identifier() == self.fail_on {
                Err(SyncError::transport("boom"))
            } else {
                Ok(Outcome::Applied)
            }
        }
    }

    #[test]
    fn run_continues_past_handler_failures() {
        let route = RouteKey::new(
            AdapterName::from("erp"),
            ObjectType::Payment,
            CommandType::Create,
        );
        let poisoned = ObjectIdentifier::new();

        let mut dispatcher = Dispatcher::new();
        dispatcher
            .register(Box::new(FlakyHandler {
                route,
                fail_on: poisoned,
            }))
            .unwrap();

        let command = |id| {
            Command::new(
                AdapterName::from("erp"),
                CommandType::Create,
                ObjectType::Payment,
                id,
            )
        };
        let commands = vec![
            command(ObjectIdentifier::new()),
            command(poisoned),
            command(ObjectIdentifier::new()),
        ];

        let report = SyncRunner::new(&dispatcher).run(&commands).unwrap();
        assert_eq!(report.applied, 2);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].object_identifier, poisoned);
        assert!(matches!(report.failures[0].error, SyncError::Transport(_)));
    }

    #[test]
    fn missing_handler_aborts_the_run() {
        let dispatcher = Dispatcher::new();
        let commands = vec![Command::new(
            AdapterName::from("erp"),
            CommandType::Create,
            ObjectType::Payment,
            ObjectIdentifier::new(),
        )];

        let err = SyncRunner::new(&dispatcher).run(&commands).unwrap_err();
        assert!(err.is_fatal());
    }
}
