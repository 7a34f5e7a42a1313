//! What a processed command produced.
use tokio::task::JoinHandle;

use super::errors::{EngineError, Result};

/// Result of handing one line to the engine.
///
/// Errors have already been reported to the notifier when `Failed` is
/// returned; callers only need to inspect it.
#[derive(Debug)]
pub enum CommandOutcome {
    /// The line is not this command.
    NotMatched,
    /// `list` was requested: a total line followed by every asset path.
    Listing(Vec<String>),
    /// Instances were built and per-destination dispatch tasks spawned.
    Dispatched(DispatchReport),
    /// No destination resolved; the task finishes once a map click re-runs
    /// the command, or with [`CommandOutcome::Cancelled`].
    AwaitingClick(JoinHandle<CommandOutcome>),
    /// A pending click was abandoned because another command started.
    Cancelled,
    Failed(EngineError),
}

impl CommandOutcome {
    pub fn is_dispatched(&self) -> bool {
        matches!(self, CommandOutcome::Dispatched(_))
    }

    pub fn into_report(self) -> Option<DispatchReport> {
        match self {
            CommandOutcome::Dispatched(report) => Some(report),
            _ => None,
        }
    }
}

/// Summary of a dispatched command.
///
/// Dispatch is fire-and-forget: dropping the report detaches the tasks, which
/// still run to completion.
#[derive(Debug)]
pub struct DispatchReport {
    pub source: String,
    pub destinations: Vec<String>,
    /// File names of every built instance, in build order.
    pub used: Vec<String>,
    tasks: Vec<JoinHandle<Vec<String>>>,
}

impl DispatchReport {
    pub(crate) fn new(
        source: String,
        destinations: Vec<String>,
        used: Vec<String>,
        tasks: Vec<JoinHandle<Vec<String>>>,
    ) -> Self {
        Self {
            source,
            destinations,
            used,
            tasks,
        }
    }

    /// Number of independent per-destination sequences.
    pub fn sequence_count(&self) -> usize {
        self.tasks.len()
    }

    /// Waits for every sequence and returns the files each one played.
    pub async fn join(self) -> Result<Vec<Vec<String>>> {
        let mut played = Vec::with_capacity(self.tasks.len());
        for task in self.tasks {
            played.push(task.await.map_err(EngineError::DispatchJoin)?);
        }
        Ok(played)
    }
}
