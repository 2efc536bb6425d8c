//! Units of work handed out by the identity provider.
//!
//! A provider returns a [`PendingTask`] immediately and finishes it later
//! through the paired [`TaskCompleter`]. Waiting on a task is a suspend point
//! that re-checks the task state every time the completer publishes, so the
//! scheduler thread is never blocked.

use tokio::sync::watch;

use crate::error::AuthError;
use crate::types::ResultEnvelope;

/// Observable state of a provider task.
#[derive(Debug, Clone)]
pub enum TaskState<T> {
    Running,
    Completed(T),
    Faulted(AuthError),
    Canceled,
}

impl<T> TaskState<T> {
    pub fn is_finished(&self) -> bool {
        !matches!(self, Self::Running)
    }
}

/// Create a running task and the handle that finishes it.
///
/// # Example
/// ```
/// use authbridge::task;
///
/// let runtime = tokio::runtime::Runtime::new().unwrap();
/// let (completer, task) = task::pending::<u32>();
/// assert!(!task.is_completed());
/// completer.complete(5);
/// assert_eq!(runtime.block_on(task.wait()).into_value(), Some(5));
/// ```
pub fn pending<T>() -> (TaskCompleter<T>, PendingTask<T>) {
    let (tx, rx) = watch::channel(TaskState::Running);
    (TaskCompleter { tx }, PendingTask { rx })
}

/// Provider-side handle that finishes a [`PendingTask`] exactly once.
#[derive(Debug)]
pub struct TaskCompleter<T> {
    tx: watch::Sender<TaskState<T>>,
}

impl<T> TaskCompleter<T> {
    pub fn complete(self, value: T) {
        self.finish(TaskState::Completed(value));
    }

    pub fn fault(self, error: AuthError) {
        self.finish(TaskState::Faulted(error));
    }

    pub fn cancel(self) {
        self.finish(TaskState::Canceled);
    }

    fn finish(self, state: TaskState<T>) {
        self.tx.send_replace(state);
    }
}

/// Caller-side view of a provider unit of work.
#[derive(Debug)]
pub struct PendingTask<T> {
    rx: watch::Receiver<TaskState<T>>,
}

impl<T: Clone> PendingTask<T> {
    /// An already-finished task.
    pub fn finished(state: TaskState<T>) -> Self {
        let (_tx, rx) = watch::channel(state);
        Self { rx }
    }

    pub fn completed(value: T) -> Self {
        Self::finished(TaskState::Completed(value))
    }

    pub fn faulted(error: AuthError) -> Self {
        Self::finished(TaskState::Faulted(error))
    }

    pub fn canceled() -> Self {
        Self::finished(TaskState::Canceled)
    }

    pub fn is_completed(&self) -> bool {
        self.rx.borrow().is_finished()
    }

    pub fn is_faulted(&self) -> bool {
        matches!(*self.rx.borrow(), TaskState::Faulted(_))
    }

    pub fn is_canceled(&self) -> bool {
        matches!(*self.rx.borrow(), TaskState::Canceled)
    }

    /// Suspend until the task finishes, then classify it.
    ///
    /// A completer dropped without finishing yields [`AuthError::Abandoned`].
    pub async fn wait(mut self) -> ResultEnvelope<T> {
        let finished = self
            .rx
            .wait_for(TaskState::is_finished)
            .await
            .map(|state| state.clone());
        match finished {
            Ok(state) => state.into(),
            Err(_) => ResultEnvelope::Faulted(AuthError::Abandoned),
        }
    }
}

impl<T> From<TaskState<T>> for ResultEnvelope<T> {
    fn from(state: TaskState<T>) -> Self {
        match state {
            TaskState::Completed(value) => classify(None, false, Some(value)),
            TaskState::Faulted(error) => classify(Some(error), false, None),
            TaskState::Canceled => classify(None, true, None),
            TaskState::Running => ResultEnvelope::Faulted(AuthError::InvalidState(
                "task classified before completion".to_string(),
            )),
        }
    }
}

/// Classify a finished unit of work reported as independent flags.
///
/// Fault wins over cancellation, cancellation wins over success. A unit that
/// reports neither and carries no value is treated as an invalid state.
pub fn classify<T>(fault: Option<AuthError>, canceled: bool, value: Option<T>) -> ResultEnvelope<T> {
    if let Some(error) = fault {
        return ResultEnvelope::Faulted(error);
    }
    if canceled {
        return ResultEnvelope::Canceled;
    }
    match value {
        Some(value) => ResultEnvelope::Success(value),
        None => ResultEnvelope::Faulted(AuthError::InvalidState(
            "task completed without a result".to_string(),
        )),
    }
}
