//! Per-operation deadline and stop signal
//!
//! Every remote call of a lifecycle operation runs through an
//! [`OperationContext`]. The deadline is fixed when the context is created,
//! so consecutive calls share one budget.

use crate::config::{TimeoutsConfig, MAX_TIMEOUT_SECONDS};
use crate::domain::{HybridConnError, Result};
use std::fmt;
use std::future::Future;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::Instant;

/// Lifecycle operation, each with its own time budget
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    Read,
    Update,
    Delete,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Create => "create",
            Operation::Read => "read",
            Operation::Update => "update",
            Operation::Delete => "delete",
        }
    }

    /// Budget configured for this operation
    pub fn budget(&self, timeouts: &TimeoutsConfig) -> Duration {
        match self {
            Operation::Create => timeouts.create(),
            Operation::Read => timeouts.read(),
            Operation::Update => timeouts.update(),
            Operation::Delete => timeouts.delete(),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Process-wide stop request, flipped to `true` on SIGINT/SIGTERM
#[derive(Debug, Clone)]
pub struct StopSignal {
    receiver: Option<watch::Receiver<bool>>,
}

impl StopSignal {
    pub fn new(receiver: watch::Receiver<bool>) -> Self {
        Self {
            receiver: Some(receiver),
        }
    }

    /// A signal that never fires
    pub fn never() -> Self {
        Self { receiver: None }
    }

    pub fn is_stopped(&self) -> bool {
        self.receiver.as_ref().is_some_and(|rx| *rx.borrow())
    }

    /// Resolves once a stop has been requested
    ///
    /// A dropped sender can no longer request a stop, so this then pends forever.
    async fn stopped(&mut self) {
        if let Some(rx) = self.receiver.as_mut() {
            loop {
                if *rx.borrow_and_update() {
                    return;
                }
                if rx.changed().await.is_err() {
                    break;
                }
            }
        }
        std::future::pending::<()>().await;
    }
}

impl Default for StopSignal {
    fn default() -> Self {
        Self::never()
    }
}

/// Deadline and stop signal of a single lifecycle operation
#[derive(Debug, Clone)]
pub struct OperationContext {
    operation: Operation,
    budget: Duration,
    deadline: Instant,
    stop: StopSignal,
}

impl OperationContext {
    /// Starts the clock for `operation`
    ///
    /// Budgets beyond [`MAX_TIMEOUT_SECONDS`] are capped.
    pub fn new(operation: Operation, budget: Duration, stop: StopSignal) -> Self {
        let budget = budget.min(Duration::from_secs(MAX_TIMEOUT_SECONDS));
        Self {
            operation,
            budget,
            deadline: Instant::now() + budget,
            stop,
        }
    }

    pub fn operation(&self) -> Operation {
        self.operation
    }

    /// Runs a remote call under this context
    ///
    /// # Errors
    ///
    /// Returns [`HybridConnError::Timeout`] once the deadline passes and
    /// [`HybridConnError::Cancelled`] if a stop is requested first.
    pub async fn run<F, T>(&self, call: F) -> Result<T>
    where
        F: Future<Output = T>,
    {
        if self.stop.is_stopped() {
            return Err(self.cancelled());
        }

        let mut stop = self.stop.clone();
        tokio::select! {
            biased;
            _ = stop.stopped() => Err(self.cancelled()),
            outcome = tokio::time::timeout_at(self.deadline, call) => {
                outcome.map_err(|_| HybridConnError::Timeout {
                    operation: self.operation.to_string(),
                    seconds: self.budget.as_secs(),
                })
            }
        }
    }

    fn cancelled(&self) -> HybridConnError {
        tracing::warn!(operation = %self.operation, "Stop requested, abandoning remote call");
        HybridConnError::Cancelled(self.operation.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_run_completes_within_budget() {
        let ctx = OperationContext::new(Operation::Read, Duration::from_secs(5), StopSignal::never());
        assert_eq!(ctx.run(async { 42 }).await.unwrap(), 42);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_times_out() {
        let ctx = OperationContext::new(Operation::Delete, Duration::from_secs(1), StopSignal::never());
        let err = ctx
            .run(tokio::time::sleep(Duration::from_secs(10)))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            HybridConnError::Timeout { ref operation, seconds: 1 } if operation == "delete"
        ));
    }

    #[tokio::test]
    async fn test_run_refuses_after_stop() {
        let (tx, rx) = watch::channel(false);
        tx.send(true).unwrap();
        let ctx = OperationContext::new(Operation::Create, Duration::from_secs(5), StopSignal::new(rx));
        assert!(matches!(
            ctx.run(async { 1 }).await,
            Err(HybridConnError::Cancelled(_))
        ));
    }

    #[tokio::test]
    async fn test_stop_interrupts_pending_call() {
        let (tx, rx) = watch::channel(false);
        let ctx = OperationContext::new(Operation::Update, Duration::from_secs(60), StopSignal::new(rx));

        let handle = tokio::spawn(async move { ctx.run(std::future::pending::<()>()).await });
        tokio::task::yield_now().await;
        tx.send(true).unwrap();

        assert!(matches!(
            handle.await.unwrap(),
            Err(HybridConnError::Cancelled(_))
        ));
    }

    #[tokio::test]
    async fn test_dropped_sender_never_cancels() {
        let (tx, rx) = watch::channel(false);
        drop(tx);
        let ctx = OperationContext::new(Operation::Read, Duration::from_secs(5), StopSignal::new(rx));
        assert_eq!(ctx.run(async { "done" }).await.unwrap(), "done");
    }

    #[tokio::test]
    async fn test_oversized_budget_is_capped() {
        let ctx = OperationContext::new(
            Operation::Create,
            Duration::from_secs(u64::MAX),
            StopSignal::never(),
        );
        assert_eq!(ctx.run(async { 7 }).await.unwrap(), 7);
    }

    #[tokio::test(start_paused = true)]
    async fn test_capped_budget_reported_on_timeout() {
        let ctx = OperationContext::new(
            Operation::Update,
            Duration::from_secs(u64::MAX),
            StopSignal::never(),
        );
        let err = ctx.run(std::future::pending::<()>()).await.unwrap_err();
        assert!(matches!(
            err,
            HybridConnError::Timeout { seconds, .. } if seconds == MAX_TIMEOUT_SECONDS
        ));
    }

    #[test]
    fn test_operation_budgets() {
        let timeouts = TimeoutsConfig::default();
        assert_eq!(Operation::Create.budget(&timeouts), Duration::from_secs(1800));
        assert_eq!(Operation::Read.budget(&timeouts), Duration::from_secs(300));
    }
}
