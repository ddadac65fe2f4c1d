//! Per-request deadline and cancellation guard
//!
//! Handlers check the guard before starting work and wrap every store
//! call in it. A tripped shutdown signal yields `Canceled` (the caller
//! should not retry against this instance); an elapsed deadline yields
//! `DeadlineExceeded` (the caller may retry).

use std::future::Future;
use std::time::Duration;

use super::shutdown::ShutdownSignal;
use crate::domain::{ServiceError, ServiceResult};

#[derive(Clone)]
pub struct RequestGuard {
    shutdown: ShutdownSignal,
    deadline: Duration,
}

impl RequestGuard {
    pub fn new(shutdown: ShutdownSignal, deadline: Duration) -> Self {
        Self { shutdown, deadline }
    }

    /// Fail fast if the process is already shutting down.
    pub fn check(&self, operation: &'static str) -> ServiceResult<()> {
        if self.shutdown.is_triggered() {
            Err(ServiceError::Canceled(operation))
        } else {
            Ok(())
        }
    }

    /// Run a suspension point (store query, outbound call) under the
    /// configured deadline.
    pub async fn run<T, F>(&self, operation: &'static str, fut: F) -> ServiceResult<T>
    where
        F: Future<Output = ServiceResult<T>>,
    {
        self.check(operation)?;
        match tokio::time::timeout(self.deadline, fut).await {
            Ok(result) => result,
            Err(_) => Err(ServiceError::DeadlineExceeded(operation)),
        }
    }
}
