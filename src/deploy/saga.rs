// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of gcp-mcp and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;

use async_trait::async_trait;

use crate::cloud::CloudError;

/// One forward action of a multi-resource provisioning run.
#[async_trait]
pub trait SagaStep: Send + Sync {
    /// Short description, e.g. "create bucket `site`".
    fn describe(&self) -> String;

    /// Perform the action; the returned line goes into the success report.
    async fn execute(&self) -> Result<String, CloudError>;

    /// Undo a completed [`SagaStep::execute`]. `None` when the step has nothing to undo
    /// on its own (a later compensation covers it).
    async fn compensate(&self) -> Option<Result<(), CloudError>> {
        None
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedStep {
    pub step: String,
    pub detail: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RollbackStatus {
    Undone,
    NothingToUndo,
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RollbackOutcome {
    pub step: String,
    pub status: RollbackStatus,
}

#[derive(Debug)]
pub struct SagaFailure {
    pub failed_step: String,
    pub error: CloudError,
    pub completed: Vec<CompletedStep>,
    /// Compensations in the order they ran (reverse of completion).
    pub rollback: Vec<RollbackOutcome>,
}

impl SagaFailure {
    pub fn rolled_back_cleanly(&self) -> bool {
        self.rollback
            .iter()
            .all(|outcome| !matches!(outcome.status, RollbackStatus::Failed { .. }))
    }
}

impl fmt::Display for SagaFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "step '{}' failed: {}", self.failed_step, self.error.user_message())
    }
}

impl std::error::Error for SagaFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

/// Ordered steps executed strictly in sequence; on the first failure every
/// completed step is compensated in reverse order. Compensations are not retried.
#[derive(Default)]
pub struct Saga {
    steps: Vec<Box<dyn SagaStep>>,
}

impl Saga {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(mut self, step: impl SagaStep + 'static) -> Self {
        self.steps.push(Box::new(step));
        self
    }

    pub async fn run(self) -> Result<Vec<CompletedStep>, SagaFailure> {
        let mut completed = Vec::with_capacity(self.steps.len());

        for (idx, step) in self.steps.iter().enumerate() {
            let description = step.describe();
            match step.execute().await {
                Ok(detail) => {
                    tracing::debug!(step = %description, "saga step completed");
                    completed.push(CompletedStep { step: description, detail });
                }
                Err(error) => {
                    tracing::warn!(step = %description, error = %error, "saga step failed");
                    let rollback = unwind(&self.steps[..idx]).await;
                    return Err(SagaFailure {
                        failed_step: description,
                        error,
                        completed,
                        rollback,
                    });
                }
            }
        }

        Ok(completed)
    }
}

async fn unwind(done: &[Box<dyn SagaStep>]) -> Vec<RollbackOutcome> {
    let mut outcomes = Vec::with_capacity(done.len());
    for step in done.iter().rev() {
        let description = step.describe();
        let status = match step.compensate().await {
            None => RollbackStatus::NothingToUndo,
            Some(Ok(())) => RollbackStatus::Undone,
            Some(Err(err)) => {
                tracing::warn!(step = %description, error = %err, "compensation failed");
                RollbackStatus::Failed { reason: err.user_message() }
            }
        };
        outcomes.push(RollbackOutcome { step: description, status });
    }
    outcomes
}
