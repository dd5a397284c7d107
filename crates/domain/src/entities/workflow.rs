use crate::enums::WorkflowStatus;
use crate::error::{DomainError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Steps a tracked workflow may run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WorkflowStep {
    CreatePool,
    Initialize,
    Register,
    Mint,
}

impl fmt::Display for WorkflowStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            WorkflowStep::CreatePool => "create-pool",
            WorkflowStep::Initialize => "initialize",
            WorkflowStep::Register => "register",
            WorkflowStep::Mint => "mint",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepOutcome {
    Succeeded { tx_hash: String },
    /// Failed but non-fatal; the workflow carried on.
    Skipped { reason: String },
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepRecord {
    pub step: WorkflowStep,
    pub outcome: StepOutcome,
    pub at: DateTime<Utc>,
}

/// A tracked multi-step request.
///
/// Starts `Pending`, ends in exactly one of `Completed` or `Failed` and is
/// frozen afterwards: every mutator rejects a finished request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowRequest<P> {
    pub id: Uuid,
    pub params: P,
    status: WorkflowStatus,
    pub created_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub tx_hash: Option<String>,
    /// Address or type produced by the workflow, also kept on failure when
    /// a partial on-chain effect exists.
    pub result_address: Option<String>,
    steps: Vec<StepRecord>,
    pub failure_reason: Option<String>,
}

impl<P> WorkflowRequest<P> {
    pub fn new(params: P) -> Self {
        Self {
            id: Uuid::new_v4(),
            params,
            status: WorkflowStatus::Pending,
            created_at: Utc::now(),
            finished_at: None,
            tx_hash: None,
            result_address: None,
            steps: Vec::new(),
            failure_reason: None,
        }
    }

    #[must_use]
    pub fn status(&self) -> WorkflowStatus {
        self.status
    }

    pub fn steps(&self) -> &[StepRecord] {
        &self.steps
    }

    pub fn step(&self, step: WorkflowStep) -> Option<&StepRecord> {
        self.steps.iter().find(|r| r.step == step)
    }

    fn ensure_pending(&self, to: WorkflowStatus) -> Result<()> {
        if self.status.is_terminal() {
            return Err(DomainError::InvalidTransition {
                from: self.status.to_string(),
                to: to.to_string(),
            });
        }
        Ok(())
    }

    /// Appends a step record.
    ///
    /// # Errors
    /// [`DomainError::InvalidTransition`] once the request is finished.
    pub fn record_step(&mut self, step: WorkflowStep, outcome: StepOutcome) -> Result<()> {
        self.ensure_pending(WorkflowStatus::Pending)?;
        self.steps.push(StepRecord {
            step,
            outcome,
            at: Utc::now(),
        });
        Ok(())
    }

    /// Marks the request completed.
    ///
    /// # Errors
    /// [`DomainError::InvalidTransition`] once the request is finished.
    pub fn complete(&mut self, tx_hash: Option<String>, result_address: Option<String>) -> Result<()> {
        self.ensure_pending(WorkflowStatus::Completed)?;
        self.status = WorkflowStatus::Completed;
        self.tx_hash = tx_hash;
        self.result_address = result_address;
        self.finished_at = Some(Utc::now());
        Ok(())
    }

    /// Marks the request failed.
    ///
    /// # Errors
    /// [`DomainError::InvalidTransition`] once the request is finished.
    pub fn fail(&mut self, reason: impl Into<String>, result_address: Option<String>) -> Result<()> {
        self.ensure_pending(WorkflowStatus::Failed)?;
        self.status = WorkflowStatus::Failed;
        self.failure_reason = Some(reason.into());
        self.result_address = result_address;
        self.finished_at = Some(Utc::now());
        Ok(())
    }
}
