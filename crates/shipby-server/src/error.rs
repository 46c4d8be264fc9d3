use dear_client::DearError;
use serde::Serialize;
use shipby_core::ShipByError;
use thiserror::Error;

/// A failure that ends the whole run. Only listing can do this: without the
/// list there is nothing to iterate over.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("failed to list sales: {0}")]
    List(#[source] DearError),
}

/// A failure confined to one sale. The batch moves on to the next id and
/// the sale is picked up again by a later run.
#[derive(Debug, Error)]
pub enum OrderError {
    #[error("failed to fetch sale: {0}")]
    Fetch(#[source] DearError),

    #[error("cannot reconcile sale: {0}")]
    Reconcile(#[source] ShipByError),

    #[error("failed to update sale: {0}")]
    Update(#[source] DearError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureStage {
    Fetch,
    Reconcile,
    Update,
}

impl OrderError {
    pub fn stage(&self) -> FailureStage {
        match self {
            OrderError::Fetch(_) => FailureStage::Fetch,
            OrderError::Reconcile(_) => FailureStage::Reconcile,
            OrderError::Update(_) => FailureStage::Update,
        }
    }
}
