use crate::{errors::GenericError, utils::error_chain_fmt};

#[allow(clippy::enum_variant_names)]
#[derive(thiserror::Error)]
pub enum PaymentFlowError {
    #[error("{0}")]
    ValidationError(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    InvalidState(String),
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
    #[error("{0}")]
    DatabaseError(String, anyhow::Error),
}

impl std::fmt::Debug for PaymentFlowError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl From<PaymentFlowError> for GenericError {
    fn from(err: PaymentFlowError) -> GenericError {
        match err {
            PaymentFlowError::ValidationError(message) => GenericError::ValidationError(message),
            PaymentFlowError::NotFound(message) => GenericError::DataNotFound(message),
            PaymentFlowError::InvalidState(message) => GenericError::InvalidStateError(message),
            PaymentFlowError::UnexpectedError(error) => GenericError::UnexpectedError(error),
            PaymentFlowError::DatabaseError(message, error) => {
                GenericError::DatabaseError(message, error)
            }
        }
    }
}
